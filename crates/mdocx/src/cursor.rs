//! Forward cursor over a token slice.

use crate::token::{Token, TokenKind};
use crate::{Error, Result};

/// A read-only cursor that checks token shapes as it goes.
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// Creates a cursor at the first token.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The absolute position of the cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether every token has been consumed.
    pub fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The token under the cursor.
    pub fn current(&self) -> Option<&'a Token> {
        self.peek(0)
    }

    /// The token `k` positions ahead of the cursor.
    pub fn peek(&self, k: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + k)
    }

    /// The kind of the token `k` positions ahead, if any.
    pub fn peek_kind(&self, k: usize) -> Option<TokenKind> {
        self.peek(k).map(|token| token.kind)
    }

    /// Returns the token `k` positions ahead, failing unless it has `kind`.
    pub fn expect(&self, k: usize, kind: TokenKind) -> Result<&'a Token> {
        match self.peek(k) {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(Error::structure(
                self.pos + k,
                format!("expected `{kind}`, found `{}`", token.kind),
            )),
            None => Err(Error::structure(
                self.pos + k,
                format!("expected `{kind}`, found end of input"),
            )),
        }
    }

    /// Checks an `open, inline, close` triple under the cursor and returns the
    /// inline token.
    pub fn expect_triple(&self, close: TokenKind) -> Result<&'a Token> {
        let inline = self.expect(1, TokenKind::Inline)?;
        self.expect(2, close)?;
        Ok(inline)
    }

    /// Moves one token forward.
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Moves `n` tokens forward, stopping at the end.
    pub fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    /// Moves to an absolute position.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    /// Finds the first token at or after the cursor, `k` ahead, that closes the
    /// container opened at `k`. Nested containers of the same family are
    /// skipped.
    pub fn matching_close(
        &self,
        k: usize,
        is_open: impl Fn(TokenKind) -> bool,
        is_close: impl Fn(TokenKind) -> bool,
    ) -> Result<usize> {
        let start = self.pos + k;
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(start) {
            if is_open(token.kind) {
                depth += 1;
            } else if is_close(token.kind) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(idx);
                }
            }
        }
        Err(Error::structure(start, "container is never closed"))
    }
}
