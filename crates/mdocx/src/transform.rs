//! The block-level walk from tokens to document.
//!
//! A single forward pass dispatches on the token under the cursor:
//!
//! 1. a heading (or standalone paragraph) reading the contents keyword starts
//!    a table of contents built from the list that follows it;
//! 2. other headings become bookmarked heading paragraphs;
//! 3. list containers and items only update the list stack;
//! 4. paragraphs are emitted, with a synthetic marker inside lists;
//! 5. tables are collected up to `table_close` and emitted as a grid;
//! 6. fences become code blocks;
//! 7. anything else is skipped.
//!
//! Lists are flattened into indented paragraphs with computed markers; no
//! numbering definitions are written.

use std::sync::OnceLock;

use ecow::{eco_format, EcoString};
use log::debug;
use regex::Regex;

use crate::anchors::{insert_page_reference, stamp_anchor, AnchorMap};
use crate::config::{
    font_or, is_centered_keyword, Alignment, CodeBlockStyle, ConvertConfig, FontPair,
    TableAlignMode,
};
use crate::cursor::TokenCursor;
use crate::inline::InlineFormatter;
use crate::model::{inches, Document, Indent, TabAlignment, TabLeader, TableKind};
use crate::styles::StyleSlot;
use crate::token::{Token, TokenKind};
use crate::{Error, Result};

/// Indent added per list level, 0.22in.
pub const LIST_STEP: i32 = 317;
/// Right-aligned tab stop of contents entries, 6in.
pub const CONTENTS_TAB: i32 = 8640;
/// Bullet glyphs, cycled by nesting depth.
pub const BULLETS: [&str; 3] = ["●", "○", "■"];
/// Fill of the language strip above code.
pub const CODE_HEADER_FILL: &str = "D9D9D9";
/// Fill behind code text.
pub const CODE_BODY_FILL: &str = "F2F2F2";

const HANGING_MARKER: &str = "- ";

/// The kind of a list frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// A numbered list.
    Ordered,
    /// A bulleted list.
    Unordered,
}

/// One level of list nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFrame {
    /// Numbered or bulleted.
    pub kind: ListKind,
    /// The declared number of the first item.
    pub start: u64,
    /// Items opened so far.
    pub items: u64,
}

impl ListFrame {
    fn open(token: &Token) -> Self {
        match token.kind {
            TokenKind::OrderedListOpen => {
                let start = token
                    .attr("start")
                    .and_then(|start| start.parse::<u64>().ok())
                    .unwrap_or(1);
                Self {
                    kind: ListKind::Ordered,
                    start,
                    items: 0,
                }
            }
            _ => Self {
                kind: ListKind::Unordered,
                start: 1,
                items: 0,
            },
        }
    }

    /// The marker of the current item at nesting `depth` (1-based).
    pub fn marker(&self, depth: usize) -> EcoString {
        match self.kind {
            ListKind::Unordered => BULLETS[(depth.max(1) - 1) % BULLETS.len()].into(),
            ListKind::Ordered => eco_format!("{}.", self.start + self.items.saturating_sub(1)),
        }
    }
}

/// Matches a delimiter-row cell such as `:---:`.
fn separator_cell() -> &'static Regex {
    static REG: OnceLock<Regex> = OnceLock::new();
    // The pattern is a literal and always compiles.
    REG.get_or_init(|| Regex::new(r"^:?-+:?$").expect("valid separator pattern"))
}

fn is_alignment_row(cells: &[&Token]) -> bool {
    !cells.is_empty() && cells.iter().all(|cell| separator_cell().is_match(cell.trimmed()))
}

fn declared_alignment(cell: &str) -> Alignment {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        _ => Alignment::Left,
    }
}

fn attr_alignment(token: &Token) -> Option<Alignment> {
    match token.attr("align")? {
        "left" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" => Some(Alignment::Right),
        _ => None,
    }
}

/// Walks a token stream and appends the blocks to a [`Document`].
pub struct BlockTransformer<'a> {
    config: &'a ConvertConfig,
    anchors: &'a AnchorMap,
    inline: InlineFormatter,
    lists: Vec<ListFrame>,
    contents_present: bool,
}

impl<'a> BlockTransformer<'a> {
    /// Creates a transformer.
    ///
    /// `contents_present` tells whether the contents keyword occurs anywhere
    /// in the source; without it no table of contents is built.
    pub fn new(
        config: &'a ConvertConfig,
        anchors: &'a AnchorMap,
        code_font: FontPair,
        contents_present: bool,
    ) -> Self {
        Self {
            config,
            anchors,
            inline: InlineFormatter::new(code_font),
            lists: Vec::new(),
            contents_present,
        }
    }

    /// Transforms every token.
    pub fn transform(&mut self, tokens: &[Token], doc: &mut Document) -> Result<()> {
        let mut cursor = TokenCursor::new(tokens);
        while let Some(token) = cursor.current() {
            match token.kind {
                TokenKind::HeadingOpen | TokenKind::ParagraphOpen
                    if self.starts_contents(&cursor)? =>
                {
                    self.emit_contents(&mut cursor, doc)?;
                }
                TokenKind::HeadingOpen => self.emit_heading(&mut cursor, doc)?,
                TokenKind::BulletListOpen | TokenKind::OrderedListOpen => {
                    self.lists.push(ListFrame::open(token));
                    cursor.advance();
                }
                TokenKind::BulletListClose | TokenKind::OrderedListClose => {
                    self.lists.pop();
                    cursor.advance();
                }
                TokenKind::ListItemOpen => {
                    if let Some(frame) = self.lists.last_mut() {
                        frame.items += 1;
                    }
                    cursor.advance();
                }
                TokenKind::ParagraphOpen => self.emit_paragraph(&mut cursor, doc)?,
                TokenKind::TableOpen => self.emit_table(&mut cursor, doc)?,
                TokenKind::Fence | TokenKind::CodeBlock => {
                    self.emit_code(token, doc);
                    cursor.advance();
                }
                kind => {
                    if kind != TokenKind::ListItemClose {
                        debug!("skipping `{kind}` at {}", cursor.pos());
                    }
                    cursor.advance();
                }
            }
        }
        Ok(())
    }

    fn starts_contents(&self, cursor: &TokenCursor<'_>) -> Result<bool> {
        if !self.contents_present {
            return Ok(false);
        }
        let inline = cursor.expect(1, TokenKind::Inline)?;
        if inline.trimmed() != self.config.contents_keyword.trim() {
            return Ok(false);
        }
        Ok(match cursor.peek_kind(0) {
            Some(TokenKind::HeadingOpen) => true,
            // A bare paragraph only counts at top level and right before a list.
            Some(TokenKind::ParagraphOpen) => {
                self.lists.is_empty() && cursor.peek_kind(3).is_some_and(TokenKind::is_list_open)
            }
            _ => false,
        })
    }

    fn emit_contents(&mut self, cursor: &mut TokenCursor<'_>, doc: &mut Document) -> Result<()> {
        let close = match cursor.peek_kind(0) {
            Some(TokenKind::HeadingOpen) => TokenKind::HeadingClose,
            _ => TokenKind::ParagraphClose,
        };
        let inline = cursor.expect_triple(close)?;

        let bookmark = self.bookmark_for(inline.trimmed(), doc);
        let heading = doc.add_paragraph(StyleSlot::Heading1);
        heading.alignment = Some(Alignment::Center);
        heading.add_tab_stop(CONTENTS_TAB, TabAlignment::Right, TabLeader::Dot);
        self.inline.render(heading, inline);
        if let Some((id, name)) = bookmark {
            stamp_anchor(heading, id, name);
        }
        cursor.advance_by(3);

        if !cursor.peek_kind(0).is_some_and(TokenKind::is_list_open) {
            return Ok(());
        }

        let end = cursor.matching_close(0, TokenKind::is_list_open, TokenKind::is_list_close)?;
        let mut depth = 0usize;
        let mut entries = 0usize;
        for k in 0..=(end - cursor.pos()) {
            let Some(token) = cursor.peek(k) else {
                break;
            };
            match token.kind {
                kind if kind.is_list_open() => depth += 1,
                kind if kind.is_list_close() => depth = depth.saturating_sub(1),
                TokenKind::ListItemOpen
                    if cursor.peek_kind(k + 1) == Some(TokenKind::ParagraphOpen) =>
                {
                    let entry = cursor.expect(k + 2, TokenKind::Inline)?;
                    self.emit_contents_entry(entry, depth, doc);
                    entries += 1;
                }
                _ => {}
            }
        }
        debug!("contents block with {entries} entries");
        cursor.seek(end + 1);
        Ok(())
    }

    fn emit_contents_entry(&self, entry: &Token, depth: usize, doc: &mut Document) {
        let text = entry.trimmed();
        let paragraph = doc.add_paragraph(StyleSlot::Body);
        paragraph.indent = Some(Indent {
            left: LIST_STEP * depth.saturating_sub(1) as i32,
            first_line: 0,
        });
        paragraph.add_tab_stop(CONTENTS_TAB, TabAlignment::Right, TabLeader::Dot);
        paragraph.add_run(text);
        paragraph.add_run("\t");
        match self.anchors.get(text) {
            Some(anchor) => insert_page_reference(paragraph, anchor),
            None => debug!("no heading matches contents entry {text:?}"),
        }
    }

    fn emit_heading(&mut self, cursor: &mut TokenCursor<'_>, doc: &mut Document) -> Result<()> {
        let open = cursor.expect(0, TokenKind::HeadingOpen)?;
        let inline = cursor.expect_triple(TokenKind::HeadingClose)?;
        let level = open
            .tag
            .strip_prefix('h')
            .and_then(|level| level.parse::<usize>().ok())
            .ok_or_else(|| {
                Error::structure(cursor.pos(), format!("heading tag `{}` has no level", open.tag))
            })?;

        let text = inline.trimmed();
        let bookmark = self.bookmark_for(text, doc);
        let paragraph = doc.add_paragraph(StyleSlot::heading(level));
        self.inline.render(paragraph, inline);
        if is_centered_keyword(text) {
            paragraph.alignment = Some(Alignment::Center);
        }
        if let Some((id, name)) = bookmark {
            stamp_anchor(paragraph, id, name);
        }

        cursor.advance_by(3);
        Ok(())
    }

    fn bookmark_for(&self, text: &str, doc: &mut Document) -> Option<(usize, &'a str)> {
        let name = self.anchors.get(text)?;
        Some((doc.next_bookmark_id(), name))
    }

    fn emit_paragraph(&mut self, cursor: &mut TokenCursor<'_>, doc: &mut Document) -> Result<()> {
        let inline = cursor.expect_triple(TokenKind::ParagraphClose)?;

        if let Some(frame) = self.lists.last() {
            let depth = self.lists.len();
            let left = inches(self.config.list_base_indent()) + LIST_STEP * depth as i32;
            let paragraph = doc.add_paragraph(StyleSlot::ListVisual);
            paragraph.indent = Some(Indent {
                left,
                first_line: -LIST_STEP,
            });
            paragraph.add_tab_stop(left, TabAlignment::Left, TabLeader::None);
            let marker = paragraph.add_run(eco_format!("{}\t", frame.marker(depth)));
            marker.fonts = Some(font_or("times", "song"));
            self.inline.render(paragraph, inline);
        } else {
            let text = inline.trimmed();
            if is_centered_keyword(text) {
                let paragraph = doc.add_paragraph(StyleSlot::Body);
                paragraph.alignment = Some(Alignment::Center);
                self.inline.render(paragraph, inline);
            } else if text.starts_with(HANGING_MARKER) {
                let stripped = inline.with_stripped_marker(HANGING_MARKER);
                let paragraph = doc.add_paragraph(StyleSlot::Hanging);
                self.inline.render(paragraph, &stripped);
            } else {
                let paragraph = doc.add_paragraph(StyleSlot::Body);
                self.inline.render(paragraph, inline);
            }
        }

        cursor.advance_by(3);
        Ok(())
    }

    fn emit_table(&mut self, cursor: &mut TokenCursor<'_>, doc: &mut Document) -> Result<()> {
        let end = cursor.matching_close(
            0,
            |kind| kind == TokenKind::TableOpen,
            |kind| kind == TokenKind::TableClose,
        )?;

        let mut header: Vec<&Token> = Vec::new();
        let mut body: Vec<Vec<&Token>> = Vec::new();
        let mut declared: Vec<Option<Alignment>> = Vec::new();
        let mut separator: Option<Vec<Alignment>> = None;
        let mut row: Vec<&Token> = Vec::new();
        let mut in_head = false;

        for k in 1..(end - cursor.pos()) {
            let Some(token) = cursor.peek(k) else {
                break;
            };
            match token.kind {
                TokenKind::TheadOpen => in_head = true,
                TokenKind::TheadClose => in_head = false,
                TokenKind::TrOpen => row.clear(),
                TokenKind::ThOpen | TokenKind::TdOpen => {
                    row.push(cursor.expect(k + 1, TokenKind::Inline)?);
                    if in_head {
                        declared.push(attr_alignment(token));
                    }
                }
                TokenKind::TrClose => {
                    let cells = std::mem::take(&mut row);
                    // Dash-only rows are data unless columns follow their alignment.
                    let column_mode = self.config.table_alignment == TableAlignMode::Column;
                    if column_mode && is_alignment_row(&cells) {
                        separator = Some(
                            cells
                                .iter()
                                .map(|cell| declared_alignment(cell.trimmed()))
                                .collect(),
                        );
                    } else if in_head {
                        header = cells;
                    } else {
                        body.push(cells);
                    }
                }
                _ => {}
            }
        }
        cursor.seek(end + 1);

        if header.is_empty() {
            debug!("dropping a table without header cells");
            return Ok(());
        }

        let columns: Vec<Option<Alignment>> = match separator {
            Some(separator) => separator.into_iter().map(Some).collect(),
            None => declared,
        };
        let cols = header.len();
        let table = doc.add_table(TableKind::Data, 1 + body.len(), cols);
        table.centered = true;

        for (r, cells) in std::iter::once(&header).chain(body.iter()).enumerate() {
            for c in 0..cols {
                let Some(cell) = table.cell_mut(r, c) else {
                    continue;
                };
                cell.v_centered = true;
                cell.paragraph.alignment = match self.config.table_alignment {
                    TableAlignMode::Center => Some(Alignment::Center),
                    TableAlignMode::Column => columns.get(c).copied().flatten(),
                };
                if let Some(content) = cells.get(c) {
                    self.inline.render(&mut cell.paragraph, content);
                }
            }
        }
        Ok(())
    }

    fn emit_code(&self, token: &Token, doc: &mut Document) {
        let code = token.content.trim_end();
        match self.config.code_block {
            CodeBlockStyle::Plain => {
                doc.add_paragraph(StyleSlot::CodeText).add_run(code);
            }
            CodeBlockStyle::Framed => {
                let label = match token.info.trim() {
                    "" => "Code",
                    info => info,
                };
                let table = doc.add_table(TableKind::CodeFrame, 2, 1);
                if let Some(cell) = table.cell_mut(0, 0) {
                    cell.shading = Some(CODE_HEADER_FILL);
                    cell.paragraph.style = StyleSlot::CodeHeader;
                    cell.paragraph.add_run(label);
                }
                if let Some(cell) = table.cell_mut(1, 0) {
                    cell.shading = Some(CODE_BODY_FILL);
                    cell.paragraph.style = StyleSlot::CodeText;
                    cell.paragraph.add_run(code);
                }
            }
        }
    }
}
