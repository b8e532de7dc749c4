//! Inline content to styled runs.

use ecow::EcoString;
use log::debug;

use crate::config::FontPair;
use crate::model::{Inline, Paragraph, Run};
use crate::token::{Token, TokenKind};

/// Converts the children of an inline token into runs.
///
/// Bold and italic are two flags, not a stack. A stray closing marker only
/// clears its flag.
#[derive(Debug, Clone, Copy)]
pub struct InlineFormatter {
    code_font: FontPair,
}

impl InlineFormatter {
    /// Creates a formatter that sets code spans in `code_font`.
    pub fn new(code_font: FontPair) -> Self {
        Self { code_font }
    }

    /// Appends the runs of `inline` to `paragraph`.
    pub fn render(&self, paragraph: &mut Paragraph, inline: &Token) {
        if inline.children.is_empty() {
            if !inline.content.is_empty() {
                paragraph.add_run(inline.content.clone());
            }
            return;
        }

        let mut bold = false;
        let mut italic = false;
        let mut children = inline.children.iter();
        while let Some(child) = children.next() {
            match child.kind {
                TokenKind::Text => {
                    let run = paragraph.add_run(child.content.clone());
                    run.bold = bold;
                    run.italic = italic;
                }
                TokenKind::StrongOpen => bold = true,
                TokenKind::StrongClose => bold = false,
                TokenKind::EmOpen => italic = true,
                TokenKind::EmClose => italic = false,
                TokenKind::CodeInline => {
                    let run = paragraph.add_run(child.content.clone());
                    run.fonts = Some(self.code_font);
                }
                TokenKind::Softbreak => {
                    let run = paragraph.add_run(" ");
                    run.bold = bold;
                    run.italic = italic;
                }
                TokenKind::Hardbreak => {
                    paragraph.add_run("\n");
                }
                TokenKind::LinkOpen => {
                    let href = child.attr("href").unwrap_or_default();
                    let mut label: Option<EcoString> = None;
                    for inner in children.by_ref() {
                        if inner.kind == TokenKind::LinkClose {
                            break;
                        }
                        if label.is_none() && inner.kind == TokenKind::Text {
                            label = Some(inner.content.clone());
                        }
                    }
                    let label = label.unwrap_or_else(|| href.into());
                    if href.is_empty() || href.starts_with('#') {
                        // Internal targets are not resolved.
                        paragraph.add_run(label);
                    } else {
                        paragraph.push(Inline::Hyperlink {
                            url: href.into(),
                            run: Run::new(label),
                        });
                    }
                }
                kind => debug!("skipping unsupported inline `{kind}`"),
            }
        }
    }
}
