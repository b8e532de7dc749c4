//! Heading bookmarks and page-reference fields.

use std::collections::HashMap;

use ecow::{eco_format, EcoString};

use crate::model::{Bookmark, Inline, Paragraph};
use crate::token::{Token, TokenKind};

/// Placeholder shown by a page-reference field until the viewer updates it.
pub const PAGE_PLACEHOLDER: &str = "1";

/// Maps trimmed heading text to the bookmark name of that heading.
///
/// Built once before the transform. Repeated heading texts keep the last
/// name assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorMap {
    anchors: HashMap<EcoString, EcoString>,
}

impl AnchorMap {
    /// The bookmark name for a heading text.
    pub fn get(&self, text: &str) -> Option<&str> {
        self.anchors.get(text).map(EcoString::as_str)
    }

    /// Number of distinct heading texts.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether no heading has text.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Assigns a bookmark name to every heading with non-empty text.
pub fn build_anchor_map(tokens: &[Token]) -> AnchorMap {
    let mut anchors = HashMap::new();
    let mut counter = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::HeadingOpen {
            continue;
        }
        let Some(inline) = tokens.get(idx + 1).filter(|t| t.kind == TokenKind::Inline) else {
            continue;
        };
        let text = inline.trimmed();
        if text.is_empty() {
            continue;
        }
        counter += 1;
        anchors.insert(EcoString::from(text), eco_format!("_Ref{counter:06}"));
    }
    AnchorMap { anchors }
}

/// Marks the whole paragraph as the bookmark `name`.
pub fn stamp_anchor(paragraph: &mut Paragraph, id: usize, name: &str) {
    paragraph.bookmark = Some(Bookmark {
        id,
        name: name.into(),
    });
}

/// Appends a field showing the page number of bookmark `anchor`.
pub fn insert_page_reference(paragraph: &mut Paragraph, anchor: &str) {
    paragraph.push(Inline::PageRef {
        anchor: anchor.into(),
        placeholder: PAGE_PLACEHOLDER.into(),
    });
}
