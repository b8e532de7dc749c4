//! A flat markdown token stream.
//!
//! The transformer walks tokens shaped like markdown-it's output: blocks are
//! bracketed by `*_open`/`*_close` tokens, and every run of inline content is a
//! single [`TokenKind::Inline`] token whose children are themselves flat
//! (`strong_open`, `text`, `strong_close`, ...). [`parse`] produces this shape
//! from `pulldown-cmark` events.

use std::borrow::Cow;
use std::fmt;

use ecow::EcoString;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};

/// The construct a [`Token`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    Inline,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,
    Fence,
    CodeBlock,
    BlockquoteOpen,
    BlockquoteClose,
    Hr,
    HtmlBlock,
    // Inline children.
    Text,
    Softbreak,
    Hardbreak,
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
    StrikeOpen,
    StrikeClose,
    CodeInline,
    LinkOpen,
    LinkClose,
    Image,
    HtmlInline,
}

impl TokenKind {
    /// The markdown-it name of this kind.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            HeadingOpen => "heading_open",
            HeadingClose => "heading_close",
            ParagraphOpen => "paragraph_open",
            ParagraphClose => "paragraph_close",
            Inline => "inline",
            BulletListOpen => "bullet_list_open",
            BulletListClose => "bullet_list_close",
            OrderedListOpen => "ordered_list_open",
            OrderedListClose => "ordered_list_close",
            ListItemOpen => "list_item_open",
            ListItemClose => "list_item_close",
            TableOpen => "table_open",
            TableClose => "table_close",
            TheadOpen => "thead_open",
            TheadClose => "thead_close",
            TbodyOpen => "tbody_open",
            TbodyClose => "tbody_close",
            TrOpen => "tr_open",
            TrClose => "tr_close",
            ThOpen => "th_open",
            ThClose => "th_close",
            TdOpen => "td_open",
            TdClose => "td_close",
            Fence => "fence",
            CodeBlock => "code_block",
            BlockquoteOpen => "blockquote_open",
            BlockquoteClose => "blockquote_close",
            Hr => "hr",
            HtmlBlock => "html_block",
            Text => "text",
            Softbreak => "softbreak",
            Hardbreak => "hardbreak",
            StrongOpen => "strong_open",
            StrongClose => "strong_close",
            EmOpen => "em_open",
            EmClose => "em_close",
            StrikeOpen => "s_open",
            StrikeClose => "s_close",
            CodeInline => "code_inline",
            LinkOpen => "link_open",
            LinkClose => "link_close",
            Image => "image",
            HtmlInline => "html_inline",
        }
    }

    /// Whether this kind opens a list container.
    pub fn is_list_open(self) -> bool {
        matches!(self, TokenKind::BulletListOpen | TokenKind::OrderedListOpen)
    }

    /// Whether this kind closes a list container.
    pub fn is_list_close(self) -> bool {
        matches!(self, TokenKind::BulletListClose | TokenKind::OrderedListClose)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed unit of markdown structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token stands for.
    pub kind: TokenKind,
    /// The HTML tag of the construct, e.g. `h2` for a level-2 heading.
    pub tag: EcoString,
    /// Text of inline, text, code and fence tokens.
    pub content: EcoString,
    /// The info string of a fence.
    pub info: EcoString,
    /// Extra attributes such as `href`, `start` and `align`.
    pub attrs: Vec<(EcoString, EcoString)>,
    /// Flat inline children of an [`TokenKind::Inline`] token.
    pub children: Vec<Token>,
}

impl Token {
    /// Creates an empty token of the given kind.
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            tag: EcoString::new(),
            content: EcoString::new(),
            info: EcoString::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a token carrying text content.
    pub fn text(kind: TokenKind, content: impl Into<EcoString>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(kind)
        }
    }

    /// Creates an inline token from its children, deriving `content`.
    pub fn inline(children: Vec<Token>) -> Self {
        let mut content = EcoString::new();
        for child in &children {
            match child.kind {
                TokenKind::Text | TokenKind::CodeInline => content.push_str(&child.content),
                TokenKind::Softbreak | TokenKind::Hardbreak => content.push('\n'),
                _ => {}
            }
        }
        Self {
            content,
            children,
            ..Self::new(TokenKind::Inline)
        }
    }

    /// Sets the HTML tag.
    pub fn with_tag(mut self, tag: impl Into<EcoString>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Adds an attribute.
    pub fn with_attr(mut self, key: impl Into<EcoString>, value: impl Into<EcoString>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Looks up an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The content with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }

    /// Returns a view whose first text child no longer starts with `marker`.
    ///
    /// The token itself is left untouched; an owned copy is made only when
    /// there is something to strip.
    pub fn with_stripped_marker(&self, marker: &str) -> Cow<'_, Token> {
        let Some(first) = self.children.first() else {
            return Cow::Borrowed(self);
        };
        if first.kind != TokenKind::Text {
            return Cow::Borrowed(self);
        }
        let Some(rest) = first.content.trim_start().strip_prefix(marker) else {
            return Cow::Borrowed(self);
        };

        let mut children = self.children.clone();
        children[0].content = rest.into();
        Cow::Owned(Token::inline(children))
    }
}

/// Parses markdown into a flat token stream.
pub fn parse(source: &str) -> Vec<Token> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut builder = TokenBuilder::default();
    for event in Parser::new_ext(source, options) {
        builder.event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct InlineState {
    children: Vec<Token>,
    /// Opened for a tight list item rather than by a paragraph event.
    implicit: bool,
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    cell: usize,
    in_head: bool,
    body_open: bool,
}

#[derive(Default)]
struct TokenBuilder {
    tokens: Vec<Token>,
    inline: Option<InlineState>,
    code: Option<Token>,
    image: Option<Token>,
    table: Option<TableState>,
}

impl TokenBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(code) = &mut self.code {
                    code.content.push_str(&text);
                } else if let Some(image) = &mut self.image {
                    image.content.push_str(&text);
                } else if !text.is_empty() {
                    // Closing emphasis in a table cell can leave an empty text event.
                    self.push_child(Token::text(TokenKind::Text, text.as_ref()));
                }
            }
            Event::Code(code) => self.push_child(Token::text(TokenKind::CodeInline, code.as_ref())),
            Event::Html(html) => {
                if self.inline.is_some() {
                    self.push_child(Token::text(TokenKind::HtmlInline, html.as_ref()));
                } else if let Some(last) = self
                    .tokens
                    .last_mut()
                    .filter(|t| t.kind == TokenKind::HtmlBlock)
                {
                    last.content.push_str(&html);
                } else {
                    self.tokens
                        .push(Token::text(TokenKind::HtmlBlock, html.as_ref()));
                }
            }
            Event::SoftBreak => self.push_child(Token::new(TokenKind::Softbreak)),
            Event::HardBreak => self.push_child(Token::new(TokenKind::Hardbreak)),
            Event::Rule => self.push_block(Token::new(TokenKind::Hr).with_tag("hr")),
            Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.push_block(Token::new(TokenKind::ParagraphOpen).with_tag("p"));
                self.inline = Some(InlineState::default());
            }
            Tag::Heading(level, _, _) => {
                let tag = format!("h{}", level as usize);
                self.push_block(Token::new(TokenKind::HeadingOpen).with_tag(tag));
                self.inline = Some(InlineState::default());
            }
            Tag::BlockQuote => {
                self.push_block(Token::new(TokenKind::BlockquoteOpen).with_tag("blockquote"))
            }
            Tag::CodeBlock(kind) => {
                self.close_implicit();
                let token = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let mut token = Token::new(TokenKind::Fence).with_tag("code");
                        token.info = info.as_ref().into();
                        token
                    }
                    CodeBlockKind::Indented => Token::new(TokenKind::CodeBlock).with_tag("code"),
                };
                self.code = Some(token);
            }
            Tag::List(Some(start)) => self.push_block(
                Token::new(TokenKind::OrderedListOpen)
                    .with_tag("ol")
                    .with_attr("start", start.to_string()),
            ),
            Tag::List(None) => {
                self.push_block(Token::new(TokenKind::BulletListOpen).with_tag("ul"))
            }
            Tag::Item => self.push_block(Token::new(TokenKind::ListItemOpen).with_tag("li")),
            Tag::FootnoteDefinition(_) => {}
            Tag::Table(alignments) => {
                self.push_block(Token::new(TokenKind::TableOpen).with_tag("table"));
                self.table = Some(TableState {
                    alignments,
                    ..TableState::default()
                });
            }
            Tag::TableHead => {
                self.push_block(Token::new(TokenKind::TheadOpen).with_tag("thead"));
                self.push_block(Token::new(TokenKind::TrOpen).with_tag("tr"));
                if let Some(table) = &mut self.table {
                    table.in_head = true;
                    table.cell = 0;
                }
            }
            Tag::TableRow => {
                let table = self.table.get_or_insert_with(TableState::default);
                let open_body = !table.body_open;
                table.body_open = true;
                table.cell = 0;
                if open_body {
                    self.push_block(Token::new(TokenKind::TbodyOpen).with_tag("tbody"));
                }
                self.push_block(Token::new(TokenKind::TrOpen).with_tag("tr"));
            }
            Tag::TableCell => {
                let (kind, tag, align) = match &self.table {
                    Some(table) => {
                        let (kind, tag) = if table.in_head {
                            (TokenKind::ThOpen, "th")
                        } else {
                            (TokenKind::TdOpen, "td")
                        };
                        (kind, tag, table.alignments.get(table.cell).copied())
                    }
                    None => (TokenKind::TdOpen, "td", None),
                };
                let mut token = Token::new(kind).with_tag(tag);
                if let Some(align) = align.and_then(alignment_name) {
                    token = token.with_attr("align", align);
                }
                self.push_block(token);
                self.inline = Some(InlineState::default());
            }
            Tag::Emphasis => self.push_child(Token::new(TokenKind::EmOpen).with_tag("em")),
            Tag::Strong => self.push_child(Token::new(TokenKind::StrongOpen).with_tag("strong")),
            Tag::Strikethrough => self.push_child(Token::new(TokenKind::StrikeOpen).with_tag("s")),
            Tag::Link(_, href, title) => {
                let mut token = Token::new(TokenKind::LinkOpen)
                    .with_tag("a")
                    .with_attr("href", href.as_ref());
                if !title.is_empty() {
                    token = token.with_attr("title", title.as_ref());
                }
                self.push_child(token);
            }
            Tag::Image(_, src, _) => {
                self.image = Some(
                    Token::new(TokenKind::Image)
                        .with_tag("img")
                        .with_attr("src", src.as_ref()),
                );
            }
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_inline();
                self.tokens
                    .push(Token::new(TokenKind::ParagraphClose).with_tag("p"));
            }
            Tag::Heading(level, _, _) => {
                self.flush_inline();
                let tag = format!("h{}", level as usize);
                self.tokens
                    .push(Token::new(TokenKind::HeadingClose).with_tag(tag));
            }
            Tag::BlockQuote => {
                self.push_block(Token::new(TokenKind::BlockquoteClose).with_tag("blockquote"))
            }
            Tag::CodeBlock(_) => {
                if let Some(code) = self.code.take() {
                    self.tokens.push(code);
                }
            }
            Tag::List(Some(_)) => {
                self.push_block(Token::new(TokenKind::OrderedListClose).with_tag("ol"))
            }
            Tag::List(None) => {
                self.push_block(Token::new(TokenKind::BulletListClose).with_tag("ul"))
            }
            Tag::Item => self.push_block(Token::new(TokenKind::ListItemClose).with_tag("li")),
            Tag::FootnoteDefinition(_) => {}
            Tag::Table(_) => {
                if self.table.take().is_some_and(|table| table.body_open) {
                    self.push_block(Token::new(TokenKind::TbodyClose).with_tag("tbody"));
                }
                self.push_block(Token::new(TokenKind::TableClose).with_tag("table"));
            }
            Tag::TableHead => {
                self.push_block(Token::new(TokenKind::TrClose).with_tag("tr"));
                self.push_block(Token::new(TokenKind::TheadClose).with_tag("thead"));
                if let Some(table) = &mut self.table {
                    table.in_head = false;
                }
            }
            Tag::TableRow => self.push_block(Token::new(TokenKind::TrClose).with_tag("tr")),
            Tag::TableCell => {
                self.flush_inline();
                let in_head = self.table.as_ref().is_some_and(|table| table.in_head);
                let (kind, tag) = if in_head {
                    (TokenKind::ThClose, "th")
                } else {
                    (TokenKind::TdClose, "td")
                };
                self.tokens.push(Token::new(kind).with_tag(tag));
                if let Some(table) = &mut self.table {
                    table.cell += 1;
                }
            }
            Tag::Emphasis => self.push_child(Token::new(TokenKind::EmClose).with_tag("em")),
            Tag::Strong => self.push_child(Token::new(TokenKind::StrongClose).with_tag("strong")),
            Tag::Strikethrough => self.push_child(Token::new(TokenKind::StrikeClose).with_tag("s")),
            Tag::Link(..) => self.push_child(Token::new(TokenKind::LinkClose).with_tag("a")),
            Tag::Image(..) => {
                if let Some(image) = self.image.take() {
                    self.push_child(image);
                }
            }
        }
    }

    /// Appends an inline child, opening a synthetic paragraph if none is open.
    fn push_child(&mut self, child: Token) {
        if self.inline.is_none() {
            self.tokens
                .push(Token::new(TokenKind::ParagraphOpen).with_tag("p"));
            self.inline = Some(InlineState {
                implicit: true,
                ..InlineState::default()
            });
        }
        let Some(inline) = self.inline.as_mut() else {
            return;
        };

        if child.kind == TokenKind::Text {
            if let Some(last) = inline
                .children
                .last_mut()
                .filter(|last| last.kind == TokenKind::Text)
            {
                last.content.push_str(&child.content);
                return;
            }
        }
        inline.children.push(child);
    }

    fn push_block(&mut self, token: Token) {
        self.close_implicit();
        self.tokens.push(token);
    }

    fn flush_inline(&mut self) {
        let children = self.inline.take().map(|s| s.children).unwrap_or_default();
        self.tokens.push(Token::inline(children));
    }

    fn close_implicit(&mut self) {
        if !self.inline.as_ref().is_some_and(|inline| inline.implicit) {
            return;
        }
        self.flush_inline();
        self.tokens
            .push(Token::new(TokenKind::ParagraphClose).with_tag("p"));
    }

    fn finish(mut self) -> Vec<Token> {
        self.close_implicit();
        self.tokens
    }
}

fn alignment_name(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}
