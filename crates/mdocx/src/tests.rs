use super::*;

use crate::model::{Block, Paragraph, Table};
use crate::token::{Token, TokenKind};

mod contents;
mod inline;
mod options;
mod packing;

fn doc(markdown: &str) -> Document {
    convert_document(markdown).expect("conversion succeeds")
}

fn doc_with(config: ConvertConfig, markdown: &str) -> Document {
    Converter::new(config)
        .convert_document(markdown)
        .expect("conversion succeeds")
}

fn outline(markdown: &str) -> String {
    doc(markdown).outline()
}

fn paragraphs(doc: &Document) -> Vec<&Paragraph> {
    doc.paragraphs().collect()
}

fn only_table(doc: &Document) -> &Table {
    let tables: Vec<_> = doc.tables().collect();
    assert_eq!(tables.len(), 1, "expected exactly one table");
    tables[0]
}

/// `open, inline(text), close` as the parser would emit it.
fn triple(open: Token, close: Token, text: &str) -> Vec<Token> {
    vec![open, Token::inline(vec![Token::text(TokenKind::Text, text)]), close]
}

#[test]
fn scenario_heading_and_paragraph() {
    let doc = doc("# Title\n\nHello **world**.");
    assert_eq!(doc.blocks.len(), 2);

    insta::assert_snapshot!(doc.outline(), @r#"
    p:Heading1 #_Ref000001
      run "Title"
    p:Normal
      run "Hello "
      run "world" +b
      run "."
    "#);
}

#[test]
fn empty_input_is_rejected() {
    for input in ["", "   ", "\n\t  \n"] {
        let err = convert(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        let err = convert_document(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }
}

#[test]
fn missing_inline_is_fatal() {
    let tokens = vec![
        Token::new(TokenKind::HeadingOpen).with_tag("h1"),
        Token::new(TokenKind::HeadingClose).with_tag("h1"),
    ];
    let err = Converter::default()
        .transform_tokens("# x", &tokens)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structure);
    assert!(err.to_string().contains("expected `inline`"), "{err}");
}

#[test]
fn missing_close_is_fatal() {
    let tokens = vec![
        Token::new(TokenKind::ParagraphOpen).with_tag("p"),
        Token::inline(vec![Token::text(TokenKind::Text, "dangling")]),
        Token::new(TokenKind::HeadingClose).with_tag("h1"),
    ];
    let err = Converter::default()
        .transform_tokens("dangling", &tokens)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structure);
}

#[test]
fn heading_without_level_is_fatal() {
    let tokens = triple(
        Token::new(TokenKind::HeadingOpen).with_tag("hx"),
        Token::new(TokenKind::HeadingClose).with_tag("hx"),
        "Broken",
    );
    let err = Converter::default()
        .transform_tokens("Broken", &tokens)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structure);
}

#[test]
fn unsupported_blocks_are_skipped() {
    let doc = doc("> quoted\n\n---\n\n<div>raw</div>\n\nafter");
    let texts: Vec<_> = paragraphs(&doc).iter().map(|p| p.text()).collect();
    // The quote's paragraph is still emitted; the rule and the html are not.
    assert_eq!(texts, ["quoted", "after"]);
}

#[test]
fn output_name_has_second_resolution() {
    let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|date| date.and_hms_opt(3, 4, 5))
        .expect("valid timestamp");
    assert_eq!(output_file_name(now), "Markdown_Doc_20240102_030405.docx");
}

#[test]
fn cell_emphasis_leaves_no_empty_text() {
    let tokens = token::parse("| A |\n|---|\n| **y** |");
    let cell = tokens
        .iter()
        .skip_while(|token| token.kind != TokenKind::TdOpen)
        .find(|token| token.kind == TokenKind::Inline)
        .expect("a body cell");
    let children: Vec<_> = cell
        .children
        .iter()
        .map(|child| (child.kind, child.content.as_str()))
        .collect();
    assert_eq!(
        children,
        [
            (TokenKind::StrongOpen, ""),
            (TokenKind::Text, "y"),
            (TokenKind::StrongClose, ""),
        ]
    );
}
