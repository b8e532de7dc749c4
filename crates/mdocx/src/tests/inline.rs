use super::*;

use crate::config::lookup_font;
use crate::inline::InlineFormatter;
use crate::model::{Inline, Run};
use crate::styles::StyleSlot;

fn styles(paragraph: &Paragraph) -> Vec<(String, bool, bool)> {
    paragraph
        .runs()
        .map(|run| (run.text.to_string(), run.bold, run.italic))
        .collect()
}

#[test]
fn toggles_follow_emphasis() {
    let doc = doc("**bold** plain *italic*");
    let paragraph = paragraphs(&doc)[0];
    assert_eq!(
        styles(paragraph),
        [
            ("bold".to_owned(), true, false),
            (" plain ".to_owned(), false, false),
            ("italic".to_owned(), false, true),
        ]
    );
}

#[test]
fn nested_emphasis() {
    insta::assert_snapshot!(outline("***both*** and **bold *mixed***"), @r#"
    p:Normal
      run "both" +b +i
      run " and "
      run "bold " +b
      run "mixed" +b +i
    "#);
}

#[test]
fn stray_close_only_clears() {
    let inline = Token::inline(vec![
        Token::new(TokenKind::StrongClose),
        Token::text(TokenKind::Text, "plain"),
        Token::new(TokenKind::EmOpen),
        Token::text(TokenKind::Text, "slanted"),
    ]);
    let mut paragraph = Paragraph::new(StyleSlot::Body);
    InlineFormatter::new(lookup_font("courier").expect("known font"))
        .render(&mut paragraph, &inline);

    assert_eq!(
        styles(&paragraph),
        [
            ("plain".to_owned(), false, false),
            ("slanted".to_owned(), false, true),
        ]
    );
}

#[test]
fn code_and_links() {
    insta::assert_snapshot!(
        outline("Use `code` and [site](https://example.com) or [local](#sec)."),
        @r#"
    p:Normal
      run "Use "
      run "code" font=Courier New
      run " and "
      link <https://example.com> "site"
      run " or "
      run "local"
      run "."
    "#);
}

#[test]
fn code_ignores_emphasis() {
    let doc = doc("**see `x`**");
    let runs: Vec<&Run> = paragraphs(&doc)[0].runs().collect();
    assert_eq!(runs.len(), 2);
    assert!(runs[0].bold);
    assert!(!runs[1].bold);
    assert_eq!(runs[1].fonts.map(|f| f.latin), Some("Courier New"));
}

#[test]
fn code_font_follows_config() {
    let config = ConvertConfig {
        code_font: "cons".into(),
        ..ConvertConfig::default()
    };
    let doc = doc_with(config, "`x`");
    let run = paragraphs(&doc)[0].runs().next().expect("a run");
    assert_eq!(run.fonts.map(|f| f.latin), Some("Consolas"));
}

#[test]
fn link_without_text_shows_href() {
    let inline = Token::inline(vec![
        Token::new(TokenKind::LinkOpen).with_attr("href", "https://example.org"),
        Token::new(TokenKind::LinkClose),
    ]);
    let mut paragraph = Paragraph::new(StyleSlot::Body);
    InlineFormatter::new(lookup_font("courier").expect("known font"))
        .render(&mut paragraph, &inline);

    assert_eq!(
        paragraph.children,
        [Inline::Hyperlink {
            url: "https://example.org".into(),
            run: Run::new("https://example.org"),
        }]
    );
}

#[test]
fn breaks() {
    insta::assert_snapshot!(outline("soft\nwrap\n\nhard  \nbreak"), @r#"
    p:Normal
      run "soft"
      run " "
      run "wrap"
    p:Normal
      run "hard"
      run "\n"
      run "break"
    "#);
}

#[test]
fn images_and_html_are_skipped() {
    let doc = doc("before ![alt](fig.png) <b>after</b>");
    assert_eq!(paragraphs(&doc)[0].text(), "before  after");
}

#[test]
fn childless_inline_keeps_content() {
    let inline = Token::text(TokenKind::Inline, "raw *content*");
    let mut paragraph = Paragraph::new(StyleSlot::Body);
    InlineFormatter::new(lookup_font("courier").expect("known font"))
        .render(&mut paragraph, &inline);
    assert_eq!(styles(&paragraph), [("raw *content*".to_owned(), false, false)]);
}
