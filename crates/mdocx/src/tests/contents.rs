use super::*;

use crate::anchors::{build_anchor_map, PAGE_PLACEHOLDER};
use crate::config::Alignment;
use crate::model::{Inline, TabAlignment, TabLeader};
use crate::styles::StyleSlot;
use crate::token::parse;
use crate::transform::{CONTENTS_TAB, LIST_STEP};

fn bookmark_of<'a>(doc: &'a Document, text: &str) -> Option<&'a str> {
    doc.paragraphs()
        .filter(|p| p.text() == text)
        .find_map(|p| p.bookmark.as_ref())
        .map(|b| b.name.as_str())
}

#[test]
fn contents_paragraph_before_list() {
    let doc = doc("目录\n\n- Intro\n- Conclusion\n\n# Intro\n\n# Conclusion");

    insta::assert_snapshot!(doc.outline(), @r#"
    p:Heading1 align=center tab=8640r.
      run "目录"
    p:Normal indent=0/0 tab=8640r.
      run "Intro"
      run "\t"
      pageref _Ref000001
    p:Normal indent=0/0 tab=8640r.
      run "Conclusion"
      run "\t"
      pageref _Ref000002
    p:Heading1 #_Ref000001
      run "Intro"
    p:Heading1 #_Ref000002
      run "Conclusion"
    "#);
}

#[test]
fn entries_point_at_heading_bookmarks() {
    let doc = doc("# 目录\n\n1. Setup\n2. Usage\n\n## Setup\n\ntext\n\n## Usage");
    let paragraphs = paragraphs(&doc);

    let heading = paragraphs[0];
    assert_eq!(heading.style, StyleSlot::Heading1);
    assert_eq!(heading.alignment, Some(Alignment::Center));
    assert_eq!(heading.tabs.len(), 1);
    assert_eq!(heading.tabs[0].pos, CONTENTS_TAB);
    assert_eq!(heading.tabs[0].alignment, TabAlignment::Right);
    assert_eq!(heading.tabs[0].leader, TabLeader::Dot);

    for (entry, text) in paragraphs[1..3].iter().zip(["Setup", "Usage"]) {
        let refs: Vec<_> = entry.page_refs().collect();
        assert_eq!(refs, [bookmark_of(&doc, text).expect("heading is bookmarked")]);
        assert_eq!(entry.text(), format!("{text}\t"));
    }
    // The list is consumed by the contents block.
    assert!(paragraphs.iter().all(|p| p.style != StyleSlot::ListVisual));
}

#[test]
fn contents_heading_is_bookmarked() {
    let doc = doc("# 目录\n\n- Only");
    let heading = paragraphs(&doc)[0];
    assert_eq!(
        heading.bookmark.as_ref().map(|b| b.name.as_str()),
        Some("_Ref000001")
    );
}

#[test]
fn unmatched_entries_have_no_field() {
    let doc = doc("# 目录\n\n- Missing\n- Present\n\n# Present");
    let paragraphs = paragraphs(&doc);
    assert_eq!(paragraphs[1].text(), "Missing\t");
    assert_eq!(paragraphs[1].page_refs().count(), 0);
    assert_eq!(paragraphs[2].page_refs().count(), 1);
}

#[test]
fn nested_entries_are_indented() {
    let doc = doc("目录\n\n- A\n  - B\n- C\n\n# A\n\n## B\n\n# C");
    let entries: Vec<_> = paragraphs(&doc)[1..4]
        .iter()
        .map(|p| (p.runs().next().map(|r| r.text.to_string()), p.indent.map(|i| i.left)))
        .collect();
    assert_eq!(
        entries,
        [
            (Some("A".to_owned()), Some(0)),
            (Some("B".to_owned()), Some(LIST_STEP)),
            (Some("C".to_owned()), Some(0)),
        ]
    );
}

#[test]
fn contents_without_list() {
    insta::assert_snapshot!(outline("# 目录\n\nJust text."), @r#"
    p:Heading1 align=center tab=8640r. #_Ref000001
      run "目录"
    p:Normal
      run "Just text."
    "#);
}

#[test]
fn keyword_paragraph_without_list_is_plain() {
    let doc = doc("目录\n\nSome text.");
    let first = paragraphs(&doc)[0];
    assert_eq!(first.style, StyleSlot::Body);
    // Still one of the centered keywords.
    assert_eq!(first.alignment, Some(Alignment::Center));
    assert!(first.tabs.is_empty());
}

#[test]
fn contents_inside_a_list_is_not_special() {
    let doc = doc("- 目录\n  - nested");
    assert!(
        paragraphs(&doc)
            .iter()
            .all(|p| p.style == StyleSlot::ListVisual)
    );
}

#[test]
fn custom_keyword() {
    let config = ConvertConfig::from_options(
        &[("contents_keyword".to_owned(), "Contents".to_owned())].into(),
    );
    let doc = doc_with(config, "## Contents\n\n- Body\n\n# Body");
    let paras = paragraphs(&doc);
    assert_eq!(paras[0].style, StyleSlot::Heading1);
    assert_eq!(paras[1].page_refs().count(), 1);

    // Under the default keyword this is an ordinary heading.
    let doc = doc_with(ConvertConfig::default(), "## Contents\n\n- Body");
    assert_eq!(paragraphs(&doc)[0].style, StyleSlot::Heading2);
}

#[test]
fn anchor_map_is_deterministic() {
    let tokens = parse("# A\n\n## B\n\n###   \n\n# A");
    let anchors = build_anchor_map(&tokens);
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors.get("A"), Some("_Ref000003"));
    assert_eq!(anchors.get("B"), Some("_Ref000002"));
    assert_eq!(build_anchor_map(&tokens), anchors);
}

#[test]
fn page_reference_placeholder() {
    let doc = doc("# 目录\n\n- X\n\n# X");
    let placeholder = paragraphs(&doc)[1].children.iter().find_map(|inline| match inline {
        Inline::PageRef { placeholder, .. } => Some(placeholder.to_string()),
        _ => None,
    });
    assert_eq!(placeholder.as_deref(), Some(PAGE_PLACEHOLDER));
}
