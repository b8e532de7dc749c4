use super::*;

use crate::config::Orientation;

const SAMPLE: &str = "\
# 目录

- Overview
- Details

# Overview

Body with a [link](https://example.com) and `code`.

## Details

| A | B |
|---|---|
| 1 | 2 |

```text
line one
	tabbed
```
";

fn document_xml(doc: &Document) -> String {
    let xml = DocxWriter::new().render(doc).build();
    String::from_utf8_lossy(&xml.document).into_owned()
}

#[test]
fn packs_a_zip_archive() {
    let bytes = convert(SAMPLE).expect("conversion succeeds");
    assert!(bytes.len() > 4);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn fields_and_bookmarks_are_written() {
    let xml = document_xml(&doc(SAMPLE));
    assert!(xml.contains("PAGEREF"), "missing page reference field");
    assert!(xml.contains("bookmarkStart"), "missing bookmark");
    assert!(xml.contains("_Ref000002"));
    assert!(xml.contains("https://example.com") || xml.contains("hyperlink"));
    assert!(xml.contains("D9D9D9"));
}

#[test]
fn styles_are_registered() {
    let xml = DocxWriter::new().render(&doc(SAMPLE)).build();
    let styles = String::from_utf8_lossy(&xml.styles).into_owned();
    for id in [
        "Heading1",
        "CodeBlockText",
        "CodeBlockHeader",
        "TableCellClean",
        "ListParagraphVisual",
        "HangingParagraph",
        "Hyperlink",
    ] {
        assert!(styles.contains(id), "missing style {id}");
    }
    assert!(styles.contains("黑体"));
}

#[test]
fn landscape_pages() {
    let config = ConvertConfig {
        orientation: Orientation::Landscape,
        ..ConvertConfig::default()
    };
    let bytes = Converter::new(config)
        .convert("text")
        .expect("conversion succeeds");
    assert_eq!(&bytes[..2], b"PK");

    let doc = doc_with(
        ConvertConfig {
            orientation: Orientation::Landscape,
            ..ConvertConfig::default()
        },
        "text",
    );
    assert!(document_xml(&doc).contains("landscape"));
}

#[test]
fn mime_type() {
    assert_eq!(
        DOCX_MIME_TYPE,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
}

#[test]
fn run_overrides_are_written() {
    let mut doc = Document::default();
    let run = doc
        .add_paragraph(crate::styles::StyleSlot::Body)
        .add_run("bold\tand\nbroken");
    run.bold = true;

    let xml = document_xml(&doc);
    assert!(xml.contains("<w:b"));
    assert!(xml.contains("<w:tab"));
    assert!(xml.contains("textWrapping"));
}

#[test]
fn table_cells_are_vertically_centered() {
    let xml = document_xml(&doc("| A |\n|---|\n| 1 |"));
    assert!(xml.contains("vAlign"));
}
