use std::collections::HashMap;

use super::*;

use crate::config::{Alignment, IndentStyle, Orientation, TableAlignMode, font_or, lookup_font};
use crate::model::{inches, points};
use crate::styles::{PageSetup, StyleSlot, build_styles};

fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn defaults() {
    let config = ConvertConfig::default();
    assert_eq!(config.page_margin_top, 1.0);
    assert_eq!(config.page_margin_left, 1.25);
    assert_eq!(config.orientation, Orientation::Portrait);
    assert_eq!(config.font_size, 12.0);
    assert_eq!(config.line_spacing, 1.25);
    assert_eq!(config.alignment, Alignment::Justify);
    assert_eq!(config.indent_style, IndentStyle::None);
    assert_eq!(config.contents_keyword, "目录");
    assert_eq!(ConvertConfig::from_options(&HashMap::new()), config);
}

#[test]
fn form_options() {
    let config = ConvertConfig::from_options(&options(&[
        ("orientation", "landscape"),
        ("font_size", "14"),
        ("alignment", "center"),
        ("indent_style", "first_line_2"),
        ("body_font", "kai"),
        ("page_margin_left", " 0.5 "),
        ("table_alignment", "column"),
    ]));
    assert_eq!(config.orientation, Orientation::Landscape);
    assert_eq!(config.font_size, 14.0);
    assert_eq!(config.alignment, Alignment::Center);
    assert_eq!(config.indent_style, IndentStyle::FirstLine2);
    assert_eq!(config.body_font, "kai");
    assert_eq!(config.page_margin_left, 0.5);
    assert_eq!(config.table_alignment, TableAlignMode::Column);
}

#[test]
fn bad_options_keep_defaults() {
    let mut config = ConvertConfig::from_options(&options(&[
        ("font_size", "large"),
        ("body_font", "comic"),
        ("alignment", "diagonal"),
        ("no_such_option", "1"),
    ]));
    assert_eq!(config, ConvertConfig::default());

    assert!(!config.set("contents_keyword", "  "));
    assert!(config.set("code_block", "plain"));
}

#[test]
fn toml_layer() {
    let config = ConvertConfig::from_toml_str(
        r#"
        font_size = 10.5
        orientation = "landscape"
        code_block = "plain"
        "#,
    )
    .expect("valid configuration");
    assert_eq!(config.font_size, 10.5);
    assert_eq!(config.orientation, Orientation::Landscape);
    assert_eq!(config.heading_font, "hei");

    let err = ConvertConfig::from_toml_str("font_size = \"big\"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn font_table() {
    let song = lookup_font("song").expect("known font");
    assert_eq!((song.latin, song.cjk), ("Times New Roman", "宋体"));
    assert_eq!(lookup_font("comic"), None);
    assert_eq!(font_or("comic", "hei"), lookup_font("hei").expect("known font"));
}

#[test]
fn one_style_per_slot() {
    let styles = build_styles(&ConvertConfig::default());
    let slots: Vec<_> = styles.iter().map(|def| def.slot).collect();
    assert_eq!(slots, StyleSlot::ALL);
    for slot in StyleSlot::ALL {
        assert_eq!(styles.get(slot).slot, slot);
    }
}

#[test]
fn heading_styles() {
    let styles = build_styles(&ConvertConfig::default());
    let heading = |slot| {
        let def = styles.get(slot);
        (def.size_pt, def.bold, def.alignment, def.space_before, def.space_after)
    };
    assert_eq!(
        heading(StyleSlot::Heading1),
        (16.0, true, Some(Alignment::Center), Some(points(24.0)), Some(points(18.0)))
    );
    assert_eq!(
        heading(StyleSlot::Heading2),
        (15.0, true, Some(Alignment::Left), Some(points(18.0)), Some(points(12.0)))
    );
    assert_eq!(heading(StyleSlot::Heading3).0, 14.0);
    assert_eq!(styles.get(StyleSlot::Heading1).fonts.cjk, "黑体");
}

#[test]
fn body_style_follows_config() {
    let config = ConvertConfig::from_options(&options(&[
        ("font_size", "10"),
        ("line_spacing", "1.5"),
        ("indent_style", "first_line_2"),
        ("space_after", "6"),
        ("code_font", "menlo"),
    ]));
    let styles = build_styles(&config);

    let body = styles.get(StyleSlot::Body);
    assert_eq!(body.half_points(), 20);
    assert_eq!(body.line_spacing, Some(1.5));
    assert_eq!(body.first_line_indent, Some(inches(0.3)));
    assert_eq!(body.space_after, Some(points(6.0)));

    let code = styles.get(StyleSlot::CodeText);
    assert_eq!(code.size_pt, 9.0);
    assert_eq!(code.fonts.latin, "Menlo");

    let large = build_styles(&ConvertConfig {
        font_size: 14.0,
        ..ConvertConfig::default()
    });
    assert_eq!(large.get(StyleSlot::CodeText).size_pt, 12.0);
}

#[test]
fn page_setup() {
    let portrait = PageSetup::default();
    assert_eq!((portrait.width, portrait.height), (inches(8.5), inches(11.0)));
    assert_eq!(portrait.margin_left, inches(1.25));

    let landscape = PageSetup::from_config(&ConvertConfig {
        orientation: Orientation::Landscape,
        ..ConvertConfig::default()
    });
    assert_eq!((landscape.width, landscape.height), (inches(11.0), inches(8.5)));
}

#[test]
fn configured_document_geometry() {
    let doc = doc_with(
        ConvertConfig::from_options(&options(&[("page_margin_top", "2")])),
        "text",
    );
    assert_eq!(doc.page.margin_top, inches(2.0));
    assert_eq!(doc.styles.get(StyleSlot::Body).alignment, Some(Alignment::Justify));
}
