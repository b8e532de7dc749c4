//! The fixed set of named styles and the page geometry.

use std::fmt;

use crate::config::{
    font_or, lookup_font, Alignment, ConvertConfig, FontPair, IndentStyle, Orientation,
};
use crate::model::{inches, points};

/// A named style slot. Every slot always has a definition in a [`StyleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    /// Body text, the document's `Normal` style.
    Body,
    /// Level-1 headings.
    Heading1,
    /// Level-2 headings.
    Heading2,
    /// Level-3 headings.
    Heading3,
    /// Monospace code text.
    CodeText,
    /// The language strip above a code block.
    CodeHeader,
    /// Table cells, without any indentation.
    TableCell,
    /// Paragraphs inside lists.
    ListVisual,
    /// Loose top-level bullet lines.
    Hanging,
}

impl StyleSlot {
    /// All slots, in registration order.
    pub const ALL: [StyleSlot; 9] = [
        StyleSlot::Body,
        StyleSlot::Heading1,
        StyleSlot::Heading2,
        StyleSlot::Heading3,
        StyleSlot::CodeText,
        StyleSlot::CodeHeader,
        StyleSlot::TableCell,
        StyleSlot::ListVisual,
        StyleSlot::Hanging,
    ];

    /// The style id written to the document.
    pub fn id(self) -> &'static str {
        match self {
            StyleSlot::Body => "Normal",
            StyleSlot::Heading1 => "Heading1",
            StyleSlot::Heading2 => "Heading2",
            StyleSlot::Heading3 => "Heading3",
            StyleSlot::CodeText => "CodeBlockText",
            StyleSlot::CodeHeader => "CodeBlockHeader",
            StyleSlot::TableCell => "TableCellClean",
            StyleSlot::ListVisual => "ListParagraphVisual",
            StyleSlot::Hanging => "HangingParagraph",
        }
    }

    /// The human readable style name.
    pub fn display_name(self) -> &'static str {
        match self {
            StyleSlot::Body => "Normal",
            StyleSlot::Heading1 => "Heading 1",
            StyleSlot::Heading2 => "Heading 2",
            StyleSlot::Heading3 => "Heading 3",
            StyleSlot::CodeText => "Code Block Text",
            StyleSlot::CodeHeader => "Code Block Header",
            StyleSlot::TableCell => "Table Cell Clean",
            StyleSlot::ListVisual => "List Paragraph Visual",
            StyleSlot::Hanging => "Hanging Paragraph",
        }
    }

    /// The heading style of a level, or body text beyond level 3.
    pub fn heading(level: usize) -> StyleSlot {
        match level {
            1 => StyleSlot::Heading1,
            2 => StyleSlot::Heading2,
            3 => StyleSlot::Heading3,
            _ => StyleSlot::Body,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StyleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A paragraph style definition.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDef {
    /// The slot this definition fills.
    pub slot: StyleSlot,
    /// The slot this style inherits from.
    pub based_on: Option<StyleSlot>,
    /// Latin and CJK fonts.
    pub fonts: FontPair,
    /// Font size in points.
    pub size_pt: f32,
    /// Bold text.
    pub bold: bool,
    /// Text color as `RRGGBB`.
    pub color: Option<&'static str>,
    /// Paragraph alignment.
    pub alignment: Option<Alignment>,
    /// Space before in twips.
    pub space_before: Option<i32>,
    /// Space after in twips.
    pub space_after: Option<i32>,
    /// Line spacing as a multiple of single spacing.
    pub line_spacing: Option<f32>,
    /// First-line indent in twips. Zero cancels the body indent.
    pub first_line_indent: Option<i32>,
}

impl StyleDef {
    fn new(slot: StyleSlot, fonts: FontPair, size_pt: f32) -> Self {
        Self {
            slot,
            based_on: None,
            fonts,
            size_pt,
            bold: false,
            color: None,
            alignment: None,
            space_before: None,
            space_after: None,
            line_spacing: None,
            first_line_indent: None,
        }
    }

    /// Font size in half-points, as word processors store it.
    pub fn half_points(&self) -> usize {
        (self.size_pt * 2.0).round().max(1.0) as usize
    }
}

/// One definition per [`StyleSlot`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSet {
    styles: Vec<StyleDef>,
}

impl StyleSet {
    /// The definition of a slot.
    pub fn get(&self, slot: StyleSlot) -> &StyleDef {
        &self.styles[slot.index()]
    }

    /// All definitions, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDef> {
        self.styles.iter()
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        build_styles(&ConvertConfig::default())
    }
}

fn create_heading_style(slot: StyleSlot, fonts: FontPair, size_pt: f32, level: usize) -> StyleDef {
    StyleDef {
        bold: true,
        first_line_indent: Some(0),
        alignment: Some(if level == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        }),
        space_before: Some(points(if level == 1 { 24.0 } else { 18.0 })),
        space_after: Some(points(if level == 1 { 18.0 } else { 12.0 })),
        ..StyleDef::new(slot, fonts, size_pt)
    }
}

/// Builds every style from the configuration.
pub fn build_styles(config: &ConvertConfig) -> StyleSet {
    let body_font = font_or(&config.body_font, "song");
    let heading_font = font_or(&config.heading_font, "hei");
    let code_font = font_or(&config.code_font, "courier");
    let size = config.font_size;

    let styles = StyleSlot::ALL
        .iter()
        .map(|&slot| match slot {
            StyleSlot::Body => StyleDef {
                alignment: Some(config.alignment),
                line_spacing: Some(config.line_spacing),
                space_before: Some(points(config.space_before)),
                space_after: Some(points(config.space_after)),
                first_line_indent: match config.indent_style {
                    IndentStyle::None => None,
                    IndentStyle::FirstLine2 => Some(inches(0.3)),
                },
                ..StyleDef::new(slot, body_font, size)
            },
            StyleSlot::Heading1 => create_heading_style(slot, heading_font, 16.0, 1),
            StyleSlot::Heading2 => create_heading_style(slot, heading_font, 15.0, 2),
            StyleSlot::Heading3 => create_heading_style(slot, heading_font, 14.0, 3),
            StyleSlot::CodeText => StyleDef {
                alignment: Some(Alignment::Left),
                line_spacing: Some(1.0),
                first_line_indent: Some(0),
                ..StyleDef::new(slot, code_font, (size - 2.0).max(9.0))
            },
            StyleSlot::CodeHeader => StyleDef {
                bold: true,
                color: Some("3C3C3C"),
                alignment: Some(Alignment::Left),
                first_line_indent: Some(0),
                ..StyleDef::new(slot, lookup_font("hei").unwrap_or(heading_font), 9.0)
            },
            StyleSlot::TableCell => StyleDef {
                line_spacing: Some(1.0),
                first_line_indent: Some(0),
                space_before: Some(0),
                space_after: Some(0),
                ..StyleDef::new(slot, body_font, size)
            },
            StyleSlot::ListVisual | StyleSlot::Hanging => StyleDef {
                based_on: Some(StyleSlot::Body),
                first_line_indent: Some(0),
                ..StyleDef::new(slot, body_font, size)
            },
        })
        .collect();

    StyleSet { styles }
}

/// Page size, margins and orientation, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    /// Page width.
    pub width: i32,
    /// Page height.
    pub height: i32,
    /// Top margin.
    pub margin_top: i32,
    /// Bottom margin.
    pub margin_bottom: i32,
    /// Left margin.
    pub margin_left: i32,
    /// Right margin.
    pub margin_right: i32,
    /// Orientation; width and height are already swapped for landscape.
    pub orientation: Orientation,
}

impl PageSetup {
    /// Letter paper with the configured margins.
    pub fn from_config(config: &ConvertConfig) -> Self {
        let (width, height) = match config.orientation {
            Orientation::Portrait => (inches(8.5), inches(11.0)),
            Orientation::Landscape => (inches(11.0), inches(8.5)),
        };
        Self {
            width,
            height,
            margin_top: inches(config.page_margin_top),
            margin_bottom: inches(config.page_margin_bottom),
            margin_left: inches(config.page_margin_left),
            margin_right: inches(config.page_margin_right),
            orientation: config.orientation,
        }
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::from_config(&ConvertConfig::default())
    }
}
