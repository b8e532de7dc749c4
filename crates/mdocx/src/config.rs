//! Conversion options and the fixed lookup tables behind them.

use std::collections::HashMap;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A Latin font family paired with the family used for CJK glyphs.
///
/// The two scripts are selected independently by word processors, so every
/// style carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPair {
    /// Used for `ascii` and `hAnsi` runs.
    pub latin: &'static str,
    /// Used for `eastAsia` runs.
    pub cjk: &'static str,
}

const FONTS: &[(&str, FontPair)] = &[
    (
        "song",
        FontPair {
            latin: "Times New Roman",
            cjk: "宋体",
        },
    ),
    (
        "hei",
        FontPair {
            latin: "Arial",
            cjk: "黑体",
        },
    ),
    (
        "kai",
        FontPair {
            latin: "Times New Roman",
            cjk: "楷体",
        },
    ),
    (
        "fang",
        FontPair {
            latin: "Times New Roman",
            cjk: "仿宋",
        },
    ),
    (
        "yahei",
        FontPair {
            latin: "Microsoft YaHei",
            cjk: "微软雅黑",
        },
    ),
    (
        "deng",
        FontPair {
            latin: "DengXian",
            cjk: "等线",
        },
    ),
    (
        "times",
        FontPair {
            latin: "Times New Roman",
            cjk: "宋体",
        },
    ),
    (
        "cons",
        FontPair {
            latin: "Consolas",
            cjk: "Consolas",
        },
    ),
    (
        "courier",
        FontPair {
            latin: "Courier New",
            cjk: "Courier New",
        },
    ),
    (
        "source",
        FontPair {
            latin: "Source Code Pro",
            cjk: "Source Code Pro",
        },
    ),
    (
        "menlo",
        FontPair {
            latin: "Menlo",
            cjk: "Menlo",
        },
    ),
];

/// Looks up a font by its short identifier.
pub fn lookup_font(key: &str) -> Option<FontPair> {
    FONTS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, pair)| *pair)
}

/// Resolves a font identifier, falling back to `default` for unknown keys.
pub fn font_or(key: &str, default: &str) -> FontPair {
    lookup_font(key)
        .or_else(|| lookup_font(default))
        .unwrap_or(FontPair {
            latin: "Times New Roman",
            cjk: "宋体",
        })
}

/// Paragraph texts that are always centered, wherever they appear.
pub const CENTERED_KEYWORDS: &[&str] = &[
    "附录",
    "引言",
    "目录",
    "摘要",
    "参考文献",
    "Appendix",
    "Abstract",
    "Introduction",
    "Contents",
    "References",
];

/// Returns whether `text` is one of the [`CENTERED_KEYWORDS`].
pub fn is_centered_keyword(text: &str) -> bool {
    CENTERED_KEYWORDS.contains(&text)
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush left.
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified on both edges.
    Justify,
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "JUSTIFY" => Ok(Alignment::Justify),
            "LEFT" => Ok(Alignment::Left),
            "CENTER" => Ok(Alignment::Center),
            "RIGHT" => Ok(Alignment::Right),
            _ => Err(Error::config(format!("unknown alignment `{s}`"))),
        }
    }
}

/// Page orientation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PORTRAIT" => Ok(Orientation::Portrait),
            "LANDSCAPE" => Ok(Orientation::Landscape),
            _ => Err(Error::config(format!("unknown orientation `{s}`"))),
        }
    }
}

/// Whether body paragraphs get a first-line indent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    /// No first-line indent.
    #[default]
    None,
    /// A fixed 0.3in first-line indent (two CJK characters at 12pt).
    FirstLine2,
}

impl FromStr for IndentStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" | "" => Ok(IndentStyle::None),
            "first_line_2" => Ok(IndentStyle::FirstLine2),
            _ => Err(Error::config(format!("unknown indent style `{s}`"))),
        }
    }
}

/// How table cells are aligned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableAlignMode {
    /// Every cell is centered.
    #[default]
    Center,
    /// Cells follow the alignment declared by the delimiter row.
    Column,
}

impl FromStr for TableAlignMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "center" => Ok(TableAlignMode::Center),
            "column" => Ok(TableAlignMode::Column),
            _ => Err(Error::config(format!("unknown table alignment `{s}`"))),
        }
    }
}

/// How fenced code is laid out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeBlockStyle {
    /// A bordered frame with a shaded language header and a shaded body.
    #[default]
    Framed,
    /// A single code-styled paragraph.
    Plain,
}

impl FromStr for CodeBlockStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "framed" => Ok(CodeBlockStyle::Framed),
            "plain" => Ok(CodeBlockStyle::Plain),
            _ => Err(Error::config(format!("unknown code block style `{s}`"))),
        }
    }
}

/// Options of a single conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Top margin in inches.
    pub page_margin_top: f32,
    /// Bottom margin in inches.
    pub page_margin_bottom: f32,
    /// Left margin in inches.
    pub page_margin_left: f32,
    /// Right margin in inches.
    pub page_margin_right: f32,
    /// Page orientation.
    pub orientation: Orientation,
    /// Font identifier of body text.
    pub body_font: String,
    /// Font identifier of headings.
    pub heading_font: String,
    /// Font identifier of code.
    pub code_font: String,
    /// Nominal body font size in points.
    pub font_size: f32,
    /// Line spacing as a multiple of single spacing.
    pub line_spacing: f32,
    /// Alignment of body paragraphs.
    pub alignment: Alignment,
    /// First-line indent of body paragraphs.
    pub indent_style: IndentStyle,
    /// Space before body paragraphs in points.
    pub space_before: f32,
    /// Space after body paragraphs in points.
    pub space_after: f32,
    /// The heading text that introduces a table of contents.
    pub contents_keyword: String,
    /// Table cell alignment policy.
    pub table_alignment: TableAlignMode,
    /// Code block layout.
    pub code_block: CodeBlockStyle,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            page_margin_top: 1.0,
            page_margin_bottom: 1.0,
            page_margin_left: 1.25,
            page_margin_right: 1.25,
            orientation: Orientation::Portrait,
            body_font: "song".into(),
            heading_font: "hei".into(),
            code_font: "courier".into(),
            font_size: 12.0,
            line_spacing: 1.25,
            alignment: Alignment::Justify,
            indent_style: IndentStyle::None,
            space_before: 0.0,
            space_after: 0.0,
            contents_keyword: "目录".into(),
            table_alignment: TableAlignMode::Center,
            code_block: CodeBlockStyle::Framed,
        }
    }
}

impl ConvertConfig {
    /// Builds a configuration from flat string options, as submitted by a form.
    ///
    /// Unknown keys and unparsable values keep their defaults.
    pub fn from_options(options: &HashMap<String, String>) -> Self {
        let mut config = Self::default();
        // Sorted so that warnings come out in a stable order.
        let mut keys: Vec<_> = options.keys().collect();
        keys.sort();
        for key in keys {
            config.set(key, &options[key]);
        }
        config
    }

    /// Parses a TOML configuration file.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(Error::config)
    }

    /// Applies one option. Returns whether the option was accepted.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        let accepted = match key {
            "page_margin_top" => parse_into(value, &mut self.page_margin_top),
            "page_margin_bottom" => parse_into(value, &mut self.page_margin_bottom),
            "page_margin_left" => parse_into(value, &mut self.page_margin_left),
            "page_margin_right" => parse_into(value, &mut self.page_margin_right),
            "orientation" => parse_into(value, &mut self.orientation),
            "body_font" => set_font(value, &mut self.body_font),
            "heading_font" => set_font(value, &mut self.heading_font),
            "code_font" => set_font(value, &mut self.code_font),
            "font_size" => parse_into(value, &mut self.font_size),
            "line_spacing" => parse_into(value, &mut self.line_spacing),
            "alignment" => parse_into(value, &mut self.alignment),
            "indent_style" => parse_into(value, &mut self.indent_style),
            "space_before" => parse_into(value, &mut self.space_before),
            "space_after" => parse_into(value, &mut self.space_after),
            "contents_keyword" if !value.is_empty() => {
                self.contents_keyword = value.to_owned();
                true
            }
            "table_alignment" => parse_into(value, &mut self.table_alignment),
            "code_block" => parse_into(value, &mut self.code_block),
            _ => false,
        };
        if !accepted {
            warn!("ignoring option `{key}` = {value:?}, keeping the default");
        }
        accepted
    }

    /// Base left indent of list paragraphs, in inches.
    pub fn list_base_indent(&self) -> f32 {
        match self.indent_style {
            IndentStyle::None => 0.0,
            IndentStyle::FirstLine2 => 0.15,
        }
    }
}

fn parse_into<T: FromStr>(value: &str, slot: &mut T) -> bool {
    match value.parse() {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

fn set_font(value: &str, slot: &mut String) -> bool {
    if lookup_font(value).is_none() {
        return false;
    }
    *slot = value.to_owned();
    true
}
