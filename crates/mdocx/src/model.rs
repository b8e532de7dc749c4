//! The in-memory document the transformer appends to.
//!
//! Nothing here knows about DOCX. The model is handed to
//! [`crate::writer::DocxWriter`] once the walk is complete. Lengths are
//! integer twips (1/1440 inch).

use std::fmt::{self, Write};

use ecow::EcoString;

use crate::config::{Alignment, FontPair};
use crate::styles::{PageSetup, StyleSet, StyleSlot};

/// Twips per inch.
pub const TWIPS_PER_INCH: f32 = 1440.0;

/// Converts inches to twips.
pub fn inches(value: f32) -> i32 {
    (value * TWIPS_PER_INCH).round() as i32
}

/// Converts points to twips.
pub fn points(value: f32) -> i32 {
    (value * 20.0).round() as i32
}

/// An accumulating output document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The registered styles.
    pub styles: StyleSet,
    /// Page geometry.
    pub page: PageSetup,
    /// Top-level blocks in order.
    pub blocks: Vec<Block>,
    next_bookmark: usize,
}

impl Document {
    /// Creates an empty document with its styles and geometry.
    pub fn new(styles: StyleSet, page: PageSetup) -> Self {
        Self {
            styles,
            page,
            blocks: Vec::new(),
            next_bookmark: 0,
        }
    }

    /// Appends a paragraph in the given style.
    pub fn add_paragraph(&mut self, style: StyleSlot) -> &mut Paragraph {
        self.blocks.push(Block::Paragraph(Paragraph::new(style)));
        match self.blocks.last_mut() {
            Some(Block::Paragraph(paragraph)) => paragraph,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    /// Appends a table with `rows` x `cols` empty cells.
    pub fn add_table(&mut self, kind: TableKind, rows: usize, cols: usize) -> &mut Table {
        self.blocks.push(Block::Table(Table::new(kind, rows, cols)));
        match self.blocks.last_mut() {
            Some(Block::Table(table)) => table,
            _ => unreachable!("a table was just pushed"),
        }
    }

    /// Hands out a fresh bookmark id.
    pub fn next_bookmark_id(&mut self) -> usize {
        let id = self.next_bookmark;
        self.next_bookmark += 1;
        id
    }

    /// Iterates over top-level paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        })
    }

    /// Iterates over tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }

    /// Renders a compact text dump of the blocks.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            // Writing into a `String` cannot fail.
            let _ = block.write_outline(&mut out);
        }
        out
    }
}

/// A top-level block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph.
    Paragraph(Paragraph),
    /// A table.
    Table(Table),
}

impl Block {
    fn write_outline(&self, out: &mut String) -> fmt::Result {
        match self {
            Block::Paragraph(paragraph) => paragraph.write_outline(out, ""),
            Block::Table(table) => {
                writeln!(
                    out,
                    "table:{} {}x{}",
                    table.kind,
                    table.row_count(),
                    table.col_count()
                )?;
                for (r, row) in table.rows.iter().enumerate() {
                    for (c, cell) in row.iter().enumerate() {
                        write!(out, "  cell[{r},{c}]")?;
                        if cell.v_centered {
                            out.push_str(" valign=center");
                        }
                        if let Some(fill) = cell.shading {
                            write!(out, " fill={fill}")?;
                        }
                        out.push('\n');
                        cell.paragraph.write_outline(out, "    ")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Left and first-line indentation. A negative first line hangs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    /// Left indent of every line.
    pub left: i32,
    /// First-line offset relative to `left`.
    pub first_line: i32,
}

/// Alignment of text at a tab stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAlignment {
    /// Text starts at the stop.
    Left,
    /// Text ends at the stop.
    Right,
}

/// Characters filling the space before a tab stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLeader {
    /// Blank.
    None,
    /// Dots.
    Dot,
}

/// A tab stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    /// Position from the left margin.
    pub pos: i32,
    /// Alignment at the stop.
    pub alignment: TabAlignment,
    /// Leader fill.
    pub leader: TabLeader,
}

/// A named range spanning a whole paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Unique numeric id within the document.
    pub id: usize,
    /// The name fields refer to.
    pub name: EcoString,
}

/// A styled paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// The paragraph style.
    pub style: StyleSlot,
    /// Overrides the style's alignment.
    pub alignment: Option<Alignment>,
    /// Overrides the style's indentation.
    pub indent: Option<Indent>,
    /// Custom tab stops.
    pub tabs: Vec<TabStop>,
    /// The bookmark spanning this paragraph.
    pub bookmark: Option<Bookmark>,
    /// Inline content.
    pub children: Vec<Inline>,
}

impl Paragraph {
    /// Creates an empty paragraph.
    pub fn new(style: StyleSlot) -> Self {
        Self {
            style,
            alignment: None,
            indent: None,
            tabs: Vec::new(),
            bookmark: None,
            children: Vec::new(),
        }
    }

    /// Appends a plain run and returns it for styling.
    pub fn add_run(&mut self, text: impl Into<EcoString>) -> &mut Run {
        self.children.push(Inline::Run(Run::new(text)));
        match self.children.last_mut() {
            Some(Inline::Run(run)) => run,
            _ => unreachable!("a run was just pushed"),
        }
    }

    /// Appends any inline element.
    pub fn push(&mut self, inline: Inline) {
        self.children.push(inline);
    }

    /// Adds a tab stop.
    pub fn add_tab_stop(&mut self, pos: i32, alignment: TabAlignment, leader: TabLeader) {
        self.tabs.push(TabStop {
            pos,
            alignment,
            leader,
        });
    }

    /// The runs of this paragraph, hyperlink runs included.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|inline| match inline {
            Inline::Run(run) | Inline::Hyperlink { run, .. } => Some(run),
            Inline::PageRef { .. } => None,
        })
    }

    /// The visible text, without field placeholders.
    pub fn text(&self) -> String {
        self.runs().map(|run| run.text.as_str()).collect()
    }

    /// The anchors of the page-reference fields in this paragraph.
    pub fn page_refs(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|inline| match inline {
            Inline::PageRef { anchor, .. } => Some(anchor.as_str()),
            _ => None,
        })
    }

    fn write_outline(&self, out: &mut String, pad: &str) -> fmt::Result {
        write!(out, "{pad}p:{}", self.style)?;
        if let Some(alignment) = self.alignment {
            write!(out, " align={}", alignment_name(alignment))?;
        }
        if let Some(indent) = self.indent {
            write!(out, " indent={}/{}", indent.left, indent.first_line)?;
        }
        for tab in &self.tabs {
            let align = match tab.alignment {
                TabAlignment::Left => "l",
                TabAlignment::Right => "r",
            };
            let leader = match tab.leader {
                TabLeader::None => "",
                TabLeader::Dot => ".",
            };
            write!(out, " tab={}{align}{leader}", tab.pos)?;
        }
        if let Some(bookmark) = &self.bookmark {
            write!(out, " #{}", bookmark.name)?;
        }
        out.push('\n');

        for inline in &self.children {
            match inline {
                Inline::Run(run) => {
                    write!(out, "{pad}  run {:?}", run.text.as_str())?;
                    run.write_flags(out)?;
                }
                Inline::Hyperlink { url, run } => {
                    write!(out, "{pad}  link <{url}> {:?}", run.text.as_str())?;
                    run.write_flags(out)?;
                }
                Inline::PageRef { anchor, .. } => write!(out, "{pad}  pageref {anchor}")?,
            }
            out.push('\n');
        }
        Ok(())
    }
}

fn alignment_name(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "justify",
    }
}

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A run of text. Tabs and newlines in its text become tab characters and
    /// line breaks.
    Run(Run),
    /// A run that navigates to an external URL.
    Hyperlink {
        /// The target.
        url: EcoString,
        /// The visible run.
        run: Run,
    },
    /// A field resolving to the page number of a bookmark.
    PageRef {
        /// The bookmark name.
        anchor: EcoString,
        /// Shown until the viewer updates fields.
        placeholder: EcoString,
    },
}

/// A run of uniformly styled text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    /// The text.
    pub text: EcoString,
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Overrides the paragraph style's fonts.
    pub fonts: Option<FontPair>,
}

impl Run {
    /// Creates an unstyled run.
    pub fn new(text: impl Into<EcoString>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn write_flags(&self, out: &mut String) -> fmt::Result {
        if self.bold {
            out.push_str(" +b");
        }
        if self.italic {
            out.push_str(" +i");
        }
        if let Some(fonts) = self.fonts {
            write!(out, " font={}", fonts.latin)?;
        }
        Ok(())
    }
}

/// What a table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// A markdown table.
    Data,
    /// The frame around a code block.
    CodeFrame,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableKind::Data => "data",
            TableKind::CodeFrame => "code",
        })
    }
}

/// A table cell holding one paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// The cell content.
    pub paragraph: Paragraph,
    /// Centers the content vertically.
    pub v_centered: bool,
    /// Background fill as `RRGGBB`.
    pub shading: Option<&'static str>,
}

impl Cell {
    fn new() -> Self {
        Self {
            paragraph: Paragraph::new(StyleSlot::TableCell),
            v_centered: false,
            shading: None,
        }
    }
}

/// A rectangular grid of cells with borders.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// What the table holds.
    pub kind: TableKind,
    /// Whether the table is centered on the page.
    pub centered: bool,
    /// Rows of cells; every row has the same length.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    fn new(kind: TableKind, rows: usize, cols: usize) -> Self {
        Self {
            kind,
            centered: false,
            rows: (0..rows)
                .map(|_| (0..cols).map(|_| Cell::new()).collect())
                .collect(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// The cell at `row`, `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// The cell at `row`, `col`, for writing.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|cells| cells.get_mut(col))
    }

    /// Iterates over every cell row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }
}
