//! DOCX serialization of a [`Document`](crate::model::Document).

use std::io::Cursor;

use docx_rs::*;
use log::debug;

use crate::config::{Alignment, FontPair, Orientation};
use crate::model::{self, Block, Cell, Inline, TabAlignment, TabLeader};
use crate::styles::{StyleDef, StyleSet};
use crate::{Error, Result};

/// Twips of spacing per line at single spacing.
const SINGLE_LINE: f32 = 240.0;

const TABLE_STYLE: &str = "TableGrid";

/// Writes documents through `docx-rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxWriter;

impl DocxWriter {
    /// Creates a writer.
    pub fn new() -> Self {
        Self
    }

    /// Builds the package model of `doc` without packing it.
    pub fn render(&self, doc: &model::Document) -> Docx {
        let mut docx = Docx::new();
        docx = Self::page_setup(docx, doc);
        docx = Self::initialize_styles(docx, &doc.styles);

        for block in &doc.blocks {
            docx = match block {
                Block::Paragraph(paragraph) => docx.add_paragraph(Self::paragraph(paragraph)),
                Block::Table(table) => docx.add_table(Self::table(table)),
            };
        }
        docx
    }

    /// Builds and packs `doc` into DOCX bytes.
    pub fn write(&self, doc: &model::Document) -> Result<Vec<u8>> {
        let docx = self.render(doc);
        let mut buffer = Vec::new();
        docx.build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(Error::serialize)?;

        debug!("packed {} blocks into {} bytes", doc.blocks.len(), buffer.len());
        Ok(buffer)
    }

    fn page_setup(docx: Docx, doc: &model::Document) -> Docx {
        let page = &doc.page;
        let margin = PageMargin::new()
            .top(page.margin_top as _)
            .bottom(page.margin_bottom as _)
            .left(page.margin_left as _)
            .right(page.margin_right as _);

        let docx = docx
            .page_size(page.width as _, page.height as _)
            .page_margin(margin);
        match page.orientation {
            Orientation::Portrait => docx,
            Orientation::Landscape => docx.page_orient(PageOrientationType::Landscape),
        }
    }

    fn fonts(fonts: FontPair) -> RunFonts {
        RunFonts::new()
            .ascii(fonts.latin)
            .hi_ansi(fonts.latin)
            .east_asia(fonts.cjk)
            .cs(fonts.latin)
    }

    fn alignment(alignment: Alignment) -> AlignmentType {
        match alignment {
            Alignment::Left => AlignmentType::Left,
            Alignment::Center => AlignmentType::Center,
            Alignment::Right => AlignmentType::Right,
            Alignment::Justify => AlignmentType::Both,
        }
    }

    fn create_style(def: &StyleDef) -> Style {
        let mut style = Style::new(def.slot.id(), StyleType::Paragraph)
            .name(def.slot.display_name())
            .fonts(Self::fonts(def.fonts))
            .size(def.half_points());

        if let Some(based_on) = def.based_on {
            style = style.based_on(based_on.id());
        }
        if def.bold {
            style = style.bold();
        }
        if let Some(color) = def.color {
            style = style.color(color);
        }
        if let Some(alignment) = def.alignment {
            style = style.align(Self::alignment(alignment));
        }
        if let Some(first_line) = def.first_line_indent {
            style = style.indent(
                Some(0),
                Some(SpecialIndentType::FirstLine(first_line)),
                None,
                None,
            );
        }

        if def.space_before.is_some() || def.space_after.is_some() || def.line_spacing.is_some()
        {
            let mut spacing = LineSpacing::new();
            if let Some(before) = def.space_before {
                spacing = spacing.before(before.max(0) as _);
            }
            if let Some(after) = def.space_after {
                spacing = spacing.after(after.max(0) as _);
            }
            if let Some(multiple) = def.line_spacing {
                spacing = spacing
                    .line((SINGLE_LINE * multiple).round() as _)
                    .line_rule(LineSpacingType::Auto);
            }
            style = style.line_spacing(spacing);
        }
        style
    }

    /// Registers every paragraph style plus the hyperlink and table styles.
    fn initialize_styles(docx: Docx, styles: &StyleSet) -> Docx {
        let hyperlink = Style::new("Hyperlink", StyleType::Character)
            .name("Hyperlink")
            .color("0000FF")
            .underline("single");

        let table = Style::new(TABLE_STYLE, StyleType::Table).name("Table Grid");

        styles
            .iter()
            .fold(docx, |docx, def| docx.add_style(Self::create_style(def)))
            .add_style(hyperlink)
            .add_style(table)
    }

    fn paragraph(src: &model::Paragraph) -> Paragraph {
        let mut para = Paragraph::new().style(src.style.id());

        if let Some(alignment) = src.alignment {
            para = para.align(Self::alignment(alignment));
        }
        if let Some(indent) = src.indent {
            let special = if indent.first_line < 0 {
                SpecialIndentType::Hanging(-indent.first_line)
            } else {
                SpecialIndentType::FirstLine(indent.first_line)
            };
            para = para.indent(Some(indent.left), Some(special), None, None);
        }
        for tab in &src.tabs {
            let val = match tab.alignment {
                TabAlignment::Left => TabValueType::Left,
                TabAlignment::Right => TabValueType::Right,
            };
            let mut stop = Tab::new().val(val).pos(tab.pos.max(0) as _);
            if tab.leader == TabLeader::Dot {
                stop = stop.leader(TabLeaderType::Dot);
            }
            para = para.add_tab(stop);
        }

        if let Some(bookmark) = &src.bookmark {
            para = para.add_bookmark_start(bookmark.id, bookmark.name.as_str());
        }
        for inline in &src.children {
            para = match inline {
                Inline::Run(run) => para.add_run(Self::run(run)),
                Inline::Hyperlink { url, run } => para.add_hyperlink(
                    Hyperlink::new(url.as_str(), HyperlinkType::External)
                        .add_run(Self::run(run).style("Hyperlink")),
                ),
                Inline::PageRef {
                    anchor,
                    placeholder,
                } => para.add_run(Self::page_ref(anchor, placeholder)),
            };
        }
        if let Some(bookmark) = &src.bookmark {
            para = para.add_bookmark_end(bookmark.id);
        }
        para
    }

    fn run(src: &model::Run) -> Run {
        let mut run = Run::new();
        if src.bold {
            run = run.bold();
        }
        if src.italic {
            run = run.italic();
        }
        if let Some(fonts) = src.fonts {
            run = run.fonts(Self::fonts(fonts));
        }

        for (idx, line) in src.text.split('\n').enumerate() {
            if idx > 0 {
                run = run.add_break(BreakType::TextWrapping);
            }
            for (idx, segment) in line.split('\t').enumerate() {
                if idx > 0 {
                    run = run.add_tab();
                }
                if !segment.is_empty() {
                    run = run.add_text(segment);
                }
            }
        }
        run
    }

    /// A `PAGEREF` field with a hyperlink switch, showing `placeholder` until
    /// fields are updated.
    fn page_ref(anchor: &str, placeholder: &str) -> Run {
        Run::new()
            .add_field_char(FieldCharType::Begin, false)
            .add_instr_text(InstrText::PAGEREF(InstrPAGEREF::new(anchor).hyperlink()))
            .add_field_char(FieldCharType::Separate, false)
            .add_text(placeholder)
            .add_field_char(FieldCharType::End, false)
    }

    fn cell(src: &Cell) -> TableCell {
        let mut cell = TableCell::new().add_paragraph(Self::paragraph(&src.paragraph));
        if src.v_centered {
            cell = cell.vertical_align(VAlignType::Center);
        }
        if let Some(fill) = src.shading {
            cell = cell.shading(
                Shading::new()
                    .shd_type(ShdType::Clear)
                    .color("auto")
                    .fill(fill),
            );
        }
        cell
    }

    fn table(src: &model::Table) -> Table {
        let rows = src
            .rows
            .iter()
            .map(|row| TableRow::new(row.iter().map(Self::cell).collect()))
            .collect();

        let table = Table::new(rows).style(TABLE_STYLE);
        if src.centered {
            table.align(TableAlignmentType::Center)
        } else {
            table
        }
    }
}
