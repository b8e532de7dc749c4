//! # mdocx
//!
//! Converts markdown into styled Word documents.
//!
//! The pipeline parses the markdown into a flat token stream, walks it once
//! to build an in-memory [`Document`](model::Document) and finally packs the
//! document into DOCX bytes:
//!
//! ```no_run
//! let bytes = mdocx::convert("# Title\n\nHello **world**.")?;
//! std::fs::write(mdocx::output_file_name(chrono::Local::now().naive_local()), bytes)?;
//! # Ok::<(), mdocx::Error>(())
//! ```

pub mod anchors;
pub mod config;
pub mod cursor;
mod error;
pub mod inline;
pub mod model;
pub mod styles;
pub mod token;
pub mod transform;
pub mod writer;

pub use error::*;

use chrono::NaiveDateTime;
use log::info;

use crate::anchors::build_anchor_map;
pub use crate::config::ConvertConfig;
use crate::config::font_or;
use crate::model::Document;
use crate::styles::{build_styles, PageSetup};
use crate::token::Token;
use crate::transform::BlockTransformer;
use crate::writer::DocxWriter;

/// The result type for mdocx.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;

/// The media type of DOCX files.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The download name of a document produced at `now`.
pub fn output_file_name(now: NaiveDateTime) -> String {
    format!("Markdown_Doc_{}.docx", now.format("%Y%m%d_%H%M%S"))
}

/// Converts markdown with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    /// Creates a converter.
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Converts markdown into the in-memory document.
    pub fn convert_document(&self, markdown: &str) -> Result<Document> {
        if markdown.trim().is_empty() {
            return Err(Error::empty_input());
        }
        let tokens = token::parse(markdown);
        self.transform_tokens(markdown, &tokens)
    }

    /// Builds a document from an already parsed token stream.
    ///
    /// `source` is only consulted to decide whether a table of contents can
    /// occur at all.
    pub fn transform_tokens(&self, source: &str, tokens: &[Token]) -> Result<Document> {
        let config = &self.config;
        let mut doc = Document::new(build_styles(config), PageSetup::from_config(config));

        let anchors = build_anchor_map(tokens);
        let contents_present = {
            let keyword = config.contents_keyword.trim();
            !keyword.is_empty() && source.contains(keyword)
        };
        let code_font = font_or(&config.code_font, "courier");

        let mut transformer = BlockTransformer::new(config, &anchors, code_font, contents_present);
        transformer.transform(tokens, &mut doc)?;

        info!(
            "converted {} tokens into {} blocks ({} anchors)",
            tokens.len(),
            doc.blocks.len(),
            anchors.len()
        );
        Ok(doc)
    }

    /// Converts markdown into DOCX bytes.
    pub fn convert(&self, markdown: &str) -> Result<Vec<u8>> {
        let doc = self.convert_document(markdown)?;
        DocxWriter::new().write(&doc)
    }
}

/// Converts markdown into DOCX bytes with the default configuration.
pub fn convert(markdown: &str) -> Result<Vec<u8>> {
    Converter::default().convert(markdown)
}

/// Converts markdown into the in-memory document with the default
/// configuration.
pub fn convert_document(markdown: &str) -> Result<Document> {
    Converter::default().convert_document(markdown)
}

#[cfg(test)]
mod tests;
