//! In-memory report document.
//!
//! The document is a flat sequence of headings, styled paragraphs and
//! pictures, mirroring what a word processor library exposes. Renderers in
//! [`crate::render`] turn it into a file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use tenantdoc_common::{FabricError, FabricResult};

use crate::render;

/// Built-in body style.
pub const STYLE_NORMAL: &str = "Normal";
/// Built-in bullet list style.
pub const STYLE_LIST_BULLET: &str = "List Bullet";
/// Built-in second-level bullet list style.
pub const STYLE_LIST_BULLET_2: &str = "List Bullet 2";

/// Deepest heading; level 5 renders as `######`.
const MAX_HEADING_LEVEL: u8 = 5;

/// A named paragraph style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_pt: Option<f32>,
}

impl ParagraphStyle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            font: None,
            size_pt: None,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>, size_pt: f32) -> Self {
        self.font = Some(font.into());
        self.size_pt = Some(size_pt);
        self
    }
}

/// One element of the document body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Heading { text: String, level: u8 },
    Paragraph { text: String, style: String },
    Picture { path: PathBuf, width_cm: f32 },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Pandoc-flavoured Markdown
    #[default]
    Markdown,
    /// Block list as JSON
    Json,
}

impl DocumentFormat {
    /// Format implied by an output path's extension; Markdown unless `.json`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Markdown,
        }
    }
}

/// A report under construction.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    styles: Vec<ParagraphStyle>,
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with the built-in styles registered.
    pub fn new() -> Self {
        Self {
            styles: vec![
                ParagraphStyle::new(STYLE_NORMAL),
                ParagraphStyle::new(STYLE_LIST_BULLET),
                ParagraphStyle::new(STYLE_LIST_BULLET_2),
            ],
            blocks: Vec::new(),
        }
    }

    /// Register a paragraph style. Each name can be registered once.
    pub fn register_style(&mut self, style: ParagraphStyle) -> FabricResult<()> {
        if self.style(&style.name).is_some() {
            return Err(FabricError::render(format!(
                "paragraph style '{}' is already registered",
                style.name
            )));
        }
        self.styles.push(style);
        Ok(())
    }

    pub fn style(&self, name: &str) -> Option<&ParagraphStyle> {
        self.styles.iter().find(|s| s.name == name)
    }

    pub fn styles(&self) -> &[ParagraphStyle] {
        &self.styles
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Add a heading. Level 0 is the document title.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) -> FabricResult<()> {
        if level > MAX_HEADING_LEVEL {
            return Err(FabricError::render(format!(
                "heading level {} out of range 0..={}",
                level, MAX_HEADING_LEVEL
            )));
        }
        self.blocks.push(Block::Heading {
            text: text.into(),
            level,
        });
        Ok(())
    }

    /// Add a paragraph in a registered style.
    pub fn add_paragraph(&mut self, text: impl Into<String>, style: &str) -> FabricResult<()> {
        if self.style(style).is_none() {
            return Err(FabricError::render(format!(
                "paragraph style '{}' is not registered",
                style
            )));
        }
        self.blocks.push(Block::Paragraph {
            text: text.into(),
            style: style.to_string(),
        });
        Ok(())
    }

    /// Add a picture, referenced by path.
    pub fn add_picture(&mut self, path: impl Into<PathBuf>, width_cm: f32) {
        self.blocks.push(Block::Picture {
            path: path.into(),
            width_cm,
        });
    }

    /// Render to a string in the given format.
    pub fn render(&self, format: DocumentFormat) -> FabricResult<String> {
        match format {
            DocumentFormat::Markdown => Ok(render::markdown::render(self)),
            DocumentFormat::Json => render::json::render(self),
        }
    }

    /// Render and write the document.
    pub fn save(&self, path: impl AsRef<Path>, format: DocumentFormat) -> FabricResult<()> {
        let path = path.as_ref();
        let content = self.render(format)?;
        std::fs::write(path, content).map_err(|e| FabricError::io(path, e))?;

        info!(
            path = %path.display(),
            ?format,
            blocks = self.blocks.len(),
            "Saved document"
        );
        Ok(())
    }
}
