//! Report settings.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes:
//!
//! ```toml
//! picture_width_cm = 16.0
//! image_dir = "diagrams"
//! image_format = "svg"
//!
//! [style]
//! name = "Code Style"
//! font = "Consolas"
//! size_pt = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tenantdoc_common::{FabricError, FabricResult};

use crate::document::ParagraphStyle;
use crate::image::ImageFormat;

pub const DEFAULT_STYLE_NAME: &str = "Code Style";
pub const DEFAULT_STYLE_FONT: &str = "Cambria";
pub const DEFAULT_STYLE_SIZE_PT: f32 = 11.0;
pub const DEFAULT_PICTURE_WIDTH_CM: f32 = 18.0;

/// Settings for one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Body paragraph style, registered once per document
    pub style: ParagraphStyle,

    /// Width of embedded diagrams
    pub picture_width_cm: f32,

    /// Directory diagram files are written to
    pub image_dir: PathBuf,

    pub image_format: ImageFormat,

    /// Graphviz executable used for png/svg output
    pub graphviz_program: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            style: ParagraphStyle::new(DEFAULT_STYLE_NAME)
                .with_font(DEFAULT_STYLE_FONT, DEFAULT_STYLE_SIZE_PT),
            picture_width_cm: DEFAULT_PICTURE_WIDTH_CM,
            image_dir: PathBuf::from("."),
            image_format: ImageFormat::Png,
            graphviz_program: PathBuf::from("dot"),
        }
    }
}

impl ReportSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> FabricResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FabricError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> FabricResult<Self> {
        toml::from_str(content).map_err(|e| FabricError::Settings {
            message: format!("invalid report settings: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Path of the diagram file for a report subject.
    pub fn image_path(&self, subject: &str, format: ImageFormat) -> PathBuf {
        self.image_dir
            .join(format!("{}.{}", subject, format.extension()))
    }
}
