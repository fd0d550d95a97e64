//! Tenant configuration report generator.
//!
//! This crate turns a classified tenant export into a cross-referenced
//! report: VRF membership, EPG bindings and contract usage, with a diagram
//! per VRF and per contract. It also runs heuristic checks for common
//! misconfigurations.
//!
//! # Usage
//!
//! ```ignore
//! use tenantdoc_inspect::{generate, DocumentFormat, ReportSettings};
//!
//! let settings = ReportSettings::default();
//! let report = generate(&settings, "tenant.json".as_ref(), "report.md".as_ref(), DocumentFormat::Markdown)?;
//! println!("{} diagrams written", report.images.len());
//!
//! // Lint only
//! for warning in tenantdoc_inspect::lint("tenant.json".as_ref())? {
//!     eprintln!("[{}] {}: {}", warning.severity, warning.code, warning.message);
//! }
//! ```

pub mod document;
pub mod graph;
pub mod heuristics;
pub mod image;
pub mod relations;
pub mod render;
pub mod report;
pub mod settings;

use std::path::Path;

use tenantdoc_common::FabricResult;
use tenantdoc_config::{ConfigExport, Inventory};

pub use document::{Block, Document, DocumentFormat, ParagraphStyle};
pub use graph::{GraphEdge, GraphKind, GraphModel, Rank, RankGroup};
pub use heuristics::{Severity, Warning};
pub use image::{DotSourceWriter, GraphvizWriter, ImageFormat, ImageWriter};
pub use relations::PathAttachment;
pub use report::{generate, Report, ReportBuilder};
pub use settings::ReportSettings;

/// Load an export and run the heuristic checks on its tenant.
pub fn lint(input: &Path) -> FabricResult<Vec<Warning>> {
    let export = ConfigExport::from_file(input)?;
    let tenant = export.tenant()?;
    Ok(heuristics::analyze(&Inventory::classify(tenant)))
}
