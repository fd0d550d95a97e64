//! Diagram image writers.
//!
//! [`GraphvizWriter`] pipes DOT source into the Graphviz `dot` program to
//! rasterize it. [`DotSourceWriter`] writes the DOT source itself, for hosts
//! without Graphviz and for tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use tenantdoc_common::{FabricError, FabricResult};

use crate::graph::GraphModel;
use crate::render;

/// Image file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    /// DOT source, no rasterization
    Dot,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Dot => "dot",
        }
    }
}

/// Writes a diagram to an image file.
pub trait ImageWriter {
    /// Format of the files this writer produces.
    fn format(&self) -> ImageFormat;

    fn write_image(&self, graph: &GraphModel, path: &Path) -> FabricResult<()>;
}

/// Rasterizes diagrams with the Graphviz `dot` program.
#[derive(Debug, Clone)]
pub struct GraphvizWriter {
    program: PathBuf,
    format: ImageFormat,
}

impl GraphvizWriter {
    pub fn new(program: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            program: program.into(),
            format,
        }
    }
}

impl ImageWriter for GraphvizWriter {
    fn format(&self) -> ImageFormat {
        self.format
    }

    fn write_image(&self, graph: &GraphModel, path: &Path) -> FabricResult<()> {
        let source = render::dot::render(graph);
        let render_error = |message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>| {
            FabricError::Render {
                message,
                subject: Some(graph.name.clone()),
                source,
            }
        };

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format.extension()))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                render_error(
                    format!("failed to run '{}'", self.program.display()),
                    Some(Box::new(e)),
                )
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(|e| {
                render_error("failed to send graph to graphviz".to_string(), Some(Box::new(e)))
            })?;
        }

        let output = child.wait_with_output().map_err(|e| {
            render_error("failed to wait for graphviz".to_string(), Some(Box::new(e)))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(render_error(
                format!(
                    "'{}' exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
                None,
            ));
        }

        debug!(graph = %graph.name, path = %path.display(), "Rendered diagram");
        Ok(())
    }
}

/// Writes diagrams as DOT source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotSourceWriter;

impl ImageWriter for DotSourceWriter {
    fn format(&self) -> ImageFormat {
        ImageFormat::Dot
    }

    fn write_image(&self, graph: &GraphModel, path: &Path) -> FabricResult<()> {
        std::fs::write(path, render::dot::render(graph)).map_err(|e| FabricError::io(path, e))?;
        debug!(graph = %graph.name, path = %path.display(), "Wrote diagram source");
        Ok(())
    }
}

/// Writer for the configured format.
pub fn writer_for(format: ImageFormat, graphviz_program: &Path) -> Box<dyn ImageWriter> {
    match format {
        ImageFormat::Dot => Box::new(DotSourceWriter),
        raster => Box::new(GraphvizWriter::new(graphviz_program, raster)),
    }
}
