//! Error types for tenantdoc
//!
//! Every fault in the pipeline is fatal: the run stops at the first one and no
//! document is saved. The variants below only exist so the operator can tell
//! *where* it stopped.

use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for tenantdoc operations
#[derive(Error, Debug)]
pub enum FabricError {
    /// Input file missing or unreadable, or an output file could not be written
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid JSON
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Input is valid JSON but not shaped like a configuration export
    #[error("Schema error: {message}")]
    Schema {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Document or graph collaborator failure
    #[error("Render error: {message}")]
    Render {
        message: String,
        subject: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    /// Report settings file could not be read or decoded
    #[error("Settings error: {message}")]
    Settings {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Coarse fault class, as reported to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Input,
    Schema,
    Rendering,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Schema => write!(f, "schema"),
            Self::Rendering => write!(f, "rendering"),
        }
    }
}

/// Result type alias for tenantdoc operations
pub type FabricResult<T> = Result<T, FabricError>;

impl FabricError {
    /// Classify this error for operator-facing output
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Io { .. } | Self::Parse { .. } | Self::Settings { .. } => FaultKind::Input,
            Self::Schema { .. } => FaultKind::Schema,
            Self::Render { .. } => FaultKind::Rendering,
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            source: None,
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            subject: None,
            source: None,
        }
    }

    /// Create an IO error tagged with the path it concerns
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().display().to_string();
        Self::Io {
            message: format!("{}: {}", path, source),
            path: Some(path),
            source,
        }
    }

    /// Attach the report subject (VRF, contract, ...) to a render error
    pub fn with_subject(mut self, name: impl Into<String>) -> Self {
        if let Self::Render { subject, .. } = &mut self {
            *subject = Some(name.into());
        }
        self
    }
}

impl From<std::io::Error> for FabricError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
            source: err,
        }
    }
}

/// JSON data errors are schema faults; syntax and truncation are parse faults.
impl From<serde_json::Error> for FabricError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Data => Self::Schema {
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
            Category::Syntax | Category::Eof => Self::Parse {
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
            Category::Io => {
                let message = err.to_string();
                Self::Io {
                    message,
                    path: None,
                    source: err.into(),
                }
            }
        }
    }
}
