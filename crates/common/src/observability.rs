//! Logging bootstrap for the tenantdoc binaries.
//!
//! Logs go to stderr so they never mix with a document written to stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::errors::{FabricError, FabricResult};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected compact or json)", other)),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `filter` uses `EnvFilter` directive syntax, e.g. `info` or
/// `tenantdoc_inspect=debug,info`.
pub fn init_tracing(filter: &str, format: LogFormat) -> FabricResult<()> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| FabricError::Settings {
        message: format!("invalid log filter '{}'", filter),
        source: Some(Box::new(e)),
    })?;

    let compact_layer = (format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json_layer = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(compact_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| FabricError::Settings {
            message: "tracing subscriber already installed".to_string(),
            source: Some(e.into()),
        })?;

    tracing::debug!(?format, filter, "Tracing initialized");
    Ok(())
}
