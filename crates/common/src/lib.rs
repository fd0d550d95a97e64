//! Shared components for tenantdoc.
//!
//! - [`errors`]: the fault taxonomy and result alias used by every crate
//! - [`observability`]: tracing subscriber setup for the binaries

pub mod errors;
pub mod observability;

pub use errors::{FabricError, FabricResult, FaultKind};
pub use observability::{init_tracing, LogFormat};
