//! Configuration export model for tenantdoc
//!
//! This crate loads a tenant configuration export (the JSON produced by
//! "Save as" in the fabric controller GUI) into a typed record tree and
//! provides the two generic passes every report needs:
//!
//! - [`model`]: class-tagged records with checked required attributes
//! - [`search`]: lazy recursive key lookup over the tree
//! - [`inventory`]: partition of a tenant's children into typed collections
//!
//! The tree is loaded once and never mutated.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use tenantdoc_common::{FabricError, FabricResult};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod inventory;
pub mod model;
pub mod search;

// ============================================================================
// Re-exports
// ============================================================================

pub use inventory::Inventory;
pub use model::{ClassName, ManagedObject, Record};
pub use search::{find_all, find_all_in, FindAll, Match};

// ============================================================================
// Export Document
// ============================================================================

/// Top-level export document: `{"imdata": [{"fvTenant": {...}}]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigExport {
    #[serde(rename = "imdata")]
    pub records: Vec<Record>,
}

impl ConfigExport {
    /// Load an export from a file
    pub fn from_file(path: impl AsRef<Path>) -> FabricResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FabricError::io(path, e))?;
        let export = Self::from_json(&content)?;

        info!(
            path = %path.display(),
            records = export.records.len(),
            "Loaded configuration export"
        );
        Ok(export)
    }

    /// Parse an export from JSON text
    pub fn from_json(content: &str) -> FabricResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// The tenant this export describes.
    ///
    /// Only the first `imdata` element is used, and it must be an `fvTenant`.
    pub fn tenant(&self) -> FabricResult<&ManagedObject> {
        let first = self
            .records
            .first()
            .ok_or_else(|| FabricError::schema("export contains no records (empty imdata)"))?;

        first.as_class(&ClassName::Tenant).ok_or_else(|| {
            FabricError::schema(format!(
                "first imdata record is '{}', expected 'fvTenant'",
                first.class
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tenantdoc_common::FaultKind;

    const EXPORT: &str = r#"{
        "totalCount": "1",
        "imdata": [
            {"fvTenant": {"attributes": {"name": "acme", "descr": ""}, "children": [
                {"fvCtx": {"attributes": {"name": "prod"}}}
            ]}}
        ]
    }"#;

    #[test]
    fn test_tenant_from_json() {
        let export = ConfigExport::from_json(EXPORT).unwrap();
        let tenant = export.tenant().unwrap();
        assert_eq!(tenant.name(), "acme");
        assert_eq!(tenant.children.len(), 1);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let export = ConfigExport::from_file(file.path()).unwrap();
        assert_eq!(export.tenant().unwrap().name(), "acme");
    }

    #[test]
    fn test_missing_file_is_input_fault() {
        let err = ConfigExport::from_file("/nonexistent/tenant.json").unwrap_err();
        assert_eq!(err.kind(), FaultKind::Input);
    }

    #[test]
    fn test_invalid_json_is_input_fault() {
        let err = ConfigExport::from_json("{\"imdata\": [").unwrap_err();
        assert_eq!(err.kind(), FaultKind::Input);
    }

    #[test]
    fn test_only_first_tenant_is_used() {
        let export = ConfigExport::from_json(
            r#"{"imdata": [
                {"fvTenant": {"attributes": {"name": "acme"}}},
                {"fvTenant": {"attributes": {"name": "other"}, "children": [
                    {"fvCtx": {"attributes": {"name": "prod"}}}
                ]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(export.records.len(), 2);
        let tenant = export.tenant().unwrap();
        assert_eq!(tenant.name(), "acme");
        assert!(tenant.children.is_empty());
    }

    #[test]
    fn test_empty_imdata_is_schema_fault() {
        let export = ConfigExport::from_json(r#"{"imdata": []}"#).unwrap();
        let err = export.tenant().unwrap_err();
        assert_eq!(err.kind(), FaultKind::Schema);
    }

    #[test]
    fn test_non_tenant_root_is_schema_fault() {
        let export =
            ConfigExport::from_json(r#"{"imdata": [{"fvCtx": {"attributes": {"name": "x"}}}]}"#)
                .unwrap();
        let err = export.tenant().unwrap_err();
        assert!(err.to_string().contains("expected 'fvTenant'"));
    }

    #[test]
    fn test_malformed_record_is_schema_fault() {
        let err = ConfigExport::from_json(
            r#"{"imdata": [{"fvTenant": {"attributes": {"name": "acme"}, "children": [
                {"fvRsCtx": {"attributes": {}}}
            ]}}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Schema);
        assert!(err.to_string().contains("tnFvCtxName"));
    }
}
