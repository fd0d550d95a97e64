//! Static analysis heuristics for tenant configuration quality.
//!
//! These never block a report. Names that do not resolve inside the tenant
//! are only informational because they may refer to objects in `common`.

use std::collections::BTreeSet;

use serde::Serialize;
use tenantdoc_config::{ClassName, Inventory, ManagedObject};

use crate::relations;

// ============================================================================
// Warning Types
// ============================================================================

/// Severity level for a heuristic warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A heuristic warning about the configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub context: Vec<String>,
}

impl Warning {
    fn new(severity: Severity, code: &str, message: String, context: Vec<String>) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message,
            context,
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Run all heuristic analyses on a classified tenant.
pub fn analyze(inventory: &Inventory<'_>) -> Vec<Warning> {
    let mut warnings = Vec::new();

    check_duplicate_names(inventory, &mut warnings);
    check_unused_contracts(inventory, &mut warnings);
    check_bd_without_vrf(inventory, &mut warnings);
    check_epg_without_bd(inventory, &mut warnings);
    check_unresolved_vrfs(inventory, &mut warnings);
    check_unresolved_bds(inventory, &mut warnings);
    check_unresolved_contracts(inventory, &mut warnings);

    // Errors first, then warnings, then info
    warnings.sort_by_key(|w| match w.severity {
        Severity::Error => 0,
        Severity::Warn => 1,
        Severity::Info => 2,
    });

    warnings
}

fn defined(objects: &[&ManagedObject]) -> BTreeSet<String> {
    objects.iter().map(|o| o.name().to_string()).collect()
}

/// Objects of one kind sharing a name. References are by name, so every
/// query about such a name merges them.
fn check_duplicate_names(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    let kinds: [(&str, &[&ManagedObject]); 5] = [
        ("VRF", inventory.contexts.as_slice()),
        ("bridge domain", inventory.bridge_domains.as_slice()),
        ("L3 Out", inventory.l3outs.as_slice()),
        ("contract", inventory.contracts.as_slice()),
        ("application profile", inventory.app_profiles.as_slice()),
    ];

    for (kind, objects) in kinds {
        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        for object in objects {
            let name = object.name();
            if !seen.insert(name) && reported.insert(name) {
                warnings.push(Warning::new(
                    Severity::Error,
                    "DUPLICATE_NAME",
                    format!("{} name '{}' is defined more than once", kind, name),
                    vec![kind.to_string(), name.to_string()],
                ));
            }
        }
    }
}

/// Contracts defined but used by no EPG and no L3out.
fn check_unused_contracts(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    for contract in &inventory.contracts {
        let name = contract.name();
        if relations::epgs_for_contract(&inventory.epgs, name).is_empty()
            && relations::l3outs_for_contract(&inventory.l3outs, name).is_empty()
        {
            warnings.push(Warning::new(
                Severity::Warn,
                "UNUSED_CONTRACT",
                format!("Contract '{}' is not used by any EPG or L3 Out", name),
                vec![name.to_string()],
            ));
        }
    }
}

/// Bridge domains without a routing context.
fn check_bd_without_vrf(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    for bd in &inventory.bridge_domains {
        let bound = bd
            .children_of(ClassName::RsContext)
            .any(|rel| !rel.attr_or_empty("tnFvCtxName").is_empty());
        if !bound {
            warnings.push(Warning::new(
                Severity::Warn,
                "BD_WITHOUT_VRF",
                format!("Bridge domain '{}' is not bound to a VRF", bd.name()),
                vec![bd.name().to_string()],
            ));
        }
    }
}

/// EPGs without a bridge domain.
fn check_epg_without_bd(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    for epg in &inventory.epgs {
        let bd = relations::bridge_domain_for_epg(epg).unwrap_or_default();
        if bd.is_empty() {
            warnings.push(Warning::new(
                Severity::Warn,
                "EPG_WITHOUT_BD",
                format!("EPG '{}' is not bound to a bridge domain", epg.name()),
                vec![epg.name().to_string()],
            ));
        }
    }
}

/// VRF names referenced by BDs or L3outs but not defined in this tenant.
fn check_unresolved_vrfs(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    let known = defined(&inventory.contexts);
    let referenced: BTreeSet<(&str, &str)> = inventory
        .bridge_domains
        .iter()
        .flat_map(|bd| {
            bd.children_of(ClassName::RsContext)
                .map(move |rel| (bd.name(), rel.attr_or_empty("tnFvCtxName")))
        })
        .chain(inventory.l3outs.iter().flat_map(|l3out| {
            l3out
                .children_of(ClassName::RsL3OutContext)
                .map(move |rel| (l3out.name(), rel.attr_or_empty("tnFvCtxName")))
        }))
        .collect();

    for (owner, vrf) in referenced {
        if !vrf.is_empty() && !known.contains(vrf) {
            warnings.push(Warning::new(
                Severity::Info,
                "UNRESOLVED_VRF",
                format!(
                    "'{}' references VRF '{}' which is not defined in this tenant",
                    owner, vrf
                ),
                vec![owner.to_string(), vrf.to_string()],
            ));
        }
    }
}

/// Bridge domain names referenced by EPGs but not defined in this tenant.
fn check_unresolved_bds(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    let known = defined(&inventory.bridge_domains);
    for epg in &inventory.epgs {
        if let Some(bd) = relations::bridge_domain_for_epg(epg) {
            if !bd.is_empty() && !known.contains(&bd) {
                warnings.push(Warning::new(
                    Severity::Info,
                    "UNRESOLVED_BD",
                    format!(
                        "EPG '{}' references bridge domain '{}' which is not defined in this tenant",
                        epg.name(),
                        bd
                    ),
                    vec![epg.name().to_string(), bd],
                ));
            }
        }
    }
}

/// Contract names used by EPGs or L3outs but not defined in this tenant.
fn check_unresolved_contracts(inventory: &Inventory<'_>, warnings: &mut Vec<Warning>) {
    let known = defined(&inventory.contracts);
    let mut referenced: BTreeSet<String> = BTreeSet::new();

    for epg in &inventory.epgs {
        referenced.extend(relations::epg_consumed_contracts(epg));
        referenced.extend(
            epg.children_of(ClassName::RsProvider)
                .map(|rel| rel.attr_or_empty("tnVzBrCPName").to_string()),
        );
    }
    for l3out in &inventory.l3outs {
        referenced.extend(
            l3out
                .children_of(ClassName::InstanceProfile)
                .flat_map(|instp| instp.children.iter())
                .filter(|child| {
                    matches!(child.class, ClassName::RsConsumer | ClassName::RsProvider)
                })
                .map(|child| child.object.attr_or_empty("tnVzBrCPName").to_string()),
        );
    }

    for contract in referenced {
        if !contract.is_empty() && !known.contains(&contract) {
            warnings.push(Warning::new(
                Severity::Info,
                "UNRESOLVED_CONTRACT",
                format!(
                    "Contract '{}' is used but not defined in this tenant",
                    contract
                ),
                vec![contract],
            ));
        }
    }
}
