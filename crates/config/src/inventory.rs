//! Partition of a tenant's children into typed collections.
//!
//! Built once per run by [`Inventory::classify`] and read-only afterwards.
//! Every collection preserves the export's order; unrecognized classes are
//! skipped.

use crate::model::{ClassName, ManagedObject};

/// Typed view over one tenant.
#[derive(Debug, Clone, Default)]
pub struct Inventory<'a> {
    pub tenant_name: &'a str,
    /// Routing contexts (`fvCtx`)
    pub contexts: Vec<&'a ManagedObject>,
    /// Bridge domains (`fvBD`)
    pub bridge_domains: Vec<&'a ManagedObject>,
    /// External routed networks (`l3extOut`)
    pub l3outs: Vec<&'a ManagedObject>,
    /// Contracts (`vzBrCP`)
    pub contracts: Vec<&'a ManagedObject>,
    /// Application profiles (`fvAp`)
    pub app_profiles: Vec<&'a ManagedObject>,
    /// Endpoint groups (`fvAEPg`) across all application profiles
    pub epgs: Vec<&'a ManagedObject>,
}

impl<'a> Inventory<'a> {
    /// Classify the direct children of a tenant object.
    pub fn classify(tenant: &'a ManagedObject) -> Self {
        let mut inventory = Inventory {
            tenant_name: tenant.name(),
            ..Default::default()
        };

        for child in &tenant.children {
            let bucket = match child.class {
                ClassName::Context => &mut inventory.contexts,
                ClassName::BridgeDomain => &mut inventory.bridge_domains,
                ClassName::L3Out => &mut inventory.l3outs,
                ClassName::Contract => &mut inventory.contracts,
                ClassName::AppProfile => &mut inventory.app_profiles,
                _ => continue,
            };
            bucket.push(&child.object);
        }

        inventory.epgs = inventory
            .app_profiles
            .iter()
            .flat_map(|ap| ap.children_of(ClassName::Epg))
            .collect();

        tracing::debug!(
            tenant = inventory.tenant_name,
            contexts = inventory.contexts.len(),
            bridge_domains = inventory.bridge_domains.len(),
            l3outs = inventory.l3outs.len(),
            contracts = inventory.contracts.len(),
            epgs = inventory.epgs.len(),
            "Classified tenant objects"
        );

        inventory
    }
}
