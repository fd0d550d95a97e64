//! Association queries between tenant objects.
//!
//! Associations are implicit: an object points at another by name through a
//! child relation record (`fvRsCtx`, `fvRsCons`, ...). Targets are not
//! checked for existence. Every query is a pure function over the classified
//! collections; "not found" is an empty result, never an error.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tenantdoc_config::{ClassName, ManagedObject, Record};

/// `l3extSubnet` scope of subnets announced to the outside.
pub const SCOPE_EXPORT: &str = "export-rtctrl";
/// `l3extSubnet` scope of subnets accepted from the outside.
pub const SCOPE_IMPORT: &str = "import-security";

const CTX_TARGET: &str = "tnFvCtxName";
const CONTRACT_TARGET: &str = "tnVzBrCPName";
const BD_TARGET: &str = "tnFvBDName";

// ============================================================================
// Helpers
// ============================================================================

/// Target names of the direct children of `class`.
fn targets<'a>(
    object: &'a ManagedObject,
    class: ClassName,
    attr: &'static str,
) -> impl Iterator<Item = &'a str> + 'a {
    object
        .children_of(class)
        .map(move |rel| rel.attr_or_empty(attr))
}

fn references(object: &ManagedObject, class: ClassName, attr: &'static str, name: &str) -> bool {
    targets(object, class, attr).any(|target| target == name)
}

/// Children of every instance profile (`l3extInstP`) of an L3out.
fn instance_profile_children(l3out: &ManagedObject) -> impl Iterator<Item = &Record> + '_ {
    l3out
        .children_of(ClassName::InstanceProfile)
        .flat_map(|instp| instp.children.iter())
}

fn with_description(object: &ManagedObject, name: &str) -> String {
    format!("{} - {}", name, object.description())
}

// ============================================================================
// Routing Context Membership
// ============================================================================

/// Bridge domains bound to the routing context `ctx`.
pub fn bridge_domains_for_context(bridge_domains: &[&ManagedObject], ctx: &str) -> Vec<String> {
    bridge_domains
        .iter()
        .filter(|bd| references(bd, ClassName::RsContext, CTX_TARGET, ctx))
        .map(|bd| bd.name().to_string())
        .collect()
}

/// L3outs attached to the routing context `ctx`.
pub fn l3outs_for_context(l3outs: &[&ManagedObject], ctx: &str) -> Vec<String> {
    l3outs
        .iter()
        .filter(|l3out| references(l3out, ClassName::RsL3OutContext, CTX_TARGET, ctx))
        .map(|l3out| l3out.name().to_string())
        .collect()
}

// ============================================================================
// L3out Queries
// ============================================================================

/// Contracts consumed by the instance profiles of an L3out.
pub fn l3out_consumed_contracts(l3out: &ManagedObject) -> Vec<String> {
    instance_profile_children(l3out)
        .filter_map(|child| child.as_class(&ClassName::RsConsumer))
        .map(|rel| rel.attr_or_empty(CONTRACT_TARGET).to_string())
        .collect()
}

fn l3out_subnets_with_scope(l3out: &ManagedObject, scope: &str) -> Vec<String> {
    instance_profile_children(l3out)
        .filter_map(|child| child.as_class(&ClassName::L3OutSubnet))
        .filter(|subnet| subnet.attr("scope") == Some(scope))
        .map(|subnet| subnet.attr_or_empty("ip").to_string())
        .collect()
}

/// Subnets an L3out announces (scope `export-rtctrl`).
pub fn l3out_export_subnets(l3out: &ManagedObject) -> Vec<String> {
    l3out_subnets_with_scope(l3out, SCOPE_EXPORT)
}

/// Subnets an L3out classifies as external (scope `import-security`).
pub fn l3out_import_subnets(l3out: &ManagedObject) -> Vec<String> {
    l3out_subnets_with_scope(l3out, SCOPE_IMPORT)
}

/// Static route prefixes configured under the node profiles of the L3out
/// named `name`.
///
/// Every `ip` value below the node profiles counts, at any depth. Returned as
/// a set: duplicates collapse and callers must not rely on input order.
pub fn static_routes(l3outs: &[&ManagedObject], name: &str) -> BTreeSet<String> {
    let node_profiles = l3outs
        .iter()
        .filter(|l3out| l3out.name() == name)
        .flat_map(|l3out| l3out.children_of(ClassName::NodeProfile));

    tenantdoc_config::find_all_in("ip", node_profiles)
        .filter_map(|found| found.as_str())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Endpoint Group Queries
// ============================================================================

/// Contracts an EPG consumes.
pub fn epg_consumed_contracts(epg: &ManagedObject) -> Vec<String> {
    targets(epg, ClassName::RsConsumer, CONTRACT_TARGET)
        .map(str::to_string)
        .collect()
}

/// Contracts an EPG provides, as `"<contract> - <epg description>"`.
pub fn epg_provided_contracts(epg: &ManagedObject) -> Vec<String> {
    targets(epg, ClassName::RsProvider, CONTRACT_TARGET)
        .map(|contract| with_description(epg, contract))
        .collect()
}

/// Bridge domain an EPG is bound to. The first `fvRsBd` wins.
pub fn bridge_domain_for_epg(epg: &ManagedObject) -> Option<String> {
    targets(epg, ClassName::RsBridgeDomain, BD_TARGET)
        .next()
        .map(str::to_string)
}

/// Subnet gateways of the bridge domain(s) named `name`.
pub fn subnets_for_bridge_domain(bridge_domains: &[&ManagedObject], name: &str) -> Vec<String> {
    bridge_domains
        .iter()
        .filter(|bd| bd.name() == name)
        .flat_map(|bd| bd.children_of(ClassName::BdSubnet))
        .map(|subnet| subnet.attr_or_empty("ip").to_string())
        .collect()
}

/// A static path binding of an EPG (`fvRsPathAtt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathAttachment {
    pub target: String,
    pub encap: String,
    pub mode: String,
}

impl fmt::Display for PathAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}; {}", self.target, self.encap, self.mode)
    }
}

/// Static paths of an EPG in document order.
pub fn epg_paths(epg: &ManagedObject) -> Vec<PathAttachment> {
    epg.children_of(ClassName::RsPathAttachment)
        .map(|path| PathAttachment {
            target: path.attr_or_empty("tDn").to_string(),
            encap: path.attr_or_empty("encap").to_string(),
            mode: path.attr_or_empty("mode").to_string(),
        })
        .collect()
}

// ============================================================================
// Contract Usage
// ============================================================================

/// EPGs consuming `contract`, in EPG order.
pub fn epgs_consuming(epgs: &[&ManagedObject], contract: &str) -> Vec<String> {
    epgs.iter()
        .filter(|epg| references(epg, ClassName::RsConsumer, CONTRACT_TARGET, contract))
        .map(|epg| epg.name().to_string())
        .collect()
}

/// EPGs providing `contract`, as `"<epg> - <epg description>"`, in EPG order.
pub fn epgs_providing(epgs: &[&ManagedObject], contract: &str) -> Vec<String> {
    epgs.iter()
        .filter(|epg| references(epg, ClassName::RsProvider, CONTRACT_TARGET, contract))
        .map(|epg| with_description(epg, epg.name()))
        .collect()
}

/// EPGs using `contract` in either role.
pub fn epgs_for_contract(epgs: &[&ManagedObject], contract: &str) -> BTreeSet<String> {
    epgs.iter()
        .filter(|epg| {
            references(epg, ClassName::RsConsumer, CONTRACT_TARGET, contract)
                || references(epg, ClassName::RsProvider, CONTRACT_TARGET, contract)
        })
        .map(|epg| epg.name().to_string())
        .collect()
}

/// L3outs whose instance profiles use `contract` in either role.
pub fn l3outs_for_contract(l3outs: &[&ManagedObject], contract: &str) -> BTreeSet<String> {
    l3outs
        .iter()
        .filter(|l3out| {
            instance_profile_children(l3out).any(|child| {
                matches!(child.class, ClassName::RsConsumer | ClassName::RsProvider)
                    && child.object.attr(CONTRACT_TARGET) == Some(contract)
            })
        })
        .map(|l3out| l3out.name().to_string())
        .collect()
}
