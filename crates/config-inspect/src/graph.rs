//! Relationship diagrams for report subjects.

use serde::Serialize;
use tenantdoc_config::Inventory;

use crate::relations;

// ============================================================================
// Graph Types
// ============================================================================

/// Edge semantics of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Undirected,
    Directed,
}

/// Graphviz rank constraint of a node group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Min,
    Max,
    Same,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Min => "min",
            Rank::Max => "max",
            Rank::Same => "same",
        }
    }
}

/// Nodes laid out on a common rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankGroup {
    pub rank: Rank,
    pub nodes: Vec<String>,
}

/// An edge between two node labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// Drawn with arrowheads at both ends (`dir=both`)
    pub both_ways: bool,
}

/// A diagram for one report subject. Nodes are identified by their label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphModel {
    pub name: String,
    pub kind: GraphKind,
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
    pub rank_groups: Vec<RankGroup>,
}

impl GraphModel {
    pub fn new(name: impl Into<String>, kind: GraphKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nodes: Vec::new(),
            edges: Vec::new(),
            rank_groups: Vec::new(),
        }
    }

    /// Add a node unless a node with the same label exists.
    pub fn add_node(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.nodes.contains(&label) {
            self.nodes.push(label);
        }
    }

    /// Add an edge, creating its endpoints if needed.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>, both_ways: bool) {
        let (from, to) = (from.into(), to.into());
        self.add_node(from.clone());
        self.add_node(to.clone());
        self.edges.push(GraphEdge {
            from,
            to,
            both_ways,
        });
    }

    /// Add a rank group; its nodes are added to the graph too.
    pub fn add_rank_group(&mut self, rank: Rank, nodes: Vec<String>) {
        for node in &nodes {
            self.add_node(node.clone());
        }
        self.rank_groups.push(RankGroup { rank, nodes });
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ============================================================================
// Node Labels
// ============================================================================

pub fn vrf_label(name: &str) -> String {
    format!("VRF {name}")
}

pub fn bd_label(name: &str) -> String {
    format!("BD {name}")
}

pub fn l3out_label(name: &str) -> String {
    format!("L3out {name}")
}

pub fn contract_label(name: &str) -> String {
    format!("Contract {name}")
}

pub fn epg_member_label(name: &str) -> String {
    format!("EPG\n{name}")
}

pub fn l3out_member_label(name: &str) -> String {
    format!("L3 out\n{name}")
}

// ============================================================================
// Graph Construction
// ============================================================================

/// Membership diagram of a routing context.
///
/// VRF to each of its bridge domains, each bridge domain to its subnets, VRF
/// to each of its L3outs. Returns `None` when the VRF has no members, so no
/// empty diagram is ever drawn.
pub fn context_graph(inventory: &Inventory<'_>, ctx: &str) -> Option<GraphModel> {
    let mut graph = GraphModel::new(ctx, GraphKind::Undirected);
    let vrf = vrf_label(ctx);

    for bd in relations::bridge_domains_for_context(&inventory.bridge_domains, ctx) {
        let bd_node = bd_label(&bd);
        graph.add_edge(vrf.clone(), bd_node.clone(), false);
        for ip in relations::subnets_for_bridge_domain(&inventory.bridge_domains, &bd) {
            graph.add_edge(bd_node.clone(), ip, false);
        }
    }

    for l3out in relations::l3outs_for_context(&inventory.l3outs, ctx) {
        graph.add_edge(vrf.clone(), l3out_label(&l3out), false);
    }

    (!graph.is_empty()).then_some(graph)
}

/// Usage diagram of a contract.
///
/// The contract node is always present. Users hang off it with two-way
/// edges: EPGs ranked below (`max`), L3outs above (`min`). A group with no
/// members is left out.
pub fn contract_graph(inventory: &Inventory<'_>, contract: &str) -> GraphModel {
    let mut graph = GraphModel::new(contract, GraphKind::Directed);
    let contract_node = contract_label(contract);
    graph.add_node(contract_node.clone());

    let epgs: Vec<String> = relations::epgs_for_contract(&inventory.epgs, contract)
        .iter()
        .map(|epg| epg_member_label(epg))
        .collect();
    let l3outs: Vec<String> = relations::l3outs_for_contract(&inventory.l3outs, contract)
        .iter()
        .map(|l3out| l3out_member_label(l3out))
        .collect();

    for (rank, members) in [(Rank::Max, epgs), (Rank::Min, l3outs)] {
        if members.is_empty() {
            continue;
        }
        for member in &members {
            graph.add_edge(contract_node.clone(), member.clone(), true);
        }
        graph.add_rank_group(rank, members);
    }

    graph
}
