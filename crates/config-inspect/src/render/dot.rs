//! Graphviz DOT renderer.
//!
//! The output feeds `dot` directly:
//!   dot -Tpng -o prod.png prod.dot

use crate::graph::{GraphKind, GraphModel};

/// Render a diagram as DOT source.
pub fn render(graph: &GraphModel) -> String {
    let (keyword, connector) = match graph.kind {
        GraphKind::Undirected => ("graph", "--"),
        GraphKind::Directed => ("digraph", "->"),
    };

    let mut out = String::with_capacity(512);
    out.push_str(&format!("{} \"{}\" {{\n", keyword, escape(&graph.name)));
    out.push_str("    fontname=\"Helvetica\";\n");
    out.push_str("    node [fontname=\"Helvetica\", fontsize=10];\n");
    out.push_str("    edge [fontname=\"Helvetica\", fontsize=9];\n\n");

    // Nodes outside rank groups
    let ranked = |label: &String| graph.rank_groups.iter().any(|g| g.nodes.contains(label));
    for node in graph.nodes.iter().filter(|n| !ranked(*n)) {
        out.push_str(&format!("    \"{}\";\n", escape(node)));
    }

    for group in &graph.rank_groups {
        out.push_str(&format!("    {{\n        rank={};\n", group.rank.as_str()));
        for node in &group.nodes {
            out.push_str(&format!("        \"{}\";\n", escape(node)));
        }
        out.push_str("    }\n");
    }

    if !graph.edges.is_empty() {
        out.push('\n');
    }
    for edge in &graph.edges {
        let attrs = if edge.both_ways { " [dir=both]" } else { "" };
        out.push_str(&format!(
            "    \"{}\" {} \"{}\"{};\n",
            escape(&edge.from),
            connector,
            escape(&edge.to),
            attrs
        ));
    }

    out.push_str("}\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
