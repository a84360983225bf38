//! Graph integrity validation.
//!
//! The mutation API keeps these invariants on its own; this check exists for
//! consumers (the exporter) that must tell a clean graph from one that cannot
//! be read cleanly before serializing it.

use std::collections::HashSet;

use sg_core::ensure_finite;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Validate every graph invariant plus finiteness of numeric payload fields.
pub fn validate_graph(graph: &Graph) -> GraphResult<()> {
    let fail = |what: String| GraphError::Integrity {
        graph_id: graph.id().to_string(),
        what,
    };

    // Indices must mirror storage exactly
    if graph.node_index.len() != graph.nodes.len() {
        return Err(fail("node index out of sync".to_string()));
    }
    if graph.edge_index.len() != graph.edges.len() {
        return Err(fail("edge index out of sync".to_string()));
    }
    for (i, node) in graph.nodes.iter().enumerate() {
        if graph.node_index.get(&node.id) != Some(&i) {
            return Err(fail(format!("node {} is not indexed at {}", node.id, i)));
        }
    }
    for (i, edge) in graph.edges.iter().enumerate() {
        if graph.edge_index.get(&edge.id) != Some(&i) {
            return Err(fail(format!("edge {} is not indexed at {}", edge.id, i)));
        }
    }

    let geo_count = graph.nodes.iter().filter(|n| n.is_geo_position()).count();
    if geo_count > 1 {
        return Err(fail(format!("{} geo_position nodes", geo_count)));
    }

    let mut edge_ids = HashSet::new();
    for edge in &graph.edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(fail(format!("duplicate edge id {}", edge.id)));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !graph.node_index.contains_key(endpoint) {
                return Err(GraphError::DanglingEndpoint {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
    }

    for node in &graph.nodes {
        for (field, value) in node.payload.numeric_fields() {
            ensure_finite(value, field).map_err(|source| GraphError::Payload {
                node: node.id.clone(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::node::{Node, NodePayload, Stratigraphic};
    use sg_core::{EdgeKind, LocalizedText, UnitType};

    fn unit(id: &str, rel_time: f64) -> Node {
        Node::new(
            id,
            id,
            NodePayload::Stratigraphic(Stratigraphic {
                unit: UnitType::Us,
                description: LocalizedText::new(),
                url: None,
                rel_time,
            }),
        )
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_graph(&Graph::new("empty")).is_ok());
    }

    #[test]
    fn validate_clean_graph() {
        let mut g = Graph::new("g");
        g.add_node(unit("US01", 1.0), false).unwrap();
        g.add_node(unit("US02", 2.0), false).unwrap();
        g.add_edge(Edge::between("US01", "US02", EdgeKind::Line)).unwrap();
        assert!(validate_graph(&g).is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_payload() {
        let mut g = Graph::new("g");
        g.add_node(unit("US01", f64::NAN), false).unwrap();
        let err = validate_graph(&g).unwrap_err();
        assert!(matches!(err, GraphError::Payload { .. }));
    }

    #[test]
    fn validate_detects_dangling_edge() {
        let mut g = Graph::new("g");
        g.add_node(unit("US01", 1.0), false).unwrap();
        // Bypass the mutation API to simulate a corrupted store.
        g.edges.push(Edge::between("US01", "ghost", EdgeKind::Line));
        g.edge_index.insert("US01_line_ghost".into(), 0);
        let err = validate_graph(&g).unwrap_err();
        assert!(matches!(err, GraphError::DanglingEndpoint { .. }));
    }
}
