//! Single graph container: node/edge storage and the mutation API.

use std::collections::HashMap;

use sg_core::{GraphId, Localized, LocalizedText, NodeId};

use crate::edge::Edge;
use crate::error::{GraphError, GraphResult};
use crate::node::{Epoch, GeoPosition, Node};

/// Locale-tagged descriptive metadata of a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphMetadata {
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub audio: Localized<Vec<String>>,
    pub video: Localized<Vec<String>>,
    pub image: Localized<Vec<String>>,
}

/// The graph: nodes and edges with their invariants.
///
/// The graph stores:
/// - Nodes and edges in insertion order (drives deterministic export).
/// - Id -> position indices for O(1) lookup.
///
/// Invariants, held after every mutation:
/// - node ids and edge ids are unique;
/// - at most one `geo_position` node;
/// - every edge endpoint resolves to a node of this graph.
///
/// Nodes and edges are only changed through the methods below; a rejected
/// mutation leaves the graph untouched.
#[derive(Debug, Clone)]
pub struct Graph {
    id: GraphId,
    pub metadata: GraphMetadata,
    pub(crate) nodes: Vec<Node>,
    pub(crate) node_index: HashMap<NodeId, usize>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_index: HashMap<String, usize>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new(id: impl Into<GraphId>) -> Self {
        Self {
            id: id.into(),
            metadata: GraphMetadata::default(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Insert a node, or replace an existing one when `overwrite` is set.
    ///
    /// A replaced node keeps its position in insertion order and its edges.
    pub fn add_node(&mut self, node: Node, overwrite: bool) -> GraphResult<&Node> {
        let existing = self.node_index.get(&node.id).copied();

        if let Some(pos) = existing {
            if !overwrite {
                return Err(GraphError::DuplicateId {
                    what: "node",
                    id: node.id,
                });
            }
            if self.nodes[pos].is_geo_position() && !node.is_geo_position() {
                return Err(GraphError::GeoPositionConflict {
                    existing: node.id.clone(),
                    incoming: node.id,
                });
            }
        }

        if node.is_geo_position() {
            if let Some(geo) = self.geo_position() {
                if geo.id != node.id {
                    return Err(GraphError::GeoPositionConflict {
                        existing: geo.id.clone(),
                        incoming: node.id,
                    });
                }
            }
        }

        let pos = match existing {
            Some(pos) => {
                self.nodes[pos] = node;
                pos
            }
            None => {
                let pos = self.nodes.len();
                self.node_index.insert(node.id.clone(), pos);
                self.nodes.push(node);
                pos
            }
        };
        Ok(&self.nodes[pos])
    }

    /// Insert an edge. Both endpoints must already be present.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<&Edge> {
        if self.edge_index.contains_key(&edge.id) {
            return Err(GraphError::DuplicateId {
                what: "edge",
                id: edge.id,
            });
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.node_index.contains_key(endpoint) {
                return Err(GraphError::DanglingEndpoint {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }

        let pos = self.edges.len();
        self.edge_index.insert(edge.id.clone(), pos);
        self.edges.push(edge);
        Ok(&self.edges[pos])
    }

    /// Remove a node that no edge references.
    pub fn remove_node(&mut self, id: &str) -> GraphResult<Node> {
        let pos = *self
            .node_index
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound { id: id.to_string() })?;

        let in_use: Vec<String> = self
            .incident_edges(id)
            .map(|e| e.id.clone())
            .collect();
        if !in_use.is_empty() {
            return Err(GraphError::NodeInUse {
                node: id.to_string(),
                edges: in_use,
            });
        }

        let node = self.nodes.remove(pos);
        self.node_index.remove(id);
        for (i, n) in self.nodes.iter().enumerate().skip(pos) {
            self.node_index.insert(n.id.clone(), i);
        }
        Ok(node)
    }

    pub fn remove_edge(&mut self, id: &str) -> GraphResult<Edge> {
        let pos = *self
            .edge_index
            .get(id)
            .ok_or_else(|| GraphError::EdgeNotFound { id: id.to_string() })?;

        let edge = self.edges.remove(pos);
        self.edge_index.remove(id);
        for (i, e) in self.edges.iter().enumerate().skip(pos) {
            self.edge_index.insert(e.id.clone(), i);
        }
        Ok(edge)
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The graph's single geo_position node, if any.
    pub fn geo_position(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_geo_position())
    }

    pub fn geo_position_payload(&self) -> Option<&GeoPosition> {
        self.geo_position().and_then(Node::as_geo_position)
    }

    /// Edges with `node_id` as source or target, in insertion order.
    pub fn incident_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }

    /// Nodes whose kind tag family matches `family` (e.g. `stratigraphic`).
    pub fn nodes_of_kind<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.kind().family() == family)
    }

    /// Epoch nodes with their payloads, in insertion order.
    pub fn epochs(&self) -> impl Iterator<Item = (&Node, &Epoch)> {
        self.nodes
            .iter()
            .filter_map(|n| n.as_epoch().map(|e| (n, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodePayload, Property};
    use sg_core::EdgeKind;

    fn geo(id: &str) -> Node {
        Node::new(
            id,
            "geo",
            NodePayload::GeoPosition(GeoPosition {
                epsg: 3004,
                shift_x: 0.0,
                shift_y: 0.0,
                shift_z: 0.0,
            }),
        )
    }

    fn prop(id: &str) -> Node {
        Node::new(id, id, NodePayload::Property(Property::default()))
    }

    #[test]
    fn duplicate_node_without_overwrite() {
        let mut g = Graph::new("g");
        g.add_node(prop("p1"), false).unwrap();
        let err = g.add_node(prop("p1"), false).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateId { what: "node", .. }));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn overwrite_replaces_in_place() {
        let mut g = Graph::new("g");
        g.add_node(prop("p1"), false).unwrap();
        g.add_node(prop("p2"), false).unwrap();
        let mut replacement = prop("p1");
        replacement.name = "renamed".into();
        let stored = g.add_node(replacement, true).unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(g.nodes()[0].name, "renamed");
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn second_geo_position_is_rejected() {
        let mut g = Graph::new("g");
        g.add_node(geo("geo1"), false).unwrap();
        let err = g.add_node(geo("geo2"), false).unwrap_err();
        assert!(matches!(err, GraphError::GeoPositionConflict { .. }));
        // Overwrite of a different id does not help either.
        g.add_node(prop("p"), false).unwrap();
        assert!(g.add_node(geo("p"), true).is_err());
        assert_eq!(g.geo_position().unwrap().id, "geo1");
    }

    #[test]
    fn geo_position_overwrite_rules() {
        let mut g = Graph::new("g");
        g.add_node(geo("geo"), false).unwrap();
        let err = g.add_node(prop("geo"), true).unwrap_err();
        assert!(matches!(err, GraphError::GeoPositionConflict { .. }));
        assert!(g.get_node("geo").unwrap().is_geo_position());

        let mut moved = geo("geo");
        moved.name = "moved".into();
        g.add_node(moved, true).unwrap();
        assert_eq!(g.geo_position().unwrap().name, "moved");
    }

    #[test]
    fn dangling_edge_leaves_graph_unchanged() {
        let mut g = Graph::new("g");
        g.add_node(prop("a"), false).unwrap();
        let err = g
            .add_edge(Edge::between("a", "missing", EdgeKind::Line))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEndpoint {
                edge: "a_line_missing".into(),
                endpoint: "missing".into()
            }
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_id() {
        let mut g = Graph::new("g");
        g.add_node(prop("a"), false).unwrap();
        g.add_node(prop("b"), false).unwrap();
        g.add_edge(Edge::new("e", "a", "b", EdgeKind::Line)).unwrap();
        let err = g.add_edge(Edge::new("e", "b", "a", EdgeKind::Dotted)).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateId { what: "edge", .. }));
        assert_eq!(g.get_edge("e").unwrap().kind, EdgeKind::Line);
    }

    #[test]
    fn remove_node_in_use_then_free() {
        let mut g = Graph::new("g");
        g.add_node(prop("a"), false).unwrap();
        g.add_node(prop("b"), false).unwrap();
        g.add_node(prop("c"), false).unwrap();
        g.add_edge(Edge::new("e", "a", "b", EdgeKind::Line)).unwrap();

        let err = g.remove_node("b").unwrap_err();
        assert_eq!(
            err,
            GraphError::NodeInUse {
                node: "b".into(),
                edges: vec!["e".into()]
            }
        );

        g.remove_edge("e").unwrap();
        g.remove_node("b").unwrap();
        assert_eq!(g.get_node("c").unwrap().id, "c");
        let ids: Vec<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(matches!(
            g.remove_node("b"),
            Err(GraphError::NodeNotFound { .. })
        ));
    }
}
