//! Incremental graph builder for importers.

use serde_json::{Map, Value};
use sg_core::{GraphId, TypeRegistry};

use crate::edge::Edge;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, GraphMetadata};
use crate::node::Node;
use crate::validate;

/// Builder for constructing a graph from importer records.
///
/// Records may arrive in any order (an edge before its endpoints); `build()`
/// inserts all nodes first, then all edges, and validates the result.
#[derive(Debug)]
pub struct GraphBuilder {
    id: GraphId,
    metadata: GraphMetadata,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new(id: impl Into<GraphId>) -> Self {
        Self {
            id: id.into(),
            metadata: GraphMetadata::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn metadata(&mut self, metadata: GraphMetadata) -> &mut Self {
        self.metadata = metadata;
        self
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Parse and add a node record against the kind registry.
    pub fn add_node_record(
        &mut self,
        id: &str,
        kind_tag: &str,
        name: &str,
        attributes: &Map<String, Value>,
        types: &TypeRegistry,
    ) -> GraphResult<&mut Self> {
        let node = Node::from_record(id, kind_tag, name, attributes, types).map_err(|source| {
            GraphError::Payload {
                node: id.to_string(),
                source,
            }
        })?;
        Ok(self.add_node(node))
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Add an edge record; unknown kinds become TBD, a missing id is synthesized.
    pub fn add_edge_record(
        &mut self,
        id: Option<&str>,
        source: &str,
        target: &str,
        kind_tag: &str,
    ) -> &mut Self {
        self.add_edge(Edge::from_record(id, source, target, kind_tag))
    }

    /// Build and validate the graph.
    pub fn build(self) -> GraphResult<Graph> {
        let mut graph = Graph::new(self.id);
        graph.metadata = self.metadata;

        for node in self.nodes {
            graph.add_node(node, false)?;
        }
        for edge in self.edges {
            graph.add_edge(edge)?;
        }

        validate::validate_graph(&graph)?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sg_core::EdgeKind;

    fn attrs(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn edges_may_precede_nodes() {
        let types = TypeRegistry::new();
        let mut builder = GraphBuilder::new("g");
        builder.add_edge_record(None, "US01", "US02", "line");
        builder
            .add_node_record("US01", "US", "US01", &attrs(json!({"rel_time": 1.0})), &types)
            .unwrap();
        builder
            .add_node_record("US02", "US", "US02", &attrs(json!({"rel_time": 2.0})), &types)
            .unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges()[0].kind, EdgeKind::Line);
    }

    #[test]
    fn build_rejects_dangling_edge() {
        let mut builder = GraphBuilder::new("g");
        builder.add_edge_record(Some("e"), "a", "b", "wavy");
        assert!(matches!(
            builder.build(),
            Err(GraphError::DanglingEndpoint { .. })
        ));
    }

    #[test]
    fn bad_record_reports_node_id() {
        let types = TypeRegistry::new();
        let mut builder = GraphBuilder::new("g");
        let err = builder
            .add_node_record("e1", "epoch", "Archaic", &attrs(json!({"min": 1})), &types)
            .unwrap_err();
        assert!(matches!(err, GraphError::Payload { ref node, .. } if node == "e1"));
    }
}
