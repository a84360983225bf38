//! Import file validation.
//!
//! Malformed input is rejected here, before any record reaches a graph.

use std::collections::HashSet;

use crate::schema::{GraphDef, ImportFile};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_import(file: &ImportFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut kind_tags = HashSet::new();
    for kind in &file.kinds {
        if !kind_tags.insert(&kind.tag) {
            return Err(ValidationError::DuplicateId {
                id: kind.tag.clone(),
                context: "kinds".to_string(),
            });
        }
    }

    let mut graph_ids = HashSet::new();
    for graph in &file.graphs {
        if graph.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "graph id".to_string(),
                value: graph.id.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if !graph_ids.insert(&graph.id) {
            return Err(ValidationError::DuplicateId {
                id: graph.id.clone(),
                context: "graphs".to_string(),
            });
        }
        validate_graph_def(graph)?;
    }

    Ok(())
}

fn validate_graph_def(graph: &GraphDef) -> Result<(), ValidationError> {
    let mut node_ids = HashSet::new();
    let mut geo_positions = 0usize;
    for node in &graph.nodes {
        if node.id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("graph '{}' node id", graph.id),
                value: node.id.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: format!("graph '{}' nodes", graph.id),
            });
        }
        if node.kind == "geo_position" {
            geo_positions += 1;
            if geo_positions > 1 {
                return Err(ValidationError::InvalidValue {
                    field: format!("graph '{}' node '{}'", graph.id, node.id),
                    value: node.kind.clone(),
                    reason: "at most one geo_position node per graph".to_string(),
                });
            }
        }
    }

    let mut edge_ids = HashSet::new();
    for edge in &graph.edges {
        for endpoint in [&edge.from, &edge.to] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: endpoint.clone(),
                    context: format!("graph '{}' edge {} -> {}", graph.id, edge.from, edge.to),
                });
            }
        }
        if let Some(id) = &edge.id {
            if !edge_ids.insert(id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    id: id.clone(),
                    context: format!("graph '{}' edges", graph.id),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EdgeDef, ExportSettings, NodeDef};

    fn node(id: &str, kind: &str) -> NodeDef {
        NodeDef {
            id: id.into(),
            kind: kind.into(),
            name: String::new(),
            data: Default::default(),
        }
    }

    fn file(graphs: Vec<GraphDef>) -> ImportFile {
        ImportFile {
            version: LATEST_VERSION,
            export: ExportSettings::default(),
            kinds: vec![],
            graphs,
        }
    }

    fn graph(id: &str, nodes: Vec<NodeDef>, edges: Vec<EdgeDef>) -> GraphDef {
        GraphDef {
            id: id.into(),
            metadata: Default::default(),
            nodes,
            edges,
        }
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut f = file(vec![]);
        f.version = 99;
        assert!(matches!(
            validate_import(&f),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn rejects_duplicate_graph_ids() {
        let f = file(vec![graph("g", vec![], vec![]), graph("g", vec![], vec![])]);
        assert!(matches!(
            validate_import(&f),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_edge_to_undeclared_node() {
        let f = file(vec![graph(
            "g",
            vec![node("US01", "US")],
            vec![EdgeDef {
                id: None,
                from: "US01".into(),
                to: "US99".into(),
                kind: "line".into(),
            }],
        )]);
        assert!(matches!(
            validate_import(&f),
            Err(ValidationError::MissingReference { ref id, .. }) if id == "US99"
        ));
    }

    #[test]
    fn rejects_two_geo_positions() {
        let f = file(vec![graph(
            "g",
            vec![node("a", "geo_position"), node("b", "geo_position")],
            vec![],
        )]);
        assert!(matches!(
            validate_import(&f),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn accepts_unknown_edge_kinds() {
        let f = file(vec![graph(
            "g",
            vec![node("a", "US"), node("b", "US")],
            vec![EdgeDef {
                id: Some("e".into()),
                from: "a".into(),
                to: "b".into(),
                kind: "whatever".into(),
            }],
        )]);
        assert!(validate_import(&f).is_ok());
    }
}
