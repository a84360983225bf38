//! Edge entity.

use sg_core::{EdgeId, EdgeKind, NodeId, synthesize_edge_id};

/// A typed directed relationship between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind: EdgeKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
        }
    }

    /// Edge whose id is synthesized from its endpoints and kind.
    pub fn between(source: impl Into<NodeId>, target: impl Into<NodeId>, kind: EdgeKind) -> Self {
        let source = source.into();
        let target = target.into();
        let id = synthesize_edge_id(&source, kind, &target);
        Self::new(id, source, target, kind)
    }

    /// Edge from an importer record: the kind tag is coerced (unknown -> TBD)
    /// and a missing id is synthesized.
    pub fn from_record(
        id: Option<&str>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind_tag: &str,
    ) -> Self {
        let kind = EdgeKind::parse(kind_tag);
        match id {
            Some(id) if !id.is_empty() => Self::new(id, source, target, kind),
            _ => Self::between(source, target, kind),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The endpoint opposite `node_id`, if the edge touches it.
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }
}
