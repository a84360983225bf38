//! Audit trail of an inference pass.

use sg_core::{EdgeId, GraphId, NodeId, Real};
use sg_graph::GraphError;

/// One property attached to a stratigraphic unit.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRecord {
    pub subject: NodeId,
    /// `start_time` or `end_time`.
    pub property: &'static str,
    pub property_node: NodeId,
    pub edge: EdgeId,
    pub epoch_node: NodeId,
    pub epoch_name: String,
    /// Bounds on the linked property node. For a new node these are the
    /// epoch's `start`/`end`.
    pub time_start: Option<Real>,
    pub time_end: Option<Real>,
    /// The property node already existed and only the edge was added.
    pub relinked: bool,
}

/// Non-fatal conditions met during a pass. None of them stops the pass.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InferenceDiagnostic {
    #[error("Unresolved temporal inference: node {node} (rel_time {rel_time}) lies in no epoch band")]
    UnresolvedTemporalInference { node: NodeId, rel_time: Real },

    #[error("Node {node} lies in {} overlapping epochs; chose {chosen}", .candidates.len())]
    OverlappingEpochs {
        node: NodeId,
        chosen: String,
        candidates: Vec<String>,
    },

    #[error("Cannot attach {property_node} to {node}: {source}")]
    AttachFailed {
        node: NodeId,
        property_node: NodeId,
        #[source]
        source: GraphError,
    },
}

/// Result of one pass over a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferenceReport {
    pub graph_id: GraphId,
    /// Stratigraphic units visited.
    pub examined: usize,
    /// Units that already had both properties.
    pub already_complete: usize,
    pub records: Vec<InferenceRecord>,
    pub diagnostics: Vec<InferenceDiagnostic>,
}

impl InferenceReport {
    /// Units left without temporal bounds.
    pub fn unresolved(&self) -> impl Iterator<Item = &NodeId> {
        self.diagnostics.iter().filter_map(|d| match d {
            InferenceDiagnostic::UnresolvedTemporalInference { node, .. } => Some(node),
            _ => None,
        })
    }

    /// Nothing was added and nothing went wrong.
    pub fn is_noop(&self) -> bool {
        self.records.is_empty() && self.unresolved().next().is_none()
    }
}
