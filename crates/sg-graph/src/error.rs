//! Graph-specific error types.

use sg_core::{EdgeId, GraphId, NodeId, SgError};

/// Result type for graph and registry operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Graph mutation, validation and registry errors.
///
/// Structural variants are returned before anything is applied, so a
/// rejected mutation leaves the graph as it was.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A node or edge id is already taken and overwrite was not requested.
    #[error("Duplicate {what} id: {id}")]
    DuplicateId { what: &'static str, id: String },

    /// An edge endpoint does not resolve to a node in the same graph.
    #[error("Edge {edge} refers to non-existent node {endpoint}")]
    DanglingEndpoint { edge: EdgeId, endpoint: NodeId },

    /// A second geo_position node, or replacing the only one with another kind.
    #[error("geo_position conflict: node {existing} already holds the graph's geo position (incoming {incoming})")]
    GeoPositionConflict { existing: NodeId, incoming: NodeId },

    /// Removal blocked by edges still referencing the node.
    #[error("Node {node} is referenced by {} edge(s)", .edges.len())]
    NodeInUse { node: NodeId, edges: Vec<EdgeId> },

    #[error("Duplicate graph id: {graph_id}")]
    DuplicateGraphId { graph_id: GraphId },

    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    #[error("Edge not found: {id}")]
    EdgeNotFound { id: EdgeId },

    #[error("Graph not found: {graph_id}")]
    GraphNotFound { graph_id: GraphId },

    /// A writer panicked while holding the graph lock.
    #[error("Graph {graph_id} is poisoned by a failed writer")]
    Poisoned { graph_id: GraphId },

    /// Post-hoc integrity check failed.
    #[error("Graph {graph_id} failed integrity check: {what}")]
    Integrity { graph_id: GraphId, what: String },

    #[error("Invalid payload for node {node}: {source}")]
    Payload {
        node: NodeId,
        #[source]
        source: SgError,
    },
}
