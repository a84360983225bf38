//! sg-graph: graph/model layer for stratigraph.
//!
//! Provides:
//! - Node and edge entities with kind-specific payloads
//! - The `Graph` container and its invariant-preserving mutation API
//! - An incremental builder for importers
//! - Integrity validation
//! - `GraphRegistry`, the owner of every graph in a session
//!
//! # Example
//!
//! ```
//! use sg_graph::{Edge, Graph, Node, NodePayload, Property};
//! use sg_core::EdgeKind;
//!
//! let mut graph = Graph::new("temple");
//! graph.add_node(Node::new("p1", "material", NodePayload::Property(Property::default())), false).unwrap();
//! graph.add_node(Node::new("p2", "height", NodePayload::Property(Property::default())), false).unwrap();
//! graph.add_edge(Edge::between("p1", "p2", EdgeKind::Dotted)).unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.edges().len(), 1);
//! ```

pub mod builder;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod registry;
pub mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use edge::Edge;
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphMetadata};
pub use node::{
    Combiner, Document, Epoch, Extractor, GeoPosition, Node, NodePayload, Property, Shift,
    Stratigraphic,
};
pub use registry::{GraphHandle, GraphRegistry};
pub use validate::validate_graph;
