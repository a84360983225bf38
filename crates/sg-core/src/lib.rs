//! sg-core: stable foundation for stratigraph.
//!
//! Contains:
//! - ids (string identifiers for graphs, nodes and edges)
//! - kinds (closed node/edge kind tags)
//! - ontology (kind -> cultural-heritage ontology mapping, `TypeRegistry`)
//! - locale (locale-tagged values)
//! - numeric (finiteness checks, vertical bands)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod kinds;
pub mod locale;
pub mod numeric;
pub mod ontology;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SgError, SgResult};
pub use ids::*;
pub use kinds::{EdgeKind, NodeKind, UnitType};
pub use locale::{DEFAULT_LOCALE, Localized, LocalizedText};
pub use numeric::*;
pub use ontology::{KindExtension, OntologyClass, OntologyRelation, OntologyTerm, TypeRegistry};
