//! Export document model.
//!
//! Shape:
//! ```text
//! { "context": {}, "multigraph": { "<graph_id>": { "name@it": ..., "data": {...},
//!   "nodes": {...}, "edges": { "line": [...], ..., "TBD": [...] } } } }
//! ```
//! Graph, node and epoch maps keep insertion order; every edge bucket and the
//! `geo_position`/`epochs` keys are always written.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use sg_core::{EdgeKind, Real};

/// String-keyed map that serializes in insertion order.
///
/// Equality is order-sensitive, matching the serialized form.
#[derive(Debug, Clone)]
pub struct Ordered<T>(IndexMap<String, T>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<T> Ordered<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, or replace in place keeping the key's position. Returns the
    /// replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: PartialEq> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl<T: Serialize> Serialize for Ordered<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Top-level export document.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Document {
    /// Empty unless the ontology context was requested.
    pub context: Map<String, Value>,
    pub multigraph: Ordered<GraphDocument>,
}

/// One graph in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDocument {
    /// Locale suffix of the metadata keys.
    pub locale: String,
    pub name: String,
    pub description: String,
    pub audio: Vec<String>,
    pub video: Vec<String>,
    pub image: Vec<String>,
    pub data: GraphData,
    pub nodes: Ordered<NodeDocument>,
    pub edges: EdgeBuckets,
}

impl Serialize for GraphDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let loc = &self.locale;
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry(&format!("name@{loc}"), &self.name)?;
        map.serialize_entry(&format!("description@{loc}"), &self.description)?;
        map.serialize_entry(&format!("audio@{loc}"), &self.audio)?;
        map.serialize_entry(&format!("video@{loc}"), &self.video)?;
        map.serialize_entry(&format!("image@{loc}"), &self.image)?;
        map.serialize_entry("data", &self.data)?;
        map.serialize_entry("nodes", &self.nodes)?;
        map.serialize_entry("edges", &self.edges)?;
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct GraphData {
    /// Empty object when the graph has no geo_position node.
    pub geo_position: Map<String, Value>,
    pub epochs: Ordered<EpochDocument>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EpochDocument {
    pub min: Real,
    pub max: Real,
    pub start: Real,
    pub end: Real,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NodeDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EdgePair {
    pub from: String,
    pub to: String,
}

/// The six fixed edge buckets, in `EdgeKind::ALL` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeBuckets {
    buckets: [Vec<EdgePair>; 6],
}

impl EdgeBuckets {
    fn slot(kind: EdgeKind) -> usize {
        match kind {
            EdgeKind::Line => 0,
            EdgeKind::Dashed => 1,
            EdgeKind::Dotted => 2,
            EdgeKind::DoubleLine => 3,
            EdgeKind::DashedDotted => 4,
            EdgeKind::Tbd => 5,
        }
    }

    pub fn push(&mut self, kind: EdgeKind, from: impl Into<String>, to: impl Into<String>) {
        self.buckets[Self::slot(kind)].push(EdgePair {
            from: from.into(),
            to: to.into(),
        });
    }

    pub fn get(&self, kind: EdgeKind) -> &[EdgePair] {
        &self.buckets[Self::slot(kind)]
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

impl Serialize for EdgeBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EdgeKind::ALL.len()))?;
        for kind in EdgeKind::ALL {
            map.serialize_entry(kind.as_str(), self.get(kind))?;
        }
        map.end()
    }
}
