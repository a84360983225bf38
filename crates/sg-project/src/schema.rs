//! Import file schema.
//!
//! An import file is the handoff from an external importer (e.g. a GraphML
//! reader): already-parsed node and edge records grouped per graph, plus the
//! session settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sg_core::{DEFAULT_LOCALE, Localized, LocalizedText};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportFile {
    pub version: u32,
    #[serde(default)]
    pub export: ExportSettings,
    /// Extension node kinds to register before the graphs are read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<KindDef>,
    #[serde(default)]
    pub graphs: Vec<GraphDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSettings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_true")]
    pub pretty: bool,
    #[serde(default)]
    pub ontology_context: bool,
    /// Run temporal inference on every graph after import.
    #[serde(default = "default_true")]
    pub infer: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            pretty: true,
            ontology_context: false,
            infer: true,
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KindDef {
    pub tag: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Ontology class label or code; absent means the custom sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDef {
    pub id: String,
    #[serde(default)]
    pub metadata: MetadataDef,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

/// Locale-keyed metadata, e.g. `name: { it: "Tempio", en: "Temple" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetadataDef {
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub audio: Localized<Vec<String>>,
    #[serde(default)]
    pub video: Localized<Vec<String>>,
    #[serde(default)]
    pub image: Localized<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Defaults to the id when empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    /// Any tag; unrecognised ones become TBD on import.
    #[serde(rename = "type", default = "default_edge_kind")]
    pub kind: String,
}

fn default_edge_kind() -> String {
    "TBD".to_string()
}
