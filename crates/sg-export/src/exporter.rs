//! Registry -> document export.

use serde_json::{Map, Value, json};
use sg_core::{DEFAULT_LOCALE, GraphId, OntologyTerm, TypeRegistry};
use sg_graph::{Graph, GraphError, GraphRegistry, validate_graph};

use crate::document::{Document, EdgeBuckets, EpochDocument, GraphData, GraphDocument, NodeDocument};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Locale suffix of the metadata keys (`name@<locale>`).
    pub locale: String,
    /// Fill `context` with the kind -> ontology mapping table.
    pub include_ontology_context: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            include_ontology_context: false,
        }
    }
}

/// A graph left out of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGraph {
    pub graph_id: GraphId,
    pub reason: GraphError,
}

/// Document plus the non-fatal findings of the export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub document: Document,
    pub skipped: Vec<SkippedGraph>,
    /// Graphs exported without a geo_position node.
    pub missing_geo_position: Vec<GraphId>,
}

/// Walks a `GraphRegistry` and builds one document.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    types: TypeRegistry,
    options: ExportOptions,
}

impl Exporter {
    pub fn new(types: TypeRegistry) -> Self {
        Self {
            types,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export every registered graph.
    ///
    /// Works on a frozen list of handles and reads each graph under its own
    /// lock, so graphs registered or mutated elsewhere meanwhile do not block
    /// or tear the export. A graph that cannot be read cleanly is skipped.
    pub fn export(&self, registry: &GraphRegistry) -> ExportReport {
        let mut report = ExportReport {
            document: Document::default(),
            skipped: Vec::new(),
            missing_geo_position: Vec::new(),
        };
        if self.options.include_ontology_context {
            report.document.context = self.ontology_context();
        }

        for handle in registry.snapshot() {
            let outcome = handle.read().and_then(|graph| {
                validate_graph(&graph)?;
                Ok((self.export_graph(&graph), graph.geo_position().is_none()))
            });
            match outcome {
                Ok((doc, missing_geo)) => {
                    if missing_geo {
                        tracing::warn!(graph_id = handle.id(), "graph has no geo_position node");
                        report.missing_geo_position.push(handle.id().to_string());
                    }
                    tracing::debug!(
                        graph_id = handle.id(),
                        nodes = doc.nodes.len(),
                        edges = doc.edges.total(),
                        "exported graph"
                    );
                    report.document.multigraph.insert(handle.id(), doc);
                }
                Err(reason) => {
                    tracing::warn!(graph_id = handle.id(), error = %reason, "skipping graph");
                    report.skipped.push(SkippedGraph {
                        graph_id: handle.id().to_string(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            graphs = report.document.multigraph.len(),
            skipped = report.skipped.len(),
            "export finished"
        );
        report
    }

    /// Document entry for a single graph.
    pub fn export_graph(&self, graph: &Graph) -> GraphDocument {
        let loc = self.options.locale.as_str();
        let meta = &graph.metadata;

        let mut data = GraphData {
            geo_position: graph
                .geo_position()
                .map(|n| n.payload.to_data())
                .unwrap_or_default(),
            ..GraphData::default()
        };
        for (node, epoch) in graph.epochs() {
            let replaced = data.epochs.insert(
                node.name.as_str(),
                EpochDocument {
                    min: epoch.min,
                    max: epoch.max,
                    start: epoch.start,
                    end: epoch.end,
                    color: epoch.color.clone(),
                },
            );
            if replaced.is_some() {
                tracing::debug!(graph_id = graph.id(), epoch = %node.name, "duplicate epoch name, last one wins");
            }
        }

        let mut doc = GraphDocument {
            locale: loc.to_string(),
            name: meta.name.get_or_default(loc),
            description: meta.description.get_or_default(loc),
            audio: meta.audio.get_or_default(loc),
            video: meta.video.get_or_default(loc),
            image: meta.image.get_or_default(loc),
            data,
            nodes: Default::default(),
            edges: EdgeBuckets::default(),
        };

        for node in graph.nodes() {
            doc.nodes.insert(
                node.id.as_str(),
                NodeDocument {
                    kind: node.kind().as_str().to_string(),
                    name: node.name.clone(),
                    data: node.payload.to_data(),
                },
            );
        }
        for edge in graph.edges() {
            doc.edges.push(edge.kind, edge.source.as_str(), edge.target.as_str());
        }
        doc
    }

    /// The kind -> ontology mapping table as a JSON object.
    pub fn ontology_context(&self) -> Map<String, Value> {
        let mut nodes = Map::new();
        for (tag, term) in self.types.node_mappings() {
            nodes.insert(tag.to_string(), term_json(&term));
        }
        let mut edges = Map::new();
        for (kind, term) in self.types.edge_mappings() {
            edges.insert(kind.as_str().to_string(), term_json(term));
        }

        let mut context = Map::new();
        context.insert("ontology".into(), json!("CIDOC-CRM"));
        context.insert("node_kinds".into(), Value::Object(nodes));
        context.insert("edge_kinds".into(), Value::Object(edges));
        context
    }
}

fn term_json(term: &OntologyTerm) -> Value {
    let mut out = Map::new();
    out.insert("term".into(), json!(term.label()));
    if let Some(code) = term.code() {
        out.insert("code".into(), json!(code));
    }
    if let Some(modifier) = term.modifier() {
        out.insert("modifier".into(), json!(modifier));
    }
    if term.is_custom() {
        out.insert("custom".into(), json!(true));
    }
    Value::Object(out)
}

/// Export every registered graph with the built-in kinds and default options.
pub fn export_all(registry: &GraphRegistry) -> Document {
    Exporter::default().export(registry).document
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::{OntologyClass, KindExtension};

    #[test]
    fn context_is_empty_by_default() {
        let doc = export_all(&GraphRegistry::new());
        assert!(doc.context.is_empty());
    }

    #[test]
    fn ontology_context_lists_every_kind() {
        let mut types = TypeRegistry::new();
        types
            .register(KindExtension::new("author", OntologyTerm::class(OntologyClass::Event)))
            .unwrap();
        let exporter = Exporter::new(types).with_options(ExportOptions {
            include_ontology_context: true,
            ..ExportOptions::default()
        });
        let ctx = exporter.export(&GraphRegistry::new()).document.context;

        assert_eq!(ctx["node_kinds"]["geo_position"], json!({"term": "Place", "code": "E53"}));
        assert_eq!(
            ctx["node_kinds"]["shift"],
            json!({"term": "Place", "code": "E53", "modifier": "shift"})
        );
        assert_eq!(ctx["node_kinds"]["combiner"]["custom"], json!(true));
        assert_eq!(ctx["node_kinds"]["author"]["term"], json!("Event"));
        assert_eq!(ctx["edge_kinds"]["line"], json!({"term": "has-time-span", "code": "P4"}));
        assert_eq!(ctx["edge_kinds"]["TBD"], json!({"term": "Custom", "custom": true}));
        assert_eq!(ctx["edge_kinds"].as_object().unwrap().len(), 6);
    }
}
