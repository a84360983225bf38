//! Turning a validated import file into registered graphs.

use sg_core::{KindExtension, OntologyClass, OntologyTerm, TypeRegistry};
use sg_graph::{Graph, GraphBuilder, GraphError, GraphHandle, GraphMetadata, GraphRegistry};

use crate::schema::{GraphDef, ImportFile, MetadataDef};
use crate::validate::ValidationError;
use crate::{ProjectError, ProjectResult};

/// Built-in kinds plus every extension kind declared in the file.
pub fn build_type_registry(file: &ImportFile) -> ProjectResult<TypeRegistry> {
    let mut types = TypeRegistry::new();
    for def in &file.kinds {
        let term = match &def.ontology_class {
            Some(label) => match OntologyClass::parse(label) {
                Some(class) => OntologyTerm::class(class),
                None => {
                    return Err(ValidationError::InvalidValue {
                        field: format!("kind '{}' ontology_class", def.tag),
                        value: label.clone(),
                        reason: "unknown ontology class".to_string(),
                    }
                    .into());
                }
            },
            None => OntologyTerm::Custom,
        };
        let extension = def
            .required_fields
            .iter()
            .fold(KindExtension::new(def.tag.as_str(), term), |ext, field| {
                ext.require(field.as_str())
            });
        types.register(extension)?;
    }
    Ok(types)
}

fn metadata(def: &MetadataDef) -> GraphMetadata {
    GraphMetadata {
        name: def.name.clone(),
        description: def.description.clone(),
        audio: def.audio.clone(),
        video: def.video.clone(),
        image: def.image.clone(),
    }
}

/// Build one graph from its records. Node names default to the node id.
pub fn build_graph(def: &GraphDef, types: &TypeRegistry) -> ProjectResult<Graph> {
    let mut builder = GraphBuilder::new(def.id.as_str());
    builder.metadata(metadata(&def.metadata));

    for node in &def.nodes {
        let name = if node.name.is_empty() {
            node.id.as_str()
        } else {
            node.name.as_str()
        };
        builder.add_node_record(&node.id, &node.kind, name, &node.data, types)?;
    }
    for edge in &def.edges {
        builder.add_edge_record(edge.id.as_deref(), &edge.from, &edge.to, &edge.kind);
    }

    let graph = builder.build()?;
    tracing::debug!(
        graph_id = graph.id(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built graph"
    );
    Ok(graph)
}

/// Build every graph in the file and register them.
///
/// All graphs are built and checked against the registry before the first
/// one is registered, so a failure registers nothing.
pub fn import_into(
    file: &ImportFile,
    registry: &GraphRegistry,
    types: &TypeRegistry,
) -> ProjectResult<Vec<GraphHandle>> {
    let graphs = file
        .graphs
        .iter()
        .map(|def| build_graph(def, types))
        .collect::<ProjectResult<Vec<_>>>()?;

    if let Some(clash) = graphs.iter().find(|g| registry.get(g.id()).is_some()) {
        return Err(ProjectError::Graph(GraphError::DuplicateGraphId {
            graph_id: clash.id().to_string(),
        }));
    }

    let mut handles = Vec::with_capacity(graphs.len());
    for graph in graphs {
        handles.push(registry.register(graph)?);
    }
    tracing::info!(graphs = handles.len(), "imported graphs");
    Ok(handles)
}
