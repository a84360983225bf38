//! The inference pass.

use sg_core::{Band, DEFAULT_LOCALE, EdgeKind, LocalizedText, NodeId, Real};
use sg_graph::{Edge, Graph, GraphError, Node, NodePayload, Property};

use crate::report::{InferenceDiagnostic, InferenceRecord, InferenceReport};

pub const START_TIME: &str = "start_time";
pub const END_TIME: &str = "end_time";
pub const EXISTENCE: &str = "existence";

/// Author written on every synthesized property node.
pub const INFERENCE_AUTHOR: &str = "sg-infer";

/// Id of the property node `property` synthesized for `subject`.
///
/// Stable across runs, which is what makes the pass idempotent.
pub fn property_node_id(subject: &str, property: &str) -> NodeId {
    format!("{subject}_{property}")
}

#[derive(Debug, Clone)]
pub struct InferenceOptions {
    pub author: String,
    /// Locale of the generated descriptions.
    pub locale: String,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            author: INFERENCE_AUTHOR.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Epoch as seen by the matcher.
#[derive(Debug, Clone)]
struct EpochCandidate {
    node_id: NodeId,
    name: String,
    band: Band,
    start: Real,
    end: Real,
}

/// Which temporal properties a unit already has.
#[derive(Debug, Clone, Copy, Default)]
struct Coverage {
    start: bool,
    end: bool,
}

/// Derives missing `start_time`/`end_time` properties for stratigraphic units.
///
/// Callers must serialize a pass against other mutations of the same graph.
#[derive(Debug, Clone, Default)]
pub struct PropertyInferencer {
    options: InferenceOptions,
}

impl PropertyInferencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InferenceOptions) -> Self {
        Self { options }
    }

    /// Run one pass. Running it again on the result adds nothing.
    pub fn run(&self, graph: &mut Graph) -> InferenceReport {
        let mut report = InferenceReport {
            graph_id: graph.id().to_string(),
            ..InferenceReport::default()
        };

        // The pass only adds property nodes, so epochs and units are fixed up front.
        let epochs: Vec<EpochCandidate> = graph
            .epochs()
            .map(|(node, epoch)| EpochCandidate {
                node_id: node.id.clone(),
                name: node.name.clone(),
                band: epoch.band(),
                start: epoch.start,
                end: epoch.end,
            })
            .collect();
        let units: Vec<(NodeId, Real)> = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_stratigraphic().map(|s| (n.id.clone(), s.rel_time)))
            .collect();

        for (unit_id, rel_time) in units {
            report.examined += 1;

            let coverage = coverage(graph, &unit_id);
            if coverage.start && coverage.end {
                report.already_complete += 1;
                continue;
            }

            let Some(epoch) = select_epoch(&epochs, &unit_id, rel_time, &mut report) else {
                tracing::warn!(
                    graph_id = %report.graph_id,
                    node = %unit_id,
                    rel_time,
                    "no epoch band contains stratigraphic unit"
                );
                report
                    .diagnostics
                    .push(InferenceDiagnostic::UnresolvedTemporalInference {
                        node: unit_id,
                        rel_time,
                    });
                continue;
            };

            for (property, present) in [(START_TIME, coverage.start), (END_TIME, coverage.end)] {
                if !present {
                    self.attach(graph, &unit_id, property, epoch, &mut report);
                }
            }
        }

        tracing::info!(
            graph_id = %report.graph_id,
            examined = report.examined,
            inferred = report.records.len(),
            unresolved = report.unresolved().count(),
            "temporal inference finished"
        );
        report
    }

    fn attach(
        &self,
        graph: &mut Graph,
        unit_id: &str,
        property: &'static str,
        epoch: &EpochCandidate,
        report: &mut InferenceReport,
    ) {
        let property_id = property_node_id(unit_id, property);
        let edge = Edge::between(unit_id, property_id.as_str(), EdgeKind::Dashed);

        let fail = |source| InferenceDiagnostic::AttachFailed {
            node: unit_id.to_string(),
            property_node: property_id.clone(),
            source,
        };

        // Bounds carried by the node that ends up linked.
        let existing = graph
            .get_node(&property_id)
            .map(|node| covered_bounds(node, property));
        let relinked = existing.is_some();
        let (time_start, time_end) = match existing {
            // A node holding the id that would not cover this bound is a foreign clash.
            Some(None) => {
                report.diagnostics.push(fail(GraphError::DuplicateId {
                    what: "node",
                    id: property_id.clone(),
                }));
                return;
            }
            Some(Some(bounds)) => bounds,
            None => {
                let node = Node::new(
                    property_id.as_str(),
                    property,
                    NodePayload::Property(Property {
                        description: LocalizedText::with(
                            self.options.locale.as_str(),
                            format!("Inferred from epoch {}", epoch.name),
                        ),
                        author: self.options.author.clone(),
                        time_start: Some(epoch.start),
                        time_end: Some(epoch.end),
                        url: None,
                    }),
                );
                if let Err(err) = graph.add_node(node, false) {
                    report.diagnostics.push(fail(err));
                    return;
                }
                (Some(epoch.start), Some(epoch.end))
            }
        };

        let edge_id = edge.id.clone();
        if let Err(err) = graph.add_edge(edge) {
            report.diagnostics.push(fail(err));
            return;
        }

        tracing::debug!(
            node = %unit_id,
            property,
            epoch = %epoch.name,
            "inferred temporal property"
        );
        report.records.push(InferenceRecord {
            subject: unit_id.to_string(),
            property,
            property_node: property_id,
            edge: edge_id,
            epoch_node: epoch.node_id.clone(),
            epoch_name: epoch.name.clone(),
            time_start,
            time_end,
            relinked,
        });
    }
}

/// Temporal properties linked to `unit_id` through dashed edges, in either direction.
fn coverage(graph: &Graph, unit_id: &str) -> Coverage {
    let mut cov = Coverage::default();
    for edge in graph.incident_edges(unit_id) {
        if edge.kind != EdgeKind::Dashed {
            continue;
        }
        let Some(other) = edge.other_end(unit_id).and_then(|id| graph.get_node(id)) else {
            continue;
        };
        let Some(prop) = other.as_property() else {
            continue;
        };
        match other.name.as_str() {
            START_TIME => cov.start = true,
            END_TIME => cov.end = true,
            EXISTENCE => {
                cov.start |= prop.time_start.is_some();
                cov.end |= prop.time_end.is_some();
            }
            _ => {}
        }
    }
    cov
}

/// Bounds of `node` if linking it would cover `property`: a property node
/// named `property`, or an `existence` property with the matching bound set.
fn covered_bounds(node: &Node, property: &str) -> Option<(Option<Real>, Option<Real>)> {
    let prop = node.as_property()?;
    let covers = match node.name.as_str() {
        EXISTENCE if property == START_TIME => prop.time_start.is_some(),
        EXISTENCE if property == END_TIME => prop.time_end.is_some(),
        name => name == property,
    };
    covers.then_some((prop.time_start, prop.time_end))
}

/// Narrowest band containing `rel_time`; ties go to the smaller epoch name,
/// then the smaller node id.
fn select_epoch<'a>(
    epochs: &'a [EpochCandidate],
    unit_id: &str,
    rel_time: Real,
    report: &mut InferenceReport,
) -> Option<&'a EpochCandidate> {
    let mut matches: Vec<&EpochCandidate> =
        epochs.iter().filter(|e| e.band.contains(rel_time)).collect();
    matches.sort_by(|a, b| {
        a.band
            .width()
            .total_cmp(&b.band.width())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.node_id.cmp(&b.node_id))
    });

    let chosen = *matches.first()?;
    if matches.len() > 1 {
        report.diagnostics.push(InferenceDiagnostic::OverlappingEpochs {
            node: unit_id.to_string(),
            chosen: chosen.name.clone(),
            candidates: matches.iter().map(|e| e.name.clone()).collect(),
        });
    }
    Some(chosen)
}
