use crate::kinds::EdgeKind;

/// Id aliases.
///
/// Ids come from the source documents (GraphML node ids, file stems) so they
/// stay strings rather than compact indices.
pub type GraphId = String;
pub type NodeId = String;
pub type EdgeId = String;

/// Separator between the parts of a synthesized edge id.
pub const EDGE_ID_SEPARATOR: char = '|';

/// Build an edge id from its endpoints when the importer supplied none.
///
/// Shape: `source|kind|target`. The kind is part of the id so two differently
/// styled edges between the same pair of nodes do not collide. `|` and `\`
/// inside an endpoint id are backslash-escaped, so distinct
/// (source, kind, target) triples always give distinct ids.
pub fn synthesize_edge_id(source: &str, kind: EdgeKind, target: &str) -> EdgeId {
    let mut id = String::with_capacity(source.len() + target.len() + 16);
    push_escaped(&mut id, source);
    id.push(EDGE_ID_SEPARATOR);
    id.push_str(kind.as_str());
    id.push(EDGE_ID_SEPARATOR);
    push_escaped(&mut id, target);
    id
}

fn push_escaped(out: &mut String, part: &str) {
    for c in part.chars() {
        if c == EDGE_ID_SEPARATOR || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
}
