//! sg-infer: temporal property inference for stratigraphic units.
//!
//! Every stratigraphic unit should end up with `start_time` and `end_time`
//! property nodes. Units the importer left without them are matched against
//! the epoch whose vertical band contains the unit's `rel_time`, and the
//! missing properties are synthesized from that epoch's absolute range.

pub mod inferencer;
pub mod report;

pub use inferencer::{
    END_TIME, EXISTENCE, INFERENCE_AUTHOR, InferenceOptions, PropertyInferencer, START_TIME,
    property_node_id,
};
pub use report::{InferenceDiagnostic, InferenceRecord, InferenceReport};
