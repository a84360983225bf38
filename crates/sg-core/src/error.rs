use thiserror::Error;

pub type SgResult<T> = Result<T, SgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SgError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: String, value: f64 },

    #[error("Missing field '{field}' for {kind} payload")]
    MissingField { kind: String, field: String },

    #[error("Invalid field '{field}' for {kind} payload: {reason}")]
    InvalidField {
        kind: String,
        field: String,
        reason: String,
    },

    #[error("Node kind '{tag}' is already registered")]
    KindAlreadyRegistered { tag: String },

    #[error("Node kind tag '{tag}' is reserved for an edge kind")]
    ReservedKindTag { tag: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}
