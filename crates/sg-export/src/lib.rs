//! sg-export: canonical export document for a whole graph registry.

pub mod document;
pub mod exporter;
pub mod hash;

pub use document::{
    Document, EdgeBuckets, EdgePair, EpochDocument, GraphData, GraphDocument, NodeDocument, Ordered,
};
pub use exporter::{ExportOptions, ExportReport, Exporter, SkippedGraph, export_all};
pub use hash::document_digest;

use std::path::{Path, PathBuf};

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Writing the document to its destination failed.
    #[error("Failed to write export to {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a document; `pretty` selects two-space indentation.
pub fn to_json_string(document: &Document, pretty: bool) -> ExportResult<String> {
    let content = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(content)
}

/// Write a document as pretty-printed JSON.
pub fn save(document: &Document, destination: &Path) -> ExportResult<()> {
    save_with(document, destination, true)
}

pub fn save_with(document: &Document, destination: &Path, pretty: bool) -> ExportResult<()> {
    let content = to_json_string(document, pretty)?;
    std::fs::write(destination, content).map_err(|source| ExportError::WriteFailure {
        path: destination.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %destination.display(), "export written");
    Ok(())
}
