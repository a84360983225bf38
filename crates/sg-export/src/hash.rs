//! Content digest of an export document.

use sha2::{Digest, Sha256};

use crate::document::Document;
use crate::ExportResult;

/// SHA-256 (hex) of the compact JSON form. Equal graph states give equal
/// digests, so two exports can be compared without diffing them.
pub fn document_digest(document: &Document) -> ExportResult<String> {
    let json = serde_json::to_vec(document)?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(format!("{:x}", hasher.finalize()))
}
