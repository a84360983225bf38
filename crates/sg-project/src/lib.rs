//! sg-project: import file format, validation and graph import.

pub mod import;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use import::{build_graph, build_type_registry, import_into};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_import};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Graph error: {0}")]
    Graph(#[from] sg_graph::GraphError),

    #[error("Kind error: {0}")]
    Kind(#[from] sg_core::SgError),

    #[error("Unknown import format for {path:?} (expected .yaml, .yml or .json)")]
    UnknownFormat { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<ImportFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ImportFile = serde_yaml::from_str(&content)?;
    validate_import(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &Path, file: &ImportFile) -> ProjectResult<()> {
    validate_import(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ImportFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ImportFile = serde_json::from_str(&content)?;
    validate_import(&file)?;
    Ok(file)
}

pub fn save_json(path: &Path, file: &ImportFile) -> ProjectResult<()> {
    validate_import(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by file extension.
pub fn load(path: &Path) -> ProjectResult<ImportFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}
