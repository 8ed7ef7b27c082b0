//! Loading-edge error type shared by the catalog, config and CLI.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures at the loading edge. Ranking and composition never fail.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Failed to read catalog from {path}: {source}")]
    CatalogRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("Catalog not found at {0}")]
    CatalogNotFound(PathBuf),

    #[error("Duplicate guide id: {0}")]
    DuplicateGuide(String),

    #[error("Guide {0} has no non-empty step list")]
    EmptySteps(String),

    #[error("Relation from {from} names unknown guide {to}")]
    UnknownRelation { from: String, to: String },

    #[error("Unknown guide: {0}")]
    UnknownGuide(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
