//! Error types
//!
//! Execution errors are values: they end up inside a `RequestResult` and are
//! never propagated past the session. Non-2xx responses are not errors.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a request could not be executed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// The recipe needs auth and the resolver had nothing for it
    #[error("no credentials configured for project `{project}`")]
    MissingCredentials { project: String },

    /// The schema requires keys the request body does not have
    #[error("missing required parameters: {}", .missing.join(", "))]
    MissingRequiredParameters { missing: Vec<String> },

    /// No response was received
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Failure to turn editor text into request values.
///
/// Never shown to the user; the buffer keeps the text as typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("invalid JSON edit: {0}")]
    InvalidJsonEdit(String),
}

/// Errors raised while loading a recipe catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("recipe `{recipe}` declares parameter `{name}` more than once")]
    DuplicateParameter { recipe: String, name: String },
}
