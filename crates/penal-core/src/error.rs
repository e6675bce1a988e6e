use std::path::PathBuf;

/// Errors raised at the data-loading boundary.
///
/// Evaluation itself never fails: malformed selections degrade to zero
/// contributions instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum PenalError {
    #[error("failed to load legal code from {path}: {reason}")]
    CodeLoad { path: PathBuf, reason: String },

    #[error("invalid legal code: {0}")]
    CodeInvalid(String),

    #[error("failed to load addition catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid addition catalog: {0}")]
    CatalogInvalid(String),

    #[error("unknown preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
