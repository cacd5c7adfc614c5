//! Error types for roadmap validation

use thiserror::Error;

/// Result type for roadmap operations
pub type Result<T> = std::result::Result<T, RoadmapError>;

/// Roadmap validation errors
///
/// Validation findings are never errors — they are data in a
/// [`ValidationResult`](crate::validator::ValidationResult). This type covers
/// the fallible boundary only: loading documents, compiling schemas, reading
/// configuration. In particular `Json` means the input was not JSON at all,
/// which callers must not conflate with a schema-invalid document.
#[derive(Error, Debug)]
pub enum RoadmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown $ref target: {reference}")]
    UnknownRef { reference: String },

    #[error("Cyclic $ref chain through: {reference}")]
    CyclicRef { reference: String },

    #[error("Invalid schema node at {path}: {reason}")]
    InvalidSchema { path: String, reason: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
