//! Document loading
//!
//! The validation core never performs I/O; obtaining a document is the
//! caller's job and happens entirely before a validation call. This module
//! is that caller-side boundary: it reads raw bytes and parses JSON,
//! surfacing failures as [`RoadmapError::Io`] / [`RoadmapError::Json`] —
//! never as validation findings, so "bad JSON" and "valid JSON that fails
//! the schema" stay distinguishable.

use serde_json::Value;
use std::path::Path;

use crate::error::Result;

/// Read and parse a roadmap document from a file
pub fn load_document(path: &Path) -> Result<Value> {
    tracing::debug!(path = %path.display(), "loading roadmap document");
    let content = std::fs::read_to_string(path)?;
    parse_document(&content)
}

/// Parse a roadmap document from a JSON string
pub fn parse_document(input: &str) -> Result<Value> {
    let document = serde_json::from_str(input)?;
    Ok(document)
}
