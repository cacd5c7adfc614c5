//! Combined validation report
//!
//! Ties the two validation layers together: structural validation always
//! runs; integrity checks run only when the document is structurally valid,
//! so a malformed document is not also blamed for cross-entity problems it
//! cannot meaningfully have.

use serde::Serialize;
use serde_json::Value;

use crate::config::IntegrityConfig;
use crate::integrity::check_integrity;
use crate::schema::{roadmap_schema, SchemaNode};
use crate::validator::{validate, ValidationIssue};

/// Full validation outcome: structural errors, integrity errors, and
/// advisory warnings.
///
/// Warnings never affect `valid`. When structural validation fails, the
/// integrity section is empty by construction.
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl RoadmapReport {
    pub fn is_clean(&self) -> bool {
        self.valid && self.warnings.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validate a document against the canonical roadmap schema with default
/// integrity settings
pub fn validate_roadmap(document: &Value) -> RoadmapReport {
    validate_roadmap_with(document, roadmap_schema(), &IntegrityConfig::default())
}

/// Validate a document against a specific schema and integrity settings
pub fn validate_roadmap_with(
    document: &Value,
    schema: &SchemaNode,
    config: &IntegrityConfig,
) -> RoadmapReport {
    let structural = validate(document, schema);
    if !structural.valid {
        return RoadmapReport {
            valid: false,
            errors: structural.errors,
            warnings: Vec::new(),
        };
    }

    let integrity = check_integrity(document, config);
    RoadmapReport {
        valid: integrity.errors.is_empty(),
        errors: integrity.errors,
        warnings: integrity.warnings,
    }
}

/// Render a report as human-readable multi-line text
pub fn render(report: &RoadmapReport) -> String {
    if report.is_clean() {
        return "✅ Validation passed! No errors or warnings.".to_string();
    }

    let mut output = Vec::new();

    if !report.valid {
        output.push("❌ VALIDATION FAILED\n".to_string());
        output.push("Errors:".to_string());
        for error in &report.errors {
            output.push(format!("  • {}: {}", error.path, error.message));
        }
    } else {
        output.push("✅ Validation passed with warnings\n".to_string());
    }

    if !report.warnings.is_empty() {
        output.push("\nWarnings:".to_string());
        for warning in &report.warnings {
            output.push(format!("  ⚠ {}: {}", warning.path, warning.message));
        }
    }

    output.join("\n")
}
