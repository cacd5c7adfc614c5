//! Roadmap Schema Validation
//!
//! Structural and referential validation for AI engineering roadmap
//! documents (topics and capstone projects).
//!
//! ## Features
//!
//! - **Schema Interpreter**: a small, self-contained interpreter over a
//!   JSON-Schema dialect (types, required properties, array bounds, string
//!   patterns/enums, numeric ranges, internal `$ref`), collecting every
//!   violation with a stable document path
//! - **Pre-resolved References**: `$ref`s are inlined once at schema load;
//!   unknown targets and cycles are load-time errors, not validation faults
//! - **Integrity Checks**: duplicate identifiers, dangling prerequisite
//!   references (with close-match suggestions), role coverage, and
//!   prerequisite cycles — run only on structurally valid documents
//! - **Embedded Canonical Schema**: the roadmap schema ships inside the
//!   crate and compiles once per process
//!
//! ## Architecture
//!
//! ```text
//! document ──▶ validator ──{valid?}──▶ integrity ──▶ RoadmapReport
//!                 ▲                        ▲         (valid, errors,
//!             SchemaNode             IntegrityConfig     warnings)
//!                 ▲
//!        schemas/roadmap.schema.json (embedded, compiled once)
//! ```
//!
//! Validation never throws for invalid documents: failure is data in the
//! result. Errors are reserved for the fallible boundary — unreadable
//! files, unparseable JSON, malformed schemas.

pub mod config;
pub mod error;
pub mod integrity;
pub mod loader;
pub mod report;
pub mod schema;
pub mod validator;

pub use config::{IntegrityConfig, RoadmapConfig};
pub use error::{Result, RoadmapError};
pub use integrity::{check_integrity, IntegrityReport};
pub use loader::{load_document, parse_document};
pub use report::{render, validate_roadmap, validate_roadmap_with, RoadmapReport};
pub use schema::{compile_schema, roadmap_schema, roadmap_schema_source, RawSchema, SchemaNode};
pub use validator::{validate, ValidationIssue, ValidationResult};
