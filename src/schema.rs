//! Schema model and compiler
//!
//! The validation rules are described by a small JSON-Schema dialect: type
//! constraints, required properties, array bounds, string patterns and
//! enums, numeric ranges, and internal `$ref` references into the root
//! schema's `definitions` mapping.
//!
//! Schemas go through two stages:
//!
//! 1. [`RawSchema::from_value`] parses a schema document into raw nodes,
//!    where `$ref` is still a distinct node kind.
//! 2. [`RawSchema::compile`] resolves every `$ref` against `definitions`,
//!    inlining the target node, and compiles `pattern` sources into
//!    [`regex::Regex`] values. Unknown targets and cyclic reference chains
//!    are rejected here, so the interpreter never sees a `$ref` and cannot
//!    recurse unboundedly on a bad schema.
//!
//! The canonical roadmap schema ships with the crate, embedded from the
//! `schemas/` directory, and is compiled once per process via
//! [`roadmap_schema`].

use include_dir::{include_dir, Dir};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::{Result, RoadmapError};

/// Schema files embedded at compile time
static SCHEMA_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// A fully compiled schema node, one variant per declared `type`.
///
/// Each variant carries only the constraint fields meaningful to it. The
/// tree contains no references: compilation has already inlined every
/// `$ref` target.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Object {
        /// Property names that must be present, in declaration order
        required: Vec<String>,
        /// Child schemas for declared properties, in declaration order
        properties: Vec<(String, SchemaNode)>,
    },
    Array {
        min_items: Option<usize>,
        max_items: Option<usize>,
        /// Schema applied to every element
        items: Option<Box<SchemaNode>>,
    },
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<Regex>,
        /// Allowed literal values, when the node is an enum
        allowed: Option<Vec<String>>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    /// No declared type: matches any value
    Any,
}

impl SchemaNode {
    /// The declared type name, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Object { .. } => "object",
            SchemaNode::Array { .. } => "array",
            SchemaNode::String { .. } => "string",
            SchemaNode::Number { .. } => "number",
            SchemaNode::Boolean => "boolean",
            SchemaNode::Any => "any",
        }
    }
}

/// A schema node before `$ref` resolution
#[derive(Debug, Clone)]
enum RawNode {
    /// A `$ref` node; the reference fully replaces its schema, so any other
    /// keywords on the same node are ignored
    Ref(String),
    Object {
        required: Vec<String>,
        properties: Vec<(String, RawNode)>,
    },
    Array {
        min_items: Option<usize>,
        max_items: Option<usize>,
        items: Option<Box<RawNode>>,
    },
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<String>,
        allowed: Option<Vec<String>>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    Any,
}

/// A parsed schema document: root node plus its `definitions` mapping
#[derive(Debug, Clone)]
pub struct RawSchema {
    root: RawNode,
    definitions: Vec<(String, RawNode)>,
}

impl RawSchema {
    /// Parse a schema document.
    ///
    /// Unknown keywords (`description`, `format`, `additionalProperties`,
    /// ...) are ignored, matching the permissive dialect. Malformed
    /// constraint fields and unsupported `type` values are reported as
    /// [`RoadmapError::InvalidSchema`].
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("#", "schema root must be an object"))?;

        let mut definitions = Vec::new();
        if let Some(defs) = obj.get("definitions") {
            let defs = defs
                .as_object()
                .ok_or_else(|| invalid("#/definitions", "must be an object"))?;
            for (name, node) in defs {
                let path = format!("#/definitions/{name}");
                definitions.push((name.clone(), parse_node(node, &path)?));
            }
        }

        let root = parse_node(value, "#")?;
        Ok(Self { root, definitions })
    }

    /// Resolve all references and compile patterns.
    ///
    /// A reference to a missing definition yields
    /// [`RoadmapError::UnknownRef`]; a chain of references that revisits a
    /// definition yields [`RoadmapError::CyclicRef`].
    pub fn compile(&self) -> Result<SchemaNode> {
        let mut visiting = Vec::new();
        compile_node(&self.root, &self.definitions, &mut visiting)
    }
}

/// Parse and compile a schema document in one step
pub fn compile_schema(value: &Value) -> Result<SchemaNode> {
    RawSchema::from_value(value)?.compile()
}

/// The canonical roadmap schema, compiled on first use.
///
/// The embedded schema is a crate constant; failure to compile it is a
/// build defect, not a runtime condition.
pub fn roadmap_schema() -> &'static SchemaNode {
    static COMPILED: OnceLock<SchemaNode> = OnceLock::new();
    COMPILED.get_or_init(|| {
        tracing::debug!("compiling embedded roadmap schema");
        let raw: Value = serde_json::from_str(roadmap_schema_source())
            .expect("embedded roadmap schema is valid JSON");
        compile_schema(&raw).expect("embedded roadmap schema compiles")
    })
}

/// Raw JSON text of the embedded canonical schema
pub fn roadmap_schema_source() -> &'static str {
    SCHEMA_DIR
        .get_file("roadmap.schema.json")
        .and_then(|f| f.contents_utf8())
        .expect("roadmap.schema.json is embedded")
}

fn invalid(path: &str, reason: &str) -> RoadmapError {
    RoadmapError::InvalidSchema {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_node(value: &Value, path: &str) -> Result<RawNode> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid(path, "schema node must be an object"))?;

    if let Some(reference) = obj.get("$ref") {
        let reference = reference
            .as_str()
            .ok_or_else(|| invalid(path, "$ref must be a string"))?;
        return Ok(RawNode::Ref(reference.to_string()));
    }

    let Some(type_value) = obj.get("type") else {
        return Ok(RawNode::Any);
    };
    let type_name = type_value
        .as_str()
        .ok_or_else(|| invalid(path, "type must be a string"))?;

    match type_name {
        "object" => {
            let required = match obj.get("required") {
                Some(r) => r
                    .as_array()
                    .ok_or_else(|| invalid(path, "required must be an array"))?
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid(path, "required entries must be strings"))
                    })
                    .collect::<Result<Vec<_>>>()?,
                None => Vec::new(),
            };
            let mut properties = Vec::new();
            if let Some(props) = obj.get("properties") {
                let props = props
                    .as_object()
                    .ok_or_else(|| invalid(path, "properties must be an object"))?;
                for (name, child) in props {
                    let child_path = format!("{path}/properties/{name}");
                    properties.push((name.clone(), parse_node(child, &child_path)?));
                }
            }
            Ok(RawNode::Object {
                required,
                properties,
            })
        }
        "array" => Ok(RawNode::Array {
            min_items: parse_count(obj, "minItems", path)?,
            max_items: parse_count(obj, "maxItems", path)?,
            items: match obj.get("items") {
                Some(items) => {
                    let child_path = format!("{path}/items");
                    Some(Box::new(parse_node(items, &child_path)?))
                }
                None => None,
            },
        }),
        "string" => {
            let allowed = match obj.get("enum") {
                Some(values) => Some(
                    values
                        .as_array()
                        .ok_or_else(|| invalid(path, "enum must be an array"))?
                        .iter()
                        .map(|v| {
                            v.as_str()
                                .map(str::to_string)
                                .ok_or_else(|| invalid(path, "enum entries must be strings"))
                        })
                        .collect::<Result<Vec<_>>>()?,
                ),
                None => None,
            };
            Ok(RawNode::String {
                min_length: parse_count(obj, "minLength", path)?,
                max_length: parse_count(obj, "maxLength", path)?,
                pattern: match obj.get("pattern") {
                    Some(p) => Some(
                        p.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid(path, "pattern must be a string"))?,
                    ),
                    None => None,
                },
                allowed,
            })
        }
        "number" => Ok(RawNode::Number {
            minimum: parse_limit(obj, "minimum", path)?,
            maximum: parse_limit(obj, "maximum", path)?,
        }),
        "boolean" => Ok(RawNode::Boolean),
        other => Err(invalid(path, &format!("unsupported type '{other}'"))),
    }
}

fn parse_count(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<usize>> {
    match obj.get(key) {
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| invalid(path, &format!("{key} must be a non-negative integer"))),
        None => Ok(None),
    }
}

fn parse_limit(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<f64>> {
    match obj.get(key) {
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(path, &format!("{key} must be a number"))),
        None => Ok(None),
    }
}

fn compile_node(
    node: &RawNode,
    definitions: &[(String, RawNode)],
    visiting: &mut Vec<String>,
) -> Result<SchemaNode> {
    match node {
        RawNode::Ref(reference) => {
            let (name, target) = resolve_ref(reference, definitions)?;
            if visiting.iter().any(|v| v == name) {
                return Err(RoadmapError::CyclicRef {
                    reference: reference.clone(),
                });
            }
            visiting.push(name.to_string());
            let compiled = compile_node(target, definitions, visiting);
            visiting.pop();
            compiled
        }
        RawNode::Object {
            required,
            properties,
        } => {
            let mut compiled = Vec::with_capacity(properties.len());
            for (name, child) in properties {
                compiled.push((name.clone(), compile_node(child, definitions, visiting)?));
            }
            Ok(SchemaNode::Object {
                required: required.clone(),
                properties: compiled,
            })
        }
        RawNode::Array {
            min_items,
            max_items,
            items,
        } => Ok(SchemaNode::Array {
            min_items: *min_items,
            max_items: *max_items,
            items: match items {
                Some(child) => Some(Box::new(compile_node(child, definitions, visiting)?)),
                None => None,
            },
        }),
        RawNode::String {
            min_length,
            max_length,
            pattern,
            allowed,
        } => Ok(SchemaNode::String {
            min_length: *min_length,
            max_length: *max_length,
            pattern: match pattern {
                Some(source) => {
                    Some(Regex::new(source).map_err(|e| RoadmapError::InvalidPattern {
                        pattern: source.clone(),
                        source: Box::new(e),
                    })?)
                }
                None => None,
            },
            allowed: allowed.clone(),
        }),
        RawNode::Number { minimum, maximum } => Ok(SchemaNode::Number {
            minimum: *minimum,
            maximum: *maximum,
        }),
        RawNode::Boolean => Ok(SchemaNode::Boolean),
        RawNode::Any => Ok(SchemaNode::Any),
    }
}

/// Resolve a slash-delimited reference like `#/definitions/topic`
fn resolve_ref<'a>(
    reference: &str,
    definitions: &'a [(String, RawNode)],
) -> Result<(&'a str, &'a RawNode)> {
    let unknown = || RoadmapError::UnknownRef {
        reference: reference.to_string(),
    };

    let mut segments = reference
        .trim_start_matches('#')
        .split('/')
        .filter(|s| !s.is_empty());
    if segments.next() != Some("definitions") {
        return Err(unknown());
    }
    let name = segments.next().ok_or_else(unknown)?;
    if segments.next().is_some() {
        return Err(unknown());
    }

    definitions
        .iter()
        .find(|(n, _)| n == name)
        .map(|(n, node)| (n.as_str(), node))
        .ok_or_else(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_typed_variants() {
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "string", "pattern": "^[a-z-]+$" },
                "hours": { "type": "number", "minimum": 1 },
                "tags": { "type": "array", "items": { "type": "string" } },
                "active": { "type": "boolean" },
                "anything": {}
            }
        });
        let compiled = compile_schema(&schema).unwrap();
        match compiled {
            SchemaNode::Object {
                required,
                properties,
            } => {
                assert_eq!(required, vec!["id"]);
                assert_eq!(properties.len(), 5);
                let (_, anything) = properties.iter().find(|(n, _)| n == "anything").unwrap();
                assert!(matches!(anything, SchemaNode::Any));
            }
            other => panic!("Expected Object, got {:?}", other),
        }
    }

    #[test]
    fn test_ref_is_inlined() {
        let schema = json!({
            "type": "array",
            "items": { "$ref": "#/definitions/slug" },
            "definitions": {
                "slug": { "type": "string", "pattern": "^[a-z0-9-]+$" }
            }
        });
        let compiled = compile_schema(&schema).unwrap();
        match compiled {
            SchemaNode::Array { items, .. } => {
                let items = items.expect("items schema");
                assert_eq!(items.type_name(), "string");
            }
            other => panic!("Expected Array, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_ref_rejected() {
        let schema = json!({
            "$ref": "#/definitions/missing",
            "definitions": {}
        });
        let err = compile_schema(&schema).unwrap_err();
        assert!(matches!(err, RoadmapError::UnknownRef { .. }), "got {err}");
    }

    #[test]
    fn test_cyclic_ref_rejected() {
        let schema = json!({
            "$ref": "#/definitions/a",
            "definitions": {
                "a": { "$ref": "#/definitions/b" },
                "b": { "$ref": "#/definitions/a" }
            }
        });
        let err = compile_schema(&schema).unwrap_err();
        assert!(matches!(err, RoadmapError::CyclicRef { .. }), "got {err}");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let schema = json!({ "type": "string", "pattern": "([unclosed" });
        let err = compile_schema(&schema).unwrap_err();
        assert!(
            matches!(err, RoadmapError::InvalidPattern { .. }),
            "got {err}"
        );
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let schema = json!({ "type": "integer" });
        let err = compile_schema(&schema).unwrap_err();
        assert!(
            matches!(err, RoadmapError::InvalidSchema { .. }),
            "got {err}"
        );
    }

    #[test]
    fn test_non_string_enum_entry_rejected() {
        let schema = json!({ "type": "string", "enum": ["quiz", 3] });
        let err = compile_schema(&schema).unwrap_err();
        assert!(
            matches!(err, RoadmapError::InvalidSchema { .. }),
            "got {err}"
        );
    }

    #[test]
    fn test_embedded_schema_compiles() {
        let schema = roadmap_schema();
        match schema {
            SchemaNode::Object { required, .. } => {
                assert_eq!(required, &["version", "topics", "capstones"]);
            }
            other => panic!("Expected Object root, got {:?}", other),
        }
    }
}
