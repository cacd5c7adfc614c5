//! Schema interpreter
//!
//! Walks a document and a compiled schema in lockstep, depth-first, and
//! collects every violation into one ordered list. The walk never aborts
//! early and never panics on malformed input: a maximally invalid document
//! (wrong top-level type, empty object) still produces a result, it just
//! produces a long one.
//!
//! Paths address the offending position in the document
//! (`root.topics[3].id`) and are built up as the recursion descends. When a
//! container's declared type does not match, the walk records one error and
//! does not descend into that subtree, so a string standing where an array
//! was expected yields one error rather than a cascade.

use serde::Serialize;
use serde_json::Value;

use crate::schema::SchemaNode;

/// A single validation finding, addressed by document path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of structural validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Validate a document against a compiled schema.
///
/// Errors accumulate in discovery order; `valid` is true iff the list is
/// empty. Repeated calls with unchanged inputs yield identical lists.
pub fn validate(document: &Value, schema: &SchemaNode) -> ValidationResult {
    let mut errors = Vec::new();
    validate_node(document, schema, "root", &mut errors);
    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn validate_node(value: &Value, schema: &SchemaNode, path: &str, errors: &mut Vec<ValidationIssue>) {
    match schema {
        SchemaNode::Any => {}

        SchemaNode::Object {
            required,
            properties,
        } => {
            let Some(map) = value.as_object() else {
                push_type_error(errors, path, schema, value);
                return;
            };
            for name in required {
                if !map.contains_key(name) {
                    errors.push(ValidationIssue::new(
                        format!("{path}.{name}"),
                        "Required property missing",
                    ));
                }
            }
            // Properties absent from the schema are permitted silently
            for (name, child) in properties {
                if let Some(child_value) = map.get(name) {
                    validate_node(child_value, child, &format!("{path}.{name}"), errors);
                }
            }
        }

        SchemaNode::Array {
            min_items,
            max_items,
            items,
        } => {
            let Some(elements) = value.as_array() else {
                push_type_error(errors, path, schema, value);
                return;
            };
            if let Some(min) = min_items {
                if elements.len() < *min {
                    errors.push(ValidationIssue::new(
                        path,
                        format!(
                            "Array must have at least {min} items, got {}",
                            elements.len()
                        ),
                    ));
                }
            }
            if let Some(max) = max_items {
                if elements.len() > *max {
                    errors.push(ValidationIssue::new(
                        path,
                        format!(
                            "Array must have at most {max} items, got {}",
                            elements.len()
                        ),
                    ));
                }
            }
            if let Some(item_schema) = items {
                for (index, element) in elements.iter().enumerate() {
                    validate_node(element, item_schema, &format!("{path}[{index}]"), errors);
                }
            }
        }

        SchemaNode::String {
            min_length,
            max_length,
            pattern,
            allowed,
        } => {
            let Some(text) = value.as_str() else {
                push_type_error(errors, path, schema, value);
                return;
            };
            let length = text.chars().count();
            if let Some(min) = min_length {
                if length < *min {
                    errors.push(ValidationIssue::new(
                        path,
                        format!("String must be at least {min} characters, got {length}"),
                    ));
                }
            }
            if let Some(max) = max_length {
                if length > *max {
                    errors.push(ValidationIssue::new(
                        path,
                        format!("String must be at most {max} characters, got {length}"),
                    ));
                }
            }
            if let Some(re) = pattern {
                if !re.is_match(text) {
                    errors.push(ValidationIssue::new(
                        path,
                        format!("String does not match pattern {}", re.as_str()),
                    ));
                }
            }
            if let Some(values) = allowed {
                if !values.iter().any(|v| v == text) {
                    errors.push(ValidationIssue::new(
                        path,
                        format!("Value must be one of: {}. Got: {text}", values.join(", ")),
                    ));
                }
            }
        }

        SchemaNode::Number { minimum, maximum } => {
            // serde_json cannot represent NaN, so numeric means finite here
            let Some(number) = value.as_f64() else {
                push_type_error(errors, path, schema, value);
                return;
            };
            if let Some(min) = minimum {
                if number < *min {
                    errors.push(ValidationIssue::new(
                        path,
                        format!("Number must be at least {min}, got {number}"),
                    ));
                }
            }
            if let Some(max) = maximum {
                if number > *max {
                    errors.push(ValidationIssue::new(
                        path,
                        format!("Number must be at most {max}, got {number}"),
                    ));
                }
            }
        }

        SchemaNode::Boolean => {
            if !value.is_boolean() {
                push_type_error(errors, path, schema, value);
            }
        }
    }
}

fn push_type_error(
    errors: &mut Vec<ValidationIssue>,
    path: &str,
    schema: &SchemaNode,
    value: &Value,
) {
    errors.push(ValidationIssue::new(
        path,
        format!(
            "Expected type {}, got {}",
            schema.type_name(),
            value_kind(value)
        ),
    ));
}

/// Runtime kind of a JSON value, for error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::compile_schema;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> SchemaNode {
        compile_schema(&value).unwrap()
    }

    #[test]
    fn test_validation_is_deterministic() {
        let s = schema(json!({
            "type": "object",
            "required": ["id", "title"],
            "properties": {
                "id": { "type": "string", "pattern": "^[a-z-]+$" },
                "title": { "type": "string", "minLength": 3 }
            }
        }));
        let doc = json!({ "id": "BAD ID", "title": "x" });

        let first = validate(&doc, &s);
        let second = validate(&doc, &s);
        assert!(!first.valid);
        assert_eq!(first.errors, second.errors);
    }

    #[test]
    fn test_missing_required_property() {
        let s = schema(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "string" } }
        }));
        let result = validate(&json!({}), &s);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "root.id");
        assert_eq!(result.errors[0].message, "Required property missing");
    }

    #[test]
    fn test_undeclared_properties_do_not_change_errors() {
        let s = schema(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "string" } }
        }));
        let bare = validate(&json!({ "id": 7 }), &s);
        let extended = validate(&json!({ "id": 7, "extra": [1, 2, 3] }), &s);
        assert_eq!(bare.errors, extended.errors);
    }

    #[test]
    fn test_type_mismatch_stops_descent() {
        let s = schema(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "string" } }
        }));
        let result = validate(&json!("not an object"), &s);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "root");
        assert_eq!(result.errors[0].message, "Expected type object, got string");
    }

    #[test]
    fn test_null_fails_object_schema() {
        let s = schema(json!({ "type": "object" }));
        let result = validate(&Value::Null, &s);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Expected type object, got null");
    }

    #[test]
    fn test_array_bound_and_element_errors_both_reported() {
        let s = schema(json!({
            "type": "array",
            "minItems": 3,
            "items": { "type": "string", "minLength": 5 }
        }));
        let result = validate(&json!(["ab"]), &s);

        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].path, "root");
        assert_eq!(
            result.errors[0].message,
            "Array must have at least 3 items, got 1"
        );
        assert_eq!(result.errors[1].path, "root[0]");
        assert_eq!(
            result.errors[1].message,
            "String must be at least 5 characters, got 2"
        );
    }

    #[test]
    fn test_string_reports_every_violated_constraint() {
        let s = schema(json!({
            "type": "string",
            "minLength": 5,
            "pattern": "^[a-z]+$",
            "enum": ["alpha", "omega"]
        }));
        let result = validate(&json!("A1"), &s);

        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("at least 5 characters"));
        assert!(messages[1].contains("does not match pattern"));
        assert!(messages[2].contains("must be one of"));
    }

    #[test]
    fn test_number_range_checks_are_independent() {
        let s = schema(json!({ "type": "number", "minimum": 1, "maximum": 200 }));
        assert!(validate(&json!(42), &s).valid);

        let low = validate(&json!(0), &s);
        assert_eq!(low.errors.len(), 1);
        assert_eq!(low.errors[0].message, "Number must be at least 1, got 0");

        let high = validate(&json!(400), &s);
        assert_eq!(high.errors.len(), 1);
        assert_eq!(high.errors[0].message, "Number must be at most 200, got 400");
    }

    #[test]
    fn test_absent_optional_property_is_not_a_type_error() {
        let s = schema(json!({
            "type": "object",
            "properties": { "notes": { "type": "string" } }
        }));
        let result = validate(&json!({}), &s);
        assert!(result.valid, "got {:?}", result.errors);
    }

    #[test]
    fn test_ref_transparency_including_paths() {
        let defs = json!({
            "topic": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": { "type": "string", "pattern": "^[a-z0-9-]+$" }
                }
            }
        });
        let via_ref = schema(json!({
            "$ref": "#/definitions/topic",
            "definitions": defs
        }));
        let direct = schema(json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "string", "pattern": "^[a-z0-9-]+$" }
            }
        }));

        let doc = json!({ "id": "Not A Slug" });
        assert_eq!(validate(&doc, &via_ref).errors, validate(&doc, &direct).errors);
    }

    #[test]
    fn test_boolean_type_check() {
        let s = schema(json!({ "type": "boolean" }));
        assert!(validate(&json!(true), &s).valid);
        let result = validate(&json!("true"), &s);
        assert_eq!(
            result.errors[0].message,
            "Expected type boolean, got string"
        );
    }

    #[test]
    fn test_error_order_follows_traversal() {
        let s = schema(json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {
                "a": { "type": "number" },
                "b": { "type": "number" }
            }
        }));
        let result = validate(&json!({ "a": "x", "b": "y" }), &s);
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["root.a", "root.b"]);
    }
}
