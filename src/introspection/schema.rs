//! Flatten JSON schemas into name/type pairs.
//!
//! Schemas come from `schemars`, so arrays carry `items`, named structures appear as `$ref`
//! pointers, and nested structures live under `definitions` (or `$defs` for newer drafts).
//! Every function here is total: unknown shapes degrade to the `Unknown` token.

use serde_json::{Map, Value};

use super::types::ParameterInfo;

/// Token used when a field descriptor carries neither a `type` nor a `$ref`.
pub const UNKNOWN_TYPE: &str = "Unknown";
/// Token distinguishing byte payloads from textual strings.
pub const BINARY_STRING_TYPE: &str = "string(binary)";

/// Derive the type token for a single schema field descriptor.
pub fn extract_field_type(field: &Value) -> String {
    let field_type = field.get("type").and_then(Value::as_str);
    match field_type {
        Some("array") => {
            let items = field.get("items").unwrap_or(&Value::Null);
            format!("array<{}>", extract_field_type(items))
        }
        Some("string") if field.get("format").and_then(Value::as_str) == Some("binary") => {
            BINARY_STRING_TYPE.to_string()
        }
        Some(other) => other.to_string(),
        None => field
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| reference.rsplit('/').next())
            .unwrap_or(UNKNOWN_TYPE)
            .to_string(),
    }
}

/// List the schema's `properties` in declaration order.
pub fn extract_fields_from_schema(schema: &Value) -> Vec<ParameterInfo> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(name, field)| ParameterInfo::new(name, extract_field_type(field)))
                .collect()
        })
        .unwrap_or_default()
}

/// Return the schema's named definitions block verbatim.
pub fn extract_definitions_from_schema(schema: &Value) -> Map<String, Value> {
    ["$defs", "definitions"]
        .iter()
        .find_map(|key| schema.get(*key).and_then(Value::as_object))
        .cloned()
        .unwrap_or_default()
}
