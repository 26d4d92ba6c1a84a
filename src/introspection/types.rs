//! Metadata records returned by the function listing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One flattened input or output field of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Field or parameter name.
    pub name: String,
    /// Descriptive type token such as `integer`, `array<string>`, or `string(binary)`.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ParameterInfo {
    /// Pair a field name with its type token.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Description of a single documented route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointInfo {
    /// Declared handler name.
    pub name: String,
    /// Full route path, including any nesting prefix.
    pub path: String,
    /// Grouping used by clients to organize functions.
    pub category: String,
    /// Human-friendly label.
    pub display_name: String,
    /// Free-form handler documentation.
    pub description: String,
    /// Flattened request fields, excluding header parameters.
    pub inputs: Vec<ParameterInfo>,
    /// Flattened response fields.
    pub outputs: Vec<ParameterInfo>,
    /// Named sub-schemas referenced by `inputs` or `outputs`.
    pub definitions: Map<String, Value>,
}
