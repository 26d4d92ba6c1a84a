//! Turn handler descriptors into flattened parameter lists.

use serde_json::{Map, Value};

use super::descriptor::{ParameterDescriptor, ParameterLocation, TypeShape};
use super::schema::{extract_definitions_from_schema, extract_fields_from_schema};
use super::types::ParameterInfo;

/// Flatten declared parameters into input fields.
///
/// Header parameters are skipped. Structured models are spliced in field by field, so a single
/// body parameter may contribute several entries.
pub fn get_parameters_info(parameters: &[ParameterDescriptor]) -> Vec<ParameterInfo> {
    let mut fields = Vec::new();
    for parameter in parameters {
        if parameter.location == ParameterLocation::Header {
            continue;
        }
        match &parameter.shape {
            TypeShape::Bytes => fields.push(ParameterInfo::new(&parameter.name, "bytes")),
            TypeShape::Model { schema } => fields.extend(extract_fields_from_schema(schema)),
            TypeShape::Primitive { type_name } => {
                fields.push(ParameterInfo::new(&parameter.name, type_name))
            }
        }
    }
    fields
}

/// Flatten a declared return type into output fields.
pub fn get_return_type_info(return_type: &TypeShape) -> Vec<ParameterInfo> {
    match return_type.schema() {
        Some(schema) => extract_fields_from_schema(schema),
        None => vec![ParameterInfo::new("return", return_type.bare_name())],
    }
}

/// Union of the definitions blocks of every structured parameter.
///
/// Later parameters overwrite earlier ones on name collision.
pub fn get_definitions_from_params(parameters: &[ParameterDescriptor]) -> Map<String, Value> {
    let mut definitions = Map::new();
    for schema in parameters.iter().filter_map(|parameter| parameter.shape.schema()) {
        definitions.extend(extract_definitions_from_schema(schema));
    }
    definitions
}

/// Definitions block of a structured return type, or an empty map.
pub fn get_definitions_from_return_type(return_type: &TypeShape) -> Map<String, Value> {
    return_type
        .schema()
        .map(extract_definitions_from_schema)
        .unwrap_or_default()
}
