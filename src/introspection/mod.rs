//! Endpoint introspection for the function listing.
//!
//! Handlers are mounted through a [`DocumentedRouter`] together with a [`HandlerDescriptor`]
//! describing their parameters and return type. On each listing request the
//! [`extract_endpoint_info`] assembler walks the recorded [`RouteTable`], keeps the routes whose
//! handler is in the [`FunctionRegistry`], and flattens the descriptors into
//! [`EndpointInfo`] records:
//!
//! - `schema`: JSON schema nodes → `(name, type)` pairs and definition blocks.
//! - `signature`: descriptors → input/output field lists.
//! - `assembler`: route table + registry → ordered endpoint records.

mod assembler;
mod descriptor;
mod registry;
mod routes;
pub mod schema;
pub mod signature;
mod types;

pub use assembler::extract_endpoint_info;
pub use descriptor::{
    HandlerDescriptor, HandlerDescriptorBuilder, ParameterDescriptor, ParameterLocation,
    SchemaDescribable, TypeShape,
};
pub use registry::FunctionRegistry;
pub use routes::{DocumentedRouter, RouteEntry, RouteTable};
pub use types::{EndpointInfo, ParameterInfo};

use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};

/// Schema for a base64-transported byte field: `{"type": "string", "format": "binary"}`.
///
/// Use with `#[schemars(schema_with = "...")]` on fields that carry encoded documents.
pub fn binary_string_schema(_: &mut SchemaGenerator) -> Schema {
    SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        format: Some("binary".to_string()),
        ..Default::default()
    }
    .into()
}
