//! Registration-time descriptions of handler signatures.
//!
//! Handlers are paired with a [`HandlerDescriptor`] when they are mounted, so the listing never
//! needs runtime reflection. Structured payloads contribute their schema through
//! [`SchemaDescribable`]; everything else is recorded by type name.

use schemars::{JsonSchema, schema_for};
use serde_json::Value;

/// Capability of producing a JSON schema for a payload type.
pub trait SchemaDescribable {
    /// Generate the root schema, including any `definitions` block.
    fn describe() -> Value;
}

impl<T: JsonSchema> SchemaDescribable for T {
    fn describe() -> Value {
        serde_json::to_value(schema_for!(T)).unwrap_or_default()
    }
}

/// Where a handler parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    /// JSON request body.
    Body,
    /// HTTP header; never listed as an input.
    Header,
    /// Query string.
    Query,
}

/// Structural shape of a parameter or return type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// Raw byte payload.
    Bytes,
    /// Structured model with a generated schema.
    Model {
        /// Root schema produced by [`SchemaDescribable::describe`].
        schema: Value,
    },
    /// Anything without a schema, recorded by its Rust type name.
    Primitive {
        /// Fully qualified type name.
        type_name: String,
    },
}

impl TypeShape {
    /// Shape of a schema-bearing model type.
    pub fn model<T: SchemaDescribable>() -> Self {
        Self::Model {
            schema: T::describe(),
        }
    }

    /// Shape of a type without a schema.
    pub fn primitive<T: ?Sized>() -> Self {
        Self::Primitive {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Schema of a model shape, if any.
    pub fn schema(&self) -> Option<&Value> {
        match self {
            Self::Model { schema } => Some(schema),
            Self::Bytes | Self::Primitive { .. } => None,
        }
    }

    /// Unqualified type name without generic arguments.
    pub fn bare_name(&self) -> String {
        match self {
            Self::Bytes => "bytes".to_string(),
            Self::Model { schema } => schema
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("object")
                .to_string(),
            Self::Primitive { type_name } => {
                let head = type_name.split('<').next().unwrap_or(type_name);
                head.rsplit("::").next().unwrap_or(head).to_string()
            }
        }
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name as written in the handler.
    pub name: String,
    /// Request part the value is read from.
    pub location: ParameterLocation,
    /// Declared type.
    pub shape: TypeShape,
}

/// Signature and presentation metadata for a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerDescriptor {
    /// Stable handler name; the key checked against the function registry.
    pub name: String,
    /// Grouping label.
    pub category: String,
    /// Human-friendly label.
    pub display_name: String,
    /// Handler documentation.
    pub description: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Declared return type; `None` means the handler documents no outputs.
    pub returns: Option<TypeShape>,
}

impl HandlerDescriptor {
    /// Start describing the handler called `name`.
    pub fn builder(name: impl Into<String>) -> HandlerDescriptorBuilder {
        HandlerDescriptorBuilder {
            descriptor: HandlerDescriptor {
                name: name.into(),
                category: String::new(),
                display_name: String::new(),
                description: String::new(),
                parameters: Vec::new(),
                returns: None,
            },
        }
    }
}

/// Fluent builder for [`HandlerDescriptor`].
#[derive(Debug, Clone)]
pub struct HandlerDescriptorBuilder {
    descriptor: HandlerDescriptor,
}

impl HandlerDescriptorBuilder {
    /// Set the grouping label.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.descriptor.category = category.into();
        self
    }

    /// Set the human-friendly label.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.descriptor.display_name = display_name.into();
        self
    }

    /// Set the handler documentation.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.descriptor.description = description.into();
        self
    }

    /// Declare a structured JSON body parameter.
    pub fn body<T: SchemaDescribable>(self, name: impl Into<String>) -> Self {
        self.parameter(name, ParameterLocation::Body, TypeShape::model::<T>())
    }

    /// Declare a raw byte body parameter.
    pub fn bytes(self, name: impl Into<String>) -> Self {
        self.parameter(name, ParameterLocation::Body, TypeShape::Bytes)
    }

    /// Declare a header parameter.
    pub fn header(self, name: impl Into<String>) -> Self {
        self.parameter(name, ParameterLocation::Header, TypeShape::primitive::<str>())
    }

    /// Declare a scalar query parameter.
    pub fn query<T: ?Sized>(self, name: impl Into<String>) -> Self {
        self.parameter(name, ParameterLocation::Query, TypeShape::primitive::<T>())
    }

    /// Declare a parameter with an explicit location and shape.
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        location: ParameterLocation,
        shape: TypeShape,
    ) -> Self {
        self.descriptor.parameters.push(ParameterDescriptor {
            name: name.into(),
            location,
            shape,
        });
        self
    }

    /// Declare a structured return type.
    pub fn returns<T: SchemaDescribable>(self) -> Self {
        self.returns_shape(TypeShape::model::<T>())
    }

    /// Declare a return type with an explicit shape.
    pub fn returns_shape(mut self, shape: TypeShape) -> Self {
        self.descriptor.returns = Some(shape);
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> HandlerDescriptor {
        self.descriptor
    }
}
