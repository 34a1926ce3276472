//! The OpenAPI 3.0.1 object model emitted by the builder.
//!
//! This is a constrained subset of the full specification: exactly the fields
//! the generator can derive from a route tree, comment directives, and
//! registered type metadata. Maps are `BTreeMap` so serialization order is
//! reproducible across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paths map: normalized URL pattern -> methods.
pub type Paths = BTreeMap<String, Methods>;

/// Methods map: lowercase HTTP verb -> operation.
pub type Methods = BTreeMap<String, Operation>;

/// Component schemas: logical type name -> definition.
pub type Definitions = BTreeMap<String, Definition>;

/// Root document object. Built fresh on every build call and owned by the
/// caller; the builder keeps no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub tags: Vec<Tag>,
    pub paths: Paths,
    pub components: Components,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub version: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    pub schemas: Definitions,
    #[serde(
        rename = "securitySchemes",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub security_schemes: Option<BTreeMap<String, SecurityScheme>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub scheme: String,
    #[serde(rename = "bearerFormat")]
    pub bearer_format: String,
}

impl SecurityScheme {
    /// The bearer-auth scheme attached when global auth is activated.
    pub fn bearer() -> Self {
        Self {
            scheme_type: "http".to_string(),
            scheme: "bearer".to_string(),
            bearer_format: "JWT".to_string(),
        }
    }
}

/// One documented (path, verb) endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    pub summary: String,
    /// Security requirements. An explicit empty list means "no security
    /// understood", distinct from the field being absent.
    pub security: Vec<BTreeMap<String, Vec<String>>>,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    #[serde(
        rename = "requestBody",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, Response>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: ParamSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSchema {
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty", default)]
    pub enum_values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "is_false", default)]
    pub required: bool,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    pub content: Content,
}

/// Response/request content, fixed to the JSON media type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "application/json")]
    pub media: MediaType,
}

impl Content {
    /// Content referencing a named component schema.
    pub fn schema_ref(name: &str) -> Self {
        Self {
            media: MediaType {
                schema: SchemaRef {
                    reference: format!("#/components/schemas/{}", name),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: SchemaRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// A component schema derived from a registered type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,
    pub properties: BTreeMap<String, Property>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    #[serde(rename = "readOnly", skip_serializing_if = "is_false", default)]
    pub read_only: bool,
    #[serde(rename = "writeOnly", skip_serializing_if = "is_false", default)]
    pub write_only: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}
