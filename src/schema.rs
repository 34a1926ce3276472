//! Component-schema derivation from registered type metadata.
//!
//! A [`TypeSpec`] is a static description of one serializable type: its fields
//! in declaration order, each with a declared type string and an optional
//! structural tag. The tag syntax mirrors Go struct tags:
//!
//! ```text
//! name:"id" documentation:"unique widget id,required,readOnly"
//! ```
//!
//! `documentation` carries a free-text description followed by any of the
//! options `readOnly`, `writeOnly` and `required`; `name` overrides the
//! emitted property key. A malformed tag aborts the whole build.

use std::collections::BTreeMap;

use crate::document::{Definition, Definitions, Property};
use crate::error::{Error, Result};

/// Static schema description for one registered type.
#[derive(Debug, Clone, Default)]
pub struct TypeSpec {
    fields: Vec<FieldSpec>,
}

/// One field of a registered type.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// Declared type string, e.g. `int`, `string`, `*string`.
    pub ty: String,
    /// Raw structural tag, if any.
    pub tag: Option<String>,
}

impl TypeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an untagged field.
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: ty.into(),
            tag: None,
        });
        self
    }

    /// Adds a field carrying a structural tag.
    pub fn tagged_field(
        mut self,
        name: impl Into<String>,
        ty: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: ty.into(),
            tag: Some(tag.into()),
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// Turns every registered type into a component schema definition.
///
/// Fails on the first malformed structural tag, identifying the offending
/// type and field.
pub fn materialize(types: &BTreeMap<String, TypeSpec>) -> Result<Definitions> {
    let mut definitions = Definitions::new();
    for (name, spec) in types {
        definitions.insert(name.clone(), materialize_type(name, spec)?);
    }
    Ok(definitions)
}

fn materialize_type(type_name: &str, spec: &TypeSpec) -> Result<Definition> {
    let mut properties = BTreeMap::new();
    let mut required = Vec::new();
    for field in spec.fields() {
        let tag = match &field.tag {
            Some(raw) => parse_tag(raw).map_err(|message| Error::MalformedTag {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                message,
            })?,
            None => Vec::new(),
        };

        let key = tag
            .iter()
            .find(|(k, _)| k == "name")
            .map(|(_, v)| serialized_name(v))
            .unwrap_or_else(|| field.name.clone());

        let mut description = String::new();
        let mut read_only = false;
        let mut write_only = false;
        if let Some((_, doc)) = tag.iter().find(|(k, _)| k == "documentation") {
            let mut parts = doc.split(',');
            description = parts.next().unwrap_or("").to_string();
            for option in parts {
                match option {
                    "readOnly" => read_only = true,
                    "writeOnly" => write_only = true,
                    "required" => required.push(key.clone()),
                    _ => {}
                }
            }
        }

        properties.insert(
            key,
            Property {
                property_type: normalize_type(&field.ty),
                description,
                read_only,
                write_only,
            },
        );
    }
    Ok(Definition {
        required,
        properties,
    })
}

/// Normalizes a declared field type to an OpenAPI primitive: one level of
/// pointer/optional indirection is stripped and integer kinds become `number`.
fn normalize_type(ty: &str) -> String {
    let ty = ty.strip_prefix('*').unwrap_or(ty);
    let ty = ty
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(ty);
    match ty {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" => "number".to_string(),
        other => other.to_string(),
    }
}

/// Parses a structural tag into (key, value) pairs.
///
/// Grammar: space-separated `key:"value"` entries; the value may contain
/// escaped quotes. Errors are returned as plain messages and wrapped by the
/// caller with the type and field names.
fn parse_tag(raw: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut chars = raw.chars().peekable();
    loop {
        while matches!(chars.peek(), Some(' ')) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }
        let mut key = String::new();
        loop {
            match chars.next() {
                Some(':') => break,
                Some(c) if c == ' ' || c == '"' => {
                    return Err(format!("bad syntax for tag key {:?}", key))
                }
                Some(c) => key.push(c),
                None => return Err(format!("key {:?} has no value", key)),
            }
        }
        if key.is_empty() {
            return Err("empty tag key".to_string());
        }
        match chars.next() {
            Some('"') => {}
            _ => return Err(format!("tag value for {:?} is not quoted", key)),
        }
        let mut value = String::new();
        loop {
            match chars.next() {
                Some('\\') => match chars.next() {
                    Some(c) => value.push(c),
                    None => return Err(format!("unterminated quote in tag for {:?}", key)),
                },
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(format!("unterminated quote in tag for {:?}", key)),
            }
        }
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// The property key from a `name` tag value, ignoring any trailing options
/// (e.g. `name:"id,omitempty"` keys the property as `id`).
fn serialized_name(value: &str) -> String {
    value.split(',').next().unwrap_or(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(name: &str, spec: TypeSpec) -> BTreeMap<String, TypeSpec> {
        let mut types = BTreeMap::new();
        types.insert(name.to_string(), spec);
        types
    }

    #[test]
    fn test_materialize_with_documentation_tag() {
        let spec = TypeSpec::new()
            .tagged_field("Id", "int", r#"name:"id" documentation:"widget id,required,readOnly""#)
            .tagged_field("Label", "*string", r#"name:"label" documentation:"display label""#)
            .field("Weight", "float64");
        let defs = materialize(&single("Widget", spec)).unwrap();
        let def = &defs["Widget"];

        assert_eq!(def.required, vec!["id".to_string()]);

        let id = &def.properties["id"];
        assert_eq!(id.property_type, "number");
        assert_eq!(id.description, "widget id");
        assert!(id.read_only);
        assert!(!id.write_only);

        let label = &def.properties["label"];
        assert_eq!(label.property_type, "string");
        assert_eq!(label.description, "display label");

        // No name tag: the field's own name is the property key.
        assert!(def.properties.contains_key("Weight"));
    }

    #[test]
    fn test_required_follows_field_declaration_order() {
        let spec = TypeSpec::new()
            .tagged_field("B", "string", r#"documentation:"b,required""#)
            .tagged_field("A", "string", r#"documentation:"a,required""#);
        let defs = materialize(&single("Pair", spec)).unwrap();
        assert_eq!(defs["Pair"].required, vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_write_only_option() {
        let spec =
            TypeSpec::new().tagged_field("Secret", "string", r#"documentation:"api key,writeOnly""#);
        let defs = materialize(&single("Credentials", spec)).unwrap();
        assert!(defs["Credentials"].properties["Secret"].write_only);
    }

    #[test]
    fn test_malformed_tag_is_fatal() {
        let spec = TypeSpec::new().tagged_field("Id", "int", r#"documentation:"unterminated"#);
        let err = materialize(&single("Widget", spec)).unwrap_err();
        match err {
            Error::MalformedTag {
                type_name, field, ..
            } => {
                assert_eq!(type_name, "Widget");
                assert_eq!(field, "Id");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unquoted_tag_value_is_fatal() {
        let spec = TypeSpec::new().tagged_field("Id", "int", "name:id");
        assert!(materialize(&single("Widget", spec)).is_err());
    }

    #[test]
    fn test_normalize_type() {
        assert_eq!(normalize_type("int"), "number");
        assert_eq!(normalize_type("*int64"), "number");
        assert_eq!(normalize_type("Option<uint32>"), "number");
        assert_eq!(normalize_type("*string"), "string");
        assert_eq!(normalize_type("bool"), "bool");
    }
}
