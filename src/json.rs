//! JSON-Schema-side document model
//!
//! A schema node is an ordered list of keywords: exactly the member
//! order of the source document. That order is authoritative: property
//! declaration order dictates XSD particle order on the way back, so it
//! is never reordered by parsing, serialization or conversion.
//! Bridging to and from `serde_json::Value` relies on serde_json's
//! `preserve_order` feature for the same reason.

use serde_json::{Map, Value};

use crate::error::{ConversionError, Result};
use crate::keywords::{Items, Keyword, KeywordKind, PrimitiveType};
use crate::worklist::WorkList;
use crate::xml::Compositor;

/// A JSON Schema document node: an ordered keyword list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonSchema {
    pub keywords: Vec<Keyword>,
}

impl JsonSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    pub fn push(&mut self, keyword: Keyword) {
        self.keywords.push(keyword);
    }

    /// First keyword of `kind`, without claiming anything.
    pub fn get(&self, kind: KeywordKind) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.kind() == kind)
    }

    /// Snapshot this node's keywords into a consumable work list.
    pub fn work_list(&self) -> WorkList {
        WorkList::new(self.keywords.clone())
    }

    /// Serialize to a JSON value, keeping keyword order.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for keyword in &self.keywords {
            map.insert(keyword.name().to_string(), keyword_value(keyword));
        }
        Value::Object(map)
    }

    /// Parse a JSON value into the keyword model. Members outside the
    /// recognized vocabulary become [`Keyword::Unknown`]; structurally
    /// invalid members fail.
    pub fn from_value(value: &Value) -> Result<Self> {
        parse_schema(value, "#")
    }
}

fn keyword_value(keyword: &Keyword) -> Value {
    match keyword {
        Keyword::Schema(s)
        | Keyword::Id(s)
        | Keyword::Ref(s)
        | Keyword::Comment(s)
        | Keyword::Description(s)
        | Keyword::Format(s)
        | Keyword::Pattern(s)
        | Keyword::XsdType(s) => Value::String(s.clone()),
        Keyword::Type(t) => Value::String(t.as_str().to_string()),
        Keyword::Properties(entries) | Keyword::Definitions(entries) => {
            let mut map = Map::new();
            for (name, schema) in entries {
                map.insert(name.clone(), schema.to_value());
            }
            Value::Object(map)
        }
        Keyword::Required(names) => {
            Value::Array(names.iter().map(|n| Value::String(n.clone())).collect())
        }
        Keyword::Items(Items::Single(schema)) => schema.to_value(),
        Keyword::Items(Items::Tuple(schemas)) => {
            Value::Array(schemas.iter().map(JsonSchema::to_value).collect())
        }
        Keyword::Enum(values) => Value::Array(values.clone()),
        Keyword::Const(v) | Keyword::Default(v) | Keyword::Info(v) => v.clone(),
        Keyword::MultipleOf(n)
        | Keyword::Maximum(n)
        | Keyword::ExclusiveMaximum(n)
        | Keyword::Minimum(n)
        | Keyword::ExclusiveMinimum(n) => number_value(*n),
        Keyword::MaxLength(n)
        | Keyword::MinLength(n)
        | Keyword::MaxItems(n)
        | Keyword::MinItems(n) => Value::from(*n),
        Keyword::AllOf(schemas) | Keyword::OneOf(schemas) | Keyword::AnyOf(schemas) => {
            Value::Array(schemas.iter().map(JsonSchema::to_value).collect())
        }
        Keyword::XsdNamespaces(pairs)
        | Keyword::XsdSchemaAttributes(pairs)
        | Keyword::XsdUnhandledAttributes(pairs) => {
            let mut map = Map::new();
            for (name, value) in pairs {
                map.insert(name.clone(), Value::String(value.clone()));
            }
            Value::Object(map)
        }
        Keyword::XsdStructure(c) => Value::String(c.as_str().to_string()),
        Keyword::XsdAttribute(b) => Value::Bool(*b),
        Keyword::Unknown { value, .. } => value.clone(),
    }
}

fn number_value(n: f64) -> Value {
    // Integral numbers serialize without a fraction so round trips stay
    // textually stable.
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn parse_schema(value: &Value, path: &str) -> Result<JsonSchema> {
    let object = value.as_object().ok_or_else(|| ConversionError::MalformedInput {
        path: path.to_string(),
        detail: "schema node must be a JSON object".to_string(),
        location: None,
    })?;

    let mut schema = JsonSchema::new();
    for (name, member) in object {
        let member_path = format!("{}/{}", path, name);
        schema.push(parse_keyword(name, member, &member_path)?);
    }
    Ok(schema)
}

fn parse_keyword(name: &str, value: &Value, path: &str) -> Result<Keyword> {
    let keyword = match name {
        "$schema" => Keyword::Schema(require_string(value, path)?),
        "$id" => Keyword::Id(require_string(value, path)?),
        "$ref" => Keyword::Ref(require_string(value, path)?),
        "$comment" => Keyword::Comment(require_string(value, path)?),
        "description" => Keyword::Description(require_string(value, path)?),
        "format" => Keyword::Format(require_string(value, path)?),
        "pattern" => Keyword::Pattern(require_string(value, path)?),
        "type" => parse_type(value, path)?,
        "properties" => Keyword::Properties(parse_schema_map(value, path)?),
        "definitions" | "$defs" => Keyword::Definitions(parse_schema_map(value, path)?),
        "required" => Keyword::Required(parse_string_array(value, path)?),
        "items" => parse_items(value, path)?,
        "enum" => Keyword::Enum(require_array(value, path)?.to_vec()),
        "const" => Keyword::Const(value.clone()),
        "default" => Keyword::Default(value.clone()),
        "multipleOf" => Keyword::MultipleOf(require_number(value, path)?),
        "maximum" => Keyword::Maximum(require_number(value, path)?),
        "exclusiveMaximum" => Keyword::ExclusiveMaximum(require_number(value, path)?),
        "minimum" => Keyword::Minimum(require_number(value, path)?),
        "exclusiveMinimum" => Keyword::ExclusiveMinimum(require_number(value, path)?),
        "maxLength" => Keyword::MaxLength(require_unsigned(value, path)?),
        "minLength" => Keyword::MinLength(require_unsigned(value, path)?),
        "maxItems" => Keyword::MaxItems(require_unsigned(value, path)?),
        "minItems" => Keyword::MinItems(require_unsigned(value, path)?),
        "allOf" => Keyword::AllOf(parse_schema_array(value, path)?),
        "oneOf" => Keyword::OneOf(parse_schema_array(value, path)?),
        "anyOf" => Keyword::AnyOf(parse_schema_array(value, path)?),
        "XsdNamespaces" => Keyword::XsdNamespaces(parse_string_map(value, path)?),
        "XsdSchemaAttributes" => Keyword::XsdSchemaAttributes(parse_string_map(value, path)?),
        "XsdType" => Keyword::XsdType(require_string(value, path)?),
        "XsdStructure" => {
            let raw = require_string(value, path)?;
            let compositor =
                Compositor::parse(&raw).ok_or_else(|| ConversionError::MalformedInput {
                    path: path.to_string(),
                    detail: format!("'{}' is not a structure kind", raw),
                    location: None,
                })?;
            Keyword::XsdStructure(compositor)
        }
        "XsdAttribute" => Keyword::XsdAttribute(value.as_bool().unwrap_or(false)),
        "XsdUnhandledAttributes" => {
            Keyword::XsdUnhandledAttributes(parse_string_map(value, path)?)
        }
        "Info" => Keyword::Info(value.clone()),
        _ => Keyword::Unknown {
            name: name.to_string(),
            value: value.clone(),
        },
    };
    Ok(keyword)
}

fn parse_type(value: &Value, path: &str) -> Result<Keyword> {
    match value {
        Value::String(s) => {
            let primitive =
                PrimitiveType::parse(s).ok_or_else(|| ConversionError::MalformedInput {
                    path: path.to_string(),
                    detail: format!("'{}' is not a JSON Schema type", s),
                    location: None,
                })?;
            Ok(Keyword::Type(primitive))
        }
        Value::Array(_) => Err(ConversionError::UnsupportedConstruct {
            path: path.to_string(),
            detail: "union 'type' values are not supported".to_string(),
            location: None,
        }),
        _ => Err(ConversionError::MalformedInput {
            path: path.to_string(),
            detail: "'type' must be a string".to_string(),
            location: None,
        }),
    }
}

fn parse_items(value: &Value, path: &str) -> Result<Keyword> {
    match value {
        Value::Array(entries) => {
            let mut schemas = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                schemas.push(parse_schema(entry, &format!("{}/{}", path, i))?);
            }
            Ok(Keyword::Items(Items::Tuple(schemas)))
        }
        _ => Ok(Keyword::Items(Items::Single(Box::new(parse_schema(
            value, path,
        )?)))),
    }
}

fn parse_schema_map(value: &Value, path: &str) -> Result<Vec<(String, JsonSchema)>> {
    let object = value.as_object().ok_or_else(|| ConversionError::MalformedInput {
        path: path.to_string(),
        detail: "expected a JSON object of schemas".to_string(),
        location: None,
    })?;
    let mut entries = Vec::with_capacity(object.len());
    for (name, member) in object {
        entries.push((
            name.clone(),
            parse_schema(member, &format!("{}/{}", path, name))?,
        ));
    }
    Ok(entries)
}

fn parse_schema_array(value: &Value, path: &str) -> Result<Vec<JsonSchema>> {
    let entries = require_array(value, path)?;
    let mut schemas = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        schemas.push(parse_schema(entry, &format!("{}/{}", path, i))?);
    }
    Ok(schemas)
}

fn parse_string_map(value: &Value, path: &str) -> Result<Vec<(String, String)>> {
    let object = value.as_object().ok_or_else(|| ConversionError::MalformedInput {
        path: path.to_string(),
        detail: "expected a JSON object of strings".to_string(),
        location: None,
    })?;
    let mut pairs = Vec::with_capacity(object.len());
    for (name, member) in object {
        let text = member
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| member.to_string());
        pairs.push((name.clone(), text));
    }
    Ok(pairs)
}

fn parse_string_array(value: &Value, path: &str) -> Result<Vec<String>> {
    let entries = require_array(value, path)?;
    entries
        .iter()
        .map(|entry| require_string(entry, path))
        .collect()
}

fn require_string(value: &Value, path: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConversionError::MalformedInput {
            path: path.to_string(),
            detail: "expected a string value".to_string(),
            location: None,
        })
}

fn require_number(value: &Value, path: &str) -> Result<f64> {
    value.as_f64().ok_or_else(|| ConversionError::MalformedInput {
        path: path.to_string(),
        detail: "expected a numeric value".to_string(),
        location: None,
    })
}

fn require_unsigned(value: &Value, path: &str) -> Result<u64> {
    value.as_u64().ok_or_else(|| ConversionError::MalformedInput {
        path: path.to_string(),
        detail: "expected a non-negative integer value".to_string(),
        location: None,
    })
}

fn require_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| ConversionError::MalformedInput {
        path: path.to_string(),
        detail: "expected a JSON array".to_string(),
        location: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_order_preserved() {
        let raw: Value = serde_json::from_str(
            r#"{"type":"object","properties":{"b":{"type":"string"},"a":{"type":"integer"},"c":{"type":"boolean"}}}"#,
        )
        .unwrap();
        let schema = JsonSchema::from_value(&raw).unwrap();
        match schema.get(KeywordKind::Properties) {
            Some(Keyword::Properties(entries)) => {
                let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
                assert_eq!(names, vec!["b", "a", "c"]);
            }
            other => panic!("expected properties, got {:?}", other),
        }
        assert_eq!(schema.to_value(), raw);
    }

    #[test]
    fn test_unknown_member_is_carried() {
        let raw: Value =
            serde_json::from_str(r#"{"type":"string","x-vendor":{"flag":true}}"#).unwrap();
        let schema = JsonSchema::from_value(&raw).unwrap();
        match schema.get(KeywordKind::Unknown) {
            Some(Keyword::Unknown { name, .. }) => assert_eq!(name, "x-vendor"),
            other => panic!("expected unknown keyword, got {:?}", other),
        }
    }

    #[test]
    fn test_type_union_rejected() {
        let raw: Value = serde_json::from_str(r#"{"type":["string","null"]}"#).unwrap();
        let err = JsonSchema::from_value(&raw).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnsupportedConstruct { .. }
        ));
    }

    #[test]
    fn test_tuple_items_parse_into_tuple() {
        let raw: Value =
            serde_json::from_str(r#"{"type":"array","items":[{"type":"string"},{"type":"integer"}]}"#)
                .unwrap();
        let schema = JsonSchema::from_value(&raw).unwrap();
        match schema.get(KeywordKind::Items) {
            Some(Keyword::Items(Items::Tuple(schemas))) => assert_eq!(schemas.len(), 2),
            other => panic!("expected tuple items, got {:?}", other),
        }
    }

    #[test]
    fn test_vendor_keywords_parse() {
        let raw: Value = serde_json::from_str(
            r#"{"XsdStructure":"sequence","XsdAttribute":true,"XsdNamespaces":{"xsd":"http://www.w3.org/2001/XMLSchema"}}"#,
        )
        .unwrap();
        let schema = JsonSchema::from_value(&raw).unwrap();
        assert_eq!(
            schema.get(KeywordKind::XsdStructure),
            Some(&Keyword::XsdStructure(Compositor::Sequence))
        );
        assert_eq!(
            schema.get(KeywordKind::XsdAttribute),
            Some(&Keyword::XsdAttribute(true))
        );
        assert!(schema.get(KeywordKind::XsdNamespaces).is_some());
    }
}
