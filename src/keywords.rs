//! JSON Schema keyword model
//!
//! A closed union over every keyword the converters speak: the draft
//! 2019-09 baseline vocabulary plus the `Xsd*`/`Info` vendor extensions
//! that carry XSD-only information through the JSON representation.
//! Anything else parses as [`Keyword::Unknown`], which is what strict
//! mode trips on after a conversion pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::JsonSchema;
use crate::xml::Compositor;

/// A JSON Schema primitive value type. Union (`type` array) values are
/// unsupported and rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "object" => Some(PrimitiveType::Object),
            "array" => Some(PrimitiveType::Array),
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "integer" => Some(PrimitiveType::Integer),
            "boolean" => Some(PrimitiveType::Boolean),
            "null" => Some(PrimitiveType::Null),
            _ => None,
        }
    }
}

/// The `items` keyword body. Tuple-style arrays are carried through
/// parsing but rejected by the JSON → XSD converter.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    Single(Box<JsonSchema>),
    Tuple(Vec<JsonSchema>),
}

/// One keyword attached to a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    // Draft 2019-09 baseline.
    Schema(String),
    Id(String),
    Ref(String),
    Comment(String),
    Description(String),
    Type(PrimitiveType),
    Format(String),
    Properties(Vec<(String, JsonSchema)>),
    Definitions(Vec<(String, JsonSchema)>),
    Required(Vec<String>),
    Items(Items),
    Enum(Vec<Value>),
    Const(Value),
    Default(Value),
    MultipleOf(f64),
    Maximum(f64),
    ExclusiveMaximum(f64),
    Minimum(f64),
    ExclusiveMinimum(f64),
    MaxLength(u64),
    MinLength(u64),
    Pattern(String),
    MaxItems(u64),
    MinItems(u64),
    AllOf(Vec<JsonSchema>),
    OneOf(Vec<JsonSchema>),
    AnyOf(Vec<JsonSchema>),

    // Vendor extensions preserving XSD fidelity.
    /// Ordered prefix → URI bindings from the schema root.
    XsdNamespaces(Vec<(String, String)>),
    /// Schema-level defaults such as `attributeFormDefault`.
    XsdSchemaAttributes(Vec<(String, String)>),
    /// The literal original XSD type local-name, disambiguating
    /// built-ins that collapse to the same JSON primitive.
    XsdType(String),
    /// The structural container kind of a complex type's particle.
    XsdStructure(Compositor),
    /// Marks a property that must become an XSD attribute.
    XsdAttribute(bool),
    /// Foreign XML attributes preserved verbatim as name/value pairs.
    XsdUnhandledAttributes(Vec<(String, String)>),
    /// SERES-style fixed-attribute documentation, as a JSON object.
    Info(Value),

    /// Any member not in the recognized vocabulary.
    Unknown { name: String, value: Value },
}

/// Fieldless mirror of [`Keyword`], used as the pull key of the
/// work list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Schema,
    Id,
    Ref,
    Comment,
    Description,
    Type,
    Format,
    Properties,
    Definitions,
    Required,
    Items,
    Enum,
    Const,
    Default,
    MultipleOf,
    Maximum,
    ExclusiveMaximum,
    Minimum,
    ExclusiveMinimum,
    MaxLength,
    MinLength,
    Pattern,
    MaxItems,
    MinItems,
    AllOf,
    OneOf,
    AnyOf,
    XsdNamespaces,
    XsdSchemaAttributes,
    XsdType,
    XsdStructure,
    XsdAttribute,
    XsdUnhandledAttributes,
    Info,
    Unknown,
}

impl Keyword {
    pub fn kind(&self) -> KeywordKind {
        match self {
            Keyword::Schema(_) => KeywordKind::Schema,
            Keyword::Id(_) => KeywordKind::Id,
            Keyword::Ref(_) => KeywordKind::Ref,
            Keyword::Comment(_) => KeywordKind::Comment,
            Keyword::Description(_) => KeywordKind::Description,
            Keyword::Type(_) => KeywordKind::Type,
            Keyword::Format(_) => KeywordKind::Format,
            Keyword::Properties(_) => KeywordKind::Properties,
            Keyword::Definitions(_) => KeywordKind::Definitions,
            Keyword::Required(_) => KeywordKind::Required,
            Keyword::Items(_) => KeywordKind::Items,
            Keyword::Enum(_) => KeywordKind::Enum,
            Keyword::Const(_) => KeywordKind::Const,
            Keyword::Default(_) => KeywordKind::Default,
            Keyword::MultipleOf(_) => KeywordKind::MultipleOf,
            Keyword::Maximum(_) => KeywordKind::Maximum,
            Keyword::ExclusiveMaximum(_) => KeywordKind::ExclusiveMaximum,
            Keyword::Minimum(_) => KeywordKind::Minimum,
            Keyword::ExclusiveMinimum(_) => KeywordKind::ExclusiveMinimum,
            Keyword::MaxLength(_) => KeywordKind::MaxLength,
            Keyword::MinLength(_) => KeywordKind::MinLength,
            Keyword::Pattern(_) => KeywordKind::Pattern,
            Keyword::MaxItems(_) => KeywordKind::MaxItems,
            Keyword::MinItems(_) => KeywordKind::MinItems,
            Keyword::AllOf(_) => KeywordKind::AllOf,
            Keyword::OneOf(_) => KeywordKind::OneOf,
            Keyword::AnyOf(_) => KeywordKind::AnyOf,
            Keyword::XsdNamespaces(_) => KeywordKind::XsdNamespaces,
            Keyword::XsdSchemaAttributes(_) => KeywordKind::XsdSchemaAttributes,
            Keyword::XsdType(_) => KeywordKind::XsdType,
            Keyword::XsdStructure(_) => KeywordKind::XsdStructure,
            Keyword::XsdAttribute(_) => KeywordKind::XsdAttribute,
            Keyword::XsdUnhandledAttributes(_) => KeywordKind::XsdUnhandledAttributes,
            Keyword::Info(_) => KeywordKind::Info,
            Keyword::Unknown { .. } => KeywordKind::Unknown,
        }
    }

    /// The serialized JSON member name of this keyword.
    pub fn name(&self) -> &str {
        match self {
            Keyword::Schema(_) => "$schema",
            Keyword::Id(_) => "$id",
            Keyword::Ref(_) => "$ref",
            Keyword::Comment(_) => "$comment",
            Keyword::Description(_) => "description",
            Keyword::Type(_) => "type",
            Keyword::Format(_) => "format",
            Keyword::Properties(_) => "properties",
            Keyword::Definitions(_) => "definitions",
            Keyword::Required(_) => "required",
            Keyword::Items(_) => "items",
            Keyword::Enum(_) => "enum",
            Keyword::Const(_) => "const",
            Keyword::Default(_) => "default",
            Keyword::MultipleOf(_) => "multipleOf",
            Keyword::Maximum(_) => "maximum",
            Keyword::ExclusiveMaximum(_) => "exclusiveMaximum",
            Keyword::Minimum(_) => "minimum",
            Keyword::ExclusiveMinimum(_) => "exclusiveMinimum",
            Keyword::MaxLength(_) => "maxLength",
            Keyword::MinLength(_) => "minLength",
            Keyword::Pattern(_) => "pattern",
            Keyword::MaxItems(_) => "maxItems",
            Keyword::MinItems(_) => "minItems",
            Keyword::AllOf(_) => "allOf",
            Keyword::OneOf(_) => "oneOf",
            Keyword::AnyOf(_) => "anyOf",
            Keyword::XsdNamespaces(_) => "XsdNamespaces",
            Keyword::XsdSchemaAttributes(_) => "XsdSchemaAttributes",
            Keyword::XsdType(_) => "XsdType",
            Keyword::XsdStructure(_) => "XsdStructure",
            Keyword::XsdAttribute(_) => "XsdAttribute",
            Keyword::XsdUnhandledAttributes(_) => "XsdUnhandledAttributes",
            Keyword::Info(_) => "Info",
            Keyword::Unknown { name, .. } => name,
        }
    }
}
