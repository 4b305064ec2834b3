//! Schema Bridge
//!
//! A bidirectional structural converter between an XSD document model
//! and a JSON Schema document model. The JSON side carries a small
//! vendor vocabulary (`XsdType`, `XsdStructure`, `XsdAttribute`, ...)
//! so that conversions round-trip without consulting the original
//! document.
//!
//! ## Directions
//!
//! - [`XsdToJsonConverter`] walks an [`XmlSchema`] and emits a
//!   [`JsonSchema`] in draft 2019-09 vocabulary plus vendor keywords.
//! - [`JsonToXsdConverter`] drains a [`JsonSchema`] keyword by keyword
//!   through a [`WorkList`] and rebuilds the [`XmlSchema`]. Keywords
//!   left unclaimed are fatal in strict mode and dropped with a
//!   warning in lenient mode.
//!
//! ## Example
//!
//! ```text
//! <xs:element name="person" type="xs:string"/>
//!        │  XsdToJsonConverter
//!        ▼
//! { "properties": { "person": { "type": "string", "XsdType": "string" } } }
//!        │  JsonToXsdConverter
//!        ▼
//! <xs:element name="person" type="xs:string"/>
//! ```

pub mod error;
pub mod json;
pub mod json_to_xsd;
pub mod keywords;
pub mod typemap;
pub mod worklist;
pub mod xml;
pub mod xsd_to_json;

pub use error::{ConversionError, ConversionWarning, Result};
pub use json::JsonSchema;
pub use json_to_xsd::{ConversionMode, JsonToXsdConverter};
pub use keywords::{Items, Keyword, KeywordKind, PrimitiveType};
pub use worklist::WorkList;
pub use xml::{XmlSchema, XML_SCHEMA_INSTANCE_NAMESPACE, XML_SCHEMA_NAMESPACE};
pub use xsd_to_json::{XsdToJsonConverter, DRAFT_2019_09};
