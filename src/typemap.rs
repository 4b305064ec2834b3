//! Shared built-in type-mapping table
//!
//! A static, bidirectional lookup between XSD built-in atomic types and
//! (JSON primitive type, optional format) pairs. Several XSD names
//! collapse to the same JSON pair (`long`, `int`, `short`, ... are all
//! `integer`); the `XsdType` keyword disambiguates on the way back.
//! Both converters consult this table, and only this table, so the two
//! directions cannot drift apart.

use crate::keywords::PrimitiveType;

/// One row of the built-in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinType {
    pub xsd_name: &'static str,
    pub json_type: PrimitiveType,
    pub format: Option<&'static str>,
}

const fn row(
    xsd_name: &'static str,
    json_type: PrimitiveType,
    format: Option<&'static str>,
) -> BuiltinType {
    BuiltinType {
        xsd_name,
        json_type,
        format,
    }
}

/// Every recognized XSD built-in atomic type. A name in the XML Schema
/// namespace that is not listed here is an `UnknownType` failure.
pub static BUILTIN_TYPES: &[BuiltinType] = &[
    row("boolean", PrimitiveType::Boolean, None),
    // Integer family.
    row("integer", PrimitiveType::Integer, None),
    row("nonPositiveInteger", PrimitiveType::Integer, None),
    row("negativeInteger", PrimitiveType::Integer, None),
    row("nonNegativeInteger", PrimitiveType::Integer, None),
    row("positiveInteger", PrimitiveType::Integer, None),
    row("long", PrimitiveType::Integer, None),
    row("int", PrimitiveType::Integer, None),
    row("short", PrimitiveType::Integer, None),
    row("byte", PrimitiveType::Integer, None),
    row("unsignedLong", PrimitiveType::Integer, None),
    row("unsignedInt", PrimitiveType::Integer, None),
    row("unsignedShort", PrimitiveType::Integer, None),
    row("unsignedByte", PrimitiveType::Integer, None),
    // String family.
    row("anyAtomicType", PrimitiveType::String, None),
    row("anySimpleType", PrimitiveType::String, None),
    row("string", PrimitiveType::String, None),
    row("gYearMonth", PrimitiveType::String, None),
    row("gYear", PrimitiveType::String, None),
    row("gMonthDay", PrimitiveType::String, None),
    row("gDay", PrimitiveType::String, None),
    row("gMonth", PrimitiveType::String, None),
    row("hexBinary", PrimitiveType::String, None),
    row("base64Binary", PrimitiveType::String, None),
    row("QName", PrimitiveType::String, None),
    row("NOTATION", PrimitiveType::String, None),
    row("normalizedString", PrimitiveType::String, None),
    row("token", PrimitiveType::String, None),
    row("language", PrimitiveType::String, None),
    row("NMTOKEN", PrimitiveType::String, None),
    row("Name", PrimitiveType::String, None),
    row("NCName", PrimitiveType::String, None),
    row("ID", PrimitiveType::String, None),
    row("IDREF", PrimitiveType::String, None),
    row("ENTITY", PrimitiveType::String, None),
    row("yearMonthDuration", PrimitiveType::String, None),
    row("dayTimeDuration", PrimitiveType::String, None),
    // Date/time family carries a format tag.
    row("dateTime", PrimitiveType::String, Some("date-time")),
    row("time", PrimitiveType::String, Some("time")),
    row("date", PrimitiveType::String, Some("date")),
    row("duration", PrimitiveType::String, Some("duration")),
    row("anyURI", PrimitiveType::String, Some("uri")),
    // Number family.
    row("decimal", PrimitiveType::Number, None),
    row("float", PrimitiveType::Number, None),
    row("double", PrimitiveType::Number, None),
];

/// Forward lookup by XSD local name.
pub fn lookup(xsd_name: &str) -> Option<&'static BuiltinType> {
    BUILTIN_TYPES.iter().find(|row| row.xsd_name == xsd_name)
}

/// Reverse fallback when no `XsdType` keyword disambiguates: the
/// canonical XSD name for a JSON primitive type plus optional format.
pub fn canonical_name(json_type: PrimitiveType, format: Option<&str>) -> &'static str {
    match json_type {
        PrimitiveType::Boolean => "boolean",
        PrimitiveType::Integer => "long",
        PrimitiveType::Number => "double",
        PrimitiveType::String => match format {
            Some(format) => BUILTIN_TYPES
                .iter()
                .find(|row| row.json_type == PrimitiveType::String && row.format == Some(format))
                .map(|row| row.xsd_name)
                .unwrap_or("string"),
            None => "string",
        },
        // Open string value as the last resort.
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_family_collapses() {
        for name in ["integer", "long", "int", "short", "unsignedByte"] {
            let row = lookup(name).unwrap();
            assert_eq!(row.json_type, PrimitiveType::Integer);
            assert_eq!(row.format, None);
        }
    }

    #[test]
    fn test_date_time_formats() {
        assert_eq!(lookup("dateTime").unwrap().format, Some("date-time"));
        assert_eq!(lookup("anyURI").unwrap().format, Some("uri"));
        assert_eq!(lookup("duration").unwrap().format, Some("duration"));
    }

    #[test]
    fn test_unknown_name_is_absent() {
        assert!(lookup("frobnicator").is_none());
        assert!(lookup("Long").is_none());
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(canonical_name(PrimitiveType::Integer, None), "long");
        assert_eq!(canonical_name(PrimitiveType::Number, None), "double");
        assert_eq!(canonical_name(PrimitiveType::Boolean, None), "boolean");
        assert_eq!(canonical_name(PrimitiveType::String, None), "string");
        assert_eq!(
            canonical_name(PrimitiveType::String, Some("date-time")),
            "dateTime"
        );
        assert_eq!(canonical_name(PrimitiveType::String, Some("uri")), "anyURI");
        assert_eq!(canonical_name(PrimitiveType::String, Some("ipv6")), "string");
    }
}
