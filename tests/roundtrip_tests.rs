//! Round-trip tests: XSD → JSON → XSD structural equality in strict
//! mode, and JSON → XSD → JSON textual stability.

use pretty_assertions::assert_eq;
use serde_json::json;

use schema_bridge::json::JsonSchema;
use schema_bridge::json_to_xsd::{ConversionMode, JsonToXsdConverter};
use schema_bridge::xml::{
    Annotation, AnnotationItem, Attribute, ComplexType, Compositor, DocContent, Element, Facet,
    FacetKind, Group, MaxOccurs, Occurs, Particle, QName, Restriction, SchemaItem, SimpleContent,
    SimpleType, XmlSchema, XML_SCHEMA_INSTANCE_NAMESPACE, XML_SCHEMA_NAMESPACE,
};
use schema_bridge::xsd_to_json::{XsdToJsonConverter, DRAFT_2019_09};

fn base_schema() -> XmlSchema {
    let mut schema = XmlSchema::new();
    schema
        .namespaces
        .push(("xsd".to_string(), XML_SCHEMA_NAMESPACE.to_string()));
    schema
        .namespaces
        .push(("xsi".to_string(), XML_SCHEMA_INSTANCE_NAMESPACE.to_string()));
    schema
}

/// Forward then back in strict mode, so any keyword the reverse walk
/// fails to claim fails the test instead of being dropped.
fn roundtrip(schema: &XmlSchema) -> XmlSchema {
    let mut forward = XsdToJsonConverter::new();
    let json = forward.convert(schema).unwrap();
    let mut backward = JsonToXsdConverter::with_mode(ConversionMode::Strict);
    backward.convert(&json).unwrap()
}

#[test]
fn test_typed_element_roundtrips_with_marker() {
    // xsd:long and xsd:int both collapse to "integer"; the marker must
    // bring each one back unchanged.
    for type_name in ["long", "int", "unsignedByte", "nonNegativeInteger"] {
        let mut schema = base_schema();
        schema.items.push(SchemaItem::Element(
            Element::named("value").with_type(QName::xsd(type_name)),
        ));
        assert_eq!(roundtrip(&schema), schema);
    }
}

#[test]
fn test_format_tagged_types_roundtrip() {
    for type_name in ["dateTime", "date", "time", "duration", "anyURI"] {
        let mut schema = base_schema();
        schema.items.push(SchemaItem::Element(
            Element::named("value").with_type(QName::xsd(type_name)),
        ));
        assert_eq!(roundtrip(&schema), schema);
    }
}

#[test]
fn test_complex_type_element_roundtrips() {
    let mut group = Group::new(Compositor::Sequence);
    group.particles.push(Particle::Element(
        Element::named("name").with_type(QName::xsd("string")),
    ));
    group.particles.push(Particle::Element(
        Element::named("nickname")
            .with_type(QName::xsd("string"))
            .with_occurs(Occurs::optional()),
    ));

    let mut complex = ComplexType::new(None);
    complex.particle = Some(group);
    complex.attributes.push(
        Attribute::named("id")
            .with_type(QName::xsd("integer"))
            .required(),
    );
    complex
        .attributes
        .push(Attribute::named("note").with_type(QName::xsd("string")));

    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("person").with_inline(schema_bridge::xml::TypeDef::Complex(complex)),
    ));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_repeated_element_bounds_roundtrip() {
    let mut group = Group::new(Compositor::Sequence);
    group.particles.push(Particle::Element(
        Element::named("entry")
            .with_type(QName::xsd("int"))
            .with_occurs(Occurs::new(2, MaxOccurs::Bounded(10))),
    ));
    group.particles.push(Particle::Element(
        Element::named("extra")
            .with_type(QName::xsd("string"))
            .with_occurs(Occurs::new(0, MaxOccurs::Unbounded)),
    ));

    let mut complex = ComplexType::new(None);
    complex.particle = Some(group);

    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("batch").with_inline(schema_bridge::xml::TypeDef::Complex(complex)),
    ));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_named_restriction_roundtrips() {
    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("phone").with_type(QName::local("PhoneNumber")),
    ));
    schema.items.push(SchemaItem::SimpleType(SimpleType {
        name: Some("PhoneNumber".to_string()),
        content: SimpleContent::Restriction(Restriction {
            base: Some(QName::xsd("string")),
            base_inline: None,
            facets: vec![
                Facet::new(FacetKind::Enumeration, "800"),
                Facet::new(FacetKind::Enumeration, "900"),
                Facet::new(FacetKind::Pattern, "[0-9]+"),
                Facet::new(FacetKind::MinLength, "4"),
                Facet::new(FacetKind::MaxLength, "8"),
            ],
        }),
    }));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_numeric_restriction_roundtrips() {
    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("amount").with_type(QName::local("Amount")),
    ));
    schema.items.push(SchemaItem::SimpleType(SimpleType {
        name: Some("Amount".to_string()),
        content: SimpleContent::Restriction(Restriction {
            base: Some(QName::xsd("decimal")),
            base_inline: None,
            facets: vec![
                Facet::new(FacetKind::FractionDigits, "2"),
                Facet::new(FacetKind::MaxInclusive, "100"),
                Facet::new(FacetKind::MinInclusive, "0"),
            ],
        }),
    }));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_list_type_roundtrips() {
    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("tags").with_type(QName::local("TagList")),
    ));
    schema.items.push(SchemaItem::SimpleType(SimpleType {
        name: Some("TagList".to_string()),
        content: SimpleContent::List {
            item_type: Some(QName::xsd("string")),
            inline: None,
            location: None,
        },
    }));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_literals_and_unhandled_attributes_roundtrip() {
    let mut element = Element::named("version").with_type(QName::xsd("string"));
    element.fixed = Some("1.0".to_string());
    element.unhandled_attributes = vec![
        ("seres:elementtype".to_string(), "Dataenkeltype".to_string()),
        ("seres:guid".to_string(), "abc123".to_string()),
    ];

    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(element));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_default_value_roundtrips() {
    let mut element = Element::named("country").with_type(QName::xsd("string"));
    element.default = Some("NO".to_string());

    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(element));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_root_info_annotation_roundtrips() {
    let mut schema = base_schema();
    schema
        .items
        .push(SchemaItem::Annotation(Annotation::documentation(
            DocContent::FixedAttributes(vec![
                ("XSLT-skriptnavn".to_string(), Some("SERES_XSD".to_string())),
                ("tekst".to_string(), None),
            ]),
        )));
    schema.items.push(SchemaItem::Element(
        Element::named("melding").with_type(QName::xsd("string")),
    ));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_element_annotation_roundtrips() {
    let mut element = Element::named("note").with_type(QName::xsd("string"));
    element.annotation = Some(Annotation {
        items: vec![
            AnnotationItem::AppInfo("<seres/>".to_string()),
            AnnotationItem::Documentation(DocContent::Raw("A free-text note".to_string())),
        ],
    });

    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(element));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_global_attribute_roundtrips() {
    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("first").with_type(QName::xsd("string")),
    ));
    schema.items.push(SchemaItem::Attribute(
        Attribute::named("lang").with_type(QName::xsd("language")),
    ));

    assert_eq!(roundtrip(&schema), schema);
}

#[test]
fn test_json_document_is_textually_stable() {
    // A document already in canonical emission order must survive a
    // back-and-forth byte for byte, member order included.
    let value = json!({
        "$schema": DRAFT_2019_09,
        "$id": "schema.json",
        "type": "object",
        "XsdNamespaces": {
            "xsd": XML_SCHEMA_NAMESPACE,
            "xsi": XML_SCHEMA_INSTANCE_NAMESPACE
        },
        "XsdSchemaAttributes": {
            "AttributeFormDefault": "None",
            "ElementFormDefault": "None",
            "BlockDefault": "None",
            "FinalDefault": "None"
        },
        "properties": {
            "person": {
                "type": "object",
                "XsdStructure": "sequence",
                "properties": {
                    "name": {"type": "string", "XsdType": "string"},
                    "age": {"type": "integer", "XsdType": "int"}
                },
                "required": ["name"]
            }
        },
        "definitions": {
            "Address": {
                "type": "object",
                "XsdStructure": "all",
                "properties": {
                    "street": {"type": "string", "XsdType": "string"}
                }
            }
        }
    });

    let schema = JsonSchema::from_value(&value).unwrap();
    let mut backward = JsonToXsdConverter::with_mode(ConversionMode::Strict);
    let xsd = backward.convert(&schema).unwrap();
    let mut forward = XsdToJsonConverter::new();
    let restored = forward.convert(&xsd).unwrap();

    assert_eq!(restored.to_value(), value);
}

#[test]
fn test_property_order_survives_roundtrip() {
    let mut group = Group::new(Compositor::All);
    for name in [
        "zeta", "alpha", "mid", "b", "a", "c", "nine", "one", "seven", "x2", "x10", "x1",
    ] {
        group.particles.push(Particle::Element(
            Element::named(name)
                .with_type(QName::xsd("string"))
                .with_occurs(Occurs::optional()),
        ));
    }
    let mut complex = ComplexType::new(None);
    complex.particle = Some(group);

    let mut schema = base_schema();
    schema.items.push(SchemaItem::Element(
        Element::named("doc").with_inline(schema_bridge::xml::TypeDef::Complex(complex)),
    ));

    let restored = roundtrip(&schema);
    assert_eq!(restored, schema);
}
