//! XSD → JSON Schema conversion
//!
//! Walks an XSD document's type graph and produces a JSON Schema
//! document with vendor keywords capturing everything JSON Schema
//! cannot natively express. The first global declaration (in document
//! order) becomes the single `properties` entry; every remaining global
//! declaration lands in `definitions` under its XSD name.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ConversionError, Result};
use crate::json::JsonSchema;
use crate::keywords::{Items, Keyword, PrimitiveType};
use crate::typemap;
use crate::xml::{
    Annotation, AnnotationItem, Attribute, AttributeGroup, AttributeUse, ComplexType, DocContent,
    Element, Facet, FacetKind, Location, MaxOccurs, NamedGroup, Occurs, Particle, QName,
    Restriction, SchemaItem, SimpleContent, SimpleType, TypeDef, XmlSchema,
};

/// The JSON Schema dialect the converter emits.
pub const DRAFT_2019_09: &str = "https://json-schema.org/draft/2019-09/schema";

/// Converts an XSD document into a JSON Schema document. Each call is a
/// pure function of its input; the converter only carries the node path
/// used in diagnostics.
#[derive(Debug, Default)]
pub struct XsdToJsonConverter {
    path: Vec<String>,
}

impl XsdToJsonConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a whole XSD document.
    pub fn convert(&mut self, schema: &XmlSchema) -> Result<JsonSchema> {
        debug!(globals = schema.items.len(), "converting xsd document");
        self.path.clear();

        let mut out = JsonSchema::new()
            .with(Keyword::Schema(DRAFT_2019_09.to_string()))
            .with(Keyword::Id("schema.json".to_string()))
            .with(Keyword::Type(PrimitiveType::Object))
            .with(Keyword::XsdNamespaces(schema.namespaces.clone()))
            .with(Keyword::XsdSchemaAttributes(vec![
                (
                    "AttributeFormDefault".to_string(),
                    schema.attribute_form_default.clone(),
                ),
                (
                    "ElementFormDefault".to_string(),
                    schema.element_form_default.clone(),
                ),
                ("BlockDefault".to_string(), schema.block_default.clone()),
                ("FinalDefault".to_string(), schema.final_default.clone()),
            ]));

        let mut globals: Vec<(String, JsonSchema)> = Vec::new();
        for item in &schema.items {
            match item {
                SchemaItem::Import(u) => {
                    return Err(self.unsupported("schema imports are not supported", u.location));
                }
                SchemaItem::Redefine(u) => {
                    return Err(self.unsupported("schema redefine is not supported", u.location));
                }
                SchemaItem::Annotation(annotation) => {
                    self.add_root_annotation(annotation, &mut out);
                }
                SchemaItem::SimpleType(simple) => {
                    let name = self.global_name(simple.name.as_deref(), "simple type")?;
                    self.path.push(name.clone());
                    let mut converted = JsonSchema::new();
                    self.apply_simple_type(simple, &mut converted)?;
                    self.path.pop();
                    globals.push((name, converted));
                }
                SchemaItem::ComplexType(complex) => {
                    let name = self.global_name(complex.name.as_deref(), "complex type")?;
                    self.path.push(name.clone());
                    let mut converted = JsonSchema::new();
                    self.apply_complex_type(complex, &mut converted)?;
                    self.path.pop();
                    globals.push((name, converted));
                }
                SchemaItem::Group(group) => {
                    globals.push((group.name.clone(), self.convert_named_group(group)?));
                }
                SchemaItem::Element(element) => {
                    globals.push((element.name.clone(), self.convert_element(element)?));
                }
                SchemaItem::Attribute(attribute) => {
                    globals.push((attribute.name.clone(), self.convert_attribute(attribute)?));
                }
                SchemaItem::AttributeGroup(group) => {
                    globals.push((group.name.clone(), self.convert_attribute_group(group)?));
                }
            }
        }

        let mut globals = globals.into_iter();
        if let Some(first) = globals.next() {
            out.push(Keyword::Properties(vec![first]));
        }
        let rest: Vec<(String, JsonSchema)> = globals.collect();
        if !rest.is_empty() {
            out.push(Keyword::Definitions(rest));
        }

        Ok(out)
    }

    fn global_name(&self, name: Option<&str>, kind: &str) -> Result<String> {
        name.map(str::to_string).ok_or_else(|| ConversionError::MalformedInput {
            path: self.path_string(),
            detail: format!("global {} requires a name", kind),
            location: None,
        })
    }

    // ------------------------------------------------------------------
    // Elements and attributes
    // ------------------------------------------------------------------

    fn convert_element(&mut self, element: &Element) -> Result<JsonSchema> {
        self.path.push(element.name.clone());
        let mut out = JsonSchema::new();

        if let Some(annotation) = &element.annotation {
            self.add_local_annotation(annotation, &mut out);
        }

        let mut body = JsonSchema::new();
        let mut xsd_type_marker: Option<String> = None;
        if let Some(type_name) = &element.type_name {
            xsd_type_marker = Some(self.apply_type_name(type_name, &mut body)?);
        } else if let Some(inline) = &element.inline_type {
            match inline {
                TypeDef::Simple(simple) => self.apply_simple_type(simple, &mut body)?,
                TypeDef::Complex(complex) => self.apply_complex_type(complex, &mut body)?,
            }
        }

        self.apply_occurs(element.occurs, body, &mut out);
        if let Some(marker) = xsd_type_marker {
            out.push(Keyword::XsdType(marker));
        }

        if let Some(fixed) = &element.fixed {
            out.push(Keyword::Const(Value::String(fixed.clone())));
        }
        if let Some(default) = &element.default {
            out.push(Keyword::Default(Value::String(default.clone())));
        }
        if !element.unhandled_attributes.is_empty() {
            out.push(Keyword::XsdUnhandledAttributes(
                element.unhandled_attributes.clone(),
            ));
        }

        self.path.pop();
        Ok(out)
    }

    fn convert_attribute(&mut self, attribute: &Attribute) -> Result<JsonSchema> {
        self.path.push(attribute.name.clone());
        let mut out = JsonSchema::new();

        if let Some(annotation) = &attribute.annotation {
            self.add_local_annotation(annotation, &mut out);
        }

        if let Some(type_name) = &attribute.type_name {
            let marker = self.apply_type_name(type_name, &mut out)?;
            out.push(Keyword::XsdType(marker));
        } else if let Some(inline) = &attribute.inline_type {
            self.apply_simple_type(inline, &mut out)?;
        }

        if let Some(default) = &attribute.default {
            out.push(Keyword::Default(Value::String(default.clone())));
        }
        if let Some(fixed) = &attribute.fixed {
            out.push(Keyword::Const(Value::String(fixed.clone())));
        }
        if !attribute.unhandled_attributes.is_empty() {
            out.push(Keyword::XsdUnhandledAttributes(
                attribute.unhandled_attributes.clone(),
            ));
        }
        out.push(Keyword::XsdAttribute(true));

        self.path.pop();
        Ok(out)
    }

    /// Resolve a type-name reference onto `out` and return the
    /// `XsdType` marker value: the built-in local name, or `"#ref"` for
    /// a reference to a named type.
    fn apply_type_name(&self, type_name: &QName, out: &mut JsonSchema) -> Result<String> {
        if type_name.is_xsd() {
            let builtin =
                typemap::lookup(&type_name.name).ok_or_else(|| ConversionError::UnknownType {
                    path: self.path_string(),
                    name: type_name.name.clone(),
                })?;
            out.push(Keyword::Type(builtin.json_type));
            if let Some(format) = builtin.format {
                out.push(Keyword::Format(format.to_string()));
            }
            Ok(type_name.name.clone())
        } else {
            out.push(Keyword::Ref(format!("#/definitions/{}", type_name.name)));
            Ok("#ref".to_string())
        }
    }

    /// Append `body` onto `out`, wrapping it in an array schema when the
    /// occurrence bounds allow repetition. Unbounded maxOccurs omits
    /// `maxItems`; minOccurs of zero omits `minItems`.
    fn apply_occurs(&self, occurs: Occurs, body: JsonSchema, out: &mut JsonSchema) {
        if occurs.repeats() {
            out.push(Keyword::Type(PrimitiveType::Array));
            out.push(Keyword::Items(Items::Single(Box::new(body))));
            if occurs.min > 0 {
                out.push(Keyword::MinItems(occurs.min as u64));
            }
            if let MaxOccurs::Bounded(max) = occurs.max {
                out.push(Keyword::MaxItems(max as u64));
            }
        } else {
            out.keywords.extend(body.keywords);
        }
    }

    // ------------------------------------------------------------------
    // Simple types
    // ------------------------------------------------------------------

    fn apply_simple_type(&mut self, simple: &SimpleType, out: &mut JsonSchema) -> Result<()> {
        match &simple.content {
            SimpleContent::Restriction(restriction) => self.apply_restriction(restriction, out),
            SimpleContent::List {
                item_type,
                inline,
                location,
            } => self.apply_list(item_type.as_ref(), inline.as_deref(), *location, out),
            SimpleContent::Union { location, .. } => {
                Err(self.unsupported("xsd unions are not supported", *location))
            }
        }
    }

    fn apply_restriction(&mut self, restriction: &Restriction, out: &mut JsonSchema) -> Result<()> {
        if let Some(base) = &restriction.base {
            // Named base: allOf over the base schema and the facet
            // constraints, so the base reference survives round trips.
            let mut base_schema = JsonSchema::new();
            let marker = self.apply_type_name(base, &mut base_schema)?;
            base_schema.push(Keyword::XsdType(marker));

            let mut facet_schema = JsonSchema::new();
            self.apply_facets(&restriction.facets, &mut facet_schema)?;
            out.push(Keyword::AllOf(vec![base_schema, facet_schema]));
            return Ok(());
        }

        // Anonymous base: merge everything onto the target schema.
        if let Some(inline) = &restriction.base_inline {
            self.apply_simple_type(inline, out)?;
        }
        self.apply_facets(&restriction.facets, out)
    }

    fn apply_facets(&self, facets: &[Facet], out: &mut JsonSchema) -> Result<()> {
        let mut enum_values: Vec<Value> = Vec::new();

        for facet in facets {
            match facet.kind {
                FacetKind::Enumeration => {
                    if let Some(value) = &facet.value {
                        enum_values.push(Value::String(value.clone()));
                    }
                }
                FacetKind::FractionDigits => {
                    if let Some(digits) = facet_unsigned(facet) {
                        out.push(Keyword::MultipleOf(10f64.powi(-(digits as i32))));
                    }
                }
                FacetKind::Length => {
                    if let Some(length) = facet_unsigned(facet) {
                        out.push(Keyword::MinLength(length));
                        out.push(Keyword::MaxLength(length));
                    }
                }
                FacetKind::MaxExclusive => {
                    if let Some(bound) = facet_number(facet) {
                        out.push(Keyword::ExclusiveMaximum(bound));
                    }
                }
                FacetKind::MaxInclusive => {
                    if let Some(bound) = facet_number(facet) {
                        out.push(Keyword::Maximum(bound));
                    }
                }
                FacetKind::MaxLength => {
                    if let Some(length) = facet_unsigned(facet) {
                        out.push(Keyword::MaxLength(length));
                    }
                }
                FacetKind::MinExclusive => {
                    if let Some(bound) = facet_number(facet) {
                        out.push(Keyword::ExclusiveMinimum(bound));
                    }
                }
                FacetKind::MinInclusive => {
                    if let Some(bound) = facet_number(facet) {
                        out.push(Keyword::Minimum(bound));
                    }
                }
                FacetKind::MinLength => {
                    if let Some(length) = facet_unsigned(facet) {
                        out.push(Keyword::MinLength(length));
                    }
                }
                // Best-effort digit-count approximation.
                FacetKind::TotalDigits => {
                    if let Some(digits) = facet_unsigned(facet) {
                        out.push(Keyword::MaxLength(digits));
                    }
                }
                FacetKind::Pattern => {
                    let pattern =
                        facet
                            .value
                            .clone()
                            .ok_or_else(|| ConversionError::MalformedInput {
                                path: self.path_string(),
                                detail: "value of the pattern facet cannot be null".to_string(),
                                location: None,
                            })?;
                    out.push(Keyword::Pattern(pattern));
                }
                // No JSON Schema equivalent.
                FacetKind::WhiteSpace => {}
            }
        }

        if !enum_values.is_empty() {
            out.push(Keyword::Enum(enum_values));
        }
        Ok(())
    }

    fn apply_list(
        &mut self,
        item_type: Option<&QName>,
        inline: Option<&SimpleType>,
        location: Option<Location>,
        out: &mut JsonSchema,
    ) -> Result<()> {
        out.push(Keyword::Type(PrimitiveType::Array));

        let item_schema = if let Some(inline) = inline {
            let mut converted = JsonSchema::new();
            self.apply_simple_type(inline, &mut converted)?;
            converted
        } else if let Some(item_type) = item_type {
            let mut converted = JsonSchema::new();
            let marker = self.apply_type_name(item_type, &mut converted)?;
            converted.push(Keyword::XsdType(marker));
            converted
        } else {
            return Err(ConversionError::MalformedInput {
                path: self.path_string(),
                detail: "list definition must include 'itemType' or an inline simple type"
                    .to_string(),
                location,
            });
        };

        out.push(Keyword::Items(Items::Single(Box::new(item_schema))));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Complex types and groups
    // ------------------------------------------------------------------

    fn apply_complex_type(&mut self, complex: &ComplexType, out: &mut JsonSchema) -> Result<()> {
        if complex.content.is_some() {
            return Err(self.unsupported(
                "simpleContent/complexContent derivation is not supported",
                None,
            ));
        }

        out.push(Keyword::Type(PrimitiveType::Object));

        let mut properties: Vec<(String, JsonSchema)> = Vec::new();
        let mut required: Vec<String> = Vec::new();

        if let Some(group) = &complex.particle {
            // Occurrence bounds on the compositor itself have no JSON
            // mapping; only the member elements may repeat.
            if group.occurs != Occurs::default() {
                return Err(self.unsupported(
                    "occurrence bounds on a content-model group are not supported",
                    None,
                ));
            }
            out.push(Keyword::XsdStructure(group.kind));
            self.apply_particles(&group.particles, &mut properties, &mut required)?;
        }

        for attribute in &complex.attributes {
            if attribute.use_ == AttributeUse::Required {
                required.push(attribute.name.clone());
            }
            properties.push((attribute.name.clone(), self.convert_attribute(attribute)?));
        }

        if !properties.is_empty() {
            out.push(Keyword::Properties(properties));
        }
        if !required.is_empty() {
            out.push(Keyword::Required(required));
        }
        Ok(())
    }

    /// Convert a container's particle children into property entries,
    /// keeping declaration order. Only element particles have a JSON
    /// mapping.
    fn apply_particles(
        &mut self,
        particles: &[Particle],
        properties: &mut Vec<(String, JsonSchema)>,
        required: &mut Vec<String>,
    ) -> Result<()> {
        for particle in particles {
            match particle {
                Particle::Element(element) => {
                    if element.occurs.min >= 1 && !element.occurs.repeats() {
                        required.push(element.name.clone());
                    }
                    properties.push((element.name.clone(), self.convert_element(element)?));
                }
                Particle::Group(_) => {
                    return Err(
                        self.unsupported("nested content-model groups are not supported", None)
                    );
                }
                Particle::GroupRef { name } => {
                    return Err(self.unsupported(
                        &format!("group reference '{}' is not supported", name.name),
                        None,
                    ));
                }
                Particle::Any { location } => {
                    return Err(self.unsupported("element wildcards are not supported", *location));
                }
            }
        }
        Ok(())
    }

    fn convert_named_group(&mut self, group: &NamedGroup) -> Result<JsonSchema> {
        self.path.push(group.name.clone());
        if group.group.occurs != Occurs::default() {
            return Err(self.unsupported(
                "occurrence bounds on a content-model group are not supported",
                None,
            ));
        }
        let mut out = JsonSchema::new()
            .with(Keyword::Type(PrimitiveType::Object))
            .with(Keyword::XsdStructure(group.group.kind));

        let mut properties = Vec::new();
        let mut required = Vec::new();
        self.apply_particles(&group.group.particles, &mut properties, &mut required)?;
        if !properties.is_empty() {
            out.push(Keyword::Properties(properties));
        }
        if !required.is_empty() {
            out.push(Keyword::Required(required));
        }

        self.path.pop();
        Ok(out)
    }

    fn convert_attribute_group(&mut self, group: &AttributeGroup) -> Result<JsonSchema> {
        self.path.push(group.name.clone());
        if group.any_attribute {
            return Err(self.unsupported("attribute wildcards are not supported", None));
        }

        let mut out = JsonSchema::new().with(Keyword::Type(PrimitiveType::Object));
        let mut properties = Vec::new();
        let mut required = Vec::new();
        for attribute in &group.attributes {
            if attribute.use_ == AttributeUse::Required {
                required.push(attribute.name.clone());
            }
            properties.push((attribute.name.clone(), self.convert_attribute(attribute)?));
        }
        if !properties.is_empty() {
            out.push(Keyword::Properties(properties));
        }
        if !required.is_empty() {
            out.push(Keyword::Required(required));
        }

        self.path.pop();
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Schema-root annotation: the SERES fixed-attribute documentation
    /// shape becomes the `Info` keyword; anything else degrades to a
    /// plain description or comment.
    fn add_root_annotation(&self, annotation: &Annotation, out: &mut JsonSchema) {
        for item in &annotation.items {
            match item {
                AnnotationItem::AppInfo(markup) => out.push(Keyword::Comment(markup.clone())),
                AnnotationItem::Documentation(DocContent::Raw(markup)) => {
                    out.push(Keyword::Description(markup.clone()));
                }
                AnnotationItem::Documentation(DocContent::FixedAttributes(pairs)) => {
                    out.push(Keyword::Info(info_object(pairs)));
                }
            }
        }
    }

    fn add_local_annotation(&self, annotation: &Annotation, out: &mut JsonSchema) {
        // Same mapping as the root; Info stays claimable on the way
        // back so the annotation survives a round trip anywhere.
        self.add_root_annotation(annotation, out);
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    fn path_string(&self) -> String {
        if self.path.is_empty() {
            "#".to_string()
        } else {
            format!("#/{}", self.path.join("/"))
        }
    }

    fn unsupported(&self, detail: &str, location: Option<Location>) -> ConversionError {
        ConversionError::UnsupportedConstruct {
            path: self.path_string(),
            detail: detail.to_string(),
            location,
        }
    }
}

fn info_object(pairs: &[(String, Option<String>)]) -> Value {
    let mut map = Map::new();
    for (name, value) in pairs {
        let value = match value {
            Some(text) => Value::String(text.clone()),
            None => Value::Null,
        };
        map.insert(name.clone(), value);
    }
    Value::Object(map)
}

fn facet_unsigned(facet: &Facet) -> Option<u64> {
    facet.value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn facet_number(facet: &Facet) -> Option<f64> {
    facet.value.as_deref().and_then(|v| v.trim().parse().ok())
}
