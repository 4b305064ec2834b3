//! JSON Schema → XSD conversion
//!
//! The inverse walk: reconstructs an XSD document and its type graph
//! from a JSON Schema document plus its vendor keywords. Every node's
//! keywords are drained through a [`WorkList`]; whatever is left
//! unclaimed after a node is done is a hard failure in strict mode and
//! a surfaced-but-dropped warning in lenient mode.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ConversionError, ConversionWarning, Result};
use crate::json::JsonSchema;
use crate::keywords::{Items, Keyword, KeywordKind, PrimitiveType};
use crate::typemap;
use crate::worklist::WorkList;
use crate::xml::{
    Annotation, AnnotationItem, Attribute, AttributeUse, ComplexType, Compositor, DocContent,
    Element, Facet, FacetKind, Group, MaxOccurs, Occurs, Particle, QName, Restriction, SchemaItem,
    SimpleContent, SimpleType, TypeDef, XmlSchema, XML_SCHEMA_INSTANCE_NAMESPACE,
    XML_SCHEMA_NAMESPACE,
};

/// Name given to the conventional single global element produced when
/// the document root is a bare `$ref` or a non-object schema.
pub const ROOT_ELEMENT_NAME: &str = "root";

/// How the converter treats keywords left unclaimed after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Drop leftovers with a warning. Tolerates evolving vendor
    /// keywords; this is the default.
    #[default]
    Lenient,
    /// Any leftover keyword fails the conversion. For conformance
    /// testing.
    Strict,
}

/// Converts a JSON Schema document into an XSD document.
#[derive(Debug, Default)]
pub struct JsonToXsdConverter {
    mode: ConversionMode,
    warnings: Vec<ConversionWarning>,
    path: Vec<String>,
}

impl JsonToXsdConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ConversionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Non-fatal notices collected during the last conversion, e.g.
    /// keywords dropped in lenient mode.
    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    /// Convert a whole JSON Schema document.
    pub fn convert(&mut self, schema: &JsonSchema) -> Result<XmlSchema> {
        debug!(mode = ?self.mode, "converting json schema document");
        self.warnings.clear();
        self.path.clear();

        let mut work = schema.work_list();
        let mut xsd = XmlSchema::new();

        // Dialect and id are bookkeeping from the forward direction.
        work.pull(KeywordKind::Schema);
        work.pull(KeywordKind::Id);

        if let Some(Keyword::XsdNamespaces(namespaces)) = work.pull(KeywordKind::XsdNamespaces) {
            xsd.namespaces = namespaces;
        }
        ensure_default_namespaces(&mut xsd);

        if let Some(Keyword::XsdSchemaAttributes(attributes)) =
            work.pull(KeywordKind::XsdSchemaAttributes)
        {
            apply_schema_attributes(&mut xsd, &attributes);
        }

        if let Some(annotation) = self.take_annotation(&mut work) {
            xsd.items.push(SchemaItem::Annotation(annotation));
        }

        self.handle_root_definition(&mut xsd, &mut work)?;

        if let Some(Keyword::Definitions(definitions)) = work.pull(KeywordKind::Definitions) {
            for (name, child) in definitions {
                let item = self.global_from_definition(name, &child)?;
                xsd.items.push(item);
            }
        }

        self.finish_node(&work)?;
        Ok(xsd)
    }

    // ------------------------------------------------------------------
    // Root dispatch
    // ------------------------------------------------------------------

    fn handle_root_definition(&mut self, xsd: &mut XmlSchema, work: &mut WorkList) -> Result<()> {
        if work.pull(KeywordKind::OneOf).is_some() {
            return Err(self.unsupported("'oneOf' compositions are not supported"));
        }
        if work.pull(KeywordKind::AnyOf).is_some() {
            return Err(self.unsupported("'anyOf' compositions are not supported"));
        }

        let type_keyword = match work.pull(KeywordKind::Type) {
            Some(Keyword::Type(primitive)) => Some(primitive),
            _ => None,
        };
        let is_object_root = !work.contains(KeywordKind::Ref)
            && !work.contains(KeywordKind::AllOf)
            && matches!(
                type_keyword,
                Some(PrimitiveType::Object) | Some(PrimitiveType::Null) | None
            );

        if is_object_root {
            // Container kind carries no meaning on the document root.
            work.pull(KeywordKind::XsdStructure);
            if let Some(Keyword::Properties(properties)) = work.pull(KeywordKind::Properties) {
                for (name, child) in properties {
                    let item = self.global_from_property(name, &child)?;
                    xsd.items.push(item);
                }
            }
            return Ok(());
        }

        // A bare reference or simple-typed root becomes the single
        // conventional global element.
        let mut element = Element::named(ROOT_ELEMENT_NAME);
        self.fill_element_body(&mut element, type_keyword, work)?;
        xsd.items.push(SchemaItem::Element(element));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Global declarations
    // ------------------------------------------------------------------

    /// A root `properties` entry: an XSD attribute when marked, an
    /// element otherwise.
    fn global_from_property(&mut self, name: String, schema: &JsonSchema) -> Result<SchemaItem> {
        self.path.push(name.clone());
        let mut work = schema.work_list();

        let item = if self.pull_attribute_marker(&mut work) {
            let mut attribute = Attribute::named(&name);
            self.fill_attribute(&mut attribute, &mut work)?;
            SchemaItem::Attribute(attribute)
        } else {
            let mut element = Element::named(&name);
            self.fill_element(&mut element, &mut work)?;
            SchemaItem::Element(element)
        };

        self.finish_node(&work)?;
        self.path.pop();
        Ok(item)
    }

    /// A `definitions` entry: classified back into the global
    /// declaration kind the forward direction flattened away.
    fn global_from_definition(&mut self, name: String, schema: &JsonSchema) -> Result<SchemaItem> {
        self.path.push(name.clone());
        let mut work = schema.work_list();

        let type_keyword = match schema.get(KeywordKind::Type) {
            Some(Keyword::Type(t)) => Some(*t),
            _ => None,
        };

        let item = if self.pull_attribute_marker(&mut work) {
            let mut attribute = Attribute::named(&name);
            self.fill_attribute(&mut attribute, &mut work)?;
            SchemaItem::Attribute(attribute)
        } else if schema.get(KeywordKind::AllOf).is_some() {
            let branches = match work.pull(KeywordKind::AllOf) {
                Some(Keyword::AllOf(branches)) => branches,
                _ => Vec::new(),
            };
            SchemaItem::SimpleType(self.simple_type_from_allof(Some(name.clone()), branches)?)
        } else if type_keyword == Some(PrimitiveType::Array) {
            work.pull(KeywordKind::Type);
            SchemaItem::SimpleType(self.list_simple_type(Some(name.clone()), &mut work)?)
        } else if matches!(
            type_keyword,
            Some(PrimitiveType::Object) | Some(PrimitiveType::Null)
        ) || (type_keyword.is_none() && schema.get(KeywordKind::Ref).is_none())
        {
            work.pull(KeywordKind::Type);
            SchemaItem::ComplexType(self.build_complex_type(Some(name.clone()), &mut work)?)
        } else if type_keyword.is_some() && has_facet_keywords(schema) {
            work.pull(KeywordKind::Type);
            let prim = type_keyword.unwrap_or(PrimitiveType::String);
            let (base, facets) = self.resolve_simple(prim, &mut work, None)?;
            SchemaItem::SimpleType(SimpleType {
                name: Some(name.clone()),
                content: SimpleContent::Restriction(Restriction {
                    base: Some(base),
                    base_inline: None,
                    facets,
                }),
            })
        } else {
            // A `$ref` or a facet-less primitive: a global element.
            let mut element = Element::named(&name);
            self.fill_element(&mut element, &mut work)?;
            SchemaItem::Element(element)
        };

        self.finish_node(&work)?;
        self.path.pop();
        Ok(item)
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    fn fill_element(&mut self, element: &mut Element, work: &mut WorkList) -> Result<()> {
        if work.pull(KeywordKind::OneOf).is_some() {
            return Err(self.unsupported("'oneOf' compositions are not supported"));
        }
        if work.pull(KeywordKind::AnyOf).is_some() {
            return Err(self.unsupported("'anyOf' compositions are not supported"));
        }
        let type_keyword = match work.pull(KeywordKind::Type) {
            Some(Keyword::Type(primitive)) => Some(primitive),
            _ => None,
        };
        self.fill_element_body(element, type_keyword, work)
    }

    /// Shared element body fill. The node's `type` keyword has already
    /// been claimed by the caller and is passed in.
    fn fill_element_body(
        &mut self,
        element: &mut Element,
        type_keyword: Option<PrimitiveType>,
        work: &mut WorkList,
    ) -> Result<()> {
        element.annotation = self.take_annotation(work);

        if let Some(Keyword::Ref(reference)) = work.pull(KeywordKind::Ref) {
            work.pull(KeywordKind::XsdType);
            element.type_name = Some(QName::local(self.ref_target(&reference)?));
        } else if let Some(Keyword::AllOf(branches)) = work.pull(KeywordKind::AllOf) {
            element.inline_type =
                Some(TypeDef::Simple(self.simple_type_from_allof(None, branches)?));
        } else {
            match type_keyword {
                Some(PrimitiveType::Array) => self.fill_array_element(element, work)?,
                Some(PrimitiveType::Object) | Some(PrimitiveType::Null) => {
                    let complex = self.build_complex_type(None, work)?;
                    element.inline_type = Some(TypeDef::Complex(complex));
                }
                Some(primitive) => {
                    let (base, facets) = self.resolve_simple(primitive, work, None)?;
                    if facets.is_empty() {
                        element.type_name = Some(base);
                    } else {
                        element.inline_type =
                            Some(TypeDef::Simple(SimpleType::restriction(base, facets)));
                    }
                }
                None => {
                    if work.contains(KeywordKind::Properties)
                        || work.contains(KeywordKind::XsdStructure)
                        || work.contains(KeywordKind::Required)
                    {
                        let complex = self.build_complex_type(None, work)?;
                        element.inline_type = Some(TypeDef::Complex(complex));
                    }
                    // Otherwise the element stays untyped (anyType).
                }
            }
        }

        self.fill_literals(work, &mut element.fixed, &mut element.default);
        if let Some(Keyword::XsdUnhandledAttributes(pairs)) =
            work.pull(KeywordKind::XsdUnhandledAttributes)
        {
            element.unhandled_attributes = pairs;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Arrays
    // ------------------------------------------------------------------

    fn fill_array_element(&mut self, element: &mut Element, work: &mut WorkList) -> Result<()> {
        let outer_xsd_type = self.pull_xsd_type(work);

        let items = work
            .pull(KeywordKind::Items)
            .ok_or_else(|| self.malformed("schema definition with type 'array' requires an 'items' keyword"))?;
        let item_schema = self.single_item(items)?;

        let min = match work.pull(KeywordKind::MinItems) {
            Some(Keyword::MinItems(n)) => self.occurs_bound(n)?,
            _ => 0,
        };
        let max = match work.pull(KeywordKind::MaxItems) {
            Some(Keyword::MaxItems(n)) => MaxOccurs::Bounded(self.occurs_bound(n)?),
            _ => MaxOccurs::Unbounded,
        };
        element.occurs = Occurs::new(min, max);

        self.path.push("items".to_string());
        let mut item_work = item_schema.work_list();

        if let Some(Keyword::Ref(reference)) = item_work.pull(KeywordKind::Ref) {
            item_work.pull(KeywordKind::XsdType);
            element.type_name = Some(QName::local(self.ref_target(&reference)?));
        } else if let Some(Keyword::AllOf(branches)) = item_work.pull(KeywordKind::AllOf) {
            element.inline_type =
                Some(TypeDef::Simple(self.simple_type_from_allof(None, branches)?));
        } else {
            match item_work.pull(KeywordKind::Type) {
                Some(Keyword::Type(PrimitiveType::Array)) => {
                    self.path.pop();
                    return Err(self.unsupported("nested arrays are not supported"));
                }
                Some(Keyword::Type(PrimitiveType::Object))
                | Some(Keyword::Type(PrimitiveType::Null)) => {
                    let complex = self.build_complex_type(None, &mut item_work)?;
                    element.inline_type = Some(TypeDef::Complex(complex));
                }
                Some(Keyword::Type(primitive)) => {
                    let (base, facets) =
                        self.resolve_simple(primitive, &mut item_work, outer_xsd_type)?;
                    if facets.is_empty() {
                        element.type_name = Some(base);
                    } else {
                        element.inline_type =
                            Some(TypeDef::Simple(SimpleType::restriction(base, facets)));
                    }
                }
                _ => {
                    let complex = self.build_complex_type(None, &mut item_work)?;
                    element.inline_type = Some(TypeDef::Complex(complex));
                }
            }
        }

        self.finish_node(&item_work)?;
        self.path.pop();
        Ok(())
    }

    fn occurs_bound(&self, value: u64) -> Result<u32> {
        u32::try_from(value).map_err(|_| {
            self.malformed(&format!(
                "occurrence bound {} exceeds the supported range",
                value
            ))
        })
    }

    fn single_item(&self, items: Keyword) -> Result<JsonSchema> {
        match items {
            Keyword::Items(Items::Single(schema)) => Ok(*schema),
            Keyword::Items(Items::Tuple(mut schemas)) => {
                if schemas.len() == 1 {
                    Ok(schemas.remove(0))
                } else {
                    Err(self.unsupported("tuple validation of arrays is not supported"))
                }
            }
            _ => Err(self.malformed("'items' keyword is missing a definition")),
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn fill_attribute(&mut self, attribute: &mut Attribute, work: &mut WorkList) -> Result<()> {
        attribute.annotation = self.take_annotation(work);

        if let Some(Keyword::Ref(reference)) = work.pull(KeywordKind::Ref) {
            work.pull(KeywordKind::XsdType);
            attribute.type_name = Some(QName::local(self.ref_target(&reference)?));
        } else if work.pull(KeywordKind::OneOf).is_some() {
            return Err(self.unsupported("'oneOf' compositions are not supported"));
        } else if work.pull(KeywordKind::AnyOf).is_some() {
            return Err(self.unsupported("'anyOf' compositions are not supported"));
        } else if let Some(Keyword::AllOf(branches)) = work.pull(KeywordKind::AllOf) {
            attribute.inline_type = Some(self.simple_type_from_allof(None, branches)?);
        } else {
            match work.pull(KeywordKind::Type) {
                Some(Keyword::Type(
                    PrimitiveType::Object | PrimitiveType::Array | PrimitiveType::Null,
                )) => {
                    return Err(self.unsupported("attributes must use a simple type"));
                }
                Some(Keyword::Type(primitive)) => {
                    let (base, facets) = self.resolve_simple(primitive, work, None)?;
                    if facets.is_empty() {
                        attribute.type_name = Some(base);
                    } else {
                        attribute.inline_type = Some(SimpleType::restriction(base, facets));
                    }
                }
                // Untyped attribute (anySimpleType).
                _ => {}
            }
        }

        self.fill_literals(work, &mut attribute.fixed, &mut attribute.default);
        if let Some(Keyword::XsdUnhandledAttributes(pairs)) =
            work.pull(KeywordKind::XsdUnhandledAttributes)
        {
            attribute.unhandled_attributes = pairs;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Complex types
    // ------------------------------------------------------------------

    /// Build a complex type from an object definition. The caller has
    /// already claimed the node's `type` keyword.
    fn build_complex_type(
        &mut self,
        name: Option<String>,
        work: &mut WorkList,
    ) -> Result<ComplexType> {
        let compositor = match work.pull(KeywordKind::XsdStructure) {
            Some(Keyword::XsdStructure(kind)) => kind,
            _ => Compositor::All,
        };
        let required: Vec<String> = match work.pull(KeywordKind::Required) {
            Some(Keyword::Required(names)) => names,
            _ => Vec::new(),
        };

        let mut group = Group::new(compositor);
        let mut attributes: Vec<Attribute> = Vec::new();

        if let Some(Keyword::Properties(properties)) = work.pull(KeywordKind::Properties) {
            for (property_name, child) in properties {
                self.path.push(property_name.clone());
                let mut child_work = child.work_list();

                if self.pull_attribute_marker(&mut child_work) {
                    let mut attribute = Attribute::named(&property_name);
                    if required.iter().any(|r| r == &property_name) {
                        attribute.use_ = AttributeUse::Required;
                    }
                    self.fill_attribute(&mut attribute, &mut child_work)?;
                    attributes.push(attribute);
                } else {
                    let mut element = Element::named(&property_name);
                    element.occurs = if required.iter().any(|r| r == &property_name) {
                        Occurs::default()
                    } else {
                        Occurs::optional()
                    };
                    self.fill_element(&mut element, &mut child_work)?;
                    group.particles.push(Particle::Element(element));
                }

                self.finish_node(&child_work)?;
                self.path.pop();
            }
        }

        // An empty container is pruned rather than emitted as an
        // invalid empty <xs:all>/<xs:sequence>.
        let particle = if group.particles.is_empty() {
            None
        } else {
            Some(group)
        };

        Ok(ComplexType {
            name,
            particle,
            attributes,
            content: None,
        })
    }

    // ------------------------------------------------------------------
    // Simple types
    // ------------------------------------------------------------------

    /// Resolve a primitive-typed node to its XSD base type name plus
    /// any reconstructed facets. The `XsdType` keyword wins over the
    /// canonical table fallback; `fallback_xsd_type` carries a marker
    /// found on an enclosing array schema.
    fn resolve_simple(
        &mut self,
        primitive: PrimitiveType,
        work: &mut WorkList,
        fallback_xsd_type: Option<String>,
    ) -> Result<(QName, Vec<Facet>)> {
        let format = match work.pull(KeywordKind::Format) {
            Some(Keyword::Format(format)) => Some(format),
            _ => None,
        };
        let xsd_type = self.pull_xsd_type(work).or(fallback_xsd_type);
        let base = match xsd_type {
            Some(name) => QName::xsd(name),
            None => QName::xsd(typemap::canonical_name(primitive, format.as_deref())),
        };
        let facets = self.take_facets(work)?;
        Ok((base, facets))
    }

    fn simple_type_from_allof(
        &mut self,
        name: Option<String>,
        branches: Vec<JsonSchema>,
    ) -> Result<SimpleType> {
        let [base_branch, facet_branch]: [JsonSchema; 2] =
            branches.try_into().map_err(|_| {
                self.unsupported(
                    "only 'allOf' with a base type branch and a single restriction branch is supported",
                )
            })?;

        let mut base_work = base_branch.work_list();
        let base = if let Some(Keyword::Ref(reference)) = base_work.pull(KeywordKind::Ref) {
            base_work.pull(KeywordKind::XsdType);
            QName::local(self.ref_target(&reference)?)
        } else if let Some(Keyword::Type(primitive)) = base_work.pull(KeywordKind::Type) {
            let format = match base_work.pull(KeywordKind::Format) {
                Some(Keyword::Format(format)) => Some(format),
                _ => None,
            };
            match self.pull_xsd_type(&mut base_work) {
                Some(name) => QName::xsd(name),
                None => QName::xsd(typemap::canonical_name(primitive, format.as_deref())),
            }
        } else {
            return Err(self.unsupported("'allOf' base branch must name a type"));
        };
        self.finish_node(&base_work)?;

        let mut facet_work = facet_branch.work_list();
        let facets = self.take_facets(&mut facet_work)?;
        self.finish_node(&facet_work)?;

        Ok(SimpleType {
            name,
            content: SimpleContent::Restriction(Restriction {
                base: Some(base),
                base_inline: None,
                facets,
            }),
        })
    }

    /// A `definitions` entry with `type: array` is a simple-type list.
    fn list_simple_type(
        &mut self,
        name: Option<String>,
        work: &mut WorkList,
    ) -> Result<SimpleType> {
        let items = work
            .pull(KeywordKind::Items)
            .ok_or_else(|| self.malformed("schema definition with type 'array' requires an 'items' keyword"))?;
        let item_schema = self.single_item(items)?;

        self.path.push("items".to_string());
        let mut item_work = item_schema.work_list();

        let content = if let Some(Keyword::Ref(reference)) = item_work.pull(KeywordKind::Ref) {
            item_work.pull(KeywordKind::XsdType);
            SimpleContent::List {
                item_type: Some(QName::local(self.ref_target(&reference)?)),
                inline: None,
                location: None,
            }
        } else if let Some(Keyword::AllOf(branches)) = item_work.pull(KeywordKind::AllOf) {
            SimpleContent::List {
                item_type: None,
                inline: Some(Box::new(self.simple_type_from_allof(None, branches)?)),
                location: None,
            }
        } else {
            match item_work.pull(KeywordKind::Type) {
                Some(Keyword::Type(
                    primitive @ (PrimitiveType::String
                    | PrimitiveType::Number
                    | PrimitiveType::Integer
                    | PrimitiveType::Boolean),
                )) => {
                    let (base, facets) = self.resolve_simple(primitive, &mut item_work, None)?;
                    if facets.is_empty() {
                        SimpleContent::List {
                            item_type: Some(base),
                            inline: None,
                            location: None,
                        }
                    } else {
                        SimpleContent::List {
                            item_type: None,
                            inline: Some(Box::new(SimpleType::restriction(base, facets))),
                            location: None,
                        }
                    }
                }
                _ => {
                    self.path.pop();
                    return Err(self.malformed("list items must use a simple type"));
                }
            }
        };

        self.finish_node(&item_work)?;
        self.path.pop();
        Ok(SimpleType { name, content })
    }

    /// Reconstruct restriction facets from constraint keywords.
    fn take_facets(&mut self, work: &mut WorkList) -> Result<Vec<Facet>> {
        let mut facets = Vec::new();

        if let Some(Keyword::Enum(values)) = work.pull(KeywordKind::Enum) {
            for value in values {
                facets.push(Facet {
                    kind: FacetKind::Enumeration,
                    value: Some(literal_string(&value)),
                });
            }
        }
        if let Some(Keyword::Pattern(pattern)) = work.pull(KeywordKind::Pattern) {
            facets.push(Facet::new(FacetKind::Pattern, pattern));
        }
        if let Some(Keyword::MinLength(n)) = work.pull(KeywordKind::MinLength) {
            facets.push(Facet::new(FacetKind::MinLength, n.to_string()));
        }
        if let Some(Keyword::MaxLength(n)) = work.pull(KeywordKind::MaxLength) {
            facets.push(Facet::new(FacetKind::MaxLength, n.to_string()));
        }
        if let Some(Keyword::MultipleOf(step)) = work.pull(KeywordKind::MultipleOf) {
            match fraction_digits(step) {
                Some(digits) => {
                    facets.push(Facet::new(FacetKind::FractionDigits, digits.to_string()));
                }
                None => self.drop_keyword(
                    "lossy-multiple-of",
                    format!("multipleOf {} has no XSD facet equivalent", step),
                )?,
            }
        }
        if let Some(Keyword::Maximum(bound)) = work.pull(KeywordKind::Maximum) {
            facets.push(Facet::new(FacetKind::MaxInclusive, format_number(bound)));
        }
        if let Some(Keyword::Minimum(bound)) = work.pull(KeywordKind::Minimum) {
            facets.push(Facet::new(FacetKind::MinInclusive, format_number(bound)));
        }
        if let Some(Keyword::ExclusiveMaximum(bound)) = work.pull(KeywordKind::ExclusiveMaximum) {
            facets.push(Facet::new(FacetKind::MaxExclusive, format_number(bound)));
        }
        if let Some(Keyword::ExclusiveMinimum(bound)) = work.pull(KeywordKind::ExclusiveMinimum) {
            facets.push(Facet::new(FacetKind::MinExclusive, format_number(bound)));
        }

        Ok(facets)
    }

    // ------------------------------------------------------------------
    // Annotations and literals
    // ------------------------------------------------------------------

    fn take_annotation(&mut self, work: &mut WorkList) -> Option<Annotation> {
        let mut items = Vec::new();
        if let Some(Keyword::Comment(markup)) = work.pull(KeywordKind::Comment) {
            items.push(AnnotationItem::AppInfo(markup));
        }
        if let Some(Keyword::Description(markup)) = work.pull(KeywordKind::Description) {
            items.push(AnnotationItem::Documentation(DocContent::Raw(markup)));
        }
        if let Some(Keyword::Info(value)) = work.pull(KeywordKind::Info) {
            items.push(AnnotationItem::Documentation(DocContent::FixedAttributes(
                info_pairs(&value),
            )));
        }
        if items.is_empty() {
            None
        } else {
            Some(Annotation { items })
        }
    }

    fn fill_literals(
        &mut self,
        work: &mut WorkList,
        fixed: &mut Option<String>,
        default: &mut Option<String>,
    ) {
        if let Some(Keyword::Const(value)) = work.pull(KeywordKind::Const) {
            *fixed = Some(literal_string(&value));
        }
        if let Some(Keyword::Default(value)) = work.pull(KeywordKind::Default) {
            *default = Some(literal_string(&value));
        }
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    fn pull_attribute_marker(&mut self, work: &mut WorkList) -> bool {
        matches!(
            work.pull(KeywordKind::XsdAttribute),
            Some(Keyword::XsdAttribute(true))
        )
    }

    /// Claim a usable `XsdType` marker: `"#ref"` and empty values mean
    /// "no disambiguation".
    fn pull_xsd_type(&mut self, work: &mut WorkList) -> Option<String> {
        match work.pull(KeywordKind::XsdType) {
            Some(Keyword::XsdType(name)) if !name.is_empty() && name != "#ref" => Some(name),
            _ => None,
        }
    }

    fn ref_target(&self, reference: &str) -> Result<String> {
        let name = reference
            .rsplit('/')
            .next()
            .unwrap_or("")
            .trim_start_matches('#');
        if name.is_empty() {
            Err(self.malformed(&format!(
                "cannot resolve a type name from reference '{}'",
                reference
            )))
        } else {
            Ok(name.to_string())
        }
    }

    /// Unclaimed keywords end the node's pass: fatal in strict mode,
    /// dropped with a surfaced warning in lenient mode.
    fn finish_node(&mut self, work: &WorkList) -> Result<()> {
        let leftover: Vec<String> = work.unclaimed().map(|k| k.name().to_string()).collect();
        if leftover.is_empty() {
            return Ok(());
        }
        match self.mode {
            ConversionMode::Strict => Err(ConversionError::UnclaimedKeywords {
                path: self.path_string(),
                keywords: leftover,
            }),
            ConversionMode::Lenient => {
                for keyword in leftover {
                    warn!(path = %self.path_string(), %keyword, "dropping unclaimed keyword");
                    self.warnings.push(ConversionWarning {
                        code: "unclaimed-keyword",
                        message: format!("keyword '{}' was not recognized and has been dropped", keyword),
                        path: self.path_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// A keyword that was claimed but cannot be expressed: fatal in
    /// strict mode, warned and dropped in lenient mode.
    fn drop_keyword(&mut self, code: &'static str, message: String) -> Result<()> {
        match self.mode {
            ConversionMode::Strict => Err(ConversionError::UnsupportedConstruct {
                path: self.path_string(),
                detail: message,
                location: None,
            }),
            ConversionMode::Lenient => {
                warn!(path = %self.path_string(), %message, "dropping keyword");
                self.warnings.push(ConversionWarning {
                    code,
                    message,
                    path: self.path_string(),
                });
                Ok(())
            }
        }
    }

    fn path_string(&self) -> String {
        if self.path.is_empty() {
            "#".to_string()
        } else {
            format!("#/{}", self.path.join("/"))
        }
    }

    fn unsupported(&self, detail: &str) -> ConversionError {
        ConversionError::UnsupportedConstruct {
            path: self.path_string(),
            detail: detail.to_string(),
            location: None,
        }
    }

    fn malformed(&self, detail: &str) -> ConversionError {
        ConversionError::MalformedInput {
            path: self.path_string(),
            detail: detail.to_string(),
            location: None,
        }
    }
}

fn ensure_default_namespaces(xsd: &mut XmlSchema) {
    if !xsd
        .namespaces
        .iter()
        .any(|(_, uri)| uri == XML_SCHEMA_NAMESPACE)
    {
        xsd.namespaces
            .push(("xsd".to_string(), XML_SCHEMA_NAMESPACE.to_string()));
    }
    if !xsd
        .namespaces
        .iter()
        .any(|(_, uri)| uri == XML_SCHEMA_INSTANCE_NAMESPACE)
    {
        xsd.namespaces
            .push(("xsi".to_string(), XML_SCHEMA_INSTANCE_NAMESPACE.to_string()));
    }
}

fn apply_schema_attributes(xsd: &mut XmlSchema, attributes: &[(String, String)]) {
    for (name, value) in attributes {
        match name.as_str() {
            "AttributeFormDefault" => xsd.attribute_form_default = value.clone(),
            "ElementFormDefault" => xsd.element_form_default = value.clone(),
            "BlockDefault" => xsd.block_default = value.clone(),
            "FinalDefault" => xsd.final_default = value.clone(),
            other => debug!(attribute = other, "ignoring unrecognized schema attribute"),
        }
    }
}

fn has_facet_keywords(schema: &JsonSchema) -> bool {
    const FACET_KINDS: &[KeywordKind] = &[
        KeywordKind::Enum,
        KeywordKind::Pattern,
        KeywordKind::MinLength,
        KeywordKind::MaxLength,
        KeywordKind::MultipleOf,
        KeywordKind::Maximum,
        KeywordKind::Minimum,
        KeywordKind::ExclusiveMaximum,
        KeywordKind::ExclusiveMinimum,
    ];
    FACET_KINDS.iter().any(|kind| schema.get(*kind).is_some())
}

fn info_pairs(value: &Value) -> Vec<(String, Option<String>)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::Null => None,
                    Value::String(text) => Some(text.clone()),
                    other => Some(other.to_string()),
                };
                (name.clone(), text)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn literal_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// `multipleOf` values of the form 10^-n map back to a fractionDigits
/// facet; anything else has no XSD home.
fn fraction_digits(step: f64) -> Option<u32> {
    if step <= 0.0 || step > 1.0 {
        return None;
    }
    let digits = (-step.log10()).round();
    if !(0.0..=20.0).contains(&digits) {
        return None;
    }
    let digits = digits as u32;
    if (10f64.powi(-(digits as i32)) - step).abs() < 1e-12 {
        Some(digits)
    } else {
        None
    }
}
