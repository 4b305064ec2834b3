//! XSD-side document model
//!
//! A closed set of tagged unions describing the structural subset of
//! W3C XML Schema 1.0 that the converters operate on. The tree is fully
//! owned and carries no parent back-pointers; contextual decisions
//! ("am I at the schema root?") are made by the converters as they
//! recurse, not by walking upward.

use serde::{Deserialize, Serialize};

/// The W3C XML Schema namespace, home of all built-in type names.
pub const XML_SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// The XML Schema instance namespace.
pub const XML_SCHEMA_INSTANCE_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Source position of a node, when the producing parser supplied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A qualified name: an optional namespace URI plus a local name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QName {
    pub namespace: Option<String>,
    pub name: String,
}

impl QName {
    /// A name with no namespace, used for references to named types
    /// declared in the same document.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// A name in the XML Schema namespace (a built-in type).
    pub fn xsd(name: impl Into<String>) -> Self {
        Self {
            namespace: Some(XML_SCHEMA_NAMESPACE.to_string()),
            name: name.into(),
        }
    }

    /// True when this name lives in the XML Schema namespace.
    pub fn is_xsd(&self) -> bool {
        self.namespace.as_deref() == Some(XML_SCHEMA_NAMESPACE)
    }
}

/// An XSD document root.
///
/// `items` holds the global declarations in document order; that order
/// decides which declaration becomes the JSON document's `properties`
/// entry and which land in `definitions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlSchema {
    /// Namespace prefix to URI bindings, in declaration order.
    pub namespaces: Vec<(String, String)>,
    pub attribute_form_default: String,
    pub element_form_default: String,
    pub block_default: String,
    pub final_default: String,
    /// Global declarations in document order.
    pub items: Vec<SchemaItem>,
}

impl Default for XmlSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlSchema {
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            attribute_form_default: "None".to_string(),
            element_form_default: "None".to_string(),
            block_default: "None".to_string(),
            final_default: "None".to_string(),
            items: Vec::new(),
        }
    }
}

/// A global (schema-root) declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaItem {
    Element(Element),
    Attribute(Attribute),
    SimpleType(SimpleType),
    ComplexType(ComplexType),
    Group(NamedGroup),
    AttributeGroup(AttributeGroup),
    Annotation(Annotation),
    /// `<xs:import>`, carried so the converter can reject it with a
    /// position.
    Import(Unsupported),
    /// `<xs:redefine>`, same treatment as imports.
    Redefine(Unsupported),
}

/// Placeholder body for global constructs that have no mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unsupported {
    pub location: Option<Location>,
}

/// Occurrence bounds of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurs {
    pub min: u32,
    pub max: MaxOccurs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl Default for Occurs {
    fn default() -> Self {
        Self {
            min: 1,
            max: MaxOccurs::Bounded(1),
        }
    }
}

impl Occurs {
    /// minOccurs=0, maxOccurs=1.
    pub fn optional() -> Self {
        Self {
            min: 0,
            max: MaxOccurs::Bounded(1),
        }
    }

    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    /// True when the particle may repeat, which forces an array schema
    /// on the JSON side.
    pub fn repeats(&self) -> bool {
        match self.max {
            MaxOccurs::Bounded(n) => n > 1,
            MaxOccurs::Unbounded => true,
        }
    }
}

/// An element declaration, global or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    /// Reference to a named or built-in type (`type=` / `ref=`).
    pub type_name: Option<QName>,
    /// Anonymous inline type definition.
    pub inline_type: Option<TypeDef>,
    pub occurs: Occurs,
    pub default: Option<String>,
    pub fixed: Option<String>,
    pub annotation: Option<Annotation>,
    /// Foreign XML attributes preserved verbatim for round-tripping.
    pub unhandled_attributes: Vec<(String, String)>,
}

impl Element {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            inline_type: None,
            occurs: Occurs::default(),
            default: None,
            fixed: None,
            annotation: None,
            unhandled_attributes: Vec::new(),
        }
    }

    pub fn with_type(mut self, type_name: QName) -> Self {
        self.type_name = Some(type_name);
        self
    }

    pub fn with_occurs(mut self, occurs: Occurs) -> Self {
        self.occurs = occurs;
        self
    }

    pub fn with_inline(mut self, inline: TypeDef) -> Self {
        self.inline_type = Some(inline);
        self
    }
}

/// How an attribute declaration participates in its complex type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeUse {
    Optional,
    Required,
}

/// An attribute declaration, global or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub type_name: Option<QName>,
    pub inline_type: Option<SimpleType>,
    pub use_: AttributeUse,
    pub default: Option<String>,
    pub fixed: Option<String>,
    pub annotation: Option<Annotation>,
    pub unhandled_attributes: Vec<(String, String)>,
}

impl Attribute {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            inline_type: None,
            use_: AttributeUse::Optional,
            default: None,
            fixed: None,
            annotation: None,
            unhandled_attributes: Vec::new(),
        }
    }

    pub fn with_type(mut self, type_name: QName) -> Self {
        self.type_name = Some(type_name);
        self
    }

    pub fn required(mut self) -> Self {
        self.use_ = AttributeUse::Required;
        self
    }
}

/// An anonymous inline type on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDef {
    Simple(SimpleType),
    Complex(ComplexType),
}

/// A simple type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleType {
    /// Present on global declarations, absent on inline ones.
    pub name: Option<String>,
    pub content: SimpleContent,
}

impl SimpleType {
    /// An anonymous restriction of a named base type.
    pub fn restriction(base: QName, facets: Vec<Facet>) -> Self {
        Self {
            name: None,
            content: SimpleContent::Restriction(Restriction {
                base: Some(base),
                base_inline: None,
                facets,
            }),
        }
    }
}

/// The derivation body of a simple type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimpleContent {
    Restriction(Restriction),
    List {
        item_type: Option<QName>,
        inline: Option<Box<SimpleType>>,
        location: Option<Location>,
    },
    /// Unions have no lossless JSON mapping and are always rejected.
    Union {
        member_types: Vec<QName>,
        location: Option<Location>,
    },
}

/// A facet-bearing restriction of a base type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    /// Named base type; mapped to an `allOf` pair on the JSON side.
    pub base: Option<QName>,
    /// Anonymous inline base; merged directly onto the target schema.
    pub base_inline: Option<Box<SimpleType>>,
    pub facets: Vec<Facet>,
}

/// A single restriction facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub kind: FacetKind,
    pub value: Option<String>,
}

impl Facet {
    pub fn new(kind: FacetKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }
}

/// The closed set of recognized facet kinds. The converters match on
/// this exhaustively, so an unmapped facet cannot slip through at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacetKind {
    Enumeration,
    FractionDigits,
    Length,
    MaxExclusive,
    MaxInclusive,
    MaxLength,
    MinExclusive,
    MinInclusive,
    MinLength,
    TotalDigits,
    Pattern,
    WhiteSpace,
}

/// A complex type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexType {
    pub name: Option<String>,
    /// The content-model particle; `None` means no element content.
    pub particle: Option<Group>,
    pub attributes: Vec<Attribute>,
    /// simpleContent / complexContent derivation. Carried for model
    /// fidelity; both converters reject it.
    pub content: Option<ContentModel>,
}

impl ComplexType {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            particle: None,
            attributes: Vec::new(),
            content: None,
        }
    }
}

/// simpleContent / complexContent wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentModel {
    SimpleContent(ContentDerivation),
    ComplexContent(ContentDerivation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentDerivation {
    Extension { base: QName },
    Restriction { base: QName },
}

/// A structural container: sequence, choice or all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub kind: Compositor,
    pub particles: Vec<Particle>,
    pub occurs: Occurs,
}

impl Group {
    pub fn new(kind: Compositor) -> Self {
        Self {
            kind,
            particles: Vec::new(),
            occurs: Occurs::default(),
        }
    }
}

/// The container kind tag, carried through JSON as `XsdStructure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compositor {
    Sequence,
    Choice,
    All,
}

impl Compositor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compositor::Sequence => "sequence",
            Compositor::Choice => "choice",
            Compositor::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sequence" => Some(Compositor::Sequence),
            "choice" => Some(Compositor::Choice),
            "all" => Some(Compositor::All),
            _ => None,
        }
    }
}

/// A member of a content-model container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Particle {
    Element(Element),
    /// A nested container. No JSON mapping; rejected.
    Group(Group),
    /// A reference to a named group. No JSON mapping; rejected.
    GroupRef { name: QName },
    /// `<xs:any>` wildcard. No JSON mapping; rejected.
    Any { location: Option<Location> },
}

/// A named global group definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedGroup {
    pub name: String,
    pub group: Group,
}

/// A named global attribute group definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeGroup {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// `<xs:anyAttribute>` wildcard. No JSON mapping; rejected.
    pub any_attribute: bool,
}

/// An `<xs:annotation>` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub items: Vec<AnnotationItem>,
}

impl Annotation {
    pub fn documentation(content: DocContent) -> Self {
        Self {
            items: vec![AnnotationItem::Documentation(content)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationItem {
    /// `<xs:appinfo>` raw markup.
    AppInfo(String),
    Documentation(DocContent),
}

/// The body of an `<xs:documentation>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocContent {
    /// Arbitrary markup, imported as a string blob.
    Raw(String),
    /// The SERES metadata shape: `<xs:attribute name=".." fixed="..">`
    /// children, mapped to the `Info` keyword at the schema root.
    FixedAttributes(Vec<(String, Option<String>)>),
}
