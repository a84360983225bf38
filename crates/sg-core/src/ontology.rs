//! Mapping from graph element kinds onto cultural-heritage ontology terms.
//!
//! The built-in correspondence is a static table; `TypeRegistry` adds
//! registry-driven extensions on top of it. Lookups are total: anything
//! neither table knows maps to `OntologyTerm::Custom`.

use crate::error::{SgError, SgResult};
use crate::kinds::{EdgeKind, NodeKind};

/// Ontology class a node kind maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyClass {
    Place,
    TimeSpan,
    Period,
    DegreeOfConfidence,
    PhysicalManMadeThing,
    Event,
    Document,
}

impl OntologyClass {
    pub fn label(self) -> &'static str {
        match self {
            OntologyClass::Place => "Place",
            OntologyClass::TimeSpan => "Time-Span",
            OntologyClass::Period => "Period",
            OntologyClass::DegreeOfConfidence => "Degree-of-Confidence",
            OntologyClass::PhysicalManMadeThing => "Physical-Man-Made-Thing",
            OntologyClass::Event => "Event",
            OntologyClass::Document => "Document",
        }
    }

    pub const ALL: [OntologyClass; 7] = [
        OntologyClass::Place,
        OntologyClass::TimeSpan,
        OntologyClass::Period,
        OntologyClass::DegreeOfConfidence,
        OntologyClass::PhysicalManMadeThing,
        OntologyClass::Event,
        OntologyClass::Document,
    ];

    /// Look a class up by label (`Time-Span`) or code (`E52`).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.code() == Some(s))
    }

    /// CIDOC-CRM class code, when the class has one.
    pub fn code(self) -> Option<&'static str> {
        match self {
            OntologyClass::Place => Some("E53"),
            OntologyClass::TimeSpan => Some("E52"),
            OntologyClass::Period => Some("E4"),
            OntologyClass::DegreeOfConfidence => None,
            OntologyClass::PhysicalManMadeThing => Some("E24"),
            OntologyClass::Event => Some("E5"),
            OntologyClass::Document => Some("E31"),
        }
    }
}

/// Ontology relationship an edge kind maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyRelation {
    HasTimeSpan,
    HasModifier,
    IsIdentifiedBy,
    IsComposedOf,
    HasType,
}

impl OntologyRelation {
    pub fn label(self) -> &'static str {
        match self {
            OntologyRelation::HasTimeSpan => "has-time-span",
            OntologyRelation::HasModifier => "has-modifier",
            OntologyRelation::IsIdentifiedBy => "is-identified-by",
            OntologyRelation::IsComposedOf => "is-composed-of",
            OntologyRelation::HasType => "has-type",
        }
    }

    /// CIDOC-CRM property code, when the relationship has one.
    pub fn code(self) -> Option<&'static str> {
        match self {
            OntologyRelation::HasTimeSpan => Some("P4"),
            OntologyRelation::HasModifier => None,
            OntologyRelation::IsIdentifiedBy => Some("P1"),
            OntologyRelation::IsComposedOf => Some("P46"),
            OntologyRelation::HasType => Some("P2"),
        }
    }
}

/// Result of an ontology lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyTerm {
    Class {
        class: OntologyClass,
        /// Qualifier distinguishing kinds that share a class (e.g. `shift`).
        modifier: Option<&'static str>,
        /// The class is a local extension rather than a core ontology class.
        custom: bool,
    },
    Relation(OntologyRelation),
    /// Sentinel for kinds with no mapping.
    Custom,
}

impl OntologyTerm {
    pub const fn class(class: OntologyClass) -> Self {
        OntologyTerm::Class {
            class,
            modifier: None,
            custom: false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OntologyTerm::Class { class, .. } => class.label(),
            OntologyTerm::Relation(rel) => rel.label(),
            OntologyTerm::Custom => "Custom",
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            OntologyTerm::Class { class, .. } => class.code(),
            OntologyTerm::Relation(rel) => rel.code(),
            OntologyTerm::Custom => None,
        }
    }

    pub fn modifier(&self) -> Option<&'static str> {
        match self {
            OntologyTerm::Class { modifier, .. } => *modifier,
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        match self {
            OntologyTerm::Class { custom, .. } => *custom,
            OntologyTerm::Relation(_) => false,
            OntologyTerm::Custom => true,
        }
    }
}

/// Built-in node-kind table, keyed by `NodeKind::family()`.
pub const NODE_KIND_TABLE: [(&str, OntologyTerm); 8] = [
    ("geo_position", OntologyTerm::class(OntologyClass::Place)),
    ("epoch", OntologyTerm::class(OntologyClass::TimeSpan)),
    ("stratigraphic", OntologyTerm::class(OntologyClass::Period)),
    (
        "property",
        OntologyTerm::class(OntologyClass::DegreeOfConfidence),
    ),
    (
        "combiner",
        OntologyTerm::Class {
            class: OntologyClass::PhysicalManMadeThing,
            modifier: None,
            custom: true,
        },
    ),
    ("extractor", OntologyTerm::class(OntologyClass::Event)),
    ("document", OntologyTerm::class(OntologyClass::Document)),
    (
        "shift",
        OntologyTerm::Class {
            class: OntologyClass::Place,
            modifier: Some("shift"),
            custom: false,
        },
    ),
];

/// Built-in edge-kind table, in export bucket order.
pub const EDGE_KIND_TABLE: [(EdgeKind, OntologyTerm); 6] = [
    (EdgeKind::Line, OntologyTerm::Relation(OntologyRelation::HasTimeSpan)),
    (EdgeKind::Dashed, OntologyTerm::Relation(OntologyRelation::HasModifier)),
    (
        EdgeKind::Dotted,
        OntologyTerm::Relation(OntologyRelation::IsIdentifiedBy),
    ),
    (
        EdgeKind::DoubleLine,
        OntologyTerm::Relation(OntologyRelation::IsComposedOf),
    ),
    (
        EdgeKind::DashedDotted,
        OntologyTerm::Relation(OntologyRelation::HasType),
    ),
    (EdgeKind::Tbd, OntologyTerm::Custom),
];

/// A node kind registered at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct KindExtension {
    pub tag: String,
    /// Attribute names a node of this kind must carry.
    pub required_fields: Vec<String>,
    pub term: OntologyTerm,
}

impl KindExtension {
    pub fn new(tag: impl Into<String>, term: OntologyTerm) -> Self {
        Self {
            tag: tag.into(),
            required_fields: Vec::new(),
            term,
        }
    }

    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required_fields.push(field.into());
        self
    }
}

/// Node/edge kind registry with the ontology mapping.
///
/// Starts with the built-in kinds; extensions are kept in registration order
/// so the exported context stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    extensions: Vec<KindExtension>,
}

impl TypeRegistry {
    /// Registry with the built-in kinds only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new node kind.
    ///
    /// Built-in tags (including stratigraphic subtypes), edge kind tags and
    /// already registered tags are rejected.
    pub fn register(&mut self, extension: KindExtension) -> SgResult<()> {
        if extension.tag.is_empty() {
            return Err(SgError::InvalidArg {
                what: "node kind tag must not be empty".to_string(),
            });
        }
        // `map` resolves edge tags first, so such a node kind would be unreachable.
        if EdgeKind::recognize(&extension.tag).is_some() {
            return Err(SgError::ReservedKindTag { tag: extension.tag });
        }
        if NodeKind::parse(&extension.tag).is_builtin() || self.extension(&extension.tag).is_some()
        {
            return Err(SgError::KindAlreadyRegistered { tag: extension.tag });
        }
        self.extensions.push(extension);
        Ok(())
    }

    pub fn extension(&self, tag: &str) -> Option<&KindExtension> {
        self.extensions.iter().find(|e| e.tag == tag)
    }

    pub fn extensions(&self) -> &[KindExtension] {
        &self.extensions
    }

    /// Whether the tag names a built-in or registered node kind.
    pub fn is_known_node_kind(&self, tag: &str) -> bool {
        NodeKind::parse(tag).is_builtin() || self.extension(tag).is_some()
    }

    pub fn map_node(&self, kind: &NodeKind) -> OntologyTerm {
        NODE_KIND_TABLE
            .iter()
            .find(|(family, _)| *family == kind.family())
            .map(|(_, term)| *term)
            .or_else(|| self.extension(kind.as_str()).map(|e| e.term))
            .unwrap_or(OntologyTerm::Custom)
    }

    pub fn map_edge(&self, kind: EdgeKind) -> OntologyTerm {
        EDGE_KIND_TABLE
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, term)| *term)
            .unwrap_or(OntologyTerm::Custom)
    }

    /// Map any kind tag (node or edge). Total: unknown tags yield `Custom`.
    pub fn map(&self, tag: &str) -> OntologyTerm {
        match EdgeKind::recognize(tag) {
            Some(kind) => self.map_edge(kind),
            None => self.map_node(&NodeKind::parse(tag)),
        }
    }

    /// Node family tags with their terms: built-ins first, then extensions.
    pub fn node_mappings(&self) -> Vec<(&str, OntologyTerm)> {
        NODE_KIND_TABLE
            .iter()
            .map(|(tag, term)| (*tag, *term))
            .chain(self.extensions.iter().map(|e| (e.tag.as_str(), e.term)))
            .collect()
    }

    pub fn edge_mappings(&self) -> &'static [(EdgeKind, OntologyTerm)] {
        &EDGE_KIND_TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::UnitType;

    #[test]
    fn builtin_node_mapping() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.map("geo_position").label(), "Place");
        assert_eq!(reg.map("epoch").label(), "Time-Span");
        assert_eq!(reg.map("US").label(), "Period");
        assert_eq!(reg.map("USVs").label(), "Period");
        assert_eq!(reg.map("property").label(), "Degree-of-Confidence");
        assert_eq!(reg.map("extractor").code(), Some("E5"));
        assert_eq!(reg.map("document").code(), Some("E31"));

        let combiner = reg.map("combiner");
        assert_eq!(combiner.label(), "Physical-Man-Made-Thing");
        assert!(combiner.is_custom());

        let shift = reg.map("shift");
        assert_eq!(shift.label(), "Place");
        assert_eq!(shift.modifier(), Some("shift"));
    }

    #[test]
    fn builtin_edge_mapping() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.map("line").label(), "has-time-span");
        assert_eq!(reg.map("dashed").label(), "has-modifier");
        assert_eq!(reg.map("dotted").label(), "is-identified-by");
        assert_eq!(reg.map("double_line").label(), "is-composed-of");
        assert_eq!(reg.map("dashed_dotted").label(), "has-type");
        assert_eq!(reg.map("TBD"), OntologyTerm::Custom);
    }

    #[test]
    fn mapping_is_total() {
        let reg = TypeRegistry::new();
        for kind in EdgeKind::ALL {
            let _ = reg.map_edge(kind);
        }
        for unit in UnitType::ALL {
            assert_eq!(
                reg.map_node(&NodeKind::Stratigraphic(unit)),
                OntologyTerm::class(OntologyClass::Period)
            );
        }
        assert_eq!(reg.map("no-such-kind"), OntologyTerm::Custom);
    }

    #[test]
    fn extension_maps_after_registration() {
        let mut reg = TypeRegistry::new();
        assert_eq!(reg.map("author"), OntologyTerm::Custom);

        reg.register(
            KindExtension::new("author", OntologyTerm::class(OntologyClass::Event)).require("orcid"),
        )
        .unwrap();

        assert_eq!(reg.map("author").label(), "Event");
        assert!(reg.is_known_node_kind("author"));
        assert_eq!(reg.extension("author").unwrap().required_fields, vec!["orcid"]);
        assert_eq!(reg.node_mappings().len(), 9);
    }

    #[test]
    fn class_parse_by_label_or_code() {
        assert_eq!(OntologyClass::parse("Time-Span"), Some(OntologyClass::TimeSpan));
        assert_eq!(OntologyClass::parse("event"), Some(OntologyClass::Event));
        assert_eq!(OntologyClass::parse("E31"), Some(OntologyClass::Document));
        assert_eq!(OntologyClass::parse("E99"), None);
    }

    #[test]
    fn register_rejects_builtin_and_duplicate_tags() {
        let mut reg = TypeRegistry::new();
        let err = reg
            .register(KindExtension::new("epoch", OntologyTerm::Custom))
            .unwrap_err();
        assert!(matches!(err, SgError::KindAlreadyRegistered { .. }));

        assert!(reg.register(KindExtension::new("SF", OntologyTerm::Custom)).is_err());

        reg.register(KindExtension::new("author", OntologyTerm::Custom))
            .unwrap();
        assert!(reg.register(KindExtension::new("author", OntologyTerm::Custom)).is_err());
        assert!(reg.register(KindExtension::new("", OntologyTerm::Custom)).is_err());
    }

    #[test]
    fn register_rejects_edge_kind_tags() {
        let mut reg = TypeRegistry::new();
        for kind in EdgeKind::ALL {
            let err = reg
                .register(KindExtension::new(
                    kind.as_str(),
                    OntologyTerm::class(OntologyClass::Event),
                ))
                .unwrap_err();
            assert_eq!(
                err,
                SgError::ReservedKindTag {
                    tag: kind.as_str().to_string()
                }
            );
        }
        assert!(reg.extensions().is_empty());
        assert_eq!(reg.map("line").label(), "has-time-span");
        assert_eq!(reg.map("TBD"), OntologyTerm::Custom);

        // Edge tags match exactly, so a differently cased tag is a new node kind.
        reg.register(KindExtension::new("Line", OntologyTerm::class(OntologyClass::Event)))
            .unwrap();
        assert_eq!(reg.map("Line").label(), "Event");
    }
}
