//! Closed node and edge kind tags.

use core::fmt;

/// Subtype of a stratigraphic unit.
///
/// Every subtype is a stratigraphic node for inference and ontology purposes;
/// the subtype only changes the exported `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum UnitType {
    /// Physical stratigraphic unit.
    #[default]
    Us,
    /// Virtual structural unit (reconstruction).
    UsVs,
    /// Virtual non-structural unit.
    UsVn,
    /// Virtual special find.
    Vsf,
    /// Special find.
    Sf,
    /// Documentary unit.
    Usd,
    /// Series of stratigraphic units.
    SerSu,
    /// Series of virtual non-structural units.
    SerUsVn,
    /// Series of virtual structural units.
    SerUsVs,
    /// Transformation unit.
    Tsu,
    /// Working (layer) unit.
    Ul,
}

impl UnitType {
    pub const ALL: [UnitType; 11] = [
        UnitType::Us,
        UnitType::UsVs,
        UnitType::UsVn,
        UnitType::Vsf,
        UnitType::Sf,
        UnitType::Usd,
        UnitType::SerSu,
        UnitType::SerUsVn,
        UnitType::SerUsVs,
        UnitType::Tsu,
        UnitType::Ul,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Us => "US",
            UnitType::UsVs => "USVs",
            UnitType::UsVn => "USVn",
            UnitType::Vsf => "VSF",
            UnitType::Sf => "SF",
            UnitType::Usd => "USD",
            UnitType::SerSu => "serSU",
            UnitType::SerUsVn => "serUSVn",
            UnitType::SerUsVs => "serUSVs",
            UnitType::Tsu => "TSU",
            UnitType::Ul => "UL",
        }
    }

    /// Parse a unit tag. `stratigraphic` is accepted as an alias of `US`.
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == "stratigraphic" {
            return Some(UnitType::Us);
        }
        Self::ALL.into_iter().find(|u| u.as_str() == tag)
    }
}

/// Kind tag of a node.
///
/// Built-in kinds form a closed set; anything else is carried as `Custom`
/// and resolved against the `TypeRegistry` extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    GeoPosition,
    Epoch,
    Property,
    Shift,
    Stratigraphic(UnitType),
    Combiner,
    Extractor,
    Document,
    Custom(String),
}

impl NodeKind {
    /// Built-in family tags, in ontology-table order.
    pub const FAMILIES: [&'static str; 8] = [
        "geo_position",
        "epoch",
        "stratigraphic",
        "property",
        "combiner",
        "extractor",
        "document",
        "shift",
    ];

    /// Tag written to the export document's `type` field.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::GeoPosition => "geo_position",
            NodeKind::Epoch => "epoch",
            NodeKind::Property => "property",
            NodeKind::Shift => "shift",
            NodeKind::Stratigraphic(unit) => unit.as_str(),
            NodeKind::Combiner => "combiner",
            NodeKind::Extractor => "extractor",
            NodeKind::Document => "document",
            NodeKind::Custom(tag) => tag,
        }
    }

    /// Family tag used for the ontology lookup. Stratigraphic subtypes
    /// collapse onto `stratigraphic`.
    pub fn family(&self) -> &str {
        match self {
            NodeKind::Stratigraphic(_) => "stratigraphic",
            other => other.as_str(),
        }
    }

    /// Parse a kind tag; unknown tags become `Custom`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "geo_position" => NodeKind::GeoPosition,
            "epoch" => NodeKind::Epoch,
            "property" => NodeKind::Property,
            "shift" => NodeKind::Shift,
            "combiner" => NodeKind::Combiner,
            "extractor" => NodeKind::Extractor,
            "document" => NodeKind::Document,
            other => match UnitType::parse(other) {
                Some(unit) => NodeKind::Stratigraphic(unit),
                None => NodeKind::Custom(other.to_string()),
            },
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, NodeKind::Custom(_))
    }

    pub fn is_stratigraphic(&self) -> bool {
        matches!(self, NodeKind::Stratigraphic(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual edge style, which carries the relationship semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Stratigraphic sequence / time-span relation.
    Line,
    /// Provenance (node -> property).
    Dashed,
    /// Temporal change.
    Dotted,
    /// Contemporaneity.
    DoubleLine,
    /// Conflicting hypotheses.
    DashedDotted,
    /// Placeholder for any kind the importer did not recognise.
    Tbd,
}

impl EdgeKind {
    /// All kinds in export bucket order.
    pub const ALL: [EdgeKind; 6] = [
        EdgeKind::Line,
        EdgeKind::Dashed,
        EdgeKind::Dotted,
        EdgeKind::DoubleLine,
        EdgeKind::DashedDotted,
        EdgeKind::Tbd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Line => "line",
            EdgeKind::Dashed => "dashed",
            EdgeKind::Dotted => "dotted",
            EdgeKind::DoubleLine => "double_line",
            EdgeKind::DashedDotted => "dashed_dotted",
            EdgeKind::Tbd => "TBD",
        }
    }

    /// Exact match against the six recognised tags.
    pub fn recognize(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// Parse an importer-supplied tag, coercing anything unrecognised to `Tbd`.
    pub fn parse(tag: &str) -> Self {
        Self::recognize(tag).unwrap_or(EdgeKind::Tbd)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
