//! Node entity and kind-specific payloads.

use serde_json::{Map, Value};
use sg_core::locale::split_locale_key;
use sg_core::{
    Band, LocalizedText, NodeId, NodeKind, Real, SgError, SgResult, TypeRegistry, UnitType,
};

/// Georeferencing of the scene. At most one per graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPosition {
    pub epsg: i64,
    pub shift_x: Real,
    pub shift_y: Real,
    pub shift_z: Real,
}

/// Named period with an absolute time range and a band on the layout axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Epoch {
    /// Vertical band in layout coordinates.
    pub min: Real,
    pub max: Real,
    /// Absolute time range.
    pub start: Real,
    pub end: Real,
    pub color: String,
}

impl Epoch {
    pub fn band(&self) -> Band {
        Band::new(self.min, self.max)
    }

    /// Width of the vertical band; smaller is more specific.
    pub fn span(&self) -> Real {
        self.band().width()
    }
}

/// Qualifying metadata attached to another node through an edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Property {
    pub description: LocalizedText,
    pub author: String,
    pub time_start: Option<Real>,
    pub time_end: Option<Real>,
    pub url: Option<String>,
}

/// Coordinate shift applied to a sub-scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub shift_x: Real,
    pub shift_y: Real,
    pub shift_z: Real,
}

/// Stratigraphic unit (US and its subtypes).
#[derive(Debug, Clone, PartialEq)]
pub struct Stratigraphic {
    pub unit: UnitType,
    pub description: LocalizedText,
    pub url: Option<String>,
    /// Placement on the layout axis, matched against epoch bands.
    pub rel_time: Real,
}

/// Logical inference over other nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Combiner {
    pub author: String,
    pub description: LocalizedText,
}

/// Data-extraction source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extractor {
    pub description: LocalizedText,
    pub url: String,
    pub icon: bool,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub description: LocalizedText,
    pub url: String,
    pub url_type: String,
}

/// Kind tag plus kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    GeoPosition(GeoPosition),
    Epoch(Epoch),
    Property(Property),
    Shift(Shift),
    Stratigraphic(Stratigraphic),
    Combiner(Combiner),
    Extractor(Extractor),
    Document(Document),
    /// Registry extension kind; attributes are kept as supplied.
    Custom {
        tag: String,
        attributes: Map<String, Value>,
    },
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::GeoPosition(_) => NodeKind::GeoPosition,
            NodePayload::Epoch(_) => NodeKind::Epoch,
            NodePayload::Property(_) => NodeKind::Property,
            NodePayload::Shift(_) => NodeKind::Shift,
            NodePayload::Stratigraphic(s) => NodeKind::Stratigraphic(s.unit),
            NodePayload::Combiner(_) => NodeKind::Combiner,
            NodePayload::Extractor(_) => NodeKind::Extractor,
            NodePayload::Document(_) => NodeKind::Document,
            NodePayload::Custom { tag, .. } => NodeKind::Custom(tag.clone()),
        }
    }

    /// Build a payload from an importer's attribute mapping.
    ///
    /// Numeric fields are mandatory; free-text fields default to empty.
    /// Extension kinds must carry the fields their registration requires.
    pub fn from_attributes(
        kind: &NodeKind,
        attributes: &Map<String, Value>,
        types: &TypeRegistry,
    ) -> SgResult<Self> {
        let a = Attrs {
            kind: kind.as_str(),
            map: attributes,
        };
        let payload = match kind {
            NodeKind::GeoPosition => NodePayload::GeoPosition(GeoPosition {
                epsg: a.int("epsg")?,
                shift_x: a.real("shift_x")?,
                shift_y: a.real("shift_y")?,
                shift_z: a.real("shift_z")?,
            }),
            NodeKind::Epoch => NodePayload::Epoch(Epoch {
                min: a.real("min")?,
                max: a.real("max")?,
                start: a.real("start")?,
                end: a.real("end")?,
                color: a.required_string("color")?,
            }),
            NodeKind::Property => NodePayload::Property(Property {
                description: a.text("description"),
                author: a.string("author")?.unwrap_or_default(),
                time_start: a.opt_real("time_start")?,
                time_end: a.opt_real("time_end")?,
                url: a.string("url")?,
            }),
            NodeKind::Shift => NodePayload::Shift(Shift {
                shift_x: a.real("shift_x")?,
                shift_y: a.real("shift_y")?,
                shift_z: a.real("shift_z")?,
            }),
            NodeKind::Stratigraphic(unit) => NodePayload::Stratigraphic(Stratigraphic {
                unit: *unit,
                description: a.text("description"),
                url: a.string("url")?,
                rel_time: a.real("rel_time")?,
            }),
            NodeKind::Combiner => NodePayload::Combiner(Combiner {
                author: a.string("author")?.unwrap_or_default(),
                description: a.text("description"),
            }),
            NodeKind::Extractor => NodePayload::Extractor(Extractor {
                description: a.text("description"),
                url: a.string("url")?.unwrap_or_default(),
                icon: a.flag("icon")?,
                src: a.string("src")?.unwrap_or_default(),
            }),
            NodeKind::Document => NodePayload::Document(Document {
                description: a.text("description"),
                url: a.string("url")?.unwrap_or_default(),
                url_type: a.string("url_type")?.unwrap_or_default(),
            }),
            NodeKind::Custom(tag) => {
                if let Some(ext) = types.extension(tag) {
                    for field in &ext.required_fields {
                        if !attributes.contains_key(field) {
                            return Err(SgError::MissingField {
                                kind: tag.clone(),
                                field: field.clone(),
                            });
                        }
                    }
                }
                NodePayload::Custom {
                    tag: tag.clone(),
                    attributes: attributes.clone(),
                }
            }
        };
        Ok(payload)
    }

    /// Attribute object written to the export document's `data` field.
    pub fn to_data(&self) -> Map<String, Value> {
        let mut out = Map::new();
        match self {
            NodePayload::GeoPosition(g) => {
                out.insert("epsg".into(), g.epsg.into());
                put_real(&mut out, "shift_x", g.shift_x);
                put_real(&mut out, "shift_y", g.shift_y);
                put_real(&mut out, "shift_z", g.shift_z);
            }
            NodePayload::Epoch(e) => {
                put_real(&mut out, "min", e.min);
                put_real(&mut out, "max", e.max);
                put_real(&mut out, "start", e.start);
                put_real(&mut out, "end", e.end);
                out.insert("color".into(), e.color.clone().into());
            }
            NodePayload::Property(p) => {
                put_text(&mut out, "description", &p.description);
                out.insert("author".into(), p.author.clone().into());
                if let Some(t) = p.time_start {
                    put_real(&mut out, "time_start", t);
                }
                if let Some(t) = p.time_end {
                    put_real(&mut out, "time_end", t);
                }
                if let Some(url) = &p.url {
                    out.insert("url".into(), url.clone().into());
                }
            }
            NodePayload::Shift(s) => {
                put_real(&mut out, "shift_x", s.shift_x);
                put_real(&mut out, "shift_y", s.shift_y);
                put_real(&mut out, "shift_z", s.shift_z);
            }
            NodePayload::Stratigraphic(s) => {
                put_text(&mut out, "description", &s.description);
                if let Some(url) = &s.url {
                    out.insert("url".into(), url.clone().into());
                }
                put_real(&mut out, "rel_time", s.rel_time);
            }
            NodePayload::Combiner(c) => {
                out.insert("author".into(), c.author.clone().into());
                put_text(&mut out, "description", &c.description);
            }
            NodePayload::Extractor(x) => {
                put_text(&mut out, "description", &x.description);
                out.insert("url".into(), x.url.clone().into());
                out.insert("icon".into(), x.icon.into());
                out.insert("src".into(), x.src.clone().into());
            }
            NodePayload::Document(d) => {
                put_text(&mut out, "description", &d.description);
                out.insert("url".into(), d.url.clone().into());
                out.insert("url_type".into(), d.url_type.clone().into());
            }
            NodePayload::Custom { attributes, .. } => {
                out = attributes.clone();
            }
        }
        out
    }

    /// Numeric fields with their names, for integrity checks.
    pub fn numeric_fields(&self) -> Vec<(&'static str, Real)> {
        match self {
            NodePayload::GeoPosition(g) => vec![
                ("shift_x", g.shift_x),
                ("shift_y", g.shift_y),
                ("shift_z", g.shift_z),
            ],
            NodePayload::Epoch(e) => vec![
                ("min", e.min),
                ("max", e.max),
                ("start", e.start),
                ("end", e.end),
            ],
            NodePayload::Property(p) => {
                let mut out = Vec::new();
                if let Some(t) = p.time_start {
                    out.push(("time_start", t));
                }
                if let Some(t) = p.time_end {
                    out.push(("time_end", t));
                }
                out
            }
            NodePayload::Shift(s) => vec![
                ("shift_x", s.shift_x),
                ("shift_y", s.shift_y),
                ("shift_z", s.shift_z),
            ],
            NodePayload::Stratigraphic(s) => vec![("rel_time", s.rel_time)],
            NodePayload::Combiner(_)
            | NodePayload::Extractor(_)
            | NodePayload::Document(_)
            | NodePayload::Custom { .. } => Vec::new(),
        }
    }
}

/// A typed node. Owned by exactly one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Human label, not required to be unique.
    pub name: String,
    pub payload: NodePayload,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, payload: NodePayload) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payload,
        }
    }

    /// Build a node from an importer record.
    pub fn from_record(
        id: impl Into<NodeId>,
        kind_tag: &str,
        name: impl Into<String>,
        attributes: &Map<String, Value>,
        types: &TypeRegistry,
    ) -> SgResult<Self> {
        let kind = NodeKind::parse(kind_tag);
        let payload = NodePayload::from_attributes(&kind, attributes, types)?;
        Ok(Self::new(id, name, payload))
    }

    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    pub fn is_geo_position(&self) -> bool {
        matches!(self.payload, NodePayload::GeoPosition(_))
    }

    pub fn as_epoch(&self) -> Option<&Epoch> {
        match &self.payload {
            NodePayload::Epoch(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.payload {
            NodePayload::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_stratigraphic(&self) -> Option<&Stratigraphic> {
        match &self.payload {
            NodePayload::Stratigraphic(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_geo_position(&self) -> Option<&GeoPosition> {
        match &self.payload {
            NodePayload::GeoPosition(g) => Some(g),
            _ => None,
        }
    }
}

fn put_real(out: &mut Map<String, Value>, key: &str, v: Real) {
    // Non-finite values have no JSON form; integrity validation rejects them first.
    out.insert(
        key.to_string(),
        serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number),
    );
}

fn put_text(out: &mut Map<String, Value>, field: &str, text: &LocalizedText) {
    for (locale, value) in text.iter() {
        out.insert(format!("{field}@{locale}"), value.clone().into());
    }
}

/// Typed reads over an attribute mapping.
struct Attrs<'a> {
    kind: &'a str,
    map: &'a Map<String, Value>,
}

impl Attrs<'_> {
    fn missing(&self, field: &str) -> SgError {
        SgError::MissingField {
            kind: self.kind.to_string(),
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, reason: impl Into<String>) -> SgError {
        SgError::InvalidField {
            kind: self.kind.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Numbers arrive either as JSON numbers or as numeric strings (GraphML data keys).
    fn opt_real(&self, field: &str) -> SgResult<Option<Real>> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "not representable as f64")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<Real>()
                .map(Some)
                .map_err(|e| self.invalid(field, e.to_string())),
            Some(other) => Err(self.invalid(field, format!("expected number, got {other}"))),
        }
    }

    fn real(&self, field: &str) -> SgResult<Real> {
        self.opt_real(field)?.ok_or_else(|| self.missing(field))
    }

    fn int(&self, field: &str) -> SgResult<i64> {
        match self.map.get(field) {
            None | Some(Value::Null) => Err(self.missing(field)),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| self.invalid(field, "expected integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| self.invalid(field, e.to_string())),
            Some(other) => Err(self.invalid(field, format!("expected integer, got {other}"))),
        }
    }

    fn string(&self, field: &str) -> SgResult<Option<String>> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(self.invalid(field, format!("expected string, got {other}"))),
        }
    }

    fn required_string(&self, field: &str) -> SgResult<String> {
        self.string(field)?.ok_or_else(|| self.missing(field))
    }

    fn flag(&self, field: &str) -> SgResult<bool> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                other => Err(self.invalid(field, format!("not a flag: {other}"))),
            },
            Some(other) => Err(self.invalid(field, format!("expected bool, got {other}"))),
        }
    }

    /// Collect `field` and `field@locale` entries into one localized value.
    fn text(&self, field: &str) -> LocalizedText {
        let mut out = LocalizedText::new();
        for (key, value) in self.map {
            let (name, locale) = split_locale_key(key);
            if name != field {
                continue;
            }
            if let Value::String(s) = value {
                out.set(locale, s.clone());
            }
        }
        out
    }
}
