//! Shapes, shape ids and traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Absolute shape id: `namespace#Name`, or `namespace#Name$member` for members.
///
/// Serialized in its textual form so it can key JSON maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            member: None,
        }
    }

    /// The id of member `member` inside this shape.
    pub fn with_member(&self, member: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.into()),
        }
    }

    /// The id of the shape that owns this member (or `self` for non-members).
    pub fn without_member(&self) -> Self {
        Self::new(self.namespace.clone(), self.name.clone())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${}", member)?;
        }
        Ok(())
    }
}

impl FromStr for ShapeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidShapeId(s.to_string());
        let (namespace, rest) = s.split_once('#').ok_or_else(invalid)?;
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };
        if namespace.is_empty() || name.is_empty() || member.is_some_and(str::is_empty) {
            return Err(invalid());
        }
        let id = ShapeId::new(namespace, name);
        Ok(match member {
            Some(member) => id.with_member(member),
            None => id,
        })
    }
}

impl TryFrom<String> for ShapeId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.to_string()
    }
}

/// Numeric shape flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberType {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
}

impl NumberType {
    /// Whether values of this type have total equality (no NaN).
    pub fn is_integral(self) -> bool {
        !matches!(
            self,
            NumberType::Float | NumberType::Double | NumberType::BigDecimal
        )
    }
}

/// The type of a shape, with its containment edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Blob,
    Boolean,
    String,
    Number(NumberType),
    /// Integer enum; members are the enum values.
    IntEnum { members: Vec<ShapeId> },
    Timestamp,
    Document,
    List { member: ShapeId },
    Map { key: ShapeId, value: ShapeId },
    Structure { members: Vec<ShapeId> },
    Union { members: Vec<ShapeId> },
    /// A named slot inside a container, pointing at its target shape.
    Member { container: ShapeId, target: ShapeId },
    Operation,
    Service,
}

impl ShapeType {
    /// Short lowercase name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::String => "string",
            ShapeType::Number(_) => "number",
            ShapeType::IntEnum { .. } => "intEnum",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Document => "document",
            ShapeType::List { .. } => "list",
            ShapeType::Map { .. } => "map",
            ShapeType::Structure { .. } => "structure",
            ShapeType::Union { .. } => "union",
            ShapeType::Member { .. } => "member",
            ShapeType::Operation => "operation",
            ShapeType::Service => "service",
        }
    }
}

/// A string enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,
    pub name: Option<String>,
}

impl EnumValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
        }
    }
}

/// Model-level markers attached to shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trait {
    /// Values must never be trivially printable.
    Sensitive,
    /// Payload is an unbounded stream (blob) or an event stream (union).
    Streaming,
    /// String shape restricted to a closed set of values.
    Enum(Vec<EnumValue>),
    /// Structure is an operation input.
    Input,
    /// Structure is an operation output.
    Output,
    Required,
    Length { min: Option<u64>, max: Option<u64> },
    Range { min: Option<i64>, max: Option<i64> },
    Pattern(String),
    Documentation(String),
}

/// Discriminant of [`Trait`], used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitKind {
    Sensitive,
    Streaming,
    Enum,
    Input,
    Output,
    Required,
    Length,
    Range,
    Pattern,
    Documentation,
}

impl Trait {
    pub fn kind(&self) -> TraitKind {
        match self {
            Trait::Sensitive => TraitKind::Sensitive,
            Trait::Streaming => TraitKind::Streaming,
            Trait::Enum(_) => TraitKind::Enum,
            Trait::Input => TraitKind::Input,
            Trait::Output => TraitKind::Output,
            Trait::Required => TraitKind::Required,
            Trait::Length { .. } => TraitKind::Length,
            Trait::Range { .. } => TraitKind::Range,
            Trait::Pattern(_) => TraitKind::Pattern,
            Trait::Documentation(_) => TraitKind::Documentation,
        }
    }
}

/// A declaration in the shape graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    shape_type: ShapeType,
    traits: Vec<Trait>,
}

impl Shape {
    pub fn new(id: ShapeId, shape_type: ShapeType) -> Self {
        Self {
            id,
            shape_type,
            traits: Vec::new(),
        }
    }

    /// Attach a trait, replacing any existing trait of the same kind.
    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.retain(|existing| existing.kind() != t.kind());
        self.traits.push(t);
        self
    }

    pub fn with_traits(self, traits: impl IntoIterator<Item = Trait>) -> Self {
        traits.into_iter().fold(self, Shape::with_trait)
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn shape_type(&self) -> &ShapeType {
        &self.shape_type
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn get_trait(&self, kind: TraitKind) -> Option<&Trait> {
        self.traits.iter().find(|t| t.kind() == kind)
    }

    pub fn has_trait(&self, kind: TraitKind) -> bool {
        self.get_trait(kind).is_some()
    }

    /// Ids of the members this shape directly contains.
    pub fn member_ids(&self) -> Vec<&ShapeId> {
        match &self.shape_type {
            ShapeType::Structure { members }
            | ShapeType::Union { members }
            | ShapeType::IntEnum { members } => members.iter().collect(),
            ShapeType::List { member } => vec![member],
            ShapeType::Map { key, value } => vec![key, value],
            _ => Vec::new(),
        }
    }

    /// A string shape carrying the enum trait.
    pub fn is_string_enum(&self) -> bool {
        matches!(self.shape_type, ShapeType::String) && self.has_trait(TraitKind::Enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_id_roundtrips_through_text() {
        let id: ShapeId = "com.example#Order$items".parse().unwrap();
        assert_eq!(id.namespace(), "com.example");
        assert_eq!(id.name(), "Order");
        assert_eq!(id.member(), Some("items"));
        assert_eq!(id.to_string(), "com.example#Order$items");
        assert_eq!(id.without_member().to_string(), "com.example#Order");
    }

    #[test]
    fn shape_id_rejects_malformed_text() {
        for bad in ["Order", "#Order", "com.example#", "com.example#Order$"] {
            assert!(bad.parse::<ShapeId>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn with_trait_replaces_same_kind() {
        let shape = Shape::new(ShapeId::new("ns", "S"), ShapeType::String)
            .with_trait(Trait::Pattern("a+".into()))
            .with_trait(Trait::Pattern("b+".into()));
        assert_eq!(shape.traits(), &[Trait::Pattern("b+".into())]);
    }

    #[test]
    fn string_enum_requires_enum_trait() {
        let plain = Shape::new(ShapeId::new("ns", "S"), ShapeType::String);
        assert!(!plain.is_string_enum());
        let enumerated = plain.with_trait(Trait::Enum(vec![EnumValue::new("a")]));
        assert!(enumerated.is_string_enum());
    }
}
