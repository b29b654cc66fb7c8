//! The shape graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shape::{Shape, ShapeId, ShapeType, Trait, TraitKind};

/// Errors raised while reading the shape graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("shape `{0}` is not defined in the model")]
    UnknownShape(ShapeId),

    #[error("invalid shape id: {0}")]
    InvalidShapeId(String),

    #[error("expected `{shape}` to be a {expected}, got {got}")]
    UnexpectedShapeType {
        shape: ShapeId,
        expected: &'static str,
        got: &'static str,
    },
}

/// A member to be created alongside its container.
#[derive(Debug, Clone)]
pub struct MemberDef {
    pub name: String,
    pub target: ShapeId,
    pub traits: Vec<Trait>,
}

impl MemberDef {
    pub fn new(name: impl Into<String>, target: ShapeId) -> Self {
        Self {
            name: name.into(),
            target,
            traits: Vec::new(),
        }
    }

    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.push(t);
        self
    }
}

/// Kinds of shapes that own an arbitrary list of named members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Structure,
    Union,
    IntEnum,
}

/// A read-only graph of shapes keyed by id.
///
/// Shapes are stored in id order so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape, replacing any shape with the same id.
    pub fn add(&mut self, shape: Shape) -> &mut Self {
        self.shapes.insert(shape.id().clone(), shape);
        self
    }

    /// Insert a structure, union or int enum together with its member shapes.
    pub fn add_aggregate(
        &mut self,
        kind: AggregateKind,
        id: ShapeId,
        traits: Vec<Trait>,
        members: Vec<MemberDef>,
    ) -> &mut Self {
        let member_ids: Vec<ShapeId> = members.iter().map(|m| id.with_member(&m.name)).collect();
        for (member, member_id) in members.into_iter().zip(&member_ids) {
            self.add_member(&id, member_id.clone(), member.target, member.traits);
        }
        let shape_type = match kind {
            AggregateKind::Structure => ShapeType::Structure {
                members: member_ids,
            },
            AggregateKind::Union => ShapeType::Union {
                members: member_ids,
            },
            AggregateKind::IntEnum => ShapeType::IntEnum {
                members: member_ids,
            },
        };
        self.add(Shape::new(id, shape_type).with_traits(traits))
    }

    pub fn add_structure(
        &mut self,
        id: ShapeId,
        traits: Vec<Trait>,
        members: Vec<MemberDef>,
    ) -> &mut Self {
        self.add_aggregate(AggregateKind::Structure, id, traits, members)
    }

    pub fn add_union(&mut self, id: ShapeId, traits: Vec<Trait>, members: Vec<MemberDef>) -> &mut Self {
        self.add_aggregate(AggregateKind::Union, id, traits, members)
    }

    /// Insert a list whose `member` targets `target`.
    pub fn add_list(&mut self, id: ShapeId, target: ShapeId, traits: Vec<Trait>) -> &mut Self {
        let member = id.with_member("member");
        self.add_member(&id, member.clone(), target, Vec::new());
        self.add(Shape::new(id, ShapeType::List { member }).with_traits(traits))
    }

    /// Insert a map with `key` and `value` members.
    pub fn add_map(
        &mut self,
        id: ShapeId,
        key: ShapeId,
        value: ShapeId,
        traits: Vec<Trait>,
    ) -> &mut Self {
        let key_id = id.with_member("key");
        let value_id = id.with_member("value");
        self.add_member(&id, key_id.clone(), key, Vec::new());
        self.add_member(&id, value_id.clone(), value, Vec::new());
        self.add(
            Shape::new(
                id,
                ShapeType::Map {
                    key: key_id,
                    value: value_id,
                },
            )
            .with_traits(traits),
        )
    }

    fn add_member(&mut self, container: &ShapeId, id: ShapeId, target: ShapeId, traits: Vec<Trait>) {
        let shape = Shape::new(
            id,
            ShapeType::Member {
                container: container.clone(),
                target,
            },
        );
        self.add(shape.with_traits(traits));
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn expect_shape(&self, id: &ShapeId) -> Result<&Shape, ModelError> {
        self.get(id)
            .ok_or_else(|| ModelError::UnknownShape(id.clone()))
    }

    /// All shapes in id order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Direct member shapes of `shape`, in declaration order.
    pub fn members(&self, shape: &Shape) -> Result<Vec<&Shape>, ModelError> {
        shape
            .member_ids()
            .into_iter()
            .map(|id| self.expect_shape(id))
            .collect()
    }

    /// The shape a member points at.
    pub fn target(&self, member: &Shape) -> Result<&Shape, ModelError> {
        match member.shape_type() {
            ShapeType::Member { target, .. } => self.expect_shape(target),
            other => Err(ModelError::UnexpectedShapeType {
                shape: member.id().clone(),
                expected: "member",
                got: other.kind_name(),
            }),
        }
    }

    /// The shape that owns a member.
    pub fn container(&self, member: &Shape) -> Result<&Shape, ModelError> {
        match member.shape_type() {
            ShapeType::Member { container, .. } => self.expect_shape(container),
            other => Err(ModelError::UnexpectedShapeType {
                shape: member.id().clone(),
                expected: "member",
                got: other.kind_name(),
            }),
        }
    }

    /// Look a trait up on a member, falling back to the member's target.
    pub fn member_trait<'a>(
        &'a self,
        member: &'a Shape,
        kind: TraitKind,
    ) -> Result<Option<&'a Trait>, ModelError> {
        if let Some(t) = member.get_trait(kind) {
            return Ok(Some(t));
        }
        Ok(self.target(member)?.get_trait(kind))
    }

    /// Whether a member carries a streaming payload.
    pub fn is_streaming(&self, member: &Shape) -> Result<bool, ModelError> {
        Ok(self.member_trait(member, TraitKind::Streaming)?.is_some())
    }
}
