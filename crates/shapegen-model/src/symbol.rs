//! Symbol resolution: mapping shapes to Rust types.
//!
//! The [`SymbolProvider`] trait is the contract code generation consumes;
//! [`DefaultSymbolProvider`] is a straightforward implementation that is good
//! enough to drive metadata derivation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Model, ModelError};
use crate::shape::{NumberType, Shape, ShapeType, TraitKind};

/// Name of the wrapper for the receiving end of an event stream.
pub const EVENT_RECEIVER: &str = "EventReceiver";
/// Name of the wrapper for the sending end of an event stream.
pub const EVENT_STREAM_SENDER: &str = "EventStreamSender";

/// A resolved Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RustType {
    Bool,
    String,
    Integer(u8),
    Float(u8),
    Vec(Box<RustType>),
    HashMap(Box<RustType>, Box<RustType>),
    Option(Box<RustType>),
    /// A named type, optionally qualified by a module path.
    Opaque {
        name: String,
        namespace: Option<String>,
    },
    /// A generic type applied to arguments, e.g. `EventReceiver<Event, EventError>`.
    Application {
        ty: Box<RustType>,
        args: Vec<RustType>,
    },
}

impl RustType {
    pub fn opaque_in(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        RustType::Opaque {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// The unqualified type name, if this type has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            RustType::Opaque { name, .. } => Some(name),
            RustType::Application { ty, .. } => ty.name(),
            _ => None,
        }
    }

    /// Whether this is a generic application of the type named `name`.
    ///
    /// Wrappers such as `Option` are not looked through.
    pub fn is_application_of(&self, name: &str) -> bool {
        matches!(self, RustType::Application { ty, .. } if ty.name() == Some(name))
    }
}

impl fmt::Display for RustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustType::Bool => write!(f, "bool"),
            RustType::String => write!(f, "::std::string::String"),
            RustType::Integer(bits) => write!(f, "i{}", bits),
            RustType::Float(bits) => write!(f, "f{}", bits),
            RustType::Vec(inner) => write!(f, "::std::vec::Vec<{}>", inner),
            RustType::HashMap(k, v) => write!(f, "::std::collections::HashMap<{}, {}>", k, v),
            RustType::Option(inner) => write!(f, "::std::option::Option<{}>", inner),
            RustType::Opaque { name, namespace } => match namespace {
                Some(ns) => write!(f, "{}::{}", ns, name),
                None => write!(f, "{}", name),
            },
            RustType::Application { ty, args } => {
                write!(f, "{}<", ty)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
        }
    }
}

/// The resolved representation of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub namespace: Option<String>,
    pub rust_type: RustType,
}

impl Symbol {
    pub fn rust_type(&self) -> &RustType {
        &self.rust_type
    }
}

/// Maps shapes to symbols.
///
/// The model is assumed valid. In particular a list or map must not reach
/// itself through collection targets alone: resolving such a shape recurses
/// without bound.
pub trait SymbolProvider: Send + Sync {
    /// The model symbols are resolved against.
    fn model(&self) -> &Model;

    /// Resolve `shape` to its symbol.
    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, ModelError>;
}

/// Reference [`SymbolProvider`] producing plain Rust types.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSymbolProvider<'a> {
    model: &'a Model,
    module: &'a str,
}

impl<'a> DefaultSymbolProvider<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            module: "crate::types",
        }
    }

    fn named(&self, shape: &Shape) -> RustType {
        RustType::opaque_in(shape.id().name(), self.module)
    }

    fn member_type(&self, member: &Shape) -> Result<RustType, ModelError> {
        let target = self.model.target(member)?;
        if let ShapeType::Union { .. } = target.shape_type()
            && target.has_trait(TraitKind::Streaming)
        {
            let container = self.model.container(member)?;
            let wrapper = if container.has_trait(TraitKind::Input) {
                EVENT_STREAM_SENDER
            } else {
                EVENT_RECEIVER
            };
            tracing::trace!(member = %member.id(), wrapper, "resolved event stream member");
            return Ok(RustType::Application {
                ty: Box::new(RustType::opaque_in(wrapper, "crate::event_stream")),
                args: vec![
                    self.named(target),
                    RustType::opaque_in(format!("{}Error", target.id().name()), self.module),
                ],
            });
        }

        let inner = self.shape_type(target)?;
        let required = self
            .model
            .member_trait(member, TraitKind::Required)?
            .is_some();
        // Streaming blobs are never optional: an absent body is an empty stream.
        if required || self.model.is_streaming(member)? {
            Ok(inner)
        } else {
            Ok(RustType::Option(Box::new(inner)))
        }
    }

    fn shape_type(&self, shape: &Shape) -> Result<RustType, ModelError> {
        Ok(match shape.shape_type() {
            ShapeType::Blob if shape.has_trait(TraitKind::Streaming) => {
                RustType::opaque_in("ByteStream", "crate::primitives")
            }
            ShapeType::Blob => RustType::opaque_in("Blob", "crate::primitives"),
            ShapeType::Boolean => RustType::Bool,
            ShapeType::String if shape.is_string_enum() => self.named(shape),
            ShapeType::String => RustType::String,
            ShapeType::Number(n) => number_type(*n),
            ShapeType::Timestamp => RustType::opaque_in("DateTime", "crate::primitives"),
            ShapeType::Document => RustType::opaque_in("Document", "crate::primitives"),
            ShapeType::List { member } => {
                let member = self.model.expect_shape(member)?;
                RustType::Vec(Box::new(self.shape_type(self.model.target(member)?)?))
            }
            ShapeType::Map { value, .. } => {
                let value = self.model.expect_shape(value)?;
                RustType::HashMap(
                    Box::new(RustType::String),
                    Box::new(self.shape_type(self.model.target(value)?)?),
                )
            }
            ShapeType::Member { .. } => self.member_type(shape)?,
            ShapeType::IntEnum { .. }
            | ShapeType::Structure { .. }
            | ShapeType::Union { .. }
            | ShapeType::Operation
            | ShapeType::Service => self.named(shape),
        })
    }
}

fn number_type(n: NumberType) -> RustType {
    match n {
        NumberType::Byte => RustType::Integer(8),
        NumberType::Short => RustType::Integer(16),
        NumberType::Integer => RustType::Integer(32),
        NumberType::Long => RustType::Integer(64),
        NumberType::Float => RustType::Float(32),
        NumberType::Double => RustType::Float(64),
        NumberType::BigInteger => RustType::opaque_in("BigInteger", "crate::primitives"),
        NumberType::BigDecimal => RustType::opaque_in("BigDecimal", "crate::primitives"),
    }
}

impl SymbolProvider for DefaultSymbolProvider<'_> {
    fn model(&self) -> &Model {
        self.model
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, ModelError> {
        let rust_type = self.shape_type(shape)?;
        let name = match shape.id().member() {
            Some(member) => member.to_string(),
            None => shape.id().name().to_string(),
        };
        Ok(Symbol {
            name,
            namespace: Some(self.module.to_string()),
            rust_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemberDef;
    use crate::shape::{ShapeId, Trait};

    fn id(name: &str) -> ShapeId {
        ShapeId::new("com.example", name)
    }

    fn event_model() -> Model {
        let mut model = Model::new();
        model.add(Shape::new(id("Chunk"), ShapeType::Blob));
        model.add_union(
            id("Events"),
            vec![Trait::Streaming],
            vec![MemberDef::new("chunk", id("Chunk"))],
        );
        model.add_structure(
            id("PublishInput"),
            vec![Trait::Input],
            vec![MemberDef::new("events", id("Events"))],
        );
        model.add_structure(
            id("SubscribeOutput"),
            vec![Trait::Output],
            vec![MemberDef::new("events", id("Events"))],
        );
        model
    }

    #[test]
    fn input_event_stream_is_sender() {
        let model = event_model();
        let provider = DefaultSymbolProvider::new(&model);
        let member = model
            .expect_shape(&id("PublishInput").with_member("events"))
            .unwrap();
        let symbol = provider.to_symbol(member).unwrap();
        assert!(symbol.rust_type().is_application_of(EVENT_STREAM_SENDER));
        assert!(!symbol.rust_type().is_application_of(EVENT_RECEIVER));
        assert_eq!(
            symbol.rust_type().to_string(),
            "crate::event_stream::EventStreamSender<crate::types::Events, crate::types::EventsError>"
        );
    }

    #[test]
    fn output_event_stream_is_receiver() {
        let model = event_model();
        let provider = DefaultSymbolProvider::new(&model);
        let member = model
            .expect_shape(&id("SubscribeOutput").with_member("events"))
            .unwrap();
        let symbol = provider.to_symbol(member).unwrap();
        assert!(symbol.rust_type().is_application_of(EVENT_RECEIVER));
    }

    #[test]
    fn optional_members_are_wrapped() {
        let mut model = Model::new();
        model.add(Shape::new(id("Name"), ShapeType::String));
        model.add_structure(
            id("User"),
            vec![],
            vec![
                MemberDef::new("name", id("Name")).with_trait(Trait::Required),
                MemberDef::new("nickname", id("Name")),
            ],
        );
        let provider = DefaultSymbolProvider::new(&model);
        let name = model.expect_shape(&id("User").with_member("name")).unwrap();
        let nickname = model
            .expect_shape(&id("User").with_member("nickname"))
            .unwrap();
        assert_eq!(provider.to_symbol(name).unwrap().rust_type, RustType::String);
        assert_eq!(
            provider.to_symbol(nickname).unwrap().rust_type,
            RustType::Option(Box::new(RustType::String))
        );
    }

    #[test]
    fn streaming_blob_is_byte_stream() {
        let mut model = Model::new();
        model.add(Shape::new(id("Body"), ShapeType::Blob).with_trait(Trait::Streaming));
        let provider = DefaultSymbolProvider::new(&model);
        let body = model.expect_shape(&id("Body")).unwrap();
        assert_eq!(
            provider.to_symbol(body).unwrap().rust_type.name(),
            Some("ByteStream")
        );
    }
}
