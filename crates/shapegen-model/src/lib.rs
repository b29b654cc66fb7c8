//! Shape graph and symbol resolution for shapegen.
//!
//! `shapegen-model` holds the read-only inputs of code generation: the
//! [`Model`] (a graph of [`Shape`]s connected by member edges and annotated
//! with [`Trait`]s) and the [`SymbolProvider`] contract that maps a shape to
//! its Rust representation.
//!
//! # Example
//!
//! ```
//! use shapegen_model::{DefaultSymbolProvider, MemberDef, Model, Shape, ShapeId, ShapeType, SymbolProvider, Trait};
//!
//! let mut model = Model::new();
//! let name = ShapeId::new("com.example", "Name");
//! model.add(Shape::new(name.clone(), ShapeType::String));
//! model.add_structure(
//!     ShapeId::new("com.example", "User"),
//!     vec![],
//!     vec![MemberDef::new("name", name).with_trait(Trait::Required)],
//! );
//!
//! let provider = DefaultSymbolProvider::new(&model);
//! let member = model
//!     .expect_shape(&"com.example#User$name".parse().unwrap())
//!     .unwrap();
//! let symbol = provider.to_symbol(member).unwrap();
//! assert_eq!(symbol.rust_type().to_string(), "::std::string::String");
//! ```

pub mod model;
pub mod shape;
pub mod symbol;

pub use model::{AggregateKind, MemberDef, Model, ModelError};
pub use shape::{EnumValue, NumberType, Shape, ShapeId, ShapeType, Trait, TraitKind};
pub use symbol::{
    DefaultSymbolProvider, EVENT_RECEIVER, EVENT_STREAM_SENDER, RustType, Symbol, SymbolProvider,
};
