//! Code generation metadata for shapes.
//!
//! `shapegen-meta` decides, for every declaration of a [`Model`](shapegen_model::Model),
//! which visibility and derives the generated Rust type gets and which
//! feature-gated attributes (serde hooks) are emitted on it. It also runs
//! the extensions that add features, dependencies and `lib.rs` content to the
//! generated crate.
//!
//! # Architecture
//!
//! ```text
//! Shape ──> SymbolProvider ──> Symbol ─┐
//!   │                                  ├─> MetaSymbol / MetadataTable ──> renderers
//!   └────> MetadataEngine ──> MetadataProvider (per-kind rules)
//!                               ├─ BaseMetadataProvider (client / server defaults)
//!                               └─ ConstrainedMetadataProvider (server, wraps base)
//!
//! ExtensionRegistry ──> CrateManifest (features, dependencies) + lib.rs sections
//! ```
//!
//! # Example
//!
//! ```
//! use shapegen_meta::{Derive, MetaConfig, MetadataEngine};
//! use shapegen_model::{DefaultSymbolProvider, MemberDef, Model, Shape, ShapeId, ShapeType, Trait};
//!
//! let mut model = Model::new();
//! let secret = ShapeId::new("com.example", "Password");
//! model.add(Shape::new(secret.clone(), ShapeType::String).with_trait(Trait::Sensitive));
//! model.add_structure(
//!     ShapeId::new("com.example", "Login"),
//!     vec![],
//!     vec![MemberDef::new("password", secret)],
//! );
//!
//! let symbols = DefaultSymbolProvider::new(&model);
//! let engine = MetadataEngine::from_config(&symbols, &MetaConfig::default());
//! let table = engine.derive_all().unwrap();
//!
//! let login = table.expect(&ShapeId::new("com.example", "Login")).unwrap();
//! assert!(!login.has_derive(Derive::Debug));
//! assert!(login.has_derive(Derive::Clone));
//! ```

pub mod base;
pub mod config;
pub mod constrained;
pub mod error;
pub mod extension;
pub mod manifest;
pub mod metadata;
pub mod provider;

pub use base::BaseMetadataProvider;
pub use config::{MetaConfig, Mode};
pub use constrained::ConstrainedMetadataProvider;
pub use error::{ConfigError, MetaError};
pub use extension::{CodegenContext, Extension, ExtensionRegistry, LibRsSection, SectionContent};
pub use manifest::{CargoDependency, CrateManifest, DependencyScope, Feature};
pub use metadata::{Attribute, Cfg, Derive, RustMetadata, Visibility};
pub use provider::{
    MetaSymbol, MetadataEngine, MetadataProvider, MetadataTable, WrappingMetadataProvider,
};
