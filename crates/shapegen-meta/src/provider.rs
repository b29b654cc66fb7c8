//! Dispatching shapes to metadata derivation rules.
//!
//! A [`MetadataProvider`] holds the rules, one operation per declaration
//! kind. The [`MetadataEngine`] holds no rules of its own: it resolves the base
//! symbol, picks the operation matching the shape's kind and attaches the
//! result.
//!
//! Providers compose by wrapping: implement [`WrappingMetadataProvider`],
//! return the wrapped provider from [`inner`](WrappingMetadataProvider::inner)
//! and override only the operations that change. Everything else forwards.

use rayon::prelude::*;
use serde::Serialize;
use shapegen_model::{Model, Shape, ShapeId, ShapeType, Symbol, SymbolProvider};
use std::collections::BTreeMap;

use crate::base::BaseMetadataProvider;
use crate::config::{MetaConfig, Mode};
use crate::constrained::ConstrainedMetadataProvider;
use crate::error::MetaError;
use crate::metadata::RustMetadata;

/// Per-kind metadata derivation rules.
pub trait MetadataProvider: Send + Sync {
    /// Field inside a structure, union, collection or enum.
    fn member_meta(&self, member: &Shape) -> Result<RustMetadata, MetaError>;
    fn structure_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    fn union_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    /// String shape carrying the enum trait.
    fn enum_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    fn list_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    fn map_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    fn string_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    fn number_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
    fn blob_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError>;
}

/// A provider that decorates another, forwarding every operation it does not override.
pub trait WrappingMetadataProvider: Send + Sync {
    fn inner(&self) -> &dyn MetadataProvider;

    fn member_meta(&self, member: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().member_meta(member)
    }
    fn structure_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().structure_meta(shape)
    }
    fn union_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().union_meta(shape)
    }
    fn enum_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().enum_meta(shape)
    }
    fn list_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().list_meta(shape)
    }
    fn map_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().map_meta(shape)
    }
    fn string_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().string_meta(shape)
    }
    fn number_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().number_meta(shape)
    }
    fn blob_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.inner().blob_meta(shape)
    }
}

impl<T: WrappingMetadataProvider> MetadataProvider for T {
    fn member_meta(&self, member: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::member_meta(self, member)
    }
    fn structure_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::structure_meta(self, shape)
    }
    fn union_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::union_meta(self, shape)
    }
    fn enum_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::enum_meta(self, shape)
    }
    fn list_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::list_meta(self, shape)
    }
    fn map_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::map_meta(self, shape)
    }
    fn string_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::string_meta(self, shape)
    }
    fn number_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::number_meta(self, shape)
    }
    fn blob_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        WrappingMetadataProvider::blob_meta(self, shape)
    }
}

/// A resolved symbol together with its derived metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSymbol {
    pub shape: ShapeId,
    pub symbol: Symbol,
    pub meta: Option<RustMetadata>,
}

impl MetaSymbol {
    pub fn expect_metadata(&self) -> Result<&RustMetadata, MetaError> {
        self.meta
            .as_ref()
            .ok_or_else(|| MetaError::MissingMetadata(self.shape.clone()))
    }
}

/// Metadata for every declaration of a model, keyed by shape id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataTable {
    entries: BTreeMap<ShapeId, RustMetadata>,
}

impl MetadataTable {
    pub fn get(&self, id: &ShapeId) -> Option<&RustMetadata> {
        self.entries.get(id)
    }

    pub fn expect(&self, id: &ShapeId) -> Result<&RustMetadata, MetaError> {
        self.get(id)
            .ok_or_else(|| MetaError::MissingMetadata(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShapeId, &RustMetadata)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON keyed by textual shape id.
    pub fn to_json(&self) -> Result<String, MetaError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Attaches provider-derived metadata to symbols.
pub struct MetadataEngine<'a> {
    symbols: &'a dyn SymbolProvider,
    provider: Box<dyn MetadataProvider + 'a>,
}

impl<'a> MetadataEngine<'a> {
    pub fn new(symbols: &'a dyn SymbolProvider, provider: Box<dyn MetadataProvider + 'a>) -> Self {
        Self { symbols, provider }
    }

    /// The provider stack `config` asks for: the client rules, or the server
    /// rules wrapped with constrained-shape overrides.
    pub fn from_config(symbols: &'a dyn SymbolProvider, config: &MetaConfig) -> Self {
        let provider: Box<dyn MetadataProvider + 'a> = match config.mode {
            Mode::Client => Box::new(BaseMetadataProvider::client(symbols, config)),
            Mode::Server => Box::new(ConstrainedMetadataProvider::new(
                BaseMetadataProvider::server(symbols, config),
                config.server.public_constrained_types,
            )),
        };
        tracing::debug!(mode = ?config.mode, "built metadata provider");
        Self::new(symbols, provider)
    }

    pub fn model(&self) -> &Model {
        self.symbols.model()
    }

    /// Resolve `shape` and attach its metadata.
    pub fn to_symbol(&self, shape: &Shape) -> Result<MetaSymbol, MetaError> {
        let symbol = self.symbols.to_symbol(shape)?;
        let meta = self.metadata_for(shape)?;
        Ok(MetaSymbol {
            shape: shape.id().clone(),
            symbol,
            meta,
        })
    }

    /// Derive metadata for `shape`, or `None` for kinds that carry none.
    pub fn metadata_for(&self, shape: &Shape) -> Result<Option<RustMetadata>, MetaError> {
        let p = self.provider.as_ref();
        let meta = match shape.shape_type() {
            ShapeType::Member { .. } => p.member_meta(shape)?,
            ShapeType::Structure { .. } => p.structure_meta(shape)?,
            ShapeType::Union { .. } => p.union_meta(shape)?,
            ShapeType::List { .. } => p.list_meta(shape)?,
            ShapeType::Map { .. } => p.map_meta(shape)?,
            ShapeType::Number(_) | ShapeType::IntEnum { .. } => p.number_meta(shape)?,
            ShapeType::Blob => p.blob_meta(shape)?,
            ShapeType::String if shape.is_string_enum() => p.enum_meta(shape)?,
            ShapeType::String => p.string_meta(shape)?,
            ShapeType::Boolean
            | ShapeType::Timestamp
            | ShapeType::Document
            | ShapeType::Operation
            | ShapeType::Service => {
                tracing::trace!(shape = %shape.id(), kind = shape.shape_type().kind_name(), "no metadata for kind");
                return Ok(None);
            }
        };
        tracing::trace!(shape = %shape.id(), ?meta, "derived metadata");
        Ok(Some(meta))
    }

    /// Derive metadata for every shape in the model.
    ///
    /// Shapes are independent, so derivation runs in parallel; the first
    /// defect aborts the run.
    pub fn derive_all(&self) -> Result<MetadataTable, MetaError> {
        let shapes: Vec<&Shape> = self.model().shapes().collect();
        let entries = shapes
            .par_iter()
            .filter_map(|shape| {
                self.metadata_for(shape)
                    .map(|meta| meta.map(|m| (shape.id().clone(), m)))
                    .transpose()
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        tracing::debug!(
            shapes = shapes.len(),
            declarations = entries.len(),
            "derived metadata table"
        );
        Ok(MetadataTable { entries })
    }
}
