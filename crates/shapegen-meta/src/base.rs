//! The default metadata rules.

use shapegen_model::{
    EVENT_RECEIVER, EVENT_STREAM_SENDER, Model, Shape, ShapeType, SymbolProvider, TraitKind,
};

use crate::config::{FeatureNames, MetaConfig};
use crate::error::MetaError;
use crate::metadata::{Attribute, Cfg, Derive, RustMetadata, Visibility};
use crate::provider::MetadataProvider;

/// Derives every container starts with.
pub const BASE_DERIVES: [Derive; 3] = [Derive::Debug, Derive::PartialEq, Derive::Clone];

/// Extra derives string enums can always support.
pub const ENUM_DERIVES: [Derive; 4] = [Derive::Eq, Derive::PartialOrd, Derive::Ord, Derive::Hash];

/// Whether `shape` or one of its direct members is sensitive.
///
/// Only direct members are checked: a sensitive descendant further down is
/// redacted by its own container's `Debug`, so this one can still derive it.
pub fn is_sensitive(shape: &Shape, model: &Model) -> Result<bool, MetaError> {
    if shape.has_trait(TraitKind::Sensitive) {
        return Ok(true);
    }
    for member in model.members(shape)? {
        if model.member_trait(member, TraitKind::Sensitive)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn serialize_attribute(features: &FeatureNames) -> Attribute {
    Attribute::cfg_attr(
        Cfg::feature(&features.serialize),
        Attribute::Derive(vec![Derive::SerdeSerialize]),
    )
}

fn deserialize_attribute(features: &FeatureNames) -> Attribute {
    Attribute::cfg_attr(
        Cfg::feature(&features.deserialize),
        Attribute::Derive(vec![Derive::SerdeDeserialize]),
    )
}

/// `serde(skip)` whenever either serde feature is on.
pub fn serde_skip_attribute(features: &FeatureNames) -> Attribute {
    Attribute::cfg_attr(
        Cfg::Any(vec![
            Cfg::feature(&features.serialize),
            Cfg::feature(&features.deserialize),
        ]),
        Attribute::Serde("skip".to_string()),
    )
}

fn container_metadata(
    shape: &Shape,
    model: &Model,
    additional_attributes: &[Attribute],
    features: &FeatureNames,
    deserialize: bool,
) -> Result<RustMetadata, MetaError> {
    let mut meta = RustMetadata::new(Visibility::Public).with_derives(BASE_DERIVES);
    if is_sensitive(shape, model)? {
        meta = meta.without_derives([Derive::Debug]);
    }
    meta = meta
        .with_attributes(additional_attributes.iter().cloned())
        .with_attributes([serialize_attribute(features)]);
    if deserialize {
        meta = meta.with_attributes([deserialize_attribute(features)]);
    }
    Ok(meta)
}

/// Metadata shared by structures, unions and string enums.
pub fn container_default_metadata(
    shape: &Shape,
    model: &Model,
    additional_attributes: &[Attribute],
    features: &FeatureNames,
) -> Result<RustMetadata, MetaError> {
    container_metadata(shape, model, additional_attributes, features, true)
}

/// Like [`container_default_metadata`] but never derives `Deserialize`.
pub fn container_default_metadata_without_deserialize(
    shape: &Shape,
    model: &Model,
    additional_attributes: &[Attribute],
    features: &FeatureNames,
) -> Result<RustMetadata, MetaError> {
    container_metadata(shape, model, additional_attributes, features, false)
}

/// The default rule set.
///
/// Client generation passes `#[non_exhaustive]` as an additional attribute
/// since model changes must not break callers; server generation passes none.
pub struct BaseMetadataProvider<'a> {
    symbols: &'a dyn SymbolProvider,
    additional_attributes: Vec<Attribute>,
    features: FeatureNames,
}

impl<'a> BaseMetadataProvider<'a> {
    pub fn new(
        symbols: &'a dyn SymbolProvider,
        additional_attributes: Vec<Attribute>,
        features: FeatureNames,
    ) -> Self {
        Self {
            symbols,
            additional_attributes,
            features,
        }
    }

    /// Client rules from `config`.
    pub fn client(symbols: &'a dyn SymbolProvider, config: &MetaConfig) -> Self {
        let additional = if config.client.non_exhaustive {
            vec![Attribute::NonExhaustive]
        } else {
            Vec::new()
        };
        Self::new(symbols, additional, config.features.clone())
    }

    /// Server rules from `config`.
    pub fn server(symbols: &'a dyn SymbolProvider, config: &MetaConfig) -> Self {
        Self::new(symbols, Vec::new(), config.features.clone())
    }

    fn model(&self) -> &Model {
        self.symbols.model()
    }

    fn has_event_stream_sender(&self, shape: &Shape) -> Result<bool, MetaError> {
        for member in self.model().members(shape)? {
            let symbol = self.symbols.to_symbol(member)?;
            if symbol.rust_type().is_application_of(EVENT_STREAM_SENDER) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn default_metadata() -> RustMetadata {
        RustMetadata::new(Visibility::Private)
    }
}

impl MetadataProvider for BaseMetadataProvider<'_> {
    fn member_meta(&self, member: &Shape) -> Result<RustMetadata, MetaError> {
        let container = self.model().container(member)?;
        let meta = match container.shape_type() {
            ShapeType::Structure { .. }
            | ShapeType::Union { .. }
            | ShapeType::List { .. }
            | ShapeType::Map { .. }
            | ShapeType::String
            | ShapeType::IntEnum { .. } => RustMetadata::new(Visibility::Public),
            other => {
                return Err(MetaError::UnrecognizedContainer {
                    member: member.id().clone(),
                    kind: other.kind_name(),
                });
            }
        };

        let rust_type = self.symbols.to_symbol(member)?.rust_type;
        let unserializable = self.model().is_streaming(member)?
            || rust_type.is_application_of(EVENT_RECEIVER)
            || rust_type.is_application_of(EVENT_STREAM_SENDER);
        if unserializable {
            tracing::debug!(member = %member.id(), "skipping member in serde derives");
            return Ok(meta.with_attributes([serde_skip_attribute(&self.features)]));
        }
        Ok(meta)
    }

    fn structure_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        // A sender cannot be rebuilt from data, so such structures never deserialize.
        if self.has_event_stream_sender(shape)? {
            container_default_metadata_without_deserialize(
                shape,
                self.model(),
                &self.additional_attributes,
                &self.features,
            )
        } else {
            container_default_metadata(
                shape,
                self.model(),
                &self.additional_attributes,
                &self.features,
            )
        }
    }

    fn union_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        container_default_metadata(
            shape,
            self.model(),
            &self.additional_attributes,
            &self.features,
        )
    }

    fn enum_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        // Enums only hold strings, so ordering and hashing are always available.
        Ok(container_default_metadata(
            shape,
            self.model(),
            &self.additional_attributes,
            &self.features,
        )?
        .with_derives(ENUM_DERIVES))
    }

    fn list_meta(&self, _shape: &Shape) -> Result<RustMetadata, MetaError> {
        Ok(Self::default_metadata())
    }

    fn map_meta(&self, _shape: &Shape) -> Result<RustMetadata, MetaError> {
        Ok(Self::default_metadata())
    }

    fn string_meta(&self, _shape: &Shape) -> Result<RustMetadata, MetaError> {
        Ok(Self::default_metadata())
    }

    fn number_meta(&self, _shape: &Shape) -> Result<RustMetadata, MetaError> {
        Ok(Self::default_metadata())
    }

    fn blob_meta(&self, _shape: &Shape) -> Result<RustMetadata, MetaError> {
        Ok(Self::default_metadata())
    }
}
