//! Server rules for constrained shapes.
//!
//! Server code wraps constrained simple shapes and collections in newtypes
//! that validate on construction. Those newtypes are real declarations, so
//! they need derives and a visibility of their own. Everything else keeps the
//! inner provider's rules.

use shapegen_model::{Shape, ShapeType, TraitKind};

use crate::error::MetaError;
use crate::metadata::{Derive, RustMetadata, Visibility};
use crate::provider::{MetadataProvider, WrappingMetadataProvider};

const CONSTRAINT_TRAITS: [TraitKind; 4] = [
    TraitKind::Length,
    TraitKind::Range,
    TraitKind::Pattern,
    TraitKind::Enum,
];

/// Whether `shape` carries a constraint trait.
pub fn is_constrained(shape: &Shape) -> bool {
    CONSTRAINT_TRAITS.iter().any(|kind| shape.has_trait(*kind))
}

/// Wraps another provider, overriding list, map, string, number and blob
/// metadata for constrained shapes.
pub struct ConstrainedMetadataProvider<P> {
    inner: P,
    public_constrained_types: bool,
}

impl<P: MetadataProvider> ConstrainedMetadataProvider<P> {
    pub fn new(inner: P, public_constrained_types: bool) -> Self {
        Self {
            inner,
            public_constrained_types,
        }
    }

    fn constrained_meta(&self, shape: &Shape) -> RustMetadata {
        let visibility = if self.public_constrained_types {
            Visibility::Public
        } else {
            Visibility::PubCrate
        };
        let mut meta = RustMetadata::new(visibility).with_derives([Derive::PartialEq, Derive::Clone]);
        if !shape.has_trait(TraitKind::Sensitive) {
            meta = meta.with_derives([Derive::Debug]);
        }
        let total_eq = match shape.shape_type() {
            ShapeType::String | ShapeType::Blob => true,
            ShapeType::Number(n) => n.is_integral(),
            _ => false,
        };
        if total_eq {
            meta = meta.with_derives([Derive::Eq, Derive::Hash]);
        }
        meta
    }

    fn constrained_or_inner(
        &self,
        shape: &Shape,
        inner: impl FnOnce(&dyn MetadataProvider) -> Result<RustMetadata, MetaError>,
    ) -> Result<RustMetadata, MetaError> {
        if is_constrained(shape) {
            tracing::trace!(shape = %shape.id(), "constrained shape");
            Ok(self.constrained_meta(shape))
        } else {
            inner(&self.inner)
        }
    }
}

impl<P: MetadataProvider> WrappingMetadataProvider for ConstrainedMetadataProvider<P> {
    fn inner(&self) -> &dyn MetadataProvider {
        &self.inner
    }

    fn list_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.constrained_or_inner(shape, |p| p.list_meta(shape))
    }

    fn map_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.constrained_or_inner(shape, |p| p.map_meta(shape))
    }

    fn string_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.constrained_or_inner(shape, |p| p.string_meta(shape))
    }

    fn number_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.constrained_or_inner(shape, |p| p.number_meta(shape))
    }

    fn blob_meta(&self, shape: &Shape) -> Result<RustMetadata, MetaError> {
        self.constrained_or_inner(shape, |p| p.blob_meta(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapegen_model::{EnumValue, ShapeId, Trait};

    fn string(name: &str) -> Shape {
        Shape::new(ShapeId::new("com.example", name), ShapeType::String)
    }

    #[test]
    fn test_constraint_traits() {
        assert!(!is_constrained(&string("Plain")));
        assert!(is_constrained(
            &string("Name").with_trait(Trait::Pattern("^[a-z]+$".to_string()))
        ));
        assert!(is_constrained(
            &string("Short").with_trait(Trait::Length {
                min: Some(1),
                max: Some(8),
            })
        ));
        assert!(is_constrained(
            &string("Suit").with_trait(Trait::Enum(vec![EnumValue::new("hearts")]))
        ));
    }
}
