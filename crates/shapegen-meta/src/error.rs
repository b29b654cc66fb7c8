//! Error types.

use shapegen_model::{ModelError, ShapeId};
use std::path::PathBuf;

/// Defects that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// A renderer asked for metadata that derivation never attached.
    #[error("expected `{0}` to have metadata attached but it did not")]
    MissingMetadata(ShapeId),

    /// A member's container is a kind the field rules do not cover.
    #[error("unrecognized container type `{kind}` for member `{member}`")]
    UnrecognizedContainer { member: ShapeId, kind: &'static str },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to render manifest: {0}")]
    Manifest(#[from] toml::ser::Error),

    #[error("failed to serialize metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors loading a [`MetaConfig`](crate::MetaConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
