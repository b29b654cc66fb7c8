//! Generation settings.
//!
//! Example `shapegen.toml`:
//! ```toml
//! mode = "server"
//!
//! [features]
//! serialize = "serde-serialize"
//! deserialize = "serde-deserialize"
//!
//! [client]
//! non_exhaustive = true
//!
//! [server]
//! public_constrained_types = false
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Which side of the protocol code is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Client,
    Server,
}

/// Names of the build features gating serde support.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeatureNames {
    pub serialize: String,
    pub deserialize: String,
}

impl Default for FeatureNames {
    fn default() -> Self {
        Self {
            serialize: "serde-serialize".to_string(),
            deserialize: "serde-deserialize".to_string(),
        }
    }
}

/// Client generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Mark structures, unions and enums `#[non_exhaustive]`.
    pub non_exhaustive: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            non_exhaustive: true,
        }
    }
}

/// Server generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Expose constrained wrapper types as `pub` instead of `pub(crate)`.
    pub public_constrained_types: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_constrained_types: true,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    pub mode: Mode,
    pub features: FeatureNames,
    pub client: ClientConfig,
    pub server: ServerConfig,
}

impl MetaConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), mode = ?config.mode, "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
