//! Features and dependencies of the generated crate.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::MetaError;

/// Which dependency table a dependency belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DependencyScope {
    Compile,
    Dev,
    Build,
}

impl DependencyScope {
    fn table(self) -> &'static str {
        match self {
            DependencyScope::Compile => "dependencies",
            DependencyScope::Dev => "dev-dependencies",
            DependencyScope::Build => "build-dependencies",
        }
    }
}

/// A dependency of the generated crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CargoDependency {
    pub name: String,
    pub version: String,
    pub scope: DependencyScope,
    pub optional: bool,
    pub features: BTreeSet<String>,
}

impl CargoDependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scope: DependencyScope::Compile,
            optional: false,
            features: BTreeSet::new(),
        }
    }

    pub fn serde() -> Self {
        Self::new("serde", "1")
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    fn to_toml(&self) -> toml::Value {
        if !self.optional && self.features.is_empty() {
            return toml::Value::String(self.version.clone());
        }
        let mut table = toml::Table::new();
        table.insert("version".into(), self.version.clone().into());
        if self.optional {
            table.insert("optional".into(), true.into());
        }
        if !self.features.is_empty() {
            let features: Vec<toml::Value> =
                self.features.iter().map(|f| f.clone().into()).collect();
            table.insert("features".into(), features.into());
        }
        toml::Value::Table(table)
    }
}

/// A named build feature and the dependency activations it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: String,
    /// Enabled by default.
    pub default: bool,
    /// Activations such as `dep:serde` or `other-feature`.
    pub deps: Vec<String>,
}

impl Feature {
    pub fn new<I, S>(name: impl Into<String>, default: bool, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            default,
            deps: deps.into_iter().map(Into::into).collect(),
        }
    }
}

/// The feature and dependency tables extensions contribute to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrateManifest {
    features: Vec<Feature>,
    dependencies: Vec<CargoDependency>,
}

impl CrateManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature, merging with an existing feature of the same name.
    ///
    /// Dependency lists are unioned in order of first appearance.
    pub fn merge_feature(&mut self, feature: Feature) {
        let Some(existing) = self.features.iter_mut().find(|f| f.name == feature.name) else {
            tracing::debug!(feature = %feature.name, "added feature");
            self.features.push(feature);
            return;
        };
        if existing.default != feature.default {
            tracing::debug!(
                feature = %feature.name,
                "merged feature contributions disagree on default; keeping it default"
            );
        }
        existing.default |= feature.default;
        for dep in feature.deps {
            if !existing.deps.contains(&dep) {
                existing.deps.push(dep);
            }
        }
    }

    /// Add a dependency, merging with an existing one of the same name and scope.
    pub fn add_dependency(&mut self, dependency: CargoDependency) {
        let existing = self
            .dependencies
            .iter_mut()
            .find(|d| d.name == dependency.name && d.scope == dependency.scope);
        match existing {
            Some(existing) => {
                existing.optional &= dependency.optional;
                existing.features.extend(dependency.features);
            }
            None => {
                tracing::debug!(dependency = %dependency.name, scope = ?dependency.scope, "added dependency");
                self.dependencies.push(dependency);
            }
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn dependencies(&self) -> &[CargoDependency] {
        &self.dependencies
    }

    pub fn dependency(&self, name: &str, scope: DependencyScope) -> Option<&CargoDependency> {
        self.dependencies
            .iter()
            .find(|d| d.name == name && d.scope == scope)
    }

    /// The `default` feature list: activations contributed to a feature named
    /// `default`, then every feature flagged default.
    fn default_features(&self) -> Vec<toml::Value> {
        let mut defaults: Vec<&str> = Vec::new();
        let contributed = self
            .features
            .iter()
            .filter(|f| f.name == "default")
            .flat_map(|f| f.deps.iter().map(String::as_str));
        let flagged = self
            .features
            .iter()
            .filter(|f| f.default && f.name != "default")
            .map(|f| f.name.as_str());
        for name in contributed.chain(flagged) {
            if !defaults.contains(&name) {
                defaults.push(name);
            }
        }
        defaults.into_iter().map(|name| name.into()).collect()
    }

    /// Render the `[features]` and dependency tables as `Cargo.toml` text.
    pub fn to_toml(&self) -> Result<String, MetaError> {
        let mut root = toml::Table::new();

        if !self.features.is_empty() {
            let mut features = toml::Table::new();
            features.insert("default".into(), self.default_features().into());
            for feature in self.features.iter().filter(|f| f.name != "default") {
                let deps: Vec<toml::Value> =
                    feature.deps.iter().map(|d| d.clone().into()).collect();
                features.insert(feature.name.clone(), deps.into());
            }
            root.insert("features".into(), features.into());
        }

        for scope in [
            DependencyScope::Compile,
            DependencyScope::Dev,
            DependencyScope::Build,
        ] {
            let table: toml::Table = self
                .dependencies
                .iter()
                .filter(|d| d.scope == scope)
                .map(|d| (d.name.clone(), d.to_toml()))
                .collect();
            if !table.is_empty() {
                root.insert(scope.table().into(), table.into());
            }
        }

        Ok(toml::to_string(&root)?)
    }
}
