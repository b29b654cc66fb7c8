//! Ordered registry of extensions.

use super::{CodegenContext, Extension, LibRsSection, SerdeExtension};
use crate::manifest::CrateManifest;

/// Extensions sorted by `(order, name)`, unique by name.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in extensions.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SerdeExtension));
        registry
    }

    /// Register an extension, replacing any extension with the same name.
    pub fn register(&mut self, extension: Box<dyn Extension>) {
        if let Some(pos) = self
            .extensions
            .iter()
            .position(|e| e.name() == extension.name())
        {
            tracing::debug!(extension = extension.name(), "replacing registered extension");
            self.extensions.remove(pos);
        }
        let key = (extension.order(), extension.name().to_string());
        let pos = self
            .extensions
            .partition_point(|e| (e.order(), e.name()) < (key.0, key.1.as_str()));
        self.extensions.insert(pos, extension);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
    }

    /// Registered extension names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Let every extension add features and dependencies, in order.
    pub fn apply_extras(&self, ctx: &CodegenContext<'_>, manifest: &mut CrateManifest) {
        for extension in &self.extensions {
            tracing::trace!(extension = extension.name(), "applying extras");
            extension.extras(ctx, manifest);
        }
    }

    /// Concatenate every extension's content for `section`, in order.
    ///
    /// Dependencies the content relies on are added to `manifest`.
    pub fn render_section(
        &self,
        ctx: &CodegenContext<'_>,
        section: LibRsSection,
        manifest: &mut CrateManifest,
    ) -> String {
        let mut out = String::new();
        for extension in &self.extensions {
            let Some(content) = extension.section(ctx, section) else {
                continue;
            };
            tracing::trace!(extension = extension.name(), ?section, "rendering section");
            for dependency in content.dependencies {
                manifest.add_dependency(dependency);
            }
            out.push_str(&content.text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetaConfig;
    use crate::extension::SectionContent;
    use crate::manifest::{CargoDependency, DependencyScope, Feature};
    use shapegen_model::Model;

    struct Named {
        name: &'static str,
        order: i8,
        text: &'static str,
    }

    impl Extension for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn order(&self) -> i8 {
            self.order
        }

        fn extras(&self, _ctx: &CodegenContext<'_>, manifest: &mut CrateManifest) {
            manifest.merge_feature(Feature::new("shared", false, [format!("dep:{}", self.name)]));
        }

        fn section(&self, _ctx: &CodegenContext<'_>, section: LibRsSection) -> Option<SectionContent> {
            (section == LibRsSection::Attributes).then(|| SectionContent::text(self.text))
        }
    }

    /// Needs serde with `rc` for the same section serde support fills.
    struct SharedPointers;

    impl Extension for SharedPointers {
        fn name(&self) -> &str {
            "SharedPointers"
        }

        fn order(&self) -> i8 {
            7
        }

        fn section(&self, _ctx: &CodegenContext<'_>, section: LibRsSection) -> Option<SectionContent> {
            (section == LibRsSection::Body).then(|| {
                SectionContent::text("pub use std::sync::Arc;\n").with_dependency(
                    CargoDependency::serde()
                        .optional(true)
                        .with_features(["rc"]),
                )
            })
        }
    }

    fn named(name: &'static str, order: i8, text: &'static str) -> Box<dyn Extension> {
        Box::new(Named { name, order, text })
    }

    #[test]
    fn test_sorted_by_order_then_name() {
        let mut registry = ExtensionRegistry::new();
        registry.register(named("late", 9, ""));
        registry.register(named("b", 1, ""));
        registry.register(named("a", 1, ""));
        registry.register(named("early", -3, ""));
        assert_eq!(registry.names(), vec!["early", "a", "b", "late"]);
    }

    #[test]
    fn test_reregistering_replaces() {
        let mut registry = ExtensionRegistry::new();
        registry.register(named("x", 1, "first"));
        registry.register(named("y", 2, ""));
        registry.register(named("x", 3, "second"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["y", "x"]);
        assert_eq!(registry.get("x").unwrap().order(), 3);
    }

    #[test]
    fn test_sections_concatenate_in_order() {
        let model = Model::new();
        let config = MetaConfig::default();
        let ctx = CodegenContext::new(&model, &config);
        let mut registry = ExtensionRegistry::new();
        registry.register(named("second", 2, "#![allow(b)]\n"));
        registry.register(named("first", 1, "#![allow(a)]\n"));

        let mut manifest = CrateManifest::new();
        let text = registry.render_section(&ctx, LibRsSection::Attributes, &mut manifest);
        assert_eq!(text, "#![allow(a)]\n#![allow(b)]\n");
        assert_eq!(registry.render_section(&ctx, LibRsSection::Body, &mut manifest), "");
    }

    #[test]
    fn test_builtin_body_adds_serde_dependency() {
        let model = Model::new();
        let config = MetaConfig::default();
        let ctx = CodegenContext::new(&model, &config);
        let registry = ExtensionRegistry::with_builtin();

        let mut manifest = CrateManifest::new();
        registry.apply_extras(&ctx, &mut manifest);
        let body = registry.render_section(&ctx, LibRsSection::Body, &mut manifest);
        assert_eq!(body, "");

        let serde = manifest
            .dependency("serde", DependencyScope::Compile)
            .unwrap();
        assert!(serde.optional);
        assert!(serde.features.contains("derive"));

        let rendered: toml::Table = toml::from_str(&manifest.to_toml().unwrap()).unwrap();
        let serde = rendered["dependencies"]["serde"].as_table().unwrap();
        assert_eq!(serde["version"].as_str(), Some("1"));
        assert_eq!(serde["optional"].as_bool(), Some(true));
        assert_eq!(serde["features"].as_array().unwrap()[0].as_str(), Some("derive"));
        for name in ["serde-serialize", "serde-deserialize"] {
            let deps = rendered["features"][name].as_array().unwrap();
            assert_eq!(deps.len(), 1);
            assert_eq!(deps[0].as_str(), Some("dep:serde"));
        }
    }

    #[test]
    fn test_same_section_dependency_merges() {
        let model = Model::new();
        let config = MetaConfig::default();
        let ctx = CodegenContext::new(&model, &config);
        let mut registry = ExtensionRegistry::with_builtin();
        registry.register(Box::new(SharedPointers));

        let mut manifest = CrateManifest::new();
        let body = registry.render_section(&ctx, LibRsSection::Body, &mut manifest);
        assert_eq!(body, "pub use std::sync::Arc;\n");

        assert_eq!(manifest.dependencies().len(), 1);
        let serde = manifest
            .dependency("serde", DependencyScope::Compile)
            .unwrap();
        assert!(serde.optional);
        assert_eq!(
            serde.features.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["derive", "rc"]
        );
    }

    #[test]
    fn test_extras_merge_shared_feature() {
        let model = Model::new();
        let config = MetaConfig::default();
        let ctx = CodegenContext::new(&model, &config);
        let mut registry = ExtensionRegistry::new();
        registry.register(named("beta", 2, ""));
        registry.register(named("alpha", 1, ""));

        let mut manifest = CrateManifest::new();
        registry.apply_extras(&ctx, &mut manifest);
        assert_eq!(manifest.features().len(), 1);
        assert_eq!(
            manifest.feature("shared").unwrap().deps,
            vec!["dep:alpha".to_string(), "dep:beta".to_string()]
        );
    }
}
