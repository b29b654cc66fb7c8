//! Optional serde support for generated types.

use super::{CodegenContext, Extension, LibRsSection, SectionContent};
use crate::manifest::{CargoDependency, CrateManifest, DependencyScope, Feature};

/// Adds the opt-in serialize/deserialize features and the serde dependency
/// the feature-gated derives rely on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeExtension;

impl Extension for SerdeExtension {
    fn name(&self) -> &str {
        "SerdeExtension"
    }

    fn order(&self) -> i8 {
        5
    }

    fn extras(&self, ctx: &CodegenContext<'_>, manifest: &mut CrateManifest) {
        let features = &ctx.config.features;
        manifest.merge_feature(Feature::new(&features.serialize, false, ["dep:serde"]));
        manifest.merge_feature(Feature::new(&features.deserialize, false, ["dep:serde"]));
    }

    fn section(&self, _ctx: &CodegenContext<'_>, section: LibRsSection) -> Option<SectionContent> {
        match section {
            LibRsSection::Body => Some(
                SectionContent::default().with_dependency(
                    CargoDependency::serde()
                        .with_scope(DependencyScope::Compile)
                        .optional(true)
                        .with_features(["derive"]),
                ),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetaConfig;
    use shapegen_model::Model;

    #[test]
    fn test_declares_opt_in_features() {
        let model = Model::new();
        let config = MetaConfig::default();
        let ctx = CodegenContext::new(&model, &config);
        let mut manifest = CrateManifest::new();
        SerdeExtension.extras(&ctx, &mut manifest);

        for name in ["serde-serialize", "serde-deserialize"] {
            let feature = manifest.feature(name).expect(name);
            assert!(!feature.default);
            assert_eq!(feature.deps, vec!["dep:serde".to_string()]);
        }
        assert!(manifest.dependencies().is_empty());
    }

    #[test]
    fn test_body_pulls_in_serde() {
        let model = Model::new();
        let config = MetaConfig::default();
        let ctx = CodegenContext::new(&model, &config);

        assert!(SerdeExtension.section(&ctx, LibRsSection::Attributes).is_none());
        let body = SerdeExtension.section(&ctx, LibRsSection::Body).unwrap();
        assert!(body.text.is_empty());
        let serde = &body.dependencies[0];
        assert_eq!(serde.name, "serde");
        assert_eq!(serde.scope, DependencyScope::Compile);
        assert!(serde.optional);
        assert!(serde.features.contains("derive"));
    }

    #[test]
    fn test_feature_names_follow_config() {
        let model = Model::new();
        let config = MetaConfig::from_toml_str("[features]\nserialize = \"ser\"\n").unwrap();
        let ctx = CodegenContext::new(&model, &config);
        let mut manifest = CrateManifest::new();
        SerdeExtension.extras(&ctx, &mut manifest);
        assert!(manifest.feature("ser").is_some());
        assert!(manifest.feature("serde-serialize").is_none());
    }
}
