//! Extensions contributing features, dependencies and `lib.rs` content.
//!
//! Extensions are independent of per-shape metadata: each one runs once per
//! generation pass, in ascending [`order`](Extension::order), through the
//! [`ExtensionRegistry`].

mod registry;
mod serde_support;

pub use registry::ExtensionRegistry;
pub use serde_support::SerdeExtension;

use shapegen_model::Model;

use crate::config::MetaConfig;
use crate::manifest::{CargoDependency, CrateManifest};

/// Insertion points of the generated `lib.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibRsSection {
    /// Crate-level attributes (`#![..]`).
    Attributes,
    /// Module documentation.
    ModuleDocs,
    /// Items after the module declarations.
    Body,
}

/// Content one extension contributes to a section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionContent {
    pub text: String,
    /// Dependencies the text relies on.
    pub dependencies: Vec<CargoDependency>,
}

impl SectionContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: CargoDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// What extensions see of the current generation run.
#[derive(Debug, Clone, Copy)]
pub struct CodegenContext<'a> {
    pub model: &'a Model,
    pub config: &'a MetaConfig,
}

impl<'a> CodegenContext<'a> {
    pub fn new(model: &'a Model, config: &'a MetaConfig) -> Self {
        Self { model, config }
    }
}

/// A code generation extension.
///
/// # Implementing Extensions
///
/// ```
/// use shapegen_meta::extension::{CodegenContext, Extension, ExtensionRegistry};
/// use shapegen_meta::manifest::{CrateManifest, Feature};
///
/// struct Tracing;
///
/// impl Extension for Tracing {
///     fn name(&self) -> &str { "Tracing" }
///     fn order(&self) -> i8 { 10 }
///     fn extras(&self, _ctx: &CodegenContext<'_>, manifest: &mut CrateManifest) {
///         manifest.merge_feature(Feature::new("tracing", false, ["dep:tracing"]));
///     }
/// }
///
/// let mut registry = ExtensionRegistry::with_builtin();
/// registry.register(Box::new(Tracing));
/// assert_eq!(registry.names(), vec!["SerdeExtension", "Tracing"]);
/// ```
pub trait Extension: Send + Sync {
    /// Unique name; registering the same name again replaces the extension.
    fn name(&self) -> &str;

    /// Position in the run; lower runs first, ties are broken by name.
    fn order(&self) -> i8 {
        0
    }

    /// Add features and dependencies to the generated crate.
    fn extras(&self, _ctx: &CodegenContext<'_>, _manifest: &mut CrateManifest) {}

    /// Content for a `lib.rs` section, if any.
    fn section(&self, _ctx: &CodegenContext<'_>, _section: LibRsSection) -> Option<SectionContent> {
        None
    }
}
