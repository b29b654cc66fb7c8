//! The metadata record attached to each generated declaration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Visibility of a generated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    /// `pub(crate)`.
    PubCrate,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "pub"),
            Visibility::PubCrate => write!(f, "pub(crate)"),
            Visibility::Private => Ok(()),
        }
    }
}

/// A derivable trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Derive {
    Debug,
    PartialEq,
    Clone,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerdeSerialize,
    SerdeDeserialize,
}

impl Derive {
    /// Path used in a `derive(..)` list.
    pub fn path(self) -> &'static str {
        match self {
            Derive::Debug => "::std::fmt::Debug",
            Derive::PartialEq => "::std::cmp::PartialEq",
            Derive::Clone => "::std::clone::Clone",
            Derive::Eq => "::std::cmp::Eq",
            Derive::PartialOrd => "::std::cmp::PartialOrd",
            Derive::Ord => "::std::cmp::Ord",
            Derive::Hash => "::std::hash::Hash",
            Derive::SerdeSerialize => "::serde::Serialize",
            Derive::SerdeDeserialize => "::serde::Deserialize",
        }
    }
}

/// A `cfg` predicate over build features.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cfg {
    Feature(String),
    Any(Vec<Cfg>),
    All(Vec<Cfg>),
    Not(Box<Cfg>),
}

impl Cfg {
    pub fn feature(name: impl Into<String>) -> Self {
        Cfg::Feature(name.into())
    }

    /// Whether the predicate holds for the given set of enabled features.
    pub fn is_enabled(&self, enabled: &[&str]) -> bool {
        match self {
            Cfg::Feature(name) => enabled.contains(&name.as_str()),
            Cfg::Any(preds) => preds.iter().any(|p| p.is_enabled(enabled)),
            Cfg::All(preds) => preds.iter().all(|p| p.is_enabled(enabled)),
            Cfg::Not(pred) => !pred.is_enabled(enabled),
        }
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, name: &str, preds: &[Cfg]) -> fmt::Result {
            write!(f, "{}(", name)?;
            for (i, p) in preds.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", p)?;
            }
            write!(f, ")")
        }
        match self {
            Cfg::Feature(name) => write!(f, "feature = \"{}\"", name),
            Cfg::Any(preds) => list(f, "any", preds),
            Cfg::All(preds) => list(f, "all", preds),
            Cfg::Not(pred) => write!(f, "not({})", pred),
        }
    }
}

/// An attribute placed on a generated declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Derive(Vec<Derive>),
    NonExhaustive,
    /// `serde(..)` helper attribute with its raw arguments.
    Serde(String),
    /// `cfg_attr(predicate, attribute)`.
    CfgAttr { predicate: Cfg, attribute: Box<Attribute> },
}

impl Attribute {
    pub fn cfg_attr(predicate: Cfg, attribute: Attribute) -> Self {
        Attribute::CfgAttr {
            predicate,
            attribute: Box::new(attribute),
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Attribute::CfgAttr { .. })
    }

    /// The gating predicate, for conditional attributes.
    pub fn predicate(&self) -> Option<&Cfg> {
        match self {
            Attribute::CfgAttr { predicate, .. } => Some(predicate),
            _ => None,
        }
    }

    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Derive(derives) => {
                let paths: Vec<&str> = derives.iter().map(|d| d.path()).collect();
                write!(f, "derive({})", paths.join(", "))
            }
            Attribute::NonExhaustive => write!(f, "non_exhaustive"),
            Attribute::Serde(args) => write!(f, "serde({})", args),
            Attribute::CfgAttr {
                predicate,
                attribute,
            } => {
                write!(f, "cfg_attr({}, ", predicate)?;
                attribute.fmt_inner(f)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[")?;
        self.fmt_inner(f)?;
        write!(f, "]")
    }
}

/// Code generation metadata for one declaration.
///
/// Values are never mutated once built; the `with_*` methods return a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RustMetadata {
    pub derives: BTreeSet<Derive>,
    pub additional_attributes: Vec<Attribute>,
    pub visibility: Visibility,
}

impl RustMetadata {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            derives: BTreeSet::new(),
            additional_attributes: Vec::new(),
            visibility,
        }
    }

    pub fn with_derives(mut self, derives: impl IntoIterator<Item = Derive>) -> Self {
        self.derives.extend(derives);
        self
    }

    pub fn without_derives(mut self, derives: impl IntoIterator<Item = Derive>) -> Self {
        for d in derives {
            self.derives.remove(&d);
        }
        self
    }

    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.additional_attributes.extend(attributes);
        self
    }

    pub fn has_derive(&self, derive: Derive) -> bool {
        self.derives.contains(&derive)
    }

    /// Attributes gated on a `cfg` predicate, in order.
    pub fn conditional_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.additional_attributes
            .iter()
            .filter(|a| a.is_conditional())
    }

    /// All attributes as they would be rendered above the declaration,
    /// starting with the `derive` list when there is one.
    pub fn render_attributes(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.additional_attributes.len() + 1);
        if !self.derives.is_empty() {
            out.push(Attribute::Derive(self.derives.iter().copied().collect()).to_string());
        }
        out.extend(self.additional_attributes.iter().map(ToString::to_string));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfg_attr_renders_nested_predicates() {
        let attr = Attribute::cfg_attr(
            Cfg::Any(vec![
                Cfg::feature("serde-serialize"),
                Cfg::feature("serde-deserialize"),
            ]),
            Attribute::Serde("skip".into()),
        );
        insta::assert_snapshot!(
            attr.to_string(),
            @r#"#[cfg_attr(any(feature = "serde-serialize", feature = "serde-deserialize"), serde(skip))]"#
        );
    }

    #[test]
    fn derives_render_in_stable_order() {
        let meta = RustMetadata::new(Visibility::Public)
            .with_derives([Derive::Clone, Derive::Debug, Derive::PartialEq])
            .with_attributes([Attribute::NonExhaustive]);
        assert_eq!(
            meta.render_attributes(),
            vec![
                "#[derive(::std::fmt::Debug, ::std::cmp::PartialEq, ::std::clone::Clone)]".to_string(),
                "#[non_exhaustive]".to_string(),
            ]
        );
    }

    #[test]
    fn cfg_predicates_evaluate_against_features() {
        let any = Cfg::Any(vec![Cfg::feature("a"), Cfg::feature("b")]);
        assert!(any.is_enabled(&["b"]));
        assert!(!any.is_enabled(&[]));
        let all = Cfg::All(vec![Cfg::feature("a"), Cfg::Not(Box::new(Cfg::feature("b")))]);
        assert!(all.is_enabled(&["a"]));
        assert!(!all.is_enabled(&["a", "b"]));
    }

    #[test]
    fn private_visibility_renders_empty() {
        assert_eq!(Visibility::Private.to_string(), "");
        assert_eq!(Visibility::PubCrate.to_string(), "pub(crate)");
    }
}
