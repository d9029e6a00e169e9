//! Feature gating for build groups.
//!
//! A group declares a dependency expression naming the feature flags it needs.
//! The [`FeatureGate`] admits the group unless one of those flags is on the
//! build profile's denylist.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Feature whose subsystem is permanently disabled in every profile.
pub const DISABLED_SUBSYSTEM: &str = "RT_USING_FTK";

/// Features the default build profile does not support.
pub const DEFAULT_UNSUPPORTED: &[&str] = &[
    "RT_USING_FINSH",
    "RT_USING_FTK",
    "RT_USING_LUA",
    "RT_USING_CAIRO",
];

/// The feature condition gating a group's admission.
///
/// In a manifest this is either a string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyExpr {
    /// A single feature token
    Single(String),
    /// Every non-empty token must be supported
    Many(Vec<String>),
}

impl DependencyExpr {
    /// An expression with no constraints.
    pub fn none() -> Self {
        DependencyExpr::Many(Vec::new())
    }

    /// Iterate over the non-empty tokens of this expression.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        let tokens: &[String] = match self {
            DependencyExpr::Single(token) => std::slice::from_ref(token),
            DependencyExpr::Many(tokens) => tokens,
        };
        tokens.iter().map(String::as_str).filter(|t| !t.is_empty())
    }

    fn is_disabled_subsystem(&self) -> bool {
        match self {
            DependencyExpr::Single(token) => token == DISABLED_SUBSYSTEM,
            DependencyExpr::Many(tokens) => {
                tokens.len() == 1 && tokens[0] == DISABLED_SUBSYSTEM
            }
        }
    }
}

impl Default for DependencyExpr {
    fn default() -> Self {
        DependencyExpr::none()
    }
}

impl From<&str> for DependencyExpr {
    fn from(token: &str) -> Self {
        DependencyExpr::Single(token.to_string())
    }
}

impl From<Vec<&str>> for DependencyExpr {
    fn from(tokens: Vec<&str>) -> Self {
        DependencyExpr::Many(tokens.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for DependencyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyExpr::Single(token) => write!(f, "{}", token),
            DependencyExpr::Many(tokens) => write!(f, "[{}]", tokens.join(", ")),
        }
    }
}

/// The set of feature tokens a build profile does not support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDenylist {
    tokens: BTreeSet<String>,
}

impl FeatureDenylist {
    /// Create a denylist from a list of tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeatureDenylist {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// A denylist that rejects nothing.
    pub fn empty() -> Self {
        FeatureDenylist {
            tokens: BTreeSet::new(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl Default for FeatureDenylist {
    fn default() -> Self {
        FeatureDenylist::new(DEFAULT_UNSUPPORTED.iter().copied())
    }
}

/// Decides whether a dependency expression is supported.
#[derive(Debug, Clone, Default)]
pub struct FeatureGate {
    denylist: FeatureDenylist,
}

impl FeatureGate {
    pub fn new(denylist: FeatureDenylist) -> Self {
        FeatureGate { denylist }
    }

    pub fn denylist(&self) -> &FeatureDenylist {
        &self.denylist
    }

    /// Check whether every feature named by `depend` is supported.
    pub fn is_supported(&self, depend: &DependencyExpr) -> bool {
        if depend.is_disabled_subsystem() {
            return false;
        }

        depend.tokens().all(|token| !self.denylist.contains(token))
    }

    /// The first denied token of `depend`, if any.
    pub fn rejected_by<'a>(&self, depend: &'a DependencyExpr) -> Option<&'a str> {
        if depend.is_disabled_subsystem() {
            return Some(DISABLED_SUBSYSTEM);
        }
        depend.tokens().find(|token| self.denylist.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token() {
        let gate = FeatureGate::default();
        assert!(gate.is_supported(&"RT_USING_RTGUI".into()));
        assert!(!gate.is_supported(&"RT_USING_LUA".into()));
    }

    #[test]
    fn test_list_rejects_any_denied_token() {
        let gate = FeatureGate::default();
        assert!(gate.is_supported(&vec!["RT_USING_RTGUI", "RT_USING_DFS"].into()));
        assert!(!gate.is_supported(&vec!["RT_USING_RTGUI", "RT_USING_CAIRO"].into()));
    }

    #[test]
    fn test_empty_tokens_are_ignored() {
        let gate = FeatureGate::default();
        assert!(gate.is_supported(&DependencyExpr::none()));
        assert!(gate.is_supported(&vec![""].into()));
        assert!(gate.is_supported(&"".into()));
        assert!(!gate.is_supported(&vec!["", "RT_USING_FINSH"].into()));
    }

    #[test]
    fn test_disabled_subsystem_always_rejected() {
        let gate = FeatureGate::new(FeatureDenylist::empty());
        assert!(!gate.is_supported(&DISABLED_SUBSYSTEM.into()));
        assert!(!gate.is_supported(&vec![DISABLED_SUBSYSTEM].into()));
        assert_eq!(
            gate.rejected_by(&DISABLED_SUBSYSTEM.into()),
            Some(DISABLED_SUBSYSTEM)
        );
    }

    #[test]
    fn test_custom_denylist() {
        let gate = FeatureGate::new(FeatureDenylist::new(["RT_USING_SDL"]));
        assert!(gate.is_supported(&"RT_USING_LUA".into()));
        assert!(!gate.is_supported(&"RT_USING_SDL".into()));
        assert_eq!(
            gate.rejected_by(&vec!["A", "RT_USING_SDL"].into()),
            Some("RT_USING_SDL")
        );
    }

    #[test]
    fn test_deserialize_string_or_list() {
        #[derive(Deserialize)]
        struct Holder {
            depend: DependencyExpr,
        }

        let single: Holder = toml::from_str(r#"depend = "RT_USING_DFS""#).unwrap();
        assert_eq!(single.depend, DependencyExpr::Single("RT_USING_DFS".into()));

        let many: Holder = toml::from_str(r#"depend = ["A", ""]"#).unwrap();
        assert_eq!(many.depend, DependencyExpr::from(vec!["A", ""]));
    }
}
