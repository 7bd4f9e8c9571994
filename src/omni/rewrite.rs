//! Literal output-name overrides.

use serde::{Deserialize, Serialize};

use crate::lookml::ObjectKind;

/// Rename a record whose name and resolved label match.
///
/// ```toml
/// [[mapping.rename]]
/// name = "count"
/// label_contains = "Total"
/// replacement = "total_count"
/// kind = "measure"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NameRewrite {
    /// Exact source name.
    pub name: String,
    /// Substring the resolved label must contain.
    pub label_contains: String,
    /// Output name to use instead.
    pub replacement: String,
    /// Restrict the rule to one object kind.
    #[serde(default)]
    pub kind: Option<ObjectKind>,
}

impl NameRewrite {
    pub fn new(
        name: impl Into<String>,
        label_contains: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label_contains: label_contains.into(),
            replacement: replacement.into(),
            kind: None,
        }
    }

    pub fn for_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, kind: ObjectKind, name: &str, label: &str) -> bool {
        self.kind.map_or(true, |k| k == kind)
            && self.name == name
            && label.contains(&self.label_contains)
    }
}

/// The first matching rule's replacement, if any.
pub fn resolve_name<'a>(
    rules: &'a [NameRewrite],
    kind: ObjectKind,
    name: &str,
    label: &str,
) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(kind, name, label))
        .map(|rule| rule.replacement.as_str())
}
