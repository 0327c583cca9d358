//! Tag-based migration selection
//!
//! A migration declares zero or more [`TagGroup`]s, either directly or through
//! its base chain. A run requests a set of tags; the migration is selected
//! when it has no tags at all, or when its flattened groups match the request:
//!
//! - All `RequireAll` groups are merged into one required union. They match
//!   when the union is non-empty and every requested tag falls inside it.
//! - A `RequireAny` group matches when it shares at least one tag with the
//!   request, regardless of what else was requested.
//!
//! An empty request never matches a tagged migration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the tag names of a group are compared against the requested tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchBehavior {
    /// Requested tags must stay within the union of all RequireAll groups
    #[default]
    RequireAll,
    /// At least one tag of the group must be requested
    RequireAny,
}

/// A set of case-sensitive tag names plus its match behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    /// Tag names, in declaration order
    pub names: Vec<String>,

    /// Match behavior for this group
    #[serde(default)]
    pub behavior: MatchBehavior,
}

impl TagGroup {
    /// Create a group with an explicit behavior
    pub fn new<I, S>(behavior: MatchBehavior, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            behavior,
        }
    }

    /// Create a `RequireAll` group
    pub fn require_all<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MatchBehavior::RequireAll, names)
    }

    /// Create a `RequireAny` group
    pub fn require_any<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MatchBehavior::RequireAny, names)
    }

    fn intersects(&self, requested: &HashSet<&str>) -> bool {
        self.names.iter().any(|n| requested.contains(n.as_str()))
    }
}

/// Whether any tag group was declared at all.
///
/// A group declared without names still counts: such a migration is tagged
/// and therefore only runs when a request matches it.
pub fn has_tags(groups: &[TagGroup]) -> bool {
    !groups.is_empty()
}

/// Evaluate flattened tag groups against the requested tags.
pub fn matches_tags<S: AsRef<str>>(groups: &[TagGroup], requested: &[S]) -> bool {
    if requested.is_empty() {
        return false;
    }

    let requested: HashSet<&str> = requested.iter().map(AsRef::as_ref).collect();

    let required_union: HashSet<&str> = groups
        .iter()
        .filter(|g| g.behavior == MatchBehavior::RequireAll)
        .flat_map(|g| g.names.iter().map(String::as_str))
        .collect();

    let matches_all = !required_union.is_empty() && requested.is_subset(&required_union);

    let matches_any = groups
        .iter()
        .filter(|g| g.behavior == MatchBehavior::RequireAny)
        .any(|g| g.intersects(&requested));

    matches_all || matches_any
}

/// Selection filter: untagged migrations always run, tagged ones must match.
pub fn is_selected<S: AsRef<str>>(groups: &[TagGroup], requested: &[S]) -> bool {
    !has_tags(groups) || matches_tags(groups, requested)
}

#[cfg(test)]
#[path = "tags_test.rs"]
mod tests;
