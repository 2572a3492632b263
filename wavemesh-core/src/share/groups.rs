//! Friend-group identifiers and display names.
//!
//! Group membership itself lives in the peer registry; the share
//! registry only stores opaque [`GroupId`]s and resolves names
//! through the [`GroupRegistry`] seam when a label is needed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── GroupId ──────────────────────────────────────────────────────

/// Opaque identifier of a friend group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── GroupRegistry ────────────────────────────────────────────────

/// Resolves group identifiers to human-readable names.
pub trait GroupRegistry {
    /// Display name for a group, if the registry knows it.
    fn group_name(&self, id: &GroupId) -> Option<String>;
}

/// Comma-separated list of group names for display.
///
/// Unknown groups fall back to their raw identifier so a stale id is
/// still visible rather than silently dropped.
pub fn group_label(registry: &dyn GroupRegistry, groups: &[GroupId]) -> String {
    groups
        .iter()
        .map(|g| registry.group_name(g).unwrap_or_else(|| g.as_str().to_owned()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── InMemoryGroups ───────────────────────────────────────────────

/// Simple map-backed registry for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryGroups {
    names: HashMap<GroupId, String>,
}

impl InMemoryGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or rename a group.
    pub fn insert(&mut self, id: GroupId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }
}

impl GroupRegistry for InMemoryGroups {
    fn group_name(&self, id: &GroupId) -> Option<String> {
        self.names.get(id).cloned()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_known_names() {
        let mut reg = InMemoryGroups::new();
        reg.insert(GroupId::new("g1"), "Family");
        reg.insert(GroupId::new("g2"), "Friends");

        let label = group_label(&reg, &[GroupId::new("g1"), GroupId::new("g2")]);
        assert_eq!(label, "Family, Friends");
    }

    #[test]
    fn label_falls_back_to_raw_id() {
        let reg = InMemoryGroups::new();
        let label = group_label(&reg, &[GroupId::new("dead-beef")]);
        assert_eq!(label, "dead-beef");
    }

    #[test]
    fn empty_group_list_gives_empty_label() {
        let reg = InMemoryGroups::new();
        assert_eq!(group_label(&reg, &[]), "");
    }
}
