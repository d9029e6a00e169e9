//! Registry of admitted build groups.

use crate::core::group::BuildGroup;

/// Admitted groups, in declaration order. Groups are never removed.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: Vec<BuildGroup>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        GroupRegistry::default()
    }

    /// Append an admitted group and return the stored descriptor.
    pub(crate) fn record(&mut self, group: BuildGroup) -> &BuildGroup {
        self.groups.push(group);
        &self.groups[self.groups.len() - 1]
    }

    pub fn groups(&self) -> &[BuildGroup] {
        &self.groups
    }

    /// All groups declared under `name`. Names need not be unique.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BuildGroup> {
        self.groups.iter().filter(move |g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of sources across all groups.
    pub fn source_count(&self) -> usize {
        self.groups.iter().map(|g| g.sources.len()).sum()
    }
}
