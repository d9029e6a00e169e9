//! Compiled-object handles and the (possibly nested) target list.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Handle to one compiled object produced by the build engine.
///
/// Displays as the object path, which is what fragment pruning matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectHandle {
    /// Source file the object is built from
    pub source: PathBuf,
    /// Object file path
    pub output: PathBuf,
}

impl ObjectHandle {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        ObjectHandle {
            source: source.into(),
            output: output.into(),
        }
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.output.display())
    }
}

/// One entry of a target list: an object or a nested list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Target {
    Leaf(ObjectHandle),
    Group(Vec<Target>),
}

/// Result of a prune request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    /// The first matching object, now removed from the list
    Removed(ObjectHandle),
    NotFound,
}

impl PruneOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, PruneOutcome::Removed(_))
    }
}

/// Ordered collection of compiled objects for a build session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetList {
    items: Vec<Target>,
}

impl TargetList {
    pub fn new() -> Self {
        TargetList::default()
    }

    pub fn push(&mut self, handle: ObjectHandle) {
        self.items.push(Target::Leaf(handle));
    }

    pub fn extend(&mut self, handles: impl IntoIterator<Item = ObjectHandle>) {
        self.items.extend(handles.into_iter().map(Target::Leaf));
    }

    /// Append another list as a single nested entry.
    pub fn push_nested(&mut self, list: TargetList) {
        self.items.push(Target::Group(list.items));
    }

    pub fn items(&self) -> &[Target] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every object in depth-first order.
    pub fn leaves(&self) -> Vec<&ObjectHandle> {
        fn walk<'a>(items: &'a [Target], out: &mut Vec<&'a ObjectHandle>) {
            for item in items {
                match item {
                    Target::Leaf(handle) => out.push(handle),
                    Target::Group(children) => walk(children, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }

    pub fn object_count(&self) -> usize {
        self.leaves().len()
    }

    /// Remove the first object, depth-first, whose display string contains
    /// `fragment`.
    ///
    /// Only one object is removed per call.
    pub fn prune_by_fragment(&mut self, fragment: &str) -> PruneOutcome {
        match remove_first(&mut self.items, &|handle| handle.to_string().contains(fragment)) {
            Some(handle) => PruneOutcome::Removed(handle),
            None => PruneOutcome::NotFound,
        }
    }

    /// Remove the first object built from exactly `source`.
    pub fn remove_by_source(&mut self, source: &Path) -> PruneOutcome {
        match remove_first(&mut self.items, &|handle| handle.source == source) {
            Some(handle) => PruneOutcome::Removed(handle),
            None => PruneOutcome::NotFound,
        }
    }
}

impl From<Vec<ObjectHandle>> for TargetList {
    fn from(handles: Vec<ObjectHandle>) -> Self {
        let mut list = TargetList::new();
        list.extend(handles);
        list
    }
}

fn remove_first(
    items: &mut Vec<Target>,
    matches: &dyn Fn(&ObjectHandle) -> bool,
) -> Option<ObjectHandle> {
    for index in 0..items.len() {
        let hit = match &mut items[index] {
            Target::Group(children) => {
                if let Some(handle) = remove_first(children, matches) {
                    return Some(handle);
                }
                false
            }
            Target::Leaf(handle) => matches(handle),
        };

        if hit {
            if let Target::Leaf(handle) = items.remove(index) {
                return Some(handle);
            }
        }
    }
    None
}

/// Free-function form of [`TargetList::prune_by_fragment`].
pub fn prune_by_fragment(targets: &mut TargetList, fragment: &str) -> PruneOutcome {
    targets.prune_by_fragment(fragment)
}
