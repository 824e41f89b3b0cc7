use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The de-duplicated set of remembered package paths.
///
/// Paths are compared as plain strings: no normalization, case-sensitive.
/// Entries are never re-validated, so a path may go stale after it was added.
/// Serialized as a JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathStore {
    paths: BTreeSet<String>,
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path. Returns `false` if it was already present.
    pub fn add(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    /// Remove a path. Returns `false` if it was not present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Iterate over the remembered paths in a stable (lexicographic) order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PathStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}
