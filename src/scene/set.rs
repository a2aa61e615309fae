//! Ordered, deduplicated sets of scene paths.

use std::collections::btree_set;
use std::collections::BTreeSet;

use super::Path;

/// A set of scene paths, each relative to some anchor location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathSet {
    paths: BTreeSet<Path>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path; returns false if it was already present.
    pub fn add_path(&mut self, path: Path) -> bool {
        self.paths.insert(path)
    }

    /// Insert every path of `other`, each prefixed with `prefix`.
    pub fn add_paths(&mut self, other: &PathSet, prefix: &[String]) {
        for path in &other.paths {
            let mut full = Vec::with_capacity(prefix.len() + path.len());
            full.extend_from_slice(prefix);
            full.extend_from_slice(path);
            self.paths.insert(full);
        }
    }

    pub fn contains(&self, path: &[String]) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Paths rendered as `/a/b` strings, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| format!("/{}", p.join("/")))
            .collect()
    }
}

impl FromIterator<Path> for PathSet {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = btree_set::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl IntoIterator for PathSet {
    type Item = Path;
    type IntoIter = btree_set::IntoIter<Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::path_from_str;

    #[test]
    fn test_add_with_prefix() {
        let mut child = PathSet::new();
        child.add_path(path_from_str("/x"));
        child.add_path(Vec::new());

        let mut set = PathSet::new();
        set.add_path(path_from_str("/a"));
        set.add_paths(&child, &["c".to_string()]);

        assert_eq!(set.to_strings(), vec!["/a", "/c", "/c/x"]);
        assert!(set.contains(&path_from_str("/c/x")));
        assert!(!set.add_path(path_from_str("/a")));
    }
}
