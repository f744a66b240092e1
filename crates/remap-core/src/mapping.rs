//! Property mappings and their resolution into path pairs
//!
//! A [`PathMapping`] is an ordered table of path expressions. Which side of
//! an entry is read from and which is written to depends on the mapping
//! direction; [`resolve`] turns the table into [`ResolvedPath`] pairs.

use indexmap::IndexMap;
use remap_path::{canonicalize, is_canonical};
use serde::{Deserialize, Serialize};

/// Ordered mapping between path expressions
///
/// Insertion order is the order in which entries are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathMapping(IndexMap<String, String>);

impl PathMapping {
    /// Create empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add an entry, returning the previous value for `key`
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style entry
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if mapping is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Effective source/target pair for one mapping entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Source expression as written in the mapping
    pub source: String,
    /// Target expression as written in the mapping
    pub target: String,
    /// Canonical source path
    pub source_path: String,
    /// Canonical target path
    pub target_path: String,
}

impl ResolvedPath {
    fn new(source: &str, target: &str) -> Self {
        let source_path = canonicalize(source);
        let target_path = canonicalize(target);
        debug_assert!(is_canonical(&source_path) && is_canonical(&target_path));
        Self {
            source: source.to_string(),
            target: target.to_string(),
            source_path,
            target_path,
        }
    }
}

/// Resolve mapping entries into source/target pairs
///
/// With `value_as_normalized_path` the entry value is the target and the key
/// the source; otherwise the roles invert. A self-mapping entry resolves
/// both sides to the same path. Readability and writability are left to the
/// accessor.
#[must_use]
pub fn resolve(mapping: &PathMapping, value_as_normalized_path: bool) -> Vec<ResolvedPath> {
    mapping
        .iter()
        .map(|(key, value)| {
            let target = if value_as_normalized_path { value } else { key };
            let source = if key == target { value } else { key };
            ResolvedPath::new(source, target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(resolved: &[ResolvedPath]) -> Vec<(&str, &str)> {
        resolved
            .iter()
            .map(|p| (p.source_path.as_str(), p.target_path.as_str()))
            .collect()
    }

    #[test]
    fn mapping_preserves_insertion_order() {
        let mapping = PathMapping::new().with("z", "a").with("a", "z").with("m", "m");
        let keys: Vec<_> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn mapping_insert_replaces_value() {
        let mut mapping = PathMapping::new();
        assert_eq!(mapping.insert("foo", "bar"), None);
        assert_eq!(mapping.insert("foo", "baz"), Some("bar".to_string()));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn resolve_value_as_target() {
        let mapping: PathMapping = [("foo", "bar"), ("bar", "baz")].into_iter().collect();
        let resolved = resolve(&mapping, true);
        assert_eq!(pairs(&resolved), vec![("[foo]", "[bar]"), ("[bar]", "[baz]")]);
    }

    #[test]
    fn resolve_key_as_target() {
        let mapping = PathMapping::new().with("foo", "data[0].foo");
        let resolved = resolve(&mapping, false);
        assert_eq!(pairs(&resolved), vec![("[data][0][foo]", "[foo]")]);
        assert_eq!(resolved[0].source, "data[0].foo");
        assert_eq!(resolved[0].target, "foo");
    }

    #[test]
    fn resolve_self_mapping_both_directions() {
        let mapping = PathMapping::new().with("a.b", "a.b");
        for direction in [true, false] {
            let resolved = resolve(&mapping, direction);
            assert_eq!(pairs(&resolved), vec![("[a][b]", "[a][b]")]);
        }
    }

    #[test]
    fn resolve_canonicalizes_both_sides() {
        let mapping = PathMapping::new().with("user.name", "[profile][0].display");
        let resolved = resolve(&mapping, true);
        assert_eq!(resolved[0].source_path, "[user][name]");
        assert_eq!(resolved[0].target_path, "[profile][0][display]");
    }

    #[test]
    fn resolve_empty() {
        assert!(resolve(&PathMapping::new(), true).is_empty());
    }

    #[test]
    fn mapping_serde_keeps_order() {
        let mapping: PathMapping = serde_json::from_str(r#"{"b": "1", "a": "2"}"#).unwrap();
        let keys: Vec<_> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"b":"1","a":"2"}"#);
    }
}
