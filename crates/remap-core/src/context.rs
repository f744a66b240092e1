//! Remapping context
//!
//! [`RemapContext`] is the per-call configuration bag. Every option is
//! optional so that a caller-supplied context can be merged over an
//! instance default, the caller winning on each key that it sets.

use crate::error::RemapError;
use crate::mapping::{resolve, PathMapping, ResolvedPath};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque key/value context handed to normalizers
pub type ContextMap = Map<String, Value>;

static EMPTY_CONTEXT: Lazy<ContextMap> = Lazy::new(Map::new);

/// What to write when a mapped source path cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreadableSource {
    /// Write `null` at the target path
    #[default]
    Null,
    /// Write nothing; the target key is absent from the output
    Skip,
}

/// Remapping configuration
///
/// Unset options fall back to their defaults:
///
/// | option | default |
/// |---|---|
/// | `property_mapping` | empty |
/// | `value_as_normalized_path` | `true` |
/// | `fallback_normalization` | `true` |
/// | `property_value_normalization` | `true` |
/// | `input_normalization` | `false` |
/// | `unreadable_source` | `null` |
/// | `normalization` / `denormalization` | empty |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapContext {
    /// Mapping table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_mapping: Option<PathMapping>,
    /// Mapping values are target paths (keys are sources)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_as_normalized_path: Option<bool>,
    /// Delegate to the serializer when there is nothing to map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_normalization: Option<bool>,
    /// Normalize each extracted value through the serializer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value_normalization: Option<bool>,
    /// Normalize the whole input through the serializer before reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_normalization: Option<bool>,
    /// Policy for unreadable source paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreadable_source: Option<UnreadableSource>,
    /// Context for nested normalizer calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<ContextMap>,
    /// Context for the nested denormalizer call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denormalization: Option<ContextMap>,
}

impl RemapContext {
    /// Create empty context (all defaults)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from an opaque context map, ignoring unknown keys
    ///
    /// # Errors
    /// Returns [`RemapError::InvalidContext`] if a known key has the wrong shape.
    pub fn from_map(map: &ContextMap) -> Result<Self, RemapError> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }

    /// Parse from a JSON document
    ///
    /// # Errors
    /// Returns [`RemapError::InvalidContext`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, RemapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from a YAML document
    ///
    /// # Errors
    /// Returns [`RemapError::InvalidContext`] on malformed input.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RemapError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Convert into an opaque context map (only set options are present)
    ///
    /// # Errors
    /// Returns [`RemapError::InvalidContext`] if serialization fails.
    pub fn to_map(&self) -> Result<ContextMap, RemapError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(RemapError::InvalidContext(format!(
                "context serialized to a non-object value: {other}"
            ))),
        }
    }

    /// Merge `overrides` over `self`; every option set in `overrides` wins
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        Self {
            property_mapping: overrides
                .property_mapping
                .clone()
                .or_else(|| self.property_mapping.clone()),
            value_as_normalized_path: overrides
                .value_as_normalized_path
                .or(self.value_as_normalized_path),
            fallback_normalization: overrides
                .fallback_normalization
                .or(self.fallback_normalization),
            property_value_normalization: overrides
                .property_value_normalization
                .or(self.property_value_normalization),
            input_normalization: overrides.input_normalization.or(self.input_normalization),
            unreadable_source: overrides.unreadable_source.or(self.unreadable_source),
            normalization: overrides
                .normalization
                .clone()
                .or_else(|| self.normalization.clone()),
            denormalization: overrides
                .denormalization
                .clone()
                .or_else(|| self.denormalization.clone()),
        }
    }

    /// With mapping table
    #[inline]
    #[must_use]
    pub fn with_mapping(mut self, mapping: PathMapping) -> Self {
        self.property_mapping = Some(mapping);
        self
    }

    /// With mapping direction
    #[inline]
    #[must_use]
    pub fn with_value_as_normalized_path(mut self, enabled: bool) -> Self {
        self.value_as_normalized_path = Some(enabled);
        self
    }

    /// With fallback normalization
    #[inline]
    #[must_use]
    pub fn with_fallback_normalization(mut self, enabled: bool) -> Self {
        self.fallback_normalization = Some(enabled);
        self
    }

    /// With per-value normalization
    #[inline]
    #[must_use]
    pub fn with_property_value_normalization(mut self, enabled: bool) -> Self {
        self.property_value_normalization = Some(enabled);
        self
    }

    /// With whole-input normalization
    #[inline]
    #[must_use]
    pub fn with_input_normalization(mut self, enabled: bool) -> Self {
        self.input_normalization = Some(enabled);
        self
    }

    /// With unreadable source policy
    #[inline]
    #[must_use]
    pub fn with_unreadable_source(mut self, policy: UnreadableSource) -> Self {
        self.unreadable_source = Some(policy);
        self
    }

    /// With nested normalization context
    #[inline]
    #[must_use]
    pub fn with_normalization_context(mut self, context: ContextMap) -> Self {
        self.normalization = Some(context);
        self
    }

    /// With nested denormalization context
    #[inline]
    #[must_use]
    pub fn with_denormalization_context(mut self, context: ContextMap) -> Self {
        self.denormalization = Some(context);
        self
    }

    #[inline]
    #[must_use]
    pub fn value_as_normalized_path(&self) -> bool {
        self.value_as_normalized_path.unwrap_or(true)
    }

    #[inline]
    #[must_use]
    pub fn fallback_normalization(&self) -> bool {
        self.fallback_normalization.unwrap_or(true)
    }

    #[inline]
    #[must_use]
    pub fn property_value_normalization(&self) -> bool {
        self.property_value_normalization.unwrap_or(true)
    }

    #[inline]
    #[must_use]
    pub fn input_normalization(&self) -> bool {
        self.input_normalization.unwrap_or(false)
    }

    #[inline]
    #[must_use]
    pub fn unreadable_source(&self) -> UnreadableSource {
        self.unreadable_source.unwrap_or_default()
    }

    /// Nested normalization context (empty if unset)
    #[inline]
    #[must_use]
    pub fn normalization(&self) -> &ContextMap {
        self.normalization.as_ref().unwrap_or(&EMPTY_CONTEXT)
    }

    /// Nested denormalization context (empty if unset)
    #[inline]
    #[must_use]
    pub fn denormalization(&self) -> &ContextMap {
        self.denormalization.as_ref().unwrap_or(&EMPTY_CONTEXT)
    }

    /// Source/target pairs for this context, in mapping order
    #[must_use]
    pub fn resolved_paths(&self) -> Vec<ResolvedPath> {
        self.property_mapping
            .as_ref()
            .map(|mapping| resolve(mapping, self.value_as_normalized_path()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults() {
        let context = RemapContext::new();
        assert!(context.value_as_normalized_path());
        assert!(context.fallback_normalization());
        assert!(context.property_value_normalization());
        assert!(!context.input_normalization());
        assert_eq!(context.unreadable_source(), UnreadableSource::Null);
        assert!(context.normalization().is_empty());
        assert!(context.resolved_paths().is_empty());
    }

    #[test]
    fn merge_override_wins() {
        let defaults = RemapContext::new()
            .with_mapping(PathMapping::new().with("a", "b"))
            .with_fallback_normalization(false)
            .with_unreadable_source(UnreadableSource::Skip);
        let overrides = RemapContext::new()
            .with_mapping(PathMapping::new().with("x", "y"))
            .with_value_as_normalized_path(false);

        let merged = defaults.merge(&overrides);

        assert_eq!(merged.property_mapping, Some(PathMapping::new().with("x", "y")));
        assert!(!merged.value_as_normalized_path());
        assert!(!merged.fallback_normalization());
        assert_eq!(merged.unreadable_source(), UnreadableSource::Skip);
    }

    #[test]
    fn merge_replaces_sub_context_whole() {
        let mut inner = ContextMap::new();
        inner.insert("a".into(), json!(1));
        let defaults = RemapContext::new().with_normalization_context(inner);

        let mut other = ContextMap::new();
        other.insert("b".into(), json!(2));
        let merged = defaults.merge(&RemapContext::new().with_normalization_context(other));

        assert_eq!(Value::Object(merged.normalization().clone()), json!({"b": 2}));
    }

    #[test]
    fn merge_is_idempotent_over_defaults() {
        let defaults = RemapContext::new().with_input_normalization(true);
        let merged = defaults.merge(&RemapContext::new());
        assert_eq!(defaults.merge(&merged), merged);
    }

    #[test]
    fn from_map_ignores_unknown_keys() {
        let map = json!({
            "property_mapping": {"foo": "data.foo"},
            "value_as_normalized_path": false,
            "datetime_format": "%Y"
        });
        let Value::Object(map) = map else { unreachable!() };

        let context = RemapContext::from_map(&map).unwrap();
        assert!(!context.value_as_normalized_path());
        assert_eq!(context.property_mapping.unwrap().len(), 1);
    }

    #[test]
    fn from_map_rejects_wrong_shape() {
        let Value::Object(map) = json!({"fallback_normalization": "yes"}) else {
            unreachable!()
        };
        assert!(matches!(
            RemapContext::from_map(&map),
            Err(RemapError::InvalidContext(_))
        ));
    }

    #[test]
    fn from_yaml() {
        let yaml = r"
property_mapping:
  foo: data[0].foo
  bar: data[0].bar
unreadable_source: skip
normalization:
  datetime_format: '%Y-%m-%d'
";
        let context = RemapContext::from_yaml_str(yaml).unwrap();
        let pairs: Vec<_> = context
            .resolved_paths()
            .into_iter()
            .map(|p| (p.source_path, p.target_path))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("[foo]".to_string(), "[data][0][foo]".to_string()),
                ("[bar]".to_string(), "[data][0][bar]".to_string()),
            ]
        );
        assert_eq!(context.unreadable_source(), UnreadableSource::Skip);
        assert_eq!(context.normalization()["datetime_format"], json!("%Y-%m-%d"));
    }

    #[test]
    fn from_json_and_back_to_map() {
        let context =
            RemapContext::from_json_str(r#"{"property_mapping": {"a": "b"}, "input_normalization": true}"#)
                .unwrap();
        let map = context.to_map().unwrap();

        assert_eq!(
            Value::Object(map),
            json!({"property_mapping": {"a": "b"}, "input_normalization": true})
        );
    }
}
