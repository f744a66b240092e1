//! Property-path normalizer
//!
//! [`PropertyPathNormalizer`] projects selected fields of a record onto a
//! different shape using a [`PathMapping`](crate::PathMapping):
//!
//! 1. the caller context is merged over the instance default
//! 2. an empty mapping falls back to the serializer (or yields `{}`)
//! 3. each resolved source path is read, optionally normalized through the
//!    serializer, and written at its target path
//! 4. denormalization remaps first, then hands the result to the
//!    serializer's denormalizer
//!
//! Calls made back into the serializer are guarded so the serializer never
//! dispatches them to this normalizer again.

use crate::capability::{Denormalizer, Normalizer, Serializer, SerializerAware};
use crate::context::{ContextMap, RemapContext, UnreadableSource};
use crate::error::RemapError;
use crate::guard::ReentrancyGuard;
use crate::record::{is_record_like, value_kind, Record};
use parking_lot::RwLock;
use remap_path::{JsonAccessor, PathAccessor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Remapping normalizer
///
/// Register it in a [`NormalizerChain`](crate::NormalizerChain) (which
/// injects itself as the serializer) or call [`attach`](Self::attach) with
/// any [`Serializer`].
///
/// One (de)normalization per instance may be in flight at a time: the
/// reentrancy flags are instance state and do not tell concurrent callers
/// apart.
pub struct PropertyPathNormalizer {
    default_context: RemapContext,
    accessor: Arc<dyn PathAccessor>,
    serializer: RwLock<Option<Weak<dyn Serializer>>>,
    guard: ReentrancyGuard,
}

impl PropertyPathNormalizer {
    /// Create normalizer using [`JsonAccessor`]
    #[must_use]
    pub fn new(default_context: RemapContext) -> Self {
        Self::with_accessor(default_context, Arc::new(JsonAccessor::new()))
    }

    /// Create normalizer with custom path accessor
    #[must_use]
    pub fn with_accessor(default_context: RemapContext, accessor: Arc<dyn PathAccessor>) -> Self {
        Self {
            default_context,
            accessor,
            serializer: RwLock::new(None),
            guard: ReentrancyGuard::new(),
        }
    }

    /// Instance default context
    #[inline]
    #[must_use]
    pub fn default_context(&self) -> &RemapContext {
        &self.default_context
    }

    /// Inject a serializer (held weakly)
    pub fn attach<S: Serializer + 'static>(&self, serializer: &Arc<S>) {
        let handle: Weak<dyn Serializer> = Arc::<S>::downgrade(serializer);
        self.set_serializer(handle);
    }

    /// Whether `record` can be normalized right now
    #[must_use]
    pub fn supports_record(&self, record: &Record) -> bool {
        record.is_record_like() && !self.guard.is_normalizing()
    }

    /// Normalize a record according to the merged context
    ///
    /// # Errors
    /// - [`RemapError::Configuration`] if no serializer is attached
    /// - [`RemapError::PathRead`] / [`RemapError::PathWrite`] on accessor failures
    /// - any error returned by the serializer
    pub fn normalize_record(
        &self,
        record: Record,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<Value, RemapError> {
        let context = self.default_context.merge(context);
        let serializer = self.serializer()?;
        self.remap(serializer.as_ref(), record, format, &context)
    }

    /// Normalize a typed object through its own fields
    ///
    /// # Errors
    /// See [`normalize_record`](Self::normalize_record).
    pub fn normalize_object<T: Serialize + ?Sized>(
        &self,
        object: &T,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<Value, RemapError> {
        self.normalize_record(Record::from_object(object)?, format, context)
    }

    /// Remap a record, then denormalize it into `type_name`
    ///
    /// # Errors
    /// - [`RemapError::Configuration`] if the serializer is missing or cannot
    ///   denormalize (checked before any path is read)
    /// - [`RemapError::UnsupportedInput`] if the denormalizer refuses the data
    /// - any error from the remapping step or the denormalizer
    pub fn denormalize_record(
        &self,
        record: Record,
        type_name: &str,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<Value, RemapError> {
        let context = self.default_context.merge(context);
        let serializer = self.serializer()?;
        let Some(denormalizer) = serializer.as_denormalizer() else {
            return Err(RemapError::Configuration(
                "cannot denormalize data because the injected serializer is not a denormalizer"
                    .to_string(),
            ));
        };

        let normalized = self.remap(serializer.as_ref(), record, format, &context)?;

        let _scope = self.guard.denormalizing();
        if !denormalizer.supports_denormalization(&normalized, type_name, format) {
            return Err(RemapError::unsupported(
                type_name,
                format!(
                    "the serializer has no other denormalizer for {} data",
                    value_kind(&normalized)
                ),
            ));
        }
        debug!(type_name, "delegating remapped data to the denormalizer");
        denormalizer.denormalize(normalized, type_name, format, context.denormalization())
    }

    /// Remap a record and deserialize the denormalized result into `T`
    ///
    /// # Errors
    /// See [`denormalize_record`](Self::denormalize_record); a result that
    /// does not deserialize into `T` is [`RemapError::UnsupportedInput`].
    pub fn denormalize_as<T: DeserializeOwned>(
        &self,
        record: Record,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<T, RemapError> {
        let type_name = std::any::type_name::<T>();
        let value = self.denormalize_record(record, type_name, format, context)?;
        serde_json::from_value(value).map_err(|e| RemapError::unsupported(type_name, e.to_string()))
    }

    fn serializer(&self) -> Result<Arc<dyn Serializer>, RemapError> {
        self.serializer
            .read()
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| {
                RemapError::Configuration(
                    "cannot normalize data because no serializer has been injected".to_string(),
                )
            })
    }

    /// Apply the merged context to a record
    fn remap(
        &self,
        serializer: &dyn Serializer,
        record: Record,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<Value, RemapError> {
        let paths = context.resolved_paths();

        if paths.is_empty() {
            if context.fallback_normalization() {
                debug!(record = record.type_name(), "no property mapping, delegating to the serializer");
                let _scope = self.guard.normalizing();
                return serializer.normalize(&record.into_value(), format, context.normalization());
            }
            return Ok(empty());
        }

        let Some(data) = self.input_view(serializer, record, format, context)? else {
            return Ok(empty());
        };

        debug!(entries = paths.len(), "remapping record");
        let mut normalized = empty();
        for path in &paths {
            let value = if self.accessor.is_readable(&data, &path.source_path) {
                let value = self
                    .accessor
                    .get_value(&data, &path.source_path)
                    .map_err(|source| RemapError::PathRead {
                        path: path.source.clone(),
                        source,
                    })?;
                if context.property_value_normalization() {
                    self.normalize_value(serializer, value, format, context)?
                } else {
                    value
                }
            } else {
                match context.unreadable_source() {
                    UnreadableSource::Null => Value::Null,
                    UnreadableSource::Skip => {
                        trace!(source = %path.source, "source path not readable, skipping");
                        continue;
                    }
                }
            };

            if !self.accessor.is_writable(&normalized, &path.target_path) {
                trace!(target_path = %path.target, "target path not writable, skipping");
                continue;
            }

            self.accessor
                .set_value(&mut normalized, &path.target_path, value)
                .map_err(|source| RemapError::PathWrite {
                    source_path: path.source.clone(),
                    target_path: path.target.clone(),
                    source,
                })?;
        }

        Ok(normalized)
    }

    /// Key/value view to read source paths from; `None` if there is nothing to map
    fn input_view(
        &self,
        serializer: &dyn Serializer,
        record: Record,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<Option<Value>, RemapError> {
        if !record.is_record_like() {
            return Ok(None);
        }

        let data = record.into_value();
        if !context.input_normalization() {
            return Ok(Some(data));
        }

        let normalized = {
            let _scope = self.guard.normalizing();
            serializer.normalize(&data, format, context.normalization())?
        };
        Ok(is_record_like(&normalized).then_some(normalized))
    }

    fn normalize_value(
        &self,
        serializer: &dyn Serializer,
        value: Value,
        format: Option<&str>,
        context: &RemapContext,
    ) -> Result<Value, RemapError> {
        let _scope = self.guard.normalizing();
        if serializer.supports_normalization(&value, format) {
            serializer.normalize(&value, format, context.normalization())
        } else {
            Ok(value)
        }
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

impl fmt::Debug for PropertyPathNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyPathNormalizer")
            .field("default_context", &self.default_context)
            .field("serializer_attached", &self.serializer.read().is_some())
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl Normalizer for PropertyPathNormalizer {
    fn supports_normalization(&self, data: &Value, _format: Option<&str>) -> bool {
        is_record_like(data) && !self.guard.is_normalizing()
    }

    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        let context = RemapContext::from_map(context)?;
        self.normalize_record(Record::from(data.clone()), format, &context)
    }
}

impl Denormalizer for PropertyPathNormalizer {
    fn supports_denormalization(
        &self,
        data: &Value,
        _type_name: &str,
        format: Option<&str>,
    ) -> bool {
        self.supports_normalization(data, format) && !self.guard.is_denormalizing()
    }

    fn denormalize(
        &self,
        data: Value,
        type_name: &str,
        format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        let context = RemapContext::from_map(context)?;
        self.denormalize_record(Record::from(data), type_name, format, &context)
    }
}

impl SerializerAware for PropertyPathNormalizer {
    fn set_serializer(&self, serializer: Weak<dyn Serializer>) {
        *self.serializer.write() = Some(serializer);
    }
}
