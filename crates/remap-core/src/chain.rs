//! Normalizer chain
//!
//! A [`NormalizerChain`] is the serializer side of the remapper: it keeps an
//! ordered list of normalizers and denormalizers and dispatches every call to
//! the first one that supports the data. Components registered through
//! [`ChainBuilder::aware`] receive a weak handle back to the chain.

use crate::capability::{Denormalizer, Normalizer, Serializer, SerializerAware};
use crate::context::ContextMap;
use crate::error::RemapError;
use crate::record::value_kind;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Ordered normalizer/denormalizer dispatch
pub struct NormalizerChain {
    normalizers: Vec<Arc<dyn Normalizer>>,
    denormalizers: Vec<Arc<dyn Denormalizer>>,
}

impl NormalizerChain {
    /// Start building a chain
    #[inline]
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// Number of registered normalizers
    #[inline]
    #[must_use]
    pub fn normalizer_count(&self) -> usize {
        self.normalizers.len()
    }

    /// Number of registered denormalizers
    #[inline]
    #[must_use]
    pub fn denormalizer_count(&self) -> usize {
        self.denormalizers.len()
    }

    fn find_normalizer(&self, data: &Value, format: Option<&str>) -> Option<&Arc<dyn Normalizer>> {
        self.normalizers
            .iter()
            .find(|n| n.supports_normalization(data, format))
    }

    fn find_denormalizer(
        &self,
        data: &Value,
        type_name: &str,
        format: Option<&str>,
    ) -> Option<&Arc<dyn Denormalizer>> {
        self.denormalizers
            .iter()
            .find(|d| d.supports_denormalization(data, type_name, format))
    }
}

impl fmt::Debug for NormalizerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizerChain")
            .field("normalizers", &self.normalizers.len())
            .field("denormalizers", &self.denormalizers.len())
            .finish()
    }
}

impl Normalizer for NormalizerChain {
    fn supports_normalization(&self, data: &Value, format: Option<&str>) -> bool {
        self.find_normalizer(data, format).is_some()
    }

    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        let Some(normalizer) = self.find_normalizer(data, format) else {
            return Err(RemapError::unsupported(
                value_kind(data),
                "no registered normalizer supports the value",
            ));
        };
        trace!(kind = value_kind(data), "dispatching normalization");
        normalizer.normalize(data, format, context)
    }
}

impl Denormalizer for NormalizerChain {
    fn supports_denormalization(&self, data: &Value, type_name: &str, format: Option<&str>) -> bool {
        self.find_denormalizer(data, type_name, format).is_some()
    }

    fn denormalize(
        &self,
        data: Value,
        type_name: &str,
        format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        let Some(denormalizer) = self.find_denormalizer(&data, type_name, format) else {
            return Err(RemapError::unsupported(
                type_name,
                format!("no registered denormalizer accepts {} data", value_kind(&data)),
            ));
        };
        trace!(type_name, "dispatching denormalization");
        denormalizer.denormalize(data, type_name, format, context)
    }
}

impl Serializer for NormalizerChain {
    fn as_denormalizer(&self) -> Option<&dyn Denormalizer> {
        Some(self)
    }
}

/// Builder for [`NormalizerChain`]
///
/// Registration order is dispatch order.
#[derive(Default)]
pub struct ChainBuilder {
    normalizers: Vec<Arc<dyn Normalizer>>,
    denormalizers: Vec<Arc<dyn Denormalizer>>,
    aware: Vec<Arc<dyn SerializerAware>>,
}

impl ChainBuilder {
    /// Register a normalizer
    #[must_use]
    pub fn normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizers.push(normalizer);
        self
    }

    /// Register a denormalizer
    #[must_use]
    pub fn denormalizer(mut self, denormalizer: Arc<dyn Denormalizer>) -> Self {
        self.denormalizers.push(denormalizer);
        self
    }

    /// Register a component on both sides
    #[must_use]
    pub fn bidirectional<T>(self, component: Arc<T>) -> Self
    where
        T: Normalizer + Denormalizer + 'static,
    {
        self.normalizer(component.clone()).denormalizer(component)
    }

    /// Register a component on both sides and inject the chain into it
    #[must_use]
    pub fn aware<T>(mut self, component: Arc<T>) -> Self
    where
        T: Normalizer + Denormalizer + SerializerAware + 'static,
    {
        self.aware.push(component.clone());
        self.bidirectional(component)
    }

    /// Build the chain and inject it into serializer-aware components
    #[must_use]
    pub fn build(self) -> Arc<NormalizerChain> {
        let Self {
            normalizers,
            denormalizers,
            aware,
        } = self;

        Arc::new_cyclic(|chain: &Weak<NormalizerChain>| {
            let handle: Weak<dyn Serializer> = chain.clone();
            for component in &aware {
                component.set_serializer(handle.clone());
            }
            NormalizerChain {
                normalizers,
                denormalizers,
            }
        })
    }
}

impl fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("normalizers", &self.normalizers.len())
            .field("denormalizers", &self.denormalizers.len())
            .field("aware", &self.aware.len())
            .finish()
    }
}
