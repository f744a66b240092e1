//! Serializer capabilities
//!
//! Small traits through which the remapper talks to the rest of a
//! serialization pipeline. Implementations decide per value whether they
//! apply (`supports_*`) and then perform the conversion.

use crate::context::ContextMap;
use crate::error::RemapError;
use serde_json::Value;
use std::sync::Weak;

/// Converts values into their generic form
pub trait Normalizer: Send + Sync {
    /// Whether this normalizer handles `data`
    fn supports_normalization(&self, data: &Value, format: Option<&str>) -> bool;

    /// Normalize `data`
    ///
    /// # Errors
    /// Implementation specific; see [`RemapError`].
    fn normalize(
        &self,
        data: &Value,
        format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError>;
}

/// Builds typed results from generic data
///
/// Typed results are returned in generic form; callers deserialize them
/// into the concrete type named by `type_name`.
pub trait Denormalizer: Send + Sync {
    /// Whether this denormalizer builds `type_name` from `data`
    fn supports_denormalization(&self, data: &Value, type_name: &str, format: Option<&str>)
        -> bool;

    /// Denormalize `data` into `type_name`
    ///
    /// # Errors
    /// Implementation specific; see [`RemapError`].
    fn denormalize(
        &self,
        data: Value,
        type_name: &str,
        format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError>;
}

/// Serializer injected into the remapper
///
/// Always a normalizer; exposes denormalization when it supports it.
pub trait Serializer: Normalizer {
    /// Denormalization capability, if any
    fn as_denormalizer(&self) -> Option<&dyn Denormalizer> {
        None
    }
}

/// Components that call back into the serializer that owns them
///
/// The handle is weak: the serializer usually owns the component.
pub trait SerializerAware: Send + Sync {
    /// Inject the owning serializer
    fn set_serializer(&self, serializer: Weak<dyn Serializer>);
}
