use crate::capability::{Denormalizer, Normalizer};
use crate::context::ContextMap;
use crate::error::RemapError;
use crate::record::is_record_like;
use serde_json::Value;

/// Identity normalizer
///
/// Normalizes any value to itself. Denormalizes structured data (maps and
/// lists) for any type name, leaving deserialization to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueNormalizer;

impl ValueNormalizer {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for ValueNormalizer {
    fn supports_normalization(&self, _data: &Value, _format: Option<&str>) -> bool {
        true
    }

    fn normalize(
        &self,
        data: &Value,
        _format: Option<&str>,
        _context: &ContextMap,
    ) -> Result<Value, RemapError> {
        Ok(data.clone())
    }
}

impl Denormalizer for ValueNormalizer {
    fn supports_denormalization(&self, data: &Value, _type_name: &str, _format: Option<&str>) -> bool {
        is_record_like(data)
    }

    fn denormalize(
        &self,
        data: Value,
        _type_name: &str,
        _format: Option<&str>,
        _context: &ContextMap,
    ) -> Result<Value, RemapError> {
        Ok(data)
    }
}
