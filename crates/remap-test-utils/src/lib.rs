//! Testing utilities for the remap workspace
//!
//! Shared serializer doubles, fixtures and tracing setup.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use remap_core::{ContextMap, Denormalizer, Normalizer, RemapError, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Call observed by a [`RecordingSerializer`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Normalize { data: Value, context: ContextMap },
    Denormalize { data: Value, type_name: String, context: ContextMap },
}

/// Serializer double that records every call
///
/// Normalization returns the input unchanged unless a fixed response is set.
#[derive(Debug, Default)]
pub struct RecordingSerializer {
    calls: Mutex<Vec<RecordedCall>>,
    response: Option<Value>,
    denormalizes: bool,
    rejects_denormalization: bool,
}

impl RecordingSerializer {
    /// Normalizer and denormalizer
    pub fn new() -> Self {
        Self {
            denormalizes: true,
            ..Self::default()
        }
    }

    /// Normalizer only; [`Serializer::as_denormalizer`] returns `None`
    pub fn normalizer_only() -> Self {
        Self::default()
    }

    /// Denormalizer that refuses every input
    pub fn rejecting_denormalization() -> Self {
        Self {
            rejects_denormalization: true,
            ..Self::new()
        }
    }

    /// Answer every normalization with `response`
    #[must_use]
    pub fn responding(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn normalize_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Normalize { .. }))
            .count()
    }
}

impl Normalizer for RecordingSerializer {
    fn supports_normalization(&self, _data: &Value, _format: Option<&str>) -> bool {
        true
    }

    fn normalize(
        &self,
        data: &Value,
        _format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        self.calls.lock().push(RecordedCall::Normalize {
            data: data.clone(),
            context: context.clone(),
        });
        Ok(self.response.clone().unwrap_or_else(|| data.clone()))
    }
}

impl Denormalizer for RecordingSerializer {
    fn supports_denormalization(&self, _data: &Value, _type_name: &str, _format: Option<&str>) -> bool {
        !self.rejects_denormalization
    }

    fn denormalize(
        &self,
        data: Value,
        type_name: &str,
        _format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        self.calls.lock().push(RecordedCall::Denormalize {
            data: data.clone(),
            type_name: type_name.to_string(),
            context: context.clone(),
        });
        Ok(data)
    }
}

impl Serializer for RecordingSerializer {
    fn as_denormalizer(&self) -> Option<&dyn Denormalizer> {
        self.denormalizes.then_some(self as &dyn Denormalizer)
    }
}

/// Typed record used by end-to-end tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub foo: String,
    pub bar: String,
    pub baz: DateTime<Utc>,
}

impl TestRecord {
    pub fn sample() -> Self {
        Self {
            foo: "foo".to_string(),
            bar: "bar".to_string(),
            baz: Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 30).unwrap(),
        }
    }
}

/// Two-key record used throughout the remapping tests
pub fn sample_record() -> Value {
    json!({"foo": "bar", "bar": "baz"})
}

/// Install a test tracing subscriber (honors `RUST_LOG`); safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
