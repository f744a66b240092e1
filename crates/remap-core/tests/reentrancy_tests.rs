//! Reentrancy flags observed from inside delegated calls

use parking_lot::Mutex;
use remap_core::prelude::*;
use remap_core::ContextMap;
use serde_json::{json, Value};
use std::sync::Arc;

/// Identity (de)normalizer that records whether the remapper accepts work
/// while a delegated call is in flight
struct Probe {
    remapper: Arc<PropertyPathNormalizer>,
    seen_normalizing: Mutex<Vec<bool>>,
    seen_denormalizing: Mutex<Vec<bool>>,
}

impl Probe {
    fn new(remapper: Arc<PropertyPathNormalizer>) -> Self {
        Self {
            remapper,
            seen_normalizing: Mutex::new(Vec::new()),
            seen_denormalizing: Mutex::new(Vec::new()),
        }
    }
}

impl Normalizer for Probe {
    fn supports_normalization(&self, _data: &Value, _format: Option<&str>) -> bool {
        true
    }

    fn normalize(&self, data: &Value, _: Option<&str>, _: &ContextMap) -> Result<Value, RemapError> {
        self.seen_normalizing
            .lock()
            .push(self.remapper.supports_normalization(&json!({}), None));
        if data == &json!("explode") {
            return Err(RemapError::Normalization("explode".to_string()));
        }
        Ok(data.clone())
    }
}

impl Denormalizer for Probe {
    fn supports_denormalization(&self, data: &Value, _: &str, _: Option<&str>) -> bool {
        data.is_object()
    }

    fn denormalize(&self, data: Value, _: &str, _: Option<&str>, _: &ContextMap) -> Result<Value, RemapError> {
        self.seen_denormalizing
            .lock()
            .push(self.remapper.supports_denormalization(&json!({}), "Probe", None));
        Ok(data)
    }
}

fn setup(context: RemapContext) -> (Arc<PropertyPathNormalizer>, Arc<Probe>, Arc<NormalizerChain>) {
    let remapper = Arc::new(PropertyPathNormalizer::new(context));
    let probe = Arc::new(Probe::new(remapper.clone()));
    let chain = NormalizerChain::builder()
        .aware(remapper.clone())
        .bidirectional(probe.clone())
        .build();
    (remapper, probe, chain)
}

#[test]
fn remapper_declines_during_leaf_normalization() {
    let (remapper, probe, _chain) =
        setup(RemapContext::new().with_mapping(PathMapping::new().with("a", "b").with("c", "d")));

    remapper
        .normalize_record(Record::from(json!({"a": 1, "c": 2})), None, &RemapContext::new())
        .unwrap();

    assert_eq!(*probe.seen_normalizing.lock(), vec![false, false]);
    assert!(remapper.supports_normalization(&json!({}), None));
}

#[test]
fn remapper_declines_during_fallback() {
    let (remapper, probe, _chain) = setup(RemapContext::new());

    let output = remapper
        .normalize_record(Record::from(json!({"a": 1})), None, &RemapContext::new())
        .unwrap();

    assert_eq!(output, json!({"a": 1}));
    assert_eq!(*probe.seen_normalizing.lock(), vec![false]);
}

#[test]
fn flag_is_lowered_after_failed_delegate() {
    let (remapper, _probe, _chain) =
        setup(RemapContext::new().with_mapping(PathMapping::new().with("a", "b")));

    let err = remapper
        .normalize_record(Record::from(json!({"a": "explode"})), None, &RemapContext::new())
        .unwrap_err();

    assert!(matches!(err, RemapError::Normalization(_)));
    assert!(remapper.supports_normalization(&json!({}), None));
    assert!(remapper.supports_denormalization(&json!({}), "Probe", None));
}

#[test]
fn remapper_declines_during_denormalization_delegate() {
    let (remapper, probe, _chain) =
        setup(RemapContext::new().with_mapping(PathMapping::new().with("a", "b")));

    let output = remapper
        .denormalize_record(Record::from(json!({"a": 1})), "Probe", None, &RemapContext::new())
        .unwrap();

    assert_eq!(output, json!({"b": 1}));
    assert_eq!(*probe.seen_denormalizing.lock(), vec![false]);
    assert!(remapper.supports_denormalization(&json!({}), "Probe", None));
}

#[test]
fn chain_dispatch_does_not_loop_back_into_remapper() {
    let (_remapper, probe, chain) =
        setup(RemapContext::new().with_mapping(PathMapping::new().with("a", "b")));

    let output = chain
        .normalize(&json!({"a": {"nested": true}}), None, &ContextMap::new())
        .unwrap();

    // The nested map is record-like but is handled by the probe, not remapped
    assert_eq!(output, json!({"b": {"nested": true}}));
    assert_eq!(probe.seen_normalizing.lock().len(), 1);
}
