//! Input records
//!
//! [`Record`] is the boundary type for remapping input. Typed objects are
//! flattened to their own fields through `serde::Serialize`, so every
//! record-like variant converts into one [`serde_json::Value`] view.

use crate::error::RemapError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Remapping input
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Plain key/value structure
    Map(Map<String, Value>),
    /// Positional list
    List(Vec<Value>),
    /// Typed object flattened to its own fields
    Object {
        type_name: &'static str,
        fields: Map<String, Value>,
    },
    /// Bool, number, string or null
    Scalar(Value),
}

impl Record {
    /// Flatten a typed object into its own fields
    ///
    /// Objects without fields (unit structs) become an empty object record.
    ///
    /// # Errors
    /// Returns [`RemapError::UnsupportedInput`] if the object cannot be serialized.
    pub fn from_object<T: Serialize + ?Sized>(object: &T) -> Result<Self, RemapError> {
        let type_name = std::any::type_name::<T>();
        let value = serde_json::to_value(object)
            .map_err(|e| RemapError::unsupported(type_name, e.to_string()))?;

        Ok(match value {
            Value::Object(fields) => Self::Object { type_name, fields },
            Value::Null => Self::Object {
                type_name,
                fields: Map::new(),
            },
            other => Self::from(other),
        })
    }

    /// Whether the record can be remapped (anything but a scalar)
    #[inline]
    #[must_use]
    pub fn is_record_like(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    /// Short type description for diagnostics
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Object { type_name, .. } => *type_name,
            Self::Scalar(value) => value_kind(value),
        }
    }

    /// Key/value view of the record
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Map(map) | Self::Object { fields: map, .. } => Value::Object(map),
            Self::List(items) => Value::Array(items),
            Self::Scalar(value) => value,
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(map),
            Value::Array(items) => Self::List(items),
            scalar => Self::Scalar(scalar),
        }
    }
}

/// Whether a generic value is record-like (map or list)
#[inline]
#[must_use]
pub fn is_record_like(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Short kind name of a generic value
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Sample {
        foo: &'static str,
        bar: u32,
    }

    #[derive(Serialize)]
    struct Marker;

    #[test]
    fn from_value_variants() {
        assert!(matches!(Record::from(json!({"a": 1})), Record::Map(_)));
        assert!(matches!(Record::from(json!([1, 2])), Record::List(_)));
        assert!(matches!(Record::from(json!("a")), Record::Scalar(_)));
    }

    #[test]
    fn record_like_predicate() {
        assert!(Record::from(json!({})).is_record_like());
        assert!(Record::from(json!([])).is_record_like());
        assert!(!Record::from(json!(true)).is_record_like());
        assert!(!Record::from(json!(1)).is_record_like());
        assert!(!Record::from(json!(1.5)).is_record_like());
        assert!(!Record::from(json!("foo")).is_record_like());
    }

    #[test]
    fn object_flattens_own_fields() {
        let record = Record::from_object(&Sample { foo: "bar", bar: 123 }).unwrap();
        assert!(record.is_record_like());
        assert!(record.type_name().ends_with("Sample"));
        assert_eq!(record.into_value(), json!({"foo": "bar", "bar": 123}));
    }

    #[test]
    fn unit_object_is_empty_record() {
        let record = Record::from_object(&Marker).unwrap();
        assert!(record.is_record_like());
        assert_eq!(record.into_value(), json!({}));
    }

    #[test]
    fn scalar_type_name() {
        assert_eq!(Record::from(json!(2)).type_name(), "number");
        assert_eq!(value_kind(&json!(null)), "null");
    }
}
