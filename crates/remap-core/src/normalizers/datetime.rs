use crate::capability::{Denormalizer, Normalizer};
use crate::context::ContextMap;
use crate::error::RemapError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::Value;
use std::fmt::Write;

/// Context key holding the output format (strftime syntax)
pub const FORMAT_KEY: &str = "datetime_format";

/// Date-time leaf normalizer
///
/// Reformats RFC 3339 strings. The output format is taken from the
/// `datetime_format` context key, then from the instance default, then RFC 3339.
#[derive(Debug, Clone, Default)]
pub struct DateTimeNormalizer {
    format: Option<String>,
}

impl DateTimeNormalizer {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default output format
    #[must_use]
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    fn parse(data: &Value) -> Option<DateTime<FixedOffset>> {
        data.as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    fn render(&self, moment: &DateTime<FixedOffset>, context: &ContextMap) -> Result<String, RemapError> {
        let format = context
            .get(FORMAT_KEY)
            .and_then(Value::as_str)
            .or(self.format.as_deref());

        let Some(format) = format else {
            return Ok(moment.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        };

        let mut out = String::new();
        write!(out, "{}", moment.format(format))
            .map_err(|_| RemapError::Normalization(format!("invalid date-time format \"{format}\"")))?;
        Ok(out)
    }
}

impl Normalizer for DateTimeNormalizer {
    fn supports_normalization(&self, data: &Value, _format: Option<&str>) -> bool {
        Self::parse(data).is_some()
    }

    fn normalize(
        &self,
        data: &Value,
        _format: Option<&str>,
        context: &ContextMap,
    ) -> Result<Value, RemapError> {
        let moment = Self::parse(data)
            .ok_or_else(|| RemapError::Normalization(format!("not a date-time: {data}")))?;
        self.render(&moment, context).map(Value::String)
    }
}

impl Denormalizer for DateTimeNormalizer {
    fn supports_denormalization(&self, data: &Value, type_name: &str, _format: Option<&str>) -> bool {
        data.is_string() && type_name.contains("DateTime")
    }

    fn denormalize(
        &self,
        data: Value,
        type_name: &str,
        _format: Option<&str>,
        _context: &ContextMap,
    ) -> Result<Value, RemapError> {
        let moment = Self::parse(&data)
            .ok_or_else(|| RemapError::unsupported(type_name, format!("not an RFC 3339 date-time: {data}")))?;
        Ok(Value::String(moment.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(format: &str) -> ContextMap {
        let mut map = ContextMap::new();
        map.insert(FORMAT_KEY.to_string(), json!(format));
        map
    }

    #[test]
    fn supports_rfc3339_strings_only() {
        let normalizer = DateTimeNormalizer::new();
        assert!(normalizer.supports_normalization(&json!("2024-03-01T10:20:30Z"), None));
        assert!(!normalizer.supports_normalization(&json!("tomorrow"), None));
        assert!(!normalizer.supports_normalization(&json!(20240301), None));
    }

    #[test]
    fn default_output_is_rfc3339() {
        let normalizer = DateTimeNormalizer::new();
        let out = normalizer
            .normalize(&json!("2024-03-01T10:20:30+00:00"), None, &ContextMap::new())
            .unwrap();
        assert_eq!(out, json!("2024-03-01T10:20:30Z"));
    }

    #[test]
    fn context_format_overrides_instance_format() {
        let normalizer = DateTimeNormalizer::with_format("%H:%M");
        let value = json!("2024-03-01T10:20:30Z");

        assert_eq!(normalizer.normalize(&value, None, &ContextMap::new()).unwrap(), json!("10:20"));
        assert_eq!(
            normalizer.normalize(&value, None, &context("%Y-%m-%d")).unwrap(),
            json!("2024-03-01")
        );
    }

    #[test]
    fn invalid_format_is_an_error() {
        let normalizer = DateTimeNormalizer::new();
        let err = normalizer
            .normalize(&json!("2024-03-01T10:20:30Z"), None, &context("%Q"))
            .unwrap_err();
        assert!(matches!(err, RemapError::Normalization(_)));
    }

    #[test]
    fn denormalizes_for_datetime_types() {
        let normalizer = DateTimeNormalizer::new();
        let value = json!("2024-03-01T12:00:00+02:00");
        assert!(normalizer.supports_denormalization(&value, "chrono::DateTime<Utc>", None));
        assert!(!normalizer.supports_denormalization(&value, "String", None));
        assert_eq!(
            normalizer
                .denormalize(value, "DateTime", None, &ContextMap::new())
                .unwrap(),
            json!("2024-03-01T12:00:00+02:00")
        );
    }
}
