//! Error types for the remapping layer
//!
//! Provides error handling for:
//! - Missing or incapable serializer injection
//! - Data refused by the downstream denormalizer
//! - Accessor failures while reading source or writing target paths
//! - Unparseable context bags

use remap_path::AccessError;

/// Main remapping error type
#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    /// Serializer missing or lacking a required capability
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Data shape not accepted for the requested type
    #[error("unsupported input for \"{type_name}\": {reason}")]
    UnsupportedInput { type_name: String, reason: String },

    /// Accessor failed to read a source path
    #[error("failed to read data value \"{path}\"")]
    PathRead {
        path: String,
        #[source]
        source: AccessError,
    },

    /// Accessor failed to write a target path
    #[error("failed to write value of source property \"{source_path}\" in target property \"{target_path}\"")]
    PathWrite {
        source_path: String,
        target_path: String,
        #[source]
        source: AccessError,
    },

    /// Context bag could not be parsed
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// Failure reported by a normalizer
    #[error("normalization failed: {0}")]
    Normalization(String),
}

impl RemapError {
    /// Create unsupported input error
    #[inline]
    pub fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedInput {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is a configuration problem
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if error came from the path accessor
    #[inline]
    #[must_use]
    pub fn is_path_error(&self) -> bool {
        matches!(self, Self::PathRead { .. } | Self::PathWrite { .. })
    }
}

impl From<serde_json::Error> for RemapError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidContext(err.to_string())
    }
}

impl From<serde_yaml::Error> for RemapError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::InvalidContext(err.to_string())
    }
}
