//! Remap Core
//!
//! Property-path remapping for a normalization pipeline. A
//! [`PropertyPathNormalizer`] reads values at source paths of a record and
//! writes them at target paths of a fresh output structure, delegating leaf
//! values and the final typed construction to an injected [`Serializer`].
//!
//! # Example
//!
//! ```rust
//! use remap_core::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let remapper = Arc::new(PropertyPathNormalizer::new(
//!     RemapContext::new().with_mapping(PathMapping::new().with("foo", "data[0].foo")),
//! ));
//! let _chain = NormalizerChain::builder()
//!     .aware(remapper.clone())
//!     .bidirectional(Arc::new(ValueNormalizer::new()))
//!     .build();
//!
//! let output = remapper
//!     .normalize_record(Record::from(json!({"foo": "bar"})), None, &RemapContext::new())
//!     .unwrap();
//! assert_eq!(output, json!({"data": [{"foo": "bar"}]}));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod capability;
pub mod chain;
pub mod context;
pub mod error;
mod guard;
pub mod mapping;
pub mod normalizers;
pub mod property_path;
pub mod record;

// Re-exports for convenience
pub use capability::{Denormalizer, Normalizer, Serializer, SerializerAware};
pub use chain::{ChainBuilder, NormalizerChain};
pub use context::{ContextMap, RemapContext, UnreadableSource};
pub use error::RemapError;
pub use mapping::{resolve, PathMapping, ResolvedPath};
pub use normalizers::{DateTimeNormalizer, ValueNormalizer};
pub use property_path::PropertyPathNormalizer;
pub use record::{is_record_like, Record};

pub use remap_path::{canonicalize, AccessError, JsonAccessor, PathAccessor};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Remap Core
    pub use crate::{
        DateTimeNormalizer, Denormalizer, NormalizerChain, Normalizer, PathMapping,
        PropertyPathNormalizer, Record, RemapContext, RemapError, Serializer, UnreadableSource,
        ValueNormalizer,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
