//! Remap Path
//!
//! Property path notation and value access for the remapping layer.
//!
//! # Core Concepts
//!
//! - [`canonicalize`]: dotted/mixed notation → canonical bracket notation
//! - [`PropertyPath`]: parsed path, displayed in canonical form
//! - [`PathAccessor`]: read/write capability over nested values
//! - [`JsonAccessor`]: default accessor over [`serde_json::Value`]
//!
//! # Example
//!
//! ```rust
//! use remap_path::{canonicalize, JsonAccessor, PathAccessor};
//! use serde_json::json;
//!
//! let path = canonicalize("data[0].foo");
//! assert_eq!(path, "[data][0][foo]");
//!
//! let mut output = json!({});
//! JsonAccessor::new().set_value(&mut output, &path, json!("bar")).unwrap();
//! assert_eq!(output, json!({"data": [{"foo": "bar"}]}));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod accessor;
mod notation;
mod path;

// Re-exports
pub use accessor::{AccessError, JsonAccessor, PathAccessor, MAX_LIST_PADDING};
pub use notation::{canonicalize, is_canonical};
pub use path::{as_index, PathError, PropertyPath};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
