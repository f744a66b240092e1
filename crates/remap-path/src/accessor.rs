//! Path accessors
//!
//! [`PathAccessor`] reads and writes values at canonical property paths.
//! [`JsonAccessor`] is the default implementation over [`serde_json::Value`].

use crate::path::{as_index, PathError, PropertyPath};
use serde_json::{Map, Value};

/// Read/write access to nested values by property path
///
/// Paths are passed in canonical bracket notation (see
/// [`canonicalize`](crate::canonicalize)).
pub trait PathAccessor: Send + Sync {
    /// Whether a value exists at `path`
    fn is_readable(&self, data: &Value, path: &str) -> bool;

    /// Read the value at `path`
    ///
    /// # Errors
    /// Returns [`AccessError`] if the path is malformed or does not resolve.
    fn get_value(&self, data: &Value, path: &str) -> Result<Value, AccessError>;

    /// Whether `set_value` at `path` would succeed
    fn is_writable(&self, data: &Value, path: &str) -> bool;

    /// Write `value` at `path`, creating intermediate containers
    ///
    /// # Errors
    /// Returns [`AccessError`] if the path is malformed or crosses a value
    /// that cannot hold children.
    fn set_value(&self, data: &mut Value, path: &str, value: Value) -> Result<(), AccessError>;
}

/// Errors raised while accessing a path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Path expression could not be parsed
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// Nothing stored at the path
    #[error("no value at '{path}' (segment '{segment}' not found)")]
    NotFound { path: String, segment: String },

    /// Path cannot be written
    #[error("cannot write '{path}': {reason}")]
    NotWritable { path: String, reason: String },
}

/// Default accessor over JSON values
///
/// Object keys and list indices are addressed uniformly:
/// - numeric segments index lists and also match string keys in objects
/// - missing or `null` intermediate containers are created on write: a list
///   when the segment is numeric, an object otherwise
/// - writing past the end of a list pads it with `null`, by at most
///   [`MAX_LIST_PADDING`] entries
/// - the root itself is readable but not writable
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAccessor;

/// Most `null` entries a single write may append to a list
pub const MAX_LIST_PADDING: usize = 1024;

impl JsonAccessor {
    /// Create new accessor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn lookup<'a>(data: &'a Value, path: &PropertyPath) -> Result<&'a Value, AccessError> {
        let mut current = data;
        for segment in path.iter() {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => as_index(segment).and_then(|index| items.get(index)),
                _ => None,
            };
            current = next.ok_or_else(|| AccessError::NotFound {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
        }
        Ok(current)
    }

    fn check_writable(data: &Value, path: &PropertyPath) -> Result<(), AccessError> {
        if path.is_empty() {
            return Err(not_writable(path, "the root cannot be replaced"));
        }

        let mut container = Some(data);
        for segment in path.iter() {
            container = match container {
                // Created on write from here on
                None | Some(Value::Null) => {
                    if let Some(index) = as_index(segment) {
                        check_padding(path, index, 0)?;
                    }
                    None
                }
                Some(Value::Object(map)) => map.get(segment),
                Some(Value::Array(items)) => {
                    let index = as_index(segment).ok_or_else(|| {
                        not_writable(path, &format!("'{segment}' is not a list index"))
                    })?;
                    check_padding(path, index, items.len())?;
                    items.get(index)
                }
                Some(_) => {
                    return Err(not_writable(
                        path,
                        &format!("cannot descend into a scalar at '{segment}'"),
                    ))
                }
            };
        }
        Ok(())
    }
}

/// Writing at `index` may extend a list of length `len` by at most
/// [`MAX_LIST_PADDING`] entries
fn check_padding(path: &PropertyPath, index: usize, len: usize) -> Result<(), AccessError> {
    if index > len.saturating_add(MAX_LIST_PADDING) {
        return Err(not_writable(
            path,
            &format!("index {index} is too far past the end of a list of {len}"),
        ));
    }
    Ok(())
}

fn not_writable(path: &PropertyPath, reason: &str) -> AccessError {
    AccessError::NotWritable {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn empty_container(segment: &str) -> Value {
    if as_index(segment).is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

impl PathAccessor for JsonAccessor {
    fn is_readable(&self, data: &Value, path: &str) -> bool {
        path.parse::<PropertyPath>()
            .is_ok_and(|path| Self::lookup(data, &path).is_ok())
    }

    fn get_value(&self, data: &Value, path: &str) -> Result<Value, AccessError> {
        let path: PropertyPath = path.parse()?;
        Self::lookup(data, &path).cloned()
    }

    fn is_writable(&self, data: &Value, path: &str) -> bool {
        path.parse::<PropertyPath>()
            .is_ok_and(|path| Self::check_writable(data, &path).is_ok())
    }

    fn set_value(&self, data: &mut Value, path: &str, value: Value) -> Result<(), AccessError> {
        let path: PropertyPath = path.parse()?;
        Self::check_writable(data, &path)?;

        let mut current = data;
        for segment in path.iter() {
            if current.is_null() {
                *current = empty_container(segment);
            }
            current = match current {
                Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
                Value::Array(items) => {
                    let index = as_index(segment).ok_or_else(|| {
                        not_writable(&path, &format!("'{segment}' is not a list index"))
                    })?;
                    if index >= items.len() {
                        let len = index
                            .checked_add(1)
                            .ok_or_else(|| not_writable(&path, "list index overflows"))?;
                        items.resize(len, Value::Null);
                    }
                    &mut items[index]
                }
                _ => {
                    return Err(not_writable(
                        &path,
                        &format!("cannot descend into a scalar at '{segment}'"),
                    ))
                }
            };
        }

        *current = value;
        Ok(())
    }
}
