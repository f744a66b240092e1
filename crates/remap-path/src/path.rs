//! Property paths for addressing within nested values
//!
//! Provides [`PropertyPath`], the parsed form of a path expression.

use crate::notation::canonicalize;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path within a nested map/list structure
///
/// Parsed from any supported notation and always displayed in canonical
/// bracket form.
///
/// # Examples
/// - `["data", "0", "foo"]` → `[data][0][foo]`
/// - `["config", "database", "host"]` → `[config][database][host]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Interpret a segment as a list index
///
/// Only plain decimal numbers qualify; `01` or `+1` stay string keys.
#[must_use]
pub fn as_index(segment: &str) -> Option<usize> {
    let plain = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if plain {
        segment.parse().ok()
    } else {
        None
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "[{segment}]")?;
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = canonicalize(s);
        let mut segments = Vec::new();
        let mut rest = canonical.as_str();

        while !rest.is_empty() {
            let offset = canonical.len() - rest.len();
            let Some(body) = rest.strip_prefix('[') else {
                return Err(PathError::UnexpectedCharacter {
                    path: s.to_string(),
                    offset,
                });
            };
            let Some(end) = body.find(']') else {
                return Err(PathError::Unterminated(s.to_string()));
            };
            if end == 0 {
                return Err(PathError::EmptySegment(s.to_string()));
            }
            segments.push(body[..end].to_string());
            rest = &body[end + 1..];
        }

        Ok(Self(segments))
    }
}

/// Errors related to property paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty `[]` segment in path
    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// Bracket opened but never closed
    #[error("path '{0}' has an unterminated segment")]
    Unterminated(String),

    /// Character outside of a bracketed segment
    #[error("unexpected character at offset {offset} in path '{path}'")]
    UnexpectedCharacter { path: String, offset: usize },
}
