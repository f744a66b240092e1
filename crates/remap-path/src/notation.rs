//! Path notation conversion
//!
//! Rewrites dotted and mixed property paths into the canonical bracket form
//! consumed by [`PathAccessor`](crate::PathAccessor) implementations.
//!
//! # Examples
//! - `foo` → `[foo]`
//! - `0.foo` → `[0][foo]`
//! - `foo[0].bar` → `[foo][0][bar]`

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Leading bare identifier, e.g. `foo` in `foo[0].bar`
static LEADING_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+").expect("leading identifier pattern is valid"));

/// Dotted segment, e.g. `.bar` in `foo[0].bar`
static DOTTED_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(\w+)").expect("dotted segment pattern is valid"));

/// Convert a path expression into canonical bracket notation
///
/// A leading identifier is wrapped in brackets, then every `.identifier`
/// segment becomes `[identifier]`. Bracketed segments pass through as-is,
/// so the conversion is idempotent.
#[must_use]
pub fn canonicalize(path: &str) -> String {
    let wrapped = match LEADING_IDENT.find(path) {
        Some(ident) => Cow::Owned(format!("[{}]{}", ident.as_str(), &path[ident.end()..])),
        None => Cow::Borrowed(path),
    };

    DOTTED_SEGMENT.replace_all(&wrapped, "[${1}]").into_owned()
}

/// Check whether a path expression is already canonical
#[inline]
#[must_use]
pub fn is_canonical(path: &str) -> bool {
    canonicalize(path) == path
}
