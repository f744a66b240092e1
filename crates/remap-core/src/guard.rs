//! Reentrancy guard
//!
//! The remapper delegates to a serializer that dispatches back over every
//! registered normalizer, the remapper included. While a delegated call is
//! in flight the matching flag is raised so the remapper declines support
//! and the serializer picks another normalizer.
//!
//! Flags are scoped to one instance and restored by [`FlagScope`] on every
//! exit path. One in-flight call per instance is assumed: the flags do not
//! tell concurrent callers apart.

use std::sync::atomic::{AtomicBool, Ordering};

/// Per-instance normalization/denormalization flags
#[derive(Debug, Default)]
pub(crate) struct ReentrancyGuard {
    normalizing: AtomicBool,
    denormalizing: AtomicBool,
}

impl ReentrancyGuard {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn is_normalizing(&self) -> bool {
        self.normalizing.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn is_denormalizing(&self) -> bool {
        self.denormalizing.load(Ordering::Acquire)
    }

    /// Raise the normalization flag until the scope drops
    #[inline]
    pub(crate) fn normalizing(&self) -> FlagScope<'_> {
        FlagScope::raise(&self.normalizing)
    }

    /// Raise the denormalization flag until the scope drops
    #[inline]
    pub(crate) fn denormalizing(&self) -> FlagScope<'_> {
        FlagScope::raise(&self.denormalizing)
    }
}

/// Raised flag; restores the previous value on drop
#[must_use = "the flag is restored as soon as the scope is dropped"]
#[derive(Debug)]
pub(crate) struct FlagScope<'a> {
    flag: &'a AtomicBool,
    previous: bool,
}

impl<'a> FlagScope<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        let previous = flag.swap(true, Ordering::AcqRel);
        Self { flag, previous }
    }
}

impl Drop for FlagScope<'_> {
    fn drop(&mut self) {
        self.flag.store(self.previous, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn flags_start_lowered() {
        let guard = ReentrancyGuard::new();
        assert!(!guard.is_normalizing());
        assert!(!guard.is_denormalizing());
    }

    #[test]
    fn scope_raises_and_restores() {
        let guard = ReentrancyGuard::new();
        {
            let _scope = guard.normalizing();
            assert!(guard.is_normalizing());
            assert!(!guard.is_denormalizing());
        }
        assert!(!guard.is_normalizing());
    }

    #[test]
    fn nested_scope_keeps_outer_flag() {
        let guard = ReentrancyGuard::new();
        let outer = guard.denormalizing();
        {
            let _inner = guard.denormalizing();
        }
        assert!(guard.is_denormalizing());
        drop(outer);
        assert!(!guard.is_denormalizing());
    }

    #[test]
    fn early_return_restores_flag() {
        fn delegate(guard: &ReentrancyGuard, outcome: Result<u8, &'static str>) -> Result<u8, &'static str> {
            let _scope = guard.normalizing();
            let value = outcome?;
            Ok(value + 1)
        }

        let guard = ReentrancyGuard::new();
        assert!(delegate(&guard, Err("boom")).is_err());
        assert!(!guard.is_normalizing());
        assert_eq!(delegate(&guard, Ok(1)), Ok(2));
        assert!(!guard.is_normalizing());
    }

    #[test]
    fn panic_restores_flag() {
        let guard = ReentrancyGuard::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _scope = guard.normalizing();
            panic!("normalizer blew up");
        }));
        assert!(result.is_err());
        assert!(!guard.is_normalizing());
    }
}
