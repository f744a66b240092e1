//! Built-in normalizers
//!
//! Enough to assemble a working [`NormalizerChain`](crate::NormalizerChain)
//! around the remapper: a date-time leaf normalizer and an identity
//! normalizer for everything else.

mod datetime;
mod value;

pub use datetime::{DateTimeNormalizer, FORMAT_KEY};
pub use value::ValueNormalizer;
