//! The number substrate: arbitrary-precision [`Float`] and [`Complex`]
//! values with explicit precision tracking, in any radix 2..=36.
//!
//! The engines above this module treat these types as opaque: sign, scale,
//! precision, radix, arithmetic, and conversions to/from a native double
//! for seeding iterative guesses. Digit storage and the fast multiplication
//! and division kernels are delegated to `num-bigint`; nothing in this
//! crate reimplements them.
//!
//! Both types are immutable: every operation returns a new value. Equality
//! compares represented magnitudes and ignores precision tags.

mod complex;
mod float;

#[cfg(test)]
mod tests;

pub use complex::Complex;
pub use float::Float;

pub(crate) use float::{digit_count, radix_pow};
pub use float::{MAX_RADIX, MIN_RADIX};
