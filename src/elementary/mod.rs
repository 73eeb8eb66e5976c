//! Elementary transcendental functions over [`Float`](crate::Float) and
//! [`Complex`](crate::Complex): roots, exponentials, logarithms, powers,
//! and the circular/hyperbolic families.
//!
//! Real variants carry an `_f` suffix and reject arguments that would
//! leave the real line instead of silently going complex.

pub mod explog;
pub mod root;
pub mod trig;

pub use explog::{exp, exp_f, ln, ln_f, pow, powi};
pub use root::{inv_root, root, root_f, sqrt, sqrt_f};
pub use trig::{
    acos, acosh, arg, asin, asinh, atan, atan2, atanh, cos, cos_f, cosh, cosh_f, sin, sin_f,
    sinh, sinh_f, tan, tan_f, tanh, tanh_f,
};

#[cfg(test)]
mod tests;
