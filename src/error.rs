//! Crate-wide error type.
//!
//! Three families of failure exist (and only three — internal precision
//! escalations are handled by the engines and never surface):
//!
//! - **Domain errors** — the requested value is mathematically undefined
//!   (`0⁰`, log of zero, gamma at a pole, zeroth root, a divergent series).
//!   Never retried.
//! - **Infinite expansion** — the caller asked for an exact result whose
//!   true value has no finite digit expansion (e.g. an exact-precision AGM,
//!   or exact division with a non-terminating quotient).
//! - **Loss of precision** — the retry budget is exhausted and the achieved
//!   result still has no significant digits. Fatal: the requested precision
//!   is unattainable by the algorithm, not a transient glitch.

use thiserror::Error;

/// Errors raised by evaluation routines.
///
/// Every domain-error case has its own variant so callers can match on the
/// specific mathematical condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// `pow(0, 0)` is undefined.
    #[error("zero to the power of zero")]
    ZeroToZero,

    /// Logarithm of zero.
    #[error("logarithm of zero")]
    LogOfZero,

    /// Zeroth root of any value.
    #[error("zeroth root")]
    ZerothRoot,

    /// Inverse root of zero (reciprocal of zero).
    #[error("inverse root of zero")]
    InverseRootOfZero,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Gamma-family function evaluated at a non-positive integer pole.
    #[error("gamma function pole at a non-positive integer")]
    GammaPole,

    /// Riemann/Hurwitz zeta at the pole `s = 1`, or Hurwitz second
    /// argument at a non-positive integer.
    #[error("zeta function pole")]
    ZetaPole,

    /// A series or continued fraction does not converge for the given
    /// argument (asymptotic terms started growing before the tolerance
    /// was met, or the defining series diverges at that point).
    #[error("series does not converge")]
    Divergent,

    /// Argument outside a real function's domain (e.g. real log of a
    /// negative number, elliptic modulus above one).
    #[error("argument outside the function domain")]
    Domain,

    /// The result would require infinitely many digits but exact
    /// precision was requested.
    #[error("result requires infinite precision")]
    InfiniteExpansion,

    /// All significant digits were lost and escalation could not recover
    /// them within the retry bound.
    #[error("complete loss of significant digits")]
    LossOfPrecision,

    /// The result magnitude overflows the representable scale range.
    #[error("result scale overflows the representable range")]
    Overflow,

    /// Operands carry different radixes.
    #[error("radix mismatch: {0} vs {1}")]
    RadixMismatch(u32, u32),

    /// Malformed number literal.
    #[error("invalid number literal")]
    Parse,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
