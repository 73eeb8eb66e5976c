//! Precision bookkeeping: the [`Precision`] value type, matching-precision
//! rules for mixed-magnitude operands, and the [`Context`] threaded through
//! every evaluation.
//!
//! Everything here is pure policy. Retry loops live in the engines; this
//! module only answers "how many digits should this operand carry" and
//! "what working precision does this target need".

use crate::error::{Error, Result};
use crate::number::{Complex, Float};

/// Margin of working digits reserved above the target precision by default.
pub const EXTRA_PRECISION: u64 = 10;

/// Hard bound on precision-escalation retries. An engine whose loss
/// heuristic is wrong degrades to [`Error::LossOfPrecision`] after this many
/// escalations instead of looping forever.
pub const MAX_ESCALATIONS: u32 = 8;

/// Largest scale magnitude considered representable; beyond it the result
/// is treated as overflowed.
pub const MAX_SCALE: i64 = i64::MAX / 4;

/// A significant-digit count, or the EXACT sentinel for error-free values.
///
/// `Precision` orders naturally: more digits is greater, and
/// [`Precision::EXACT`] is greater than every finite count.
///
/// # Example
///
/// ```
/// use apmath::Precision;
///
/// let p = Precision::digits(50);
/// assert_eq!(p.extend(10), Precision::digits(60));
/// assert_eq!(p.reduce(10).unwrap(), Precision::digits(40));
/// assert!(Precision::EXACT > p);
/// assert_eq!(Precision::EXACT.extend(1000), Precision::EXACT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u64);

impl Precision {
    /// Error-free sentinel: extending or reducing it is a no-op.
    pub const EXACT: Precision = Precision(u64::MAX);

    /// A finite significant-digit count.
    ///
    /// # Panics
    ///
    /// Panics if `n` collides with the EXACT sentinel.
    pub fn digits(n: u64) -> Self {
        assert!(n < u64::MAX, "finite precision must be below the EXACT sentinel");
        Precision(n)
    }

    /// Whether this is the EXACT sentinel.
    pub fn is_exact(self) -> bool {
        self.0 == u64::MAX
    }

    /// The digit count. EXACT saturates to `u64::MAX`.
    pub fn count(self) -> u64 {
        self.0
    }

    /// The digit count of a finite precision, or `None` for EXACT.
    pub fn finite(self) -> Option<u64> {
        if self.is_exact() { None } else { Some(self.0) }
    }

    /// Add a margin of working digits. EXACT is absorbing; finite values
    /// saturate just below the sentinel.
    pub fn extend(self, margin: u64) -> Self {
        if self.is_exact() {
            self
        } else {
            Precision(self.0.saturating_add(margin).min(u64::MAX - 1))
        }
    }

    /// Remove a margin of working digits. EXACT is absorbing. Reducing a
    /// finite precision by its full count or more is a catastrophic loss,
    /// not a silent zero.
    ///
    /// # Errors
    ///
    /// [`Error::LossOfPrecision`] when `margin >= count` for a finite value.
    pub fn reduce(self, margin: u64) -> Result<Self> {
        if self.is_exact() {
            Ok(self)
        } else if margin >= self.0 {
            Err(Error::LossOfPrecision)
        } else {
            Ok(Precision(self.0 - margin))
        }
    }
}

impl core::fmt::Display for Precision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_exact() {
            write!(f, "exact")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Immutable evaluation context: requested target precision, radix, and the
/// working margin currently reserved above the target.
///
/// A context is never mutated. Each escalation step derives a new context
/// with a recomputed margin via [`Context::escalated`].
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Precision the caller asked for.
    pub target: Precision,
    /// Radix of all operands.
    pub radix: u32,
    /// Working digits reserved above `target`.
    pub margin: u64,
}

impl Context {
    /// Context for a target precision at the default margin.
    pub fn new(target: Precision, radix: u32) -> Self {
        Context {
            target,
            radix,
            margin: EXTRA_PRECISION,
        }
    }

    /// The working precision: target plus margin.
    pub fn working(&self) -> Precision {
        self.target.extend(self.margin)
    }

    /// A new context whose margin absorbs an observed shortfall. The margin
    /// at least doubles so repeated small shortfalls cannot stall progress.
    pub fn escalated(&self, shortfall: u64) -> Self {
        Context {
            target: self.target,
            radix: self.radix,
            margin: self.margin + shortfall.max(self.margin),
        }
    }
}

/// Effective precisions of two same-radix operands for an add/compare-class
/// operation.
///
/// Each operand only needs digits down to the higher of the two "noise
/// floors" (scale minus precision). An operand whose scale lies entirely
/// below the other's noise floor is insignificant and gets effective
/// precision 0. Zero operands are passed through unchanged: they have no
/// scale to match against.
pub fn matching_precisions(x: &Float, y: &Float) -> (Precision, Precision) {
    if x.is_zero() || y.is_zero() {
        return (x.precision(), y.precision());
    }
    if x.precision().is_exact() && y.precision().is_exact() {
        return (Precision::EXACT, Precision::EXACT);
    }

    let floor = |v: &Float| -> i128 {
        match v.precision().finite() {
            Some(p) => v.scale() as i128 - p as i128,
            None => i128::MIN / 2,
        }
    };
    let bottom = floor(x).max(floor(y));

    let eff = |v: &Float| -> Precision {
        let avail = v.scale() as i128 - bottom;
        if avail <= 0 {
            Precision::digits(0)
        } else if v.precision().is_exact() {
            Precision::digits(avail as u64)
        } else {
            Precision::digits((avail as u64).min(v.precision().count()))
        }
    };

    (eff(x), eff(y))
}

/// Widen a value's tracked precision to at least `p` without changing its
/// magnitude.
pub fn ensure(x: &Float, p: Precision) -> Float {
    if x.precision() < p {
        x.with_precision(p)
    } else {
        x.clone()
    }
}

/// Narrow a value's tracked precision to at most `p`.
pub fn limit(x: &Float, p: Precision) -> Float {
    if x.precision() > p {
        x.rounded(p)
    } else {
        x.clone()
    }
}

/// Complex counterpart of [`ensure`].
pub fn ensure_complex(z: &Complex, p: Precision) -> Complex {
    Complex::new(ensure(z.re(), p), ensure(z.im(), p))
}

/// Complex counterpart of [`limit`].
pub fn limit_complex(z: &Complex, p: Precision) -> Complex {
    Complex::new(limit(z.re(), p), limit(z.im(), p))
}

/// Convert an out-of-range result scale into [`Error::Overflow`].
pub fn check_scale(x: &Float) -> Result<()> {
    if !x.is_zero() && x.scale().unsigned_abs() > MAX_SCALE as u64 {
        Err(Error::Overflow)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_saturates_and_exact_absorbs() {
        assert_eq!(Precision::digits(5).extend(7), Precision::digits(12));
        assert_eq!(Precision::EXACT.extend(7), Precision::EXACT);
        // Saturation never lands on the sentinel itself
        let big = Precision::digits(u64::MAX - 2);
        assert!(!big.extend(100).is_exact());
    }

    #[test]
    fn reduce_raises_on_total_loss() {
        assert_eq!(Precision::digits(5).reduce(3).unwrap(), Precision::digits(2));
        assert_eq!(Precision::digits(5).reduce(5), Err(Error::LossOfPrecision));
        assert_eq!(Precision::digits(5).reduce(100), Err(Error::LossOfPrecision));
        assert_eq!(Precision::EXACT.reduce(100).unwrap(), Precision::EXACT);
    }

    #[test]
    fn escalation_at_least_doubles() {
        let ctx = Context::new(Precision::digits(30), 10);
        let e1 = ctx.escalated(3);
        assert_eq!(e1.margin, 2 * EXTRA_PRECISION);
        let e2 = e1.escalated(100);
        assert_eq!(e2.margin, e1.margin + 100);
        assert_eq!(e2.target, ctx.target);
    }

    #[test]
    fn matching_ignores_insignificant_operand() {
        let big = Float::with_radix(1, 10).with_precision(Precision::digits(20));
        // 1e-100 at 20 digits: entirely below 1's noise floor
        let tiny = Float::parse("1e-100", 10, Precision::digits(20)).unwrap();
        let (pb, pt) = matching_precisions(&big, &tiny);
        assert_eq!(pb, Precision::digits(20));
        assert_eq!(pt, Precision::digits(0));
    }
}
