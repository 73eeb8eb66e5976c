//! Complete elliptic integrals by the arithmetic-geometric mean.
//!
//! `K(m) = π/(2·agm(1, √(1−m)))`; `E(m)` reuses the same AGM ladder
//! through its halved differences: with `c₀² = m` and `c_{n+1} =
//! (a_n − b_n)/2`, `E = K·(1 − Σ 2^{n−1}·c_n²)`.

use crate::agm::{agm, agm_residuals};
use crate::constants;
use crate::elementary::sqrt_f;
use crate::error::{Error, Result};
use crate::number::Float;
use crate::precision::{ensure, Context, Precision};

/// Digits lost to the logarithmic blow-up of K as `m → 1`.
fn edge_digits(m: &Float) -> u64 {
    let d = &Float::one(m.radix()) - m;
    if d.is_zero() {
        0
    } else {
        (-d.scale()).max(0) as u64
    }
}

/// Complete elliptic integral of the first kind, parameterized by
/// `m = k²`.
///
/// # Errors
///
/// [`Error::Domain`] for `m ≥ 1`, where the integral diverges or leaves
/// the real line.
pub fn elliptic_k(m: &Float, target: Precision) -> Result<Float> {
    let radix = m.radix();
    let one = Float::one(radix);
    if (&one - m).signum() <= 0 {
        return Err(Error::Domain);
    }
    let wp = Context::new(target, radix)
        .working()
        .extend(edge_digits(m))
        .extend(5);
    let mw = ensure(&m.rounded(wp.min(m.precision())), wp);
    let b0 = sqrt_f(&(&one.with_precision(wp) - &mw), wp)?;
    let g = agm(&one.with_precision(wp), &b0, wp)?;
    constants::pi(radix, wp)?
        .divide(&(&g * &Float::with_radix(2, radix)))
        .map(|v| v.rounded(target))
}

/// Complete elliptic integral of the second kind, parameterized by
/// `m = k²`.
///
/// # Errors
///
/// [`Error::Domain`] for `m > 1`.
pub fn elliptic_e(m: &Float, target: Precision) -> Result<Float> {
    let radix = m.radix();
    let one = Float::one(radix);
    if m == &one {
        return Ok(one.rounded(target));
    }
    if (&one - m).signum() < 0 {
        return Err(Error::Domain);
    }
    let wp = Context::new(target, radix)
        .working()
        .extend(edge_digits(m))
        .extend(5);
    let mw = ensure(&m.rounded(wp.min(m.precision())), wp);
    let b0 = sqrt_f(&(&one.with_precision(wp) - &mw), wp)?;
    let (g, residuals) = agm_residuals(&b0, wp)?;

    // Σ 2^{n−1} c_n², with the n = 0 term contributing m/2 directly
    let mut sum = mw.divide(&Float::with_radix(2, radix))?;
    let mut weight = Float::one(radix);
    for c in &residuals {
        sum = sum.add(&(&weight * &(c * c)));
        weight = &weight * &Float::with_radix(2, radix);
    }
    let k = constants::pi(radix, wp)?.divide(&(&g * &Float::with_radix(2, radix)))?;
    let e = &k * &(&one.with_precision(wp) - &sum);
    Ok(e.rounded(target))
}
