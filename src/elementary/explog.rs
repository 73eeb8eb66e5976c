//! Exponential, logarithm, and powers.
//!
//! `ln` is the primitive here: the AGM identity
//! `ln s = π / (2·agm(1, 4/s)) · (1 + O(1/s²))` evaluates the log of a
//! suitably rescaled argument directly, and `exp` inverts it — small
//! reduced arguments by Taylor with halving reduction, large working
//! precisions by a doubling Newton iteration on the log. `pow` is
//! `exp(w·ln z)` behind the algebraic short circuits.

use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::agm::agm_complex;
use crate::constants;
use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision, MAX_SCALE};

use super::root::powi_complex;

/// Above this working digit count `exp` switches from pure Taylor to the
/// Newton-on-log doubling scheme.
const EXP_NEWTON_THRESHOLD: u64 = 350;

/// Natural logarithm of a positive real.
///
/// # Errors
///
/// [`Error::LogOfZero`] at zero, [`Error::Domain`] for negative arguments
/// (use the complex [`ln`]), [`Error::InfiniteExpansion`] for an EXACT
/// target on any argument other than 1.
pub fn ln_f(x: &Float, target: Precision) -> Result<Float> {
    if x.is_zero() {
        return Err(Error::LogOfZero);
    }
    if x.signum() < 0 {
        return Err(Error::Domain);
    }
    let radix = x.radix();
    if x == &Float::one(radix) {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }

    // Arguments near 1 lose relative digits: ln(1+d) has scale(d), so
    // compensate the working precision by the gap.
    let d = x - &Float::one(radix);
    let comp = if !d.is_zero() && d.scale() < 0 {
        (-d.scale()) as u64
    } else {
        0
    };
    let ctx = Context::new(target, radix);
    let wp = ctx.working().extend(comp);
    let goal = wp.count();

    let m = (goal / 2 + 10) as i64 - x.scale();
    let s = x.scaled(m).with_precision(wp);
    let four_over_s = Float::with_radix(4, radix).with_precision(wp).divide(&s)?;
    let u = crate::agm::agm(&Float::one(radix).with_precision(wp), &four_over_s, wp)?;
    let pi = constants::pi(radix, wp)?;
    let ln_s = pi.divide(&(&u * &Float::with_radix(2, radix)))?;
    let ln_r = constants::ln_radix(radix, wp.extend(20))?;
    let result = &ln_s - &(&ln_r * &Float::with_radix(m, radix));
    Ok(result.rounded(target))
}

/// Principal natural logarithm of a nonzero complex value. The imaginary
/// part lands in `(−π, π]`.
///
/// # Errors
///
/// [`Error::LogOfZero`] at zero, [`Error::InfiniteExpansion`] for an
/// EXACT target away from 1.
pub fn ln(z: &Complex, target: Precision) -> Result<Complex> {
    if z.is_zero() {
        return Err(Error::LogOfZero);
    }
    let radix = z.radix();
    if z.is_real() {
        if z.re().signum() > 0 {
            return Ok(Complex::from_real(ln_f(z.re(), target)?));
        }
        // Negative real axis: ln(−x) + iπ
        if target.is_exact() {
            return Err(Error::InfiniteExpansion);
        }
        let re = ln_f(&z.re().neg(), target)?;
        let pi = constants::pi(radix, target)?;
        return Ok(Complex::new(re, pi));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    if z.re().is_zero() {
        // ±i·y: ln|y| ± iπ/2
        let re = ln_f(&z.im().abs(), target)?;
        let pi = constants::pi(radix, target.extend(2))?;
        let half_pi = pi.divide(&Float::with_radix(2, radix))?.rounded(target);
        let im = if z.im().signum() > 0 { half_pi } else { half_pi.neg() };
        return Ok(Complex::new(re, im));
    }
    if z.re().signum() < 0 {
        // Reflect into the right half plane: ln(−z) ± iπ
        let inner = ln(&z.neg(), target.extend(2))?;
        let pi = constants::pi(radix, target.extend(2))?;
        let shift = if z.im().signum() >= 0 { pi } else { pi.neg() };
        return Ok(Complex::new(
            inner.re().rounded(target),
            (inner.im() + &shift).rounded(target),
        ));
    }

    // Right half plane. Compensate for a near-1 argument (cancellation in
    // the real part) and for a tiny angle (absolute AGM error swamping a
    // small imaginary part).
    let d = z.sub(&Complex::one(radix));
    let comp_near_one = if !d.is_zero() && d.scale() < 0 {
        (-d.scale()) as u64
    } else {
        0
    };
    let comp_angle = (z.re().scale() - z.im().scale()).max(0) as u64;
    let ctx = Context::new(target, radix);
    let wp = ctx.working().extend(comp_near_one + comp_angle);
    let goal = wp.count();

    let m = (goal / 2 + 10) as i64 - z.scale();
    let s = z.mul_real(&Float::radix_power(m, radix)).with_precision(wp);
    let four_over_s = Complex::with_radix(4, radix).with_precision(wp).divide(&s)?;
    let u = agm_complex(&Complex::one(radix).with_precision(wp), &four_over_s, wp)?;
    let pi = Complex::from_real(constants::pi(radix, wp)?);
    let ln_s = pi.divide(&u.mul(&Complex::with_radix(2, radix)))?;
    let ln_r = constants::ln_radix(radix, wp.extend(20))?;
    let shift = Complex::from_real(&ln_r * &Float::with_radix(m, radix));
    Ok(ln_s.sub(&shift).rounded(target))
}

/// Taylor sum of `exp` for a small argument, with halving reduction:
/// `exp(t) = exp(t/2^k)^(2^k)` with `k` balanced against the term count.
fn exp_taylor(z: &Complex, wp: Precision) -> Result<Complex> {
    let radix = z.radix();
    let goal = wp.count();
    // Halve until the argument is comfortably below 1, then keep halving
    // ~sqrt(p) more times; each squaring on the way back costs a digit.
    let zf = z.norm_sqr().to_f64().sqrt();
    let base_halvings = if zf > 0.0 {
        (zf.log2() + 4.0).ceil().max(0.0) as u64
    } else {
        0
    };
    let k = base_halvings + (goal as f64).sqrt() as u64;
    let inner = Precision::digits(goal + k + 10);

    let two_k = super::root::powi_float(&Float::with_radix(2, radix).with_precision(inner), k);
    let t = z.with_precision(inner).divide(&Complex::from_real(two_k))?;

    let mut term = Complex::one(radix).with_precision(inner);
    let mut sum = term.clone();
    let mut j: i64 = 1;
    loop {
        term = term
            .mul(&t)
            .divide(&Complex::with_radix(j, radix))?;
        sum = sum.add(&term);
        if term.is_zero() || sum.scale() - term.scale() > (goal + k + 5) as i64 {
            break;
        }
        j += 1;
    }
    let mut w = sum;
    for _ in 0..k {
        w = w.mul(&w);
    }
    Ok(w.rounded(wp))
}

/// `exp` of a reduced argument (`|Re| ≲ ln radix`, `|Im| ≤ π/2`): Taylor
/// at small working precisions, seed + Newton on the log above the
/// threshold.
fn exp_core(z: &Complex, wp: Precision) -> Result<Complex> {
    let radix = z.radix();
    let goal = wp.count();
    if goal <= EXP_NEWTON_THRESHOLD {
        return exp_taylor(z, wp);
    }
    let mut p = EXP_NEWTON_THRESHOLD.min(goal) / 2;
    let mut w = exp_taylor(&z.rounded(Precision::digits(p)), Precision::digits(p))?;
    while p < goal {
        p = (2 * p).min(goal);
        let wp_step = Precision::digits(p);
        let w_wide = w.with_precision(wp_step);
        let residual = z
            .rounded(wp_step)
            .sub(&ln(&w_wide, wp_step)?)
            .add(&Complex::one(radix));
        w = w_wide.mul(&residual);
    }
    // Precising pass at the full working precision.
    let w_wide = w.with_precision(wp);
    let residual = z
        .rounded(wp)
        .sub(&ln(&w_wide, wp)?)
        .add(&Complex::one(radix));
    Ok(w_wide.mul(&residual).rounded(wp))
}

/// Complex exponential.
///
/// The imaginary part is reduced into `(−π/2, π/2]` by multiples of π
/// (tracking the sign flip), the real part by multiples of ln(radix)
/// (becoming an exact digit shift), and the reduced argument goes through
/// [`exp_core`].
///
/// # Errors
///
/// [`Error::Overflow`] when the result's scale leaves the representable
/// range in either direction; [`Error::InfiniteExpansion`] for an EXACT
/// target on a nonzero argument.
pub fn exp(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::one(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);

    // The result scale is Re(z)/ln(radix); reject anything outside the
    // representable band before spending any precision on it.
    let re_f = z.re().to_f64();
    if !re_f.is_finite() || (re_f / (radix as f64).ln()).abs() >= MAX_SCALE as f64 {
        return Err(Error::Overflow);
    }

    let arg_comp = z.re().scale().max(z.im().scale()).max(0) as u64;
    let wp = ctx.working().extend(arg_comp + 5);

    // Reduce the real part by q·ln(radix); exp of the remainder is then
    // rescaled by an exact digit shift of q.
    let (g_re, q) = if z.re().is_zero() || z.re().scale() <= 0 {
        (z.re().rounded(wp), 0i64)
    } else {
        let ln_r = constants::ln_radix(radix, wp.extend(z.re().scale().max(0) as u64))?;
        let qf = z.re().with_precision(wp).divide(&ln_r)?.floor();
        let q = qf
            .to_bigint_rounded()
            .to_i64()
            .ok_or(Error::Overflow)?;
        let g = z.re().with_precision(wp).sub(&(&ln_r * &qf));
        (g, q)
    };

    // Reduce the imaginary part by k·π, flipping the sign for odd k.
    let (g_im, negate) = if z.im().is_zero() {
        (Float::zero(radix), false)
    } else {
        let pi = constants::pi(radix, wp.extend(z.im().scale().max(0) as u64))?;
        let kf = z
            .im()
            .with_precision(wp)
            .divide(&pi)?
            .add(&Float::rational(1, 2, radix, wp)?)
            .floor();
        // floor(y/π + 1/2) puts the remainder in [−π/2, π/2)
        let k = kf.to_bigint_rounded();
        let g = z.im().with_precision(wp).sub(&(&pi * &kf));
        (g, k.is_odd())
    };

    let w = exp_core(&Complex::new(g_re, g_im), wp)?;
    let w = w.mul_real(&Float::radix_power(q, radix));
    let w = if negate { w.neg() } else { w };
    crate::precision::check_scale(w.re())?;
    crate::precision::check_scale(w.im())?;
    Ok(w.rounded(target))
}

/// Real exponential.
pub fn exp_f(x: &Float, target: Precision) -> Result<Float> {
    exp(&Complex::from_real(x.clone()), target).map(|w| w.re().clone())
}

/// Integer power by repeated squaring, with a reciprocal for negative
/// exponents.
///
/// # Errors
///
/// [`Error::DivisionByZero`] for `0^n` with `n < 0`.
pub fn powi(z: &Complex, n: i64, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if n == 0 {
        return Ok(Complex::one(radix));
    }
    if z.is_zero() {
        return if n > 0 {
            Ok(Complex::zero(radix))
        } else {
            Err(Error::DivisionByZero)
        };
    }
    let wp = target.extend(Context::new(target, radix).margin);
    let base = crate::precision::ensure_complex(&z.rounded(wp.min(z.precision())), wp);
    let pow = powi_complex(&base, n.unsigned_abs());
    let result = if n < 0 {
        Complex::one(radix).with_precision(wp).divide(&pow)?
    } else {
        pow
    };
    crate::precision::check_scale(result.re())?;
    crate::precision::check_scale(result.im())?;
    Ok(crate::precision::limit_complex(&result, target))
}

/// `z^w = exp(w·ln z)`, with the algebraic cases short-circuited:
/// `1^w = 1`, `z^0 = 1`, integer exponents by repeated squaring, and
/// `0^w` resolved by the sign of `Re(w)`.
///
/// # Errors
///
/// [`Error::ZeroToZero`] for `0^0`; [`Error::DivisionByZero`] for `0^w`
/// with `Re(w) < 0`; [`Error::Domain`] for `0^w` with a purely imaginary
/// `w`.
pub fn pow(z: &Complex, w: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        if w.is_zero() {
            return Err(Error::ZeroToZero);
        }
        return match w.re().signum() {
            1 => Ok(Complex::zero(radix)),
            -1 => Err(Error::DivisionByZero),
            _ => Err(Error::Domain),
        };
    }
    if w.is_zero() {
        return Ok(Complex::one(radix));
    }
    if z == &Complex::one(radix) {
        return Ok(crate::precision::limit_complex(z, target));
    }
    if w.is_integer() {
        if let Some(n) = w.re().to_bigint_rounded().to_i64() {
            return powi(z, n, target);
        }
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = target
        .extend(Context::new(target, radix).margin)
        .extend(w.scale().max(0) as u64 + 5);
    let lnz = ln(&z.rounded(wp.min(z.precision())).with_precision(wp), wp)?;
    let exponent = w.rounded(wp.min(w.precision())).with_precision(wp).mul(&lnz);
    exp(&exponent, target)
}
