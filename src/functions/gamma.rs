//! The gamma family: gamma, log-gamma, beta, digamma, polygamma, the
//! Pochhammer symbol, and exact factorials.
//!
//! The core is Stirling's series with a Bernoulli tail. Arguments too
//! small for the tail are shifted up the recurrence `Γ(z+1) = zΓ(z)`
//! first; arguments left of `Re z = 1/2` go through the reflection
//! formula `Γ(z)Γ(1−z) = π/sin(πz)`, pre-widened by the measured
//! distance to the nearest pole.

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};

use crate::bernoulli::bernoulli;
use crate::constants;
use crate::elementary::{exp, ln, ln_f, sin, tan};
use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{ensure_complex, Context, Precision};

/// Recurrence-shift cap; a shift this size means the f64 sizing went wrong.
const MAX_SHIFT: u64 = 1 << 22;

/// Real part the Stirling tail needs before it can deliver `goal` digits,
/// from the tail's smallest-term asymptotics.
fn stirling_threshold(goal: u64, radix: u32) -> f64 {
    (goal as f64 + 5.0) * (radix as f64).ln() / core::f64::consts::TAU + 3.0
}

/// How many digits the reflection formula loses to the proximity of
/// `z` to an integer (where `sin(πz)` vanishes).
fn pole_proximity_digits(z: &Complex) -> u64 {
    if !z.im().is_zero() {
        return 0;
    }
    let d = z.re().sub(&Float::from_bigint(z.re().to_bigint_rounded(), z.radix()));
    if d.is_zero() {
        0
    } else {
        (-d.scale()).max(0) as u64
    }
}

/// Stirling's series at a point already beyond the tail threshold:
/// `lnΓ(w) = (w − 1/2)·ln w − w + ln(2π)/2 + Σ B_{2j}/(2j(2j−1)·w^{2j−1})`.
fn stirling(w: &Complex, wp: Precision) -> Result<Complex> {
    let radix = w.radix();
    let goal = wp.count() as i64;
    let one = Complex::one(radix).with_precision(wp);
    let lnw = ln(w, wp)?;
    let half = Float::rational(1, 2, radix, wp)?;
    let pi = constants::pi(radix, wp)?;
    let two_pi = &pi * &Float::with_radix(2, radix);
    let mut acc = w
        .sub(&Complex::from_real(half.clone()))
        .mul(&lnw)
        .sub(w)
        .add(&Complex::from_real(ln_f(&two_pi, wp)?.mul(&half)));

    let tol = acc.scale().max(0) - goal - 2;
    let w_inv_sq = one.divide(&w.mul(w))?;
    let mut power = one.divide(w)?;
    let mut j = 1u64;
    loop {
        let b = bernoulli(2 * j);
        let num = Float::from_bigint(b.numer().clone(), radix).with_precision(wp);
        let den = Float::from_bigint(
            b.denom().clone() * BigInt::from(2 * j * (2 * j - 1)),
            radix,
        );
        let term = power.mul_real(&num.divide(&den)?);
        acc = acc.add(&term);
        if term.is_zero() || term.scale() < tol {
            return Ok(acc);
        }
        power = power.mul(&w_inv_sq);
        j += 1;
    }
}

/// `lnΓ(z)` for `Re z ≥ 1/2`: recurrence shift into Stirling territory,
/// then subtract the shifted logarithms.
fn ln_gamma_right(z: &Complex, wp: Precision) -> Result<Complex> {
    let radix = z.radix();
    let need = stirling_threshold(wp.count(), radix);
    let re = z.re().to_f64();
    let im = z.im().to_f64();
    let shift = if re.hypot(im) >= need {
        0
    } else {
        let k = (need - re).ceil();
        if k > MAX_SHIFT as f64 {
            return Err(Error::Overflow);
        }
        k.max(0.0) as u64
    };

    let mut logs = Complex::zero(radix);
    for i in 0..shift {
        logs = logs.add(&ln(&z.add(&Complex::with_radix(i as i64, radix)), wp)?);
    }
    let shifted = z.add(&Complex::with_radix(shift as i64, radix));
    Ok(stirling(&shifted, wp)?.sub(&logs))
}

/// Extra working digits the exponential needs so the gamma *value* comes
/// out with full relative precision: the magnitude of `lnΓ` itself.
fn magnitude_digits(z: &Complex, radix: u32) -> u64 {
    let re = z.re().to_f64().abs();
    let im = z.im().to_f64().abs();
    let mag = re.hypot(im).max(2.0);
    let ln_gamma_mag = mag * (mag.ln() + 1.0) + 10.0;
    ln_gamma_mag.log(radix as f64).ceil().max(0.0) as u64
}

/// The gamma function.
///
/// Positive integer arguments with an EXACT target produce the exact
/// factorial. Everywhere else the result is `exp(lnΓ)` via Stirling,
/// reflected across `Re z = 1/2` when needed.
///
/// # Errors
///
/// [`Error::GammaPole`] on the non-positive integers,
/// [`Error::InfiniteExpansion`] for an EXACT target off the integers.
pub fn gamma(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_integer() && z.re().signum() <= 0 {
        return Err(Error::GammaPole);
    }
    if z.is_integer() {
        if let Some(n) = z.re().to_bigint_rounded().to_u64() {
            if n <= 20_000 || target.is_exact() {
                let exact = Float::from_bigint(factorial_bigint(n - 1), radix);
                return Ok(Complex::from_real(exact.rounded(target)));
            }
        }
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }

    let ctx = Context::new(target, radix);
    if z.re().signum() > 0 && z.re().sub(&Float::rational(1, 2, radix, target)?).signum() >= 0 {
        let wp = ctx.working().extend(magnitude_digits(z, radix));
        let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
        let lg = ln_gamma_right(&zw, wp)?;
        return Ok(exp(&lg, wp)?.rounded(target));
    }

    // Reflection: Γ(z) = π / (sin(πz)·Γ(1−z))
    let comp = pole_proximity_digits(z);
    let wp = ctx
        .working()
        .extend(comp)
        .extend(magnitude_digits(z, radix));
    let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
    let one = Complex::one(radix).with_precision(wp);
    let pi = constants::pi(radix, wp)?;
    let sine = sin(&zw.mul_real(&pi), wp)?;
    let rest = gamma(&one.sub(&zw), wp)?;
    Ok(Complex::from_real(pi)
        .divide(&sine.mul(&rest))?
        .rounded(target))
}

/// Real-argument gamma.
///
/// # Errors
///
/// As [`gamma`].
pub fn gamma_f(a: &Float, target: Precision) -> Result<Float> {
    gamma(&Complex::from_real(a.clone()), target).map(|v| v.re().clone())
}

/// A logarithm of gamma. For `Re z ≥ 1/2` this is the real-axis-continuous
/// Stirling branch; elsewhere it is the principal logarithm of the gamma
/// value, so its imaginary part may differ from the continuous branch by a
/// multiple of 2π.
///
/// # Errors
///
/// [`Error::GammaPole`] on the non-positive integers.
pub fn log_gamma(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_integer() && z.re().signum() <= 0 {
        return Err(Error::GammaPole);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let wp = ctx.working().extend(magnitude_digits(z, radix));
    if z.re().signum() > 0 && z.re().sub(&Float::rational(1, 2, radix, target)?).signum() >= 0 {
        let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
        return Ok(ln_gamma_right(&zw, wp)?.rounded(target));
    }
    ln(&gamma(z, wp)?, target)
}

/// Euler's beta function `B(a, b) = Γ(a)Γ(b)/Γ(a+b)`.
///
/// When `a + b` sits on a gamma pole but `a` and `b` do not, the pole in
/// the denominator annihilates the value and the result is zero.
///
/// # Errors
///
/// [`Error::GammaPole`] when `a` or `b` is itself a non-positive integer.
pub fn beta(a: &Complex, b: &Complex, target: Precision) -> Result<Complex> {
    let radix = a.radix();
    let wp = Context::new(target, radix).working().extend(5);
    let ga = gamma(a, wp)?;
    let gb = gamma(b, wp)?;
    match gamma(&a.add(b), wp) {
        Ok(gab) => Ok(ga.mul(&gb).divide(&gab)?.rounded(target)),
        Err(Error::GammaPole) => Ok(Complex::zero(radix)),
        Err(e) => Err(e),
    }
}

/// Digamma `ψ(z)`: Stirling's derivative series with the same shift and
/// reflection structure as [`gamma`].
///
/// # Errors
///
/// [`Error::GammaPole`] on the non-positive integers.
pub fn digamma(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_integer() && z.re().signum() <= 0 {
        return Err(Error::GammaPole);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);

    if z.re().signum() <= 0 || z.re().sub(&Float::rational(1, 2, radix, target)?).signum() < 0 {
        // ψ(z) = ψ(1−z) − π·cot(πz)
        let comp = pole_proximity_digits(z);
        let wp = ctx.working().extend(comp).extend(5);
        let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
        let one = Complex::one(radix).with_precision(wp);
        let pi = constants::pi(radix, wp)?;
        let cot = Complex::from_real(pi.clone()).divide(&tan(&zw.mul_real(&pi), wp)?)?;
        return Ok(digamma(&one.sub(&zw), wp)?.sub(&cot).rounded(target));
    }

    let wp = ctx.working().extend(5);
    let goal = wp.count() as i64;
    let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
    let need = stirling_threshold(wp.count(), radix);
    let re = zw.re().to_f64();
    let im = zw.im().to_f64();
    let shift = if re.hypot(im) >= need {
        0
    } else {
        let k = (need - re).ceil();
        if k > MAX_SHIFT as f64 {
            return Err(Error::Overflow);
        }
        k.max(0.0) as u64
    };
    let one = Complex::one(radix).with_precision(wp);
    let mut recips = Complex::zero(radix);
    for i in 0..shift {
        recips = recips.add(&one.divide(&zw.add(&Complex::with_radix(i as i64, radix)))?);
    }
    let w = zw.add(&Complex::with_radix(shift as i64, radix));

    // ψ(w) = ln w − 1/(2w) − Σ B_{2j}/(2j·w^{2j})
    let w_inv = one.divide(&w)?;
    let w_inv_sq = w_inv.mul(&w_inv);
    let mut acc = ln(&w, wp)?.sub(&w_inv.divide_real(&Float::with_radix(2, radix))?);
    let tol = acc.scale().max(0) - goal - 2;
    let mut power = w_inv_sq.clone();
    let mut j = 1u64;
    loop {
        let b = bernoulli(2 * j);
        let num = Float::from_bigint(b.numer().clone(), radix).with_precision(wp);
        let den = Float::from_bigint(b.denom().clone() * BigInt::from(2 * j), radix);
        let term = power.mul_real(&num.divide(&den)?);
        acc = acc.sub(&term);
        if term.is_zero() || term.scale() < tol {
            break;
        }
        power = power.mul(&w_inv_sq);
        j += 1;
    }
    Ok(acc.sub(&recips).rounded(target))
}

/// Polygamma `ψ⁽ᵐ⁾(z) = (−1)^{m+1}·m!·ζ(m+1, z)` for `m ≥ 1`; `m = 0`
/// falls through to [`digamma`].
///
/// # Errors
///
/// [`Error::GammaPole`] on the non-positive integers.
pub fn polygamma(m: u64, z: &Complex, target: Precision) -> Result<Complex> {
    if m == 0 {
        return digamma(z, target);
    }
    let radix = z.radix();
    let wp = Context::new(target, radix).working().extend(5);
    let s = Complex::with_radix(m as i64 + 1, radix).with_precision(wp);
    let zeta = match crate::zeta::hurwitz_zeta(&s, z, wp) {
        Ok(v) => v,
        Err(Error::ZetaPole) => return Err(Error::GammaPole),
        Err(e) => return Err(e),
    };
    let mut scaled = zeta.mul_real(&Float::from_bigint(factorial_bigint(m), radix));
    if m % 2 == 0 {
        scaled = scaled.neg();
    }
    Ok(scaled.rounded(target))
}

/// The Pochhammer symbol `(z)_w = Γ(z+w)/Γ(z)`.
///
/// Integer `w` is evaluated as a direct product (balanced-split for the
/// rising factorial, reciprocal product for negative `w`), which stays
/// finite even where the gamma ratio hits poles. Everything else is the
/// gamma ratio.
pub fn pochhammer(z: &Complex, w: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if w.is_zero() {
        return Ok(Complex::one(radix));
    }
    if w.is_integer() {
        if let Some(n) = w.re().to_bigint_rounded().to_i64() {
            let wp = Context::new(target, radix).working().extend(3);
            let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
            if n > 0 {
                return Ok(rising_product(&zw, 0, n as u64).rounded(target));
            }
            // (z)_{−n} = 1 / ((z−1)(z−2)⋯(z−n))
            let mut den = Complex::one(radix).with_precision(wp);
            for i in 1..=(-n) {
                den = den.mul(&zw.sub(&Complex::with_radix(i, radix)));
            }
            return Complex::one(radix)
                .with_precision(wp)
                .divide(&den)
                .map(|v| v.rounded(target));
        }
    }
    let wp = Context::new(target, radix).working().extend(5);
    let num = gamma(&z.add(w), wp)?;
    let den = gamma(z, wp)?;
    Ok(num.divide(&den)?.rounded(target))
}

/// Balanced product `(z+lo)(z+lo+1)⋯(z+lo+len−1)`.
fn rising_product(z: &Complex, lo: u64, len: u64) -> Complex {
    let radix = z.radix();
    if len == 0 {
        return Complex::one(radix);
    }
    if len <= 8 {
        let mut acc = z.add(&Complex::with_radix(lo as i64, radix));
        for i in 1..len {
            acc = acc.mul(&z.add(&Complex::with_radix((lo + i) as i64, radix)));
        }
        return acc;
    }
    let half = len / 2;
    rising_product(z, lo, half).mul(&rising_product(z, lo + half, len - half))
}

/// Exact `n!` by balanced-split multiplication.
pub fn factorial_bigint(n: u64) -> BigInt {
    fn split(lo: u64, hi: u64) -> BigInt {
        if lo > hi {
            return BigInt::one();
        }
        if hi - lo < 8 {
            let mut acc = BigInt::from(lo.max(1));
            for k in (lo + 1)..=hi {
                acc *= BigInt::from(k);
            }
            return acc;
        }
        let mid = lo + (hi - lo) / 2;
        split(lo, mid) * split(mid + 1, hi)
    }
    split(1, n)
}

/// `n!` as a [`Float`], rounded to the target (EXACT targets are honored:
/// factorials are integers).
pub fn factorial(n: u64, radix: u32, target: Precision) -> Result<Float> {
    Ok(Float::from_bigint(factorial_bigint(n), radix).rounded(target))
}
