//! Circular and hyperbolic functions with their inverses.
//!
//! Real sine and cosine are the primitives: argument reduction by
//! multiples of π followed by a paired Taylor sum. Everything complex
//! routes through `exp(iz)`, and every inverse is a logarithm formula.
//! Reductions and differences near a zero of the target function lose
//! leading digits, so each evaluator measures the loss on a first pass
//! and retries with the working precision widened by the measured gap.

use num_integer::Integer;

use crate::constants;
use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision};

use super::explog::{exp, exp_f, ln};
use super::root::sqrt;

/// Zero-of-the-function retries before giving up. The measured
/// compensation converges in one step; the extra rounds absorb a
/// borderline measurement.
const NEAR_ZERO_RETRIES: u32 = 4;

/// Reduce `x` by the nearest multiple of π: returns `t` in `[−π/2, π/2)`
/// and whether that multiple was odd (which flips the sign of both sine
/// and cosine).
fn reduce_pi(x: &Float, wp: Precision) -> Result<(Float, bool)> {
    let radix = x.radix();
    let pi = constants::pi(radix, wp)?;
    let kf = x
        .with_precision(wp)
        .divide(&pi)?
        .add(&Float::rational(1, 2, radix, wp)?)
        .floor();
    if kf.is_zero() {
        return Ok((x.rounded(wp), false));
    }
    let t = x.with_precision(wp).sub(&(&pi * &kf));
    Ok((t, kf.to_bigint_rounded().is_odd()))
}

/// Paired Taylor sums for sine and cosine of a reduced argument.
fn sin_cos_taylor(t: &Float, wp: Precision) -> Result<(Float, Float)> {
    let radix = t.radix();
    let goal = wp.count() as i64;
    let t = t.with_precision(wp);
    let mt2 = (&t * &t).neg();
    let mut cterm = Float::one(radix).with_precision(wp);
    let mut sterm = t.clone();
    let mut c = cterm.clone();
    let mut s = sterm.clone();
    let mut j: i64 = 1;
    loop {
        cterm = (&cterm * &mt2).divide(&Float::with_radix((2 * j - 1) * (2 * j), radix))?;
        sterm = (&sterm * &mt2).divide(&Float::with_radix((2 * j) * (2 * j + 1), radix))?;
        c = &c + &cterm;
        s = &s + &sterm;
        let c_done = cterm.is_zero() || -cterm.scale() > goal + 1;
        let s_done = sterm.is_zero() || -sterm.scale() > goal + 1;
        if c_done && s_done {
            break;
        }
        j += 1;
    }
    Ok((s, c))
}

/// Real sine.
///
/// # Errors
///
/// [`Error::InfiniteExpansion`] for an EXACT target on a nonzero argument.
pub fn sin_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let mut comp = x.scale().max(0) as u64;
    for _ in 0..NEAR_ZERO_RETRIES {
        let wp = ctx.working().extend(comp);
        let (t, odd) = reduce_pi(x, wp)?;
        // A reduced argument near zero means x sits near a zero of sine;
        // the reduction must then carry the cancelled digits too.
        let needed = x.scale().max(0) as u64 + (-t.scale()).max(0) as u64;
        if needed > comp {
            comp = needed;
            continue;
        }
        let (s, _) = sin_cos_taylor(&t, wp)?;
        let s = if odd { s.neg() } else { s };
        return Ok(s.rounded(target));
    }
    Err(Error::LossOfPrecision)
}

/// Real cosine, as `sin(x + π/2)`.
pub fn cos_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::one(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = Context::new(target, radix)
        .working()
        .extend(x.scale().max(0) as u64 + 5);
    let pi = constants::pi(radix, wp)?;
    let shifted = x
        .with_precision(wp)
        .add(&pi.divide(&Float::with_radix(2, radix))?);
    sin_f(&shifted, target)
}

/// Real tangent. Near an odd multiple of π/2 the cosine underflows its
/// leading digits; the quotient is retried with the measured shortfall.
pub fn tan_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let mut comp = 0u64;
    for _ in 0..NEAR_ZERO_RETRIES {
        let wq = ctx.working().extend(comp);
        let c = cos_f(x, wq)?;
        let needed = (-c.scale()).max(0) as u64;
        if needed > comp {
            comp = needed;
            continue;
        }
        let s = sin_f(x, wq)?;
        return s.divide(&c).map(|t| t.rounded(target));
    }
    Err(Error::LossOfPrecision)
}

/// Complex sine via `(e^{iz} − e^{−iz}) / 2i`.
pub fn sin(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_real() {
        return sin_f(z.re(), target).map(Complex::from_real);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    // For small z the two exponentials agree in their leading digits.
    let comp = (-z.scale()).max(0) as u64;
    let wp = Context::new(target, radix).working().extend(comp);
    let u = exp(&z.mul_i(), wp)?;
    let v = Complex::one(radix).with_precision(wp).divide(&u)?;
    u.sub(&v)
        .div_i()
        .divide_real(&Float::with_radix(2, radix))
        .map(|w| w.rounded(target))
}

/// Complex cosine via `(e^{iz} + e^{−iz}) / 2`.
pub fn cos(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_real() {
        return cos_f(z.re(), target).map(Complex::from_real);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let mut comp = 0u64;
    for _ in 0..NEAR_ZERO_RETRIES {
        let wp = ctx.working().extend(comp);
        let u = exp(&z.mul_i(), wp)?;
        let v = Complex::one(radix).with_precision(wp).divide(&u)?;
        let sum = u.add(&v);
        let needed = (-sum.scale()).max(0) as u64;
        if needed > comp {
            comp = needed;
            continue;
        }
        return sum
            .divide_real(&Float::with_radix(2, radix))
            .map(|w| w.rounded(target));
    }
    Err(Error::LossOfPrecision)
}

/// Complex tangent via `−i·(e^{iz} − e^{−iz}) / (e^{iz} + e^{−iz})`.
pub fn tan(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_real() {
        return tan_f(z.re(), target).map(Complex::from_real);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let mut comp = (-z.scale()).max(0) as u64;
    for _ in 0..NEAR_ZERO_RETRIES {
        let wp = ctx.working().extend(comp);
        let u = exp(&z.mul_i(), wp)?;
        let v = Complex::one(radix).with_precision(wp).divide(&u)?;
        let den = u.add(&v);
        let needed = (-den.scale()).max(0) as u64 + (-z.scale()).max(0) as u64;
        if needed > comp {
            comp = needed;
            continue;
        }
        return u.sub(&v).divide(&den).map(|w| w.div_i().rounded(target));
    }
    Err(Error::LossOfPrecision)
}

/// Real hyperbolic sine.
pub fn sinh_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let comp = (-x.scale()).max(0) as u64;
    let wp = Context::new(target, radix).working().extend(comp);
    let u = exp_f(&x.with_precision(wp), wp)?;
    let v = Float::one(radix).with_precision(wp).divide(&u)?;
    u.sub(&v)
        .divide(&Float::with_radix(2, radix))
        .map(|w| w.rounded(target))
}

/// Real hyperbolic cosine.
pub fn cosh_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::one(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = Context::new(target, radix).working();
    let u = exp_f(&x.with_precision(wp), wp)?;
    let v = Float::one(radix).with_precision(wp).divide(&u)?;
    u.add(&v)
        .divide(&Float::with_radix(2, radix))
        .map(|w| w.rounded(target))
}

/// Real hyperbolic tangent.
pub fn tanh_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let comp = (-x.scale()).max(0) as u64;
    let wp = Context::new(target, radix).working().extend(comp);
    let u = exp_f(&x.with_precision(wp), wp)?;
    let v = Float::one(radix).with_precision(wp).divide(&u)?;
    u.sub(&v)
        .divide(&u.add(&v))
        .map(|w| w.rounded(target))
}

/// Complex hyperbolic sine, `sinh z = −i·sin(iz)`.
pub fn sinh(z: &Complex, target: Precision) -> Result<Complex> {
    if z.is_real() {
        return sinh_f(z.re(), target).map(Complex::from_real);
    }
    sin(&z.mul_i(), target).map(|w| w.div_i())
}

/// Complex hyperbolic cosine, `cosh z = cos(iz)`.
pub fn cosh(z: &Complex, target: Precision) -> Result<Complex> {
    if z.is_real() {
        return cosh_f(z.re(), target).map(Complex::from_real);
    }
    cos(&z.mul_i(), target)
}

/// Complex hyperbolic tangent, `tanh z = −i·tan(iz)`.
pub fn tanh(z: &Complex, target: Precision) -> Result<Complex> {
    if z.is_real() {
        return tanh_f(z.re(), target).map(Complex::from_real);
    }
    tan(&z.mul_i(), target).map(|w| w.div_i())
}

/// Remap the degenerate log/divide failures of an inverse-trig formula
/// onto the function's own domain error.
fn domain_edge(e: Error) -> Error {
    match e {
        Error::DivisionByZero | Error::LogOfZero => Error::Domain,
        e => e,
    }
}

/// Principal arctangent, `atan z = ln((1+iz)/(1−iz)) / 2i`.
///
/// # Errors
///
/// [`Error::Domain`] at the branch points `±i`.
pub fn atan(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = Context::new(target, radix).working();
    let one = Complex::one(radix).with_precision(wp);
    let iz = z.rounded(wp).mul_i();
    let w = one.add(&iz).divide(&one.sub(&iz)).map_err(domain_edge)?;
    let l = ln(&w, wp).map_err(domain_edge)?;
    l.div_i()
        .divide_real(&Float::with_radix(2, radix))
        .map(|r| r.rounded(target))
}

/// Principal arcsine, `asin z = −i·ln(iz + √(1−z²))`.
pub fn asin(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let mut comp = 0u64;
    for _ in 0..NEAR_ZERO_RETRIES {
        let wp = ctx.working().extend(comp);
        let zz = z.rounded(wp).mul(&z.rounded(wp));
        let d = Complex::one(radix).with_precision(wp).sub(&zz);
        // 1 − z² cancels near the branch points ±1
        let needed = (-d.scale()).max(0) as u64;
        if needed > comp {
            comp = needed;
            continue;
        }
        let s = sqrt(&d, wp)?;
        let w = z.rounded(wp).mul_i().add(&s);
        let l = ln(&w, wp).map_err(domain_edge)?;
        return Ok(l.div_i().rounded(target));
    }
    Err(Error::LossOfPrecision)
}

/// Principal arccosine, `acos z = π/2 − asin z`.
pub fn acos(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let mut comp = 0u64;
    for _ in 0..NEAR_ZERO_RETRIES {
        let wp = ctx.working().extend(comp);
        let pi = constants::pi(radix, wp)?;
        let half_pi = Complex::from_real(pi.divide(&Float::with_radix(2, radix))?);
        let r = half_pi.sub(&asin(z, wp)?);
        // acos vanishes at z = 1; the subtraction eats digits there
        let needed = if r.is_zero() { 0 } else { (-r.scale()).max(0) as u64 };
        if needed > comp {
            comp = needed;
            continue;
        }
        return Ok(r.rounded(target));
    }
    Err(Error::LossOfPrecision)
}

/// Principal inverse hyperbolic tangent, `atanh z = ln((1+z)/(1−z)) / 2`.
///
/// # Errors
///
/// [`Error::Domain`] at the branch points `±1`.
pub fn atanh(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = Context::new(target, radix).working();
    let one = Complex::one(radix).with_precision(wp);
    let w = one
        .add(&z.rounded(wp))
        .divide(&one.sub(&z.rounded(wp)))
        .map_err(domain_edge)?;
    let l = ln(&w, wp).map_err(domain_edge)?;
    l.divide_real(&Float::with_radix(2, radix))
        .map(|r| r.rounded(target))
}

/// Principal inverse hyperbolic sine, `asinh z = ln(z + √(z²+1))`.
/// Arguments in the left half plane reflect through `asinh(−z) = −asinh z`
/// so the sum inside the log never cancels.
pub fn asinh(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    if z.re().signum() < 0 || (z.re().is_zero() && z.im().signum() < 0) {
        return asinh(&z.neg(), target).map(|w| w.neg());
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = Context::new(target, radix).working();
    let zz = z.rounded(wp).mul(&z.rounded(wp));
    let s = sqrt(&zz.add(&Complex::one(radix).with_precision(wp)), wp)?;
    ln(&z.rounded(wp).add(&s), wp).map(|l| l.rounded(target))
}

/// Principal inverse hyperbolic cosine,
/// `acosh z = ln(z + √(z+1)·√(z−1))`. The split square roots keep the
/// branch cut on `(−∞, 1)`.
pub fn acosh(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z == &Complex::one(radix) {
        return Ok(Complex::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let wp = Context::new(target, radix).working();
    let one = Complex::one(radix).with_precision(wp);
    let sp = sqrt(&z.rounded(wp).add(&one), wp)?;
    let sm = sqrt(&z.rounded(wp).sub(&one), wp)?;
    ln(&z.rounded(wp).add(&sp.mul(&sm)), wp).map(|l| l.rounded(target))
}

/// Principal argument of a nonzero complex value, in `(−π, π]`.
///
/// # Errors
///
/// [`Error::Domain`] at zero, where the angle is undefined.
pub fn arg(z: &Complex, target: Precision) -> Result<Float> {
    let radix = z.radix();
    if z.is_zero() {
        return Err(Error::Domain);
    }
    if z.is_real() && z.re().signum() > 0 {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    ln(z, target).map(|l| l.im().clone())
}

/// Two-argument arctangent: the angle of the point `(x, y)`.
pub fn atan2(y: &Float, x: &Float, target: Precision) -> Result<Float> {
    arg(&Complex::new(x.clone(), y.clone()), target)
}
