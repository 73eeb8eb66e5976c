//! Bessel, Airy, Struve, and Anger–Weber functions of real order and
//! argument.
//!
//! J and I come from their ₀F₁ representations, with Hankel's asymptotic
//! ₂F₀ expansion taking over for J when its smallest-term truncation can
//! already deliver the digits. Y and K are the classical combinations of
//! J and I across the order sign; integer orders are nudged off the pole
//! of `sin(νπ)` at extended precision, near-integer orders pay their
//! measured proximity in extra digits. Airy functions reduce to order
//! ±1/3 Bessel functions, Struve and Anger–Weber to ₁F₂ sums.

use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::constants;
use crate::elementary::{cos_f, pow, powi, sin_f, sqrt_f};
use crate::error::{Error, Result};
use crate::functions::gamma::gamma_f;
use crate::hyper::{hypergeometric_0f1, hypergeometric_2f0};
use crate::number::{Complex, Float};
use crate::precision::{ensure, Context, Precision, EXTRA_PRECISION};
use crate::series::hyper_series;

/// Working precision and an off-integer order for the Y/K/Weber
/// combinations: exact integers are nudged by one unit in the last of a
/// doubled digit budget, near integers widen by their measured proximity.
fn off_integer(nu: &Float, target: Precision) -> (Precision, Float) {
    let radix = nu.radix();
    let frac = nu.sub(&Float::from_bigint(nu.to_bigint_rounded(), radix));
    if frac.is_zero() {
        let eps_digits = target.count() + EXTRA_PRECISION;
        let wp = target.extend(eps_digits + EXTRA_PRECISION);
        let nudged = ensure(nu, wp).add(&Float::radix_power(-(eps_digits as i64), radix));
        (wp, nudged)
    } else {
        let comp = (-frac.scale()).max(0) as u64;
        let wp = Context::new(target, radix).working().extend(comp).extend(5);
        (wp, ensure(&nu.rounded(wp.min(nu.precision())), wp))
    }
}

/// `(x/2)^ν` for positive `x`, through the integer fast path when it can.
fn half_power(nu: &Float, x: &Float, wp: Precision) -> Result<Float> {
    let radix = x.radix();
    let h = Complex::from_real(ensure(x, wp).divide(&Float::with_radix(2, radix))?);
    if nu.is_integer() {
        if let Some(n) = nu.to_bigint_rounded().to_i64() {
            return Ok(powi(&h, n, wp)?.re().clone());
        }
    }
    Ok(pow(&h, &Complex::from_real(nu.clone()), wp)?.re().clone())
}

/// Hankel's large-argument expansion for J, or `None` when its
/// smallest-term truncation cannot reach the requested digits.
fn hankel_j(nu: &Float, x: &Float, target: Precision) -> Result<Option<Float>> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(5);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let nuw = ensure(&nu.rounded(wp.min(nu.precision())), wp);
    let half = Float::rational(1, 2, radix, wp)?;

    // S = ₂F₀(ν+½, ½−ν;; −i/(2x))
    let w_im = Float::one(radix)
        .with_precision(wp)
        .divide(&(&xw * &Float::with_radix(2, radix)))?
        .neg();
    let w = Complex::new(Float::zero(radix), w_im);
    let a = Complex::from_real(nuw.add(&half));
    let b = Complex::from_real(half.sub(&nuw));
    let (s, achieved) = hypergeometric_2f0(&a, &b, &w, wp)?;
    if achieved < target.extend(5) {
        return Ok(None);
    }

    // ω = x − νπ/2 − π/4, reduced against π carried to the argument's scale
    let wide = wp.extend(xw.scale().max(0) as u64 + 5);
    let pi = constants::pi(radix, wide)?;
    let om = ensure(&xw, wide)
        .sub(&(&ensure(&nuw, wide) * &pi).divide(&Float::with_radix(2, radix))?)
        .sub(&pi.divide(&Float::with_radix(4, radix))?);
    let cos = cos_f(&om, wp)?;
    let sin = sin_f(&om, wp)?;

    let amp = sqrt_f(
        &Float::with_radix(2, radix)
            .with_precision(wp)
            .divide(&(&pi.rounded(wp) * &xw))?,
        wp,
    )?;
    let j = &amp * &(&(&cos * s.re()) - &(&sin * s.im()));
    Ok(Some(j.rounded(target)))
}

/// Bessel function of the first kind, `J_ν(x)`.
///
/// # Errors
///
/// [`Error::Domain`] for negative arguments or `x = 0` with a negative
/// non-integer order, where the function is unbounded or leaves the
/// real line.
pub fn besselj(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        if nu.is_zero() {
            return Ok(Float::one(radix).rounded(target));
        }
        if nu.is_integer() || nu.signum() > 0 {
            return Ok(Float::zero(radix));
        }
        return Err(Error::Domain);
    }
    if x.signum() < 0 {
        if !nu.is_integer() {
            return Err(Error::Domain);
        }
        let v = besselj(nu, &x.neg(), target)?;
        return Ok(if nu.to_bigint_rounded().is_odd() {
            v.neg()
        } else {
            v
        });
    }
    if nu.is_integer() && nu.signum() < 0 {
        // J_{−n} = (−1)ⁿ J_n
        let v = besselj(&nu.neg(), x, target)?;
        return Ok(if nu.to_bigint_rounded().is_odd() {
            v.neg()
        } else {
            v
        });
    }

    let xf = x.to_f64();
    let asym_digits = 2.0 * xf / (radix as f64).ln();
    if xf > 40.0 && asym_digits > (target.count() + 30) as f64 {
        if let Some(v) = hankel_j(nu, x, target)? {
            return Ok(v);
        }
    }

    // the alternating ₀F₁ sum peaks near e^x before collapsing to x^{−1/2}
    let comp = (xf / (radix as f64).ln()).max(0.0).ceil() as u64;
    let wp = Context::new(target, radix).working().extend(comp);
    let nuw = ensure(&nu.rounded(wp.min(nu.precision())), wp);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let quarter_sq = (&xw * &xw).divide(&Float::with_radix(-4, radix))?;
    let s = hypergeometric_0f1(
        &Complex::from_real(nuw.add(&Float::one(radix))),
        &Complex::from_real(quarter_sq),
        wp,
    )?;
    let front = half_power(&nuw, &xw, wp)?;
    let g = gamma_f(&nuw.add(&Float::one(radix)), wp)?;
    Ok((&front * s.re()).divide(&g)?.rounded(target))
}

/// Modified Bessel function of the first kind, `I_ν(x)`. Same structure
/// as [`besselj`] with the sign of the series argument flipped; the sum
/// is positive, so no cancellation margin is needed.
pub fn besseli(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        if nu.is_zero() {
            return Ok(Float::one(radix).rounded(target));
        }
        if nu.is_integer() || nu.signum() > 0 {
            return Ok(Float::zero(radix));
        }
        return Err(Error::Domain);
    }
    if x.signum() < 0 {
        if !nu.is_integer() {
            return Err(Error::Domain);
        }
        let v = besseli(nu, &x.neg(), target)?;
        return Ok(if nu.to_bigint_rounded().is_odd() {
            v.neg()
        } else {
            v
        });
    }
    if nu.is_integer() && nu.signum() < 0 {
        // I_{−n} = I_n
        return besseli(&nu.neg(), x, target);
    }

    let wp = Context::new(target, radix).working().extend(5);
    let nuw = ensure(&nu.rounded(wp.min(nu.precision())), wp);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let quarter_sq = (&xw * &xw).divide(&Float::with_radix(4, radix))?;
    let s = hypergeometric_0f1(
        &Complex::from_real(nuw.add(&Float::one(radix))),
        &Complex::from_real(quarter_sq),
        wp,
    )?;
    let front = half_power(&nuw, &xw, wp)?;
    let g = gamma_f(&nuw.add(&Float::one(radix)), wp)?;
    Ok((&front * s.re()).divide(&g)?.rounded(target))
}

/// Bessel function of the second kind,
/// `Y_ν = (J_ν cos νπ − J_{−ν})/sin νπ`.
///
/// # Errors
///
/// [`Error::Domain`] for `x ≤ 0`.
pub fn bessely(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.signum() <= 0 {
        return Err(Error::Domain);
    }
    let (wp, nuw) = off_integer(nu, target);
    let jp = besselj(&nuw, x, wp)?;
    let jm = besselj(&nuw.neg(), x, wp)?;
    let pi = constants::pi(radix, wp)?;
    let arg = &nuw * &pi;
    let num = &(&jp * &cos_f(&arg, wp)?) - &jm;
    num.divide(&sin_f(&arg, wp)?).map(|v| v.rounded(target))
}

/// Modified Bessel function of the second kind,
/// `K_ν = (π/2)(I_{−ν} − I_ν)/sin νπ`.
///
/// The difference of the two exponentially growing I values cancels down
/// to `e^{−x}`, so the margin is pre-widened by `2x` worth of digits.
///
/// # Errors
///
/// [`Error::Domain`] for `x ≤ 0`.
pub fn besselk(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.signum() <= 0 {
        return Err(Error::Domain);
    }
    let growth = (2.0 * x.to_f64() / (radix as f64).ln()).max(0.0).ceil() as u64;
    let (wp, nuw) = off_integer(&nu.abs(), target.extend(growth));
    let im = besseli(&nuw.neg(), x, wp)?;
    let ip = besseli(&nuw, x, wp)?;
    let pi = constants::pi(radix, wp)?;
    let num = (&(&im - &ip) * &pi).divide(&Float::with_radix(2, radix))?;
    num.divide(&sin_f(&(&nuw * &pi), wp)?)
        .map(|v| v.rounded(target))
}

/// Airy function `Ai(x)` via order-±1/3 Bessel functions.
pub fn airy_ai(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(5);
    let third = Float::rational(1, 3, radix, wp)?;
    if x.is_zero() {
        // Ai(0) = 3^{−2/3}/Γ(2/3)
        let two_thirds = Float::rational(2, 3, radix, wp)?;
        let p = pow(
            &Complex::with_radix(3, radix).with_precision(wp),
            &Complex::from_real(two_thirds.neg()),
            wp,
        )?;
        return p
            .re()
            .divide(&gamma_f(&Float::rational(2, 3, radix, wp)?, wp)?)
            .map(|v| v.rounded(target));
    }
    let t = ensure(&x.abs().rounded(wp.min(x.precision())), wp);
    let zeta = zeta_argument(&t, wp)?;
    let root = sqrt_f(&t, wp)?;
    if x.signum() > 0 {
        // Ai = (1/π)·√(x/3)·K_{1/3}(ζ)
        let k = besselk(&third, &zeta, wp)?;
        let pi = constants::pi(radix, wp)?;
        let amp = root.divide(&sqrt_f(&Float::with_radix(3, radix).with_precision(wp), wp)?)?;
        (&amp * &k).divide(&pi).map(|v| v.rounded(target))
    } else {
        // Ai(−t) = (√t/3)·(J_{1/3}(ζ) + J_{−1/3}(ζ))
        let sum = besselj(&third, &zeta, wp)?.add(&besselj(&third.neg(), &zeta, wp)?);
        Ok((&root.divide(&Float::with_radix(3, radix))? * &sum).rounded(target))
    }
}

/// Airy function `Bi(x)` via order-±1/3 Bessel functions.
pub fn airy_bi(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(5);
    let third = Float::rational(1, 3, radix, wp)?;
    if x.is_zero() {
        // Bi(0) = 3^{−1/6}/Γ(2/3)
        let sixth = Float::rational(1, 6, radix, wp)?;
        let p = pow(
            &Complex::with_radix(3, radix).with_precision(wp),
            &Complex::from_real(sixth.neg()),
            wp,
        )?;
        return p
            .re()
            .divide(&gamma_f(&Float::rational(2, 3, radix, wp)?, wp)?)
            .map(|v| v.rounded(target));
    }
    let t = ensure(&x.abs().rounded(wp.min(x.precision())), wp);
    let zeta = zeta_argument(&t, wp)?;
    let amp = sqrt_f(
        &t.divide(&Float::with_radix(3, radix))?,
        wp,
    )?;
    if x.signum() > 0 {
        // Bi = √(x/3)·(I_{−1/3}(ζ) + I_{1/3}(ζ))
        let sum = besseli(&third.neg(), &zeta, wp)?.add(&besseli(&third, &zeta, wp)?);
        Ok((&amp * &sum).rounded(target))
    } else {
        // Bi(−t) = √(t/3)·(J_{−1/3}(ζ) − J_{1/3}(ζ))
        let diff = besselj(&third.neg(), &zeta, wp)?.sub(&besselj(&third, &zeta, wp)?);
        Ok((&amp * &diff).rounded(target))
    }
}

/// `ζ = (2/3)·t^{3/2}`, the Airy turning-point variable.
fn zeta_argument(t: &Float, wp: Precision) -> Result<Float> {
    let radix = t.radix();
    let cube = &(t * t) * t;
    sqrt_f(&cube, wp)?
        .mul(&Float::with_radix(2, radix))
        .divide(&Float::with_radix(3, radix))
}

/// Struve function
/// `H_ν(x) = (x/2)^{ν+1}/(Γ(3/2)Γ(ν+3/2))·₁F₂(1; 3/2, ν+3/2; −x²/4)`.
///
/// # Errors
///
/// [`Error::GammaPole`] when `ν + 3/2` is a non-positive integer;
/// [`Error::Domain`] for negative arguments at non-integer order.
pub fn struve_h(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if x.signum() < 0 {
        if !nu.is_integer() {
            return Err(Error::Domain);
        }
        // H_n(−x) = (−1)^{n+1} H_n(x)
        let v = struve_h(nu, &x.neg(), target)?;
        return Ok(if nu.to_bigint_rounded().is_odd() {
            v
        } else {
            v.neg()
        });
    }
    let comp = (x.to_f64() / (radix as f64).ln()).max(0.0).ceil() as u64;
    let wp = Context::new(target, radix).working().extend(comp).extend(5);
    let nuw = ensure(&nu.rounded(wp.min(nu.precision())), wp);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let three_halves = Float::rational(3, 2, radix, wp)?;
    let shifted = nuw.add(&three_halves);
    let w = Complex::from_real((&xw * &xw).divide(&Float::with_radix(-4, radix))?);
    let s = hyper_series(
        &[Complex::one(radix).with_precision(wp)],
        &[
            Complex::from_real(three_halves.clone()),
            Complex::from_real(shifted.clone()),
        ],
        &w,
        &Context::new(wp, radix),
    )?;
    let front = half_power(&nuw.add(&Float::one(radix)), &xw, wp)?;
    let den = &gamma_f(&three_halves, wp)? * &gamma_f(&shifted, wp)?;
    (&front * s.re()).divide(&den).map(|v| v.rounded(target))
}

/// The two auxiliary Anger–Weber sums, prefactors included:
/// `S₁ = ₁F₂(1; 1+ν/2, 1−ν/2; −x²/4)/(Γ(1+ν/2)Γ(1−ν/2))` and
/// `S₂ = (x/2)·₁F₂(1; 3/2+ν/2, 3/2−ν/2; −x²/4)/(Γ(3/2+ν/2)Γ(3/2−ν/2))`.
fn anger_sums(nu: &Float, x: &Float, wp: Precision) -> Result<(Float, Float)> {
    let radix = x.radix();
    let half_nu = nu.divide(&Float::with_radix(2, radix))?;
    let one = Float::one(radix).with_precision(wp);
    let three_halves = Float::rational(3, 2, radix, wp)?;
    let w = Complex::from_real((x * x).divide(&Float::with_radix(-4, radix))?);
    let ctx = Context::new(wp, radix);
    let unit = [Complex::one(radix).with_precision(wp)];

    let a1 = one.add(&half_nu);
    let b1 = one.sub(&half_nu);
    let s1 = hyper_series(
        &unit,
        &[Complex::from_real(a1.clone()), Complex::from_real(b1.clone())],
        &w,
        &ctx,
    )?;
    let sum1 = s1
        .re()
        .divide(&(&gamma_f(&a1, wp)? * &gamma_f(&b1, wp)?))?;

    let a2 = three_halves.add(&half_nu);
    let b2 = three_halves.sub(&half_nu);
    let s2 = hyper_series(
        &unit,
        &[Complex::from_real(a2.clone()), Complex::from_real(b2.clone())],
        &w,
        &ctx,
    )?;
    let sum2 = (&x.divide(&Float::with_radix(2, radix))? * s2.re())
        .divide(&(&gamma_f(&a2, wp)? * &gamma_f(&b2, wp)?))?;
    Ok((sum1, sum2))
}

/// Anger function `J_ν(x)`; coincides with Bessel J at integer order.
pub fn anger_j(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if nu.is_integer() {
        return besselj(nu, x, target);
    }
    let comp = (x.to_f64().abs() / (radix as f64).ln()).ceil().max(0.0) as u64;
    let wp = Context::new(target, radix).working().extend(comp).extend(5);
    let nuw = ensure(&nu.rounded(wp.min(nu.precision())), wp);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let (s1, s2) = anger_sums(&nuw, &xw, wp)?;
    let half_arg = (&nuw * &constants::pi(radix, wp)?).divide(&Float::with_radix(2, radix))?;
    let v = &(&cos_f(&half_arg, wp)? * &s1) + &(&sin_f(&half_arg, wp)? * &s2);
    Ok(v.rounded(target))
}

/// Weber function `E_ν(x)`; integer orders go through the standard
/// off-integer nudge, since both auxiliary sums degenerate there.
pub fn weber_e(nu: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let comp = (x.to_f64().abs() / (radix as f64).ln()).ceil().max(0.0) as u64;
    let (wp, nuw) = off_integer(nu, target.extend(comp));
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let (s1, s2) = anger_sums(&nuw, &xw, wp)?;
    let half_arg = (&nuw * &constants::pi(radix, wp)?).divide(&Float::with_radix(2, radix))?;
    let v = &(&sin_f(&half_arg, wp)? * &s1) - &(&cos_f(&half_arg, wp)? * &s2);
    Ok(v.rounded(target))
}
