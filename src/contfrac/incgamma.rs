//! Incomplete gamma functions.
//!
//! The split follows the classic recipe: for `x < a + 1` the lower
//! function comes from the confluent series `γ(a,x) = x^a e^{−x}/a ·
//! ₁F₁(1; a+1; x)` when `x` is small, or from its continued fractions
//! nearer the boundary; for larger `x` the upper function comes from its
//! continued fractions. Each fraction direction carries two equivalent
//! forms — a fraction and its even contraction — and the probe picks
//! whichever settles faster. The other half of each pair is the
//! complement against the complete `Γ(a)`, with the working precision
//! widened by the digits the subtraction is observed to cancel.

use crate::contfrac::lentz::{continued_fraction_best, Fraction};
use crate::error::{Error, Result};
use crate::functions::gamma::gamma_f;
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision};
use crate::series::hyper_series;

/// Complement-subtraction retries; the measured cancellation converges in
/// one step.
const COMPLEMENT_RETRIES: u32 = 4;

/// `x^a · e^{−x}` evaluated through one exponential so neither factor
/// overflows on its own.
fn prefactor(a: &Float, x: &Float, wp: Precision) -> Result<Float> {
    let t = (&a.with_precision(wp) * &crate::elementary::ln_f(x, wp)?)
        .sub(&x.with_precision(wp));
    crate::elementary::exp_f(&t, wp)
}

/// Series half: `γ(a,x)` for `x < a + 1`.
fn lower_series(a: &Float, x: &Float, target: Precision, radix: u32) -> Result<Float> {
    let wp = Context::new(target, radix).working();
    let a_plus = Complex::from_real(a.with_precision(wp).add(&Float::one(radix)));
    let ctx = Context::new(wp, radix);
    let sum = hyper_series(
        &[Complex::one(radix)],
        &[a_plus],
        &Complex::from_real(x.with_precision(wp)),
        &ctx,
    )?;
    let front = prefactor(a, x, wp)?.divide(&a.with_precision(wp))?;
    Ok((&front * sum.re()).rounded(target))
}

/// Fraction half of `γ(a,x)` below the `x = a + 1` boundary:
/// `γ = x^a e^{−x} · F` with
/// `F = 1/(a − ax/(a+1 + x/(a+2 − (a+1)x/(a+3 + 2x/(a+4 − …)))))`
/// (uncontracted, `bₙ = a + n − 1`), or its even contraction
/// `aₙ = −(a+n−2)x`, `bₙ = a + n − 1 + x`.
fn lower_fraction(a: &Float, x: &Float, target: Precision, radix: u32) -> Result<Float> {
    let ctx = Context::new(target.extend(5), radix);
    let wp = ctx.working();
    let af = a.with_precision(wp);
    let xf = x.with_precision(wp);

    let uncontracted = Fraction::new(
        Complex::zero(radix),
        {
            let af = af.clone();
            let xf = xf.clone();
            move |n| {
                if n == 1 {
                    Complex::one(radix)
                } else if n % 2 == 0 {
                    let m = Float::with_radix(n as i64 / 2 - 1, radix);
                    Complex::from_real((&af.add(&m) * &xf).neg())
                } else {
                    let m = Float::with_radix(n as i64 / 2, radix);
                    Complex::from_real(&m * &xf)
                }
            }
        },
        {
            let af = af.clone();
            move |n| Complex::from_real(af.add(&Float::with_radix(n as i64 - 1, radix)))
        },
    );
    let contracted = Fraction::new(
        Complex::zero(radix),
        {
            let af = af.clone();
            let xf = xf.clone();
            move |n| {
                if n == 1 {
                    Complex::one(radix)
                } else {
                    let s = Float::with_radix(n as i64 - 2, radix);
                    Complex::from_real((&af.add(&s) * &xf).neg())
                }
            }
        },
        {
            let af = af.clone();
            let xf = xf.clone();
            move |n| {
                if n == 1 {
                    Complex::from_real(af.clone())
                } else {
                    Complex::from_real(
                        af.add(&Float::with_radix(n as i64 - 1, radix)).add(&xf),
                    )
                }
            }
        },
    );

    let cf = continued_fraction_best(&[uncontracted, contracted], &ctx)?;
    let front = prefactor(a, x, wp)?;
    Ok((&front * cf.re()).rounded(target))
}

/// `γ(a,x)` below the boundary: confluent series while `2x < a + 1`,
/// the probed fraction forms from there up to `x = a + 1`.
fn lower_value(a: &Float, x: &Float, target: Precision, radix: u32) -> Result<Float> {
    let twice = x * &Float::with_radix(2, radix);
    let boundary = a.add(&Float::one(radix));
    if twice < boundary {
        lower_series(a, x, target, radix)
    } else {
        lower_fraction(a, x, target, radix)
    }
}

/// Fraction half: `Γ(a,x)` for `x ≥ a + 1`, by the Legendre continued
/// fraction with coefficients `aₙ = −(n−1)(n−1−a)`, `bₙ = x + 2n − 1 − a`,
/// or its uncontracted parent
/// `Γ = x^a e^{−x}/(x + (1−a)/(1 + 1/(x + (2−a)/(1 + 2/(x + …)))))`.
fn upper_fraction(a: &Float, x: &Float, target: Precision, radix: u32) -> Result<Float> {
    let ctx = Context::new(target.extend(5), radix);
    let wp = ctx.working();
    let af = a.with_precision(wp);
    let xf = x.with_precision(wp);

    let legendre = Fraction::new(
        Complex::zero(radix),
        {
            let af = af.clone();
            move |n| {
                if n == 1 {
                    Complex::one(radix)
                } else {
                    let m = Float::with_radix(n as i64 - 1, radix);
                    Complex::from_real((&m * &(&m - &af)).neg())
                }
            }
        },
        {
            let af = af.clone();
            let xf = xf.clone();
            move |n| {
                let shift = Float::with_radix(2 * n as i64 - 1, radix);
                Complex::from_real(&(&xf + &shift) - &af)
            }
        },
    );
    let uncontracted = Fraction::new(
        Complex::zero(radix),
        {
            let af = af.clone();
            move |n| {
                if n == 1 {
                    Complex::one(radix)
                } else if n % 2 == 0 {
                    Complex::from_real(&Float::with_radix(n as i64 / 2, radix) - &af)
                } else {
                    Complex::with_radix(n as i64 / 2, radix)
                }
            }
        },
        {
            let xf = xf.clone();
            move |n| {
                if n % 2 == 1 {
                    Complex::from_real(xf.clone())
                } else {
                    Complex::one(radix)
                }
            }
        },
    );

    let cf = continued_fraction_best(&[legendre, uncontracted], &ctx)?;
    let front = prefactor(a, x, wp)?;
    Ok((&front * cf.re()).rounded(target))
}

/// Whether the complement subtraction is safe at the current compensation,
/// or needs another round with more digits.
fn complement(whole: &Float, part: &Float, comp: &mut u64) -> Option<Float> {
    let diff = whole.sub(part);
    let needed = if diff.is_zero() {
        0
    } else {
        (whole.scale() - diff.scale()).max(0) as u64
    };
    if needed > *comp {
        *comp = needed;
        None
    } else {
        Some(diff)
    }
}

/// Lower incomplete gamma `γ(a, x)`.
///
/// # Errors
///
/// [`Error::Domain`] for `x < 0`; [`Error::GammaPole`] when `a` is zero or
/// a negative integer, where `γ` inherits the pole of `Γ`.
pub fn gamma_lower(a: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = a.radix();
    if x.signum() < 0 {
        return Err(Error::Domain);
    }
    if a.is_integer() && a.signum() <= 0 {
        return Err(Error::GammaPole);
    }
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let boundary = a.add(&Float::one(radix));
    if x < &boundary {
        return lower_value(a, x, target, radix);
    }
    // Large x: γ = Γ − Γ(a,x); the upper tail is small there, so the
    // subtraction rarely cancels, but it is still measured.
    let ctx = Context::new(target, radix);
    let mut comp = 0u64;
    for _ in 0..COMPLEMENT_RETRIES {
        let wp = ctx.working().extend(comp);
        let whole = gamma_f(a, wp)?;
        let tail = upper_fraction(a, x, wp, radix)?;
        if let Some(diff) = complement(&whole, &tail, &mut comp) {
            return Ok(diff.rounded(target));
        }
    }
    Err(Error::LossOfPrecision)
}

/// Upper incomplete gamma `Γ(a, x)`.
///
/// # Errors
///
/// [`Error::Domain`] for `x < 0`; [`Error::GammaPole`] when the complete
/// `Γ(a)` is needed (at `x = 0`, or on the series side of the split) and
/// `a` sits on a pole.
pub fn gamma_upper(a: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = a.radix();
    if x.signum() < 0 {
        return Err(Error::Domain);
    }
    if x.is_zero() {
        return gamma_f(a, target);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let boundary = a.add(&Float::one(radix));
    if x >= &boundary {
        return upper_fraction(a, x, target, radix);
    }
    // Small x: Γ(a,x) = Γ − γ(a,x), which cancels as γ approaches Γ.
    let ctx = Context::new(target, radix);
    let mut comp = 0u64;
    for _ in 0..COMPLEMENT_RETRIES {
        let wp = ctx.working().extend(comp);
        let whole = gamma_f(a, wp)?;
        let head = lower_value(a, x, wp, radix)?;
        if let Some(diff) = complement(&whole, &head, &mut comp) {
            return Ok(diff.rounded(target));
        }
    }
    Err(Error::LossOfPrecision)
}
