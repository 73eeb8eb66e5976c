//! Roots and inverse roots by Newton iteration.
//!
//! All roots run the same scheme: a double-precision seed from the
//! floating-point split of the argument, then Newton on `f(r) = 1 − z·rⁿ`
//! (whose root is `z^{−1/n}`) with a doubling precision schedule, finished
//! by a precising iteration whose correction is computed with
//! full-precision operands. `z^{1/n}` is then `z · (z^{−1/n})^{n−1}`, which
//! costs one multiplication chain instead of a division.

use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision};

/// Significant digits a double seed is good for in the given radix.
pub(crate) fn seed_digits(radix: u32) -> u64 {
    ((48.0 / (radix as f64).log2()).floor() as u64).max(2)
}

/// `z^n` for unsigned `n` by repeated squaring. Rounding happens inside
/// the substrate multiplication, so intermediate mantissas stay bounded.
pub(crate) fn powi_complex(z: &Complex, n: u64) -> Complex {
    let mut result = Complex::one(z.radix()).with_precision(z.precision());
    let mut base = z.clone();
    let mut n = n;
    while n > 0 {
        if n & 1 == 1 {
            result = result.mul(&base);
        }
        n >>= 1;
        if n > 0 {
            base = base.mul(&base);
        }
    }
    result
}

/// Real counterpart of [`powi_complex`].
pub(crate) fn powi_float(x: &Float, n: u64) -> Float {
    let mut result = Float::one(x.radix()).with_precision(x.precision());
    let mut base = x.clone();
    let mut n = n;
    while n > 0 {
        if n & 1 == 1 {
            result = &result * &base;
        }
        n >>= 1;
        if n > 0 {
            base = &base * &base;
        }
    }
    result
}

/// Double-accuracy seed for `|z|^{−1/n}·e^{−i·arg(z)/n}` that survives
/// astronomically large scales: the magnitude is handled in log space and
/// re-assembled as `m · radix^q` with `m` in `[1, radix)`.
fn inv_root_seed(z: &Complex, n: u64, radix: u32) -> Complex {
    let (fr, sr) = z.re().to_f64_parts();
    let (fi, si) = z.im().to_f64_parts();
    let smax = sr.max(si);
    let log_r = (radix as f64).ln();
    // Rebase both components against the larger scale; the smaller one
    // underflows harmlessly to zero if the gap is big.
    let scale_to = |f: f64, s: i64| -> f64 {
        let d = s - smax;
        if d < -200 {
            0.0
        } else {
            f * (radix as f64).powi(d as i32)
        }
    };
    let (xr, xi) = (
        if z.re().is_zero() { 0.0 } else { scale_to(fr, sr) },
        if z.im().is_zero() { 0.0 } else { scale_to(fi, si) },
    );
    let mag = xr.hypot(xi);
    let angle = xi.atan2(xr);

    // log_radix of |z|^{-1/n}, split into integer and fractional digits
    let t = -(mag.ln() / log_r + smax as f64) / n as f64;
    let q = t.floor();
    let m = (radix as f64).powf(t - q);
    let theta = -angle / n as f64;

    let re = Float::from_f64(m * theta.cos(), radix);
    let im = Float::from_f64(m * theta.sin(), radix);
    Complex::new(re, im).mul_real(&Float::radix_power(q as i64, radix))
}

/// One Newton update `r' = r + r·(1 − z·rⁿ)/n` at precision `p`.
fn newton_step(r: &Complex, z: &Complex, n: u64, p: Precision) -> Result<Complex> {
    let radix = r.radix();
    let r = r.with_precision(p);
    let zp = z.rounded(p);
    let residual = Complex::one(radix).sub(&zp.mul(&powi_complex(&r, n)));
    let correction = r
        .mul(&residual)
        .divide(&Complex::with_radix(n as i64, radix))?;
    Ok(r.add(&correction))
}

/// `z^{−1/n}` on the branch rotated `k` times by the n-th root of unity.
///
/// # Errors
///
/// [`Error::ZerothRoot`] for `n = 0`, [`Error::InverseRootOfZero`] for a
/// zero argument, and [`Error::InfiniteExpansion`] for an EXACT target,
/// whose digit expansion does not terminate in general.
pub fn inv_root(z: &Complex, n: u64, k: i64, target: Precision) -> Result<Complex> {
    if n == 0 {
        return Err(Error::ZerothRoot);
    }
    if z.is_zero() {
        return Err(Error::InverseRootOfZero);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let radix = z.radix();
    if n == 1 && k == 0 {
        return Complex::one(radix)
            .with_precision(target)
            .divide(&z.rounded(target.extend(5)))
            .map(|w| w.rounded(target));
    }

    let ctx = Context::new(target, radix);
    let working = ctx.working();
    let w = newton_refine(z, n, working)?;
    let w = rotate_branch(&w, n, k.rem_euclid(n as i64) as u64, working)?;
    Ok(w.rounded(target))
}

/// Newton with the doubling schedule plus the precising final step.
fn newton_refine(z: &Complex, n: u64, working: Precision) -> Result<Complex> {
    let radix = z.radix();
    let mut p = seed_digits(radix);
    let goal = working.count();
    let mut w = inv_root_seed(z, n, radix).with_precision(Precision::digits(p));
    while p < goal {
        // Each step doubles the trusted digits; stop one short of the goal
        // so the last doubling does not overshoot into wasted precision.
        p = (2 * p).min(goal);
        w = newton_step(&w, z, n, Precision::digits(p))?;
    }
    // Precising iteration: correction with full-precision operands.
    newton_step(&w, z, n, working)
}

/// Multiply by `e^{2πik/n}`. Quarter-turn rotations have exact closed
/// forms; everything else goes through `exp`.
fn rotate_branch(w: &Complex, n: u64, k: u64, working: Precision) -> Result<Complex> {
    if k == 0 {
        return Ok(w.clone());
    }
    // 2πk/n as a multiple of π/2: 4k/n quarter turns when n | 4k
    if (4 * k) % n == 0 {
        return Ok(match ((4 * k) / n) % 4 {
            0 => w.clone(),
            1 => w.mul_i(),
            2 => w.neg(),
            _ => w.div_i(),
        });
    }
    let radix = w.radix();
    let pi = crate::constants::pi(radix, working)?;
    let angle = pi
        .mul(&Float::with_radix(2 * k as i64, radix).with_precision(working))
        .divide(&Float::with_radix(n as i64, radix))?;
    let rotation = super::explog::exp(&Complex::new(Float::zero(radix), angle), working)?;
    Ok(w.mul(&rotation))
}

/// Principal `z^{1/n}`, branch `k`.
///
/// # Errors
///
/// [`Error::ZerothRoot`] for `n = 0`. The zeroth branch of an exact
/// argument with `n = 1` passes through unchanged; all other exact targets
/// raise [`Error::InfiniteExpansion`].
pub fn root(z: &Complex, n: u64, k: i64, target: Precision) -> Result<Complex> {
    if n == 0 {
        return Err(Error::ZerothRoot);
    }
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    if n == 1 && k == 0 {
        return Ok(crate::precision::limit_complex(z, target));
    }
    // Real non-negative arguments on the principal branch stay real.
    if z.is_real() && z.re().signum() > 0 && k == 0 {
        return Ok(Complex::from_real(root_f(z.re(), n, target)?));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let working = target.extend(Context::new(target, radix).margin);
    let w = inv_root(z, n, 0, working)?;
    let r = z.rounded(working).mul(&powi_complex(&w, n - 1));
    let r = rotate_branch(&r, n, k.rem_euclid(n as i64) as u64, working)?;
    Ok(r.rounded(target))
}

/// Principal square root.
pub fn sqrt(z: &Complex, target: Precision) -> Result<Complex> {
    root(z, 2, 0, target)
}

/// Real n-th root of a non-negative real.
///
/// # Errors
///
/// [`Error::Domain`] for negative arguments (use the complex [`root`]),
/// [`Error::ZerothRoot`] for `n = 0`, [`Error::InfiniteExpansion`] for an
/// EXACT target unless the argument passes through trivially.
pub fn root_f(x: &Float, n: u64, target: Precision) -> Result<Float> {
    if n == 0 {
        return Err(Error::ZerothRoot);
    }
    if x.signum() < 0 {
        return Err(Error::Domain);
    }
    if x.is_zero() {
        return Ok(Float::zero(x.radix()));
    }
    if n == 1 {
        return Ok(crate::precision::limit(x, target));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let radix = x.radix();
    let ctx = Context::new(target, radix);
    let working = ctx.working();
    let goal = working.count();

    // Seed |x|^{-1/n} in log space, immune to huge scales.
    let (f, s) = x.to_f64_parts();
    let log_r = (radix as f64).ln();
    let t = -(f.ln() / log_r + s as f64) / n as f64;
    let q = t.floor();
    let mut p = seed_digits(radix);
    let mut w = Float::from_f64((radix as f64).powf(t - q), radix)
        .scaled(q as i64)
        .with_precision(Precision::digits(p));

    let nf = Float::with_radix(n as i64, radix);
    let step = |w: &Float, p: Precision| -> Result<Float> {
        let w = w.with_precision(p);
        let xp = x.rounded(p);
        let residual = &Float::one(radix) - &(&xp * &powi_float(&w, n));
        Ok(&w + &(&w * &residual).divide(&nf)?)
    };
    while p < goal {
        p = (2 * p).min(goal);
        w = step(&w, Precision::digits(p))?;
    }
    w = step(&w, working)?;
    let r = &x.rounded(working) * &powi_float(&w, n - 1);
    Ok(r.rounded(target))
}

/// Real square root of a non-negative real.
pub fn sqrt_f(x: &Float, target: Precision) -> Result<Float> {
    root_f(x, 2, target)
}
