//! The principal branch of the Lambert W function on the real line.
//!
//! A double-precision seed is refined by Halley's iteration on
//! `w·e^w − x = 0`, climbing a precision ladder that roughly triples the
//! correct digits per step. Near the branch point at `−1/e` the
//! derivative degenerates and the working precision is widened by half
//! the measured proximity.

use crate::constants;
use crate::elementary::exp_f;
use crate::error::{Error, Result};
use crate::number::Float;
use crate::precision::{ensure, Context, Precision};

/// Digits the f64 seed is trusted for.
const SEED_DIGITS: u64 = 12;

/// Halley refinement cap; the ladder reaches any finite precision long
/// before this.
const MAX_REFINES: u32 = 64;

fn seed(x: f64) -> f64 {
    let mut w = if x > 2.0 {
        let l = x.ln();
        l - l.ln()
    } else if x > -0.3 {
        // series about 0: w ≈ x(1 − x + 3x²/2)
        x * (1.0 - x + 1.5 * x * x)
    } else {
        // branch-point expansion: w ≈ −1 + √(2(ex+1))
        -1.0 + (2.0 * (core::f64::consts::E * x + 1.0)).max(0.0).sqrt()
    };
    for _ in 0..20 {
        let ew = w.exp();
        let f = w * ew - x;
        let d = ew * (w + 1.0) - f * (w + 2.0) / (2.0 * (w + 1.0));
        if d == 0.0 {
            break;
        }
        let step = f / d;
        w -= step;
        if step.abs() < 1e-14 * w.abs().max(1e-14) {
            break;
        }
    }
    w
}

/// Principal-branch `W(x)`: the solution of `w·eʷ = x` with `w ≥ −1`.
///
/// # Errors
///
/// [`Error::Domain`] for `x < −1/e`, where the principal branch leaves
/// the real line; [`Error::InfiniteExpansion`] for an EXACT target off
/// `x = 0`.
pub fn lambert_w(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);

    let mut comp = 0u64;
    if x.signum() < 0 {
        let probe = ctx.working().extend(10);
        let neg_inv_e = Float::one(radix)
            .with_precision(probe)
            .divide(&exp_f(&Float::one(radix).with_precision(probe), probe)?)?
            .neg();
        let d = &ensure(&x.rounded(probe.min(x.precision())), probe) - &neg_inv_e;
        if d.signum() < 0 {
            return Err(Error::Domain);
        }
        if !d.is_zero() {
            comp = ((-d.scale()).max(0) as u64) / 2 + 2;
        }
    }
    let wp = ctx.working().extend(comp);
    let goal = wp.count();
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);

    let mut w = Float::from_f64(seed(x.to_f64()), radix).with_precision(wp);
    let mut have = SEED_DIGITS;
    for _ in 0..MAX_REFINES {
        // each Halley step triples the correct digits; run it at the
        // precision the step can actually fill
        have = (have * 3).min(goal);
        let step_p = Precision::digits(have).extend(5);
        let wk = w.rounded(step_p.min(w.precision())).with_precision(step_p);
        let ew = exp_f(&wk, step_p)?;
        let f = &(&wk * &ew) - &xw.rounded(step_p);
        let wp1 = wk.add(&Float::one(radix));
        let den = &(&ew * &wp1)
            - &(&f * &wk.add(&Float::with_radix(2, radix))).divide(&(&wp1 * &Float::with_radix(2, radix)))?;
        let step = f.divide(&den)?;
        w = ensure(&wk.sub(&step), wp);
        if have >= goal {
            break;
        }
    }
    Ok(w.rounded(target))
}
