//! Modified Lentz evaluation of continued fractions.
//!
//! Evaluates `b₀ + a₁/(b₁ + a₂/(b₂ + …))` from term closures. The
//! modified scheme tracks the ratio sequences `C` and `D` and substitutes
//! a tiny placeholder whenever either would vanish, so fractions whose
//! partial numerators pass through zero still evaluate. A cheap
//! low-precision probe runs first: a fraction that does not settle inside
//! the probe cap, or whose full-precision value lands far from the probe
//! value, has converged to the wrong attractor and is restarted with a
//! higher iteration floor. When a value has several known fraction forms,
//! [`continued_fraction_best`] probes each and commits to the one that
//! settles in the fewest iterations.

use log::debug;

use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision};

/// Digits used by the convergence probe.
pub(crate) const PROBE_DIGITS: u64 = 50;

/// Iteration cap for the probe; a healthy fraction settles well inside it.
pub(crate) const PROBE_CAP: u64 = 50;

/// Anomaly window: the full-precision value must land within a factor of
/// 10 of the probe value in magnitude, either way.
pub(crate) const RATIO_WINDOW: f64 = 10.0;

/// Hard iteration cap for the full evaluation.
const MAX_ITERS: u64 = 100_000;

/// Consecutive near-unit update factors required before the value is
/// accepted.
const SETTLED_STEPS: u32 = 2;

/// One modified-Lentz run at a fixed working precision.
fn lentz_raw<A, B>(
    b0: &Complex,
    a: &A,
    b: &B,
    wp: Precision,
    min_iters: u64,
    max_iters: u64,
) -> Result<(Complex, u64)>
where
    A: Fn(u64) -> Complex,
    B: Fn(u64) -> Complex,
{
    let radix = b0.radix();
    let goal = wp.count() as i64;
    let one = Complex::one(radix).with_precision(wp);
    let tiny = || -> Complex {
        Complex::from_real(Float::radix_power(-2 * goal, radix).with_precision(wp))
    };

    let mut f = if b0.is_zero() {
        tiny()
    } else {
        b0.rounded(wp.min(b0.precision())).with_precision(wp)
    };
    let mut c = f.clone();
    let mut d = Complex::zero(radix);
    let mut settled = 0u32;
    for n in 1..=max_iters {
        let an = a(n).rounded(wp);
        let bn = b(n).rounded(wp);
        let mut dn = bn.add(&an.mul(&d));
        if dn.is_zero() {
            dn = tiny();
        }
        d = one.divide(&dn)?;
        let mut cn = bn.add(&an.divide(&c)?);
        if cn.is_zero() {
            cn = tiny();
        }
        c = cn;
        let delta = c.mul(&d);
        f = f.mul(&delta);
        let dev = delta.sub(&one);
        let small = dev.is_zero() || -dev.scale() > goal;
        settled = if small && n >= min_iters { settled + 1 } else { 0 };
        if settled >= SETTLED_STEPS {
            return Ok((f, n));
        }
    }
    Err(Error::Divergent)
}

/// Full-precision evaluation with the anomaly check against an earlier
/// probe value, restarting once at a higher iteration floor when the
/// value lands outside the window.
fn evaluate<A, B>(
    b0: &Complex,
    a: &A,
    b: &B,
    probe: Option<(Complex, u64)>,
    ctx: &Context,
) -> Result<Complex>
where
    A: Fn(u64) -> Complex,
    B: Fn(u64) -> Complex,
{
    let wp = ctx.working();
    let window_sq = RATIO_WINDOW * RATIO_WINDOW;

    let mut min_iters = 3u64;
    for _ in 0..2 {
        let (full, iters) = lentz_raw(b0, a, b, wp, min_iters, MAX_ITERS)?;
        if let Some((probe_value, _)) = &probe {
            let pv = probe_value.norm_sqr().to_f64();
            let fv = full.norm_sqr().to_f64();
            if pv > 0.0 && fv > 0.0 && (fv / pv > window_sq || pv / fv > window_sq) {
                debug!("continued fraction settled anomalously after {iters} iterations");
                min_iters = (iters + 1) * 2;
                continue;
            }
        }
        return Ok(full.rounded(ctx.target));
    }
    Err(Error::LossOfPrecision)
}

/// Evaluate a continued fraction to the context's target precision.
///
/// # Errors
///
/// [`Error::Divergent`] when the fraction does not settle within the
/// iteration cap; [`Error::LossOfPrecision`] when the full evaluation
/// repeatedly disagrees with the probe by more than the anomaly window.
pub fn continued_fraction<A, B>(
    b0: &Complex,
    a: A,
    b: B,
    ctx: &Context,
) -> Result<Complex>
where
    A: Fn(u64) -> Complex,
    B: Fn(u64) -> Complex,
{
    // A probe failure is not fatal: some fractions settle slowly yet
    // correctly. It only disables the anomaly check.
    let probe = lentz_raw(b0, &a, &b, Precision::digits(PROBE_DIGITS), 3, PROBE_CAP).ok();
    evaluate(b0, &a, &b, probe, ctx)
}

/// One candidate fraction form: the leading term and its coefficient
/// generators.
pub struct Fraction<'a> {
    b0: Complex,
    a: Box<dyn Fn(u64) -> Complex + 'a>,
    b: Box<dyn Fn(u64) -> Complex + 'a>,
}

impl<'a> Fraction<'a> {
    pub fn new(
        b0: Complex,
        a: impl Fn(u64) -> Complex + 'a,
        b: impl Fn(u64) -> Complex + 'a,
    ) -> Self {
        Self {
            b0,
            a: Box::new(a),
            b: Box::new(b),
        }
    }
}

/// Evaluate the fastest-converging of several forms of the same value.
///
/// Each candidate gets the low-precision probe; the form that settles in
/// the fewest iterations is evaluated at full precision, with its probe
/// value feeding the anomaly check. When no form settles inside the probe
/// cap, the candidates are tried in order without the check.
///
/// # Errors
///
/// [`Error::Divergent`] when no candidate settles (or the slice is
/// empty); [`Error::LossOfPrecision`] as for [`continued_fraction`].
pub fn continued_fraction_best(candidates: &[Fraction<'_>], ctx: &Context) -> Result<Complex> {
    let mut best: Option<(usize, (Complex, u64))> = None;
    for (i, cand) in candidates.iter().enumerate() {
        let outcome = lentz_raw(
            &cand.b0,
            &cand.a,
            &cand.b,
            Precision::digits(PROBE_DIGITS),
            3,
            PROBE_CAP,
        );
        if let Ok(settled) = outcome {
            let faster = best
                .as_ref()
                .map_or(true, |(_, (_, iters))| settled.1 < *iters);
            if faster {
                best = Some((i, settled));
            }
        }
    }
    match best {
        Some((i, probe)) => {
            debug!(
                "fraction form {i} of {} settled fastest, {} probe iterations",
                candidates.len(),
                probe.1
            );
            let c = &candidates[i];
            evaluate(&c.b0, &c.a, &c.b, Some(probe), ctx)
        }
        None => {
            let mut last = Err(Error::Divergent);
            for c in candidates {
                last = evaluate(&c.b0, &c.a, &c.b, None, ctx);
                if last.is_ok() {
                    return last;
                }
            }
            last
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elementary::sqrt_f;

    fn p(n: u64) -> Precision {
        Precision::digits(n)
    }

    #[test]
    fn sqrt_two_fraction() {
        // √2 = 1 + 1/(2 + 1/(2 + ...))
        let ctx = Context::new(p(40), 10);
        let got = continued_fraction(
            &Complex::one(10),
            |_| Complex::one(10),
            |_| Complex::with_radix(2, 10),
            &ctx,
        )
        .unwrap();
        let want = sqrt_f(&Float::with_radix(2, 10), p(40)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err <= want.ulp(), "sqrt(2) off by {err}");
    }

    #[test]
    fn golden_ratio_fraction() {
        // φ = 1 + 1/(1 + 1/(1 + ...)), the slowest-converging fraction
        let ctx = Context::new(p(30), 10);
        let got = continued_fraction(
            &Complex::one(10),
            |_| Complex::one(10),
            |_| Complex::one(10),
            &ctx,
        )
        .unwrap();
        let five = Float::with_radix(5, 10).with_precision(p(45));
        let want = (&Float::one(10) + &sqrt_f(&five, p(45)).unwrap())
            .divide(&Float::with_radix(2, 10))
            .unwrap();
        let err = (got.re() - &want.rounded(p(30))).abs();
        assert!(err <= want.rounded(p(30)).ulp().mul(&Float::with_radix(5, 10)));
    }

    #[test]
    fn zero_leading_term_substitution() {
        // 0 + 4/(1 + 1/(2 + 1/(2 + ...))) = 4/√2 = 2√2
        let ctx = Context::new(p(30), 10);
        let got = continued_fraction(
            &Complex::zero(10),
            |n| {
                if n == 1 {
                    Complex::with_radix(4, 10)
                } else {
                    Complex::one(10)
                }
            },
            |n| {
                if n == 1 {
                    Complex::one(10)
                } else {
                    Complex::with_radix(2, 10)
                }
            },
            &ctx,
        )
        .unwrap();
        let want = sqrt_f(&Float::with_radix(8, 10), p(30)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err <= want.ulp().mul(&Float::with_radix(3, 10)), "off by {err}");
    }

    #[test]
    fn best_picks_between_two_forms_of_e() {
        // the simple fraction e = [2; 1, 2, 1, 1, 4, 1, 1, 6, ...]
        let simple = Fraction::new(
            Complex::with_radix(2, 10),
            |_| Complex::one(10),
            |n| {
                if n % 3 == 2 {
                    Complex::with_radix(2 * (n as i64 + 1) / 3, 10)
                } else {
                    Complex::one(10)
                }
            },
        );
        // e = 3 − 1/(4 − 2/(5 − 3/(6 − ...)))
        let descending = Fraction::new(
            Complex::with_radix(3, 10),
            |n| Complex::with_radix(-(n as i64), 10),
            |n| Complex::with_radix(n as i64 + 3, 10),
        );
        let ctx = Context::new(p(35), 10);
        let got = continued_fraction_best(&[simple, descending], &ctx).unwrap();
        let want = crate::constants::e(10, p(40)).unwrap().rounded(p(35));
        let err = (got.re() - &want).abs();
        assert!(
            err <= want.ulp().mul(&Float::with_radix(5, 10)),
            "e off by {err}"
        );
    }

    #[test]
    fn no_candidates_is_divergent() {
        let ctx = Context::new(p(20), 10);
        assert_eq!(
            continued_fraction_best(&[], &ctx).err(),
            Some(Error::Divergent)
        );
    }
}
