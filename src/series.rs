//! Generalized hypergeometric series summation.
//!
//! [`hyper_series`] sums `pFq(a; b; z) = Σ (a₁)ₖ…(aₚ)ₖ zᵏ / ((b₁)ₖ…(b_q)ₖ k!)`
//! by the term recurrence, with explicit cancellation accounting: the peak
//! scale of the partial sums is compared against the final scale, and a
//! shortfall triggers a retry at escalated working precision instead of a
//! silently wrong result. [`asymptotic_series`] sums a (generally
//! divergent) expansion to its smallest term and reports the precision the
//! truncation actually achieved.

use log::{debug, trace};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::number::Complex;
use crate::precision::{Context, Precision, MAX_ESCALATIONS};

/// Safety cap on summed terms; a series that has not settled by then is
/// treated as divergent.
const MAX_TERMS: u64 = 200_000;

/// Consecutive below-noise-floor terms required before the sum is
/// considered settled (one small term can be a sign-pattern accident).
const SETTLED_TERMS: u32 = 2;

/// Index at which a non-positive-integer parameter annihilates (numerator)
/// or poisons (denominator) the term recurrence, when that index is small
/// enough to ever be reached.
fn integer_stop(param: &Complex) -> Option<u64> {
    if !param.is_integer() || param.re().signum() > 0 {
        return None;
    }
    let k = param.re().neg().to_bigint_rounded().to_u64()?;
    (k <= MAX_TERMS).then_some(k)
}

/// Earliest termination index among the numerator parameters.
fn termination_index(numer: &[Complex]) -> Option<u64> {
    numer.iter().filter_map(integer_stop).min()
}

/// Iteration floor: the partial sums cannot be trusted to have settled
/// before the term ratio has fallen below one, which happens only past the
/// most negative parameter and past the crossover index of the argument.
fn iteration_floor(numer: &[Complex], denom: &[Complex], z_mag: f64) -> u64 {
    let most_negative = numer
        .iter()
        .chain(denom.iter())
        .map(|p| (-p.re().to_f64()).max(0.0))
        .fold(0.0f64, f64::max);
    let excess = (denom.len() + 1).saturating_sub(numer.len()) as f64;
    let crossover = if excess > 0.0 && z_mag > 1.0 {
        z_mag.powf(1.0 / excess)
    } else {
        0.0
    };
    (most_negative.max(crossover).min(MAX_TERMS as f64)) as u64 + 10
}

struct SumOutcome {
    value: Complex,
    /// Digits cancelled between the peak partial sum and the final value.
    loss: u64,
}

fn sum_terms(
    numer: &[Complex],
    denom: &[Complex],
    z: &Complex,
    wp: Precision,
    min_iters: u64,
    stop: Option<u64>,
) -> Result<SumOutcome> {
    let radix = z.radix();
    let goal = wp.count() as i64;
    let z = crate::precision::ensure_complex(&z.rounded(wp.min(z.precision())), wp);

    let mut term = Complex::one(radix).with_precision(wp);
    let mut sum = term.clone();
    let mut peak = sum.scale();
    let mut settled = 0u32;
    let mut k: u64 = 0;
    loop {
        if stop == Some(k) {
            break;
        }
        if k >= MAX_TERMS {
            return Err(Error::Divergent);
        }
        let kc = Complex::with_radix(k as i64, radix);
        let mut next = term.mul(&z);
        for a in numer {
            next = next.mul(&a.add(&kc));
        }
        for b in denom {
            next = next.divide(&b.add(&kc))?;
        }
        term = next.divide(&Complex::with_radix(k as i64 + 1, radix))?;
        sum = sum.add(&term);
        peak = peak.max(sum.scale()).max(term.scale());
        k += 1;

        if k >= min_iters {
            let small = term.is_zero() || sum.scale() - term.scale() > goal;
            settled = if small { settled + 1 } else { 0 };
            if settled >= SETTLED_TERMS {
                break;
            }
        }
    }
    let loss = if sum.is_zero() {
        wp.count()
    } else {
        (peak - sum.scale()).max(0) as u64
    };
    trace!("series settled after {k} terms, {loss} digits cancelled");
    Ok(SumOutcome { value: sum, loss })
}

/// Evaluate `pFq(numer; denom; z)` to the context's target precision.
///
/// Cancellation inside the sum is detected from the peak-to-final scale
/// drop and answered by bounded precision escalation.
///
/// # Errors
///
/// [`Error::GammaPole`] when a denominator parameter is a non-positive
/// integer not shielded by an earlier-terminating numerator;
/// [`Error::Divergent`] when the series cannot converge (too many
/// numerator parameters, or a unit-disc boundary argument) and does not
/// terminate; [`Error::LossOfPrecision`] when escalation fails to keep up
/// with the observed cancellation.
pub fn hyper_series(
    numer: &[Complex],
    denom: &[Complex],
    z: &Complex,
    ctx: &Context,
) -> Result<Complex> {
    let radix = ctx.radix;
    if z.is_zero() {
        return Ok(Complex::one(radix));
    }

    let stop = termination_index(numer);
    if let Some(pole) = denom.iter().filter_map(integer_stop).min() {
        // (b)_k vanishes once k exceeds the pole index; only a numerator
        // that terminates the series first keeps the sum finite.
        if stop.map_or(true, |s| s > pole) {
            return Err(Error::GammaPole);
        }
    }

    let z_mag = z.norm_sqr().to_f64().sqrt();
    if stop.is_none() {
        if numer.len() > denom.len() + 1 {
            return Err(Error::Divergent);
        }
        if numer.len() == denom.len() + 1 && z_mag >= 1.0 {
            return Err(Error::Divergent);
        }
    }
    let min_iters = iteration_floor(numer, denom, z_mag);

    let mut ctx = *ctx;
    for round in 0..=MAX_ESCALATIONS {
        let wp = ctx.working();
        let outcome = sum_terms(numer, denom, z, wp, min_iters, stop)?;
        if outcome.loss <= ctx.margin {
            return Ok(outcome.value.rounded(ctx.target));
        }
        debug!(
            "series round {round}: {} digits cancelled at margin {}, escalating",
            outcome.loss, ctx.margin
        );
        ctx = ctx.escalated(outcome.loss);
    }
    Err(Error::LossOfPrecision)
}

/// Sum a (typically divergent) asymptotic expansion
/// `Σ (a₁)ₖ…(aₚ)ₖ zᵏ / ((b₁)ₖ…(b_q)ₖ)` to its smallest term.
///
/// Returns the truncated value together with the precision the truncation
/// achieved, leaving the accept-or-retry decision to the caller.
///
/// # Errors
///
/// [`Error::Divergent`] when the terms grow from the start, so no digits
/// are obtainable at all.
pub fn asymptotic_series(
    numer: &[Complex],
    denom: &[Complex],
    z: &Complex,
    ctx: &Context,
) -> Result<(Complex, Precision)> {
    let radix = ctx.radix;
    if z.is_zero() {
        return Ok((Complex::one(radix), Precision::EXACT));
    }
    let wp = ctx.working();
    let goal = wp.count() as i64;
    let z = crate::precision::ensure_complex(&z.rounded(wp.min(z.precision())), wp);

    let mut term = Complex::one(radix).with_precision(wp);
    let mut sum = term.clone();
    let mut best = term.scale();
    let mut k: u64 = 0;
    loop {
        if k >= MAX_TERMS {
            break;
        }
        let kc = Complex::with_radix(k as i64, radix);
        let mut next = term.mul(&z);
        for a in numer {
            next = next.mul(&a.add(&kc));
        }
        for b in denom {
            next = next.divide(&b.add(&kc))?;
        }
        if next.is_zero() {
            term = next;
            break;
        }
        // Past the smallest term the expansion only gets worse.
        if next.scale() >= term.scale() {
            break;
        }
        term = next;
        sum = sum.add(&term);
        best = best.min(term.scale());
        k += 1;
        if sum.scale() - term.scale() > goal {
            break;
        }
    }
    if k == 0 {
        return Err(Error::Divergent);
    }
    let achieved = (sum.scale() - best).max(0) as u64;
    let achieved = Precision::digits(achieved.min(wp.count()));
    Ok((sum.rounded(achieved.max(Precision::digits(1))), achieved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::elementary::{cos_f, exp_f};
    use crate::number::Float;

    fn p(n: u64) -> Precision {
        Precision::digits(n)
    }

    fn cx(n: i64) -> Complex {
        Complex::with_radix(n, 10)
    }

    #[test]
    fn zero_f_zero_is_exp() {
        // 0F0(;;z) = e^z
        let ctx = Context::new(p(40), 10);
        let got = hyper_series(&[], &[], &Complex::one(10).with_precision(p(50)), &ctx).unwrap();
        let want = constants::e(10, p(40)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err <= want.ulp(), "0F0(1) off by {err}");
    }

    #[test]
    fn zero_f_one_is_cosine() {
        // cos x = 0F1(; 1/2; -x²/4)
        let ctx = Context::new(p(35), 10);
        let half = Complex::from_real(Float::rational(1, 2, 10, p(45)).unwrap());
        let z = Complex::from_real(Float::rational(-1, 4, 10, p(45)).unwrap());
        let got = hyper_series(&[], &[half], &z, &ctx).unwrap();
        let want = cos_f(&Float::one(10), p(35)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err < Float::parse("1e-33", 10, p(5)).unwrap(), "off by {err}");
    }

    #[test]
    fn terminating_polynomial() {
        // 2F1(-2, 1; 1; z) = (1-z)² at z = 3: terms beyond k=2 vanish
        let ctx = Context::new(p(30), 10);
        let z = cx(3).with_precision(p(40));
        let got = hyper_series(&[cx(-2), cx(1)], &[cx(1)], &z, &ctx).unwrap();
        assert_eq!(got.re(), &Float::with_radix(4, 10));
    }

    #[test]
    fn denominator_pole_detected() {
        let ctx = Context::new(p(20), 10);
        let z = Complex::from_real(Float::rational(1, 2, 10, p(30)).unwrap());
        let r = hyper_series(&[cx(1), cx(1)], &[cx(-2)], &z, &ctx);
        assert_eq!(r, Err(Error::GammaPole));
    }

    #[test]
    fn termination_shields_denominator_pole() {
        // numerator cuts the series at k=1, before the pole of (−2)ₖ at k=2
        let ctx = Context::new(p(20), 10);
        let z = Complex::from_real(Float::rational(1, 2, 10, p(30)).unwrap());
        let got = hyper_series(&[cx(-1), cx(1)], &[cx(-2)], &z, &ctx).unwrap();
        // 1 + (−1)(1)/(−2) · z = 1 + z/2 = 1.25
        let want = Float::parse("1.25", 10, p(20)).unwrap();
        assert_eq!(got.re(), &want);
    }

    #[test]
    fn cancellation_escalates_and_recovers() {
        // 1F1(1; 2; -30) = (1 - e^{-30})/30: the raw sum peaks 13 orders
        // above the result, forcing at least one escalation
        let ctx = Context::new(p(30), 10);
        let got = hyper_series(&[cx(1)], &[cx(2)], &cx(-30).with_precision(p(40)), &ctx).unwrap();
        let e30 = exp_f(&Float::with_radix(-30, 10), p(50)).unwrap();
        let want = (&Float::one(10) - &e30)
            .divide(&Float::with_radix(30, 10))
            .unwrap();
        let err = (got.re() - &want).abs();
        assert!(err < Float::parse("1e-28", 10, p(5)).unwrap(), "off by {err}");
    }

    #[test]
    fn gauss_series_outside_disc_is_divergent() {
        let ctx = Context::new(p(20), 10);
        let r = hyper_series(&[cx(1), cx(1)], &[cx(3)], &cx(2).with_precision(p(30)), &ctx);
        assert_eq!(r, Err(Error::Divergent));
    }

    #[test]
    fn asymptotic_reports_achieved_precision() {
        // 2F0(1, 1;; -1/20): optimal truncation leaves roughly 7-8 digits
        let ctx = Context::new(p(30), 10);
        let z = Complex::from_real(Float::rational(-1, 20, 10, p(40)).unwrap());
        let (value, achieved) = asymptotic_series(&[cx(1), cx(1)], &[], &z, &ctx).unwrap();
        let a = achieved.count();
        assert!((5..=12).contains(&a), "achieved {a} digits");
        // 20·e^20·E₁(20) = Σ (-1)^k k!/20^k in the asymptotic sense
        let f64_ref = 0.954_371_f64;
        let got = value.re().to_f64();
        assert!((got - f64_ref).abs() < 1e-4, "got {got}");
    }
}
