//! Hurwitz and Riemann zeta, and the polylogarithm.
//!
//! The core is Euler–Maclaurin for `ζ(s, a)`: a direct sum of N leading
//! terms, the integral and half-term corrections, and a Bernoulli tail.
//! N is sized by a double-precision simulation of the tail's smallest
//! term — geometric growth until the tolerance is reachable, then a
//! binary search for the smallest adequate N. A tail that regrows before
//! reaching the tolerance, or cancellation in the main sum, feeds the
//! bounded escalation loop.

use log::debug;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::bernoulli::bernoulli;
use crate::elementary::{ln, pow, sin};
use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision, MAX_ESCALATIONS};

/// Cap on Bernoulli tail terms per Euler–Maclaurin evaluation.
const MAX_TAIL_TERMS: u64 = 10_000;

/// Direct-series cutoff for the polylogarithm.
const SERIES_RADIUS: f64 = 0.99;

/// ln of the smallest Bernoulli-tail term reachable at shift point `x`,
/// simulated in doubles from the term-ratio recurrence.
fn tail_min_log(x: f64, s_re: f64, s_im: f64) -> f64 {
    let two_pi = core::f64::consts::TAU;
    let lnx = x.ln();
    let s_mag = s_re.hypot(s_im).max(1e-300);
    let mut lt = 2f64.ln() - 2.0 * two_pi.ln() + s_mag.ln() - (s_re + 1.0) * lnx;
    let mut best = lt;
    let mut j = 1.0f64;
    loop {
        let m1 = (s_re + 2.0 * j - 1.0).hypot(s_im).max(1e-300).ln();
        let m2 = (s_re + 2.0 * j).hypot(s_im).max(1e-300).ln();
        let delta = m1 + m2 - 2.0 * two_pi.ln() - 2.0 * lnx;
        if delta >= 0.0 || best < -1e9 || j > 1e6 {
            return best;
        }
        lt += delta;
        best = best.min(lt);
        j += 1.0;
    }
}

/// Smallest N whose Bernoulli tail can reach the target tolerance.
fn choose_shift(s: &Complex, a: &Complex, goal: u64, radix: u32) -> u64 {
    let tol = -((goal + 5) as f64) * (radix as f64).ln();
    let s_re = s.re().to_f64();
    let s_im = s.im().to_f64();
    let a_re = a.re().to_f64().clamp(0.0, 1e6);
    let fits = |n: f64| tail_min_log(n + a_re, s_re, s_im) < tol;
    let mut n = 8.0f64;
    while !fits(n) && n < 1e8 {
        n *= 2.0;
    }
    let (mut lo, mut hi) = (n / 2.0, n);
    while hi - lo > 1.0 {
        let mid = (lo + hi) / 2.0;
        if fits(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi.ceil() as u64
}

/// One Euler–Maclaurin pass at a fixed working precision. Returns the
/// value and the digits it fell short by (0 when clean).
fn euler_maclaurin(s: &Complex, a: &Complex, wp: Precision) -> Result<(Complex, u64)> {
    let radix = s.radix();
    let goal = wp.count();
    let n = choose_shift(s, a, goal, radix);
    let one = Complex::one(radix).with_precision(wp);
    let s = crate::precision::ensure_complex(&s.rounded(wp.min(s.precision())), wp);
    let a = crate::precision::ensure_complex(&a.rounded(wp.min(a.precision())), wp);
    let neg_s = s.neg();

    let mut head = Complex::zero(radix);
    let mut peak = i64::MIN;
    for k in 0..n {
        let base = a.add(&Complex::with_radix(k as i64, radix));
        head = head.add(&pow(&base, &neg_s, wp)?);
        peak = peak.max(head.scale());
    }

    let na = a.add(&Complex::with_radix(n as i64, radix));
    let integral = pow(&na, &one.sub(&s), wp)?.divide(&s.sub(&one))?;
    let half = pow(&na, &neg_s, wp)?.divide_real(&Float::with_radix(2, radix))?;
    let base = head.add(&integral).add(&half);
    peak = peak.max(base.scale());

    // Bernoulli tail: t_j = B_{2j}/(2j)! · (s)_{2j−1} · (a+n)^{−s−2j+1}
    let tol = base.scale() - goal as i64 - 2;
    let na_inv_sq = one.divide(&na.mul(&na))?;
    let mut power = pow(&na, &neg_s.sub(&one), wp)?;
    let mut poch = s.clone();
    let mut fact = BigInt::from(2u32);
    let mut tail = Complex::zero(radix);
    let mut prev_scale = i64::MAX;
    let mut shortfall = 0u64;
    for j in 1..=MAX_TAIL_TERMS {
        let b = bernoulli(2 * j);
        let num = Float::from_bigint(b.numer().clone(), radix).with_precision(wp);
        let den = Float::from_bigint(b.denom().clone() * &fact, radix);
        let coeff = num.divide(&den)?;
        let term = power.mul(&poch).mul_real(&coeff);
        tail = tail.add(&term);
        if term.is_zero() || term.scale() < tol {
            break;
        }
        if term.scale() >= prev_scale {
            // The asymptotic tail bottomed out above the tolerance: this N
            // (hence this working precision) cannot deliver the digits.
            shortfall = (term.scale() - tol).max(1) as u64;
            break;
        }
        prev_scale = term.scale();
        let j2 = 2 * j as i64;
        poch = poch
            .mul(&s.add(&Complex::with_radix(j2 - 1, radix)))
            .mul(&s.add(&Complex::with_radix(j2, radix)));
        power = power.mul(&na_inv_sq);
        fact *= BigInt::from((j2 + 1) * (j2 + 2));
    }

    let value = base.add(&tail);
    let cancel = if value.is_zero() {
        goal
    } else {
        (peak - value.scale()).max(0) as u64
    };
    Ok((value, cancel.max(shortfall)))
}

/// Hurwitz zeta `ζ(s, a) = Σ_{k≥0} (a+k)^{−s}`, analytically continued.
///
/// # Errors
///
/// [`Error::ZetaPole`] at `s = 1` and for shift parameters on the
/// non-positive integers; [`Error::InfiniteExpansion`] for an EXACT
/// target.
pub fn hurwitz_zeta(s: &Complex, a: &Complex, target: Precision) -> Result<Complex> {
    let radix = s.radix();
    if s == &Complex::one(radix) {
        return Err(Error::ZetaPole);
    }
    if a.is_integer() && a.re().signum() <= 0 {
        return Err(Error::ZetaPole);
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let mut ctx = Context::new(target, radix);
    for round in 0..=MAX_ESCALATIONS {
        let (value, loss) = euler_maclaurin(s, a, ctx.working())?;
        if loss <= ctx.margin {
            return Ok(value.rounded(target));
        }
        debug!("hurwitz zeta round {round}: {loss} digits short, escalating");
        ctx = ctx.escalated(loss);
    }
    Err(Error::LossOfPrecision)
}

/// Riemann zeta, with the functional-equation reflection for `Re s < 0`:
/// `ζ(s) = 2^s π^{s−1} sin(πs/2) Γ(1−s) ζ(1−s)`.
///
/// # Errors
///
/// [`Error::ZetaPole`] at the pole `s = 1`.
pub fn riemann_zeta(s: &Complex, target: Precision) -> Result<Complex> {
    let radix = s.radix();
    if s == &Complex::one(radix) {
        return Err(Error::ZetaPole);
    }
    // Trivial zeros at the negative even integers.
    if s.is_integer() && s.re().signum() < 0 {
        if let Some(n) = s.re().neg().to_bigint_rounded().to_u64() {
            if n % 2 == 0 {
                return Ok(Complex::zero(radix));
            }
        }
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    if s.re().signum() >= 0 {
        return hurwitz_zeta(s, &Complex::one(radix), target);
    }
    let wp = Context::new(target, radix).working().extend(5);
    let one = Complex::one(radix).with_precision(wp);
    let s = crate::precision::ensure_complex(&s.rounded(wp.min(s.precision())), wp);
    let reflected = riemann_zeta(&one.sub(&s), wp)?;
    let pi = crate::constants::pi(radix, wp)?;
    let two_pow = pow(&Complex::with_radix(2, radix).with_precision(wp), &s, wp)?;
    let pi_pow = pow(
        &Complex::from_real(pi.clone()),
        &s.sub(&one),
        wp,
    )?;
    let half_arg = s
        .mul_real(&pi)
        .divide_real(&Float::with_radix(2, radix))?;
    let sine = sin(&half_arg, wp)?;
    let gamma = crate::functions::gamma::gamma(&one.sub(&s), wp)?;
    Ok(two_pow
        .mul(&pi_pow)
        .mul(&sine)
        .mul(&gamma)
        .mul(&reflected)
        .rounded(target))
}

/// Direct polylogarithm series `Σ_{k≥1} zᵏ/kˢ`, for arguments safely
/// inside (or real positive inside) the unit disc.
fn polylog_series(s: &Complex, z: &Complex, target: Precision) -> Result<Complex> {
    let radix = s.radix();
    let wp = Context::new(target, radix).working();
    let goal = wp.count() as i64;
    let z = crate::precision::ensure_complex(&z.rounded(wp.min(z.precision())), wp);
    let neg_s = s.neg();
    let int_s = if s.is_integer() {
        s.re().to_bigint_rounded().to_i64()
    } else {
        None
    };

    let mut zk = z.clone();
    let mut sum = Complex::zero(radix);
    let mut k: u64 = 1;
    loop {
        let kth = if let Some(m) = int_s {
            // integer order: exact integer powers instead of exp/ln
            let kp = BigInt::from(k).pow(m.unsigned_abs() as u32);
            let kp = Complex::from_real(Float::from_bigint(kp, radix).with_precision(wp));
            if m >= 0 {
                zk.divide(&kp)?
            } else {
                zk.mul(&kp)
            }
        } else {
            zk.mul(&pow(
                &Complex::with_radix(k as i64, radix).with_precision(wp),
                &neg_s,
                wp,
            )?)
        };
        sum = sum.add(&kth);
        if kth.is_zero() || sum.scale() - kth.scale() > goal {
            break;
        }
        if k > 500_000 {
            return Err(Error::Divergent);
        }
        zk = zk.mul(&z);
        k += 1;
    }
    Ok(sum.rounded(target))
}

/// Jonquière's Hurwitz-zeta relation, the continuation for arguments the
/// direct series cannot reach (non-integer order only):
/// `Li_s(z) = Γ(1−s)/(2π)^{1−s} · [i^{1−s} ζ(1−s, u) + i^{s−1} ζ(1−s, 1−u)]`
/// with `u = 1/2 + ln(−z)/(2πi)`.
fn polylog_continuation(s: &Complex, z: &Complex, target: Precision) -> Result<Complex> {
    let radix = s.radix();
    let wp = Context::new(target, radix).working().extend(5);
    let one = Complex::one(radix).with_precision(wp);
    let s = crate::precision::ensure_complex(&s.rounded(wp.min(s.precision())), wp);
    let one_minus_s = one.sub(&s);

    let pi = crate::constants::pi(radix, wp)?;
    let two_pi = &pi * &Float::with_radix(2, radix);
    let log_neg = ln(&z.neg(), wp)?;
    let half = Float::rational(1, 2, radix, wp)?;
    let u = Complex::from_real(half).add(&log_neg.divide_real(&two_pi)?.div_i());

    let zeta_u = hurwitz_zeta(&one_minus_s, &u, wp)?;
    let zeta_cu = hurwitz_zeta(&one_minus_s, &one.sub(&u), wp)?;

    // i^w = exp(iπw/2)
    let i_pow = |w: &Complex| -> Result<Complex> {
        crate::elementary::exp(
            &w.mul_real(&pi)
                .divide_real(&Float::with_radix(2, radix))?
                .mul_i(),
            wp,
        )
    };
    let branch_a = i_pow(&one_minus_s)?.mul(&zeta_u);
    let branch_b = i_pow(&s.sub(&one))?.mul(&zeta_cu);

    let gamma = crate::functions::gamma::gamma(&one_minus_s, wp)?;
    let front = gamma.divide(&pow(
        &Complex::from_real(two_pi).with_precision(wp),
        &one_minus_s,
        wp,
    )?)?;
    Ok(front.mul(&branch_a.add(&branch_b)).rounded(target))
}

/// Polylogarithm `Li_s(z)`.
///
/// Orders 0 and 1 are closed forms; small arguments go through the
/// direct series; negative integer orders invert into the unit disc via
/// `Li_{−n}(1/z)`; everything else uses the Hurwitz-zeta continuation,
/// which requires a non-integer order.
///
/// # Errors
///
/// [`Error::Domain`] at the singularity `z = 1` of orders ≤ 1 and for
/// integer orders ≥ 2 outside the unit disc, which the continuation
/// cannot represent; [`Error::ZetaPole`] via `ζ` where applicable.
pub fn polylog(s: &Complex, z: &Complex, target: Precision) -> Result<Complex> {
    let radix = s.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    let one = Complex::one(radix);
    let int_s = if s.is_integer() {
        s.re().to_bigint_rounded().to_i64()
    } else {
        None
    };
    if int_s == Some(0) {
        // Li₀(z) = z/(1−z)
        if z == &one {
            return Err(Error::Domain);
        }
        let wp = Context::new(target, radix).working();
        let zw = crate::precision::ensure_complex(&z.rounded(wp.min(z.precision())), wp);
        return zw
            .divide(&Complex::one(radix).with_precision(wp).sub(&zw))
            .map(|v| v.rounded(target));
    }
    if int_s == Some(1) {
        // Li₁(z) = −ln(1−z)
        if z == &one {
            return Err(Error::Domain);
        }
        let wp = Context::new(target, radix).working();
        let zw = crate::precision::ensure_complex(&z.rounded(wp.min(z.precision())), wp);
        return ln(&Complex::one(radix).with_precision(wp).sub(&zw), target).map(|v| v.neg());
    }
    if z == &one {
        return riemann_zeta(s, target);
    }
    if z == &one.neg() {
        // Li_s(−1) = (2^{1−s} − 1)·ζ(s)
        let wp = Context::new(target, radix).working().extend(3);
        let sw = crate::precision::ensure_complex(&s.rounded(wp.min(s.precision())), wp);
        let exponent = Complex::one(radix).with_precision(wp).sub(&sw);
        let factor = pow(&Complex::with_radix(2, radix).with_precision(wp), &exponent, wp)?
            .sub(&Complex::one(radix));
        return Ok(factor.mul(&riemann_zeta(&sw, wp)?).rounded(target));
    }

    let z_mag = z.norm_sqr().to_f64().sqrt();
    let real_inside = z.is_real() && z.re().signum() > 0 && z_mag < 1.0;
    if z_mag < SERIES_RADIUS || real_inside {
        return polylog_series(s, z, target);
    }
    if let Some(m) = int_s {
        if m < 0 {
            // Li_{−n}(z) = (−1)^{n+1} Li_{−n}(1/z)
            let wp = Context::new(target, radix).working().extend(3);
            let inv = Complex::one(radix)
                .with_precision(wp)
                .divide(&z.rounded(wp.min(z.precision())).with_precision(wp))?;
            let inner = polylog(s, &inv, wp)?;
            let flipped = if m.unsigned_abs() % 2 == 1 {
                inner
            } else {
                inner.neg()
            };
            return Ok(flipped.rounded(target));
        }
        return Err(Error::Domain);
    }
    polylog_continuation(s, z, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::elementary::ln_f;

    fn p(n: u64) -> Precision {
        Precision::digits(n)
    }

    fn f(s: &str, n: u64) -> Float {
        Float::parse(s, 10, p(n)).unwrap()
    }

    #[test]
    fn zeta_two_is_pi_squared_over_six() {
        let got = riemann_zeta(&Complex::with_radix(2, 10), p(30)).unwrap();
        let pi = constants::pi(10, p(40)).unwrap();
        let want = (&pi * &pi).divide(&Float::with_radix(6, 10)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err < f("1e-28", 5), "ζ(2) off by {err}");
    }

    #[test]
    fn zeta_zero_and_negative_one() {
        let at_zero = riemann_zeta(&Complex::zero(10), p(25)).unwrap();
        let err = (at_zero.re() - &f("-0.5", 30)).abs();
        assert!(err < f("1e-23", 5), "ζ(0) off by {err}");

        // reflection path: ζ(−1) = −1/12
        let at_neg = riemann_zeta(&Complex::with_radix(-1, 10), p(25)).unwrap();
        let want = Float::rational(-1, 12, 10, p(30)).unwrap();
        let err = (at_neg.re() - &want).abs();
        assert!(err < f("1e-23", 5), "ζ(−1) off by {err}");
    }

    #[test]
    fn trivial_zeros() {
        assert!(riemann_zeta(&Complex::with_radix(-2, 10), p(20))
            .unwrap()
            .is_zero());
        assert!(riemann_zeta(&Complex::with_radix(-14, 10), p(20))
            .unwrap()
            .is_zero());
    }

    #[test]
    fn poles_are_reported() {
        assert_eq!(
            riemann_zeta(&Complex::one(10), p(20)),
            Err(Error::ZetaPole)
        );
        assert_eq!(
            hurwitz_zeta(
                &Complex::with_radix(2, 10),
                &Complex::with_radix(-3, 10),
                p(20)
            ),
            Err(Error::ZetaPole)
        );
    }

    #[test]
    fn hurwitz_half_shift_identity() {
        // ζ(s, 1/2) = (2^s − 1)·ζ(s)
        let s = Complex::with_radix(3, 10);
        let a = Complex::from_real(f("0.5", 45));
        let lhs = hurwitz_zeta(&s, &a, p(30)).unwrap();
        let rhs = riemann_zeta(&s, p(35))
            .unwrap()
            .mul(&Complex::with_radix(7, 10));
        let err = (lhs.re() - rhs.re()).abs();
        assert!(err < f("1e-27", 5), "off by {err}");
    }

    #[test]
    fn polylog_closed_forms() {
        // Li₁(1/2) = ln 2
        let half = Complex::from_real(f("0.5", 40));
        let got = polylog(&Complex::one(10), &half, p(30)).unwrap();
        let want = ln_f(&Float::with_radix(2, 10), p(30)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err < f("1e-28", 5));

        // Li₀(3) = 3/(1−3) = −3/2
        let got = polylog(&Complex::zero(10), &Complex::with_radix(3, 10), p(20)).unwrap();
        let err = (got.re() - &f("-1.5", 20)).abs();
        assert!(err < f("1e-18", 5));
    }

    #[test]
    fn dilog_at_half() {
        // Li₂(1/2) = π²/12 − ln²2/2
        let half = Complex::from_real(f("0.5", 45));
        let got = polylog(&Complex::with_radix(2, 10), &half, p(30)).unwrap();
        let pi = constants::pi(10, p(40)).unwrap();
        let l2 = ln_f(&Float::with_radix(2, 10), p(40)).unwrap();
        let want = &(&pi * &pi)
            .divide(&Float::with_radix(12, 10))
            .unwrap()
            - &(&l2 * &l2).divide(&Float::with_radix(2, 10)).unwrap();
        let err = (got.re() - &want).abs();
        assert!(err < f("1e-28", 5), "off by {err}");
    }

    #[test]
    fn negative_order_inversion() {
        // Li_{−1}(z) = z/(1−z)²; at z = 3 the inversion drops to z = 1/3
        let got = polylog(&Complex::with_radix(-1, 10), &Complex::with_radix(3, 10), p(25)).unwrap();
        let err = (got.re() - &f("0.75", 30)).abs();
        assert!(err < f("1e-22", 5), "off by {err}");
        assert!(got.im().is_zero() || got.im().scale() < -20);
    }

    #[test]
    fn polylog_alternating_unit_point() {
        // Li_s(−1) = (2^{1−s} − 1)ζ(s) at s = 2: −π²/12
        let got = polylog(&Complex::with_radix(2, 10), &Complex::with_radix(-1, 10), p(25)).unwrap();
        let pi = constants::pi(10, p(35)).unwrap();
        let want = (&pi * &pi)
            .divide(&Float::with_radix(-12, 10))
            .unwrap();
        let err = (got.re() - &want).abs();
        assert!(err < f("1e-23", 5), "off by {err}");
    }
}
