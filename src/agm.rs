//! Arithmetic-geometric mean for real and complex values.
//!
//! The AGM iteration `a' = (a+b)/2`, `b' = √(a·b)` converges
//! quadratically once the operands are close, but only linearly before
//! that, so the loop runs in two phases: an early phase that checks the
//! convergence speed explicitly, and a quadratic phase that doubles the
//! matching-digit count per step. For complex operands the square root
//! has two candidate branches; the wrong one makes the iteration wander,
//! so each step picks the branch that keeps `|a − b| ≤ |a + b|`.

use crate::elementary::{sqrt, sqrt_f};
use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{Context, Precision};

/// Matching digits below this count are treated as the slow phase.
const QUADRATIC_THRESHOLD: u64 = 4;

/// Leading digits on which `a` and `b` agree (0 when even the scales
/// differ).
fn matching_digits(a: &Complex, b: &Complex) -> u64 {
    let d = a.sub(b);
    if d.is_zero() {
        return u64::MAX;
    }
    let gap = a.scale() - d.scale();
    gap.max(0) as u64
}

/// Square-root branch for the AGM step: of `±√(a·b)`, keep the candidate
/// on the same side as the iteration so far, i.e. the one with
/// `|a' − b'| ≤ |a' + b'|`, tie-broken by the sign of `Im(b'/a')`.
fn agm_sqrt(a: &Complex, b: &Complex, working: Precision) -> Result<Complex> {
    let s = sqrt(&a.mul(b), working)?;
    let diff = a.sub(&s).norm_sqr();
    let sum = a.add(&s).norm_sqr();
    match diff.partial_cmp(&sum) {
        Some(core::cmp::Ordering::Greater) => Ok(s.neg()),
        Some(core::cmp::Ordering::Equal) => {
            let ratio = s.divide(a)?;
            if ratio.im().signum() < 0 {
                Ok(s.neg())
            } else {
                Ok(s)
            }
        }
        _ => Ok(s),
    }
}

/// Complex arithmetic-geometric mean to `target` digits.
///
/// Degenerate pairs return without iterating: a zero operand (or operands
/// that are negatives of each other, which would never converge
/// quadratically) gives zero, and equal operands give that value back.
///
/// # Errors
///
/// [`Error::InfiniteExpansion`] for an EXACT target; the AGM of distinct
/// operands has no finite expansion.
pub fn agm_complex(a: &Complex, b: &Complex, target: Precision) -> Result<Complex> {
    let radix = a.radix();
    if a.is_zero() || b.is_zero() || a.add(b).is_zero() {
        return Ok(Complex::zero(radix));
    }
    if a == b {
        let p = a.precision().min(b.precision()).min(target);
        return Ok(a.rounded(p));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }

    let ctx = Context::new(target, radix);
    let working = ctx.working();
    let goal = working.count();
    let mut a = a.rounded(working);
    let mut b = b.rounded(working);

    // Slow phase: iterate until quadratic convergence is confirmed by an
    // explicitly increasing matching-digit count.
    let mut slow_iters = 0u64;
    let mut matched = matching_digits(&a, &b);
    while matched < QUADRATIC_THRESHOLD {
        slow_iters += 1;
        if slow_iters > 64 + 2 * goal {
            return Err(Error::LossOfPrecision);
        }
        let an = a.add(&b).divide(&Complex::with_radix(2, radix))?;
        let bn = agm_sqrt(&a, &b, working)?;
        a = an;
        b = bn;
        let now = matching_digits(&a, &b);
        if now >= goal {
            return a.add(&b).divide(&Complex::with_radix(2, radix)).map(|v| v.rounded(target));
        }
        matched = now;
    }

    // Quadratic phase: the matching count doubles per step.
    let mut quad_iters = 0u64;
    while matched < goal {
        quad_iters += 1;
        if quad_iters > 64 + goal {
            return Err(Error::LossOfPrecision);
        }
        let an = a.add(&b).divide(&Complex::with_radix(2, radix))?;
        let bn = agm_sqrt(&a, &b, working)?;
        a = an;
        b = bn;
        matched = matching_digits(&a, &b);
    }
    a.add(&b)
        .divide(&Complex::with_radix(2, radix))
        .map(|v| v.rounded(target))
}

/// Real arithmetic-geometric mean. Both operands must share a sign;
/// `agm(-a, -b) = -agm(a, b)`.
///
/// # Errors
///
/// [`Error::Domain`] for operands of opposite sign (the geometric mean
/// leaves the real line) and [`Error::InfiniteExpansion`] for an EXACT
/// target.
pub fn agm(a: &Float, b: &Float, target: Precision) -> Result<Float> {
    let radix = a.radix();
    if a.is_zero() || b.is_zero() || (a + b).is_zero() {
        return Ok(Float::zero(radix));
    }
    if a.signum() != b.signum() {
        return Err(Error::Domain);
    }
    if a.signum() < 0 {
        return agm(&a.neg(), &b.neg(), target).map(|v| v.neg());
    }
    if a == b {
        let p = a.precision().min(b.precision()).min(target);
        return Ok(a.rounded(p));
    }
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }

    let ctx = Context::new(target, radix);
    let working = ctx.working();
    let goal = working.count();
    let two = Float::with_radix(2, radix);
    let mut a = a.rounded(working);
    let mut b = b.rounded(working);
    let mut iters = 0u64;
    loop {
        let d = (&a - &b).abs();
        if d.is_zero() || a.scale() - d.scale() >= goal as i64 {
            break;
        }
        iters += 1;
        if iters > 64 + 2 * goal {
            return Err(Error::LossOfPrecision);
        }
        let an = (&a + &b).divide(&two)?;
        let bn = sqrt_f(&(&a * &b), working)?;
        a = an;
        b = bn;
    }
    (&a + &b).divide(&two).map(|v| v.rounded(target))
}

/// AGM of `(1, b)` that also reports the halved differences
/// `c_k = (a_k − b_k)/2` of every step, as needed by the complete
/// elliptic integral of the second kind.
pub fn agm_residuals(b0: &Float, target: Precision) -> Result<(Float, Vec<Float>)> {
    let radix = b0.radix();
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let ctx = Context::new(target, radix);
    let working = ctx.working();
    let goal = working.count();
    let two = Float::with_radix(2, radix);
    let mut a = Float::one(radix).with_precision(working);
    let mut b = b0.rounded(working);
    let mut residuals = Vec::new();
    loop {
        let d = (&a - &b).abs();
        if d.is_zero() || a.scale() - d.scale() >= goal as i64 {
            break;
        }
        let c = (&a - &b).divide(&two)?;
        residuals.push(c);
        let an = (&a + &b).divide(&two)?;
        let bn = sqrt_f(&(&a * &b), working)?;
        a = an;
        b = bn;
    }
    Ok(((&a + &b).divide(&two)?.rounded(target), residuals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u64) -> Precision {
        Precision::digits(n)
    }

    #[test]
    fn agm_fixed_point() {
        let a = Float::parse("2.5", 10, p(30)).unwrap();
        assert_eq!(agm(&a, &a, p(30)).unwrap(), a);
    }

    #[test]
    fn agm_degenerate_zero() {
        let a = Float::with_radix(3, 10);
        assert!(agm(&a, &Float::zero(10), p(20)).unwrap().is_zero());
        assert!(agm(&a, &a.neg(), p(20)).unwrap().is_zero());
    }

    #[test]
    fn agm_opposite_signs_rejected() {
        let a = Float::one(10);
        assert_eq!(agm(&a, &a.neg().sub(&a), p(20)), Err(Error::Domain));
    }

    #[test]
    fn agm_exact_target_rejected() {
        let a = Float::one(10);
        let b = Float::with_radix(2, 10);
        assert_eq!(agm(&a, &b, Precision::EXACT), Err(Error::InfiniteExpansion));
    }

    #[test]
    fn agm_one_two_reference() {
        // agm(1, 2) = 1.45679103104690686918643238326508197497...
        let a = Float::one(10).with_precision(p(40));
        let b = Float::with_radix(2, 10).with_precision(p(40));
        let got = agm(&a, &b, p(35)).unwrap();
        let expect = Float::parse("1.4567910310469068691864323832650819750", 10, p(35)).unwrap();
        let err = (&got - &expect).abs();
        assert!(err <= expect.ulp(), "agm(1,2) off by {err}");
    }

    #[test]
    fn agm_invariant_under_one_step() {
        // agm(a, b) == agm((a+b)/2, sqrt(ab))
        let a = Float::parse("1.25", 10, p(40)).unwrap();
        let b = Float::parse("3.5", 10, p(40)).unwrap();
        let lhs = agm(&a, &b, p(30)).unwrap();
        let two = Float::with_radix(2, 10);
        let mid = (&a + &b).divide(&two).unwrap();
        let geo = sqrt_f(&(&a * &b), p(40)).unwrap();
        let rhs = agm(&mid, &geo, p(30)).unwrap();
        let err = (&lhs - &rhs).abs();
        assert!(err <= lhs.ulp().mul(&Float::with_radix(2, 10)));
    }

    #[test]
    fn complex_agm_negative_real_operand() {
        // agm(1, i): a known value ~ 0.5990701173 + 0.5990701173i·? — check
        // instead the defining one-step invariance, which exercises the
        // branch selection.
        let one = Complex::one(10).with_precision(p(30));
        let i = Complex::i(10).with_precision(p(30));
        let lhs = agm_complex(&one, &i, p(20)).unwrap();
        let two = Complex::with_radix(2, 10);
        let mid = one.add(&i).divide(&two).unwrap();
        let geo = agm_sqrt(&one, &i, p(30)).unwrap();
        let rhs = agm_complex(&mid, &geo, p(20)).unwrap();
        let err = lhs.sub(&rhs).norm_sqr();
        assert!(err < Float::parse("1e-35", 10, p(5)).unwrap());
    }
}
