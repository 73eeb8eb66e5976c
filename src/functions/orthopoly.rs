//! Orthogonal (and kindred) polynomial families, evaluated through their
//! terminating hypergeometric representations rather than coefficient
//! tables, so a single code path serves every degree and radix.

use log::debug;
use num_bigint::BigInt;
use num_traits::One;

use crate::bernoulli::bernoulli;
use crate::error::{Error, Result};
use crate::functions::gamma::factorial_bigint;
use crate::hyper::{gauss_2f1, hypergeometric_1f1};
use crate::number::{Complex, Float};
use crate::precision::{ensure, Context, Precision, MAX_ESCALATIONS};

fn cx(f: Float) -> Complex {
    Complex::from_real(f)
}

/// `(1−x)/2`, the standard Jacobi-class argument map.
fn unit_map(x: &Float, wp: Precision) -> Result<Float> {
    let radix = x.radix();
    let one = Float::one(radix).with_precision(wp);
    (&one - &ensure(&x.rounded(wp.min(x.precision())), wp))
        .divide(&Float::with_radix(2, radix))
}

/// Hermite polynomial `H_n`, split by parity:
/// `H_{2m} = (−1)^m (2m)!/m!·₁F₁(−m; ½; x²)`,
/// `H_{2m+1} = (−1)^m (2m+1)!/m!·2x·₁F₁(−m; 3/2; x²)`.
pub fn hermite(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let m = n / 2;
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let sq = cx(&xw * &xw);
    let neg_m = Complex::with_radix(-(m as i64), radix);
    let ratio = factorial_bigint(n) / factorial_bigint(m);
    let mut front = Float::from_bigint(ratio, radix).with_precision(wp);
    if m % 2 == 1 {
        front = front.neg();
    }
    let v = if n % 2 == 0 {
        let s = hypergeometric_1f1(&neg_m, &cx(Float::rational(1, 2, radix, wp)?), &sq, wp)?;
        &front * s.re()
    } else {
        let s = hypergeometric_1f1(&neg_m, &cx(Float::rational(3, 2, radix, wp)?), &sq, wp)?;
        &(&front * &(&xw * &Float::with_radix(2, radix))) * s.re()
    };
    Ok(v.rounded(target))
}

/// Generalized Laguerre polynomial
/// `L_n^{(α)}(x) = ((α+1)_n/n!)·₁F₁(−n; α+1; x)`.
pub fn laguerre(n: u64, alpha: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let a1 = ensure(&alpha.rounded(wp.min(alpha.precision())), wp).add(&Float::one(radix));
    let s = hypergeometric_1f1(
        &Complex::with_radix(-(n as i64), radix),
        &cx(a1.clone()),
        &cx(ensure(&x.rounded(wp.min(x.precision())), wp)),
        wp,
    )?;
    let front = rising(&a1, n, wp).divide(&Float::from_bigint(factorial_bigint(n), radix))?;
    Ok((&front * s.re()).rounded(target))
}

/// Legendre polynomial `P_n(x) = ₂F₁(−n, n+1; 1; (1−x)/2)`.
pub fn legendre(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let w = unit_map(x, wp)?;
    gauss_2f1(
        &Complex::with_radix(-(n as i64), radix),
        &Complex::with_radix(n as i64 + 1, radix),
        &Complex::one(radix),
        &cx(w),
        wp,
    )
    .map(|v| v.re().rounded(target))
}

/// Jacobi polynomial
/// `P_n^{(α,β)}(x) = ((α+1)_n/n!)·₂F₁(−n, n+α+β+1; α+1; (1−x)/2)`.
pub fn jacobi(
    n: u64,
    alpha: &Float,
    beta: &Float,
    x: &Float,
    target: Precision,
) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let a1 = ensure(&alpha.rounded(wp.min(alpha.precision())), wp).add(&Float::one(radix));
    let upper = a1
        .add(&ensure(&beta.rounded(wp.min(beta.precision())), wp))
        .add(&Float::with_radix(n as i64, radix));
    let w = unit_map(x, wp)?;
    let s = gauss_2f1(
        &Complex::with_radix(-(n as i64), radix),
        &cx(upper),
        &cx(a1.clone()),
        &cx(w),
        wp,
    )?;
    let front = rising(&a1, n, wp).divide(&Float::from_bigint(factorial_bigint(n), radix))?;
    Ok((&front * s.re()).rounded(target))
}

/// Chebyshev polynomial of the first kind,
/// `T_n(x) = ₂F₁(−n, n; ½; (1−x)/2)`.
pub fn chebyshev_t(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let w = unit_map(x, wp)?;
    gauss_2f1(
        &Complex::with_radix(-(n as i64), radix),
        &Complex::with_radix(n as i64, radix),
        &cx(Float::rational(1, 2, radix, wp)?),
        &cx(w),
        wp,
    )
    .map(|v| v.re().rounded(target))
}

/// Chebyshev polynomial of the second kind,
/// `U_n(x) = (n+1)·₂F₁(−n, n+2; 3/2; (1−x)/2)`.
pub fn chebyshev_u(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let w = unit_map(x, wp)?;
    let s = gauss_2f1(
        &Complex::with_radix(-(n as i64), radix),
        &Complex::with_radix(n as i64 + 2, radix),
        &cx(Float::rational(3, 2, radix, wp)?),
        &cx(w),
        wp,
    )?;
    Ok((s.re() * &Float::with_radix(n as i64 + 1, radix)).rounded(target))
}

/// Gegenbauer polynomial
/// `C_n^{(λ)}(x) = ((2λ)_n/n!)·₂F₁(−n, n+2λ; λ+½; (1−x)/2)`.
pub fn gegenbauer(n: u64, lambda: &Float, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 5);
    let lw = ensure(&lambda.rounded(wp.min(lambda.precision())), wp);
    let two_l = &lw * &Float::with_radix(2, radix);
    let front = rising(&two_l, n, wp).divide(&Float::from_bigint(factorial_bigint(n), radix))?;
    if front.is_zero() {
        return Ok(Float::zero(radix));
    }
    let w = unit_map(x, wp)?;
    let s = gauss_2f1(
        &Complex::with_radix(-(n as i64), radix),
        &cx(two_l.add(&Float::with_radix(n as i64, radix))),
        &cx(lw.add(&Float::rational(1, 2, radix, wp)?)),
        &cx(w),
        wp,
    )?;
    Ok((&front * s.re()).rounded(target))
}

/// Rising factorial `(a)_n` of a real base.
fn rising(a: &Float, n: u64, wp: Precision) -> Float {
    let mut acc = Float::one(a.radix()).with_precision(wp);
    for i in 0..n {
        acc = &acc * &a.add(&Float::with_radix(i as i64, a.radix()));
    }
    acc
}

/// Fibonacci polynomial `F_n(x)`: `F_0 = 0`, `F_1 = 1`,
/// `F_n = x·F_{n−1} + F_{n−2}`.
pub fn fibonacci(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if n == 0 {
        return Ok(Float::zero(radix));
    }
    let wp = Context::new(target, radix).working().extend(5);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let mut prev = Float::zero(radix);
    let mut cur = Float::one(radix).with_precision(wp);
    for _ in 1..n {
        let next = (&xw * &cur).add(&prev);
        prev = cur;
        cur = next;
    }
    Ok(cur.rounded(target))
}

/// Bernoulli polynomial `B_n(x) = Σ C(n,k)·B_k·x^{n−k}`, with exact
/// rational coefficients and escalation against the sum's cancellation.
pub fn bernoulli_polynomial(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if target.is_exact() {
        return Err(Error::InfiniteExpansion);
    }
    let mut ctx = Context::new(target, radix);
    for round in 0..=MAX_ESCALATIONS {
        let wp = ctx.working().extend(n / 2);
        let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
        let mut sum = Float::zero(radix);
        let mut peak = i64::MIN;
        let mut xp = Float::one(radix).with_precision(wp); // x^{n−k}, built downward
        let mut binom = BigInt::one();
        // iterate k from n down to 0 so the power of x grows with the loop
        for j in 0..=n {
            let k = n - j;
            if j > 0 {
                // C(n, k) from C(n, k+1): multiply by (k+1), divide by (n−k)
                binom = binom * BigInt::from(k + 1) / BigInt::from(n - k);
            }
            let b = bernoulli(k);
            if !num_traits::Zero::is_zero(&b) {
                let num = Float::from_bigint(b.numer() * &binom, radix).with_precision(wp);
                let coeff = num.divide(&Float::from_bigint(b.denom().clone(), radix))?;
                sum = sum.add(&(&coeff * &xp));
                peak = peak.max(sum.scale());
            }
            xp = &xp * &xw;
        }
        let loss = if sum.is_zero() {
            0
        } else {
            (peak - sum.scale()).max(0) as u64
        };
        if loss <= ctx.margin {
            return Ok(sum.rounded(target));
        }
        debug!("bernoulli polynomial round {round}: {loss} digits cancelled");
        ctx = ctx.escalated(loss);
    }
    Err(Error::LossOfPrecision)
}

/// Euler polynomial via the Bernoulli-polynomial identity
/// `E_n(x) = (2/(n+1))·(B_{n+1}(x) − 2^{n+1}·B_{n+1}(x/2))`.
pub fn euler_polynomial(n: u64, x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    let wp = Context::new(target, radix).working().extend(n / 2 + 10);
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let whole = bernoulli_polynomial(n + 1, &xw, wp)?;
    let halved = bernoulli_polynomial(
        n + 1,
        &xw.divide(&Float::with_radix(2, radix))?,
        wp,
    )?;
    let two_pow = Float::from_bigint(BigInt::from(2u32).pow(n as u32 + 1), radix);
    let diff = &whole - &(&two_pow * &halved);
    (&diff * &Float::with_radix(2, radix))
        .divide(&Float::with_radix(n as i64 + 1, radix))
        .map(|v| v.rounded(target))
}
