//! Argument transformations for the Gauss hypergeometric function.
//!
//! The six DLMF argument maps are costed in double precision and the one
//! with the smallest transformed modulus wins. Maps whose connection
//! formulas break down for integer parameter differences are rescued by
//! nudging a parameter at extended precision; the nudge cancels in the
//! algebra and its own error sits below the target digits. When even the
//! best map leaves the argument large, evaluation falls through to ODE
//! continuation.

use crate::elementary::pow;
use crate::error::{Error, Result};
use crate::functions::gamma::gamma;
use crate::number::{Complex, Float};
use crate::precision::{ensure_complex, Context, Precision, EXTRA_PRECISION};
use crate::series::hyper_series;

/// Transformed modulus above which no series transform is worthwhile.
const CONTINUATION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Map {
    Direct,
    Pfaff,
    OneMinus,
    Inverse,
    InverseOneMinus,
    OneMinusInverse,
}

fn c64(z: &Complex) -> (f64, f64) {
    (z.re().to_f64(), z.im().to_f64())
}

fn mag(p: (f64, f64)) -> f64 {
    p.0.hypot(p.1)
}

fn csub(x: (f64, f64), y: (f64, f64)) -> (f64, f64) {
    (x.0 - y.0, x.1 - y.1)
}

fn cdiv(x: (f64, f64), y: (f64, f64)) -> (f64, f64) {
    let d = y.0 * y.0 + y.1 * y.1;
    ((x.0 * y.0 + x.1 * y.1) / d, (x.1 * y.0 - x.0 * y.1) / d)
}

/// Modulus of the transformed argument under each map, at f64 cost.
fn mapped_modulus(map: Map, z: (f64, f64)) -> f64 {
    let one = (1.0, 0.0);
    match map {
        Map::Direct => mag(z),
        Map::Pfaff => mag(cdiv(z, csub(z, one))),
        Map::OneMinus => mag(csub(one, z)),
        Map::Inverse => mag(cdiv(one, z)),
        Map::InverseOneMinus => mag(cdiv(one, csub(one, z))),
        Map::OneMinusInverse => mag(csub(one, cdiv(one, z))),
    }
}

/// Digits lost when a parameter difference sits near (but not on) an
/// integer: the connection coefficients grow like the reciprocal distance.
fn integer_proximity_digits(d: &Complex) -> u64 {
    if !d.im().is_zero() {
        return 0;
    }
    let frac = d
        .re()
        .sub(&Float::from_bigint(d.re().to_bigint_rounded(), d.radix()));
    if frac.is_zero() {
        0
    } else {
        (-frac.scale()).max(0) as u64
    }
}

/// `Γ(n0)Γ(n1)/(Γ(d0)Γ(d1))`, or `None` when a denominator gamma sits on
/// a pole and annihilates the whole term.
fn connection_coefficient(
    num: [&Complex; 2],
    den: [&Complex; 2],
    wp: Precision,
) -> Result<Option<Complex>> {
    let radix = num[0].radix();
    let mut d = Complex::one(radix).with_precision(wp);
    for g in den {
        match gamma(g, wp) {
            Ok(v) => d = d.mul(&v),
            Err(Error::GammaPole) => return Ok(None),
            Err(e) => return Err(e),
        }
    }
    let mut n = Complex::one(radix).with_precision(wp);
    for g in num {
        n = n.mul(&gamma(g, wp)?);
    }
    Ok(Some(n.divide(&d)?))
}

fn series(a: &Complex, b: &Complex, c: &Complex, w: &Complex, wp: Precision) -> Result<Complex> {
    let ctx = Context::new(wp, w.radix());
    hyper_series(&[a.clone(), b.clone()], &[c.clone()], w, &ctx)
}

/// Gauss summation at `z = 1`:
/// `F(a,b;c;1) = Γ(c)Γ(c−a−b)/(Γ(c−a)Γ(c−b))` for `Re(c−a−b) > 0`.
fn gauss_sum(a: &Complex, b: &Complex, c: &Complex, wp: Precision) -> Result<Complex> {
    let s = c.sub(a).sub(b);
    if s.re().signum() <= 0 {
        return Err(Error::Divergent);
    }
    match connection_coefficient([c, &s], [&c.sub(a), &c.sub(b)], wp)? {
        Some(v) => Ok(v),
        None => Ok(Complex::zero(c.radix())),
    }
}

/// Evaluate the chosen transform. Callers guarantee the parameter
/// differences the map's connection formula divides by are off-integer.
fn apply_map(
    map: Map,
    a: &Complex,
    b: &Complex,
    c: &Complex,
    z: &Complex,
    wp: Precision,
) -> Result<Complex> {
    let radix = z.radix();
    let one = Complex::one(radix).with_precision(wp);
    match map {
        Map::Direct => series(a, b, c, z, wp),
        Map::Pfaff => {
            // (1−z)^{−a}·F(a, c−b; c; z/(z−1))
            let w = z.divide(&z.sub(&one))?;
            let front = pow(&one.sub(z), &a.neg(), wp)?;
            Ok(front.mul(&series(a, &c.sub(b), c, &w, wp)?))
        }
        Map::OneMinus => {
            let w = one.sub(z);
            let s = c.sub(a).sub(b);
            let mut acc = Complex::zero(radix);
            if let Some(k) = connection_coefficient([c, &s], [&c.sub(a), &c.sub(b)], wp)? {
                acc = acc.add(&k.mul(&series(a, b, &one.sub(&s), &w, wp)?));
            }
            if let Some(k) = connection_coefficient([c, &s.neg()], [a, b], wp)? {
                let front = pow(&w, &s, wp)?;
                acc = acc.add(&k.mul(&front).mul(&series(&c.sub(a), &c.sub(b), &s.add(&one), &w, wp)?));
            }
            Ok(acc)
        }
        Map::Inverse => {
            let w = one.divide(z)?;
            let d = a.sub(b);
            let neg_z = z.neg();
            let mut acc = Complex::zero(radix);
            if let Some(k) = connection_coefficient([c, &d.neg()], [b, &c.sub(a)], wp)? {
                let front = pow(&neg_z, &a.neg(), wp)?;
                let inner = series(a, &a.sub(c).add(&one), &one.sub(&d.neg()), &w, wp)?;
                acc = acc.add(&k.mul(&front).mul(&inner));
            }
            if let Some(k) = connection_coefficient([c, &d], [a, &c.sub(b)], wp)? {
                let front = pow(&neg_z, &b.neg(), wp)?;
                let inner = series(b, &b.sub(c).add(&one), &one.sub(&d), &w, wp)?;
                acc = acc.add(&k.mul(&front).mul(&inner));
            }
            Ok(acc)
        }
        Map::InverseOneMinus => {
            let w = one.divide(&one.sub(z))?;
            let d = a.sub(b);
            let mut acc = Complex::zero(radix);
            if let Some(k) = connection_coefficient([c, &d.neg()], [b, &c.sub(a)], wp)? {
                let front = pow(&one.sub(z), &a.neg(), wp)?;
                let inner = series(a, &c.sub(b), &d.add(&one), &w, wp)?;
                acc = acc.add(&k.mul(&front).mul(&inner));
            }
            if let Some(k) = connection_coefficient([c, &d], [a, &c.sub(b)], wp)? {
                let front = pow(&one.sub(z), &b.neg(), wp)?;
                let inner = series(b, &c.sub(a), &d.neg().add(&one), &w, wp)?;
                acc = acc.add(&k.mul(&front).mul(&inner));
            }
            Ok(acc)
        }
        Map::OneMinusInverse => {
            let w = one.sub(&one.divide(z)?);
            let s = c.sub(a).sub(b);
            let mut acc = Complex::zero(radix);
            if let Some(k) = connection_coefficient([c, &s], [&c.sub(a), &c.sub(b)], wp)? {
                let front = pow(z, &a.neg(), wp)?;
                let inner = series(a, &a.sub(c).add(&one), &one.sub(&s), &w, wp)?;
                acc = acc.add(&k.mul(&front).mul(&inner));
            }
            if let Some(k) = connection_coefficient([c, &s.neg()], [a, b], wp)? {
                let front = pow(&one.sub(z), &s, wp)?.mul(&pow(z, &a.sub(c), wp)?);
                let inner = series(&c.sub(a), &one.sub(a), &s.add(&one), &w, wp)?;
                acc = acc.add(&k.mul(&front).mul(&inner));
            }
            Ok(acc)
        }
    }
}

/// The Gauss hypergeometric function `₂F₁(a, b; c; z)`.
///
/// Terminating numerators short-circuit to the polynomial; `z = 1` uses
/// Gauss summation; otherwise the cheapest of the six argument maps is
/// applied, falling back to ODE continuation when none contracts the
/// argument enough.
///
/// # Errors
///
/// [`Error::GammaPole`] for a non-positive-integer `c` not shielded by a
/// terminating numerator; [`Error::Divergent`] at `z = 1` when
/// `Re(c−a−b) ≤ 0`.
pub fn gauss_2f1(
    a: &Complex,
    b: &Complex,
    c: &Complex,
    z: &Complex,
    target: Precision,
) -> Result<Complex> {
    let radix = z.radix();
    let ctx = Context::new(target, radix);
    if z.is_zero() {
        return Ok(Complex::one(radix));
    }

    let terminates = |p: &Complex| p.is_integer() && p.re().signum() <= 0;
    if terminates(a) || terminates(b) {
        let wp = ctx.working();
        return hyper_series(
            &[a.clone(), b.clone()],
            &[c.clone()],
            z,
            &Context::new(wp, radix),
        )
        .map(|v| v.rounded(target));
    }
    if c.is_integer() && c.re().signum() <= 0 {
        return Err(Error::GammaPole);
    }
    if z == &Complex::one(radix) {
        let wp = ctx.working().extend(5);
        return gauss_sum(
            &ensure_complex(a, wp),
            &ensure_complex(b, wp),
            &ensure_complex(c, wp),
            wp,
        )
        .map(|v| v.rounded(target));
    }

    let zf = c64(z);
    let maps = [
        Map::Direct,
        Map::Pfaff,
        Map::OneMinus,
        Map::Inverse,
        Map::InverseOneMinus,
        Map::OneMinusInverse,
    ];
    let mut best = Map::Direct;
    let mut best_mod = f64::INFINITY;
    for m in maps {
        let w = mapped_modulus(m, zf);
        if w.is_finite() && w < best_mod {
            best = m;
            best_mod = w;
        }
    }
    if best_mod > CONTINUATION_THRESHOLD {
        return super::continuation::continue_2f1(a, b, c, z, target);
    }

    // Maps with two-term connection formulas divide by sin-like factors of
    // a parameter difference; integers are nudged off the pole and near
    // integers cost digits proportional to the proximity.
    let difference = match best {
        Map::Inverse | Map::InverseOneMinus => Some(a.sub(b)),
        Map::OneMinus | Map::OneMinusInverse => Some(c.sub(a).sub(b)),
        Map::Direct | Map::Pfaff => None,
    };
    let (wp, nudge) = match &difference {
        Some(d) if d.is_integer() => {
            let eps_digits = target.count() + EXTRA_PRECISION;
            let wp = target.extend(eps_digits + EXTRA_PRECISION);
            (wp, Some(Float::radix_power(-(eps_digits as i64), radix)))
        }
        Some(d) => {
            let comp = integer_proximity_digits(d);
            (ctx.working().extend(comp).extend(5), None)
        }
        None => (ctx.working().extend(5), None),
    };

    let aw = ensure_complex(&a.rounded(wp.min(a.precision())), wp);
    let mut bw = ensure_complex(&b.rounded(wp.min(b.precision())), wp);
    let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
    let cw = ensure_complex(&c.rounded(wp.min(c.precision())), wp);
    if let Some(eps) = nudge {
        bw = bw.add(&Complex::from_real(eps.with_precision(wp)));
    }
    Ok(apply_map(best, &aw, &bw, &cw, &zw, wp)?.rounded(target))
}
