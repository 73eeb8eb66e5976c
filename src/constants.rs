//! Memoized fundamental constants: π, e, Euler's γ, and ln(radix).
//!
//! Entries are keyed by `(constant, radix, precision)`. Concurrent requests
//! for an absent key coalesce onto a single computation (a per-key
//! `OnceCell` behind one map lock), and a request is served from an
//! existing entry only when that entry's precision is at least the
//! requested one, rounded down — never the other way around.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;

use num_bigint::BigInt;

use crate::agm::agm;
use crate::elementary::{ln_f, sqrt_f};
use crate::error::{Error, Result};
use crate::number::Float;
use crate::precision::Precision;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Constant {
    Pi,
    E,
    EulerGamma,
    LnRadix,
}

type Key = (Constant, u32, u64);

static CACHE: Lazy<Mutex<HashMap<Key, Arc<OnceCell<Float>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cached(
    which: Constant,
    radix: u32,
    precision: Precision,
    compute: impl FnOnce(u64) -> Result<Float>,
) -> Result<Float> {
    let p = match precision.finite() {
        Some(p) => p.max(1),
        // Every constant here is irrational: no finite expansion exists.
        None => return Err(Error::InfiniteExpansion),
    };

    let cell = {
        let mut map = CACHE.lock();
        // A higher-precision entry for the same constant serves a lower
        // request after rounding down.
        let best = map
            .iter()
            .filter(|((k, r, kp), _)| *k == which && *r == radix && *kp >= p)
            .filter_map(|(_, c)| c.get())
            .min_by_key(|v| v.precision());
        if let Some(v) = best {
            return Ok(v.rounded(Precision::digits(p)));
        }
        map.entry((which, radix, p)).or_default().clone()
    };
    let value = cell.get_or_try_init(|| {
        debug!("computing {which:?} at {p} digits in radix {radix}");
        compute(p)
    })?;
    Ok(value.clone())
}

/// π to `precision` digits in the given radix, via the Gauss–Legendre
/// AGM iteration.
///
/// # Errors
///
/// [`Error::InfiniteExpansion`] for an EXACT request.
pub fn pi(radix: u32, precision: Precision) -> Result<Float> {
    cached(Constant::Pi, radix, precision, |p| {
        let wp = Precision::digits(p + 10);
        let goal = (p + 8) as i64;
        let two = Float::with_radix(2, radix);
        let mut a = Float::one(radix).with_precision(wp);
        let mut b = sqrt_f(&Float::rational(1, 2, radix, wp)?, wp)?;
        let mut t = Float::rational(1, 4, radix, wp)?;
        let mut power = Float::one(radix);
        loop {
            let d = (&a - &b).abs();
            if d.is_zero() || a.scale() - d.scale() >= goal {
                break;
            }
            let an = (&a + &b).divide(&two)?;
            let c = &a - &an;
            t = &t - &(&power * &(&c * &c));
            power = &power * &two;
            b = sqrt_f(&(&a * &b), wp)?;
            a = an;
        }
        let s = &a + &b;
        (&s * &s)
            .divide(&(&t * &Float::with_radix(4, radix)))
            .map(|v| v.rounded(Precision::digits(p)))
    })
}

/// Euler's number e to `precision` digits, by binary splitting of
/// `Σ 1/k!`.
pub fn e(radix: u32, precision: Precision) -> Result<Float> {
    cached(Constant::E, radix, precision, |p| {
        let ln_r = (radix as f64).ln();
        let needed = (p + 4) as f64 * ln_r;
        let mut n = 1u64;
        let mut acc = 0.0f64;
        while acc <= needed {
            n += 1;
            acc += (n as f64).ln();
        }
        let (num, den) = factorial_split(1, n + 1);
        let num = Float::from_bigint(&den + &num, radix).with_precision(Precision::digits(p + 4));
        let den = Float::from_bigint(den, radix).with_precision(Precision::digits(p + 4));
        num.divide(&den).map(|v| v.rounded(Precision::digits(p)))
    })
}

/// Binary splitting for `Σ_{k=a}^{b-1} Π_{j=a}^{k} 1/j`, returned as a
/// `(numerator, denominator)` pair with `den = a·(a+1)···(b-1)`.
fn factorial_split(a: u64, b: u64) -> (BigInt, BigInt) {
    if b - a == 1 {
        (BigInt::from(1), BigInt::from(a))
    } else {
        let m = a + (b - a) / 2;
        let (p1, q1) = factorial_split(a, m);
        let (p2, q2) = factorial_split(m, b);
        (&p1 * &q2 + &p2, &q1 * &q2)
    }
}

/// The Euler–Mascheroni constant γ, via the Brent–McMillan AGM-free
/// Bessel-sum form `γ = A(n)/I(n) − ln n` with `n` sized to the target.
pub fn euler_gamma(radix: u32, precision: Precision) -> Result<Float> {
    cached(Constant::EulerGamma, radix, precision, |p| {
        let wp = Precision::digits(p + 15);
        let ln_r = (radix as f64).ln();
        let n = ((p + 12) as f64 * ln_r / 4.0).ceil() as i64 + 2;
        let nf = Float::with_radix(n, radix);
        let n_sqr = &nf * &nf;
        let one = Float::one(radix).with_precision(wp);

        let mut term = one.clone();
        let mut harmonic = Float::zero(radix);
        let mut a_sum = Float::zero(radix);
        let mut i_sum = term.clone();
        let mut k: i64 = 1;
        loop {
            let kf = Float::with_radix(k, radix);
            term = (&term * &n_sqr).divide(&(&kf * &kf))?;
            harmonic = &harmonic + &one.divide(&kf)?;
            a_sum = &a_sum + &(&term * &harmonic);
            i_sum = &i_sum + &term;
            if !term.is_zero() && (i_sum.scale() - term.scale()) > (p + 12) as i64 {
                break;
            }
            k += 1;
        }
        let ratio = a_sum.divide(&i_sum)?;
        let ln_n = ln_f(&nf.with_precision(wp), wp)?;
        Ok((&ratio - &ln_n).rounded(Precision::digits(p)))
    })
}

/// ln(radix) to `precision` digits, from the AGM large-argument identity
/// `ln s ≈ π / (2·agm(1, 4/s))` applied to `s = radix^m`.
pub fn ln_radix(radix: u32, precision: Precision) -> Result<Float> {
    cached(Constant::LnRadix, radix, precision, |p| {
        let wp = Precision::digits(p + 10);
        let m = (p / 2 + 10) as i64;
        let s = Float::radix_power(m, radix);
        let four_over_s = Float::with_radix(4, radix).with_precision(wp).divide(&s)?;
        let v = agm(&Float::one(radix).with_precision(wp), &four_over_s, wp)?;
        let pi = pi(radix, wp)?;
        let denom = &(&v * &Float::with_radix(2, radix)) * &Float::with_radix(m, radix);
        pi.divide(&denom).map(|r| r.rounded(Precision::digits(p)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pi_reference_40_digits() {
        let reference = "3.141592653589793238462643383279502884197";
        let want = Float::parse(reference, 10, Precision::digits(40)).unwrap();
        let got = pi(10, Precision::digits(40)).unwrap();
        let err = (&got - &want).abs();
        assert!(err <= want.ulp(), "pi off by {err}");
    }

    #[test]
    fn e_reference_40_digits() {
        let reference = "2.718281828459045235360287471352662497757";
        let want = Float::parse(reference, 10, Precision::digits(40)).unwrap();
        let got = e(10, Precision::digits(40)).unwrap();
        let err = (&got - &want).abs();
        assert!(err <= want.ulp(), "e off by {err}");
    }

    #[test]
    fn euler_gamma_reference() {
        let reference = "0.5772156649015328606065120900824024310422";
        let want = Float::parse(reference, 10, Precision::digits(40)).unwrap();
        let got = euler_gamma(10, Precision::digits(40)).unwrap();
        let err = (&got - &want).abs();
        assert!(err <= want.ulp(), "gamma const off by {err}");
    }

    #[test]
    fn ln_radix_matches_ln_of_radix() {
        let reference = "2.302585092994045684017991454684364207601";
        let want = Float::parse(reference, 10, Precision::digits(40)).unwrap();
        let got = ln_radix(10, Precision::digits(40)).unwrap();
        let err = (&got - &want).abs();
        assert!(err <= want.ulp(), "ln 10 off by {err}");
    }

    #[test]
    fn exact_request_is_infinite_expansion() {
        assert_eq!(pi(10, Precision::EXACT), Err(Error::InfiniteExpansion));
        assert_eq!(e(10, Precision::EXACT), Err(Error::InfiniteExpansion));
    }

    #[test]
    fn higher_precision_entry_serves_lower_request() {
        let hi = pi(10, Precision::digits(80)).unwrap();
        let lo = pi(10, Precision::digits(30)).unwrap();
        assert_eq!(lo.precision(), Precision::digits(30));
        let err = (&lo - &hi.rounded(Precision::digits(30))).abs();
        assert!(err.is_zero());
    }
}
