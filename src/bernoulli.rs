//! Exact Bernoulli numbers.
//!
//! Two generators share the work: a resumable Akiyama–Tanigawa triangle
//! (rational arithmetic, cheap for small indices, and the only way to get
//! the odd `B₁`) and the tangent-number triangle (integer arithmetic, far
//! cheaper for the large even indices the zeta engine asks for). Odd
//! indices above 1 are zero without any computation. All results use the
//! `B₁ = −1/2` convention.

use std::collections::HashMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::error::Result;
use crate::number::Float;
use crate::precision::Precision;

/// Largest index served by the Akiyama–Tanigawa triangle; even indices
/// above it go through tangent numbers.
const TANGENT_THRESHOLD: u64 = 64;

/// Resumable Akiyama–Tanigawa state: the computed prefix and the live
/// triangle row, which extends by one column per new index.
struct Triangle {
    values: Vec<BigRational>,
    row: Vec<BigRational>,
}

impl Triangle {
    const fn new() -> Self {
        Triangle {
            values: Vec::new(),
            row: Vec::new(),
        }
    }

    fn extend_to(&mut self, n: usize) {
        while self.values.len() <= n {
            let m = self.values.len();
            self.row
                .push(BigRational::new(BigInt::one(), BigInt::from(m as u64 + 1)));
            for j in (1..=m).rev() {
                let diff = &self.row[j - 1] - &self.row[j];
                self.row[j - 1] = diff * BigRational::from_integer(BigInt::from(j as u64));
            }
            let mut b = self.row[0].clone();
            // The triangle produces B₁ = +1/2; flip to the −1/2 convention.
            if m == 1 {
                b = -b;
            }
            self.values.push(b);
        }
    }
}

static SMALL: Lazy<Mutex<Triangle>> = Lazy::new(|| Mutex::new(Triangle::new()));

static LARGE: Lazy<Mutex<HashMap<u64, BigRational>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// `B_{2n}` from the tangent number `T_n`:
/// `B_{2n} = (−1)^{n−1} · 2n · T_n / (4ⁿ(4ⁿ−1))`.
fn tangent_bernoulli(even: u64) -> BigRational {
    let n = (even / 2) as usize;
    let mut t: Vec<BigInt> = Vec::with_capacity(n);
    t.push(BigInt::one());
    for k in 2..=n {
        let prev = &t[k - 2] * BigInt::from(k as u64 - 1);
        t.push(prev);
    }
    for k in 2..=n {
        for j in k..=n {
            let a = &t[j - 2] * BigInt::from((j - k) as u64);
            let b = &t[j - 1] * BigInt::from((j - k + 2) as u64);
            t[j - 1] = a + b;
        }
    }
    let four_n = BigInt::from(4u32).pow(n as u32);
    let den = &four_n * (&four_n - BigInt::one());
    let mut num = BigInt::from(even) * &t[n - 1];
    if n % 2 == 0 {
        num = -num;
    }
    BigRational::new(num, den)
}

/// The exact Bernoulli number `B_n` (`B₁ = −1/2` convention).
pub fn bernoulli(n: u64) -> BigRational {
    if n == 0 {
        return BigRational::one();
    }
    if n > 1 && n % 2 == 1 {
        return BigRational::zero();
    }
    if n <= TANGENT_THRESHOLD {
        let mut triangle = SMALL.lock();
        triangle.extend_to(n as usize);
        return triangle.values[n as usize].clone();
    }
    let mut cache = LARGE.lock();
    cache
        .entry(n)
        .or_insert_with(|| tangent_bernoulli(n))
        .clone()
}

/// `B_n` as a [`Float`] in the given radix.
///
/// # Errors
///
/// [`Error::InfiniteExpansion`](crate::Error::InfiniteExpansion) for an
/// EXACT target when the denominator does not divide a radix power.
pub fn bernoulli_float(n: u64, radix: u32, target: Precision) -> Result<Float> {
    let b = bernoulli(n);
    let num = Float::from_bigint(b.numer().clone(), radix).with_precision(target);
    let den = Float::from_bigint(b.denom().clone(), radix);
    num.divide(&den)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn small_reference_values() {
        assert_eq!(bernoulli(0), q(1, 1));
        assert_eq!(bernoulli(1), q(-1, 2));
        assert_eq!(bernoulli(2), q(1, 6));
        assert_eq!(bernoulli(4), q(-1, 30));
        assert_eq!(bernoulli(6), q(1, 42));
        assert_eq!(bernoulli(8), q(-1, 30));
        assert_eq!(bernoulli(10), q(5, 66));
        assert_eq!(bernoulli(12), q(-691, 2730));
    }

    #[test]
    fn odd_indices_vanish() {
        for n in [3u64, 5, 7, 99, 1001] {
            assert!(bernoulli(n).is_zero(), "B_{n} should be zero");
        }
    }

    #[test]
    fn tangent_path_matches_triangle() {
        for even in [2u64, 4, 10, 12, 30] {
            assert_eq!(
                tangent_bernoulli(even),
                bernoulli(even),
                "mismatch at B_{even}"
            );
        }
    }

    #[test]
    fn large_even_index() {
        // B_66 numerator and denominator parity sanity: sign alternates as
        // (−1)^{n+1} for B_{2n}, and the denominator is squarefree (von
        // Staudt–Clausen), so 4 must not divide it.
        let b66 = bernoulli(66);
        assert!(b66.numer() > &BigInt::zero());
        assert!((b66.denom() % BigInt::from(4)) != BigInt::zero());
        // denominator from von Staudt–Clausen: Π p for (p−1) | 66
        assert_eq!(b66.denom(), &BigInt::from(2 * 3 * 7 * 23 * 67));
    }

    #[test]
    fn float_conversion() {
        let b2 = bernoulli_float(2, 10, Precision::digits(20)).unwrap();
        let want = Float::parse("0.16666666666666666667", 10, Precision::digits(20)).unwrap();
        assert_eq!(b2, want);
        assert_eq!(
            bernoulli_float(2, 10, Precision::EXACT),
            Err(crate::error::Error::InfiniteExpansion)
        );
    }
}
