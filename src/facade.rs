//! A fixed-precision front door.
//!
//! The engines take a target precision per call and may return more
//! context-dependent accuracy than asked. [`FixedPrecision`] pins one
//! output precision and one radix for a whole session: every entry point
//! widens its internal target by the function's own sensitivity — trig
//! pays for argument reduction, the gamma family for pole proximity, erf
//! for its flat tail — and the result always comes back carrying exactly
//! the configured digit count.

use crate::elementary;
use crate::error::{Error, Result};
use crate::functions;
use crate::number::{Complex, Float};
use crate::precision::{Precision, EXTRA_PRECISION};
use crate::zeta;

/// Evaluation session with a fixed output precision and radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrecision {
    precision: u64,
    radix: u32,
}

/// Digits by which a trig argument's magnitude inflates the reduction.
fn argument_digits(x: &Float) -> u64 {
    if x.is_zero() {
        0
    } else {
        x.scale().max(0) as u64
    }
}

/// Digits of proximity to the nearest non-positive integer, the
/// gamma family's sensitivity.
fn pole_digits(x: &Float) -> u64 {
    if x.signum() > 0 && (x - &Float::one(x.radix())).signum() >= 0 {
        return 0;
    }
    let frac = x.sub(&Float::from_bigint(x.to_bigint_rounded(), x.radix()));
    if frac.is_zero() {
        0
    } else {
        (-frac.scale()).max(0) as u64
    }
}

impl FixedPrecision {
    /// A session producing `precision`-digit results in `radix`.
    pub fn new(precision: u64, radix: u32) -> Self {
        Self { precision, radix }
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn radix(&self) -> u32 {
        self.radix
    }

    fn out(&self) -> Precision {
        Precision::digits(self.precision)
    }

    fn check(&self, x: &Float) -> Result<()> {
        if x.radix() != self.radix {
            return Err(Error::RadixMismatch(self.radix, x.radix()));
        }
        Ok(())
    }

    /// Parse a literal in the session radix at the session precision.
    pub fn parse(&self, s: &str) -> Result<Float> {
        Float::parse(s, self.radix, self.out())
    }

    // ---- elementary ----------------------------------------------------

    pub fn exp(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(argument_digits(x));
        Ok(elementary::exp_f(x, t)?.rounded(self.out()))
    }

    pub fn ln(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        Ok(elementary::ln_f(x, self.out())?.rounded(self.out()))
    }

    pub fn sqrt(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        Ok(elementary::sqrt_f(x, self.out())?.rounded(self.out()))
    }

    pub fn sin(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(argument_digits(x));
        Ok(elementary::sin_f(x, t)?.rounded(self.out()))
    }

    pub fn cos(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(argument_digits(x));
        Ok(elementary::cos_f(x, t)?.rounded(self.out()))
    }

    pub fn tan(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(argument_digits(x));
        Ok(elementary::tan_f(x, t)?.rounded(self.out()))
    }

    pub fn pow(&self, base: &Float, exponent: &Float) -> Result<Float> {
        self.check(base)?;
        self.check(exponent)?;
        let t = self.out().extend(argument_digits(exponent));
        let v = elementary::pow(
            &Complex::from_real(base.clone()),
            &Complex::from_real(exponent.clone()),
            t,
        )?;
        if !v.is_real() {
            return Err(Error::Domain);
        }
        Ok(v.re().rounded(self.out()))
    }

    // ---- gamma family --------------------------------------------------

    pub fn gamma(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(pole_digits(x));
        Ok(functions::gamma_f(x, t)?.rounded(self.out()))
    }

    pub fn log_gamma(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(pole_digits(x));
        let v = functions::log_gamma(&Complex::from_real(x.clone()), t)?;
        if !v.is_real() {
            return Err(Error::Domain);
        }
        Ok(v.re().rounded(self.out()))
    }

    pub fn digamma(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = self.out().extend(pole_digits(x));
        Ok(functions::digamma(&Complex::from_real(x.clone()), t)?
            .re()
            .rounded(self.out()))
    }

    pub fn beta(&self, a: &Float, b: &Float) -> Result<Float> {
        self.check(a)?;
        self.check(b)?;
        let t = self.out().extend(pole_digits(a)).extend(pole_digits(b));
        Ok(functions::beta(
            &Complex::from_real(a.clone()),
            &Complex::from_real(b.clone()),
            t,
        )?
        .re()
        .rounded(self.out()))
    }

    // ---- error functions -----------------------------------------------

    pub fn erf(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = if x.scale() > 0 {
            self.out().extend(2 * EXTRA_PRECISION)
        } else {
            self.out()
        };
        Ok(functions::erf_f(x, t)?.rounded(self.out()))
    }

    pub fn erfc(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        let t = if x.scale() > 0 {
            self.out().extend(2 * EXTRA_PRECISION)
        } else {
            self.out()
        };
        Ok(functions::erfc_f(x, t)?.rounded(self.out()))
    }

    // ---- zeta ----------------------------------------------------------

    pub fn zeta(&self, s: &Float) -> Result<Float> {
        self.check(s)?;
        Ok(zeta::riemann_zeta(&Complex::from_real(s.clone()), self.out())?
            .re()
            .rounded(self.out()))
    }

    pub fn hurwitz_zeta(&self, s: &Float, a: &Float) -> Result<Float> {
        self.check(s)?;
        self.check(a)?;
        Ok(zeta::hurwitz_zeta(
            &Complex::from_real(s.clone()),
            &Complex::from_real(a.clone()),
            self.out(),
        )?
        .re()
        .rounded(self.out()))
    }

    // ---- Bessel and elliptic -------------------------------------------

    pub fn besselj(&self, nu: &Float, x: &Float) -> Result<Float> {
        self.check(nu)?;
        self.check(x)?;
        Ok(functions::besselj(nu, x, self.out())?.rounded(self.out()))
    }

    pub fn bessely(&self, nu: &Float, x: &Float) -> Result<Float> {
        self.check(nu)?;
        self.check(x)?;
        Ok(functions::bessely(nu, x, self.out())?.rounded(self.out()))
    }

    pub fn besseli(&self, nu: &Float, x: &Float) -> Result<Float> {
        self.check(nu)?;
        self.check(x)?;
        Ok(functions::besseli(nu, x, self.out())?.rounded(self.out()))
    }

    pub fn besselk(&self, nu: &Float, x: &Float) -> Result<Float> {
        self.check(nu)?;
        self.check(x)?;
        Ok(functions::besselk(nu, x, self.out())?.rounded(self.out()))
    }

    pub fn elliptic_k(&self, m: &Float) -> Result<Float> {
        self.check(m)?;
        Ok(functions::elliptic_k(m, self.out())?.rounded(self.out()))
    }

    pub fn elliptic_e(&self, m: &Float) -> Result<Float> {
        self.check(m)?;
        Ok(functions::elliptic_e(m, self.out())?.rounded(self.out()))
    }

    pub fn lambert_w(&self, x: &Float) -> Result<Float> {
        self.check(x)?;
        Ok(functions::lambert_w(x, self.out())?.rounded(self.out()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    #[test]
    fn output_carries_exactly_the_configured_precision() {
        let fp = FixedPrecision::new(25, 10);
        let x = fp.parse("1.5").unwrap();
        for v in [
            fp.exp(&x).unwrap(),
            fp.gamma(&x).unwrap(),
            fp.erf(&x).unwrap(),
            fp.besselj(&Float::zero(10), &x).unwrap(),
        ] {
            assert_eq!(v.precision(), Precision::digits(25));
        }
    }

    #[test]
    fn trig_of_large_argument_keeps_digits() {
        let fp = FixedPrecision::new(30, 10);
        // sin(10⁶) needs the reduction to carry the argument's 7 digits
        let x = fp.parse("1000000").unwrap();
        let got = fp.sin(&x).unwrap();
        assert!((got.to_f64() - (-0.349_993_502_171_292_2)).abs() < 1e-12);
    }

    #[test]
    fn gamma_near_a_pole_keeps_digits() {
        let fp = FixedPrecision::new(20, 10);
        // Γ(−3 + 10⁻⁸) ≈ −1/(6·10⁻⁸); the pole proximity is paid internally
        let x = Float::parse("-2.99999999", 10, Precision::digits(30)).unwrap();
        let got = fp.gamma(&x).unwrap();
        assert_eq!(got.precision(), Precision::digits(20));
        assert!(got.signum() < 0);
        assert!(got.scale() >= 7, "|Γ| should be ~1.7e7, got {got}");
    }

    #[test]
    fn zeta_two_matches_pi_squared_over_six() {
        let fp = FixedPrecision::new(25, 10);
        let got = fp.zeta(&fp.parse("2").unwrap()).unwrap();
        let pi = constants::pi(10, Precision::digits(35)).unwrap();
        let want = (&pi * &pi).divide(&Float::with_radix(6, 10)).unwrap();
        let err = (&got - &want.rounded(Precision::digits(25))).abs();
        assert!(err <= got.ulp().mul(&Float::with_radix(3, 10)), "off by {err}");
    }

    #[test]
    fn mismatched_radix_is_rejected() {
        let fp = FixedPrecision::new(20, 10);
        assert_eq!(
            fp.exp(&Float::one(16)),
            Err(Error::RadixMismatch(10, 16))
        );
    }
}
