//! Error functions.
//!
//! Small arguments use the confluent representation
//! `erf z = 2z/√π·₁F₁(½; 3/2; −z²)`; large real arguments switch to the
//! incomplete-gamma complement `erfc x = Γ(½, x²)/√π`, which has no
//! cancellation where `1 − erf x` would shed every digit. Complex
//! arguments stay on the confluent form with the margin widened by the
//! growth of `e^{|z|²}`.

use crate::constants;
use crate::contfrac::gamma_upper;
use crate::elementary::sqrt_f;
use crate::error::Result;
use crate::hyper::hypergeometric_1f1;
use crate::number::{Complex, Float};
use crate::precision::{ensure, ensure_complex, Context, Precision};

/// Extra digits the confluent form needs for an argument of modulus `m`:
/// intermediate terms reach `e^{m²}` before settling.
fn growth_digits(z: &Complex, radix: u32) -> u64 {
    let m = z.norm_sqr().to_f64();
    if m <= 1.0 {
        return 0;
    }
    (2.0 * m / (radix as f64).ln()).ceil().min(100_000.0) as u64
}

fn confluent(z: &Complex, wp: Precision) -> Result<Complex> {
    let radix = z.radix();
    let half = Float::rational(1, 2, radix, wp)?;
    let three_halves = Float::rational(3, 2, radix, wp)?;
    let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
    let inner = hypergeometric_1f1(
        &Complex::from_real(half),
        &Complex::from_real(three_halves),
        &zw.mul(&zw).neg(),
        wp,
    )?;
    let root_pi = sqrt_f(&constants::pi(radix, wp)?, wp)?;
    zw.mul(&inner)
        .mul_real(&Float::with_radix(2, radix))
        .divide_real(&root_pi)
}

/// The error function of a complex argument.
pub fn erf(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_zero() {
        return Ok(Complex::zero(radix));
    }
    if z.is_real() {
        return erf_f(z.re(), target).map(Complex::from_real);
    }
    let wp = Context::new(target, radix)
        .working()
        .extend(growth_digits(z, radix));
    Ok(confluent(z, wp)?.rounded(target))
}

/// The complementary error function of a complex argument. Real inputs
/// route through [`erfc_f`]; elsewhere the subtraction from 1 costs the
/// digits the margin widening already paid for.
pub fn erfc(z: &Complex, target: Precision) -> Result<Complex> {
    let radix = z.radix();
    if z.is_real() {
        return erfc_f(z.re(), target).map(Complex::from_real);
    }
    let wp = Context::new(target, radix)
        .working()
        .extend(growth_digits(z, radix))
        .extend(5);
    let one = Complex::one(radix).with_precision(wp);
    Ok(one.sub(&confluent(z, wp)?).rounded(target))
}

/// The real error function.
pub fn erf_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::zero(radix));
    }
    if x.signum() < 0 {
        return erf_f(&x.neg(), target).map(|v| v.neg());
    }
    let wp = Context::new(target, radix).working().extend(5);
    if x.sub(&Float::one(radix)).signum() <= 0 {
        return Ok(confluent(&Complex::from_real(x.clone()), wp)?
            .re()
            .rounded(target));
    }
    // beyond 1 the value hugs its limit; compute the small complement
    let one = Float::one(radix).with_precision(wp);
    Ok((&one - &erfc_f(x, wp)?).rounded(target))
}

/// The real complementary error function, safe for large arguments:
/// `erfc x = Γ(½, x²)/√π` keeps full relative precision where `1 − erf x`
/// would cancel to noise.
pub fn erfc_f(x: &Float, target: Precision) -> Result<Float> {
    let radix = x.radix();
    if x.is_zero() {
        return Ok(Float::one(radix).rounded(target));
    }
    let wp = Context::new(target, radix).working().extend(5);
    if x.signum() < 0 {
        let two = Float::with_radix(2, radix).with_precision(wp);
        return Ok((&two - &erfc_f(&x.neg(), wp)?).rounded(target));
    }
    if x.sub(&Float::one(radix)).signum() < 0 {
        let one = Float::one(radix).with_precision(wp);
        let via_erf = confluent(&Complex::from_real(x.clone()), wp)?;
        return Ok((&one - via_erf.re()).rounded(target));
    }
    let xw = ensure(&x.rounded(wp.min(x.precision())), wp);
    let half = Float::rational(1, 2, radix, wp)?;
    let upper = gamma_upper(&half, &(&xw * &xw), wp)?;
    let root_pi = sqrt_f(&constants::pi(radix, wp)?, wp)?;
    upper.divide(&root_pi).map(|v| v.rounded(target))
}
