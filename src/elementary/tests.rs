use super::*;
use crate::constants;
use crate::error::Error;
use crate::number::{Complex, Float};
use crate::precision::Precision;

fn p(n: u64) -> Precision {
    Precision::digits(n)
}

fn f(s: &str, n: u64) -> Float {
    Float::parse(s, 10, p(n)).unwrap()
}

fn close(a: &Float, b: &Float, tol: &str) {
    let err = (a - b).abs();
    let bound = Float::parse(tol, 10, Precision::EXACT).unwrap();
    assert!(err < bound, "|{a} - {b}| = {err} >= {tol}");
}

// =====================================================================
// roots
// =====================================================================

#[test]
fn sqrt_two_reference() {
    let want = f("1.414213562373095048801688724209698078570", 40);
    let got = sqrt_f(&Float::with_radix(2, 10), p(40)).unwrap();
    close(&got, &want, "1e-38");
}

#[test]
fn cube_root_of_eight() {
    let got = root_f(&Float::with_radix(8, 10), 3, p(30)).unwrap();
    close(&got, &Float::with_radix(2, 10), "1e-28");
}

#[test]
fn sqrt_squares_back() {
    let x = f("123.456", 35);
    let r = sqrt_f(&x, p(30)).unwrap();
    close(&(&r * &r), &x, "1e-26");
}

#[test]
fn sqrt_huge_scale() {
    let x = f("1e500", 30);
    let r = sqrt_f(&x, p(20)).unwrap();
    assert_eq!(r.scale(), 251);
    close(&r, &f("1e250", 30), "1e232");
}

#[test]
fn sqrt_of_minus_one_is_i() {
    let z = Complex::with_radix(-1, 10).with_precision(p(30));
    let r = sqrt(&z, p(25)).unwrap();
    assert!(r.re().is_zero() || r.re().scale() < -20);
    close(r.im(), &Float::one(10), "1e-23");
}

#[test]
fn root_error_cases() {
    let z = Complex::one(10);
    assert_eq!(root(&z, 0, 0, p(10)), Err(Error::ZerothRoot));
    assert_eq!(
        inv_root(&Complex::zero(10), 2, 0, p(10)),
        Err(Error::InverseRootOfZero)
    );
    assert_eq!(
        root_f(&Float::with_radix(-4, 10), 2, p(10)),
        Err(Error::Domain)
    );
}

#[test]
fn root_branch_rotation() {
    // second branch of the square root is the negated principal one
    let z = Complex::with_radix(9, 10).with_precision(p(30));
    let principal = root(&z, 2, 0, p(25)).unwrap();
    let other = root(&z, 2, 1, p(25)).unwrap();
    close(principal.re(), &Float::with_radix(3, 10), "1e-23");
    close(other.re(), &Float::with_radix(-3, 10), "1e-23");
}

// =====================================================================
// exp / ln / pow
// =====================================================================

#[test]
fn exp_zero_and_e() {
    assert_eq!(exp_f(&Float::zero(10), p(30)).unwrap(), Float::one(10));
    let got = exp_f(&Float::one(10).with_precision(p(45)), p(40)).unwrap();
    let want = constants::e(10, p(40)).unwrap();
    close(&got, &want, "1e-38");
}

#[test]
fn ln_of_e_is_one() {
    let e = constants::e(10, p(45)).unwrap();
    let got = ln_f(&e, p(40)).unwrap();
    close(&got, &Float::one(10), "1e-38");
}

#[test]
fn ln_near_one_keeps_relative_digits() {
    let d = f("1e-20", 40);
    let x = &Float::one(10) + &d;
    let got = ln_f(&x, p(30)).unwrap();
    // ln(1+d) = d - d²/2 + ... ; the d²/2 term sits at 5e-41
    close(&got, &d, "1e-40");
}

#[test]
fn exp_ln_round_trip_complex() {
    let z = Complex::new(f("3", 35), f("4", 35));
    let back = exp(&ln(&z, p(30)).unwrap(), p(28)).unwrap();
    let err = back.sub(&z).norm_sqr();
    assert!(err < f("1e-50", 5), "round trip error {err}");
}

#[test]
fn ln_branch_on_negative_axis() {
    let z = Complex::with_radix(-1, 10).with_precision(p(30));
    let l = ln(&z, p(25)).unwrap();
    assert!(l.re().is_zero() || l.re().scale() < -20);
    let pi = constants::pi(10, p(25)).unwrap();
    close(l.im(), &pi, "1e-23");
}

#[test]
fn exp_overflow_rejected() {
    let huge = f("1e30", 10);
    assert_eq!(exp_f(&huge, p(20)), Err(Error::Overflow));
}

#[test]
fn ln_error_cases() {
    assert_eq!(ln_f(&Float::zero(10), p(10)), Err(Error::LogOfZero));
    assert_eq!(ln_f(&Float::with_radix(-2, 10), p(10)), Err(Error::Domain));
    assert!(ln_f(&Float::one(10), p(10)).unwrap().is_zero());
}

#[test]
fn pow_short_circuits() {
    let zero = Complex::zero(10);
    let two = Complex::with_radix(2, 10).with_precision(p(30));
    assert_eq!(pow(&zero, &zero, p(10)), Err(Error::ZeroToZero));
    assert_eq!(
        pow(&zero, &Complex::with_radix(-1, 10), p(10)),
        Err(Error::DivisionByZero)
    );
    assert!(pow(&zero, &two, p(10)).unwrap().is_zero());
    assert_eq!(
        pow(&two, &Complex::zero(10), p(10)).unwrap(),
        Complex::one(10)
    );
}

#[test]
fn pow_integer_exponent() {
    let two = Complex::with_radix(2, 10).with_precision(p(30));
    let ten = Complex::with_radix(10, 10);
    let got = pow(&two, &ten, p(25)).unwrap();
    close(got.re(), &Float::with_radix(1024, 10), "1e-20");
    let inv = powi(&two, -3, p(25)).unwrap();
    close(inv.re(), &f("0.125", 30), "1e-22");
}

#[test]
fn pow_half_is_sqrt() {
    let four = Complex::with_radix(4, 10).with_precision(p(35));
    let half = Complex::from_real(f("0.5", 35));
    let got = pow(&four, &half, p(30)).unwrap();
    close(got.re(), &Float::with_radix(2, 10), "1e-27");
}

// =====================================================================
// circular and hyperbolic
// =====================================================================

#[test]
fn sin_of_pi_sixth() {
    let pi = constants::pi(10, p(40)).unwrap();
    let x = pi.divide(&Float::with_radix(6, 10)).unwrap();
    let got = sin_f(&x, p(30)).unwrap();
    close(&got, &f("0.5", 35), "1e-28");
}

#[test]
fn pythagorean_identity() {
    let x = f("1.7", 40);
    let s = sin_f(&x, p(30)).unwrap();
    let c = cos_f(&x, p(30)).unwrap();
    let sum = &(&s * &s) + &(&c * &c);
    close(&sum, &Float::one(10), "1e-28");
}

#[test]
fn sin_near_pi_compensates() {
    // sin of a 60-digit π approximation is the (tiny) truncation residual
    let pi = constants::pi(10, p(60)).unwrap();
    let got = sin_f(&pi, p(20)).unwrap();
    assert!(got.is_zero() || got.scale() < -55, "got {got}");
}

#[test]
fn tan_consistent_with_quotient() {
    let x = f("1", 40);
    let t = tan_f(&x, p(30)).unwrap();
    let s = sin_f(&x, p(30)).unwrap();
    let c = cos_f(&x, p(30)).unwrap();
    close(&(&t * &c), &s, "1e-28");
}

#[test]
fn sin_on_imaginary_axis_is_sinh() {
    let iy = Complex::new(Float::zero(10), f("1", 35));
    let got = sin(&iy, p(30)).unwrap();
    assert!(got.re().is_zero() || got.re().scale() < -25);
    let want = sinh_f(&f("1", 35), p(30)).unwrap();
    close(got.im(), &want, "1e-27");
}

#[test]
fn hyperbolic_identity() {
    let x = f("0.8", 40);
    let s = sinh_f(&x, p(30)).unwrap();
    let c = cosh_f(&x, p(30)).unwrap();
    let diff = &(&c * &c) - &(&s * &s);
    close(&diff, &Float::one(10), "1e-27");
}

#[test]
fn tanh_saturates() {
    let got = tanh_f(&f("50", 30), p(20)).unwrap();
    close(&got, &Float::one(10), "1e-40");
}

// =====================================================================
// inverses
// =====================================================================

#[test]
fn atan_one_is_quarter_pi() {
    let got = atan(&Complex::one(10).with_precision(p(40)), p(30)).unwrap();
    let pi = constants::pi(10, p(35)).unwrap();
    let want = pi.divide(&Float::with_radix(4, 10)).unwrap();
    close(got.re(), &want, "1e-28");
}

#[test]
fn asin_half_is_pi_sixth() {
    let got = asin(&Complex::from_real(f("0.5", 40)), p(30)).unwrap();
    let pi = constants::pi(10, p(35)).unwrap();
    let want = pi.divide(&Float::with_radix(6, 10)).unwrap();
    close(got.re(), &want, "1e-28");
}

#[test]
fn asin_at_branch_point() {
    let got = asin(&Complex::one(10).with_precision(p(40)), p(30)).unwrap();
    let pi = constants::pi(10, p(35)).unwrap();
    let want = pi.divide(&Float::with_radix(2, 10)).unwrap();
    assert!(got.im().is_zero() || got.im().scale() < -25);
    close(got.re(), &want, "1e-28");
}

#[test]
fn inverse_branch_points_are_domain_errors() {
    assert_eq!(
        atan(&Complex::i(10).with_precision(p(20)), p(10)),
        Err(Error::Domain)
    );
    assert_eq!(
        atanh(&Complex::one(10).with_precision(p(20)), p(10)),
        Err(Error::Domain)
    );
}

#[test]
fn acosh_at_one_is_zero() {
    assert!(acosh(&Complex::one(10), p(20)).unwrap().is_zero());
}

#[test]
fn asinh_is_odd() {
    let two = Complex::with_radix(2, 10).with_precision(p(35));
    let plus = asinh(&two, p(30)).unwrap();
    let minus = asinh(&two.neg(), p(30)).unwrap();
    let err = plus.add(&minus).norm_sqr();
    assert!(err < f("1e-55", 5));
}

#[test]
fn arg_and_atan2() {
    let pi = constants::pi(10, p(30)).unwrap();
    let got = arg(&Complex::with_radix(-1, 10).with_precision(p(30)), p(25)).unwrap();
    close(&got, &pi, "1e-23");
    let diag = atan2(&f("1", 30), &f("1", 30), p(25)).unwrap();
    let want = pi.divide(&Float::with_radix(4, 10)).unwrap();
    close(&diag, &want, "1e-23");
    assert_eq!(arg(&Complex::zero(10), p(10)), Err(Error::Domain));
}
