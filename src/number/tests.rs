use super::*;
use crate::error::Error;
use crate::precision::Precision;

fn f(s: &str, p: u64) -> Float {
    Float::parse(s, 10, Precision::digits(p)).unwrap()
}

fn exact(s: &str) -> Float {
    Float::parse(s, 10, Precision::EXACT).unwrap()
}

// =====================================================================
// construction, scale, parsing
// =====================================================================

#[test]
fn scale_convention() {
    assert_eq!(Float::with_radix(7, 10).scale(), 1);
    assert_eq!(exact("123.25").scale(), 3);
    assert_eq!(exact("0.5").scale(), 0);
    assert_eq!(exact("0.005").scale(), -2);
    assert_eq!(exact("1e500").scale(), 501);
    assert_eq!(Float::zero(10).scale(), 0);
}

#[test]
fn zero_is_exact() {
    let z = Float::zero(10);
    assert!(z.is_zero());
    assert!(z.precision().is_exact());
    assert!(z.is_integer());
}

#[test]
fn parse_round_trips_through_display() {
    let x = exact("-123.25");
    assert_eq!(x.to_string(), "-1.2325e2");
    assert_eq!(exact("0.005").to_string(), "5e-3");
    assert_eq!(Float::zero(10).to_string(), "0");
}

#[test]
fn parse_rejects_garbage() {
    assert_eq!(Float::parse("", 10, Precision::EXACT), Err(Error::Parse));
    assert_eq!(Float::parse("1.2.3", 10, Precision::EXACT), Err(Error::Parse));
    assert_eq!(Float::parse("xyz", 10, Precision::EXACT), Err(Error::Parse));
}

#[test]
fn parse_other_radix() {
    // ff in base 16 is 255; scale is 2 hex digits
    let x = Float::parse("ff", 16, Precision::EXACT).unwrap();
    assert_eq!(x, Float::with_radix(255, 16));
    assert_eq!(x.scale(), 2);
}

#[test]
fn integer_detection() {
    assert!(exact("42").is_integer());
    assert!(exact("4.2e1").is_integer());
    assert!(!exact("4.25").is_integer());
    assert!(exact("-17").is_integer());
}

// =====================================================================
// arithmetic and precision propagation
// =====================================================================

#[test]
fn exact_plus_exact_stays_exact() {
    let s = &exact("1") + &exact("0.00001");
    assert!(s.precision().is_exact());
    assert_eq!(s, exact("1.00001"));
}

#[test]
fn cancellation_shrinks_precision() {
    // 1.00001 (10 digits) - 1 (exact): five leading digits cancel
    let a = f("1.00001", 10);
    let d = &a - &Float::one(10);
    assert_eq!(d, exact("0.00001"));
    assert_eq!(d.precision(), Precision::digits(5));
}

#[test]
fn insignificant_operand_is_dropped() {
    // 1e-100 contributes nothing against 1.0 at 20 digits
    let big = Float::one(10).with_precision(Precision::digits(20));
    let tiny = f("1e-100", 20);
    assert_eq!(&big + &tiny, Float::one(10));
}

#[test]
fn mul_takes_min_precision() {
    let a = f("1.5", 30);
    let b = f("2.5", 10);
    let p = (&a * &b).precision();
    assert_eq!(p, Precision::digits(10));
    assert_eq!(&a * &b, exact("3.75"));
}

#[test]
fn divide_inverse_of_mul() {
    let x = f("0.123456789", 25);
    let three = Float::with_radix(3, 10);
    let q = x.divide(&three).unwrap();
    let back = &q * &three;
    let err = (&back - &x).abs();
    assert!(err <= x.ulp(), "residual {err} above one ulp");
}

#[test]
fn exact_division_terminating() {
    let q = Float::one(10).divide(&Float::with_radix(4, 10)).unwrap();
    assert!(q.precision().is_exact());
    assert_eq!(q, exact("0.25"));
}

#[test]
fn exact_division_non_terminating_errors() {
    let r = Float::one(10).divide(&Float::with_radix(3, 10));
    assert_eq!(r, Err(Error::InfiniteExpansion));
    // ...but the same quotient terminates in base 12
    let r12 = Float::one(12).divide(&Float::with_radix(3, 12)).unwrap();
    assert!(r12.precision().is_exact());
}

#[test]
fn division_by_zero() {
    let r = Float::one(10).divide(&Float::zero(10));
    assert_eq!(r, Err(Error::DivisionByZero));
}

#[test]
fn rounding_half_away_from_zero() {
    assert_eq!(exact("1235").rounded(Precision::digits(3)), exact("1240"));
    assert_eq!(exact("1234").rounded(Precision::digits(3)), exact("1230"));
    assert_eq!(exact("-1235").rounded(Precision::digits(3)), exact("-1240"));
}

#[test]
fn floor_behaviour() {
    assert_eq!(exact("3.7").floor(), exact("3"));
    assert_eq!(exact("-3.7").floor(), exact("-4"));
    assert_eq!(exact("5").floor(), exact("5"));
}

#[test]
fn ulp_position() {
    let x = f("123.25", 5);
    assert_eq!(x.ulp(), exact("0.01"));
}

#[test]
fn comparisons() {
    assert!(exact("2") > exact("1.99999"));
    assert!(exact("-2") < exact("1"));
    assert!(exact("-2") < exact("-1"));
    assert_eq!(exact("1e3"), exact("1000"));
    // Cross-radix comparison is undefined, not panicking
    assert!(Float::one(10).partial_cmp(&Float::one(16)).is_none());
}

// =====================================================================
// double conversions (seeding)
// =====================================================================

#[test]
fn from_f64_exact_dyadic() {
    assert_eq!(Float::from_f64(0.5, 10), exact("0.5"));
    assert_eq!(Float::from_f64(-3.0, 10), exact("-3"));
    assert_eq!(Float::from_f64(0.0, 10), Float::zero(10));
}

#[test]
fn f64_round_trip() {
    for &x in &[1234.5678_f64, -0.001953125, 6.02e23, 1.6e-19] {
        let back = Float::from_f64(x, 10).to_f64();
        assert!(
            ((back - x) / x).abs() < 1e-12,
            "round trip {x} -> {back}"
        );
    }
}

#[test]
fn to_f64_parts_huge_scale_no_overflow() {
    let x = exact("1e500");
    let (m, s) = x.to_f64_parts();
    assert_eq!(s, 501);
    assert!((m - 0.1).abs() < 1e-15);
    assert!(x.to_f64().is_infinite());
    assert_eq!(exact("1e-5000").to_f64(), 0.0);
}

// =====================================================================
// complex pairs
// =====================================================================

#[test]
fn complex_norm_and_conj() {
    let z = Complex::new(Float::with_radix(3, 10), Float::with_radix(4, 10));
    assert_eq!(z.norm_sqr(), Float::with_radix(25, 10));
    assert_eq!(z.conj().im(), &Float::with_radix(-4, 10));
    assert_eq!(z.scale(), 1);
}

#[test]
fn complex_mul_conjugate_is_norm() {
    let z = Complex::new(f("3", 20), f("4", 20));
    let w = z.mul(&z.conj());
    assert!(w.im().is_zero());
    assert_eq!(w.re(), &Float::with_radix(25, 10));
}

#[test]
fn complex_divide_round_trip() {
    let z = Complex::new(f("1.5", 25), f("-2.25", 25));
    let w = Complex::new(f("0.75", 25), f("4", 25));
    let q = z.divide(&w).unwrap();
    let back = q.mul(&w);
    let err = back.sub(&z).norm_sqr();
    assert!(err < exact("1e-40"));
}

#[test]
fn complex_mul_i_rotates() {
    let z = Complex::new(Float::one(10), Float::with_radix(2, 10));
    let zi = z.mul_i();
    assert_eq!(zi.re(), &Float::with_radix(-2, 10));
    assert_eq!(zi.im(), &Float::one(10));
    assert_eq!(zi.div_i(), z);
}

#[test]
fn complex_structural_queries() {
    assert!(Complex::with_radix(5, 10).is_integer());
    assert!(Complex::with_radix(5, 10).is_real());
    assert!(!Complex::i(10).is_real());
    assert!(Complex::zero(10).is_zero());
}
