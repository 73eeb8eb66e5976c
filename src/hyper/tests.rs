use super::*;
use crate::elementary::{cos_f, exp_f, ln};
use crate::error::Error;
use crate::number::{Complex, Float};
use crate::precision::Precision;

fn p(n: u64) -> Precision {
    Precision::digits(n)
}

fn f(s: &str, n: u64) -> Float {
    Float::parse(s, 10, p(n)).unwrap()
}

fn cx(n: i64) -> Complex {
    Complex::with_radix(n, 10)
}

/// `₂F₁(1,1;2;z) = −ln(1−z)/z`, the workhorse reference.
fn log_form(z: &Complex, digits: u64) -> Complex {
    let one = Complex::one(10).with_precision(p(digits));
    ln(&one.sub(z), p(digits))
        .unwrap()
        .neg()
        .divide(z)
        .unwrap()
}

// =====================================================================
// confluent functions
// =====================================================================

#[test]
fn zero_f_one_matches_cosine() {
    // cos x = ₀F₁(; 1/2; −x²/4)
    let z = Complex::from_real(f("-0.25", 40));
    let got = hypergeometric_0f1(&Complex::from_real(f("0.5", 40)), &z, p(30)).unwrap();
    let want = cos_f(&Float::one(10).with_precision(p(40)), p(30)).unwrap();
    let err = (got.re() - &want).abs();
    assert!(err < f("1e-28", 5), "off by {err}");
}

#[test]
fn kummer_transform_avoids_cancellation() {
    // ₁F₁(1; 2; z) = (eᶻ − 1)/z at z = −30
    let z = cx(-30);
    let got = hypergeometric_1f1(&Complex::one(10), &cx(2), &z, p(30)).unwrap();
    let ez = exp_f(&Float::with_radix(-30, 10), p(45)).unwrap();
    let want = (&ez - &Float::one(10))
        .divide(&Float::with_radix(-30, 10))
        .unwrap();
    let err = (got.re() - &want).abs();
    assert!(err < f("1e-28", 5).mul(&want.abs()), "off by {err}");
}

#[test]
fn two_f_zero_reports_achieved_digits() {
    let z = Complex::from_real(f("-0.05", 30));
    let (got, achieved) =
        hypergeometric_2f0(&Complex::one(10), &Complex::one(10), &z, p(40)).unwrap();
    // Σ (−1)ᵏ k!·(1)ₖ/20ᵏ... truncation can only deliver a few digits
    let digits = achieved.count();
    assert!((4..=20).contains(&digits), "achieved {digits}");
    let approx = got.re().to_f64();
    assert!((approx - 0.9543).abs() < 1e-3, "got {approx}");
}

// =====================================================================
// Gauss 2F1: short circuits
// =====================================================================

#[test]
fn terminating_polynomial_any_argument() {
    // ₂F₁(−3, 2; 1; 2) = 1 − 12 + 36 − 32 = −7
    let got = gauss_2f1(&cx(-3), &cx(2), &cx(1), &cx(2), p(25)).unwrap();
    let err = (got.re() - &Float::with_radix(-7, 10)).abs();
    assert!(err < f("1e-23", 5), "off by {err}");
}

#[test]
fn gauss_summation_at_one() {
    // ₂F₁(1, 2; 4; 1) = Γ(4)Γ(1)/(Γ(3)Γ(2)) = 3
    let got = gauss_2f1(&cx(1), &cx(2), &cx(4), &cx(1), p(25)).unwrap();
    let err = (got.re() - &Float::with_radix(3, 10)).abs();
    assert!(err < f("1e-23", 5), "off by {err}");
}

#[test]
fn divergent_at_one() {
    // Re(c−a−b) = 0: the series has no sum at z = 1
    assert_eq!(
        gauss_2f1(&cx(1), &cx(1), &cx(2), &cx(1), p(20)),
        Err(Error::Divergent)
    );
}

#[test]
fn unshielded_denominator_pole() {
    assert_eq!(
        gauss_2f1(
            &Complex::from_real(f("0.5", 30)),
            &cx(2),
            &cx(-1),
            &Complex::from_real(f("0.25", 30)),
            p(20)
        ),
        Err(Error::GammaPole)
    );
}

// =====================================================================
// Gauss 2F1: transformation selection
// =====================================================================

#[test]
fn direct_series_region() {
    let z = Complex::from_real(f("0.5", 45));
    let got = gauss_2f1(&cx(1), &cx(1), &cx(2), &z, p(30)).unwrap();
    let want = log_form(&z, 45);
    let err = (got.re() - want.re()).abs();
    assert!(err < f("1e-28", 5), "off by {err}");
}

#[test]
fn inverse_map_with_integer_difference() {
    // z = −3 selects the 1/z map; a − b = 0 forces the nudge
    let z = cx(-3);
    let got = gauss_2f1(&cx(1), &cx(1), &cx(2), &z, p(30)).unwrap();
    let want = log_form(&z.with_precision(p(50)), 50);
    let err = (got.re() - want.re()).abs();
    assert!(err < f("1e-27", 5), "off by {err}");
    assert!(got.im().is_zero() || got.im().scale() < -25);
}

#[test]
fn one_minus_map_near_unity() {
    // z = 0.9 selects the 1−z map; c − a − b = 0 forces the nudge
    let z = Complex::from_real(f("0.9", 50));
    let got = gauss_2f1(&cx(1), &cx(1), &cx(2), &z, p(30)).unwrap();
    let want = log_form(&z, 50);
    let err = (got.re() - want.re()).abs();
    assert!(err < f("1e-27", 5), "off by {err}");
}

#[test]
fn generic_two_term_connection() {
    // non-integer differences, 1/(1−z) map territory: z = −4,
    // F(1/2, 1/3; 5/4; −4) against the direct (slow) Euler integral proxy:
    // use the Pfaff map identity as an independent cross-check.
    let a = Complex::from_real(f("0.5", 45));
    let b = Complex::from_real(Float::rational(1, 3, 10, p(45)).unwrap());
    let c = Complex::from_real(f("1.25", 45));
    let z = cx(-4);
    let got = gauss_2f1(&a, &b, &c, &z, p(30)).unwrap();
    // Pfaff: (1−z)^{−a} F(a, c−b; c; z/(z−1)); z/(z−1) = 4/5 converges directly
    let one = Complex::one(10).with_precision(p(45));
    let w = z.with_precision(p(45)).divide(&z.sub(&one)).unwrap();
    let inner = gauss_2f1(&a, &c.sub(&b), &c, &w, p(38)).unwrap();
    let front = crate::elementary::pow(&one.sub(&z), &a.neg(), p(38)).unwrap();
    let want = front.mul(&inner);
    let err = (got.re() - want.re()).abs();
    assert!(err < f("1e-27", 5), "off by {err}");
}

// =====================================================================
// Gauss 2F1: ODE continuation
// =====================================================================

#[test]
fn continuation_off_axis() {
    // every map leaves the modulus near 1 at z = 0.5 + 0.8i
    let z = Complex::new(f("0.5", 45), f("0.8", 45));
    let got = gauss_2f1(&cx(1), &cx(1), &cx(2), &z, p(30)).unwrap();
    let want = log_form(&z, 45);
    let re_err = (got.re() - want.re()).abs();
    let im_err = (got.im() - want.im()).abs();
    assert!(re_err < f("1e-27", 5), "re off by {re_err}");
    assert!(im_err < f("1e-27", 5), "im off by {im_err}");
}

#[test]
fn continuation_crosses_above_the_cut() {
    // real z > 1: the detour above the singularity gives the limit from
    // above, so Im F(1,1;2;z) = −π/z ... for −ln(1−z)/z with the
    // principal branch approached from above, ln(1−z) = ln(z−1) − iπ,
    // hence Im got = π/z > 0.
    let z = cx(3);
    let got = gauss_2f1(&cx(1), &cx(1), &cx(2), &z, p(25)).unwrap();
    let pi = crate::constants::pi(10, p(35)).unwrap();
    let want_im = pi.divide(&Float::with_radix(3, 10)).unwrap();
    let im_err = (got.im() - &want_im).abs();
    assert!(im_err < f("1e-22", 5), "im off by {im_err}");
    // Re = −ln 2 / 3
    let want_re = crate::elementary::ln_f(&Float::with_radix(2, 10), p(35))
        .unwrap()
        .divide(&Float::with_radix(-3, 10))
        .unwrap();
    let re_err = (got.re() - &want_re).abs();
    assert!(re_err < f("1e-22", 5), "re off by {re_err}");
}
