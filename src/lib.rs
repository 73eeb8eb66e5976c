//! # apmath
//!
//! Arbitrary-precision evaluation of elementary and special functions —
//! gamma, zeta, hypergeometric, Bessel, elliptic and friends — to any
//! number of digits, in any radix from 2 to 36. Values carry their own
//! precision and radix; every algorithm widens its working precision by a
//! margin sized to its own error behavior, retries with escalation when
//! cancellation eats the margin, and rounds the result back to the digits
//! the caller asked for.
//!
//! ## Quick start
//!
//! ```
//! use apmath::{Float, Precision};
//! use apmath::elementary::sqrt_f;
//! use apmath::functions::gamma_f;
//!
//! // √2 to 50 decimal digits
//! let two = Float::with_radix(2, 10).with_precision(Precision::digits(50));
//! let root = sqrt_f(&two, Precision::digits(50)).unwrap();
//! assert!((root.to_f64() - 1.4142135623730951).abs() < 1e-15);
//!
//! // Γ(1/2) = √π
//! let half = Float::rational(1, 2, 10, Precision::digits(50)).unwrap();
//! let g = gamma_f(&half, Precision::digits(50)).unwrap();
//! assert!((g.to_f64() - 1.7724538509055160).abs() < 1e-15);
//! ```
//!
//! ## Modules
//!
//! - [`number`] — the [`Float`] and [`Complex`] substrate: a `BigInt`
//!   mantissa with an explicit scale, precision, and radix. Arithmetic,
//!   rounding, parsing, and f64 conversion for seeding iterations.
//!
//! - [`precision`] — the [`Precision`] value (with an EXACT sentinel) and
//!   the immutable [`Context`](precision::Context) carrying a target, a
//!   margin, and the escalation policy every retrying engine follows.
//!
//! - [`elementary`] — exp, log, powers, roots, and the circular and
//!   hyperbolic families, real and complex, built on argument reduction
//!   plus Taylor series and Newton refinement.
//!
//! - [`constants`] — memoized π, e, γ, and ln(radix), one concurrent
//!   computation per `(constant, radix, precision)` key.
//!
//! - [`agm`] — the arithmetic-geometric mean, real and complex, with the
//!   residual ladder the elliptic integrals reuse.
//!
//! - [`series`] / [`contfrac`] — the generic hypergeometric term-ratio
//!   summation engine (peak-scale cancellation tracking, escalating
//!   retries, divergence detection) and the modified-Lentz continued
//!   fraction engine behind the incomplete gamma functions.
//!
//! - [`bernoulli`] — Bernoulli numbers: a resumable Akiyama–Tanigawa
//!   recurrence for small indices, a tangent-series method for large even
//!   ones.
//!
//! - [`zeta`] — Riemann and Hurwitz zeta by Euler–Maclaurin with
//!   reflection, and the polylogarithm with its Jonquière continuation.
//!
//! - [`hyper`] — ₀F₁, ₁F₁, ₂F₀, and Gauss ₂F₁ with the six-way argument
//!   transformation selector, perturbed-parameter degenerate cases, and a
//!   Taylor-stepping ODE continuation for arguments no transform reaches.
//!
//! - [`functions`] — the composed layer: gamma family, error functions,
//!   Bessel/Airy/Struve/Anger–Weber, complete elliptic integrals,
//!   Lambert W, and the classical orthogonal polynomials.
//!
//! - [`reduce`] — Huffman-ordered multi-operand products and sums, with
//!   rayon-parallel variants.
//!
//! - [`facade`] — [`FixedPrecision`](facade::FixedPrecision), a session
//!   that pins one output precision and radix and pre-widens each call by
//!   that function's sensitivity.

pub mod agm;
pub mod bernoulli;
pub mod constants;
pub mod contfrac;
pub mod elementary;
pub mod error;
pub mod facade;
pub mod functions;
pub mod hyper;
pub mod number;
pub mod precision;
pub mod reduce;
pub mod series;
pub mod zeta;

pub use error::{Error, Result};
pub use facade::FixedPrecision;
pub use number::{Complex, Float};
pub use precision::{Context, Precision};
