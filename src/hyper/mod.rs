//! The hypergeometric family: ₀F₁, ₁F₁, the asymptotic ₂F₀, and the Gauss
//! ₂F₁ with its transformation selector and ODE continuation.

pub mod continuation;
pub mod transforms;

pub use transforms::gauss_2f1;

use crate::elementary::exp;
use crate::error::Result;
use crate::number::Complex;
use crate::precision::{ensure_complex, Context, Precision};
use crate::series::{asymptotic_series, hyper_series};

/// Confluent limit `₀F₁(; b; z)`, convergent everywhere.
///
/// # Errors
///
/// [`Error::GammaPole`](crate::Error::GammaPole) for non-positive-integer `b`.
pub fn hypergeometric_0f1(b: &Complex, z: &Complex, target: Precision) -> Result<Complex> {
    let ctx = Context::new(target, b.radix());
    hyper_series(&[], core::slice::from_ref(b), z, &ctx)
}

/// Kummer's confluent function `₁F₁(a; b; z)`.
///
/// Negative real parts route through the Kummer transformation
/// `₁F₁(a;b;z) = eᶻ·₁F₁(b−a;b;−z)`, trading an alternating sum full of
/// cancellation for a positive one.
///
/// # Errors
///
/// [`Error::GammaPole`](crate::Error::GammaPole) for non-positive-integer
/// `b` not shielded by a terminating `a`.
pub fn hypergeometric_1f1(
    a: &Complex,
    b: &Complex,
    z: &Complex,
    target: Precision,
) -> Result<Complex> {
    let radix = a.radix();
    let ctx = Context::new(target, radix);
    let terminates = a.is_integer() && a.re().signum() <= 0;
    if z.re().signum() < 0 && !terminates {
        let wp = ctx.working().extend(5);
        let zw = ensure_complex(&z.rounded(wp.min(z.precision())), wp);
        let inner = hyper_series(
            &[b.sub(a)],
            &[b.clone()],
            &zw.neg(),
            &Context::new(wp, radix),
        )?;
        return Ok(exp(&zw, wp)?.mul(&inner).rounded(target));
    }
    hyper_series(&[a.clone()], &[b.clone()], z, &ctx)
}

/// The divergent asymptotic sum `₂F₀(a, b;; z)`, truncated at its smallest
/// term. Returns the value with the precision the truncation achieved;
/// composites decide whether that is enough.
///
/// # Errors
///
/// [`Error::Divergent`](crate::Error::Divergent) when the terms grow from
/// the start.
pub fn hypergeometric_2f0(
    a: &Complex,
    b: &Complex,
    z: &Complex,
    target: Precision,
) -> Result<(Complex, Precision)> {
    let ctx = Context::new(target, a.radix());
    asymptotic_series(&[a.clone(), b.clone()], &[], z, &ctx)
}

#[cfg(test)]
mod tests;
