//! Analytic continuation of ₂F₁ by Taylor-stepping its defining ODE.
//!
//! When every argument map leaves the modulus large, the function value
//! and derivative are carried along a path from a small starting argument
//! to the target, re-expanding the solution of
//! `z(1−z)w'' + [c−(a+b+1)z]w' − ab·w = 0` at each waypoint. The path
//! detours around the singularity at 1 (above it for arguments on or
//! above the real axis, matching the principal branch's limit from
//! above on the cut). Each step stays well inside the disc of
//! convergence, so the local Taylor series contracts geometrically.

use crate::error::{Error, Result};
use crate::number::{Complex, Float};
use crate::precision::{ensure_complex, Context, Precision};
use crate::series::hyper_series;

/// Fraction of the distance to the nearest singularity a step may cover.
const STEP_FRACTION: f64 = 0.4;

/// Modulus of the series-evaluated starting point.
const START_RADIUS: f64 = 0.35;

/// Path-length safety valve.
const MAX_STEPS: u32 = 400;

fn from_parts(re: f64, im: f64, radix: u32, wp: Precision) -> Complex {
    Complex::new(
        Float::from_f64(re, radix).with_precision(wp),
        Float::from_f64(im, radix).with_precision(wp),
    )
}

/// Waypoints from the origin to `z`, inserting a detour when the straight
/// segment passes near the singularity at 1.
fn waypoints(z: (f64, f64)) -> Vec<(f64, f64)> {
    // distance from (1, 0) to the segment 0 → z
    let len_sq = z.0 * z.0 + z.1 * z.1;
    let t = (z.0 / len_sq).clamp(0.0, 1.0);
    let dist = (t * z.0 - 1.0).hypot(t * z.1);
    if dist < 0.3 {
        let side = if z.1 < 0.0 { -1.0 } else { 1.0 };
        vec![(1.0, 0.6 * side), z]
    } else {
        vec![z]
    }
}

/// Re-expand at `u` and advance by `delta`, returning the new value and
/// derivative. Coefficients follow the three-term recurrence obtained by
/// substituting `z = u + t` into the hypergeometric ODE.
#[allow(clippy::too_many_arguments)]
fn taylor_step(
    a: &Complex,
    b: &Complex,
    c: &Complex,
    u: &Complex,
    delta: &Complex,
    value: &Complex,
    deriv: &Complex,
    wp: Precision,
) -> Result<(Complex, Complex)> {
    let radix = u.radix();
    let goal = wp.count() as i64;
    let one = Complex::one(radix).with_precision(wp);
    let abc1 = a.add(b).add(&one);
    let quad = u.mul(&one.sub(u)); // A
    let lin = one.sub(&u.mul(&Complex::with_radix(2, radix))); // B
    let drift = c.sub(&abc1.mul(u)); // C₀

    let mut ck = value.clone();
    let mut ck1 = deriv.clone();
    let mut val = ck.add(&ck1.mul(delta));
    let mut der = ck1.clone();
    let mut dpow = delta.mul(delta); // Δ^{k+2}
    let mut k: i64 = 0;
    loop {
        let kc = Complex::with_radix(k, radix);
        let lead = a.add(&kc).mul(&b.add(&kc)).mul(&ck);
        let mid = Complex::with_radix(k + 1, radix)
            .mul(&lin.mul(&kc).add(&drift))
            .mul(&ck1);
        let den = quad.mul_real(&Float::with_radix((k + 2) * (k + 1), radix));
        let next = lead.sub(&mid).divide(&den)?;

        let v_inc = next.mul(&dpow);
        let d_inc = next
            .mul(&dpow)
            .divide(delta)?
            .mul_real(&Float::with_radix(k + 2, radix));
        val = val.add(&v_inc);
        der = der.add(&d_inc);

        let settled = !v_inc.is_zero() && val.scale() - v_inc.scale() > goal + 2;
        let d_settled = !d_inc.is_zero() && der.scale() - d_inc.scale() > goal + 2;
        if (v_inc.is_zero() && d_inc.is_zero()) || (settled && d_settled) {
            return Ok((val, der));
        }
        if k > 40 * goal {
            return Err(Error::LossOfPrecision);
        }
        ck = ck1;
        ck1 = next;
        dpow = dpow.mul(delta);
        k += 1;
    }
}

/// ₂F₁ by ODE continuation to an argument outside every transform's reach.
pub fn continue_2f1(
    a: &Complex,
    b: &Complex,
    c: &Complex,
    z: &Complex,
    target: Precision,
) -> Result<Complex> {
    let radix = z.radix();
    let wp = Context::new(target, radix).working().extend(10);
    let a = ensure_complex(&a.rounded(wp.min(a.precision())), wp);
    let b = ensure_complex(&b.rounded(wp.min(b.precision())), wp);
    let c = ensure_complex(&c.rounded(wp.min(c.precision())), wp);
    let z_exact = ensure_complex(&z.rounded(wp.min(z.precision())), wp);

    let zf = (z.re().to_f64(), z.im().to_f64());
    let path = waypoints(zf);

    // Start on the ray toward the first waypoint, close enough to the
    // origin for the direct series.
    let first = path[0];
    let first_mag = first.0.hypot(first.1).max(1e-30);
    let start = (
        first.0 / first_mag * START_RADIUS,
        first.1 / first_mag * START_RADIUS,
    );
    let mut u = from_parts(start.0, start.1, radix, wp);
    let mut uf = start;

    let ctx = Context::new(wp, radix);
    let one = Complex::one(radix).with_precision(wp);
    let mut value = hyper_series(&[a.clone(), b.clone()], &[c.clone()], &u, &ctx)?;
    let mut deriv = hyper_series(
        &[a.add(&one), b.add(&one)],
        &[c.add(&one)],
        &u,
        &ctx,
    )?
    .mul(&a.mul(&b).divide(&c)?);

    let mut steps = 0u32;
    for (leg, stop) in path.iter().enumerate() {
        let last_leg = leg == path.len() - 1;
        loop {
            let remaining = (stop.0 - uf.0, stop.1 - uf.1);
            let dist = remaining.0.hypot(remaining.1);
            if dist == 0.0 {
                break;
            }
            let radius = uf.0.hypot(uf.1).min((uf.0 - 1.0).hypot(uf.1));
            let reach = STEP_FRACTION * radius;
            let (delta, arrived) = if dist <= reach {
                // land exactly, on the full-precision target for the final leg
                let d = if last_leg {
                    z_exact.sub(&u)
                } else {
                    from_parts(remaining.0, remaining.1, radix, wp)
                };
                (d, true)
            } else {
                let s = reach / dist;
                (
                    from_parts(remaining.0 * s, remaining.1 * s, radix, wp),
                    false,
                )
            };
            let (v, d) = taylor_step(&a, &b, &c, &u, &delta, &value, &deriv, wp)?;
            value = v;
            deriv = d;
            u = u.add(&delta);
            uf = (u.re().to_f64(), u.im().to_f64());
            steps += 1;
            if steps > MAX_STEPS {
                return Err(Error::LossOfPrecision);
            }
            if arrived {
                break;
            }
        }
    }
    Ok(value.rounded(target))
}
