//! Composed special functions: everything built on top of the series,
//! continued-fraction, and AGM engines.

pub mod bessel;
pub mod elliptic;
pub mod erf;
pub mod gamma;
pub mod lambertw;
pub mod orthopoly;

pub use bessel::{
    airy_ai, airy_bi, anger_j, besseli, besselj, besselk, bessely, struve_h, weber_e,
};
pub use elliptic::{elliptic_e, elliptic_k};
pub use erf::{erf, erf_f, erfc, erfc_f};
pub use gamma::{
    beta, digamma, factorial, gamma, gamma_f, log_gamma, pochhammer, polygamma,
};
pub use lambertw::lambert_w;
pub use orthopoly::{
    bernoulli_polynomial, chebyshev_t, chebyshev_u, euler_polynomial, fibonacci, gegenbauer,
    hermite, jacobi, laguerre, legendre,
};
