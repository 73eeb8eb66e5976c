//! Continued-fraction machinery: the generic modified-Lentz evaluator and
//! the incomplete gamma functions built on it.

pub mod incgamma;
pub mod lentz;

pub use incgamma::{gamma_lower, gamma_upper};
pub use lentz::{continued_fraction, continued_fraction_best, Fraction};

#[cfg(test)]
mod tests;
