//! Complex values as ordered pairs of same-radix [`Float`]s.

use crate::error::{Error, Result};
use crate::number::Float;
use crate::precision::Precision;

/// An immutable arbitrary-precision complex number.
///
/// Precision and scale are derived from the components, not stored as one
/// scalar: `precision()` is the smaller component precision and `scale()`
/// the larger component scale. `is_zero`, `is_integer` and `conj` are
/// structural queries on the pair.
///
/// # Example
///
/// ```
/// use apmath::{Complex, Float};
///
/// let z = Complex::new(Float::with_radix(3, 10), Float::with_radix(4, 10));
/// assert_eq!(z.norm_sqr(), Float::with_radix(25, 10));
/// assert_eq!(z.conj().im(), &Float::with_radix(-4, 10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    re: Float,
    im: Float,
}

impl Complex {
    /// Pair up a real and imaginary part. Panics on a radix mismatch, like
    /// the underlying `Float` arithmetic.
    pub fn new(re: Float, im: Float) -> Self {
        assert_eq!(re.radix(), im.radix(), "radix mismatch in complex pair");
        Complex { re, im }
    }

    /// A purely real value.
    pub fn from_real(re: Float) -> Self {
        let radix = re.radix();
        Complex {
            re,
            im: Float::zero(radix),
        }
    }

    /// Zero in the given radix.
    pub fn zero(radix: u32) -> Self {
        Complex::from_real(Float::zero(radix))
    }

    /// One in the given radix.
    pub fn one(radix: u32) -> Self {
        Complex::from_real(Float::one(radix))
    }

    /// The imaginary unit in the given radix.
    pub fn i(radix: u32) -> Self {
        Complex::new(Float::zero(radix), Float::one(radix))
    }

    /// An exact small integer in the given radix.
    pub fn with_radix(n: i64, radix: u32) -> Self {
        Complex::from_real(Float::with_radix(n, radix))
    }

    /// Real part.
    pub fn re(&self) -> &Float {
        &self.re
    }

    /// Imaginary part.
    pub fn im(&self) -> &Float {
        &self.im
    }

    /// The numeral base.
    pub fn radix(&self) -> u32 {
        self.re.radix()
    }

    /// Smaller of the component precisions; a zero component does not
    /// constrain (zero is exact).
    pub fn precision(&self) -> Precision {
        self.re.precision().min(self.im.precision())
    }

    /// Larger of the component scales.
    pub fn scale(&self) -> i64 {
        if self.im.is_zero() {
            self.re.scale()
        } else if self.re.is_zero() {
            self.im.scale()
        } else {
            self.re.scale().max(self.im.scale())
        }
    }

    /// Whether both components are zero.
    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    /// Whether the value is purely real.
    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// Whether the value is a real integer.
    pub fn is_integer(&self) -> bool {
        self.im.is_zero() && self.re.is_integer()
    }

    /// Complex conjugate.
    pub fn conj(&self) -> Self {
        Complex {
            re: self.re.clone(),
            im: self.im.neg(),
        }
    }

    /// Negation.
    pub fn neg(&self) -> Self {
        Complex {
            re: self.re.neg(),
            im: self.im.neg(),
        }
    }

    /// `re² + im²`.
    pub fn norm_sqr(&self) -> Float {
        &(&self.re * &self.re) + &(&self.im * &self.im)
    }

    /// Multiplication by the imaginary unit (a component swap, no rounding).
    pub fn mul_i(&self) -> Self {
        Complex {
            re: self.im.neg(),
            im: self.re.clone(),
        }
    }

    /// Division by the imaginary unit.
    pub fn div_i(&self) -> Self {
        Complex {
            re: self.im.clone(),
            im: self.re.neg(),
        }
    }

    /// Retag both components' precision.
    pub fn with_precision(&self, p: Precision) -> Self {
        Complex {
            re: self.re.with_precision(p),
            im: self.im.with_precision(p),
        }
    }

    /// Round both components to `p` significant digits.
    pub fn rounded(&self, p: Precision) -> Self {
        Complex {
            re: self.re.rounded(p),
            im: self.im.rounded(p),
        }
    }

    /// Sum.
    pub fn add(&self, other: &Complex) -> Complex {
        Complex {
            re: &self.re + &other.re,
            im: &self.im + &other.im,
        }
    }

    /// Difference.
    pub fn sub(&self, other: &Complex) -> Complex {
        Complex {
            re: &self.re - &other.re,
            im: &self.im - &other.im,
        }
    }

    /// Product (schoolbook; the substrate's kernels do the heavy lifting).
    pub fn mul(&self, other: &Complex) -> Complex {
        if self.is_real() && other.is_real() {
            return Complex::from_real(&self.re * &other.re);
        }
        let re = &(&self.re * &other.re) - &(&self.im * &other.im);
        let im = &(&self.re * &other.im) + &(&self.im * &other.re);
        Complex { re, im }
    }

    /// Scale by a real factor.
    pub fn mul_real(&self, f: &Float) -> Complex {
        Complex {
            re: &self.re * f,
            im: &self.im * f,
        }
    }

    /// Quotient via the conjugate: `z/w = z·conj(w) / |w|²`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for a zero divisor.
    pub fn divide(&self, other: &Complex) -> Result<Complex> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if other.is_real() {
            return Ok(Complex {
                re: self.re.divide(&other.re)?,
                im: self.im.divide(&other.re)?,
            });
        }
        let num = self.mul(&other.conj());
        let den = other.norm_sqr();
        Ok(Complex {
            re: num.re.divide(&den)?,
            im: num.im.divide(&den)?,
        })
    }

    /// Divide by a real factor.
    pub fn divide_real(&self, f: &Float) -> Result<Complex> {
        Ok(Complex {
            re: self.re.divide(f)?,
            im: self.im.divide(f)?,
        })
    }
}

impl From<Float> for Complex {
    fn from(re: Float) -> Self {
        Complex::from_real(re)
    }
}

impl core::fmt::Display for Complex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.im.is_zero() {
            write!(f, "{}", self.re)
        } else if self.im.signum() < 0 {
            write!(f, "{} - {}i", self.re, self.im.abs())
        } else {
            write!(f, "{} + {}i", self.re, self.im)
        }
    }
}

macro_rules! forward_complex_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl core::ops::$trait for &Complex {
            type Output = Complex;
            fn $method(self, rhs: &Complex) -> Complex {
                Complex::$inner(self, rhs)
            }
        }
        impl core::ops::$trait for Complex {
            type Output = Complex;
            fn $method(self, rhs: Complex) -> Complex {
                Complex::$inner(&self, &rhs)
            }
        }
    };
}

forward_complex_binop!(Add, add, add);
forward_complex_binop!(Sub, sub, sub);
forward_complex_binop!(Mul, mul, mul);

impl core::ops::Neg for &Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::neg(self)
    }
}

impl core::ops::Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::neg(&self)
    }
}
