//! Arbitrary-precision radix float with explicit significant-digit tracking.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::precision::{matching_precisions, Precision};

/// Smallest supported radix.
pub const MIN_RADIX: u32 = 2;
/// Largest supported radix (digits 0-9 then a-z).
pub const MAX_RADIX: u32 = 36;

/// `radix^k` as an unsigned big integer.
pub(crate) fn radix_pow(radix: u32, k: u64) -> BigUint {
    let mut result = BigUint::one();
    let mut base = BigUint::from(radix);
    let mut k = k;
    while k > 0 {
        if k & 1 == 1 {
            result *= &base;
        }
        k >>= 1;
        if k > 0 {
            base = &base * &base;
        }
    }
    result
}

/// Number of radix digits in `m` (0 for zero).
pub(crate) fn digit_count(m: &BigUint, radix: u32) -> u64 {
    if m.is_zero() {
        return 0;
    }
    let bits = m.bits();
    let log2r = (radix as f64).log2();
    // Estimate from the bit length, then correct by at most a step or two.
    let mut d = (((bits - 1) as f64) / log2r).floor() as u64;
    let mut pow = radix_pow(radix, d);
    while pow > *m {
        d -= 1;
        pow /= radix;
    }
    while &pow * radix <= *m {
        d += 1;
        pow *= radix;
    }
    d + 1
}

/// An immutable arbitrary-precision real number.
///
/// The value is `mantissa · radix^exp` with the mantissa held as a big
/// integer whose digit layout (and the fast multiplication underneath) is
/// delegated to `num-bigint`. Each value carries:
///
/// - `precision` — how many leading digits are trustworthy, or
///   [`Precision::EXACT`] for error-free values;
/// - `scale` — the position of the most significant digit (1 for values in
///   `[1, radix)`, 0 for `[1/radix, 1)`, and so on);
/// - `radix` — the numeral base, 2..=36.
///
/// Every operation returns a new value; nothing is mutated in place.
/// Equality and ordering compare represented magnitudes and ignore the
/// precision tag.
///
/// # Example
///
/// ```
/// use apmath::{Float, Precision};
///
/// let x = Float::with_radix(7, 10);
/// assert_eq!(x.scale(), 1);
/// assert!(x.precision().is_exact());
///
/// let y = Float::parse("123.25", 10, Precision::digits(30)).unwrap();
/// assert_eq!(y.scale(), 3);
/// assert_eq!((&x * &y).scale(), 3); // 862.75
/// ```
#[derive(Debug, Clone)]
pub struct Float {
    mantissa: BigInt,
    exp: i64,
    precision: Precision,
    radix: u32,
}

impl Float {
    fn normalized(mut mantissa: BigInt, mut exp: i64, precision: Precision, radix: u32) -> Self {
        assert!((MIN_RADIX..=MAX_RADIX).contains(&radix), "radix out of range");
        if mantissa.is_zero() {
            return Float {
                mantissa,
                exp: 0,
                precision: Precision::EXACT,
                radix,
            };
        }
        let r = BigInt::from(radix);
        loop {
            let (q, rem) = num_integer::Integer::div_rem(&mantissa, &r);
            if rem.is_zero() {
                mantissa = q;
                exp += 1;
            } else {
                break;
            }
        }
        Float {
            mantissa,
            exp,
            precision,
            radix,
        }
    }

    /// Zero in the given radix. Zero is exact.
    pub fn zero(radix: u32) -> Self {
        Float::normalized(BigInt::zero(), 0, Precision::EXACT, radix)
    }

    /// One in the given radix.
    pub fn one(radix: u32) -> Self {
        Float::with_radix(1, radix)
    }

    /// An exact small integer in the given radix.
    pub fn with_radix(n: i64, radix: u32) -> Self {
        Float::normalized(BigInt::from(n), 0, Precision::EXACT, radix)
    }

    /// An exact big integer in the given radix.
    pub fn from_bigint(n: BigInt, radix: u32) -> Self {
        Float::normalized(n, 0, Precision::EXACT, radix)
    }

    /// The exact power `radix^k`.
    pub fn radix_power(k: i64, radix: u32) -> Self {
        Float::normalized(BigInt::one(), k, Precision::EXACT, radix)
    }

    /// The rational `num/den` evaluated to `precision` digits.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for a zero denominator;
    /// [`Error::InfiniteExpansion`] when `precision` is EXACT and the
    /// expansion does not terminate in this radix.
    pub fn rational(num: i64, den: i64, radix: u32, precision: Precision) -> Result<Self> {
        let n = Float::with_radix(num, radix).with_precision(precision);
        let d = Float::with_radix(den, radix).with_precision(precision);
        n.divide(&d)
    }

    /// Parse a literal: optional sign, radix digits with an optional point,
    /// optional `e`-exponent (the exponent itself is always written in
    /// decimal and counts radix positions).
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] on malformed input.
    pub fn parse(s: &str, radix: u32, precision: Precision) -> Result<Self> {
        let s = s.trim();
        let (sign, rest) = match s.as_bytes().first() {
            Some(b'-') => (Sign::Minus, &s[1..]),
            Some(b'+') => (Sign::Plus, &s[1..]),
            Some(_) => (Sign::Plus, s),
            None => return Err(Error::Parse),
        };
        let (digits_part, exp_part) = match rest.find(['e', 'E']) {
            // 'e' is a digit for radix > 14, so only split on it below that
            Some(i) if radix <= 14 => (&rest[..i], Some(&rest[i + 1..])),
            _ => (rest, None),
        };
        let explicit_exp: i64 = match exp_part {
            Some(e) => e.parse().map_err(|_| Error::Parse)?,
            None => 0,
        };

        let mut digits = Vec::new();
        let mut frac_digits: i64 = 0;
        let mut seen_point = false;
        for ch in digits_part.chars() {
            if ch == '.' {
                if seen_point {
                    return Err(Error::Parse);
                }
                seen_point = true;
                continue;
            }
            let d = ch.to_digit(radix).ok_or(Error::Parse)?;
            digits.push(d as u8);
            if seen_point {
                frac_digits += 1;
            }
        }
        if digits.is_empty() {
            return Err(Error::Parse);
        }
        let mag = BigUint::from_radix_be(&digits, radix).ok_or(Error::Parse)?;
        let mantissa = BigInt::from_biguint(sign, mag);
        Ok(Float::normalized(
            mantissa,
            explicit_exp - frac_digits,
            precision,
            radix,
        ))
    }

    /// Convert a double into this radix. The result carries the precision
    /// equivalent of the 53-bit double mantissa, and is mainly used to seed
    /// iterative algorithms.
    pub fn from_f64(x: f64, radix: u32) -> Self {
        assert!(x.is_finite(), "cannot convert a non-finite double");
        if x == 0.0 {
            return Float::zero(radix);
        }
        let p = (52.0 / (radix as f64).log2()).floor() as u64;
        let p = Precision::digits(p.max(1));

        let bits = x.to_bits();
        let sign = if bits >> 63 == 1 { -1 } else { 1 };
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let frac = bits & 0xf_ffff_ffff_ffff;
        // Decompose into integer m2 · 2^e2, exactly.
        let (m2, e2) = if biased == 0 {
            (frac, -1074i64)
        } else {
            (frac | (1 << 52), biased - 1075)
        };
        let mut m2 = BigInt::from(m2);
        if sign < 0 {
            m2 = -m2;
        }

        if e2 >= 0 {
            let m = m2 << (e2 as usize);
            return Float::normalized(m, 0, Precision::EXACT, radix).rounded(p);
        }
        // m2 / 2^|e2|: scale up by enough radix digits, then shift down.
        let e = (-e2) as u64;
        let extra = ((e as f64 + 53.0) * 2f64.log(radix as f64)).ceil() as u64 + 4;
        let scaled = m2 * BigInt::from(radix_pow(radix, extra));
        let q = scaled >> (e as usize);
        Float::normalized(q, -(extra as i64), p, radix).rounded(p)
    }

    /// Split into `(f, scale)` with `|f|` in `[1/radix, 1)` such that the
    /// value is `f · radix^scale`. The split never overflows the double even
    /// when the scale is astronomically large.
    pub fn to_f64_parts(&self) -> (f64, i64) {
        if self.is_zero() {
            return (0.0, 0);
        }
        let digits = self.digits();
        let top_count = ((53.0 / (self.radix as f64).log2()).ceil() as u64 + 1).min(digits);
        let shift = digits - top_count;
        let top = self.mantissa.magnitude() / &radix_pow(self.radix, shift);
        let mut f = top.to_f64().unwrap_or(0.0);
        f /= (self.radix as f64).powi(top_count as i32);
        if self.mantissa.is_negative() {
            f = -f;
        }
        (f, self.scale())
    }

    /// Lossy conversion to a double. Overflows to infinity and underflows
    /// to zero when the scale is outside the double's range.
    pub fn to_f64(&self) -> f64 {
        let (f, scale) = self.to_f64_parts();
        let log2 = scale as f64 * (self.radix as f64).log2();
        if log2 > 1100.0 {
            return if f < 0.0 { f64::NEG_INFINITY } else { f64::INFINITY };
        }
        if log2 < -1100.0 {
            return 0.0;
        }
        // Apply the scale in two halves so the intermediate cannot overflow.
        let half = scale / 2;
        f * (self.radix as f64).powi(half as i32) * (self.radix as f64).powi((scale - half) as i32)
    }

    /// The numeral base.
    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// The tracked precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Position of the most significant digit: 1 for `[1, radix)`, 0 for
    /// `[1/radix, 1)`, and so on. Zero has no meaningful scale and reports 0.
    pub fn scale(&self) -> i64 {
        if self.is_zero() {
            0
        } else {
            self.exp + self.digits() as i64
        }
    }

    /// Number of stored mantissa digits.
    pub(crate) fn digits(&self) -> u64 {
        digit_count(self.mantissa.magnitude(), self.radix)
    }

    /// Sign: -1, 0, or 1.
    pub fn signum(&self) -> i32 {
        match self.mantissa.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// Whether the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Whether the represented value is an integer.
    pub fn is_integer(&self) -> bool {
        // Normalization strips trailing zero digits, so a fractional part
        // exists exactly when the exponent is negative.
        self.is_zero() || self.exp >= 0
    }

    /// Retag the precision without touching the stored digits. Used to
    /// widen (claim more trustworthy digits) before a sensitive operation.
    pub fn with_precision(&self, p: Precision) -> Self {
        Float {
            mantissa: self.mantissa.clone(),
            exp: self.exp,
            precision: p,
            radix: self.radix,
        }
    }

    /// Round to `p` significant digits (half away from zero) and retag.
    pub fn rounded(&self, p: Precision) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let digits = self.digits();
        let keep = match p.finite() {
            Some(k) => k,
            None => return self.with_precision(p),
        };
        if keep == 0 || digits <= keep {
            return self.with_precision(p);
        }
        let drop = digits - keep;
        let pow = BigInt::from(radix_pow(self.radix, drop));
        let (mut q, r) = num_integer::Integer::div_rem(&self.mantissa, &pow);
        if r.abs() * 2u32 >= pow {
            q += self.mantissa.signum();
        }
        Float::normalized(q, self.exp + drop as i64, p, self.radix)
    }

    /// Negation.
    pub fn neg(&self) -> Self {
        Float {
            mantissa: -&self.mantissa,
            exp: self.exp,
            precision: self.precision,
            radix: self.radix,
        }
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Float {
            mantissa: self.mantissa.abs(),
            exp: self.exp,
            precision: self.precision,
            radix: self.radix,
        }
    }

    /// One unit in the last tracked place: `radix^(scale − precision)`.
    /// For exact or zero values this is zero.
    pub fn ulp(&self) -> Self {
        match self.precision.finite() {
            Some(p) if !self.is_zero() => {
                Float::radix_power(self.scale() - p as i64, self.radix)
            }
            _ => Float::zero(self.radix),
        }
    }

    /// Multiply by an exact power of the radix (digit shift).
    pub fn scaled(&self, k: i64) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        Float {
            mantissa: self.mantissa.clone(),
            exp: self.exp + k,
            precision: self.precision,
            radix: self.radix,
        }
    }

    fn check_radix(&self, other: &Float) {
        assert_eq!(
            self.radix, other.radix,
            "radix mismatch: {} vs {}",
            self.radix, other.radix
        );
    }

    /// Sum, with result precision derived from the operands' effective
    /// precisions (an operand entirely below the other's noise floor does
    /// not contribute digits).
    pub fn add(&self, other: &Float) -> Float {
        self.check_radix(other);
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let (px, py) = matching_precisions(self, other);
        if px.count() == 0 {
            return other.rounded(py);
        }
        if py.count() == 0 {
            return self.rounded(px);
        }
        let xa = self.rounded(px);
        let ya = other.rounded(py);
        let e = xa.exp.min(ya.exp);
        let mx = &xa.mantissa * BigInt::from(radix_pow(self.radix, (xa.exp - e) as u64));
        let my = &ya.mantissa * BigInt::from(radix_pow(self.radix, (ya.exp - e) as u64));
        let sum = Float::normalized(mx + my, e, Precision::EXACT, self.radix);
        if sum.is_zero() {
            return sum;
        }
        if self.precision.is_exact() && other.precision.is_exact() {
            return sum;
        }
        // Trustworthy digits run from the result's scale down to the higher
        // of the two noise floors. Total cancellation leaves one noise digit.
        let floor_x = self.scale() as i128 - px.count() as i128;
        let floor_y = other.scale() as i128 - py.count() as i128;
        let bottom = floor_x.max(floor_y);
        let avail = sum.scale() as i128 - bottom;
        let p = Precision::digits(avail.max(1) as u64);
        sum.rounded(p)
    }

    /// Difference: `self + (−other)`.
    pub fn sub(&self, other: &Float) -> Float {
        self.add(&other.neg())
    }

    /// Product; result precision is the smaller operand precision.
    pub fn mul(&self, other: &Float) -> Float {
        self.check_radix(other);
        if self.is_zero() || other.is_zero() {
            return Float::zero(self.radix);
        }
        let p = self.precision.min(other.precision);
        let m = &self.mantissa * &other.mantissa;
        Float::normalized(m, self.exp + other.exp, p, self.radix).rounded(p)
    }

    /// Quotient to the smaller operand precision.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for a zero divisor. When both operands are
    /// exact, a quotient that does not terminate in this radix raises
    /// [`Error::InfiniteExpansion`] instead of silently rounding.
    pub fn divide(&self, other: &Float) -> Result<Float> {
        self.check_radix(other);
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Float::zero(self.radix));
        }
        let p = self.precision.min(other.precision);
        if p.is_exact() {
            return self.divide_exact(other);
        }
        let pf = p.count().max(1);
        let guard = 5u64;
        let dx = self.digits();
        let dy = other.digits();
        // Scale the dividend so the truncating integer quotient keeps
        // p + guard digits.
        let k = (dy + pf + guard).saturating_sub(dx);
        let num = &self.mantissa * BigInt::from(radix_pow(self.radix, k));
        let q = num / &other.mantissa;
        let exp = self.exp - other.exp - k as i64;
        Ok(Float::normalized(q, exp, p, self.radix).rounded(p))
    }

    fn divide_exact(&self, other: &Float) -> Result<Float> {
        // x/y terminates iff, after cancelling common factors, every prime
        // factor of the divisor also divides the radix.
        let g = num_integer::Integer::gcd(&self.mantissa, &other.mantissa);
        let num = &self.mantissa / &g;
        let den = (&other.mantissa / &g).abs();
        let neg = other.mantissa.is_negative();
        let r = BigInt::from(self.radix);

        let mut d = den.clone();
        while !d.is_one() {
            let f = num_integer::Integer::gcd(&d, &r);
            if f.is_one() {
                return Err(Error::InfiniteExpansion);
            }
            d = &d / &f;
        }

        // Smallest e with den | radix^e, then divide through exactly.
        let mut e: i64 = 0;
        let mut pow = BigInt::one();
        while !num_integer::Integer::is_multiple_of(&pow, &den) {
            pow *= &r;
            e += 1;
        }
        let mut q = num * (&pow / &den);
        if neg {
            q = -q;
        }
        Ok(Float::normalized(
            q,
            self.exp - other.exp - e,
            Precision::EXACT,
            self.radix,
        ))
    }

    /// Largest integer not above the value, as an exact `Float`.
    pub fn floor(&self) -> Float {
        if self.is_integer() {
            return self.with_precision(Precision::EXACT);
        }
        let pow = BigInt::from(radix_pow(self.radix, (-self.exp) as u64));
        let q = num_integer::Integer::div_floor(&self.mantissa, &pow);
        Float::normalized(q, 0, Precision::EXACT, self.radix)
    }

    /// Nearest integer (half away from zero), as a big integer.
    pub fn to_bigint_rounded(&self) -> BigInt {
        if self.is_zero() {
            return BigInt::zero();
        }
        if self.exp >= 0 {
            return &self.mantissa * BigInt::from(radix_pow(self.radix, self.exp as u64));
        }
        let pow = BigInt::from(radix_pow(self.radix, (-self.exp) as u64));
        let (mut q, r) = num_integer::Integer::div_rem(&self.mantissa, &pow);
        if r.abs() * 2u32 >= pow {
            q += self.mantissa.signum();
        }
        q
    }

    /// Magnitude comparison: `|self|` vs `|other|`.
    pub fn cmp_abs(&self, other: &Float) -> core::cmp::Ordering {
        self.check_radix(other);
        use core::cmp::Ordering;
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        match self.scale().cmp(&other.scale()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // Equal scales: the exponent gap is bounded by the digit-count gap,
        // so aligning the mantissas stays cheap.
        let e = self.exp.min(other.exp);
        let mx = self.mantissa.abs() * BigInt::from(radix_pow(self.radix, (self.exp - e) as u64));
        let my = other.mantissa.abs() * BigInt::from(radix_pow(self.radix, (other.exp - e) as u64));
        mx.cmp(&my)
    }
}

impl PartialEq for Float {
    /// Value equality; the precision tag does not participate.
    fn eq(&self, other: &Self) -> bool {
        self.radix == other.radix
            && self.exp == other.exp
            && self.mantissa == other.mantissa
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        if self.radix != other.radix {
            return None;
        }
        use core::cmp::Ordering;
        let (sx, sy) = (self.signum(), other.signum());
        if sx != sy {
            return Some(sx.cmp(&sy));
        }
        if sx == 0 {
            return Some(Ordering::Equal);
        }
        let mag = self.cmp_abs(other);
        Some(if sx > 0 { mag } else { mag.reverse() })
    }
}

impl core::fmt::Display for Float {
    /// Scientific notation: `d.ddd…e±k` with the mantissa in the value's
    /// own radix (digits above 9 are lowercase letters) and the exponent in
    /// decimal.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let digits = self.mantissa.magnitude().to_str_radix(self.radix);
        let sign = if self.signum() < 0 { "-" } else { "" };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            write!(f, "{sign}{head}e{}", self.scale() - 1)
        } else {
            write!(f, "{sign}{head}.{tail}e{}", self.scale() - 1)
        }
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl core::ops::$trait for &Float {
            type Output = Float;
            fn $method(self, rhs: &Float) -> Float {
                Float::$inner(self, rhs)
            }
        }
        impl core::ops::$trait for Float {
            type Output = Float;
            fn $method(self, rhs: Float) -> Float {
                Float::$inner(&self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add, add);
forward_binop!(Sub, sub, sub);
forward_binop!(Mul, mul, mul);

impl core::ops::Neg for &Float {
    type Output = Float;
    fn neg(self) -> Float {
        Float::neg(self)
    }
}

impl core::ops::Neg for Float {
    type Output = Float;
    fn neg(self) -> Float {
        Float::neg(&self)
    }
}
