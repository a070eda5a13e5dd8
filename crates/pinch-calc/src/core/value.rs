//! Numeric values with an integer/float split
//!
//! Integer literals stay exact through `+ - *` and non-negative powers;
//! anything touching a float or a division becomes a float.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::core::{EvalError, EvalResult};

/// Widest integer kept exact, in bits; anything wider may need more than
/// [`MAX_INT_DIGITS`] decimal digits to print
pub(crate) const MAX_INT_BITS: u64 = 14_284;
/// Longest integer literal accepted, in decimal digits
pub(crate) const MAX_INT_DIGITS: usize = 4300;

/// A number produced while evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Exact integer
    Int(BigInt),
    /// IEEE-754 double
    Float(f64),
}

impl Value {
    /// Builds an integer value
    #[must_use]
    pub fn int(n: impl Into<BigInt>) -> Self {
        Self::Int(n.into())
    }

    /// Wraps an integer result, rejecting ones too wide to display
    fn bounded(n: BigInt) -> EvalResult<Self> {
        within_width(n).map(Self::Int)
    }

    /// Converts to `f64`; an integer beyond the `f64` range is an overflow
    pub fn to_float(&self) -> EvalResult<f64> {
        match self {
            Self::Int(n) => n
                .to_f64()
                .filter(|x| x.is_finite())
                .ok_or(EvalError::Overflow),
            Self::Float(x) => Ok(*x),
        }
    }

    /// True for integers and for floats with no fractional part
    #[must_use]
    pub fn is_integral(&self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(x) => x.is_finite() && x.fract() == 0.0,
        }
    }

    /// True if the value is a float NaN
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Float(x) if x.is_nan())
    }

    /// True for integer zero and for both float zeros
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(n) => n.is_zero(),
            Self::Float(x) => *x == 0.0,
        }
    }

    /// Unary minus
    #[must_use]
    pub fn neg(self) -> Self {
        match self {
            Self::Int(n) => Self::Int(-n),
            Self::Float(x) => Self::Float(-x),
        }
    }

    /// Addition
    pub fn add(self, rhs: Self) -> EvalResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Self::bounded(a + b),
            (a, b) => Ok(Self::Float(a.to_float()? + b.to_float()?)),
        }
    }

    /// Subtraction
    pub fn sub(self, rhs: Self) -> EvalResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Self::bounded(a - b),
            (a, b) => Ok(Self::Float(a.to_float()? - b.to_float()?)),
        }
    }

    /// Multiplication
    pub fn mul(self, rhs: Self) -> EvalResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => {
                if a.bits() + b.bits() > MAX_INT_BITS + 1 {
                    return Err(EvalError::Overflow);
                }
                Self::bounded(a * b)
            }
            (a, b) => Ok(Self::Float(a.to_float()? * b.to_float()?)),
        }
    }

    /// True division, always a float
    pub fn div(self, rhs: Self) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Self::Float(self.to_float()? / rhs.to_float()?))
    }

    /// Exponentiation
    pub fn pow(self, rhs: Self) -> EvalResult<Self> {
        if let (Self::Int(base), Self::Int(exp)) = (&self, &rhs) {
            if !exp.is_negative() {
                return int_pow(base, exp).map(Self::Int);
            }
        }
        float_pow(self.to_float()?, rhs.to_float()?).map(Self::Float)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Exact power for a non-negative exponent
fn int_pow(base: &BigInt, exp: &BigInt) -> EvalResult<BigInt> {
    if exp.is_zero() || base.is_one() {
        return Ok(BigInt::one());
    }
    if base.is_zero() {
        return Ok(BigInt::zero());
    }
    if *base == -BigInt::one() {
        let odd = !(exp % 2u32).is_zero();
        return Ok(if odd { -BigInt::one() } else { BigInt::one() });
    }
    // |base| >= 2, so the result needs at least (bits - 1) * exp bits
    let exp = exp
        .to_u64()
        .filter(|e| (base.bits() - 1).saturating_mul(*e) <= MAX_INT_BITS)
        .ok_or(EvalError::Overflow)?;
    let exp = u32::try_from(exp).map_err(|_| EvalError::Overflow)?;
    within_width(base.pow(exp))
}

fn within_width(n: BigInt) -> EvalResult<BigInt> {
    if n.bits() > MAX_INT_BITS {
        return Err(EvalError::Overflow);
    }
    Ok(n)
}

fn float_pow(base: f64, exp: f64) -> EvalResult<f64> {
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exp.is_finite() && exp.fract() != 0.0 {
        return Err(EvalError::Domain(format!(
            "negative base {base} raised to fractional power {exp}"
        )));
    }
    let result = base.powf(exp);
    if result.is_infinite() && base.is_finite() && exp.is_finite() {
        return Err(EvalError::Overflow);
    }
    Ok(result)
}

/// Canonical text for a float: shortest round-trip digits, `.0` on integral
/// values, exponent form outside `1e-4 <= |x| < 1e16`.
#[must_use]
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sci = format!("{x:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = format!("{x}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Lenient float parsing for memory operations: surrounding whitespace,
/// signs, exponents and `nan`/`inf`/`infinity` in any case.
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
