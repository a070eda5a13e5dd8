//! Operators, functions and constants that an expression may name

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};

use crate::core::value::MAX_INT_BITS;
use crate::core::{AngleMode, EvalError, EvalResult, Value};

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// True division (/)
    Divide,
    /// Power (**)
    Power,
}

impl Operation {
    /// Applies the operator to two operands
    pub fn apply(self, lhs: Value, rhs: Value) -> EvalResult<Value> {
        match self {
            Self::Add => lhs.add(rhs),
            Self::Subtract => lhs.sub(rhs),
            Self::Multiply => lhs.mul(rhs),
            Self::Divide => lhs.div(rhs),
            Self::Power => lhs.pow(rhs),
        }
    }
}

/// Named constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
}

impl Constant {
    /// Looks up a constant by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Self::Pi),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    /// Numeric value
    #[must_use]
    pub fn value(self) -> Value {
        match self {
            Self::Pi => Value::Float(std::f64::consts::PI),
            Self::E => Value::Float(std::f64::consts::E),
        }
    }
}

/// Single-argument functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Square root
    Sqrt,
    /// Natural logarithm
    Log,
    /// Base-10 logarithm
    Log10,
    /// Hyperbolic sine
    Sinh,
    /// Hyperbolic cosine
    Cosh,
    /// Hyperbolic tangent
    Tanh,
    /// Sine (argument honors the angle mode)
    Sin,
    /// Cosine (argument honors the angle mode)
    Cos,
    /// Tangent (argument honors the angle mode)
    Tan,
    /// Arcsine (result honors the angle mode)
    Asin,
    /// Arccosine (result honors the angle mode)
    Acos,
    /// Arctangent (result honors the angle mode)
    Atan,
    /// Factorial of a non-negative integral value
    Fact,
}

impl Function {
    /// Every function, in lookup order
    pub const ALL: [Self; 13] = [
        Self::Sqrt,
        Self::Log,
        Self::Log10,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Fact,
    ];

    /// The name used in expressions
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Fact => "fact",
        }
    }

    /// Looks up a function by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Applies the function under the given angle mode
    pub fn apply(self, arg: &Value, mode: AngleMode) -> EvalResult<Value> {
        let x = arg.to_float()?;
        let result = match self {
            Self::Fact => return factorial(arg),
            Self::Sqrt => checked(self, x, x.sqrt(), false)?,
            Self::Log => checked(self, x, positive(self, x)?.ln(), false)?,
            Self::Log10 => checked(self, x, positive(self, x)?.log10(), false)?,
            Self::Sinh => checked(self, x, x.sinh(), true)?,
            Self::Cosh => checked(self, x, x.cosh(), true)?,
            Self::Tanh => x.tanh(),
            Self::Sin => {
                let radians = mode.to_radians(x);
                checked(self, radians, radians.sin(), false)?
            }
            Self::Cos => {
                let radians = mode.to_radians(x);
                checked(self, radians, radians.cos(), false)?
            }
            Self::Tan => {
                let radians = mode.to_radians(x);
                checked(self, radians, radians.tan(), false)?
            }
            // Out-of-range inverse trig is NaN rather than an error
            Self::Asin => inverse_trig(x, f64::asin, mode),
            Self::Acos => inverse_trig(x, f64::acos, mode),
            Self::Atan => mode.from_radians(x.atan()),
        };
        Ok(Value::Float(result))
    }
}

/// NaN from a non-NaN input is a domain error; infinity from a finite input
/// is either an overflow or a domain error depending on the function.
fn checked(func: Function, input: f64, result: f64, can_overflow: bool) -> EvalResult<f64> {
    if result.is_nan() && !input.is_nan() {
        return Err(EvalError::Domain(format!("{}({input})", func.name())));
    }
    if result.is_infinite() && input.is_finite() {
        return if can_overflow {
            Err(EvalError::Overflow)
        } else {
            Err(EvalError::Domain(format!("{}({input})", func.name())))
        };
    }
    Ok(result)
}

fn positive(func: Function, x: f64) -> EvalResult<f64> {
    if x <= 0.0 {
        return Err(EvalError::Domain(format!("{}({x})", func.name())));
    }
    Ok(x)
}

fn inverse_trig(x: f64, f: fn(f64) -> f64, mode: AngleMode) -> f64 {
    if x.abs() > 1.0 {
        return f64::NAN;
    }
    mode.from_radians(f(x))
}

fn factorial(arg: &Value) -> EvalResult<Value> {
    let n = match arg {
        Value::Int(n) if !n.is_negative() => n.to_u64().ok_or(EvalError::Overflow)?,
        // Saturates for huge floats, which overflow in the loop below
        Value::Float(x) if *x >= 0.0 && arg.is_integral() => *x as u64,
        _ => {
            return Err(EvalError::InvalidArgument(format!(
                "fact() needs a non-negative integer, got {arg}"
            )));
        }
    };

    let mut product = BigInt::one();
    for k in 2..=n {
        product *= k;
        if product.bits() > MAX_INT_BITS {
            return Err(EvalError::Overflow);
        }
    }
    Ok(Value::Int(product))
}
