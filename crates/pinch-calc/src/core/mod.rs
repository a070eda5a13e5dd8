//! Expression evaluation core
//!
//! A closed grammar over numbers, `+ - * / **`, parentheses and a fixed
//! table of scientific functions. Nothing outside that table can be named,
//! so there is no way to reach arbitrary code from an expression string.

pub mod evaluator;
mod functions;
pub mod parser;
mod value;

pub use evaluator::{evaluate, preprocess, Evaluator};
pub use functions::{Constant, Function, Operation};
pub use value::{format_float, parse_float, Value};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for evaluation steps
pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluation failures. These never leave [`evaluate`]: each one collapses
/// into a [`Sentinel`] display string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Division (or `0 ** negative`) by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Input outside a function's mathematical domain
    #[error("math domain error: {0}")]
    Domain(String),
    /// Argument of the right type but an unsupported value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Finite inputs produced an infinite result
    #[error("numerical result out of range")]
    Overflow,
    /// Malformed expression text
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Name outside the constant/function table
    #[error("name '{0}' is not defined")]
    UnknownIdentifier(String),
    /// Something that is not a function was called, or a function was used as a value
    #[error("type error: {0}")]
    Type(String),
}

impl EvalError {
    /// The display sentinel this error resolves to
    #[must_use]
    pub const fn sentinel(&self) -> Sentinel {
        match self {
            Self::DivisionByZero => Sentinel::DivByZero,
            Self::Domain(_) => Sentinel::DomainError,
            Self::InvalidArgument(_)
            | Self::Overflow
            | Self::Syntax(_)
            | Self::UnknownIdentifier(_)
            | Self::Type(_) => Sentinel::Error,
        }
    }
}

/// Error states that live directly in the expression display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Generic failure
    Error,
    /// Math domain violation
    DomainError,
    /// Division by zero
    DivByZero,
    /// Not-a-number result (inverse trig out of range)
    Nan,
}

impl Sentinel {
    /// Every sentinel, in display order
    pub const ALL: [Self; 4] = [Self::Error, Self::DomainError, Self::DivByZero, Self::Nan];

    /// The literal display text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::DomainError => "Domain Error",
            Self::DivByZero => "Div by Zero",
            Self::Nan => "nan",
        }
    }

    /// Recognizes a display string as a sentinel
    #[must_use]
    pub fn from_display(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == text)
    }

    /// True if `text` is one of the sentinel strings
    #[must_use]
    pub fn is_sentinel(text: &str) -> bool {
        Self::from_display(text).is_some()
    }
}

impl std::fmt::Display for Sentinel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How trigonometric arguments and inverse results are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    /// Plain radians
    #[default]
    Radians,
    /// Degrees, converted at the function boundary
    Degrees,
}

impl AngleMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Radians => Self::Degrees,
            Self::Degrees => Self::Radians,
        }
    }

    /// Badge text shown next to the display
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Radians => "RADIANS",
            Self::Degrees => "DEGREES",
        }
    }

    /// Converts a trig argument into radians
    #[must_use]
    pub fn to_radians(self, x: f64) -> f64 {
        match self {
            Self::Radians => x,
            Self::Degrees => x.to_radians(),
        }
    }

    /// Converts an inverse-trig result out of radians
    #[must_use]
    pub fn from_radians(self, x: f64) -> f64 {
        match self {
            Self::Radians => x,
            Self::Degrees => x.to_degrees(),
        }
    }
}

impl std::fmt::Display for AngleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
