//! AST evaluator and the string-in, string-out `evaluate` entry point

use tracing::debug;

use crate::core::parser::{AstNode, Parser};
use crate::core::{AngleMode, EvalResult, Value};

/// Button-label shorthands rewritten before parsing, in application order
const SUBSTITUTIONS: [(&str, &str); 5] = [
    ("x^y", "**"),
    ("x^2", "**2"),
    ("x^3", "**3"),
    ("2pi", "(2*pi)"),
    ("%", "/100"),
];

/// Rewrites button shorthands into grammar tokens.
///
/// Purely textual: `"3x^2"` becomes `"3**2"`, and `"%"` becomes `"/100"`
/// wherever it appears.
#[must_use]
pub fn preprocess(expr: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(expr.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Evaluates display text under `mode` and returns the new display text.
///
/// Never fails: errors come back as `"Error"`, `"Domain Error"` or
/// `"Div by Zero"`, and NaN results as `"nan"`.
#[must_use]
pub fn evaluate(expr: &str, mode: AngleMode) -> String {
    let source = preprocess(expr);
    match Evaluator::new(mode).evaluate_str(&source) {
        Ok(value) => value.to_string(),
        Err(err) => {
            debug!(expression = expr, error = %err, "evaluation failed");
            err.sentinel().as_str().to_string()
        }
    }
}

/// Evaluator for AST expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    mode: AngleMode,
}

impl Evaluator {
    /// Creates an evaluator for the given angle mode
    #[must_use]
    pub const fn new(mode: AngleMode) -> Self {
        Self { mode }
    }

    /// Returns the angle mode in effect
    #[must_use]
    pub const fn mode(&self) -> AngleMode {
        self.mode
    }

    /// Evaluates an AST node and returns the result
    pub fn evaluate(&self, node: &AstNode) -> EvalResult<Value> {
        match node {
            AstNode::Number(n) => Ok(n.clone()),
            AstNode::Constant(c) => Ok(c.value()),
            AstNode::Negate(inner) => Ok(self.evaluate(inner)?.neg()),
            AstNode::BinaryOp { left, op, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                op.apply(left_val, right_val)
            }
            AstNode::Call { func, arg } => {
                let value = self.evaluate(arg)?;
                func.apply(&value, self.mode)
            }
        }
    }

    /// Parses and evaluates grammar text (no shorthand rewriting)
    pub fn evaluate_str(&self, input: &str) -> EvalResult<Value> {
        let ast = Parser::parse_str(input)?;
        self.evaluate(&ast)
    }
}
