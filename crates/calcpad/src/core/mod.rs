//! Arithmetic core: tokenizer, parser, evaluator and number display.
//!
//! Expressions are restricted to numeric literals, the four binary operators
//! `+ - * /`, unary sign and parentheses. Nothing in the buffer is ever
//! executed; it is parsed into an [`AstNode`](parser::AstNode) and folded.

pub mod evaluator;
pub mod format;
pub mod parser;

pub use evaluator::{ArithmeticEvaluator, Evaluator};
pub use format::format_number;
pub use parser::{AstNode, BinaryOp, Parser, Token, Tokenizer, MAX_DEPTH};

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Reasons an expression could not be turned into a displayable number.
///
/// All variants surface identically on the display; the distinction exists
/// for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Nothing to evaluate
    #[error("empty expression")]
    EmptyExpression,
    /// Invalid expression syntax
    #[error("invalid expression: {0}")]
    Parse(String),
    /// Division by zero attempted
    #[error("division by zero")]
    DivisionByZero,
    /// A value overflowed to infinity or became NaN
    #[error("result is not a finite number")]
    NonFinite,
}

impl CalcError {
    /// Shorthand for a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Opaque string-to-number evaluation service used by the display controller.
///
/// The controller only distinguishes success from failure.
pub trait ExpressionEvaluator: std::fmt::Debug {
    /// Evaluates `expression` to a finite number
    fn evaluate(&self, expression: &str) -> CalcResult<f64>;
}
