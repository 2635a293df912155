//! AST evaluator

use crate::core::parser::{AstNode, BinaryOp, Parser};
use crate::core::{CalcError, CalcResult, ExpressionEvaluator};

/// Folds an [`AstNode`] into a number, rejecting non-finite values at every step
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Evaluates an AST node and returns the result
    ///
    /// Walks the tree with an explicit stack, so long operator chains do not
    /// grow the call stack. Operands are folded left before right.
    pub fn evaluate(&self, node: &AstNode) -> CalcResult<f64> {
        let mut pending = vec![Step::Visit(node)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = pending.pop() {
            let value = match step {
                Step::Visit(AstNode::Number(n)) => *n,
                Step::Visit(AstNode::Negate(inner)) => {
                    pending.push(Step::Negate);
                    pending.push(Step::Visit(inner));
                    continue;
                }
                Step::Visit(AstNode::Binary { left, op, right }) => {
                    pending.push(Step::Apply(*op));
                    pending.push(Step::Visit(right));
                    pending.push(Step::Visit(left));
                    continue;
                }
                Step::Negate => -operand(&mut values)?,
                Step::Apply(op) => {
                    let rhs = operand(&mut values)?;
                    let lhs = operand(&mut values)?;
                    Self::apply(lhs, op, rhs)?
                }
            };

            if !value.is_finite() {
                return Err(CalcError::NonFinite);
            }
            values.push(value);
        }

        operand(&mut values)
    }

    fn apply(lhs: f64, op: BinaryOp, rhs: f64) -> CalcResult<f64> {
        match op {
            BinaryOp::Add => Ok(lhs + rhs),
            BinaryOp::Subtract => Ok(lhs - rhs),
            BinaryOp::Multiply => Ok(lhs * rhs),
            BinaryOp::Divide if rhs == 0.0 => Err(CalcError::DivisionByZero),
            BinaryOp::Divide => Ok(lhs / rhs),
        }
    }

    /// Parses and evaluates a string expression
    pub fn evaluate_str(&self, input: &str) -> CalcResult<f64> {
        let ast = Parser::parse_str(input)?;
        self.evaluate(&ast)
    }
}

#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    Visit(&'a AstNode),
    Negate,
    Apply(BinaryOp),
}

fn operand(values: &mut Vec<f64>) -> CalcResult<f64> {
    values
        .pop()
        .ok_or_else(|| CalcError::parse("missing operand"))
}

/// The default [`ExpressionEvaluator`]: parse with [`Parser`], fold with [`Evaluator`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticEvaluator {
    evaluator: Evaluator,
}

impl ArithmeticEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExpressionEvaluator for ArithmeticEvaluator {
    fn evaluate(&self, expression: &str) -> CalcResult<f64> {
        self.evaluator.evaluate_str(expression)
    }
}
