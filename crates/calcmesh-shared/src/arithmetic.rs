//! Elementary-operation evaluation, performed by agents (spec §4.4, C5).
//!
//! Operands travel over the wire as strings and are parsed here rather
//! than at the planner, since the planner never needs their numeric
//! value — only the agent computing a result does.

use thiserror::Error;

use crate::domain::Operation;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("devision by zero")]
    DivisionByZero,

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Resolve a wire operator character to the enum the rest of the agent
/// works with. Unknown op codes are a `result.error`, not a panic — a
/// stray agent of a mismatched version should degrade gracefully.
pub fn parse_operation(wire: &str) -> Result<Operation, ArithmeticError> {
    Operation::from_wire(wire).ok_or_else(|| ArithmeticError::InvalidOperation(wire.to_string()))
}

/// Evaluate a single elementary task's operation against its string
/// operands. `arg2` is ignored for `Neg`.
pub fn compute(operation: Operation, arg1: &str, arg2: &str) -> Result<f64, ArithmeticError> {
    let a = parse_operand(arg1)?;

    if operation.is_unary() {
        return Ok(-a);
    }

    let b = parse_operand(arg2)?;
    match operation {
        Operation::Add => Ok(a + b),
        Operation::Sub => Ok(a - b),
        Operation::Mul => Ok(a * b),
        Operation::Div => {
            if b == 0.0 {
                Err(ArithmeticError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }
        Operation::Neg => unreachable!("unary branch handled above"),
    }
}

fn parse_operand(operand: &str) -> Result<f64, ArithmeticError> {
    operand
        .parse::<f64>()
        .map_err(|_| ArithmeticError::InvalidOperator(operand.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds() {
        assert_eq!(compute(Operation::Add, "2", "2").unwrap(), 4.0);
    }

    #[test]
    fn subtracts() {
        assert_eq!(compute(Operation::Sub, "52", "49").unwrap(), 3.0);
    }

    #[test]
    fn multiplies() {
        assert_eq!(compute(Operation::Mul, "3", "4").unwrap(), 12.0);
    }

    #[test]
    fn divides() {
        assert_eq!(compute(Operation::Div, "6", "2").unwrap(), 3.0);
    }

    #[test]
    fn division_by_zero_is_rejected() {
        assert_eq!(
            compute(Operation::Div, "6", "0").unwrap_err(),
            ArithmeticError::DivisionByZero
        );
    }

    #[test]
    fn negates() {
        assert_eq!(compute(Operation::Neg, "3", "").unwrap(), -3.0);
    }

    #[test]
    fn rejects_unparsable_operand() {
        assert_eq!(
            compute(Operation::Add, "x", "2").unwrap_err(),
            ArithmeticError::InvalidOperator("x".to_string())
        );
    }

    #[test]
    fn rejects_unknown_wire_operation() {
        assert_eq!(
            parse_operation("%").unwrap_err(),
            ArithmeticError::InvalidOperation("%".to_string())
        );
    }

    #[test]
    fn resolves_known_wire_operation() {
        assert_eq!(parse_operation("+").unwrap(), Operation::Add);
    }
}
