//! Restartable postfix evaluation (spec §4.1, §4.2).
//!
//! A [`Frame`] is the suspended state of an in-progress evaluation: the
//! postfix tokens not yet consumed, and the stack of already-known
//! operand values. [`next_task`] advances the frame by exactly one
//! elementary task — it consumes operand tokens off the front of the
//! postfix queue until it hits an operator, pops that operator's
//! operands off the stack, and hands back the task alongside the
//! now-shorter frame. It does **not** push a placeholder for the task's
//! own result: the caller holds the task out-of-band until the agent
//! reports back, then calls [`Frame::push_result`] before asking for the
//! next task. This is what makes a frame safe to park in the registry
//! between a `GetTask` and the matching `SubmitResult`.

use std::collections::VecDeque;

use super::errors::PlannerError;
use super::token::Token;
use crate::domain::Operation;

#[derive(Debug, Clone)]
pub struct Frame {
    pub postfix: VecDeque<Token>,
    pub stack: Vec<String>,
}

impl Frame {
    pub fn new(postfix: Vec<Token>) -> Self {
        Frame {
            postfix: postfix.into_iter().collect(),
            stack: Vec::new(),
        }
    }

    /// Record the value an agent computed for the most recently issued
    /// task, making it available as an operand for whatever comes next.
    pub fn push_result(&mut self, value: String) {
        self.stack.push(value);
    }

    /// A frame is done once every token has been consumed and exactly one
    /// value — the expression's result — remains on the stack.
    pub fn is_complete(&self) -> bool {
        self.postfix.is_empty() && self.stack.len() == 1
    }

    pub fn final_value(&self) -> Option<&str> {
        if self.is_complete() {
            self.stack.last().map(String::as_str)
        } else {
            None
        }
    }
}

/// One elementary operation ready to hand to an agent: two pre-resolved
/// string operands (spec §4.4 keeps arithmetic on strings at the wire
/// level) and the operator to apply. `arg2` is empty for unary `Neg`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementaryTask {
    pub arg1: String,
    pub arg2: String,
    pub operation: Operation,
}

/// Advance `frame` by one elementary task.
///
/// Numbers are pushed onto the stack as they're encountered; the first
/// operator found pops its operands straight off that stack and is
/// returned as a task. Because a valid postfix stream never asks an
/// operator to consume more than is on the stack, an empty pop here
/// means the expression was malformed going in.
pub fn next_task(mut frame: Frame) -> Result<(ElementaryTask, Frame), PlannerError> {
    loop {
        match frame.postfix.pop_front() {
            None => return Err(PlannerError::EmptyExpression),
            Some(Token::Number(n)) => frame.stack.push(n),
            Some(Token::LParen) | Some(Token::RParen) => {
                return Err(PlannerError::InvalidExpression)
            }
            Some(Token::Unknown(_)) => return Err(PlannerError::InvalidExpression),
            Some(tok) if tok.is_operator() => {
                let operation = Operation::from_token(&tok)
                    .expect("operator token always maps to an Operation");
                let task = if operation.is_unary() {
                    let arg1 = frame.stack.pop().ok_or(PlannerError::ShortExpression)?;
                    ElementaryTask {
                        arg1,
                        arg2: String::new(),
                        operation,
                    }
                } else {
                    let arg2 = frame.stack.pop().ok_or(PlannerError::ShortExpression)?;
                    let arg1 = frame.stack.pop().ok_or(PlannerError::ShortExpression)?;
                    ElementaryTask {
                        arg1,
                        arg2,
                        operation,
                    }
                };
                return Ok((task, frame));
            }
            Some(_) => return Err(PlannerError::InvalidExpression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::shunting_yard::to_postfix;
    use crate::planner::token::tokenize;

    fn frame_for(expression: &str) -> Frame {
        let postfix = to_postfix(tokenize(expression)).expect("valid expression");
        Frame::new(postfix)
    }

    #[test]
    fn single_operation_completes_in_one_task() {
        let frame = frame_for("2+2");
        let (task, frame) = next_task(frame).expect("task");
        assert_eq!(task.arg1, "2");
        assert_eq!(task.arg2, "2");
        assert_eq!(task.operation, Operation::Add);
        assert!(frame.postfix.is_empty());
        assert!(frame.stack.is_empty());
    }

    #[test]
    fn chained_operations_require_result_to_advance() {
        let frame = frame_for("2+2*2");
        let (task, mut frame) = next_task(frame).expect("first task");
        assert_eq!(task.operation, Operation::Mul);
        assert_eq!((task.arg1.as_str(), task.arg2.as_str()), ("2", "2"));

        frame.push_result("4".to_string());
        let (task, frame) = next_task(frame).expect("second task");
        assert_eq!(task.operation, Operation::Add);
        assert_eq!((task.arg1.as_str(), task.arg2.as_str()), ("2", "4"));
        assert!(frame.is_complete() == false);
    }

    #[test]
    fn unary_negation_task_has_empty_arg2() {
        let frame = frame_for("-3+4");
        let (task, mut frame) = next_task(frame).expect("neg task");
        assert_eq!(task.operation, Operation::Neg);
        assert_eq!(task.arg1, "3");
        assert_eq!(task.arg2, "");

        frame.push_result("-3".to_string());
        let (task, frame) = next_task(frame).expect("add task");
        assert_eq!(task.operation, Operation::Add);
        assert_eq!((task.arg1.as_str(), task.arg2.as_str()), ("-3", "4"));
        assert!(frame.postfix.is_empty());
    }

    #[test]
    fn frame_reports_completion_after_final_result() {
        let frame = frame_for("2+2");
        let (_task, mut frame) = next_task(frame).expect("task");
        assert!(!frame.is_complete());
        frame.push_result("4".to_string());
        assert!(frame.is_complete());
        assert_eq!(frame.final_value(), Some("4"));
    }
}
