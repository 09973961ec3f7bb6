//! Wire-level domain types shared by the orchestrator and agent: the
//! operator alphabet, task/expression status strings, and the tagged
//! running/ok/err result variant described in spec §3 and §9.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planner::token::Token;

/// The five elementary operations an agent can execute (spec §3, §4.4).
///
/// `Neg` is the internal unary-negation marker `~`; it never appears in
/// user input and is only ever produced by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
}

impl Operation {
    /// The on-the-wire single-character representation (spec §6: `+ - * / ~`).
    pub fn as_wire(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "*",
            Operation::Div => "/",
            Operation::Neg => "~",
        }
    }

    pub fn from_wire(s: &str) -> Option<Operation> {
        match s {
            "+" => Some(Operation::Add),
            "-" => Some(Operation::Sub),
            "*" => Some(Operation::Mul),
            "/" => Some(Operation::Div),
            "~" => Some(Operation::Neg),
            _ => None,
        }
    }

    pub fn from_token(token: &Token) -> Option<Operation> {
        match token {
            Token::Plus => Some(Operation::Add),
            Token::Minus => Some(Operation::Sub),
            Token::Star => Some(Operation::Mul),
            Token::Slash => Some(Operation::Div),
            Token::Neg => Some(Operation::Neg),
            _ => None,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Operation::Neg)
    }

    /// Precedence used by the Shunting-Yard conversion (spec §4.1).
    pub fn precedence(self) -> u8 {
        match self {
            Operation::Add | Operation::Sub => 1,
            Operation::Mul | Operation::Div => 2,
            Operation::Neg => 3,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Status of a single elementary task (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Accepted,
    InProgress,
}

/// A task is ephemeral — it only exists between creation and result
/// submission (spec §3).
///
/// `operation` is carried as its wire character, not the `Operation`
/// enum: the orchestrator never executes an operation, only hands the
/// task out and waits for a result, so nothing here needs it resolved.
/// An agent that doesn't recognize the operator still gets the full
/// task and can report `ErrInvalidOperation` back, instead of the
/// orchestrator silently resolving (and potentially dropping) it first.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub arg1: String,
    pub arg2: String,
    pub operation: String,
    pub status: TaskStatus,
    pub last_updated: DateTime<Utc>,
}

impl Task {
    /// Parse the expression id out of the `<expr_id>_<uuid>` task id
    /// convention (spec §3, §6). The prefix is authoritative routing data.
    pub fn expression_id_of(task_id: &str) -> Option<i64> {
        task_id.split('_').next()?.parse().ok()
    }
}

/// Status of an expression, as persisted (spec §3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionStatus {
    Accepted,
    InProgress,
    Completed,
    CompletedWithError,
}

impl ExpressionStatus {
    pub fn as_wire(self) -> &'static str {
        match self {
            ExpressionStatus::Accepted => "accepted",
            ExpressionStatus::InProgress => "in progress",
            ExpressionStatus::Completed => "completed",
            ExpressionStatus::CompletedWithError => "completed with error",
        }
    }

    pub fn from_wire(s: &str) -> Option<ExpressionStatus> {
        match s {
            "accepted" => Some(ExpressionStatus::Accepted),
            "in progress" => Some(ExpressionStatus::InProgress),
            "completed" => Some(ExpressionStatus::Completed),
            "completed with error" => Some(ExpressionStatus::CompletedWithError),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExpressionStatus::Completed | ExpressionStatus::CompletedWithError
        )
    }
}

/// The tagged `Running | Ok(number) | Err(string)` variant from spec §9,
/// made concrete for serialization over the user-facing HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ExpressionOutcome {
    Running,
    Numeric(f64),
    Error(String),
}
