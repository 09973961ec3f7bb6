use thiserror::Error;

/// Deterministic, per-expression planning errors (spec §4.1, §7).
///
/// These surface as the expression's terminal result string — the wire
/// text is kept identical to the system this spec was distilled from so
/// clients that already know those strings keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("too short expression")]
    ShortExpression,
    #[error("no opening parenthesis")]
    NoOpeningParenthesis,
    #[error("no closing parenthesis")]
    NoClosingParenthesis,
    #[error("expression is not valid")]
    InvalidExpression,
}
