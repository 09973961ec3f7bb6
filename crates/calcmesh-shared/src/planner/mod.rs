//! Expression-to-task planner (spec §4.1, component C1).
//!
//! Planning is pure and synchronous: tokenize, resolve unary minus and
//! convert to postfix via Shunting-Yard, then extract elementary tasks one
//! at a time from a suspended `(remaining_postfix, value_stack)` frame.
//! None of this module talks to the network or the registry — that
//! separation is what lets the orchestrator never block on arithmetic.

pub mod errors;
pub mod frame;
pub mod shunting_yard;
pub mod token;

pub use errors::PlannerError;
pub use frame::{next_task, ElementaryTask, Frame};
pub use shunting_yard::to_postfix;
pub use token::{tokenize, Token};

/// Tokenize and convert straight to a postfix `Frame` with an empty value
/// stack, ready for the first call to [`next_task`].
pub fn plan(expression: &str) -> Result<Frame, PlannerError> {
    let tokens = tokenize(expression);
    let postfix = to_postfix(tokens)?;
    Ok(Frame::new(postfix))
}
