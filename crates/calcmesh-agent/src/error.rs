//! Agent error type (Part B §B2): distinguishes transport failures the
//! agent must exit on from task-local failures it should just log and
//! keep working through, mirroring the teacher client error's fatal/
//! recoverable split.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("orchestrator unavailable: {0}")]
    TransportUnavailable(#[from] tonic::transport::Error),

    #[error("orchestrator rejected request: {0}")]
    Rpc(#[from] tonic::Status),

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] calcmesh_shared::arithmetic::ArithmeticError),
}

impl AgentError {
    /// Transport unavailability is the only condition the spec (§4.4,
    /// §4.6) says should terminate the agent process; everything else
    /// is local to one task and shouldn't bring the worker pool down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::TransportUnavailable(_))
            || matches!(self, AgentError::Rpc(status) if status.code() == tonic::Code::Unavailable)
    }
}
