//! Agent: a stateless worker pool that pulls elementary tasks from the
//! orchestrator, computes them, and submits results (spec §4.4).

pub mod client;
pub mod config;
pub mod error;
pub mod worker;

pub use config::AgentConfig;
pub use error::AgentError;
