//! Orchestrator: the user-facing REST API, the in-memory task registry
//! and dispatcher, the recovery loop, and the gRPC service agents pull
//! tasks from.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod grpc;
pub mod http;
pub mod persistence;
pub mod recovery;
pub mod registry;

pub use bootstrap::{bootstrap, bootstrap_with_store, AppState, OrchestratorHandle};
pub use config::OrchestratorConfig;
pub use error::OrchestratorError;
