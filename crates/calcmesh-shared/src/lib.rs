//! Types and logic shared by the orchestrator and agent binaries:
//! the wire-level domain model, the pure expression planner, elementary
//! arithmetic, the generated gRPC transport, and a common logging
//! bootstrap.
//!
//! Nothing in this crate talks to Postgres, HTTP, or the network itself —
//! that belongs to the binaries that depend on it.

pub mod arithmetic;
pub mod domain;
pub mod logging;
pub mod planner;
pub mod proto;
