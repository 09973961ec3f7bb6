//! Workspace root crate.
//!
//! Carries no production code of its own — `calcmesh-shared`,
//! `calcmesh-orchestrator`, and `calcmesh-agent` hold the implementation.
//! This crate exists so end-to-end tests under `tests/` can depend on the
//! whole workspace at once, mirroring how the teacher codebase keeps its
//! root crate free of library code and moves everything into workspace
//! members.
