//! Generated gRPC client/server code for the orchestrator-agent transport
//! (C7), built from `proto/calcmesh.proto` by `tonic-build` at compile
//! time.

tonic::include_proto!("calcmesh");
