//! Shared `tracing` bootstrap used by both the orchestrator and agent
//! binaries, so `RUST_LOG` behaves identically across the whole system.

use tracing_subscriber::EnvFilter;

/// Install a `tracing_subscriber::fmt` layer filtered by `RUST_LOG`,
/// defaulting to `info` for `binary_name` and `warn` for everything else.
pub fn init_tracing(binary_name: &str) {
    let default_directive = format!("{binary_name}=info,warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
