//! Orchestrator server binary: the production deployment target.

use tokio::signal;
use tracing::{error, info};

use calcmesh_orchestrator::{bootstrap, OrchestratorConfig};
use calcmesh_shared::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing("calcmesh_orchestrator");

    info!("starting calcmesh orchestrator");
    info!(version = env!("CARGO_PKG_VERSION"), "build info");

    let config = OrchestratorConfig::load()?;
    let handle = bootstrap(config).await.map_err(|e| anyhow::anyhow!(e.to_string()))?;

    info!(
        http_port = handle.config.http_server_port,
        grpc_port = handle.config.grpc_server_port,
        "orchestrator started"
    );
    info!("press Ctrl+C to shut down");

    shutdown_signal().await;
    info!("shutdown signal received");

    if let Err(e) = handle.stop().await {
        error!(error = %e, "error while stopping orchestrator");
    }

    info!("orchestrator shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
