//! Agent process binary. Terminates on orchestrator transport
//! unavailability so an external supervisor can restart it (spec §4.4).

use tracing::{error, info};

use calcmesh_agent::client::OrchestratorClient;
use calcmesh_agent::worker::{self, Cancel};
use calcmesh_agent::AgentConfig;
use calcmesh_shared::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing("calcmesh_agent");

    let config = std::sync::Arc::new(AgentConfig::load()?);
    info!(
        computing_power = config.computing_power,
        orchestrator_endpoint = %config.orchestrator_endpoint,
        "starting calcmesh agent"
    );

    let client = OrchestratorClient::connect(&config.orchestrator_endpoint)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let cancel = Cancel::new();
    worker::run(config, client, cancel).await;

    error!("worker pool exited, shutting down agent process");
    std::process::exit(1);
}
