//! Wiring: build the shared application state and spawn the orchestrator's
//! two servers (HTTP and gRPC) plus the recovery loop, mirroring the
//! teacher's bootstrap-struct convention of one long-lived handle holding
//! every running piece instead of module-level globals (§9).

use std::net::SocketAddr;
use std::sync::Arc;

use calcmesh_shared::proto::calc_agent_service_server::CalcAgentServiceServer;
use tokio::task::JoinHandle;

use crate::config::OrchestratorConfig;
use crate::dispatcher::Dispatcher;
use crate::error::OrchestratorError;
use crate::grpc::CalcAgentServer;
use crate::persistence::{PgStore, Store};
use crate::registry::Registry;
use crate::{http, recovery};

/// State shared across every axum handler: configuration, the
/// persistence handle, and the dispatcher that fronts the registry.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OrchestratorConfig>,
    pub store: Arc<dyn Store>,
    pub dispatcher: Dispatcher,
}

pub struct OrchestratorHandle {
    pub config: OrchestratorConfig,
    http_server: JoinHandle<()>,
    grpc_server: JoinHandle<()>,
    recovery_loop: JoinHandle<()>,
}

impl OrchestratorHandle {
    pub async fn stop(self) -> Result<(), OrchestratorError> {
        self.http_server.abort();
        self.grpc_server.abort();
        self.recovery_loop.abort();
        Ok(())
    }
}

pub async fn bootstrap(config: OrchestratorConfig) -> Result<OrchestratorHandle, OrchestratorError> {
    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;

    bootstrap_with_store(config, Arc::new(store)).await
}

/// Split out from [`bootstrap`] so integration tests can substitute an
/// in-memory store without a live Postgres instance (Part B §B7).
pub async fn bootstrap_with_store(
    config: OrchestratorConfig,
    store: Arc<dyn Store>,
) -> Result<OrchestratorHandle, OrchestratorError> {
    let registry = Arc::new(Registry::new());
    let dispatcher = Dispatcher::new(registry.clone(), store.clone());

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        dispatcher: dispatcher.clone(),
    };

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_server_port));
    let router = http::router(state);
    let http_server = tokio::spawn(async move {
        let listener = match tokio::net::TcpListener::bind(http_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, "failed to bind HTTP listener");
                return;
            }
        };
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "HTTP server exited with error");
        }
    });

    let grpc_addr = SocketAddr::from(([0, 0, 0, 0], config.grpc_server_port));
    let grpc_service = CalcAgentServer::new(dispatcher);
    let grpc_server = tokio::spawn(async move {
        if let Err(e) = tonic::transport::Server::builder()
            .add_service(CalcAgentServiceServer::new(grpc_service))
            .serve(grpc_addr)
            .await
        {
            tracing::error!(error = %e, "gRPC server exited with error");
        }
    });

    let recovery_loop = recovery::spawn(registry);

    Ok(OrchestratorHandle {
        config,
        http_server,
        grpc_server,
        recovery_loop,
    })
}
