//! Thin wrapper around the generated gRPC client (C7, spec §4.6).

use calcmesh_shared::domain::Task;
use calcmesh_shared::proto::calc_agent_service_client::CalcAgentServiceClient;
use calcmesh_shared::proto::{GetTaskRequest, SubmitResultRequest};
use tonic::transport::Channel;

use crate::error::AgentError;

#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    inner: CalcAgentServiceClient<Channel>,
}

impl OrchestratorClient {
    pub async fn connect(endpoint: &str) -> Result<Self, AgentError> {
        let inner = CalcAgentServiceClient::connect(endpoint.to_string()).await?;
        Ok(OrchestratorClient { inner })
    }

    /// `GetTask()` (§4.6). A `None` response is the normal idle signal,
    /// never an error. The operator string is handed back unresolved —
    /// an unrecognized one still reaches the worker pool so it can be
    /// reported to the orchestrator as `ErrInvalidOperation`, instead of
    /// being silently indistinguishable from "no task available".
    pub async fn get_task(&mut self) -> Result<Option<Task>, AgentError> {
        let response = self.inner.get_task(GetTaskRequest {}).await?.into_inner();
        Ok(response.task.map(|t| Task {
            id: t.id,
            arg1: t.arg1,
            arg2: t.arg2,
            operation: t.operation,
            status: calcmesh_shared::domain::TaskStatus::Accepted,
            last_updated: chrono::Utc::now(),
        }))
    }

    pub async fn submit_result(&mut self, task_id: &str, result: f64, error: &str) -> Result<(), AgentError> {
        self.inner
            .submit_result(SubmitResultRequest {
                id: task_id.to_string(),
                result,
                error: error.to_string(),
            })
            .await?;
        Ok(())
    }
}
