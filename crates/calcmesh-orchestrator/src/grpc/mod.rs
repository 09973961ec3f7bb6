//! Orchestrator-side gRPC service (C7, spec §4.6, Part B §B6): the
//! transport agents use to pull tasks and submit results.

use calcmesh_shared::proto::calc_agent_service_server::CalcAgentService;
use calcmesh_shared::proto::{
    GetTaskRequest, GetTaskResponse, SubmitResultAck, SubmitResultRequest, Task as WireTask,
};
use tonic::{Request, Response, Status};

use crate::dispatcher::{Dispatcher, TaskOutcome};

#[derive(Clone)]
pub struct CalcAgentServer {
    dispatcher: Dispatcher,
}

impl CalcAgentServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        CalcAgentServer { dispatcher }
    }
}

#[tonic::async_trait]
impl CalcAgentService for CalcAgentServer {
    async fn get_task(
        &self,
        _request: Request<GetTaskRequest>,
    ) -> Result<Response<GetTaskResponse>, Status> {
        let task = self.dispatcher.get_task_for_agent().map(|task| WireTask {
            id: task.id,
            arg1: task.arg1,
            arg2: task.arg2,
            operation: task.operation,
        });

        Ok(Response::new(GetTaskResponse { task }))
    }

    async fn submit_result(
        &self,
        request: Request<SubmitResultRequest>,
    ) -> Result<Response<SubmitResultAck>, Status> {
        let body = request.into_inner();

        let outcome = if body.error.is_empty() {
            TaskOutcome::Ok(body.result)
        } else {
            TaskOutcome::Err(body.error)
        };

        self.dispatcher
            .submit_task_result(&body.id, outcome)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        Ok(Response::new(SubmitResultAck {}))
    }
}
