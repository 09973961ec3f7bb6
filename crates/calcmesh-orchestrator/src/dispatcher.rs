//! Task dispatcher (C3, spec §4.2): the pull-model handout of tasks to
//! agents and the expression state machine that advances on each
//! submitted result. This is the one place the registry, planner, and
//! persistence layer meet.

use std::sync::Arc;

use calcmesh_shared::domain::{ExpressionOutcome, ExpressionStatus, Task, TaskStatus};
use calcmesh_shared::planner::{self, next_task, PlannerError};
use chrono::Utc;
use uuid::Uuid;

use crate::error::OrchestratorError;
use crate::persistence::{ExpressionRecord, Store};
use crate::registry::{LiveExpression, Registry};

// `Arc<dyn Store>` has no blanket `Debug` impl, so this can't derive it
// without forcing every `Store` implementor to also be `dyn`-Debug-safe.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    store: Arc<dyn Store>,
}

/// What an agent reported back for a task: either a numeric success or
/// an error string (spec §4.2, §7).
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    Ok(f64),
    Err(String),
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, store: Arc<dyn Store>) -> Self {
        Dispatcher { registry, store }
    }

    /// `SubmitExpression` (§4.2): plan the expression, persist it, and —
    /// if planning produced at least a first task — register it as live.
    /// A planner error that fires before any task exists is persisted
    /// straight to `CompletedWithError`; no live entry is ever created.
    pub async fn submit_expression(&self, user_id: i64, text: &str) -> Result<i64, OrchestratorError> {
        let expression_id = self
            .store
            .create_expression(text, user_id, ExpressionStatus::Accepted.as_wire())
            .await?;

        let frame = match planner::plan(text) {
            Ok(frame) => frame,
            Err(err) => {
                self.fail_expression(expression_id, err).await?;
                return Ok(expression_id);
            }
        };

        match next_task(frame) {
            Ok((elementary, frame)) => {
                let task = Task {
                    id: format!("{expression_id}_{}", Uuid::new_v4()),
                    arg1: elementary.arg1,
                    arg2: elementary.arg2,
                    operation: elementary.operation.as_wire().to_string(),
                    status: TaskStatus::Accepted,
                    last_updated: Utc::now(),
                };

                self.registry.insert(LiveExpression {
                    expression_id,
                    user_id,
                    frame,
                    task: Some(task),
                });
            }
            Err(err) => {
                self.fail_expression(expression_id, err).await?;
            }
        }

        Ok(expression_id)
    }

    async fn fail_expression(&self, expression_id: i64, err: PlannerError) -> Result<(), OrchestratorError> {
        self.store
            .update_expression_result(
                expression_id,
                None,
                Some(&err.to_string()),
                ExpressionStatus::CompletedWithError.as_wire(),
            )
            .await?;
        Ok(())
    }

    /// `GetTaskForAgent` (§4.2): hand out at most one Accepted task.
    pub fn get_task_for_agent(&self) -> Option<Task> {
        self.registry.take_next_task()
    }

    /// `SubmitTaskResult` (§4.2): the result-handling algorithm, steps
    /// 1-7. Everything that mutates the live expression happens inside
    /// one `with_expression` call so it's atomic under the registry
    /// lock; the persistence write for a terminal result happens after,
    /// on the happy path, before the in-memory entry is deleted (I6).
    pub async fn submit_task_result(
        &self,
        task_id: &str,
        outcome: TaskOutcome,
    ) -> Result<(), OrchestratorError> {
        let Some(expression_id) = Task::expression_id_of(task_id) else {
            tracing::warn!(task_id, "task id missing expression prefix, dropping");
            return Ok(());
        };

        enum Next {
            Dropped,
            Terminal { value: Option<f64>, error: Option<String>, status: ExpressionStatus },
            Advanced { task: Task },
        }

        let outcome_for_closure = outcome.clone();
        let decision = self.registry.with_expression(expression_id, move |live| {
            let is_in_progress = matches!(
                &live.task,
                Some(task) if task.id == task_id && task.status == TaskStatus::InProgress
            );
            if !is_in_progress {
                return Next::Dropped;
            }

            match outcome_for_closure {
                TaskOutcome::Err(message) => Next::Terminal {
                    value: None,
                    error: Some(message),
                    status: ExpressionStatus::CompletedWithError,
                },
                TaskOutcome::Ok(value) => {
                    // A frame extracted by `next_task` always comes back with
                    // an empty stack (the task's own result isn't pushed until
                    // the agent reports back) — so the "is this the last task"
                    // check is "nothing left to extract", not `Frame::is_complete`,
                    // which describes the *post-push_result* shape instead.
                    if live.frame.postfix.is_empty() && live.frame.stack.is_empty() {
                        Next::Terminal {
                            value: Some(value),
                            error: None,
                            status: ExpressionStatus::Completed,
                        }
                    } else {
                        live.frame.push_result(format_number(value));
                        match next_task(live.frame.clone()) {
                            Ok((elementary, frame)) => {
                                let task = Task {
                                    id: format!("{expression_id}_{}", Uuid::new_v4()),
                                    arg1: elementary.arg1,
                                    arg2: elementary.arg2,
                                    operation: elementary.operation.as_wire().to_string(),
                                    status: TaskStatus::Accepted,
                                    last_updated: Utc::now(),
                                };
                                live.frame = frame;
                                live.task = Some(task.clone());
                                Next::Advanced { task }
                            }
                            Err(err) => Next::Terminal {
                                value: None,
                                error: Some(err.to_string()),
                                status: ExpressionStatus::CompletedWithError,
                            },
                        }
                    }
                }
            }
        });

        match decision {
            None | Some(Next::Dropped) => {
                tracing::debug!(task_id, "dropping result for unknown or stale task");
                Ok(())
            }
            Some(Next::Advanced { task }) => {
                tracing::info!(task_id = %task.id, expression_id, "expression advanced to next task");
                Ok(())
            }
            Some(Next::Terminal { value, error, status }) => {
                self.registry.remove(expression_id);
                self.store
                    .update_expression_result(expression_id, value, error.as_deref(), status.as_wire())
                    .await?;
                tracing::info!(expression_id, status = status.as_wire(), "expression completed");
                Ok(())
            }
        }
    }

    pub async fn get_expression_by_id(
        &self,
        user_id: i64,
        id: i64,
    ) -> Result<Option<ExpressionView>, OrchestratorError> {
        let record = self.store.get_expression_by_id(id, user_id).await?;
        Ok(record.map(ExpressionView::from))
    }

    pub async fn get_expressions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ExpressionView>, OrchestratorError> {
        let records = self.store.get_expressions_by_user(user_id).await?;
        Ok(records.into_iter().map(ExpressionView::from).collect())
    }
}

fn format_number(value: f64) -> String {
    value.to_string()
}

/// Read-facing projection of an expression: the tagged
/// running/numeric/error variant from spec §9, made concrete.
#[derive(Debug, Clone)]
pub struct ExpressionView {
    pub id: i64,
    pub expression: String,
    pub status: String,
    pub outcome: ExpressionOutcome,
}

impl From<ExpressionRecord> for ExpressionView {
    fn from(record: ExpressionRecord) -> Self {
        let outcome = if let Some(text) = record.result_text {
            ExpressionOutcome::Error(text)
        } else if let Some(value) = record.result {
            ExpressionOutcome::Numeric(value)
        } else {
            ExpressionOutcome::Running
        };

        ExpressionView {
            id: record.id,
            expression: record.expression,
            status: record.status,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStore;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(Registry::new()), Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn simple_sum_completes_with_expected_value() {
        let dispatcher = dispatcher();
        let expr_id = dispatcher.submit_expression(1, "2+2").await.unwrap();

        let task = dispatcher.get_task_for_agent().expect("task should be ready");
        assert_eq!(task.operation, "+");

        dispatcher
            .submit_task_result(&task.id, TaskOutcome::Ok(4.0))
            .await
            .unwrap();

        let view = dispatcher.get_expression_by_id(1, expr_id).await.unwrap().unwrap();
        assert_eq!(view.status, "completed");
        assert!(matches!(view.outcome, ExpressionOutcome::Numeric(v) if v == 4.0));
    }

    #[tokio::test]
    async fn chained_operations_each_produce_one_task() {
        let dispatcher = dispatcher();
        let expr_id = dispatcher.submit_expression(1, "2+2*2").await.unwrap();

        let first = dispatcher.get_task_for_agent().expect("first task");
        assert_eq!(first.operation, "*");
        dispatcher.submit_task_result(&first.id, TaskOutcome::Ok(4.0)).await.unwrap();

        let second = dispatcher.get_task_for_agent().expect("second task");
        assert_eq!(second.operation, "+");
        dispatcher.submit_task_result(&second.id, TaskOutcome::Ok(6.0)).await.unwrap();

        let view = dispatcher.get_expression_by_id(1, expr_id).await.unwrap().unwrap();
        assert!(matches!(view.outcome, ExpressionOutcome::Numeric(v) if v == 6.0));
    }

    #[tokio::test]
    async fn division_by_zero_completes_with_error() {
        let dispatcher = dispatcher();
        let expr_id = dispatcher.submit_expression(1, "6/0").await.unwrap();

        let task = dispatcher.get_task_for_agent().expect("task");
        dispatcher
            .submit_task_result(&task.id, TaskOutcome::Err("devision by zero".to_string()))
            .await
            .unwrap();

        let view = dispatcher.get_expression_by_id(1, expr_id).await.unwrap().unwrap();
        assert_eq!(view.status, "completed with error");
        assert!(matches!(view.outcome, ExpressionOutcome::Error(ref e) if e == "devision by zero"));
    }

    #[tokio::test]
    async fn unbalanced_parenthesis_fails_before_any_task_exists() {
        let dispatcher = dispatcher();
        let expr_id = dispatcher.submit_expression(1, "2+(").await.unwrap();

        assert!(dispatcher.get_task_for_agent().is_none());

        let view = dispatcher.get_expression_by_id(1, expr_id).await.unwrap().unwrap();
        assert_eq!(view.status, "completed with error");
        assert!(matches!(view.outcome, ExpressionOutcome::Error(ref e) if e == "no closing parenthesis"));
    }

    #[tokio::test]
    async fn duplicate_result_submission_is_idempotent() {
        let dispatcher = dispatcher();
        let expr_id = dispatcher.submit_expression(1, "2+2").await.unwrap();

        let task = dispatcher.get_task_for_agent().unwrap();
        dispatcher.submit_task_result(&task.id, TaskOutcome::Ok(4.0)).await.unwrap();
        // Second submission for the same (now-removed) task id must be a no-op.
        dispatcher.submit_task_result(&task.id, TaskOutcome::Ok(999.0)).await.unwrap();

        let view = dispatcher.get_expression_by_id(1, expr_id).await.unwrap().unwrap();
        assert!(matches!(view.outcome, ExpressionOutcome::Numeric(v) if v == 4.0));
    }

    #[tokio::test]
    async fn expressions_are_scoped_per_user() {
        let dispatcher = dispatcher();
        dispatcher.submit_expression(1, "1+2").await.unwrap();
        dispatcher.submit_expression(2, "3*4").await.unwrap();

        let user_1 = dispatcher.get_expressions_by_user(1).await.unwrap();
        let user_2 = dispatcher.get_expressions_by_user(2).await.unwrap();
        assert_eq!(user_1.len(), 1);
        assert_eq!(user_2.len(), 1);
    }
}
