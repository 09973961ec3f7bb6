//! Fetcher-to-workers pipeline (C5, spec §4.4): one long-running fetcher
//! polls the orchestrator and enqueues tasks on a bounded channel;
//! `computing_power` parallel workers drain it, simulate the configured
//! per-operator latency, compute, and submit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use calcmesh_shared::arithmetic;
use calcmesh_shared::domain::Task;
use tokio::sync::mpsc;

use crate::client::OrchestratorClient;
use crate::config::AgentConfig;
use crate::error::AgentError;

const TASK_CHANNEL_CAPACITY: usize = 100;
const IDLE_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Adds up to 20% jitter to the idle poll interval so a fleet of agents
/// doesn't settle into a synchronized polling beat against one orchestrator.
fn jittered_idle_interval() -> std::time::Duration {
    let jitter_ms = fastrand::u64(0..=(IDLE_POLL_INTERVAL.as_millis() as u64 / 5));
    IDLE_POLL_INTERVAL + std::time::Duration::from_millis(jitter_ms)
}

/// Propagates "stop working" from whichever of the fetcher or a worker
/// first hits a fatal transport error (spec §5: the agent cancels its
/// whole pipeline on transport unavailability).
#[derive(Debug, Clone, Default)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn new() -> Self {
        Cancel(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run the fetcher and the worker pool until a transport failure occurs
/// or `cancel` fires, whichever comes first.
pub async fn run(config: Arc<AgentConfig>, client: OrchestratorClient, cancel: Cancel) {
    let (tx, rx) = mpsc::channel::<Task>(TASK_CHANNEL_CAPACITY);
    let rx = Arc::new(tokio::sync::Mutex::new(rx));

    let fetcher_client = client.clone();
    let fetcher_cancel = cancel.clone();
    let fetcher = tokio::spawn(fetch_loop(fetcher_client, tx, fetcher_cancel));

    let mut workers = Vec::with_capacity(config.computing_power);
    for worker_id in 0..config.computing_power {
        let worker_client = client.clone();
        let worker_rx = rx.clone();
        let worker_config = config.clone();
        let worker_cancel = cancel.clone();
        workers.push(tokio::spawn(worker_loop(
            worker_id,
            worker_config,
            worker_client,
            worker_rx,
            worker_cancel,
        )));
    }

    let _ = fetcher.await;
    for worker in workers {
        let _ = worker.await;
    }
}

async fn fetch_loop(mut client: OrchestratorClient, tx: mpsc::Sender<Task>, cancel: Cancel) {
    loop {
        if cancel.is_cancelled() {
            return;
        }

        match client.get_task().await {
            Ok(Some(task)) => {
                tracing::debug!(task_id = %task.id, "fetched task");
                if tx.send(task).await.is_err() {
                    return;
                }
            }
            Ok(None) => {
                tokio::time::sleep(jittered_idle_interval()).await;
            }
            Err(err) => {
                if err.is_fatal() {
                    tracing::error!(error = %err, "transport unavailable, fetcher exiting");
                    cancel.cancel();
                    return;
                }
                tracing::warn!(error = %err, "transient fetch error, retrying");
                tokio::time::sleep(jittered_idle_interval()).await;
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    config: Arc<AgentConfig>,
    mut client: OrchestratorClient,
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Task>>>,
    cancel: Cancel,
) {
    loop {
        let task = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };

        let Some(task) = task else {
            return;
        };

        if cancel.is_cancelled() {
            return;
        }

        // The wire operator is resolved here, not by the orchestrator or the
        // fetcher, so an operator a stray/mismatched agent doesn't recognize
        // still comes back to the orchestrator as `ErrInvalidOperation`
        // instead of vanishing as a dropped task.
        let (result, error) = match arithmetic::parse_operation(&task.operation) {
            Ok(operation) => {
                tokio::time::sleep(config.latency_for(operation)).await;
                match arithmetic::compute(operation, &task.arg1, &task.arg2) {
                    Ok(value) => (value, String::new()),
                    Err(e) => (0.0, e.to_string()),
                }
            }
            Err(e) => (0.0, e.to_string()),
        };

        if let Err(e) = client.submit_result(&task.id, result, &error).await {
            tracing::warn!(worker_id, task_id = %task.id, error = %e, "failed to submit result");
            if e.is_fatal() {
                cancel.cancel();
                return;
            }
        } else {
            tracing::info!(worker_id, task_id = %task.id, "task completed");
        }
    }
}
