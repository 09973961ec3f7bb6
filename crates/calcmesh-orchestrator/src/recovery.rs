//! Recovery loop (C4, spec §4.3): the sole liveness mechanism. Every 60
//! seconds it sweeps the registry and reverts any task that has been
//! InProgress for more than 120 seconds back to Accepted, so an agent
//! that died between fetch and submit never strands an expression.
//!
//! Both constants are fixed, not configurable (§9 Open Question
//! decision) — exposing them as knobs would let an operator misconfigure
//! away the liveness guarantee §8 relies on.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;

use crate::registry::Registry;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const STALENESS_THRESHOLD_SECS: i64 = 120;

/// Spawn the background sweep as a detached task. Returns its
/// `JoinHandle` so callers can abort it on shutdown.
pub fn spawn(registry: Arc<Registry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let revived = registry.recover_stale_tasks(ChronoDuration::seconds(STALENESS_THRESHOLD_SECS));
            if !revived.is_empty() {
                tracing::warn!(count = revived.len(), task_ids = ?revived, "recovered stale tasks");
            }
        }
    })
}
