//! The live-expression registry (C2): the sole shared mutable structure
//! in the orchestrator (spec §5). A single mutex guards a keyed map from
//! expression id to its in-flight evaluation state (§9: a keyed map, not
//! an index-by-position slice, so deleting a terminal expression never
//! shifts another expression's id).

use std::collections::HashMap;
use std::sync::Mutex;

use calcmesh_shared::domain::{Task, TaskStatus};
use calcmesh_shared::planner::Frame;
use chrono::Utc;

/// An expression still being evaluated: its user, its suspended
/// evaluation frame, and the single live task (if any) driving it
/// forward (I1).
#[derive(Debug, Clone)]
pub struct LiveExpression {
    pub expression_id: i64,
    pub user_id: i64,
    pub frame: Frame,
    pub task: Option<Task>,
}

/// Thread-safe registry of expressions in flight. Every mutation —
/// insert, task creation, state transition, delete — happens under the
/// lock for the duration of exactly one logical operation; nothing here
/// ever awaits while holding the guard.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<HashMap<i64, LiveExpression>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, expr: LiveExpression) {
        let mut guard = self.inner.lock().expect("registry mutex poisoned");
        guard.insert(expr.expression_id, expr);
    }

    pub fn remove(&self, expression_id: i64) -> Option<LiveExpression> {
        let mut guard = self.inner.lock().expect("registry mutex poisoned");
        guard.remove(&expression_id)
    }

    pub fn contains(&self, expression_id: i64) -> bool {
        let guard = self.inner.lock().expect("registry mutex poisoned");
        guard.contains_key(&expression_id)
    }

    pub fn len(&self) -> usize {
        let guard = self.inner.lock().expect("registry mutex poisoned");
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand out at most one Accepted task, transitioning it to
    /// InProgress and stamping the handout time (I2, I3). Iteration
    /// order over a `HashMap` isn't insertion order, but it's stable
    /// enough between calls that no Accepted task is starved by a
    /// steady stream of new expressions — the weak fairness §4.2 asks
    /// for, not strict FIFO.
    pub fn take_next_task(&self) -> Option<Task> {
        let mut guard = self.inner.lock().expect("registry mutex poisoned");
        for live in guard.values_mut() {
            if let Some(task) = &mut live.task {
                if task.status == TaskStatus::Accepted {
                    task.status = TaskStatus::InProgress;
                    task.last_updated = Utc::now();
                    return Some(task.clone());
                }
            }
        }
        None
    }

    /// Run `f` against the live expression for `expression_id` under the
    /// lock, returning whatever `f` returns. Used by the dispatcher so
    /// the whole result-handling algorithm in §4.2 runs atomically.
    pub fn with_expression<R>(
        &self,
        expression_id: i64,
        f: impl FnOnce(&mut LiveExpression) -> R,
    ) -> Option<R> {
        let mut guard = self.inner.lock().expect("registry mutex poisoned");
        guard.get_mut(&expression_id).map(f)
    }

    /// Recovery sweep (C4, §4.3): any task InProgress and stale gets
    /// reverted to Accepted with a refreshed timestamp. Returns the ids
    /// of tasks it revived, for logging.
    pub fn recover_stale_tasks(&self, staleness: chrono::Duration) -> Vec<String> {
        let mut revived = Vec::new();
        let now = Utc::now();
        let mut guard = self.inner.lock().expect("registry mutex poisoned");
        for live in guard.values_mut() {
            if let Some(task) = &mut live.task {
                if task.status == TaskStatus::InProgress && now - task.last_updated > staleness {
                    task.status = TaskStatus::Accepted;
                    task.last_updated = now;
                    revived.push(task.id.clone());
                }
            }
        }
        revived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcmesh_shared::planner::plan;

    fn sample_live(expression_id: i64, user_id: i64) -> LiveExpression {
        let frame = plan("2+2").expect("valid expression");
        LiveExpression {
            expression_id,
            user_id,
            frame,
            task: Some(Task {
                id: format!("{expression_id}_task-1"),
                arg1: "2".to_string(),
                arg2: "2".to_string(),
                operation: "+".to_string(),
                status: TaskStatus::Accepted,
                last_updated: Utc::now(),
            }),
        }
    }

    #[test]
    fn take_next_task_transitions_to_in_progress() {
        let registry = Registry::new();
        registry.insert(sample_live(1, 100));

        let task = registry.take_next_task().expect("a task should be ready");
        assert_eq!(task.status, TaskStatus::InProgress);

        assert!(registry.take_next_task().is_none());
    }

    #[test]
    fn recover_stale_tasks_reverts_old_in_progress() {
        let registry = Registry::new();
        let mut live = sample_live(2, 100);
        if let Some(task) = &mut live.task {
            task.status = TaskStatus::InProgress;
            task.last_updated = Utc::now() - chrono::Duration::seconds(200);
        }
        registry.insert(live);

        let revived = registry.recover_stale_tasks(chrono::Duration::seconds(120));
        assert_eq!(revived.len(), 1);

        let task = registry.take_next_task().expect("revived task is Accepted again");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn fresh_in_progress_task_is_left_alone() {
        let registry = Registry::new();
        let mut live = sample_live(3, 100);
        if let Some(task) = &mut live.task {
            task.status = TaskStatus::InProgress;
            task.last_updated = Utc::now();
        }
        registry.insert(live);

        let revived = registry.recover_stale_tasks(chrono::Duration::seconds(120));
        assert!(revived.is_empty());
    }

    #[test]
    fn remove_deletes_terminal_expression() {
        let registry = Registry::new();
        registry.insert(sample_live(4, 100));
        assert!(registry.contains(4));

        registry.remove(4);
        assert!(!registry.contains(4));
    }
}
