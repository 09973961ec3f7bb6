//! In-memory `Store` fake used by dispatcher/registry tests so the
//! state machine can be exercised without a live Postgres instance
//! (Part B §B7).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ExpressionRecord, Store, UserRecord};
use crate::error::OrchestratorError;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<UserRecord>>,
    expressions: Mutex<Vec<ExpressionRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<UserRecord, OrchestratorError> {
        let mut users = self.users.lock().expect("store mutex poisoned");
        let id = users.len() as i64 + 1;
        let record = UserRecord {
            id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<UserRecord>, OrchestratorError> {
        let users = self.users.lock().expect("store mutex poisoned");
        Ok(users.iter().find(|u| u.login == login).cloned())
    }

    async fn create_expression(
        &self,
        expression: &str,
        user_id: i64,
        status: &str,
    ) -> Result<i64, OrchestratorError> {
        let mut expressions = self.expressions.lock().expect("store mutex poisoned");
        let id = expressions.len() as i64 + 1;
        expressions.push(ExpressionRecord {
            id,
            expression: expression.to_string(),
            user_id,
            status: status.to_string(),
            result: None,
            result_text: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_expression_by_id(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ExpressionRecord>, OrchestratorError> {
        let expressions = self.expressions.lock().expect("store mutex poisoned");
        Ok(expressions
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn get_expressions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ExpressionRecord>, OrchestratorError> {
        let expressions = self.expressions.lock().expect("store mutex poisoned");
        let mut matching: Vec<ExpressionRecord> = expressions
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_expression_status(&self, id: i64, status: &str) -> Result<(), OrchestratorError> {
        let mut expressions = self.expressions.lock().expect("store mutex poisoned");
        if let Some(record) = expressions.iter_mut().find(|e| e.id == id) {
            record.status = status.to_string();
        }
        Ok(())
    }

    async fn update_expression_result(
        &self,
        id: i64,
        result: Option<f64>,
        result_text: Option<&str>,
        status: &str,
    ) -> Result<(), OrchestratorError> {
        let mut expressions = self.expressions.lock().expect("store mutex poisoned");
        if let Some(record) = expressions.iter_mut().find(|e| e.id == id) {
            record.result = result;
            record.result_text = result_text.map(str::to_string);
            record.status = status.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_fetch_user() {
        let store = InMemoryStore::new();
        store.create_user("alice", "hash").await.unwrap();

        let found = store.get_user_by_login("alice").await.unwrap();
        assert_eq!(found.unwrap().login, "alice");
        assert!(store.get_user_by_login("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expressions_are_scoped_per_user() {
        let store = InMemoryStore::new();
        let id_a = store.create_expression("2+2", 1, "accepted").await.unwrap();
        let _id_b = store.create_expression("3*4", 2, "accepted").await.unwrap();

        let user_1_expressions = store.get_expressions_by_user(1).await.unwrap();
        assert_eq!(user_1_expressions.len(), 1);
        assert_eq!(user_1_expressions[0].id, id_a);
    }

    #[tokio::test]
    async fn update_result_sets_status_and_value() {
        let store = InMemoryStore::new();
        let id = store.create_expression("2+2", 1, "accepted").await.unwrap();

        store
            .update_expression_result(id, Some(4.0), None, "completed")
            .await
            .unwrap();

        let record = store.get_expression_by_id(id, 1).await.unwrap().unwrap();
        assert_eq!(record.status, "completed");
        assert_eq!(record.result, Some(4.0));
    }
}
