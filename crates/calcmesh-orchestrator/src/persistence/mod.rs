//! Durable record of users and expressions (C6, spec §4.5, Part B §B4).
//!
//! `Store` is the seam: production wiring uses [`PgStore`] against
//! Postgres, while dispatcher/registry tests use [`InMemoryStore`] so the
//! state machine can be exercised without a live database.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::OrchestratorError;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ExpressionRecord {
    pub id: i64,
    pub expression: String,
    pub user_id: i64,
    pub status: String,
    pub result: Option<f64>,
    pub result_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserRecord, OrchestratorError>;
    async fn get_user_by_login(&self, login: &str) -> Result<Option<UserRecord>, OrchestratorError>;

    async fn create_expression(
        &self,
        expression: &str,
        user_id: i64,
        status: &str,
    ) -> Result<i64, OrchestratorError>;
    async fn get_expression_by_id(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ExpressionRecord>, OrchestratorError>;
    async fn get_expressions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ExpressionRecord>, OrchestratorError>;
    async fn update_expression_status(&self, id: i64, status: &str) -> Result<(), OrchestratorError>;
    async fn update_expression_result(
        &self,
        id: i64,
        result: Option<f64>,
        result_text: Option<&str>,
        status: &str,
    ) -> Result<(), OrchestratorError>;
}
