//! `sqlx`-backed `Store` implementation (Part B §B4).

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};

use super::{ExpressionRecord, Store, UserRecord};
use crate::error::OrchestratorError;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, OrchestratorError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(OrchestratorError::Database)?;
        Ok(PgStore { pool })
    }

    /// Run embedded migrations. Called once at orchestrator startup.
    pub async fn migrate(&self) -> Result<(), OrchestratorError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| OrchestratorError::Internal(e.to_string()))
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    login: String,
    password: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: row.id,
            login: row.login,
            password_hash: row.password,
        }
    }
}

#[derive(FromRow)]
struct ExpressionRow {
    id: i64,
    expression: String,
    user_id: i64,
    status: String,
    result: Option<f64>,
    result_text: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ExpressionRow> for ExpressionRecord {
    fn from(row: ExpressionRow) -> Self {
        ExpressionRecord {
            id: row.id,
            expression: row.expression,
            user_id: row.user_id,
            status: row.status,
            result: row.result,
            result_text: row.result_text,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        login: &str,
        password_hash: &str,
    ) -> Result<UserRecord, OrchestratorError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (login, password) VALUES ($1, $2) RETURNING id, login, password",
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<UserRecord>, OrchestratorError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, login, password FROM users WHERE login = $1")
                .bind(login)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    async fn create_expression(
        &self,
        expression: &str,
        user_id: i64,
        status: &str,
    ) -> Result<i64, OrchestratorError> {
        let row = sqlx::query(
            "INSERT INTO expressions (expression, user_id, status) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(expression)
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn get_expression_by_id(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ExpressionRecord>, OrchestratorError> {
        let row: Option<ExpressionRow> = sqlx::query_as(
            "SELECT id, expression, user_id, status, result, result_text, created_at
             FROM expressions WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_expressions_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ExpressionRecord>, OrchestratorError> {
        let rows: Vec<ExpressionRow> = sqlx::query_as(
            "SELECT id, expression, user_id, status, result, result_text, created_at
             FROM expressions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_expression_status(&self, id: i64, status: &str) -> Result<(), OrchestratorError> {
        sqlx::query("UPDATE expressions SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_expression_result(
        &self,
        id: i64,
        result: Option<f64>,
        result_text: Option<&str>,
        status: &str,
    ) -> Result<(), OrchestratorError> {
        sqlx::query("UPDATE expressions SET result = $1, result_text = $2, status = $3 WHERE id = $4")
            .bind(result)
            .bind(result_text)
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
