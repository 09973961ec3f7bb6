use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, AuthUser};
use crate::bootstrap::AppState;
use crate::dispatcher::ExpressionView;
use crate::error::OrchestratorError;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    login: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), OrchestratorError> {
    if body.login.trim().is_empty() || body.password.is_empty() {
        return Err(OrchestratorError::BadRequest);
    }

    if state.store.get_user_by_login(&body.login).await?.is_some() {
        return Err(OrchestratorError::UserExists);
    }

    let hash = auth::hash_password(&body.password)?;
    let user = state.store.create_user(&body.login, &hash).await?;
    let token = auth::issue_token(&state.config, user.id, &user.login)?;

    tracing::info!(user_id = user.id, "registered new user");
    Ok((StatusCode::OK, Json(TokenResponse { token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, OrchestratorError> {
    let user = state
        .store
        .get_user_by_login(&body.login)
        .await?
        .ok_or(OrchestratorError::WrongLogin)?;

    if !auth::verify_password(&body.password, &user.password_hash)? {
        return Err(OrchestratorError::WrongPassword);
    }

    let token = auth::issue_token(&state.config, user.id, &user.login)?;
    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    expression: String,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    id: i64,
}

pub async fn calculate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CalculateRequest>,
) -> Result<(StatusCode, Json<CalculateResponse>), OrchestratorError> {
    if body.expression.trim().is_empty() {
        return Err(OrchestratorError::InvalidExpression("empty expression".to_string()));
    }

    let id = state.dispatcher.submit_expression(user.user_id, &body.expression).await?;
    tracing::info!(user_id = user.user_id, expression_id = id, "expression accepted");
    Ok((StatusCode::CREATED, Json(CalculateResponse { id })))
}

#[derive(Debug, Serialize)]
pub struct ExpressionDto {
    id: i64,
    expression: String,
    status: String,
    result: Option<f64>,
    error: Option<String>,
}

impl From<ExpressionView> for ExpressionDto {
    fn from(view: ExpressionView) -> Self {
        use calcmesh_shared::domain::ExpressionOutcome;

        let (result, error) = match view.outcome {
            ExpressionOutcome::Running => (None, None),
            ExpressionOutcome::Numeric(value) => (Some(value), None),
            ExpressionOutcome::Error(message) => (None, Some(message)),
        };

        ExpressionDto {
            id: view.id,
            expression: view.expression,
            status: view.status,
            result,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpressionListResponse {
    expressions: Vec<ExpressionDto>,
}

pub async fn list_expressions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ExpressionListResponse>, OrchestratorError> {
    let views = state.dispatcher.get_expressions_by_user(user.user_id).await?;
    Ok(Json(ExpressionListResponse {
        expressions: views.into_iter().map(ExpressionDto::from).collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ExpressionResponse {
    expression: ExpressionDto,
}

pub async fn get_expression(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ExpressionResponse>, OrchestratorError> {
    let view = state
        .dispatcher
        .get_expression_by_id(user.user_id, id)
        .await?
        .ok_or(OrchestratorError::NotFound)?;

    Ok(Json(ExpressionResponse {
        expression: ExpressionDto::from(view),
    }))
}
