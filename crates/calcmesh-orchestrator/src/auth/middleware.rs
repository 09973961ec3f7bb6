//! Bearer-token auth middleware (spec §6, Part B §B5): everything except
//! `/api/v1/register` and `/api/v1/login` requires a valid
//! `Authorization: Bearer <token>` header.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::verify_token;
use crate::bootstrap::AppState;
use crate::error::OrchestratorError;

/// The authenticated user, attached to the request's extensions by
/// [`auth_middleware`] for handlers to pull out.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub login: String,
}

const PUBLIC_PATHS: [&str; 2] = ["/api/v1/register", "/api/v1/login"];

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, OrchestratorError> {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(OrchestratorError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(OrchestratorError::Unauthorized)?;

    let claims = verify_token(&state.config, token)?;
    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        login: claims.login,
    });

    Ok(next.run(request).await)
}
