//! User-facing REST API (spec §6, Part B §B5).

mod handlers;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::bootstrap::AppState;

/// Assemble the full router: routes, auth middleware (allowlisting
/// `/register` and `/login`), CORS, panic recovery, and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ]);

    Router::new()
        .route("/api/v1/register", post(handlers::register))
        .route("/api/v1/login", post(handlers::login))
        .route("/api/v1/calculate", post(handlers::calculate))
        .route("/api/v1/expressions", get(handlers::list_expressions))
        .route("/api/v1/expressions/{id}", get(handlers::get_expression))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
