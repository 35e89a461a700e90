//! Health endpoint.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AppState, HealthResponse};

/// `GET /api/health`
///
/// Reports the process as up and checks database connectivity; answers 503
/// when the database cannot be reached.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let db_ready = state.store().ping().await.is_ok();

    let (status, body) = if db_ready {
        (StatusCode::OK, ("ok", "connected"))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ("degraded", "unreachable"))
    };

    (
        status,
        Json(HealthResponse {
            status: body.0.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: body.1.to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    )
        .into_response()
}
