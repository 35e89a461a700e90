use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::api::AppState;

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.prometheus_handle.as_ref() {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled").into_response(),
    }
}

const fn outcome(status: u16) -> &'static str {
    if status >= 500 {
        "error"
    } else if status >= 400 {
        "client_error"
    } else {
        "success"
    }
}

/// Wraps every request in a span carrying a fresh request id, then records
/// request count and latency per route.
///
/// `user_id` starts empty; the auth middleware fills it in once the token is
/// resolved.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    // Label by route template so ids in paths do not blow up cardinality.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| uri.clone(), |mp| mp.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %uri,
        route = %route,
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        let labels = [
            ("method", method),
            ("route", route),
            ("status", status.to_string()),
        ];
        metrics::counter!("recipe_api_http_requests_total", &labels).increment(1);
        metrics::histogram!("recipe_api_http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            status_code = status,
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("same-origin"));

    response
}
