use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod ingredients;
mod observability;
mod recipes;
mod system;
mod tags;
mod types;
mod user;
mod validation;

pub use auth::AuthUser;
pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();
    let media_root = config.general.media_root.clone();
    let cors_origins = config.server.cors_allowed_origins.clone();
    let max_upload_bytes = config.server.max_upload_bytes;

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/user/create", post(user::create_user))
        .route("/user/token", post(user::create_token))
        .route("/health", get(system::health))
        .route_layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state.clone());

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .nest_service("/media", ServeDir::new(media_root))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/user/me",
            get(user::get_me).put(user::update_me).patch(user::update_me),
        )
        .route("/recipe/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/recipe/tags/{id}",
            put(tags::update_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route(
            "/recipe/ingredients",
            get(ingredients::list_ingredients).post(ingredients::create_ingredient),
        )
        .route(
            "/recipe/ingredients/{id}",
            put(ingredients::update_ingredient)
                .patch(ingredients::update_ingredient)
                .delete(ingredients::delete_ingredient),
        )
        .route(
            "/recipe/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/recipe/recipes/{id}",
            get(recipes::get_recipe)
                .put(recipes::replace_recipe)
                .patch(recipes::patch_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/recipe/recipes/{id}/upload-image",
            post(recipes::upload_image),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
