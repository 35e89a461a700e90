use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{parse_flag, validate_id};
use super::{ApiError, AppState, JsonBody, LabelDto, LabelListQuery, LabelRequest};

/// GET /recipe/tags
/// `?assigned_only=1` keeps only tags used by at least one recipe
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<LabelListQuery>,
) -> Result<Json<Vec<LabelDto>>, ApiError> {
    let assigned_only = parse_flag(query.assigned_only.as_deref());

    let tags = state
        .shared
        .catalog_service
        .list_tags(user.owner(), assigned_only)
        .await?;

    Ok(Json(tags.into_iter().map(LabelDto::from).collect()))
}

/// POST /recipe/tags
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<LabelRequest>,
) -> Result<(StatusCode, Json<LabelDto>), ApiError> {
    let tag = state
        .shared
        .catalog_service
        .create_tag(user.owner(), &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(LabelDto::from(tag))))
}

/// PUT and PATCH /recipe/tags/{id}
pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<LabelRequest>,
) -> Result<Json<LabelDto>, ApiError> {
    let id = validate_id(id)?;

    let tag = state
        .shared
        .catalog_service
        .rename_tag(user.owner(), id, &payload.name)
        .await?;

    Ok(Json(LabelDto::from(tag)))
}

/// DELETE /recipe/tags/{id}
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(id)?;

    state
        .shared
        .catalog_service
        .delete_tag(user.owner(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
