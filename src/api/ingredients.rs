use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{parse_flag, validate_id};
use super::{ApiError, AppState, JsonBody, LabelDto, LabelListQuery, LabelRequest};

/// GET /recipe/ingredients
/// `?assigned_only=1` keeps only ingredients used by at least one recipe
pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<LabelListQuery>,
) -> Result<Json<Vec<LabelDto>>, ApiError> {
    let assigned_only = parse_flag(query.assigned_only.as_deref());

    let ingredients = state
        .shared
        .catalog_service
        .list_ingredients(user.owner(), assigned_only)
        .await?;

    Ok(Json(ingredients.into_iter().map(LabelDto::from).collect()))
}

/// POST /recipe/ingredients
pub async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<LabelRequest>,
) -> Result<(StatusCode, Json<LabelDto>), ApiError> {
    let ingredient = state
        .shared
        .catalog_service
        .create_ingredient(user.owner(), &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(LabelDto::from(ingredient))))
}

/// PUT and PATCH /recipe/ingredients/{id}
pub async fn update_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<LabelRequest>,
) -> Result<Json<LabelDto>, ApiError> {
    let id = validate_id(id)?;

    let ingredient = state
        .shared
        .catalog_service
        .rename_ingredient(user.owner(), id, &payload.name)
        .await?;

    Ok(Json(LabelDto::from(ingredient)))
}

/// DELETE /recipe/ingredients/{id}
pub async fn delete_ingredient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(id)?;

    state
        .shared
        .catalog_service
        .delete_ingredient(user.owner(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
