use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{parse_id_list, validate_id};
use super::{
    ApiError, AppState, JsonBody, RecipeDetailDto, RecipeDto, RecipeImageDto, RecipeListQuery,
    RecipeRequest,
};
use crate::models::{RecipeDraft, RecipeFilter, RecipePatch};

const IMAGE_FIELD: &str = "image";

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("{field}: This field is required.")))
}

/// Full set of fields for create and PUT. Links default to none.
fn draft_from(payload: RecipeRequest) -> Result<RecipeDraft, ApiError> {
    Ok(RecipeDraft {
        title: required(payload.title, "title")?,
        time_minutes: required(payload.time_minutes, "time_minutes")?,
        price: required(payload.price, "price")?,
        link: payload.link.unwrap_or_default(),
        tag_ids: payload.tags.unwrap_or_default(),
        ingredient_ids: payload.ingredients.unwrap_or_default(),
    })
}

fn patch_from(payload: RecipeRequest) -> RecipePatch {
    RecipePatch {
        title: payload.title,
        time_minutes: payload.time_minutes,
        price: payload.price,
        link: payload.link,
        tag_ids: payload.tags,
        ingredient_ids: payload.ingredients,
    }
}

/// GET /recipe/recipes
/// `?tags=1,2&ingredients=3` narrows the list to recipes linked to any of the
/// given tags and any of the given ingredients
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeDto>>, ApiError> {
    let filter = RecipeFilter {
        tag_ids: query
            .tags
            .as_deref()
            .map(|raw| parse_id_list("tags", raw))
            .transpose()?
            .unwrap_or_default(),
        ingredient_ids: query
            .ingredients
            .as_deref()
            .map(|raw| parse_id_list("ingredients", raw))
            .transpose()?
            .unwrap_or_default(),
    };

    let recipes = state
        .shared
        .recipe_service
        .list(user.owner(), &filter)
        .await?;

    Ok(Json(recipes.into_iter().map(RecipeDto::from).collect()))
}

/// GET /recipe/recipes/{id}
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<RecipeDetailDto>, ApiError> {
    let id = validate_id(id)?;
    let detail = state.shared.recipe_service.get(user.owner(), id).await?;
    Ok(Json(RecipeDetailDto::from(detail)))
}

/// POST /recipe/recipes
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetailDto>), ApiError> {
    let draft = draft_from(payload)?;

    let detail = state
        .shared
        .recipe_service
        .create(user.owner(), draft)
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeDetailDto::from(detail))))
}

/// PUT /recipe/recipes/{id}
/// Replaces the recipe; omitted tags and ingredients are unlinked
pub async fn replace_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeDetailDto>, ApiError> {
    let id = validate_id(id)?;
    let draft = draft_from(payload)?;

    let detail = state
        .shared
        .recipe_service
        .replace(user.owner(), id, draft)
        .await?;

    Ok(Json(RecipeDetailDto::from(detail)))
}

/// PATCH /recipe/recipes/{id}
pub async fn patch_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeDetailDto>, ApiError> {
    let id = validate_id(id)?;

    let detail = state
        .shared
        .recipe_service
        .patch(user.owner(), id, patch_from(payload))
        .await?;

    Ok(Json(RecipeDetailDto::from(detail)))
}

/// DELETE /recipe/recipes/{id}
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(id)?;
    state.shared.recipe_service.delete(user.owner(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /recipe/recipes/{id}/upload-image
/// Multipart upload with the file in the `image` field
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<RecipeImageDto>, ApiError> {
    let id = validate_id(id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;

        let recipe = state
            .shared
            .recipe_service
            .upload_image(user.owner(), id, &filename, &bytes)
            .await?;

        return Ok(Json(RecipeImageDto::from(recipe)));
    }

    Err(ApiError::validation(format!(
        "{IMAGE_FIELD}: No file was submitted."
    )))
}
