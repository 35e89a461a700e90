use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{validate_display_name, validate_email, validate_password};
use super::{
    ApiError, AppState, CreateUserRequest, JsonBody, TokenRequest, TokenResponse,
    UpdateProfileRequest, UserDto,
};
use crate::models::{AccountExtra, ProfilePatch};

/// POST /user/create
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let min_length = state.shared.config.security.min_password_length;

    let email = validate_email(payload.email.as_deref().unwrap_or_default())?;
    let password = validate_password(payload.password.as_deref().unwrap_or_default(), min_length)?;
    let name = payload
        .name
        .as_deref()
        .map(validate_display_name)
        .transpose()?
        .map(str::to_string);

    let account = state
        .shared
        .account_service
        .create_user(
            Some(email),
            password,
            AccountExtra {
                name,
                ..AccountExtra::default()
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(account))))
}

/// POST /user/token
/// Exchange email and password for the account's API token
pub async fn create_token(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .shared
        .account_service
        .obtain_token(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// GET /user/me
pub async fn get_me(user: AuthUser) -> Json<UserDto> {
    Json(UserDto::from(user.0))
}

/// PUT and PATCH /user/me
///
/// Both methods take a partial body; fields left out keep their value.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let min_length = state.shared.config.security.min_password_length;

    let patch = ProfilePatch {
        email: payload
            .email
            .as_deref()
            .map(validate_email)
            .transpose()?
            .map(str::to_string),
        name: payload
            .name
            .as_deref()
            .map(validate_display_name)
            .transpose()?
            .map(str::to_string),
        password: payload
            .password
            .as_deref()
            .map(|p| validate_password(p, min_length))
            .transpose()?
            .map(str::to_string),
    };

    let account = state
        .shared
        .account_service
        .update_profile(user.owner(), patch)
        .await?;

    Ok(Json(UserDto::from(account)))
}
