use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorResponse;
use crate::services::{AccountError, CatalogError, RecipeError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ErrorResponse {
            error: error_message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => Self::ValidationError(msg),
            AccountError::InvalidCredentials => Self::ValidationError(err.to_string()),
            AccountError::NotFound => Self::NotFound(err.to_string()),
            AccountError::Database(msg) => Self::DatabaseError(msg),
            AccountError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => Self::ValidationError(msg),
            CatalogError::Duplicate(_) => Self::ValidationError(err.to_string()),
            CatalogError::NotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Validation(msg) => Self::ValidationError(msg),
            RecipeError::NotFound => Self::NotFound(err.to_string()),
            RecipeError::Database(msg) => Self::DatabaseError(msg),
            RecipeError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Authentication credentials were not provided.".to_string())
    }

    pub fn invalid_token() -> Self {
        Self::Unauthorized("Invalid token.".to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}
