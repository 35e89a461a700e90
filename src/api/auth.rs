use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::OwnerId;
use crate::models::Account;

/// The account behind the request's token.
///
/// Only available on routes behind [`auth_middleware`]; anywhere else the
/// extractor rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Account);

impl AuthUser {
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.0.owner()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Resolves `Authorization: Token <key>` (or `Bearer <key>`) to an account
/// and hands it to the handler as an [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = extract_token(&headers).ok_or_else(ApiError::unauthorized)?;

    let account = state
        .shared
        .account_service
        .authenticate_token(key)
        .await?
        .ok_or_else(ApiError::invalid_token)?;

    tracing::Span::current().record("user_id", account.id);
    request.extensions_mut().insert(AuthUser(account));

    Ok(next.run(request).await)
}

/// Extract the token key from the Authorization header
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;

    if !(scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer")) {
        return None;
    }

    let key = key.trim();
    (!key.is_empty()).then_some(key)
}
