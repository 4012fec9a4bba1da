use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::routes::AppState;
use crate::auth::AuthProvider;
use crate::error::{AppError, Result};

/// The account id proven by a valid `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        authorize(&parts.headers, state.auth.as_ref()).map(AuthenticatedUser)
    }
}

/// A JSON request body. Unparseable bodies and fields of the wrong shape,
/// such as a non-UUID `toId`, are rejected as `INVALID_INPUT`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Resolves the bearer token in `headers` to a user id.
pub fn authorize(headers: &HeaderMap, auth: &dyn AuthProvider) -> Result<Uuid> {
    let token = bearer_token(headers)?;
    Ok(auth.verify_token(token)?)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("malformed Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("expected a Bearer token".to_string()))
}

/// Parses a path segment as an account id.
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("invalid account ID: {}", raw)))
}
