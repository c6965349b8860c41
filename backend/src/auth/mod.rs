use async_trait::async_trait;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{axum_http::error_responses::ErrorResponse, config::config_model::Auth};

pub const SERVICE_ROLE: &str = "service_role";
const AUDIENCES: [&str; 2] = ["authenticated", SERVICE_ROLE];

/// Claims issued by the external auth provider. Tokens are verified here, never issued.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    pub aud: String,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

impl AuthUser {
    pub fn is_service(&self) -> bool {
        self.role == SERVICE_ROLE
    }
}

/// Viewer that may be anonymous. A present but invalid token is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[derive(Debug)]
pub enum AuthError {
    Unauthorized(String),
    NotConfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AuthError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<AccessClaims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_audience(&AUDIENCES);

    let token_data = decode::<AccessClaims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::Unauthorized(format!("JWT validation failed: {e}")))?;

    Ok(token_data.claims)
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AuthError::Unauthorized("Invalid Authorization header format".to_string()))
}

fn authenticate(parts: &Parts, token: &str) -> Result<AuthUser, AuthError> {
    let auth_config = parts.extensions.get::<Arc<Auth>>().ok_or_else(|| {
        error!("auth: jwt secret missing from request extensions");
        AuthError::NotConfigured
    })?;

    let claims = validate_jwt(token, &auth_config.jwt_secret).inspect_err(|err| {
        if let AuthError::Unauthorized(reason) = err {
            warn!(%reason, "auth: rejected bearer token");
        }
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        role: claims.role,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AuthError::Unauthorized("Missing Authorization header".to_string())
        })?;

        authenticate(parts, token)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => authenticate(parts, token).map(|user| OptionalAuthUser(Some(user))),
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

#[cfg(test)]
mod tests;
