use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::{Error, Result};

pub const DEFAULT_TOKEN_SECONDS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    InvalidPassword,
    MissingToken,
    InvalidScheme,
    ExpiredToken,
    InvalidToken,
}

impl AuthError {
    fn detail(&self) -> &'static str {
        match self {
            AuthError::InvalidPassword => "Invalid password",
            AuthError::MissingToken => "Not authenticated",
            AuthError::InvalidScheme => "Invalid authentication credentials",
            AuthError::ExpiredToken => "Token expired",
            AuthError::InvalidToken => "Invalid token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// HS256 token holding only an expiry `duration_seconds` from now.
pub fn create_jwt(secret: &str, duration_seconds: i64) -> Result<String> {
    let exp = Utc::now()
        .timestamp()
        .checked_add(duration_seconds)
        .ok_or(Error::InvalidDuration(duration_seconds))?;
    let claims = Claims { exp };
    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_jwt(token: &str, secret: &str) -> core::result::Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub password: String,
    pub duration: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> core::result::Result<Json<TokenResponse>, Response> {
    let expected = &state.config.api_password;
    if expected.is_empty() || body.password != *expected {
        return Err(AuthError::InvalidPassword.into_response());
    }

    let duration = body.duration.unwrap_or(DEFAULT_TOKEN_SECONDS);
    match create_jwt(&state.config.secret_key, duration) {
        Ok(token) => Ok(Json(TokenResponse { token })),
        Err(Error::InvalidDuration(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Invalid duration" })),
        )
            .into_response()),
        Err(e) => Err(super::internal_error(&e)),
    }
}

/// Rejects requests without a valid `Authorization: Bearer <jwt>` header.
/// The scheme is matched ignoring case.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> core::result::Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidScheme)?;

    verify_jwt(token, &state.config.secret_key)?;
    Ok(next.run(req).await)
}
