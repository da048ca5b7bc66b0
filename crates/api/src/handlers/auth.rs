//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use weatherapp_core::service::TokenPair;
use weatherapp_core::types::{Timestamp, UserId};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub login: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub access_token_expires_at: Timestamp,
    pub refresh_token: String,
    pub refresh_token_expires_at: Timestamp,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access,
            access_token_expires_at: pair.access_expires_at,
            refresh_token: pair.refresh,
            refresh_token_expires_at: pair.refresh_expires_at,
        }
    }
}

/// Public user info returned by `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: UserId,
    pub login: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return its first token pair.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<TokenPairResponse>)> {
    let pair = state.auth.register(&input.login, &input.password).await?;
    Ok((StatusCode::CREATED, Json(pair.into())))
}

/// POST /api/v1/auth/login
///
/// Authenticate with login + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let pair = state.auth.login(&input.login, &input.password).await?;
    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let pair = state.auth.refresh_session(&input.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/logout
///
/// Terminate the session owning the refresh token. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    state.auth.logout(&input.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Return the user the bearer access token was issued to.
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Json<MeResponse>> {
    let user = state.auth.current_user(auth_user.user_id).await?;
    Ok(Json(MeResponse {
        id: user.id,
        login: user.login,
    }))
}
