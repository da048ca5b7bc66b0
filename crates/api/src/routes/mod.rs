pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register      register (public)
/// /auth/login         login (public)
/// /auth/refresh       refresh (public)
/// /auth/logout        logout (public, takes the refresh token)
/// /auth/me            current user (requires access token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
