//! Request Middleware
//!
//! Bearer-token authentication and per-client rate limiting applied ahead of
//! the route handlers.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::models::User;
use crate::service::user::to_public;
use crate::utils::error::AppError;

/// Extension type carrying the authenticated user into handlers
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware
///
/// Extracts the `Authorization: Bearer <token>` header, verifies the token
/// signature and expiry, and resolves the subject email to a live account.
/// Every failure collapses to the same 401 so callers cannot distinguish a
/// bad token from a deleted account.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))?;

    let email = state
        .token_service
        .verify(token)
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))?;

    let user = state
        .user_service
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))?;

    request.extensions_mut().insert(CurrentUser(to_public(user)));

    Ok(next.run(request).await)
}

/// Rate limiting middleware
///
/// Counts the request against the client's window for the requested route
/// and rejects with 429 once the window is full. Windows are keyed per
/// route, so each limited route has its own budget. When no peer address is
/// available (in-process test requests) the loopback address is used.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]));

    if !state.rate_limiter.check(request.uri().path(), addr) {
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

/// Pulls the token out of a `Bearer` authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ")
}
