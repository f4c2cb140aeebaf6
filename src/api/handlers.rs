//! User and Operational Handlers
//!
//! HTTP handlers for account registration, email verification, login, the
//! authenticated profile and avatar endpoints, plus the root and health
//! probes.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use log::info;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::{middleware::CurrentUser, AppState};
use crate::models::{MessageResponse, TokenResponse, User, UserCredentials, VerifyQuery};
use crate::service::user::to_public;
use crate::utils::error::{AppError, AppResult};

/// POST /users/register
///
/// Creates an unverified account and queues the verification email. The
/// pre-insert existence check gives a clean 409 for the common case; the
/// unique index on email backs it up under concurrent registration.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCredentials>,
) -> AppResult<(StatusCode, Json<User>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if state
        .user_service
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Account already exists".to_string()));
    }

    let user = state
        .user_service
        .create(&payload.email, &payload.password)
        .await?;

    let token = state.token_service.issue(&user.email)?;
    state
        .mailer
        .queue_verification(&user.email, &token, state.token_service.ttl_minutes());

    info!("registered new account {}", user.email);
    Ok((StatusCode::CREATED, Json(to_public(user))))
}

/// GET /users/verify?token=
///
/// Marks the token's subject as verified. A bad signature, an expired token
/// and a vanished account all produce the same 400.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<MessageResponse>> {
    let invalid = || AppError::Validation("Invalid or expired verification token".to_string());

    let email = state.token_service.verify(&query.token).ok_or_else(invalid)?;

    state
        .user_service
        .set_verified(&email)
        .await?
        .ok_or_else(invalid)?;

    info!("email verified for {}", email);
    Ok(Json(MessageResponse {
        message: "Email verified successfully".to_string(),
    }))
}

/// POST /users/login
///
/// Exchanges valid credentials on a verified account for an access token.
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCredentials>,
) -> AppResult<Json<TokenResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !user.verified {
        return Err(AppError::Forbidden("Email is not verified".to_string()));
    }

    let access_token = state.token_service.issue(&user.email)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /users/me
pub async fn current_user(Extension(user): Extension<CurrentUser>) -> Json<User> {
    Json(user.0)
}

/// POST /users/avatar
///
/// Reads the `file` part of the multipart body, uploads it to the image host
/// and stores the resulting URL on the account. Runs in the request so the
/// response carries the new URL.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<User>> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?;
            image = Some(bytes.to_vec());
            break;
        }
    }

    let image = image.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if image.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let url = state.avatar.upload(user.0.id, image).await?;
    let updated = state.user_service.set_avatar(user.0.id, &url).await?;

    Ok(Json(to_public(updated)))
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Contact management API".to_string(),
    })
}

/// GET /health
///
/// Probes database connectivity so load balancers see dependency failures.
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.user_service.health_check().await?;

    Ok(Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
    })))
}
