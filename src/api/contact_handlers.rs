//! Contact Handlers
//!
//! HTTP handlers for the contact CRUD and query endpoints. All of them sit
//! behind the auth middleware and scope every operation to the
//! authenticated owner.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::{middleware::CurrentUser, AppState};
use crate::models::{Contact, ContactData, SearchQuery};
use crate::utils::error::{AppError, AppResult};

fn contact_not_found() -> AppError {
    AppError::NotFound("Contact not found".to_string())
}

/// POST /contacts/
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ContactData>,
) -> AppResult<(StatusCode, Json<Contact>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let contact = state.contact_service.create(&payload, user.0.id).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /contacts/
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = state.contact_service.list(user.0.id).await?;
    Ok(Json(contacts))
}

/// GET /contacts/search?query=
pub async fn search_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = state
        .contact_service
        .search(&params.query, user.0.id)
        .await?;
    Ok(Json(contacts))
}

/// GET /contacts/birthdays
pub async fn upcoming_birthdays(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = state.contact_service.upcoming_birthdays(user.0.id).await?;
    Ok(Json(contacts))
}

/// GET /contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Contact>> {
    let contact = state
        .contact_service
        .get(id, user.0.id)
        .await?
        .ok_or_else(contact_not_found)?;

    Ok(Json(contact))
}

/// PUT /contacts/{id}
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactData>,
) -> AppResult<Json<Contact>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let contact = state
        .contact_service
        .update(id, &payload, user.0.id)
        .await?
        .ok_or_else(contact_not_found)?;

    Ok(Json(contact))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .contact_service
        .delete(id, user.0.id)
        .await?
        .ok_or_else(contact_not_found)?;

    Ok(StatusCode::NO_CONTENT)
}
