//! API Route Definitions
//!
//! Assembles the public, authenticated and rate-limited route groups into
//! one router.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::contact_handlers::*;
use super::handlers::*;
use super::middleware::{auth_middleware, rate_limit_middleware};
use super::AppState;

/// Builds the application router
///
/// Three groups: public endpoints, the rate-limited root and profile
/// endpoints, and the authenticated contact and avatar endpoints. The rate
/// limit layer sits outside the auth layer, so an over-limit client gets 429
/// before its token is even looked at.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/users/register", post(register_user))
        .route("/users/verify", get(verify_email))
        .route("/users/login", post(login_user))
        .route("/health", get(health_check));

    let root_routes = Router::new().route("/", get(root)).layer(
        middleware::from_fn_with_state(state.clone(), rate_limit_middleware),
    );

    let profile = Router::new()
        .route("/users/me", get(current_user))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let protected = Router::new()
        .route("/users/avatar", post(upload_avatar))
        .route("/contacts/", post(create_contact).get(list_contacts))
        .route("/contacts/search", get(search_contacts))
        .route("/contacts/birthdays", get(upcoming_birthdays))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public)
        .merge(root_routes)
        .merge(profile)
        .merge(protected)
        .with_state(state)
}
