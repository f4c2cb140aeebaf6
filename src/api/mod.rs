//! API Module
//!
//! HTTP surface of the service: shared state, middleware, handlers and the
//! router wiring them together.

pub mod contact_handlers;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::CurrentUser;
pub use routes::create_router;

use crate::service::{
    AvatarService, ContactService, Mailer, RateLimiter, TokenService, UserService,
};

/// Shared application state handed to every handler
///
/// Every field is cheap to clone: the stores share one connection pool, the
/// mailer is a channel handle and the limiter an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub contact_service: ContactService,
    pub token_service: TokenService,
    pub mailer: Mailer,
    pub avatar: AvatarService,
    pub rate_limiter: RateLimiter,
}
