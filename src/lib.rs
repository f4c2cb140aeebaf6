//! Contacts API Library
//!
//! A contact management backend with account registration, email
//! verification, token-based authentication and per-user contact books.
//!
//! # Features
//!
//! - **Account Lifecycle**: Registration, email verification and login with
//!   bcrypt password hashing and signed access tokens
//! - **Contact Books**: Owner-scoped CRUD, substring search and an
//!   upcoming-birthdays query
//! - **Avatar Hosting**: Signed uploads to an external image host
//! - **Background Mail**: Verification emails delivered off the request path
//! - **Rate Limiting**: In-process fixed-window limiter per client address
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use contacts_api::{
//!     api::{create_router, AppState},
//!     config::RateLimitConfig,
//!     service::{
//!         AvatarService, ContactService, Mailer, RateLimiter, TokenService, UserService,
//!     },
//! };
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = PgPool::connect("postgres://localhost/contacts").await?;
//!
//!     let state = AppState {
//!         user_service: UserService::new(pool.clone()),
//!         contact_service: ContactService::new(pool),
//!         token_service: TokenService::new("secret".to_string()),
//!         mailer: Mailer::disabled(),
//!         avatar: AvatarService::new(None),
//!         rate_limiter: RateLimiter::new(&RateLimitConfig {
//!             max_requests: 5,
//!             window_seconds: 60,
//!         }),
//!     };
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: HTTP handlers, middleware and route definitions
//! - **Service Layer**: Stores, token issuing, mail and upload clients
//! - **Models**: Data structures and request/response shapes
//! - **Database**: Connection pool management
//! - **Utils**: Shared error, security and validation helpers

/// HTTP API layer with handlers, middleware and routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Database connection management
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Business logic services
pub mod service;

/// Shared utilities for security, validation, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_router, AppState, CurrentUser};
pub use models::{
    contact::Contact,
    requests::{ContactData, MessageResponse, SearchQuery, TokenResponse, UserCredentials},
    user::User,
};
pub use service::{
    AvatarService, ContactService, Mailer, RateLimiter, TokenService, UserService,
};
pub use utils::error::{AppError, AppResult, ErrorResponse};

pub use database::{create_pool, DatabasePool};

pub use config::{env, AppConfig, DatabaseConfig, RateLimitConfig, ServerConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
