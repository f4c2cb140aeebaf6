//! Service Layer
//!
//! Business logic split into focused services. Database-backed stores take a
//! connection pool; the mailer and avatar client own their outbound
//! transports.

pub mod avatar;
pub mod contact;
pub mod mailer;
pub mod rate_limit;
pub mod token;
pub mod user;

pub use avatar::AvatarService;
pub use contact::{ContactService, ContactServiceError};
pub use mailer::Mailer;
pub use rate_limit::RateLimiter;
pub use token::{Claims, TokenService};
pub use user::{UserService, UserServiceError};
