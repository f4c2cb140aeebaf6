//! Data Models Module
//!
//! Data structures used throughout the service: persisted entities and
//! request/response payloads.

pub mod contact;
pub mod requests;
pub mod user;

// Re-export commonly used types
pub use contact::Contact;
pub use requests::*;
pub use user::{User, UserRecord};
