//! Database Module
//!
//! Database connection management for the service.

pub mod connection;

// Re-export commonly used types
pub use connection::{create_pool, DatabasePool};
