//! User Model
//!
//! Core user data structures and type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User representation for external API responses
///
/// This struct represents an account without sensitive information like the
/// password hash. All datetime fields use UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// User's email address (unique, normalized)
    pub email: String,

    /// Whether the user's email address has been verified
    pub verified: bool,

    /// Optional URL to the user's avatar image
    pub avatar_url: Option<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

/// Internal user representation including the password hash
///
/// Used for database operations that need the stored hash. Never exposed in
/// API responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: Uuid,

    /// User's email address
    pub email: String,

    /// bcrypt hashed password
    pub password_hash: String,

    /// Whether the user's email address has been verified
    pub verified: bool,

    /// Optional URL to the user's avatar image
    pub avatar_url: Option<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    /// Convert the stored record to the public user struct
    ///
    /// The conversion strips the password hash so it is never accidentally
    /// serialized into a response.
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email,
            verified: record.verified,
            avatar_url: record.avatar_url,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_conversion_strips_hash() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            verified: true,
            avatar_url: Some("https://example.com/avatar.jpg".to_string()),
            created_at: Utc::now(),
        };

        let user: User = record.clone().into();

        assert_eq!(user.id, record.id);
        assert_eq!(user.email, "test@example.com");
        assert!(user.verified);
        assert_eq!(
            user.avatar_url,
            Some("https://example.com/avatar.jpg".to_string())
        );

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
