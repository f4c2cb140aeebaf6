//! Contact Model
//!
//! Address-book entry data structures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's address-book entry
///
/// Contacts are strictly owner-scoped: every query filters by `user_id`, so a
/// contact is only visible or mutable through its owning user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Unique identifier for the contact
    pub id: Uuid,

    /// Contact's first name
    pub first_name: String,

    /// Contact's last name
    pub last_name: String,

    /// Contact's email address (unique)
    pub email: String,

    /// Contact's phone number
    pub phone_number: String,

    /// Contact's date of birth
    pub birth_date: NaiveDate,

    /// Optional free-form note
    pub additional_info: Option<String>,

    /// Id of the owning user
    pub user_id: Uuid,

    /// Timestamp when the contact was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}
