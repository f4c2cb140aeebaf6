//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{email_validator, phone_validator};

/// Request payload for registration and login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCredentials {
    /// User's email address (must be unique and valid format)
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// User's password (8-128 characters)
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
}

/// Request payload for creating or fully replacing a contact
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactData {
    /// Contact's first name (1-100 characters)
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    /// Contact's last name (1-100 characters)
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    /// Contact's email address
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// Contact's phone number (5-20 characters)
    #[validate(length(min = 5, max = 20, message = "Phone number must be 5-20 characters"))]
    #[validate(custom(function = "phone_validator"))]
    pub phone_number: String,

    /// Contact's date of birth
    pub birth_date: NaiveDate,

    /// Optional free-form note (up to 255 characters)
    #[validate(length(max = 255, message = "Additional info must be at most 255 characters"))]
    pub additional_info: Option<String>,
}

/// Query parameters for the email verification route
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

/// Query parameters for contact search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed JWT access token
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
}

/// Generic message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
