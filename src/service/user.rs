//! User Service
//!
//! Persistence and business logic for user accounts.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::{User, UserRecord};
use crate::utils::{
    error::AppError,
    security::{hash_password, verify_password},
    validation::normalize_email,
};

/// Custom error types for the user service
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// User with the specified identifier was not found
    #[error("User not found")]
    UserNotFound,

    /// Attempted to create a user with an email that already exists
    #[error("User already exists")]
    EmailAlreadyExists,

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::EmailAlreadyExists => {
                AppError::Conflict("User already exists".to_string())
            }
            UserServiceError::Database(e) => AppError::Database(e),
            UserServiceError::Hashing(e) => AppError::Hashing(e),
        }
    }
}

/// Result type for user service operations
pub type UserServiceResult<T> = Result<T, UserServiceError>;

const USER_COLUMNS: &str = "id, email, password_hash, verified, avatar_url, created_at";

/// User store providing account persistence and credential checks
#[derive(Clone)]
pub struct UserService {
    /// Database connection pool
    db_pool: PgPool,
}

impl UserService {
    /// Creates a new UserService backed by the provided connection pool
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Looks up a user by email (normalized), returning `None` when absent
    pub async fn find_by_email(&self, email: &str) -> UserServiceResult<Option<UserRecord>> {
        let normalized = normalize_email(email);

        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalized)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    /// Creates a new unverified account, hashing the password
    ///
    /// The unique index on email is the backstop for concurrent
    /// registrations; its violation maps to `EmailAlreadyExists`.
    pub async fn create(&self, email: &str, password: &str) -> UserServiceResult<UserRecord> {
        let normalized = normalize_email(email);
        let password_hash = hash_password(password)?;

        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(normalized)
        .bind(password_hash)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_email_key") => {
                UserServiceError::EmailAlreadyExists
            }
            _ => UserServiceError::Database(e),
        })?;

        Ok(user)
    }

    /// Checks credentials, returning the account on success
    ///
    /// Unknown email and wrong password are indistinguishable: both yield
    /// `None`.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> UserServiceResult<Option<UserRecord>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Marks the account with the given email as verified
    ///
    /// Idempotent: verifying an already-verified account is a no-op that
    /// still returns the user. Returns `None` when no such account exists.
    pub async fn set_verified(&self, email: &str) -> UserServiceResult<Option<UserRecord>> {
        let normalized = normalize_email(email);

        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET verified = TRUE WHERE email = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(normalized)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(user)
    }

    /// Updates the avatar URL for the given user
    pub async fn set_avatar(
        &self,
        user_id: Uuid,
        avatar_url: &str,
    ) -> UserServiceResult<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET avatar_url = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(avatar_url)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(UserServiceError::UserNotFound)?;

        Ok(user)
    }

    /// Health check for the service
    pub async fn health_check(&self) -> UserServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

/// Map a stored record to the public response shape
pub fn to_public(record: UserRecord) -> User {
    record.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn test_create_user(pool: sqlx::PgPool) {
        let service = UserService::new(pool);

        let user = service.create("a@x.com", "password1").await.unwrap();

        assert_eq!(user.email, "a@x.com");
        assert!(!user.verified);
        assert!(user.avatar_url.is_none());
        assert_ne!(user.password_hash, "password1");
    }

    #[sqlx::test]
    async fn test_create_user_normalizes_email(pool: sqlx::PgPool) {
        let service = UserService::new(pool);

        let user = service.create("  A@X.COM ", "password1").await.unwrap();
        assert_eq!(user.email, "a@x.com");

        let found = service.find_by_email("a@X.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
    }

    #[sqlx::test]
    async fn test_duplicate_email_conflict(pool: sqlx::PgPool) {
        let service = UserService::new(pool);

        service.create("a@x.com", "password1").await.unwrap();
        let result = service.create("a@x.com", "password2").await;

        assert!(matches!(
            result.unwrap_err(),
            UserServiceError::EmailAlreadyExists
        ));
    }

    #[sqlx::test]
    async fn test_find_by_email_absent(pool: sqlx::PgPool) {
        let service = UserService::new(pool);

        let found = service.find_by_email("nobody@x.com").await.unwrap();
        assert!(found.is_none());
    }

    #[sqlx::test]
    async fn test_authenticate(pool: sqlx::PgPool) {
        let service = UserService::new(pool);
        service.create("a@x.com", "password1").await.unwrap();

        assert!(service
            .authenticate("a@x.com", "password1")
            .await
            .unwrap()
            .is_some());
        assert!(service
            .authenticate("a@x.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(service
            .authenticate("nobody@x.com", "password1")
            .await
            .unwrap()
            .is_none());
    }

    #[sqlx::test]
    async fn test_set_verified_idempotent(pool: sqlx::PgPool) {
        let service = UserService::new(pool);
        service.create("a@x.com", "password1").await.unwrap();

        let first = service.set_verified("a@x.com").await.unwrap().unwrap();
        assert!(first.verified);

        let second = service.set_verified("a@x.com").await.unwrap().unwrap();
        assert!(second.verified);

        assert!(service.set_verified("nobody@x.com").await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_set_avatar(pool: sqlx::PgPool) {
        let service = UserService::new(pool);
        let user = service.create("a@x.com", "password1").await.unwrap();

        let updated = service
            .set_avatar(user.id, "https://img.example.com/u1.png")
            .await
            .unwrap();

        assert_eq!(
            updated.avatar_url.as_deref(),
            Some("https://img.example.com/u1.png")
        );

        let missing = service
            .set_avatar(Uuid::new_v4(), "https://img.example.com/u2.png")
            .await;
        assert!(matches!(
            missing.unwrap_err(),
            UserServiceError::UserNotFound
        ));
    }
}
