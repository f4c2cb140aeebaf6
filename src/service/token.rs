//! Token Service
//!
//! Issues and validates signed, time-limited access tokens. Tokens are never
//! persisted: possession of a valid unexpired token is the sole authorization
//! proof.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Default access token lifetime in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// JWT claims: the subject (user email) and expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user email
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token service for issuing and validating HS256 access tokens
#[derive(Clone)]
pub struct TokenService {
    /// Server-held signing secret
    secret: String,
    /// Access token lifetime
    ttl: Duration,
}

impl TokenService {
    /// Create a new token service with the default 30-minute lifetime
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Create a token service with a custom token lifetime
    pub fn with_ttl(secret: String, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Configured token lifetime in minutes
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl.num_minutes()
    }

    /// Issue a signed token for the given subject, expiring after the
    /// configured lifetime
    pub fn issue(&self, subject: &str) -> AppResult<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return its subject
    ///
    /// Every failure mode (malformed token, bad signature, expired) collapses
    /// to `None` so callers cannot tell which check failed.
    pub fn verify(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        // No clock leeway: a token is rejected the moment exp passes
        validation.leeway = 0;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims.sub)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new("test_secret_key".to_string())
    }

    #[test]
    fn test_issue_and_verify() {
        let service = test_service();
        let token = service.issue("user@example.com").unwrap();
        let subject = service.verify(&token);

        assert_eq!(subject.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::with_ttl(
            "test_secret_key".to_string(),
            Duration::seconds(-120),
        );
        let token = service.issue("user@example.com").unwrap();

        assert!(service.verify(&token).is_none());
    }

    #[test]
    fn test_just_expired_token_rejected() {
        // Expired by well under a minute: must still be rejected, expiry is
        // strict with no leeway window
        let service = TokenService::with_ttl(
            "test_secret_key".to_string(),
            Duration::seconds(-30),
        );
        let token = service.issue("user@example.com").unwrap();

        assert!(service.verify(&token).is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = test_service();
        let verifier = TokenService::new("different_secret".to_string());

        let token = issuer.issue("user@example.com").unwrap();
        assert!(verifier.verify(&token).is_none());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = test_service();
        assert!(service.verify("not.a.jwt").is_none());
        assert!(service.verify("").is_none());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service.issue("user@example.com").unwrap();

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload: Vec<char> = parts[1].chars().collect();
        payload[0] = if payload[0] == 'A' { 'B' } else { 'A' };
        parts[1] = payload.into_iter().collect();

        assert!(service.verify(&parts.join(".")).is_none());
    }
}
