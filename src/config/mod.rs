//! Configuration Module
//!
//! Centralized configuration for the service. Everything is read from the
//! environment once at startup into an immutable `AppConfig` that is passed
//! explicitly to the components needing it.

use crate::utils::error::{AppError, AppResult};

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }

    /// Get required environment variable
    pub fn get_required(key: &str) -> Result<String, String> {
        env::var(key).map_err(|_| format!("Required environment variable {} is not set", key))
    }
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token signing configuration
    pub auth: AuthConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// SMTP mail configuration (mail disabled when absent)
    pub mail: Option<MailConfig>,

    /// Image hosting configuration (avatar upload disabled when absent)
    pub cloudinary: Option<CloudinaryConfig>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL used in verification links
    pub base_url: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
}

/// Per-client-address rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
}

/// SMTP mail delivery configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub from_name: String,
}

/// Image hosting (Cloudinary) upload configuration
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let host = env::get_string("SERVER_HOST", "0.0.0.0");
        let port = env::get_u16("SERVER_PORT", 8000);
        Self {
            base_url: env::get_string("APP_BASE_URL", &format!("http://{}:{}", host, port)),
            host,
            port,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: env::get_u32("RATE_LIMIT_MAX", 5),
            window_seconds: env::get_u64("RATE_LIMIT_WINDOW_SECONDS", 60),
        }
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, String> {
        Ok(Self {
            url: env::get_required("DATABASE_URL")?,
            max_connections: env::get_u32("DB_MAX_CONNECTIONS", 10),
            min_connections: env::get_u32("DB_MIN_CONNECTIONS", 1),
            connect_timeout_seconds: env::get_u64("DB_CONNECT_TIMEOUT", 10),
            idle_timeout_seconds: env::get_u64("DB_IDLE_TIMEOUT", 600),
            max_lifetime_seconds: env::get_u64("DB_MAX_LIFETIME", 3600),
        })
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, String> {
        Ok(Self {
            secret_key: env::get_required("SECRET_KEY")?,
            access_token_expire_minutes: env::get_i64("ACCESS_TOKEN_EXPIRE_MINUTES", 30),
        })
    }
}

impl MailConfig {
    pub fn from_env() -> Option<Self> {
        if !env::is_set("MAIL_SERVER") {
            return None;
        }

        Some(Self {
            server: env::get_string("MAIL_SERVER", "localhost"),
            port: env::get_u16("MAIL_PORT", 465),
            username: env::get_string("MAIL_USERNAME", ""),
            password: env::get_string("MAIL_PASSWORD", ""),
            from: env::get_string("MAIL_FROM", "noreply@localhost"),
            from_name: env::get_string("MAIL_FROM_NAME", "Contact App"),
        })
    }
}

impl CloudinaryConfig {
    pub fn from_env() -> Option<Self> {
        if !env::is_set("CLOUDINARY_NAME") {
            return None;
        }

        Some(Self {
            cloud_name: env::get_string("CLOUDINARY_NAME", ""),
            api_key: env::get_string("CLOUDINARY_API_KEY", ""),
            api_secret: env::get_string("CLOUDINARY_API_SECRET", ""),
        })
    }
}

impl AppConfig {
    /// Load complete application configuration from the environment
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::from_env().map_err(AppError::Configuration)?,
            auth: AuthConfig::from_env().map_err(AppError::Configuration)?,
            rate_limit: RateLimitConfig::default(),
            mail: MailConfig::from_env(),
            cloudinary: CloudinaryConfig::from_env(),
        })
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database max_connections must be greater than 0".into(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::Configuration(
                "Database min_connections cannot be greater than max_connections".into(),
            ));
        }

        if self.auth.secret_key.is_empty() {
            return Err(AppError::Configuration(
                "SECRET_KEY cannot be empty".into(),
            ));
        }

        if self.auth.access_token_expire_minutes <= 0 {
            return Err(AppError::Configuration(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be positive".into(),
            ));
        }

        if self.rate_limit.max_requests == 0 || self.rate_limit.window_seconds == 0 {
            return Err(AppError::Configuration(
                "Rate limit settings must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
