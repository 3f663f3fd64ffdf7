//! Checkout engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WARDROBE_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `WARDROBE_DB_MAX_CONNECTIONS` - Pool size cap (default: 10)

use secrecy::SecretString;
use thiserror::Error;

/// Default pool size cap.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable was set but could not be parsed.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout engine configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl CheckoutConfig {
    /// Load configuration, reading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Build configuration from already-set environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_env("WARDROBE_DATABASE_URL")?;

        let max_connections = match std::env::var("WARDROBE_DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "WARDROBE_DB_MAX_CONNECTIONS".to_owned(),
                    format!("expected a positive integer, got {raw:?}"),
                )
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: SecretString::from(database_url),
            max_connections,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_variable() {
        let err = ConfigError::MissingEnvVar("WARDROBE_DATABASE_URL".to_owned());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: WARDROBE_DATABASE_URL"
        );

        let err = ConfigError::InvalidEnvVar(
            "WARDROBE_DB_MAX_CONNECTIONS".to_owned(),
            "expected a positive integer, got \"lots\"".to_owned(),
        );
        assert!(err.to_string().contains("WARDROBE_DB_MAX_CONNECTIONS"));
    }
}
