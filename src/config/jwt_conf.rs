use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,
    /// Session token expiration time in minutes
    pub token_expiration_minutes: i64,
    /// JWT issuer (optional)
    pub jwt_issuer: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required)
    /// - JWT_TOKEN_EXPIRY_MINUTES: Token expiration in minutes (defaults to 1440 = 1 day)
    /// - JWT_ISSUER: JWT issuer (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;

        if jwt_secret.len() < 32 {
            error!("JWT_SECRET is too short (minimum 32 characters required)");
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        let token_expiration_minutes = env::var("JWT_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| {
                warn!("JWT_TOKEN_EXPIRY_MINUTES not set, using default: 1440 minutes (1 day)");
                "1440".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_TOKEN_EXPIRY_MINUTES value: {}", e);
                ConfigError::InvalidValue(format!("JWT_TOKEN_EXPIRY_MINUTES: {}", e))
            })?;

        let jwt_issuer = env::var("JWT_ISSUER").ok();
        debug!("JWT token expiration: {} minutes", token_expiration_minutes);

        let config = JwtConfig {
            jwt_secret,
            token_expiration_minutes,
            jwt_issuer,
        };

        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Load JWT configuration from test environment variables, TEST_ prefixed
    pub fn from_test_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("TEST_JWT_SECRET")
            .map_err(|_| ConfigError::EnvVarNotFound("TEST_JWT_SECRET".to_string()))?;

        if jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "TEST_JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        let token_expiration_minutes = env::var("TEST_JWT_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "1440".to_string())
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidValue(format!("TEST_JWT_TOKEN_EXPIRY_MINUTES: {}", e)))?;

        Ok(JwtConfig {
            jwt_secret,
            token_expiration_minutes,
            jwt_issuer: env::var("TEST_JWT_ISSUER").ok(),
        })
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            return Err(ConfigError::ValidationError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.token_expiration_minutes <= 0 {
            return Err(ConfigError::ValidationError(
                "Token expiration must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// JWT configuration with test-friendly defaults
impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security"
                .to_string(),
            token_expiration_minutes: 1440,
            jwt_issuer: Some("cloudkitchen-backend".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(JwtConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = JwtConfig::default();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_expiry_rejected() {
        let mut config = JwtConfig::default();
        config.token_expiration_minutes = 0;
        assert!(config.validate().is_err());
    }
}
