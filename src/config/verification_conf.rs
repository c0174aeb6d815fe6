use std::env;
use tracing::info;

use crate::config::ConfigError;

/// Email verification and password reset settings
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Base URL of the frontend used in verification links
    pub frontend_url: String,
    /// Minimum wait between verification email resends, in seconds
    pub resend_cooldown_secs: i64,
    /// Password reset one-time-code lifetime, in minutes
    pub otp_ttl_minutes: i64,
}

impl VerificationConfig {
    /// Load from environment variables
    ///
    /// - FRONTEND_URL (defaults to http://localhost:3000)
    /// - VERIFICATION_RESEND_COOLDOWN_SEC (defaults to 120)
    /// - RESET_OTP_TTL_MINUTES (defaults to 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading verification configuration from environment variables");

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let resend_cooldown_secs = env::var("VERIFICATION_RESEND_COOLDOWN_SEC")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue("Invalid VERIFICATION_RESEND_COOLDOWN_SEC value".to_string())
            })?;

        let otp_ttl_minutes = env::var("RESET_OTP_TTL_MINUTES")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidValue("Invalid RESET_OTP_TTL_MINUTES value".to_string()))?;

        let config = VerificationConfig {
            frontend_url,
            resend_cooldown_secs,
            otp_ttl_minutes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frontend_url.is_empty() {
            return Err(ConfigError::ValidationError("Frontend URL cannot be empty".to_string()));
        }
        if self.resend_cooldown_secs < 0 {
            return Err(ConfigError::ValidationError(
                "Resend cooldown cannot be negative".to_string(),
            ));
        }
        if self.otp_ttl_minutes <= 0 {
            return Err(ConfigError::ValidationError(
                "OTP lifetime must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        VerificationConfig {
            frontend_url: "http://localhost:3000".to_string(),
            resend_cooldown_secs: 120,
            otp_ttl_minutes: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VerificationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_otp_ttl_rejected() {
        let mut config = VerificationConfig::default();
        config.otp_ttl_minutes = 0;
        assert!(config.validate().is_err());
    }
}
