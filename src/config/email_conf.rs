use std::env;
use tracing::{error, info, warn};

use crate::config::ConfigError;

/// SMTP email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub use_tls: bool,
    pub use_starttls: bool,
    pub from_email: String,
    pub from_name: String,
    pub connection_timeout_secs: u64,
}

impl EmailConfig {
    /// Load SMTP configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SMTP_HOST (required), SMTP_PORT (defaults to 587)
    /// - SMTP_USERNAME / SMTP_PASSWORD (optional, empty disables auth)
    /// - SMTP_USE_TLS (defaults true), SMTP_USE_STARTTLS (defaults true)
    /// - EMAIL_FROM (required), EMAIL_FROM_NAME (defaults to CloudKitchen)
    /// - SMTP_CONNECTION_TIMEOUT (seconds, defaults to 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading email configuration from environment variables");

        let smtp_host = env::var("SMTP_HOST").map_err(|_| {
            error!("SMTP_HOST environment variable not found");
            ConfigError::EnvVarNotFound("SMTP_HOST".to_string())
        })?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("Invalid SMTP_PORT value".to_string()))?;

        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();

        let use_tls = env::var("SMTP_USE_TLS")
            .map(|v| v != "false")
            .unwrap_or(true);
        let use_starttls = env::var("SMTP_USE_STARTTLS")
            .map(|v| v != "false")
            .unwrap_or(true);

        let from_email = env::var("EMAIL_FROM").map_err(|_| {
            error!("EMAIL_FROM environment variable not found");
            ConfigError::EnvVarNotFound("EMAIL_FROM".to_string())
        })?;

        let from_name = env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| {
            warn!("EMAIL_FROM_NAME not set, using default: CloudKitchen");
            "CloudKitchen".to_string()
        });

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("Invalid SMTP_CONNECTION_TIMEOUT value".to_string()))?;

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            use_tls,
            use_starttls,
            from_email,
            from_name,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Email configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.is_empty() {
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }
        if self.smtp_port == 0 {
            return Err(ConfigError::ValidationError("SMTP port must be greater than 0".to_string()));
        }
        if self.from_email.is_empty() || !self.from_email.contains('@') {
            return Err(ConfigError::ValidationError("Invalid from email address".to_string()));
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            use_tls: false,
            use_starttls: false,
            from_email: "no-reply@cloudkitchen.local".to_string(),
            from_name: "CloudKitchen".to_string(),
            connection_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EmailConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_from_address_rejected() {
        let mut config = EmailConfig::default();
        config.from_email = "not-an-email".to_string();
        assert!(config.validate().is_err());
    }
}
