use std::env;

use crate::config::ConfigError;

/// Bootstrap owner account, created at startup when absent.
///
/// The owner role is never assignable through the API, so the only way to get
/// an owner account is this startup step.
#[derive(Debug, Clone)]
pub struct OwnerUserConfig {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
}

impl OwnerUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let email = env::var("OWNER_EMAIL")
            .map_err(|_| ConfigError::EnvVarNotFound("OWNER_EMAIL".to_string()))?;
        let password = env::var("OWNER_PASSWORD")
            .map_err(|_| ConfigError::EnvVarNotFound("OWNER_PASSWORD".to_string()))?;
        let first_name = env::var("OWNER_FIRST_NAME").unwrap_or_else(|_| "Kitchen".to_string());
        let last_name = env::var("OWNER_LAST_NAME").unwrap_or_else(|_| "Owner".to_string());
        let mobile_number = env::var("OWNER_MOBILE").unwrap_or_else(|_| "0000000000".to_string());

        if password.len() < 8 {
            return Err(ConfigError::ValidationError(
                "OWNER_PASSWORD must be at least 8 characters".to_string(),
            ));
        }

        Ok(OwnerUserConfig {
            first_name,
            last_name,
            email,
            mobile_number,
            password,
        })
    }
}
