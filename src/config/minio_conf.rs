use std::env;
use tracing::{error, info};

use crate::config::ConfigError;

/// MinIO object storage configuration (menu image uploads)
#[derive(Debug, Clone)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    /// Prefix prepended to generated public links
    pub links_prefix: String,
    pub secure: bool,
}

impl MinioConfig {
    /// Load MinIO configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MINIO_ENDPOINT, MINIO_ACCESS_KEY, MINIO_SECRET_KEY (required)
    /// - MINIO_BUCKET (defaults to cloudkitchen-uploads)
    /// - MINIO_LINKS_PREFIX (defaults to the endpoint)
    /// - MINIO_SECURE (defaults true)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MinIO configuration from environment variables");

        let endpoint = env::var("MINIO_ENDPOINT").map_err(|_| {
            error!("MINIO_ENDPOINT environment variable not found");
            ConfigError::EnvVarNotFound("MINIO_ENDPOINT".to_string())
        })?;
        let access_key = env::var("MINIO_ACCESS_KEY")
            .map_err(|_| ConfigError::EnvVarNotFound("MINIO_ACCESS_KEY".to_string()))?;
        let secret_key = env::var("MINIO_SECRET_KEY")
            .map_err(|_| ConfigError::EnvVarNotFound("MINIO_SECRET_KEY".to_string()))?;
        let bucket_name =
            env::var("MINIO_BUCKET").unwrap_or_else(|_| "cloudkitchen-uploads".to_string());
        let links_prefix = env::var("MINIO_LINKS_PREFIX").unwrap_or_else(|_| endpoint.clone());
        let secure = env::var("MINIO_SECURE").map(|v| v != "false").unwrap_or(true);

        let config = MinioConfig {
            endpoint,
            access_key,
            secret_key,
            bucket_name,
            links_prefix,
            secure,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::ValidationError("MinIO endpoint cannot be empty".to_string()));
        }
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(ConfigError::ValidationError("MinIO credentials cannot be empty".to_string()));
        }
        if self.bucket_name.is_empty() {
            return Err(ConfigError::ValidationError("MinIO bucket cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Full endpoint URL including scheme
    pub fn get_endpoint_url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            self.endpoint.clone()
        } else if self.secure {
            format!("https://{}", self.endpoint)
        } else {
            format!("http://{}", self.endpoint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MinioConfig {
        MinioConfig {
            endpoint: "localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket_name: "cloudkitchen-uploads".to_string(),
            links_prefix: "http://localhost:9000".to_string(),
            secure: false,
        }
    }

    #[test]
    fn test_endpoint_url_scheme() {
        let mut config = sample();
        assert_eq!(config.get_endpoint_url(), "http://localhost:9000");
        config.secure = true;
        assert_eq!(config.get_endpoint_url(), "https://localhost:9000");
        config.endpoint = "https://minio.example.com".to_string();
        assert_eq!(config.get_endpoint_url(), "https://minio.example.com");
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let mut config = sample();
        config.bucket_name = String::new();
        assert!(config.validate().is_err());
    }
}
