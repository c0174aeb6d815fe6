use std::env;
use tracing::warn;

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface the server binds to
    pub host: String,
    /// Port the server binds to
    pub port: u16,
}

impl AppConfig {
    /// Load listener configuration from environment variables
    ///
    /// - APP_HOST: bind interface (defaults to 127.0.0.1)
    /// - APP_PORT: bind port (defaults to 5000)
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid APP_PORT value {:?}, using 5000", raw);
                5000
            }),
            Err(_) => 5000,
        };
        AppConfig { host, port }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listener() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
    }
}
