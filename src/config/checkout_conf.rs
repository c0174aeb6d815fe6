use std::env;
use tracing::{error, info};

use crate::config::ConfigError;

/// Checkout pricing constants.
///
/// Order totals are computed from these at checkout time and snapshotted on
/// the order, so changing them never affects existing orders.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Flat fee applied to delivery orders (pickup is always 0)
    pub delivery_fee_flat: f64,
    /// Service fee as a fraction of the subtotal
    pub service_fee_rate: f64,
    /// Tax as a fraction of the subtotal
    pub tax_rate: f64,
}

impl CheckoutConfig {
    /// Load checkout configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - DELIVERY_FEE_FLAT (defaults to 4.99)
    /// - SERVICE_FEE_RATE (defaults to 0.05)
    /// - TAX_RATE (defaults to 0.08)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading checkout configuration from environment variables");

        let delivery_fee_flat = Self::parse_var("DELIVERY_FEE_FLAT", 4.99)?;
        let service_fee_rate = Self::parse_var("SERVICE_FEE_RATE", 0.05)?;
        let tax_rate = Self::parse_var("TAX_RATE", 0.08)?;

        let config = CheckoutConfig {
            delivery_fee_flat,
            service_fee_rate,
            tax_rate,
        };
        config.validate()?;
        Ok(config)
    }

    fn parse_var(name: &str, default: f64) -> Result<f64, ConfigError> {
        match env::var(name) {
            Ok(raw) => raw.parse::<f64>().map_err(|_| {
                error!("Invalid {} value: {}", name, raw);
                ConfigError::InvalidValue(format!("Invalid {} value", name))
            }),
            Err(_) => Ok(default),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery_fee_flat < 0.0 {
            return Err(ConfigError::ValidationError(
                "Delivery fee cannot be negative".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.service_fee_rate) {
            return Err(ConfigError::ValidationError(
                "Service fee rate must be in [0, 1)".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.tax_rate) {
            return Err(ConfigError::ValidationError(
                "Tax rate must be in [0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            delivery_fee_flat: 4.99,
            service_fee_rate: 0.05,
            tax_rate: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let config = CheckoutConfig::default();
        assert_eq!(config.delivery_fee_flat, 4.99);
        assert_eq!(config.service_fee_rate, 0.05);
        assert_eq!(config.tax_rate, 0.08);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut config = CheckoutConfig::default();
        config.delivery_fee_flat = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_out_of_range_rejected() {
        let mut config = CheckoutConfig::default();
        config.tax_rate = 1.5;
        assert!(config.validate().is_err());
    }
}
