//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory for storage slots (default: data)
//! - `STOREFRONT_CART_KEY` - Storage slot holding the cart (default: `restaurant_cart`)
//! - `STOREFRONT_MENU_PATH` - Menu JSON file (default: crates/storefront/content/menu.json)
//! - `STOREFRONT_TAX_RATE` - Sales tax rate between 0 and 1 (default: 0.10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use tavola_core::DEFAULT_TAX_RATE;
use thiserror::Error;

use crate::storage::{CART_STORAGE_KEY, validate_key};

const DEFAULT_MENU_PATH: &str = "crates/storefront/content/menu.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where the cart is persisted
    pub cart: CartConfig,
    /// Menu JSON file
    pub menu_path: PathBuf,
    /// Sales tax applied in the order summary
    pub tax_rate: Decimal,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Cart persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding storage slot files
    pub data_dir: PathBuf,
    /// Storage slot key
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            storage_key: CART_STORAGE_KEY.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_var(&vars, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_var(&vars, "STOREFRONT_PORT", "3000")?;
        let cart = CartConfig::from_vars(&vars)?;
        let menu_path = PathBuf::from(var_or_default(&vars, "STOREFRONT_MENU_PATH", DEFAULT_MENU_PATH));
        let tax_rate = parse_tax_rate(vars("STOREFRONT_TAX_RATE"))?;

        Ok(Self {
            host,
            port,
            cart,
            menu_path,
            tax_rate,
            sentry_dsn: vars("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: vars("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CartConfig {
    fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let storage_key = vars("STOREFRONT_CART_KEY")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.storage_key);
        // Storage rejects such keys on every read and write.
        validate_key(&storage_key)
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_CART_KEY".to_string(), e.to_string()))?;

        Ok(Self {
            data_dir: vars("STOREFRONT_DATA_DIR")
                .filter(|v| !v.is_empty())
                .map_or(defaults.data_dir, PathBuf::from),
            storage_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn var_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    vars(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to a default when unset.
fn parse_var<T>(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var_or_default(vars, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse and range-check the tax rate.
fn parse_tax_rate(value: Option<String>) -> Result<Decimal, ConfigError> {
    let Some(value) = value else {
        return Ok(DEFAULT_TAX_RATE);
    };

    let rate = Decimal::from_str(value.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("STOREFRONT_TAX_RATE".to_string(), e.to_string())
    })?;

    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_TAX_RATE".to_string(),
            format!("must be between 0 and 1 (got {rate})"),
        ));
    }

    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.cart.storage_key, "restaurant_cart");
        assert_eq!(config.menu_path, PathBuf::from(DEFAULT_MENU_PATH));
        assert_eq!(config.tax_rate, DEFAULT_TAX_RATE);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_DATA_DIR", "/var/lib/tavola"),
            ("STOREFRONT_CART_KEY", "kiosk_cart"),
            ("STOREFRONT_TAX_RATE", "0.0825"),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.cart.data_dir, PathBuf::from("/var/lib/tavola"));
        assert_eq!(config.cart.storage_key, "kiosk_cart");
        assert_eq!(config.tax_rate, Decimal::new(825, 4));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_unusable_cart_key() {
        for key in ["kiosk/cart", "../restaurant_cart", ".cart"] {
            let err = config_from(&[("STOREFRONT_CART_KEY", key)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidEnvVar(var, _) if var == "STOREFRONT_CART_KEY"),
                "{key} accepted"
            );
        }
    }

    #[test]
    fn test_tax_rate_out_of_range() {
        assert!(config_from(&[("STOREFRONT_TAX_RATE", "1.5")]).is_err());
        assert!(config_from(&[("STOREFRONT_TAX_RATE", "-0.1")]).is_err());
        assert!(config_from(&[("STOREFRONT_TAX_RATE", "ten")]).is_err());
        assert!(config_from(&[("STOREFRONT_TAX_RATE", "0")]).is_ok());
    }
}
