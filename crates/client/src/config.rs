//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_API_BASE_URL` - Backend REST base URL (default: `http://localhost:8080/api/api`)
//! - `SHOPFRONT_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `SHOPFRONT_DATA_DIR` - Directory holding the cart and token slots (default: `.shopfront`)
//! - `SHOPFRONT_LOGIN_PATH` - Where to send the user when the session expires (default: `/login`)
//! - `SHOPFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal for free standard shipping (default: 50.00)
//! - `SHOPFRONT_TAX_RATE` - Sales tax fraction (default: 0.08)
//! - `SHOPFRONT_SHIPPING_STANDARD` - Standard shipping price (default: 9.99)
//! - `SHOPFRONT_SHIPPING_EXPRESS` - Express shipping price (default: 19.99)
//! - `SHOPFRONT_SHIPPING_OVERNIGHT` - Overnight shipping price (default: 39.99)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use shopfront_core::PricingPolicy;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DATA_DIR: &str = ".shopfront";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Directory holding persisted slots
    pub data_dir: PathBuf,
    /// Shipping and tax settings
    pub pricing: PricingPolicy,
}

/// Backend API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every request path is appended to (no trailing slash)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Login route announced when the session expires
    pub login_path: String,
}

impl ApiConfig {
    /// Settings for `base_url` with default timeout and login path.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let base_url = env.or_default("SHOPFRONT_API_BASE_URL", DEFAULT_API_BASE_URL);
        validate_base_url(&base_url, "SHOPFRONT_API_BASE_URL")?;

        let timeout_secs: u64 = env.parse_or("SHOPFRONT_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let login_path = env.or_default("SHOPFRONT_LOGIN_PATH", DEFAULT_LOGIN_PATH);
        let data_dir = PathBuf::from(env.or_default("SHOPFRONT_DATA_DIR", DEFAULT_DATA_DIR));

        let api = ApiConfig {
            timeout: Duration::from_secs(timeout_secs),
            login_path,
            ..ApiConfig::new(base_url)
        };

        Ok(Self {
            api,
            data_dir,
            pricing: pricing_from_env(&env)?,
        })
    }
}

fn pricing_from_env<F: Fn(&str) -> Option<String>>(
    env: &Lookup<F>,
) -> Result<PricingPolicy, ConfigError> {
    let defaults = PricingPolicy::default();

    let policy = PricingPolicy {
        free_shipping_threshold: env.amount_or(
            "SHOPFRONT_FREE_SHIPPING_THRESHOLD",
            defaults.free_shipping_threshold,
        )?,
        tax_rate: env.amount_or("SHOPFRONT_TAX_RATE", defaults.tax_rate)?,
        standard_rate: env.amount_or("SHOPFRONT_SHIPPING_STANDARD", defaults.standard_rate)?,
        express_rate: env.amount_or("SHOPFRONT_SHIPPING_EXPRESS", defaults.express_rate)?,
        overnight_rate: env.amount_or("SHOPFRONT_SHIPPING_OVERNIGHT", defaults.overnight_rate)?,
    };

    if policy.tax_rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_TAX_RATE".to_string(),
            format!("must be a fraction below 1 (got {})", policy.tax_rate),
        ));
    }

    Ok(policy)
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        (self.0)(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a non-negative decimal amount.
    fn amount_or(&self, key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
        let amount: Decimal = self.parse_or(key, default)?;
        if amount.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must not be negative (got {amount})"),
            ));
        }
        Ok(amount)
    }
}

/// Validate that the base URL is an absolute http(s) URL.
fn validate_base_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/api/api");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.login_path, "/login");
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert_eq!(config.pricing, PricingPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOPFRONT_API_BASE_URL", "https://shop.example/api/"),
            ("SHOPFRONT_API_TIMEOUT_SECS", "3"),
            ("SHOPFRONT_TAX_RATE", "0.0725"),
            ("SHOPFRONT_FREE_SHIPPING_THRESHOLD", "75"),
        ])
        .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example/api");
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.pricing.tax_rate, Decimal::new(725, 4));
        assert_eq!(config.pricing.free_shipping_threshold, Decimal::from(75));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("SHOPFRONT_API_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPFRONT_API_BASE_URL"));

        assert!(load(&[("SHOPFRONT_API_BASE_URL", "ftp://files.example")]).is_err());
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(load(&[("SHOPFRONT_API_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("SHOPFRONT_API_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("SHOPFRONT_TAX_RATE", "1.5")]).is_err());
        assert!(load(&[("SHOPFRONT_SHIPPING_EXPRESS", "-1")]).is_err());
    }
}
