//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `STOREFRONT_BASE_URL` - Origin whose links the router intercepts (default: `http://localhost:5173`)
//! - `STOREFRONT_TRANSITION_SETTLE_MS` - Exit transition settle window (default: 300)
//! - `STOREFRONT_TOAST_TTL_MS` - How long a notification stays visible (default: 3000)
//! - `STOREFRONT_PAYMENT_SETTLE_MS` - Simulated payment settlement delay (default: 1500)
//! - `STOREFRONT_CATALOG_TTL_SECS` - Catalog cache time-to-live (default: 300)
//! - `FUNCTIONS_URL` - Base URL of the callable functions service

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:5173";
const DEFAULT_TRANSITION_SETTLE_MS: u64 = 300;
const DEFAULT_TOAST_TTL_MS: u64 = 3000;
const DEFAULT_PAYMENT_SETTLE_MS: u64 = 1500;
const DEFAULT_CATALOG_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin used to decide whether a clicked link is same-origin.
    pub base_url: Url,
    /// How long the exit transition is given to settle before rendering.
    pub transition_settle: Duration,
    /// Lifetime of a toast notification.
    pub toast_ttl: Duration,
    /// Delay of the simulated payment confirmation.
    pub payment_settle: Duration,
    /// Catalog cache time-to-live.
    pub catalog_ttl: Duration,
    /// Callable functions service, if configured.
    pub functions_url: Option<Url>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            transition_settle: Duration::from_millis(DEFAULT_TRANSITION_SETTLE_MS),
            toast_ttl: Duration::from_millis(DEFAULT_TOAST_TTL_MS),
            payment_settle: Duration::from_millis(DEFAULT_PAYMENT_SETTLE_MS),
            catalog_ttl: Duration::from_secs(DEFAULT_CATALOG_TTL_SECS),
            functions_url: None,
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
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup("STOREFRONT_BASE_URL") {
            Some(raw) => parse_url("STOREFRONT_BASE_URL", &raw)?,
            None => default_base_url(),
        };
        let functions_url = lookup("FUNCTIONS_URL")
            .map(|raw| parse_url("FUNCTIONS_URL", &raw))
            .transpose()?;

        Ok(Self {
            base_url,
            transition_settle: Duration::from_millis(parse_u64(
                &lookup,
                "STOREFRONT_TRANSITION_SETTLE_MS",
                DEFAULT_TRANSITION_SETTLE_MS,
            )?),
            toast_ttl: Duration::from_millis(parse_u64(
                &lookup,
                "STOREFRONT_TOAST_TTL_MS",
                DEFAULT_TOAST_TTL_MS,
            )?),
            payment_settle: Duration::from_millis(parse_u64(
                &lookup,
                "STOREFRONT_PAYMENT_SETTLE_MS",
                DEFAULT_PAYMENT_SETTLE_MS,
            )?),
            catalog_ttl: Duration::from_secs(parse_u64(
                &lookup,
                "STOREFRONT_CATALOG_TTL_SECS",
                DEFAULT_CATALOG_TTL_SECS,
            )?),
            functions_url,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

#[allow(clippy::expect_used)] // constant, covered by tests
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.transition_settle, Duration::from_millis(300));
        assert_eq!(config.toast_ttl, Duration::from_millis(3000));
        assert_eq!(config.base_url.as_str(), "http://localhost:5173/");
        assert!(config.functions_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("STOREFRONT_TRANSITION_SETTLE_MS", "120"),
            ("STOREFRONT_BASE_URL", "https://shop.example"),
            ("FUNCTIONS_URL", "https://functions.example/api/"),
        ]))
        .unwrap();
        assert_eq!(config.transition_settle, Duration::from_millis(120));
        assert_eq!(config.base_url.host_str(), Some("shop.example"));
        assert_eq!(
            config.functions_url.unwrap().as_str(),
            "https://functions.example/api/"
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[(
            "STOREFRONT_TOAST_TTL_MS",
            "soon",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_TOAST_TTL_MS"));
    }
}
