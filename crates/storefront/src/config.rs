//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `OMNICART_HOST` - Bind address (default: 127.0.0.1)
//! - `OMNICART_PORT` - Listen port (default: 3000)
//! - `OMNICART_DATA_DIR` - Directory for the file-backed store; unset keeps
//!   all state in memory
//! - `OMNICART_SEED_URL` - Seed catalog endpoint (default:
//!   `https://dummyjson.com/products?limit=200`)
//! - `OMNICART_SEED_TIMEOUT_SECS` - Seed request timeout (default: 10)
//! - `OMNICART_SEED_CACHE_TTL_SECS` - Seed cache lifetime, 0 disables (default: 300)
//! - `OMNICART_LOG_FORMAT` - `pretty` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::catalog::SeedSource;

pub const DEFAULT_SEED_URL: &str = "https://dummyjson.com/products?limit=200";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// File-backed store directory; `None` means in-memory
    pub data_dir: Option<PathBuf>,
    /// Seed catalog endpoint
    pub seed_url: String,
    pub seed_timeout: Duration,
    /// Zero disables seed caching
    pub seed_cache_ttl: Duration,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: None,
            seed_url: DEFAULT_SEED_URL.to_string(),
            seed_timeout: Duration::from_secs(10),
            seed_cache_ttl: Duration::from_secs(300),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: parse_or(&lookup, "OMNICART_HOST", defaults.host)?,
            port: parse_or(&lookup, "OMNICART_PORT", defaults.port)?,
            data_dir: get_optional_env(&lookup, "OMNICART_DATA_DIR").map(PathBuf::from),
            seed_url: get_optional_env(&lookup, "OMNICART_SEED_URL").unwrap_or(defaults.seed_url),
            seed_timeout: Duration::from_secs(parse_or(
                &lookup,
                "OMNICART_SEED_TIMEOUT_SECS",
                defaults.seed_timeout.as_secs(),
            )?),
            seed_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "OMNICART_SEED_CACHE_TTL_SECS",
                defaults.seed_cache_ttl.as_secs(),
            )?),
            log_format: parse_or(&lookup, "OMNICART_LOG_FORMAT", defaults.log_format)?,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN").map(SecretString::from),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The remote seed source described by this configuration.
    #[must_use]
    pub fn seed_source(&self) -> SeedSource {
        SeedSource::Remote {
            url: self.seed_url.clone(),
            timeout: self.seed_timeout,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(lookup, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, None);
        assert_eq!(config.seed_url, DEFAULT_SEED_URL);
        assert_eq!(config.seed_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OMNICART_HOST", "0.0.0.0"),
            ("OMNICART_PORT", "8080"),
            ("OMNICART_DATA_DIR", "/var/lib/omnicart"),
            ("OMNICART_SEED_CACHE_TTL_SECS", "0"),
            ("OMNICART_LOG_FORMAT", "JSON"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/omnicart")));
        assert!(config.seed_cache_ttl.is_zero());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.sentry_dsn.as_ref().map(|s| s.expose_secret().to_string()),
            Some("https://key@sentry.example/1".to_string())
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[("OMNICART_DATA_DIR", "  "), ("OMNICART_PORT", "")]).unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("OMNICART_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "OMNICART_PORT"));
    }

    #[test]
    fn test_debug_redacts_dsn() {
        let config = load(&[("SENTRY_DSN", "https://secret-key@sentry.example/1")]).unwrap();
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
