//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHEETSTALL_FEED_URL` - Catalog feed URL (spreadsheet gviz endpoint)
//!
//! ## Optional
//! - `SHEETSTALL_ORDER_URL` - Order submission endpoint; checkout is refused
//!   with a configuration message when unset
//! - `SHEETSTALL_HOST` - Bind address (default: 127.0.0.1)
//! - `SHEETSTALL_PORT` - Listen port (default: 3000)
//! - `SHEETSTALL_CART_PATH` - Cart persistence slot (default: sheetstall-cart.json)
//! - `SHEETSTALL_FEED_COLUMNS` - Feed column order (default:
//!   id,name,category,price,description,image); deployments disagree on
//!   layout, so this is configuration rather than a constant
//! - `SHEETSTALL_FEED_PREFIX_LEN` - Feed wrapper prefix length (default: 47)
//! - `SHEETSTALL_FEED_SUFFIX_LEN` - Feed wrapper suffix length (default: 2)
//! - `SHEETSTALL_ORDER_SUCCESS` - Order endpoint success convention,
//!   `status` or `flag` (default: status)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::feed::ColumnMap;

/// Default wrapper prefix length of the gviz feed response.
const DEFAULT_PREFIX_LEN: usize = 47;

/// Default wrapper suffix length of the gviz feed response.
const DEFAULT_SUFFIX_LEN: usize = 2;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    /// Catalog feed configuration
    pub feed: FeedConfig,
    /// Order endpoint configuration
    pub order: OrderConfig,
    /// Path of the durable cart slot
    pub cart_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog feed configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed URL returning wrapper-framed gviz JSON
    pub url: Url,
    /// Bytes to strip from the front of the response
    pub prefix_len: usize,
    /// Bytes to strip from the end of the response
    pub suffix_len: usize,
    /// Positional column-to-field mapping
    pub columns: ColumnMap,
}

/// Order endpoint configuration.
#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// Order submission URL; `None` disables checkout
    pub url: Option<Url>,
    /// How the endpoint signals a successful order
    pub success: SuccessConvention,
}

/// Success convention of the external order endpoint.
///
/// Observed deployments disagree: some return `{"success": true}`, others a
/// `{"status": "ok"}` string (or no status at all, success implied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessConvention {
    /// Body carries an explicit boolean `success` flag.
    Flag,
    /// Body carries a `status` string; a missing status implies success.
    #[default]
    Status,
}

impl SuccessConvention {
    /// Parse the `SHEETSTALL_ORDER_SUCCESS` value.
    ///
    /// # Errors
    ///
    /// Returns the offending value if it names neither convention.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flag" => Ok(Self::Flag),
            "status" => Ok(Self::Status),
            other => Err(format!("expected 'flag' or 'status', got '{other}'")),
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
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SHEETSTALL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHEETSTALL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHEETSTALL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHEETSTALL_PORT".to_string(), e.to_string()))?;

        let feed = FeedConfig::from_env()?;
        let order = OrderConfig::from_env()?;

        let cart_path =
            PathBuf::from(get_env_or_default("SHEETSTALL_CART_PATH", "sheetstall-cart.json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            feed,
            order,
            cart_path,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_url("SHEETSTALL_FEED_URL")?;
        let prefix_len = get_usize_or_default("SHEETSTALL_FEED_PREFIX_LEN", DEFAULT_PREFIX_LEN)?;
        let suffix_len = get_usize_or_default("SHEETSTALL_FEED_SUFFIX_LEN", DEFAULT_SUFFIX_LEN)?;

        let columns = match get_optional_env("SHEETSTALL_FEED_COLUMNS") {
            Some(spec) => ColumnMap::parse(&spec).map_err(|e| {
                ConfigError::InvalidEnvVar("SHEETSTALL_FEED_COLUMNS".to_string(), e.to_string())
            })?,
            None => ColumnMap::default(),
        };

        Ok(Self {
            url,
            prefix_len,
            suffix_len,
            columns,
        })
    }
}

impl OrderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match get_optional_env("SHEETSTALL_ORDER_URL") {
            Some(raw) => Some(Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("SHEETSTALL_ORDER_URL".to_string(), e.to_string())
            })?),
            None => None,
        };

        let success = match get_optional_env("SHEETSTALL_ORDER_SUCCESS") {
            Some(raw) => SuccessConvention::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("SHEETSTALL_ORDER_SUCCESS".to_string(), e)
            })?,
            None => SuccessConvention::default(),
        };

        Ok(Self { url, success })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable parsed as a URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an environment variable parsed as usize, with a default.
fn get_usize_or_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    match get_optional_env(key) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_convention_parse() {
        assert_eq!(
            SuccessConvention::parse("flag").unwrap(),
            SuccessConvention::Flag
        );
        assert_eq!(
            SuccessConvention::parse(" Status ").unwrap(),
            SuccessConvention::Status
        );
        assert!(SuccessConvention::parse("maybe").is_err());
    }

    #[test]
    fn test_success_convention_default_is_status() {
        assert_eq!(SuccessConvention::default(), SuccessConvention::Status);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            feed: FeedConfig {
                url: Url::parse("https://example.com/feed").unwrap(),
                prefix_len: 47,
                suffix_len: 2,
                columns: ColumnMap::default(),
            },
            order: OrderConfig {
                url: None,
                success: SuccessConvention::Status,
            },
            cart_path: PathBuf::from("cart.json"),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("SHEETSTALL_FEED_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHEETSTALL_FEED_URL"
        );
    }
}
