//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HOSTDECK_API_URL` - Base URL of the catalog backend
//!
//! ## Optional
//! - `HOSTDECK_TOKEN_PATH` - Session file (default: `$XDG_CONFIG_HOME/hostdeck/session.json`)
//! - `HOSTDECK_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `HOSTDECK_EMPTY_CATALOG` - `defaults` or `empty` (default: defaults)
//! - `HOSTDECK_CACHE_CAPACITY` - Catalog cache capacity (default: 64)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::{Host, Url};

use crate::registry::EmptyCatalogPolicy;

const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_CACHE_CAPACITY: &str = "64";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// Backend base URL
    pub api_url: Url,
    /// Where the bearer token is persisted
    pub token_path: PathBuf,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// What to show when the backend returns no categories
    pub empty_catalog: EmptyCatalogPolicy,
    /// Maximum number of cached catalog entries
    pub cache_capacity: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("api_url", &self.api_url.as_str())
            .field("token_path", &self.token_path)
            .field("timeout", &self.timeout)
            .field("empty_catalog", &self.empty_catalog)
            .field("cache_capacity", &self.cache_capacity)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl ConsoleConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let api_url = parse_api_url(&env.required("HOSTDECK_API_URL")?)?;
        let token_path = env
            .optional("HOSTDECK_TOKEN_PATH")
            .map_or_else(default_token_path, PathBuf::from);
        let timeout = Duration::from_secs(positive(
            "HOSTDECK_TIMEOUT_SECS",
            &env.or_default("HOSTDECK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        )?);
        let empty_catalog = env
            .or_default("HOSTDECK_EMPTY_CATALOG", "defaults")
            .parse::<EmptyCatalogPolicy>()
            .map_err(|e| invalid("HOSTDECK_EMPTY_CATALOG", e))?;
        let cache_capacity = positive(
            "HOSTDECK_CACHE_CAPACITY",
            &env.or_default("HOSTDECK_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
        )?;
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_url,
            token_path,
            timeout,
            empty_catalog,
            cache_capacity,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Configuration pointing at `api_url` with every optional value at its
    /// default.
    #[must_use]
    pub fn new(api_url: Url, token_path: PathBuf) -> Self {
        Self {
            api_url,
            token_path,
            timeout: Duration::from_secs(30),
            empty_catalog: EmptyCatalogPolicy::default(),
            cache_capacity: 64,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

/// Default session file location.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/hostdeck` or `~/.config/hostdeck`,
/// ignoring the platform-specific `dirs::config_dir()`.
#[must_use]
pub fn default_token_path() -> PathBuf {
    let dir = std::env::var_os("XDG_CONFIG_HOME").map_or_else(
        || {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        },
        PathBuf::from,
    );
    dir.join("hostdeck").join("session.json")
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn invalid(key: &str, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), error.to_string())
}

/// Parse a count that must be at least one.
fn positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid(key, "must be greater than zero")),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(key, e)),
    }
}

/// Parse the backend URL. Plain HTTP is only expected for loopback hosts.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| invalid("HOSTDECK_API_URL", e))?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {}
        "http" => {
            tracing::warn!(
                url = %url,
                "HOSTDECK_API_URL uses plain http; bearer tokens will be sent unencrypted"
            );
        }
        other => {
            return Err(invalid(
                "HOSTDECK_API_URL",
                format!("unsupported scheme '{other}' (expected http or https)"),
            ));
        }
    }

    if url.cannot_be_a_base() {
        return Err(invalid("HOSTDECK_API_URL", "URL cannot be used as a base"));
    }

    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
