//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the MindMate REST API (no trailing slash)
    pub api_base: String,
    /// File holding the persisted token, user record and streak marker
    pub storage_path: PathBuf,
    /// Tokens expiring within this many seconds are treated as expired
    pub expiry_buffer_secs: i64,
    /// Tokens with less than this many seconds left should be renewed
    pub refresh_threshold_secs: i64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api".to_string(),
            storage_path: PathBuf::from("data/session.json"),
            expiry_buffer_secs: crate::auth::token::DEFAULT_EXPIRY_BUFFER_SECS,
            refresh_threshold_secs: crate::auth::token::DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset values fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            api_base: env::var("MINDMATE_API_BASE")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            storage_path: env::var("MINDMATE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            expiry_buffer_secs: parse_var(
                "MINDMATE_EXPIRY_BUFFER_SECS",
                defaults.expiry_buffer_secs,
            )?,
            refresh_threshold_secs: parse_var(
                "MINDMATE_REFRESH_THRESHOLD_SECS",
                defaults.refresh_threshold_secs,
            )?,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: value.clone(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
