use std::time::Duration;
use teachback_core::{Endpoints, Url};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: Url,
    pub endpoints: Endpoints,
    pub notification_ttl: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_url_str = std::env::var("TEACHBACK_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
        let api_url = validate_api_url(&api_url_str)
            .map_err(|reason| ConfigError::InvalidValue("TEACHBACK_API_URL".to_string(), reason))?;

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            start: endpoint_var("TEACHBACK_START_PATH", defaults.start)?,
            step: endpoint_var("TEACHBACK_STEP_PATH", defaults.step)?,
            reset: endpoint_var("TEACHBACK_RESET_PATH", defaults.reset)?,
        };

        let ttl_str =
            std::env::var("TEACHBACK_NOTIFICATION_SECS").unwrap_or_else(|_| "3".to_string());
        let ttl_secs = ttl_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "TEACHBACK_NOTIFICATION_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", ttl_str),
                )
            })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_url,
            endpoints,
            notification_ttl: Duration::from_secs(ttl_secs),
            log_level,
        })
    }
}

/// Parses `url` as an absolute http(s) URL with a host.
pub fn validate_api_url(url: &str) -> Result<Url, String> {
    let parsed = Url::parse(url).map_err(|e| format!("'{}' is not a valid URL: {}", url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("'{}' must use http:// or https://", url));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("'{}' has no host", url));
    }
    Ok(parsed)
}

fn endpoint_var(name: &str, default: String) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(path) if path.trim().is_empty() => Err(ConfigError::InvalidValue(
            name.to_string(),
            "endpoint path must not be empty".to_string(),
        )),
        Ok(path) => Ok(path),
        Err(_) => Ok(default),
    }
}
