//! Process configuration.

use std::fmt;

use crate::error::ConfigError;

/// Environment variable holding the Jellyfin base URL.
pub const BASE_URL_VAR: &str = "JELLYFIN_BASE_URL";

/// Environment variable holding the Jellyfin API key.
pub const API_KEY_VAR: &str = "JELLYFIN_API_KEY";

/// Environment variable selecting log verbosity.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Verbose tracing, including outbound URLs and headers.
    Debug,
    /// Request-level outcomes only.
    #[default]
    Info,
}

impl LogLevel {
    /// Parse a raw `LOG_LEVEL` value.
    ///
    /// Only the exact string `DEBUG` selects debug output; anything else,
    /// typos included, falls back to the default.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw {
            "DEBUG" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Immutable process configuration, loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Root address of the Jellyfin API. May end with a slash.
    pub base_url: String,

    /// Jellyfin API key.
    pub api_key: String,

    /// Log verbosity.
    pub log_level: LogLevel,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Values are kept exactly as given; an empty value counts as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, BASE_URL_VAR)?;
        let api_key = required(&lookup, API_KEY_VAR)?;
        let log_level = lookup(LOG_LEVEL_VAR)
            .map(|raw| LogLevel::parse_lossy(&raw))
            .unwrap_or_default();

        Ok(Self {
            base_url,
            api_key,
            log_level,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}
