//! Core domain errors.

use thiserror::Error;

/// Configuration errors, fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("{0} must be set in environment")]
    Missing(&'static str),
}
