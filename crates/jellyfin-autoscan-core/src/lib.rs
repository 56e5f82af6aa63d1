//! jellyfin-autoscan core domain types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Runtime specifics
//!
//! It holds the process configuration and the scheduled-task records
//! returned by the Jellyfin API, along with the matching rules used to
//! pick the library refresh task out of that list.

pub mod config;
pub mod error;
pub mod task;

// Re-export commonly used types
pub use config::{Config, LogLevel};
pub use error::ConfigError;
pub use task::{decode_task_list, find_refresh_library, ScheduledTaskRecord, TaskDescriptor, REFRESH_LIBRARY_KEY};
