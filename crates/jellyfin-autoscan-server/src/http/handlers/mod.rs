//! HTTP request handlers.

mod refresh;

pub use refresh::{refresh, run_refresh, SUCCESS_BODY};
