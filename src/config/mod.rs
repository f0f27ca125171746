//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, timeouts, thresholds)
//! - Browser header values
//! - Crawler configuration and CLI option types

pub mod cli;
mod constants;
mod headers;
mod types;

// Re-export all constants
pub use cli::Opt;
pub use constants::*;
pub use headers::*;
pub use types::{CrawlerConfig, LogFormat, LogLevel};
