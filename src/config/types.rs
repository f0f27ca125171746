//! Configuration types.
//!
//! This module defines the enums and structs shared by the library and the CLI.

use std::time::Duration;

use clap::ValueEnum;
use url::Url;

use crate::config::constants::{
    BLOCKED_PAGE_DIV_THRESHOLD, DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
    MARKETPLACE_BASE_URL, PROXY_CHECK_URL,
};

/// `--log-level` values.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    /// Progress per page and per offer
    Info,
    /// Adds proxy rotation and skipped duplicates
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// `--log-format` values.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Colored single-line records for terminals
    Plain,
    /// One JSON object per record
    Json,
}

/// Crawler configuration (no CLI dependencies).
///
/// Everything here is fixed for the lifetime of a [`crate::Crawler`]; the
/// per-call knobs live in [`crate::SearchOptions`].
///
/// # Examples
///
/// ```no_run
/// use allegro_spider::CrawlerConfig;
///
/// let config = CrawlerConfig {
///     concurrency: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Marketplace root; listing and offer URLs are resolved against it
    pub base_url: Url,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Default per-attempt timeout, used when a call does not pass its own
    pub request_timeout: Duration,

    /// Offers fetched concurrently within one listing page (1 = sequential)
    pub concurrency: usize,

    /// Pages with fewer `div`s than this are classified as blocked
    pub blocked_div_threshold: usize,

    /// Offer fetched through each proxy by the proxy check
    pub proxy_check_url: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            // The constant is a valid absolute URL; a failure here is a build defect.
            base_url: Url::parse(MARKETPLACE_BASE_URL)
                .unwrap_or_else(|e| panic!("invalid MARKETPLACE_BASE_URL: {e}")),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            blocked_div_threshold: BLOCKED_PAGE_DIV_THRESHOLD,
            proxy_check_url: PROXY_CHECK_URL.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Returns a config pointing at a different marketplace root (mock servers in tests).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}
