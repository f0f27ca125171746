//! Error handling and crawl statistics.
//!
//! This module provides:
//! - Error type definitions for filters, fetching, extraction and crawling
//! - Crawl statistics tracking (pages, offers, skips, failed attempts)
//! - Transport error categorization

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, update_error_stats};
pub use stats::CrawlStats;
pub use types::{
    CrawlError, CrawlEvent, ExtractError, FetchError, FilterError, InitializationError,
};
