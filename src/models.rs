//! Data produced and consumed by crawl operations.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_START_PAGE;

/// One scraped buy-now offer.
///
/// Two records describe the same offer when their `url`s are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub name: String,
    /// URL of the deepest marketplace category in the breadcrumb
    pub category: String,
    pub price: f64,
    pub seller: String,
    /// Maximum purchasable quantity
    pub quantity: u32,
    /// Average rating, `0.0` when the offer has none
    pub rating: f64,
    /// Image URLs, primary image first
    pub images: Vec<String>,
    pub parameters: BTreeMap<String, String>,
}

/// Offers and pagination state read from one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute offer URLs in listing order
    pub offers: Vec<String>,
    pub current_page: u32,
    pub max_page: u32,
    pub has_more_pages: bool,
}

/// Per-call crawl options.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// First listing page to fetch (1-based)
    pub start_page: u32,
    /// Stop after this many listing pages
    pub pages_to_fetch: Option<u32>,
    /// Stop after this many products
    pub max_results: Option<usize>,
    /// Skip offers whose URL was already collected in this call
    pub avoid_duplicates: bool,
    /// Per-attempt timeout; the crawler default applies when `None`
    pub request_timeout: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            start_page: DEFAULT_START_PAGE,
            pages_to_fetch: None,
            max_results: None,
            avoid_duplicates: false,
            request_timeout: None,
        }
    }
}

/// Products accumulated by one crawl call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlResult {
    pub products: Vec<ProductRecord>,
    pub pages_fetched: u32,
    /// True when the crawl stopped on a cancellation request
    pub cancelled: bool,
}
