//! Configuration constants.
//!
//! This module defines the fixed configuration used throughout the crawler:
//! marketplace endpoints, timeouts, detection thresholds and concurrency defaults.

use std::time::Duration;

/// Root of the marketplace every listing and offer URL is resolved against.
pub const MARKETPLACE_BASE_URL: &str = "https://allegro.pl/";

/// Path of the search-results page, relative to the marketplace root.
pub const LISTING_PATH: &str = "listing";

/// Path prefix of a single-offer page.
pub const OFFER_PATH_PREFIX: &str = "/oferta/";

/// Path prefix of the analytics click-through redirect that lands on an offer.
pub const CLICK_REDIRECT_PATH_PREFIX: &str = "/events/clicks";

/// Query parameter of the click-through redirect carrying the target URL.
pub const CLICK_REDIRECT_PARAM: &str = "redirect";

/// Path prefix of a category page (used to pick the breadcrumb category).
pub const CATEGORY_PATH_PREFIX: &str = "/kategoria";

/// Default User-Agent string for HTTP requests.
///
/// Mimics a desktop Chrome on Windows. Users can override it with `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Per-attempt HTTP timeout in seconds.
/// Applies to a single request; a proxy retry gets a fresh timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default request timeout as a `Duration`.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS);

/// Pages with fewer `div` elements than this are treated as bot-check interstitials.
///
/// The "enable JavaScript" and CAPTCHA pages served to blocked clients are nearly
/// empty, while every real listing or offer page has hundreds of `div`s.
pub const BLOCKED_PAGE_DIV_THRESHOLD: usize = 10;

/// Number of offers fetched concurrently within one listing page.
/// 1 keeps the crawl strictly sequential.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Maximum number of offers fetched concurrently within one listing page.
pub const MAX_CONCURRENCY: usize = 16;

/// Offer used to check whether a proxy can reach the marketplace unblocked.
pub const PROXY_CHECK_URL: &str =
    "https://allegro.pl/oferta/typ-c-kabel-quick-charge-3-0-szybkie-ladowanie-7865547535";

/// Public list of free HTTPS proxies scraped by `--use-free-proxies`.
pub const FREE_PROXY_LIST_URL: &str = "http://www.freeproxylists.net/";

/// Timeout for scraping the free proxy list, in seconds.
pub const FREE_PROXY_LIST_TIMEOUT_SECS: u64 = 20;

/// First page of search results.
pub const DEFAULT_START_PAGE: u32 = 1;
