//! Error type definitions.
//!
//! This module defines all error types and the crawl event kinds counted by
//! [`super::CrawlStats`].

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::filters::{FilterKey, FilterShape};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Filter criteria that cannot be compiled into a query.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The value's shape differs from the shape the key declares.
    #[error("filter `{key}` expects a {expected} value, got a {found} value")]
    ShapeMismatch {
        key: FilterKey,
        expected: FilterShape,
        found: FilterShape,
    },

    /// The value is not in the key's lookup table.
    #[error("filter `{key}` has no choice named \"{value}\"")]
    UnknownChoice { key: FilterKey, value: String },

    /// Numeric bound is negative, infinite or NaN.
    #[error("filter `{key}` needs a finite, non-negative bound, got {value}")]
    InvalidBound { key: FilterKey, value: f64 },
}

/// Failure to retrieve a usable page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// A bot-check interstitial was served and there was no proxy to retry with.
    #[error("Bot check triggered for {url}, use proxies to get past the IP block")]
    Blocked { url: String },

    /// Every proxy in the pool was tried once for this request without success.
    #[error("No working proxies: {attempts} proxies failed for {url}")]
    ExhaustedProxies { url: String, attempts: usize },

    /// Connection, DNS, TLS or timeout failure with no proxy to retry with.
    #[error("Request to {url} failed: {error}")]
    Transport { url: String, error: ReqwestError },
}

/// Structural problems found while extracting data from a page.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The offer is an auction or an advertisement, not a buy-now listing.
    #[error("Auctions and advertisements are not supported")]
    UnsupportedOfferKind,

    /// An element the page layout guarantees is absent.
    #[error("Missing element: {element}")]
    MissingElement { element: &'static str },

    /// An element is present but its value cannot be parsed.
    #[error("Invalid {field} value: \"{value}\"")]
    InvalidValue { field: &'static str, value: String },

    /// The parameters section does not have the expected nesting.
    #[error("Unexpected parameters layout: {detail}")]
    ParameterShape { detail: String },
}

/// Errors surfaced by crawl operations.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The URL is not a single-offer page; raised before any request.
    #[error("Passed url is not that of a product: {url}")]
    Validation { url: String },

    /// The offer is an auction or advertisement. Crawls skip these.
    #[error("Offer {url} is an auction or advertisement")]
    UnsupportedOfferKind { url: String },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page was fetched but does not have the expected structure.
    #[error("Failed to extract {url}: {error}")]
    Extract { url: String, error: ExtractError },

    #[error("Invalid url {url}: {error}")]
    Url {
        url: String,
        error: url::ParseError,
    },
}

impl CrawlError {
    /// Builds the error for an extraction failure on `url`, keeping the offer-kind
    /// signal distinct from structural failures.
    pub fn from_extract(url: impl Into<String>, error: ExtractError) -> Self {
        match error {
            ExtractError::UnsupportedOfferKind => CrawlError::UnsupportedOfferKind { url: url.into() },
            error => CrawlError::Extract {
                url: url.into(),
                error,
            },
        }
    }

    /// True when every proxy failed; the run cannot continue.
    pub fn is_exhausted_proxies(&self) -> bool {
        matches!(self, CrawlError::Fetch(FetchError::ExhaustedProxies { .. }))
    }
}

/// Events counted during a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum CrawlEvent {
    ListingPageFetched,
    OfferScraped,
    // Skips
    OfferSkippedUnsupported,
    OfferSkippedDuplicate,
    OfferSkippedInvalidUrl,
    // Failed attempts
    BlockedResponse,
    TransportTimeout,
    TransportConnect,
    TransportOther,
    // Proxy rotation
    ProxyRotated,
    ProxyCycleExhausted,
}

impl std::fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CrawlEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlEvent::ListingPageFetched => "Listing pages fetched",
            CrawlEvent::OfferScraped => "Offers scraped",
            CrawlEvent::OfferSkippedUnsupported => "Auctions/adverts skipped",
            CrawlEvent::OfferSkippedDuplicate => "Duplicate offers skipped",
            CrawlEvent::OfferSkippedInvalidUrl => "Invalid offer urls skipped",
            CrawlEvent::BlockedResponse => "Bot-check responses",
            CrawlEvent::TransportTimeout => "Request timeouts",
            CrawlEvent::TransportConnect => "Connection failures",
            CrawlEvent::TransportOther => "Other request failures",
            CrawlEvent::ProxyRotated => "Proxy changes",
            CrawlEvent::ProxyCycleExhausted => "Exhausted proxy cycles",
        }
    }

    /// True for events that record a failed attempt.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CrawlEvent::BlockedResponse
                | CrawlEvent::TransportTimeout
                | CrawlEvent::TransportConnect
                | CrawlEvent::TransportOther
                | CrawlEvent::ProxyCycleExhausted
        )
    }
}
