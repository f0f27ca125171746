//! Transport error categorization.

use super::stats::CrawlStats;
use super::types::CrawlEvent;

/// Categorizes a `reqwest::Error` into the transport event it is counted as.
///
/// Timeouts are checked first: reqwest reports a connect timeout as both a
/// timeout and a connect error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> CrawlEvent {
    if error.is_timeout() {
        CrawlEvent::TransportTimeout
    } else if error.is_connect() {
        CrawlEvent::TransportConnect
    } else {
        CrawlEvent::TransportOther
    }
}

/// Records a transport failure in the crawl statistics.
pub fn update_error_stats(stats: &CrawlStats, error: &reqwest::Error) {
    stats.increment(categorize_reqwest_error(error));
}
