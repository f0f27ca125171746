//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{CrawlEvent, CrawlStats};
use crate::proxy::ProxyPool;

/// Prints the non-zero crawl counters to the log.
pub fn print_crawl_statistics(stats: &CrawlStats) {
    let counts = stats.non_zero();
    if counts.is_empty() {
        return;
    }

    info!("Crawl statistics:");
    for event in CrawlEvent::iter().filter(|event| !event.is_failure()) {
        let count = stats.get(event);
        if count > 0 {
            info!("   {}: {}", event.as_str(), count);
        }
    }

    let total_failures = stats.total_failures();
    if total_failures > 0 {
        info!("Failure Counts ({} total):", total_failures);
        for event in CrawlEvent::iter().filter(CrawlEvent::is_failure) {
            let count = stats.get(event);
            if count > 0 {
                info!("   {}: {}", event.as_str(), count);
            }
        }
    }
}

/// Prints the proxies in use to the log.
pub fn print_proxy_summary(pool: &ProxyPool) {
    info!("Using {} proxies", pool.len());
    for endpoint in pool.endpoints() {
        log::debug!("   {}", endpoint);
    }
}
