//! Crawl statistics tracking.
//!
//! Thread-safe counters for the events of one crawler instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::CrawlEvent;

/// Thread-safe crawl statistics tracker.
///
/// Uses one atomic counter per [`CrawlEvent`], all initialized to zero, so it
/// can be shared across concurrent offer workers through an `Arc`.
pub struct CrawlStats {
    counters: HashMap<CrawlEvent, AtomicUsize>,
}

impl CrawlStats {
    pub fn new() -> Self {
        let counters = CrawlEvent::iter()
            .map(|event| (event, AtomicUsize::new(0)))
            .collect();
        CrawlStats { counters }
    }

    pub fn increment(&self, event: CrawlEvent) {
        if let Some(counter) = self.counters.get(&event) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in CrawlStats initialization.",
                event
            );
        }
    }

    pub fn get(&self, event: CrawlEvent) -> usize {
        self.counters
            .get(&event)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of failed attempts (blocked, transport, exhausted cycles).
    pub fn total_failures(&self) -> usize {
        CrawlEvent::iter()
            .filter(CrawlEvent::is_failure)
            .map(|event| self.get(event))
            .sum()
    }

    /// Non-zero counters in declaration order.
    pub fn non_zero(&self) -> Vec<(CrawlEvent, usize)> {
        CrawlEvent::iter()
            .map(|event| (event, self.get(event)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}
