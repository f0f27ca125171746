//! Search crawling.
//!
//! [`Crawler::crawl`] walks listing pages from the start page, expands every
//! offer on each page into a [`ProductRecord`] and stops on the first of:
//! the result limit, the page limit, the last listing page, or cancellation.
//!
//! Every call clones the caller's [`ProxyPool`] and rotates its own copy, so
//! one pool can seed several independent crawls.

pub mod url;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::CrawlerConfig;
use crate::error_handling::{CrawlError, CrawlEvent, CrawlStats, InitializationError};
use crate::fetch::Fetcher;
use crate::filters::{compile, FilterCriteria};
use crate::models::{CrawlResult, ListingPage, ProductRecord, SearchOptions};
use crate::parse::{extract_listing, extract_product};
use crate::proxy::{ProxyPool, SharedProxyPool};

use self::url::{listing_url, validate_offer_url};

/// Whether an offer expansion ran to the end of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    Completed,
    Cancelled,
}

/// Products collected by one call, with the result limit and duplicate rule.
struct Accumulator {
    products: Vec<ProductRecord>,
    seen: HashSet<String>,
    limit: Option<usize>,
    avoid_duplicates: bool,
}

impl Accumulator {
    fn new(limit: Option<usize>, avoid_duplicates: bool) -> Self {
        Self {
            products: Vec::new(),
            seen: HashSet::new(),
            limit,
            avoid_duplicates,
        }
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.products.len() >= limit)
    }

    fn is_duplicate(&self, url: &str) -> bool {
        self.avoid_duplicates && self.seen.contains(url)
    }

    /// Adds `product` unless it is a duplicate. Returns whether it was added.
    fn push(&mut self, product: ProductRecord) -> bool {
        if self.avoid_duplicates && !self.seen.insert(product.url.clone()) {
            return false;
        }
        self.products.push(product);
        true
    }

    fn into_products(self) -> Vec<ProductRecord> {
        self.products
    }
}

/// Crawls marketplace searches and scrapes single offers.
pub struct Crawler {
    fetcher: Fetcher,
    stats: Arc<CrawlStats>,
    cancel: CancellationToken,
}

impl Crawler {
    /// Creates a crawler with fresh statistics.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client cannot be built.
    pub fn new(config: CrawlerConfig) -> Result<Self, InitializationError> {
        let stats = Arc::new(CrawlStats::new());
        let fetcher = Fetcher::new(config, Arc::clone(&stats))?;
        Ok(Self {
            fetcher,
            stats,
            cancel: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &CrawlerConfig {
        self.fetcher.config()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Token that stops running crawls at the next listing page or offer.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Scrapes one offer page.
    ///
    /// The URL is validated before any request is made.
    ///
    /// # Errors
    ///
    /// - `CrawlError::Validation` when `url` is not an offer page
    /// - `CrawlError::UnsupportedOfferKind` for auctions and advertisements
    /// - `CrawlError::Fetch` / `CrawlError::Extract` when the page cannot be retrieved or read
    pub async fn scrape_offer(
        &self,
        url: &str,
        pool: Option<&ProxyPool>,
        timeout: Option<Duration>,
    ) -> Result<ProductRecord, CrawlError> {
        let pool = pool.map(|pool| SharedProxyPool::new(pool.clone()));
        self.scrape_with(url, pool.as_ref(), timeout).await
    }

    /// Plain search: the first listing page only, with no filters or limits.
    pub async fn search(
        &self,
        term: &str,
        pool: Option<&ProxyPool>,
    ) -> Result<CrawlResult, CrawlError> {
        let pool = pool.map(|pool| SharedProxyPool::new(pool.clone()));
        let mut accumulator = Accumulator::new(None, false);
        if self.cancel.is_cancelled() {
            return Ok(CrawlResult {
                cancelled: true,
                ..Default::default()
            });
        }

        let url = listing_url(&self.config().base_url, term, "", 1)?;
        let listing = self.fetch_listing(&url, pool.as_ref(), None).await?;
        let expansion = self
            .expand(&listing.offers, pool.as_ref(), None, &mut accumulator)
            .await?;
        Self::log_proxy_failures(pool.as_ref());

        Ok(CrawlResult {
            products: accumulator.into_products(),
            pages_fetched: 1,
            cancelled: expansion == Expansion::Cancelled,
        })
    }

    /// Crawls search results for `term`.
    ///
    /// With neither `filters` nor `options` this is a plain [`Crawler::search`].
    /// Filters are compiled once, before any request.
    ///
    /// # Errors
    ///
    /// - `CrawlError::Filter` for an invalid filter value
    /// - `CrawlError::Fetch` when a page cannot be retrieved (including exhausted proxies)
    /// - `CrawlError::Extract` when a listing or offer page has an unexpected layout
    pub async fn crawl(
        &self,
        term: &str,
        filters: Option<&FilterCriteria>,
        options: Option<&SearchOptions>,
        pool: Option<&ProxyPool>,
    ) -> Result<CrawlResult, CrawlError> {
        if filters.is_none() && options.is_none() {
            warn!("No options and filters, scraping only first page");
            return self.search(term, pool).await;
        }

        let fragment = match filters {
            Some(filters) => compile(filters)?,
            None => String::new(),
        };
        let options = options.cloned().unwrap_or_default();
        let pool = pool.map(|pool| SharedProxyPool::new(pool.clone()));

        let mut result = CrawlResult::default();
        let mut accumulator = Accumulator::new(options.max_results, options.avoid_duplicates);
        if accumulator.is_full() || options.pages_to_fetch == Some(0) {
            return Ok(result);
        }

        let mut page = options.start_page.max(1);
        loop {
            if self.cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            let url = listing_url(&self.config().base_url, term, &fragment, page)?;
            let listing = self
                .fetch_listing(&url, pool.as_ref(), options.request_timeout)
                .await?;
            result.pages_fetched += 1;

            let expansion = self
                .expand(
                    &listing.offers,
                    pool.as_ref(),
                    options.request_timeout,
                    &mut accumulator,
                )
                .await?;
            if expansion == Expansion::Cancelled {
                result.cancelled = true;
                break;
            }
            if accumulator.is_full() {
                break;
            }
            if !listing.has_more_pages {
                info!("Reached last page, stopping");
                break;
            }
            if options
                .pages_to_fetch
                .is_some_and(|limit| result.pages_fetched >= limit)
            {
                break;
            }
            page += 1;
        }

        if result.cancelled {
            info!("Crawl of \"{}\" cancelled", term);
        }
        Self::log_proxy_failures(pool.as_ref());
        result.products = accumulator.into_products();
        Ok(result)
    }

    async fn fetch_listing(
        &self,
        url: &::url::Url,
        pool: Option<&SharedProxyPool>,
        timeout: Option<Duration>,
    ) -> Result<ListingPage, CrawlError> {
        debug!("Fetching listing {}", url);
        let page = self.fetcher.fetch(url, pool, timeout).await?;
        let listing = extract_listing(&page.document(), &page.url)
            .map_err(|e| CrawlError::from_extract(url.as_str(), e))?;
        self.stats.increment(CrawlEvent::ListingPageFetched);
        info!("Found {} products", listing.offers.len());
        Ok(listing)
    }

    async fn scrape_with(
        &self,
        url: &str,
        pool: Option<&SharedProxyPool>,
        timeout: Option<Duration>,
    ) -> Result<ProductRecord, CrawlError> {
        let target = validate_offer_url(url, &self.config().base_url)?;
        let page = self.fetcher.fetch(&target, pool, timeout).await?;
        let product = extract_product(&page.document(), url, &page.url)
            .map_err(|e| CrawlError::from_extract(url, e))?;
        Ok(product)
    }

    /// Scrapes the offers of one listing page into `accumulator`.
    async fn expand(
        &self,
        offers: &[String],
        pool: Option<&SharedProxyPool>,
        timeout: Option<Duration>,
        accumulator: &mut Accumulator,
    ) -> Result<Expansion, CrawlError> {
        let total = offers.len();

        if self.config().concurrency <= 1 {
            for (index, offer) in offers.iter().enumerate() {
                if accumulator.is_full() {
                    break;
                }
                if self.cancel.is_cancelled() {
                    return Ok(Expansion::Cancelled);
                }
                if accumulator.is_duplicate(offer) {
                    self.skip_duplicate(offer);
                    continue;
                }
                let outcome = self.scrape_with(offer, pool, timeout).await;
                self.accumulate(outcome, index, total, accumulator)?;
            }
            return Ok(Expansion::Completed);
        }

        // Offers already collected on earlier pages are not fetched again
        let pending: Vec<(usize, &String)> = offers
            .iter()
            .enumerate()
            .filter(|(_, offer)| {
                let duplicate = accumulator.is_duplicate(offer);
                if duplicate {
                    self.skip_duplicate(offer);
                }
                !duplicate
            })
            .collect();

        let outcomes: Vec<(usize, Option<Result<ProductRecord, CrawlError>>)> =
            stream::iter(pending)
                .map(|(index, offer)| async move {
                    if self.cancel.is_cancelled() {
                        return (index, None);
                    }
                    (index, Some(self.scrape_with(offer, pool, timeout).await))
                })
                .buffered(self.config().concurrency)
                .collect()
                .await;

        for (index, outcome) in outcomes {
            if accumulator.is_full() {
                break;
            }
            let Some(outcome) = outcome else {
                return Ok(Expansion::Cancelled);
            };
            self.accumulate(outcome, index, total, accumulator)?;
        }
        Ok(Expansion::Completed)
    }

    /// Records one offer outcome in listing position `index` of `total`.
    ///
    /// Skippable outcomes are logged and counted; any other error ends the crawl.
    fn accumulate(
        &self,
        outcome: Result<ProductRecord, CrawlError>,
        index: usize,
        total: usize,
        accumulator: &mut Accumulator,
    ) -> Result<(), CrawlError> {
        let position = index + 1;
        match outcome {
            Ok(product) => {
                let url = product.url.clone();
                info!("Scraping \"{}\" [{}/{}]", product.name, position, total);
                if accumulator.push(product) {
                    self.stats.increment(CrawlEvent::OfferScraped);
                } else {
                    self.skip_duplicate(&url);
                }
            }
            Err(CrawlError::UnsupportedOfferKind { url }) => {
                info!(
                    "Ignoring \"{}\" because it's advert or auction [{}/{}]",
                    url, position, total
                );
                self.stats.increment(CrawlEvent::OfferSkippedUnsupported);
            }
            Err(CrawlError::Validation { url }) => {
                warn!("Skipping \"{}\": not an offer url [{}/{}]", url, position, total);
                self.stats.increment(CrawlEvent::OfferSkippedInvalidUrl);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn skip_duplicate(&self, url: &str) {
        debug!("Skipping duplicate offer \"{}\"", url);
        self.stats.increment(CrawlEvent::OfferSkippedDuplicate);
    }

    fn log_proxy_failures(pool: Option<&SharedProxyPool>) {
        let Some(pool) = pool else {
            return;
        };
        for (endpoint, failures) in pool.snapshot().failure_counts() {
            if failures == 0 {
                continue;
            }
            info!("Proxy \"{}\" failed {} times", endpoint, failures);
        }
    }
}
