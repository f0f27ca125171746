//! allegro_spider library: allegro.pl search crawling and offer scraping
//!
//! This library crawls marketplace search results page by page, expands every
//! buy-now offer into a structured [`ProductRecord`], and gets past IP-based
//! bot checks by rotating through a pool of HTTP proxies.
//!
//! # Example
//!
//! ```no_run
//! use allegro_spider::{Crawler, CrawlerConfig, FilterCriteria, FilterKey, FilterValue, SearchOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let crawler = Crawler::new(CrawlerConfig::default())?;
//! let filters = FilterCriteria::new()
//!     .with(FilterKey::Sorting, FilterValue::choice("price_from_lowest"));
//! let options = SearchOptions {
//!     max_results: Some(20),
//!     ..Default::default()
//! };
//!
//! let result = crawler.crawl("kabel usb", Some(&filters), Some(&options), None).await?;
//! println!("Scraped {} products from {} pages", result.products.len(), result.pages_fetched);
//! # Ok(())
//! # }
//! ```
//!
//! Crawls are async and need a Tokio runtime.

mod app;
pub mod config;
pub mod crawl;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod filters;
pub mod initialization;
pub mod models;
pub mod parse;
pub mod proxy;
mod utils;

// Re-export public API
pub use config::{CrawlerConfig, LogFormat, LogLevel, Opt};
pub use crawl::Crawler;
pub use error_handling::{CrawlError, CrawlEvent, CrawlStats, ExtractError, FetchError, FilterError};
pub use filters::{compile, FilterCriteria, FilterKey, FilterValue};
pub use models::{CrawlResult, ListingPage, ProductRecord, SearchOptions};
pub use proxy::{ProxyEndpoint, ProxyPool};
pub use run::{run_spider, RunReport};

mod run {
    use std::path::PathBuf;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::{info, warn};

    use crate::app::{cancel_on_ctrl_c, gather_proxies, print_crawl_statistics, print_proxy_summary};
    use crate::config::Opt;
    use crate::crawl::url::validate_offer_url;
    use crate::crawl::Crawler;
    use crate::error_handling::CrawlError;
    use crate::export::write_products;
    use crate::models::ProductRecord;

    /// Results of a command-line run.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Number of products written to the output file
        pub products: usize,
        /// JSON file the products were written to
        pub output: PathBuf,
        /// True when the run was interrupted and the products are partial
        pub cancelled: bool,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs every `--search` query, then every `--crawl` term, and writes all
    /// collected products to the output file.
    ///
    /// A `--search` query that is an offer URL is scraped directly; any other
    /// query is a plain first-page search. `--crawl` terms get the filter and
    /// option flags.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client cannot be initialized
    /// - Proxies were requested but none is usable
    /// - A page cannot be fetched or has an unexpected layout
    /// - The output file cannot be written
    pub async fn run_spider(opt: Opt) -> Result<RunReport> {
        let start = Instant::now();
        let crawler = Crawler::new(opt.crawler_config()).context("Failed to initialize crawler")?;

        let pool = gather_proxies(&opt, crawler.fetcher()).await?;
        if let Some(pool) = &pool {
            print_proxy_summary(pool);
        }

        let ctrl_c = cancel_on_ctrl_c(crawler.cancellation_token());
        let cancel = crawler.cancellation_token();
        let mut products: Vec<ProductRecord> = Vec::new();

        for query in &opt.search {
            if cancel.is_cancelled() {
                break;
            }
            if validate_offer_url(query, &crawler.config().base_url).is_ok() {
                info!("Scraping offer {}", query);
                match crawler.scrape_offer(query, pool.as_ref(), None).await {
                    Ok(product) => products.push(product),
                    Err(CrawlError::UnsupportedOfferKind { url }) => {
                        warn!("Ignoring \"{}\" because it's advert or auction", url);
                    }
                    Err(e) => return Err(e).with_context(|| format!("Failed to scrape {query}")),
                }
            } else {
                info!("Searching \"{}\"", query);
                let result = crawler
                    .search(query, pool.as_ref())
                    .await
                    .with_context(|| format!("Search for \"{query}\" failed"))?;
                products.extend(result.products);
            }
        }

        if !opt.crawl.is_empty() {
            let filters = opt.filter_criteria();
            let options = opt.search_options();
            for term in &opt.crawl {
                if cancel.is_cancelled() {
                    break;
                }
                info!("Crawling \"{}\"", term);
                let result = crawler
                    .crawl(term, Some(&filters), Some(&options), pool.as_ref())
                    .await
                    .with_context(|| format!("Crawl of \"{term}\" failed"))?;
                products.extend(result.products);
            }
        }
        ctrl_c.abort();

        let written = write_products(&opt.output, &products)?;
        print_crawl_statistics(crawler.stats());

        Ok(RunReport {
            products: written,
            output: opt.output,
            cancelled: cancel.is_cancelled(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }
}
