//! Command-line options.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::PossibleValuesParser;
use clap::{ArgGroup, Parser};

use crate::config::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_START_PAGE, DEFAULT_USER_AGENT,
    MAX_CONCURRENCY,
};
use crate::config::types::{CrawlerConfig, LogFormat, LogLevel};
use crate::filters::{FilterCriteria, FilterKey, FilterValue};
use crate::models::SearchOptions;

/// Command-line options for the allegro-spider binary.
///
/// # Examples
///
/// ```bash
/// # Scrape one offer and run a plain search
/// allegro-spider -s https://allegro.pl/oferta/kabel-123 "kabel usb" -o out.json
///
/// # Crawl two terms, cheapest first, at most 50 products, through checked proxies
/// allegro-spider -c "kabel usb" "ładowarka" --sorting price_from_lowest \
///     --max-results 50 --proxies-file proxies.txt --check-proxies -o out.json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "allegro-spider",
    about = "Crawls allegro.pl search results and offers into a JSON file.",
    group(ArgGroup::new("mode").required(true).multiple(true).args(["search", "crawl"]))
)]
pub struct Opt {
    /// Offer URLs to scrape or phrases to search (first result page only)
    #[arg(short, long, num_args = 1..)]
    pub search: Vec<String>,

    /// Search terms to crawl across result pages, with filters and options applied
    #[arg(short, long, num_args = 1..)]
    pub crawl: Vec<String>,

    /// JSON file the scraped products are written to
    #[arg(short, long, value_parser)]
    pub output: PathBuf,

    /// Sort order of the results
    #[arg(long, value_parser = PossibleValuesParser::new(FilterKey::Sorting.choice_names()))]
    pub sorting: Option<String>,

    /// Only offers with Allegro Smart free delivery
    #[arg(long)]
    pub smart_free_shipping: bool,

    /// Product conditions to include
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::ProductCondition.choice_names()))]
    pub product_condition: Vec<String>,

    /// Offer types to include
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::OfferType.choice_names()))]
    pub offer_type: Vec<String>,

    /// Lowest price
    #[arg(long)]
    pub price_min: Option<f64>,

    /// Highest price
    #[arg(long)]
    pub price_max: Option<f64>,

    /// Maximum delivery time
    #[arg(long, value_parser = PossibleValuesParser::new(FilterKey::DeliveryTime.choice_names()))]
    pub delivery_time: Option<String>,

    /// Delivery methods to include
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::DeliveryMethods.choice_names()))]
    pub delivery_methods: Vec<String>,

    /// Delivery options to require
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::DeliveryOptions.choice_names()))]
    pub delivery_options: Vec<String>,

    /// City the item is located in
    #[arg(long)]
    pub city: Option<String>,

    /// Voivodeships the item is located in
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::Voivodeship.choice_names()))]
    pub voivodeship: Vec<String>,

    /// Minimum seller rating
    #[arg(long, value_parser = PossibleValuesParser::new(FilterKey::ProductRating.choice_names()))]
    pub product_rating: Option<String>,

    /// Only offers with a VAT invoice
    #[arg(long)]
    pub vat_invoice: bool,

    /// Allegro programs the offer takes part in
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::AllegroPrograms.choice_names()))]
    pub allegro_programs: Vec<String>,

    /// Promotional occasions
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(FilterKey::Occasions.choice_names()))]
    pub occasions: Vec<String>,

    /// Stop after this many products per crawled term
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Stop after this many result pages per crawled term
    #[arg(long)]
    pub pages_to_fetch: Option<u32>,

    /// First result page to crawl
    #[arg(long, default_value_t = DEFAULT_START_PAGE, value_parser = clap::value_parser!(u32).range(1..))]
    pub start_page: u32,

    /// Skip offers already collected earlier in the same crawl
    #[arg(long)]
    pub avoid_duplicates: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Offers fetched concurrently within one result page
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY as u64, value_parser = clap::value_parser!(u64).range(1..=MAX_CONCURRENCY as u64))]
    pub concurrency: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// File with one host:port proxy per line
    #[arg(long, value_parser)]
    pub proxies_file: Option<PathBuf>,

    /// Add free HTTPS proxies scraped from freeproxylists.net
    #[arg(long)]
    pub use_free_proxies: bool,

    /// Drop proxies that cannot fetch a known offer before crawling
    #[arg(long)]
    pub check_proxies: bool,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Effective log level; `--verbose` wins over a less verbose `--log-level`.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        let level = log::LevelFilter::from(self.log_level.clone());
        if self.verbose {
            level.max(log::LevelFilter::Debug)
        } else {
            level
        }
    }

    /// Filter criteria built from the filter flags.
    pub fn filter_criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        criteria
            .set(
                FilterKey::Sorting,
                self.sorting.clone().map(FilterValue::Choice),
            )
            .set(
                FilterKey::SmartFreeShipping,
                self.smart_free_shipping.then_some(FilterValue::Flag(true)),
            )
            .set(
                FilterKey::ProductCondition,
                multi(&self.product_condition),
            )
            .set(FilterKey::OfferType, multi(&self.offer_type))
            .set(FilterKey::PriceMin, self.price_min.map(FilterValue::Bound))
            .set(FilterKey::PriceMax, self.price_max.map(FilterValue::Bound))
            .set(
                FilterKey::DeliveryTime,
                self.delivery_time.clone().map(FilterValue::Choice),
            )
            .set(FilterKey::DeliveryMethods, multi(&self.delivery_methods))
            .set(FilterKey::DeliveryOptions, multi(&self.delivery_options))
            .set(FilterKey::City, self.city.clone().map(FilterValue::Text))
            .set(FilterKey::Voivodeship, multi(&self.voivodeship))
            .set(
                FilterKey::ProductRating,
                self.product_rating.clone().map(FilterValue::Choice),
            )
            .set(
                FilterKey::VatInvoice,
                self.vat_invoice.then_some(FilterValue::Flag(true)),
            )
            .set(FilterKey::AllegroPrograms, multi(&self.allegro_programs))
            .set(FilterKey::Occasions, multi(&self.occasions));
        criteria
    }

    /// Per-crawl options built from the option flags.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            start_page: self.start_page,
            pages_to_fetch: self.pages_to_fetch,
            max_results: self.max_results,
            avoid_duplicates: self.avoid_duplicates,
            request_timeout: Some(Duration::from_secs(self.request_timeout)),
        }
    }

    /// Crawler configuration built from the connection flags.
    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig {
            user_agent: self.user_agent.clone(),
            request_timeout: Duration::from_secs(self.request_timeout),
            concurrency: self.concurrency as usize,
            ..CrawlerConfig::default()
        }
    }

    /// True when any proxy source was requested.
    pub fn wants_proxies(&self) -> bool {
        self.proxies_file.is_some() || self.use_free_proxies
    }
}

fn multi(values: &[String]) -> Option<FilterValue> {
    if values.is_empty() {
        None
    } else {
        Some(FilterValue::MultiChoice(values.to_vec()))
    }
}
