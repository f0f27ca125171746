//! Listing page extraction.
//!
//! Reads the offer entries and the pagination control of one search-results
//! page.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::error_handling::ExtractError;
use crate::models::ListingPage;
use crate::utils::{attr_trimmed, parse_selector_unsafe};

// Promoted slots lack the analytics attributes and are not offer entries
const OFFER_SELECTOR_STR: &str = r#"article[data-role="offer"][data-analytics-view-custom-index0][data-analytics-view-custom-deliverylabel][data-analytics-view-custom-page][data-analytics-view-value]"#;
const OFFER_LINK_SELECTOR_STR: &str = r#"a[rel="nofollow"][tabindex="-1"]"#;
const PAGINATION_SELECTOR_STR: &str = r#"input[data-role="page-number-input"][data-page]"#;

static OFFER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(OFFER_SELECTOR_STR, "OFFER_SELECTOR"));

static OFFER_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(OFFER_LINK_SELECTOR_STR, "OFFER_LINK_SELECTOR"));

static PAGINATION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(PAGINATION_SELECTOR_STR, "PAGINATION_SELECTOR"));

/// Extracts the offer URLs and pagination state from a listing page.
///
/// Offer links are resolved against `page_url`. When the page has no
/// pagination control (a single page of results, or none at all) it is the
/// last page, and its number is taken from the `p` query parameter.
///
/// # Errors
///
/// - `ExtractError::MissingElement` when an offer entry has no link
/// - `ExtractError::InvalidValue` when a link or a page number cannot be parsed
pub fn extract_listing(document: &Html, page_url: &Url) -> Result<ListingPage, ExtractError> {
    let offers = document
        .select(&OFFER_SELECTOR)
        .map(|entry| {
            let href = entry
                .select(&OFFER_LINK_SELECTOR)
                .find_map(|link| attr_trimmed(link, "href"))
                .ok_or(ExtractError::MissingElement {
                    element: "offer link",
                })?;
            page_url
                .join(href)
                .map(String::from)
                .map_err(|_| ExtractError::InvalidValue {
                    field: "offer link",
                    value: href.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (current_page, max_page) = match document.select(&PAGINATION_SELECTOR).next() {
        Some(input) => {
            let current = parse_page_number(attr_trimmed(input, "data-page"), "current page")?;
            let max = parse_page_number(attr_trimmed(input, "data-maxpage"), "max page")?;
            (current, max)
        }
        None => {
            let current = requested_page(page_url);
            (current, current)
        }
    };

    Ok(ListingPage {
        offers,
        current_page,
        max_page,
        has_more_pages: current_page < max_page,
    })
}

fn parse_page_number(raw: Option<&str>, field: &'static str) -> Result<u32, ExtractError> {
    let raw = raw.ok_or(ExtractError::MissingElement { element: field })?;
    raw.parse().map_err(|_| ExtractError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

fn requested_page(page_url: &Url) -> u32 {
    page_url
        .query_pairs()
        .find(|(key, _)| key == "p")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(1)
}
