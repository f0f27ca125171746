//! Free proxy list scraping.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::utils::parse_selector_unsafe;

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(".DataGrid tbody tr", "ROW_SELECTOR"));

static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td", "CELL_SELECTOR"));

/// The IP cell holds a script writing a URL-encoded anchor; the address is its text.
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r">(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})<").unwrap_or_else(|e| {
        panic!("Failed to compile IP_PATTERN: {e}. This is a programming error.")
    })
});

/// Query of the HTTPS-capable list across all anonymity levels.
const LIST_QUERY: &[(&str, &str)] = &[
    ("c", ""),
    ("pt", ""),
    ("pr", "HTTPS"),
    ("a[]", "0"),
    ("a[]", "1"),
    ("a[]", "2"),
    ("u", "0"),
];

/// Scrapes `host:port` proxies from the freeproxylists.net table at `list_url`.
///
/// Any failure (request, unexpected layout) yields an empty list.
pub async fn scrape_free_proxy_lists(client: &reqwest::Client, list_url: &str) -> Vec<String> {
    let body = match fetch_list(client, list_url).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to download free proxy list from {}: {}", list_url, e);
            return Vec::new();
        }
    };
    let proxies = parse_proxy_table(&body);
    debug!("Scraped {} free proxies", proxies.len());
    proxies
}

async fn fetch_list(client: &reqwest::Client, list_url: &str) -> Result<String, reqwest::Error> {
    client
        .get(list_url)
        .query(LIST_QUERY)
        .header(reqwest::header::REFERER, list_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Extracts `ip:port` pairs from the list table, header row skipped.
///
/// Single-cell rows (ads, separators) are ignored. A data row without a
/// decodable IP means the layout changed, and the whole table is discarded.
pub fn parse_proxy_table(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let mut proxies = Vec::new();
    for row in document.select(&ROW_SELECTOR).skip(1) {
        let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < 2 {
            continue;
        }
        match (decode_ip(cells[0]), first_text(cells[1])) {
            (Some(ip), Some(port)) => proxies.push(format!("{ip}:{port}")),
            _ => {
                warn!("Unexpected free proxy list layout, ignoring the list");
                return Vec::new();
            }
        }
    }
    proxies
}

fn first_text(cell: ElementRef<'_>) -> Option<&str> {
    cell.text().map(str::trim).find(|text| !text.is_empty())
}

fn decode_ip(cell: ElementRef<'_>) -> Option<String> {
    let raw = first_text(cell)?;
    let decoded = urlencoding::decode(raw).ok()?;
    IP_PATTERN
        .captures(&decoded)
        .and_then(|captures| captures.get(1))
        .map(|ip| ip.as_str().to_string())
}
