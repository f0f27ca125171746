//! Bot-check page detection.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::utils::parse_selector_unsafe;

static DIV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("div", "DIV_SELECTOR"));

static CAPTCHA_MARKER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe("div#analyticsCaptchaPassed", "CAPTCHA_MARKER_SELECTOR")
});

const CAPTCHA_PASSED_ATTR: &str = "data-analytics-captcha-passed";

/// Returns true when `document` is a bot-check interstitial.
///
/// A page is blocked when the CAPTCHA marker reports a failed check, or when it
/// has fewer than `div_threshold` `div` elements (the "enable JavaScript" page).
pub fn is_blocked_document(document: &Html, div_threshold: usize) -> bool {
    let captcha_failed = document
        .select(&CAPTCHA_MARKER_SELECTOR)
        .next()
        .and_then(|marker| marker.value().attr(CAPTCHA_PASSED_ATTR))
        .is_some_and(|passed| passed.contains("false"));
    if captcha_failed {
        return true;
    }
    document.select(&DIV_SELECTOR).take(div_threshold).count() < div_threshold
}

/// Parses `body` and applies [`is_blocked_document`].
pub fn is_blocked(body: &str, div_threshold: usize) -> bool {
    is_blocked_document(&Html::parse_document(body), div_threshold)
}
