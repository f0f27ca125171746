//! Listing URL construction and offer URL validation.

use url::Url;

use crate::config::{
    CLICK_REDIRECT_PARAM, CLICK_REDIRECT_PATH_PREFIX, LISTING_PATH, OFFER_PATH_PREFIX,
};
use crate::error_handling::CrawlError;

/// Builds `<base>/listing?string=<term>[&<fragment>]&p=<page>`.
///
/// `term` is percent-encoded; `fragment` is a compiled filter query and is
/// appended as is.
pub fn listing_url(base: &Url, term: &str, fragment: &str, page: u32) -> Result<Url, CrawlError> {
    let mut url = base.join(LISTING_PATH).map_err(|error| CrawlError::Url {
        url: base.to_string(),
        error,
    })?;
    let mut query = format!("string={}", urlencoding::encode(term));
    if !fragment.is_empty() {
        query.push('&');
        query.push_str(fragment);
    }
    query.push_str(&format!("&p={page}"));
    url.set_query(Some(&query));
    Ok(url)
}

/// Checks that `url` points at a single offer on the marketplace at `base`.
///
/// Accepted shapes are an offer path (`/oferta/...`) and the analytics
/// click-through (`/events/clicks?...&redirect=<offer url>`). No request is made.
///
/// # Errors
///
/// `CrawlError::Validation` for anything else.
pub fn validate_offer_url(url: &str, base: &Url) -> Result<Url, CrawlError> {
    let invalid = || CrawlError::Validation {
        url: url.to_string(),
    };
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if is_offer_page(&parsed, base) || is_offer_redirect(&parsed, base) {
        Ok(parsed)
    } else {
        Err(invalid())
    }
}

fn on_marketplace(url: &Url, base: &Url) -> bool {
    let (Some(host), Some(base_host)) = (url.host_str(), base.host_str()) else {
        return false;
    };
    let same_host = host == base_host
        || host
            .strip_suffix(base_host)
            .is_some_and(|prefix| prefix.ends_with('.'));
    matches!(url.scheme(), "http" | "https") && same_host && url.port() == base.port()
}

fn is_offer_page(url: &Url, base: &Url) -> bool {
    on_marketplace(url, base)
        && url
            .path()
            .strip_prefix(OFFER_PATH_PREFIX)
            .is_some_and(|slug| !slug.is_empty())
}

fn is_offer_redirect(url: &Url, base: &Url) -> bool {
    on_marketplace(url, base)
        && url.path().starts_with(CLICK_REDIRECT_PATH_PREFIX)
        && url
            .query_pairs()
            .find(|(key, _)| key == CLICK_REDIRECT_PARAM)
            .and_then(|(_, target)| Url::parse(&target).ok())
            .is_some_and(|target| is_offer_page(&target, base))
}
