//! Browser request headers.
//!
//! This module applies the header set of a desktop browser navigating within
//! the marketplace to every outgoing request.

use reqwest::header::{
    HeaderName, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, PRAGMA, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use url::Url;

use crate::config::{
    ACCEPT_LANGUAGE_VALUE, ACCEPT_VALUE, CACHE_CONTROL_VALUE, DNT_VALUE, PRAGMA_VALUE,
    SEC_FETCH_HEADERS, UPGRADE_INSECURE_REQUESTS_VALUE,
};

/// Realistic browser request headers to reduce bot detection.
///
/// The User-Agent is set on the client itself; `Accept-Encoding` is left to
/// reqwest so it only advertises the encodings it can decode.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    ///
    /// `referer` is the marketplace root, so every request looks like a
    /// same-origin navigation.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
        referer: &Url,
    ) -> reqwest::RequestBuilder {
        let builder = builder
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(REFERER, referer.as_str())
            .header(DNT, DNT_VALUE)
            .header(UPGRADE_INSECURE_REQUESTS, UPGRADE_INSECURE_REQUESTS_VALUE)
            .header(PRAGMA, PRAGMA_VALUE)
            .header(CACHE_CONTROL, CACHE_CONTROL_VALUE);
        SEC_FETCH_HEADERS
            .iter()
            .fold(builder, |builder, &(name, value)| {
                builder.header(HeaderName::from_static(name), value)
            })
    }
}
