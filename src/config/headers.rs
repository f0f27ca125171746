//! Browser header set sent with every marketplace request.
//!
//! Values mimic a desktop Chrome navigating from the marketplace root. Names
//! not covered by `reqwest::header` constants are kept as lowercase strings.

/// Accept header of a top-level document navigation
pub const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
/// Accept-Language header (Polish marketplace, English fallback)
pub const ACCEPT_LANGUAGE_VALUE: &str = "pl-PL,pl;q=0.9,en-US;q=0.8,en;q=0.7";
/// Cache-Control header
pub const CACHE_CONTROL_VALUE: &str = "no-cache";
/// Pragma header
pub const PRAGMA_VALUE: &str = "no-cache";
/// Do-Not-Track header
pub const DNT_VALUE: &str = "1";
/// Upgrade-Insecure-Requests header
pub const UPGRADE_INSECURE_REQUESTS_VALUE: &str = "1";

/// Sec-Fetch-* header names and values
pub const HEADER_SEC_FETCH_DEST: &str = "sec-fetch-dest";
pub const HEADER_SEC_FETCH_MODE: &str = "sec-fetch-mode";
pub const HEADER_SEC_FETCH_SITE: &str = "sec-fetch-site";
pub const HEADER_SEC_FETCH_USER: &str = "sec-fetch-user";
pub const HEADER_SEC_GPC: &str = "sec-gpc";

/// Fetch metadata for a same-origin document navigation.
pub const SEC_FETCH_HEADERS: &[(&str, &str)] = &[
    (HEADER_SEC_FETCH_DEST, "document"),
    (HEADER_SEC_FETCH_MODE, "navigate"),
    (HEADER_SEC_FETCH_SITE, "same-origin"),
    (HEADER_SEC_FETCH_USER, "?1"),
    (HEADER_SEC_GPC, "1"),
];
