//! HTTP client initialization.
//!
//! This module builds the `reqwest` clients used by the page fetcher: one for
//! direct requests and one per proxy endpoint.

use std::time::Duration;

use reqwest::{ClientBuilder, Proxy};

use crate::config::{CrawlerConfig, TCP_CONNECT_TIMEOUT_SECS};
use crate::proxy::ProxyEndpoint;

fn builder(config: &CrawlerConfig) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(config.request_timeout)
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
}

/// Initializes the HTTP client for direct (proxyless) requests.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the crawler config
/// - Default request timeout from the crawler config (calls may override it)
/// - TCP connect timeout
/// - Redirect following (reqwest default, up to 10 hops)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &CrawlerConfig) -> Result<reqwest::Client, reqwest::Error> {
    builder(config).build()
}

/// Initializes an HTTP client that sends every request through `endpoint`.
///
/// The proxy is registered for both `http` and `https` targets; HTTPS traffic
/// is tunnelled with `CONNECT`.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the proxy URL is rejected or client creation fails.
pub fn init_proxied_client(
    config: &CrawlerConfig,
    endpoint: &ProxyEndpoint,
) -> Result<reqwest::Client, reqwest::Error> {
    let proxy_url = endpoint.proxy_url();
    builder(config)
        .proxy(Proxy::http(&proxy_url)?)
        .proxy(Proxy::https(&proxy_url)?)
        .build()
}
