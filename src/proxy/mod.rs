//! Proxy endpoints, the rotation pool and its sources.
//!
//! This module provides:
//! - The rotation pool with per-request cycles ([`ProxyPool`], [`ProxyCycle`])
//! - Loading proxies from a file
//! - Scraping a public free-proxy list
//! - Validating proxies against a known offer

pub mod checker;
pub mod file;
pub mod gatherer;
mod pool;

// Re-export public API
pub use checker::filter_proxies;
pub use file::load_from_file;
pub use gatherer::scrape_free_proxy_lists;
pub use pool::{ProxyCycle, ProxyEndpoint, ProxyParseError, ProxyPool, SharedProxyPool};
