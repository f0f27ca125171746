//! Proxy gathering for a command-line run.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::config::{CrawlerConfig, Opt, FREE_PROXY_LIST_TIMEOUT_SECS, FREE_PROXY_LIST_URL, MAX_CONCURRENCY};
use crate::fetch::Fetcher;
use crate::initialization::init_client;
use crate::proxy::{filter_proxies, load_from_file, scrape_free_proxy_lists, ProxyEndpoint, ProxyPool};

/// Builds the proxy pool requested on the command line.
///
/// Proxies come from `--proxies-file` and/or the free list, in that order,
/// without repeats. With `--check-proxies` every candidate is tried once
/// against the proxy check offer and failures are dropped.
///
/// Returns `None` when no proxy source was requested.
///
/// # Errors
///
/// Fails when proxies were requested but none is left to use.
pub async fn gather_proxies(opt: &Opt, fetcher: &Fetcher) -> Result<Option<ProxyPool>> {
    if !opt.wants_proxies() {
        return Ok(None);
    }

    let mut candidates: Vec<ProxyEndpoint> = Vec::new();
    if let Some(path) = &opt.proxies_file {
        let loaded = load_from_file(path);
        info!("Loaded {} proxies from {}", loaded.len(), path.display());
        candidates.extend(loaded);
    }
    if opt.use_free_proxies {
        let scraped = free_proxies(fetcher.config()).await?;
        info!("Found {} free proxies", scraped.len());
        candidates.extend(scraped);
    }

    let mut pool = ProxyPool::new(candidates);
    if opt.check_proxies && !pool.is_empty() {
        info!("Checking {} proxies", pool.len());
        let config = fetcher.config();
        let working = filter_proxies(
            fetcher,
            pool.endpoints(),
            &config.proxy_check_url,
            Some(config.request_timeout),
            MAX_CONCURRENCY,
        )
        .await;
        pool.retain_usable(|endpoint| working.contains(endpoint));
    }

    if pool.is_empty() {
        bail!("No working proxies");
    }
    Ok(Some(pool))
}

async fn free_proxies(config: &CrawlerConfig) -> Result<Vec<ProxyEndpoint>> {
    let list_config = CrawlerConfig {
        request_timeout: Duration::from_secs(FREE_PROXY_LIST_TIMEOUT_SECS),
        ..config.clone()
    };
    let client = init_client(&list_config).context("Failed to initialize proxy list client")?;
    let proxies = scrape_free_proxy_lists(&client, FREE_PROXY_LIST_URL)
        .await
        .into_iter()
        .filter_map(|raw| match raw.parse::<ProxyEndpoint>() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("Skipping free proxy \"{}\": {}", raw, e);
                None
            }
        })
        .collect();
    Ok(proxies)
}
