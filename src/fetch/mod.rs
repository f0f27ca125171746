//! Page fetching with bot detection and proxy failover.
//!
//! [`Fetcher::attempt`] performs one request and classifies the result;
//! [`Fetcher::fetch`] repeats attempts through a proxy pool until a usable page
//! arrives or every proxy of the pool has been tried once for that request.

pub mod detection;
mod request;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use scraper::Html;
use url::Url;

use crate::config::CrawlerConfig;
use crate::error_handling::{
    update_error_stats, CrawlEvent, CrawlStats, FetchError, InitializationError,
};
use crate::initialization::{init_client, init_proxied_client};
use crate::proxy::{ProxyEndpoint, SharedProxyPool};

use request::RequestHeaders;

/// A fetched page that passed bot detection.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects; relative links resolve against it
    pub url: Url,
    pub body: String,
    pub status: StatusCode,
}

impl Page {
    /// Parses the body. Keep the returned DOM out of `.await` scopes; it is not `Send`.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Result of a single request attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Page(Page),
    /// A bot-check interstitial was served instead of content.
    Blocked,
    TransportError(reqwest::Error),
}

/// Retrieves marketplace pages, directly or through a proxy pool.
pub struct Fetcher {
    config: CrawlerConfig,
    direct: reqwest::Client,
    proxied: Mutex<HashMap<ProxyEndpoint, reqwest::Client>>,
    stats: Arc<CrawlStats>,
}

impl Fetcher {
    /// Creates a fetcher and its direct client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(config: CrawlerConfig, stats: Arc<CrawlStats>) -> Result<Self, InitializationError> {
        let direct = init_client(&config)?;
        Ok(Self {
            config,
            direct,
            proxied: Mutex::new(HashMap::new()),
            stats,
        })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn stats(&self) -> &Arc<CrawlStats> {
        &self.stats
    }

    fn client_for(&self, proxy: Option<&ProxyEndpoint>) -> Result<reqwest::Client, reqwest::Error> {
        let Some(endpoint) = proxy else {
            return Ok(self.direct.clone());
        };
        let mut clients = self.proxied.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(endpoint) {
            return Ok(client.clone());
        }
        let client = init_proxied_client(&self.config, endpoint)?;
        clients.insert(endpoint.clone(), client.clone());
        Ok(client)
    }

    /// Performs one GET of `url`, through `proxy` when given, and classifies it.
    ///
    /// `timeout` overrides the configured per-attempt timeout. The HTTP status
    /// is recorded on the page but not used for classification.
    pub async fn attempt(
        &self,
        url: &Url,
        proxy: Option<&ProxyEndpoint>,
        timeout: Option<Duration>,
    ) -> FetchOutcome {
        let client = match self.client_for(proxy) {
            Ok(client) => client,
            Err(e) => return FetchOutcome::TransportError(e),
        };
        let request = RequestHeaders::apply_to_request_builder(
            client.get(url.clone()),
            &self.config.base_url,
        )
        .timeout(timeout.unwrap_or(self.config.request_timeout));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransportError(e),
        };
        let status = response.status();
        let final_url = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::TransportError(e),
        };

        // Parsed here and again by `Page::document`; an `Html` cannot cross the caller's awaits
        if detection::is_blocked(&body, self.config.blocked_div_threshold) {
            return FetchOutcome::Blocked;
        }
        if !status.is_success() {
            debug!("{} answered with status {}", url, status);
        }
        FetchOutcome::Page(Page {
            url: final_url,
            body,
            status,
        })
    }

    /// Fetches `url`, failing over across `pool` until a usable page arrives.
    ///
    /// Without a pool (or with an empty one) a single direct attempt is made.
    /// With a pool, each fetch opens its own proxy cycle; a failed attempt
    /// marks the proxy bad and rotates to the next one.
    ///
    /// # Errors
    ///
    /// - `FetchError::Blocked` / `FetchError::Transport` when the direct attempt fails
    /// - `FetchError::ExhaustedProxies` when every proxy failed once for this request
    pub async fn fetch(
        &self,
        url: &Url,
        pool: Option<&SharedProxyPool>,
        timeout: Option<Duration>,
    ) -> Result<Page, FetchError> {
        let Some((pool, mut cycle)) = pool.and_then(|pool| pool.begin_cycle().map(|c| (pool, c)))
        else {
            return self.fetch_direct(url, timeout).await;
        };

        loop {
            let proxy = cycle.current().clone();
            match self.attempt(url, Some(&proxy), timeout).await {
                FetchOutcome::Page(page) => {
                    pool.mark_good(&proxy);
                    return Ok(page);
                }
                FetchOutcome::Blocked => {
                    debug!("Bot check triggered through proxy \"{}\" for {}", proxy, url);
                    self.stats.increment(CrawlEvent::BlockedResponse);
                }
                FetchOutcome::TransportError(e) => {
                    debug!("Request through proxy \"{}\" failed: {}", proxy, e);
                    update_error_stats(&self.stats, &e);
                }
            }
            pool.mark_bad(&proxy);

            match pool.advance(&mut cycle) {
                Some(next) => {
                    self.stats.increment(CrawlEvent::ProxyRotated);
                    debug!("Changing proxy to \"{}\"", next);
                }
                None => {
                    self.stats.increment(CrawlEvent::ProxyCycleExhausted);
                    warn!(
                        "All {} proxies failed for {}, giving up",
                        cycle.attempts(),
                        url
                    );
                    return Err(FetchError::ExhaustedProxies {
                        url: url.to_string(),
                        attempts: cycle.attempts(),
                    });
                }
            }
        }
    }

    async fn fetch_direct(&self, url: &Url, timeout: Option<Duration>) -> Result<Page, FetchError> {
        match self.attempt(url, None, timeout).await {
            FetchOutcome::Page(page) => Ok(page),
            FetchOutcome::Blocked => {
                self.stats.increment(CrawlEvent::BlockedResponse);
                Err(FetchError::Blocked {
                    url: url.to_string(),
                })
            }
            FetchOutcome::TransportError(error) => {
                update_error_stats(&self.stats, &error);
                Err(FetchError::Transport {
                    url: url.to_string(),
                    error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests;
