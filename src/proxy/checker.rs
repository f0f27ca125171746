//! Proxy validation against a known offer.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{info, warn};
use url::Url;

use super::pool::ProxyEndpoint;
use crate::fetch::{FetchOutcome, Fetcher};

/// Returns the candidates that can fetch `check_url` unblocked, in input order.
///
/// Each candidate gets exactly one attempt; a bot check or transport failure
/// disqualifies it. Up to `concurrency` candidates are checked at once.
pub async fn filter_proxies(
    fetcher: &Fetcher,
    candidates: &[ProxyEndpoint],
    check_url: &str,
    timeout: Option<Duration>,
    concurrency: usize,
) -> Vec<ProxyEndpoint> {
    let url = match Url::parse(check_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid proxy check url {}: {}", check_url, e);
            return Vec::new();
        }
    };
    let total = candidates.len();

    let verdicts: Vec<bool> = stream::iter(candidates.iter().enumerate())
        .map(|(index, proxy)| {
            let url = &url;
            async move {
                let working = matches!(
                    fetcher.attempt(url, Some(proxy), timeout).await,
                    FetchOutcome::Page(_)
                );
                info!(
                    "Proxy \"{}\" is {}working [{}/{}]",
                    proxy,
                    if working { "" } else { "not " },
                    index + 1,
                    total
                );
                working
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    candidates
        .iter()
        .zip(verdicts)
        .filter_map(|(proxy, working)| working.then(|| proxy.clone()))
        .collect()
}
