//! Proxy endpoints and the rotation pool.
//!
//! A [`ProxyPool`] is an ordered set of endpoints with a rotation cursor.
//! Each fetch opens a [`ProxyCycle`] that remembers the endpoints it tried;
//! the cycle is exhausted once it has tried every endpoint of the pool.

use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// A `host:port` proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
}

/// Reason a `host:port` string was rejected.
#[derive(Error, Debug, PartialEq)]
pub enum ProxyParseError {
    #[error("missing :port suffix")]
    MissingPort,
    #[error("host must be a dotted quad")]
    InvalidHost,
    #[error("invalid port")]
    InvalidPort,
}

impl ProxyEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// URL handed to the HTTP client for both `http` and `https` targets.
    pub fn proxy_url(&self) -> String {
        format!("http://{self}")
    }
}

impl FromStr for ProxyEndpoint {
    type Err = ProxyParseError;

    /// Parses `host:port`, where host has exactly three `.` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.trim().rsplit_once(':').ok_or(ProxyParseError::MissingPort)?;
        if host.matches('.').count() != 3 || host.split('.').any(str::is_empty) {
            return Err(ProxyParseError::InvalidHost);
        }
        let port = port
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ProxyParseError::InvalidPort)?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => write!(f, "[{}]:{}", ip, self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

/// Rotation state of one fetch: where it started, the active proxy and every
/// endpoint it has tried.
#[derive(Debug, Clone)]
pub struct ProxyCycle {
    start: ProxyEndpoint,
    current: ProxyEndpoint,
    tried: HashSet<ProxyEndpoint>,
}

impl ProxyCycle {
    fn new(start: ProxyEndpoint) -> Self {
        Self {
            current: start.clone(),
            tried: HashSet::from([start.clone()]),
            start,
        }
    }

    /// Proxy the current attempt goes through.
    pub fn current(&self) -> &ProxyEndpoint {
        &self.current
    }

    /// Endpoint the cycle started with.
    pub fn start(&self) -> &ProxyEndpoint {
        &self.start
    }

    /// Number of proxies tried so far, the current one included.
    pub fn attempts(&self) -> usize {
        self.tried.len()
    }

    pub fn has_tried(&self, endpoint: &ProxyEndpoint) -> bool {
        self.tried.contains(endpoint)
    }
}

/// Ordered proxy endpoints with a rotation cursor.
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    endpoints: Vec<ProxyEndpoint>,
    cursor: usize,
    failures: Vec<usize>,
}

impl ProxyPool {
    /// Creates a pool; repeated endpoints keep their first position only.
    pub fn new(endpoints: impl IntoIterator<Item = ProxyEndpoint>) -> Self {
        let mut unique: Vec<ProxyEndpoint> = Vec::new();
        for endpoint in endpoints {
            if !unique.contains(&endpoint) {
                unique.push(endpoint);
            }
        }
        let failures = vec![0; unique.len()];
        Self {
            endpoints: unique,
            cursor: 0,
            failures,
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn endpoints(&self) -> &[ProxyEndpoint] {
        &self.endpoints
    }

    /// Returns the endpoint under the cursor and advances, wrapping after the last.
    pub fn next(&mut self) -> Option<ProxyEndpoint> {
        if self.endpoints.is_empty() {
            return None;
        }
        let endpoint = self.endpoints[self.cursor % self.endpoints.len()].clone();
        self.cursor = (self.cursor + 1) % self.endpoints.len();
        Some(endpoint)
    }

    /// Re-arms the start marker: the next endpoint in rotation becomes both the
    /// active proxy and the start of a new cycle.
    pub fn begin_cycle(&mut self) -> Option<ProxyCycle> {
        self.next().map(ProxyCycle::new)
    }

    /// Moves `cycle` to the next endpoint in rotation it has not tried yet, or
    /// returns `None` once it has tried every endpoint of the pool.
    ///
    /// Other cycles may move the cursor in between; endpoints this cycle
    /// already tried are skipped whatever the cursor position.
    pub fn advance(&mut self, cycle: &mut ProxyCycle) -> Option<ProxyEndpoint> {
        for _ in 0..self.endpoints.len() {
            let candidate = self.next()?;
            if cycle.tried.insert(candidate.clone()) {
                cycle.current = candidate.clone();
                return Some(candidate);
            }
        }
        None
    }

    /// Records a failed attempt through `endpoint`.
    pub fn mark_bad(&mut self, endpoint: &ProxyEndpoint) {
        if let Some(index) = self.position(endpoint) {
            self.failures[index] += 1;
        }
    }

    /// Makes `endpoint` the first proxy tried by the next cycle.
    pub fn mark_good(&mut self, endpoint: &ProxyEndpoint) {
        if let Some(index) = self.position(endpoint) {
            self.cursor = index;
        }
    }

    /// Failed attempts per endpoint, in pool order.
    pub fn failure_counts(&self) -> Vec<(ProxyEndpoint, usize)> {
        self.endpoints
            .iter()
            .cloned()
            .zip(self.failures.iter().copied())
            .collect()
    }

    /// Drops every endpoint `is_usable` rejects and resets the rotation.
    pub fn retain_usable(&mut self, mut is_usable: impl FnMut(&ProxyEndpoint) -> bool) {
        let kept: Vec<ProxyEndpoint> = self
            .endpoints
            .iter()
            .filter(|endpoint| is_usable(endpoint))
            .cloned()
            .collect();
        *self = Self::new(kept);
    }

    fn position(&self, endpoint: &ProxyEndpoint) -> Option<usize> {
        self.endpoints.iter().position(|e| e == endpoint)
    }
}

/// A proxy pool shared by the concurrent fetches of one crawl call.
///
/// The mutex only guards cursor bookkeeping and is never held across a request.
/// Each fetch keeps its own [`ProxyCycle`], so one worker's retries cannot end
/// another worker's cycle early.
#[derive(Debug, Clone, Default)]
pub struct SharedProxyPool {
    inner: Arc<Mutex<ProxyPool>>,
}

impl SharedProxyPool {
    pub fn new(pool: ProxyPool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProxyPool> {
        // Pool bookkeeping cannot be left half-updated, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn begin_cycle(&self) -> Option<ProxyCycle> {
        self.lock().begin_cycle()
    }

    pub fn advance(&self, cycle: &mut ProxyCycle) -> Option<ProxyEndpoint> {
        self.lock().advance(cycle)
    }

    pub fn mark_bad(&self, endpoint: &ProxyEndpoint) {
        self.lock().mark_bad(endpoint);
    }

    pub fn mark_good(&self, endpoint: &ProxyEndpoint) {
        self.lock().mark_good(endpoint);
    }

    /// Copy of the pool's current state.
    pub fn snapshot(&self) -> ProxyPool {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(n: u16) -> ProxyPool {
        ProxyPool::new((1..=n).map(|i| ProxyEndpoint::new(format!("10.0.0.{i}"), 8080)))
    }

    #[test]
    fn test_parse_endpoint() {
        let endpoint: ProxyEndpoint = "159.8.114.37:8123".parse().unwrap();
        assert_eq!(endpoint, ProxyEndpoint::new("159.8.114.37", 8123));
        assert_eq!(endpoint.to_string(), "159.8.114.37:8123");
        assert_eq!(endpoint.proxy_url(), "http://159.8.114.37:8123");

        let padded: ProxyEndpoint = "   169.57.1.85:8123 ".parse().unwrap();
        assert_eq!(padded.host, "169.57.1.85");
    }

    #[test]
    fn test_parse_endpoint_rejects_malformed() {
        assert_eq!(
            "159.8.114.37".parse::<ProxyEndpoint>(),
            Err(ProxyParseError::MissingPort)
        );
        assert_eq!(
            "localhost:8080".parse::<ProxyEndpoint>(),
            Err(ProxyParseError::InvalidHost)
        );
        assert_eq!(
            "1.2.3.4.5:80".parse::<ProxyEndpoint>(),
            Err(ProxyParseError::InvalidHost)
        );
        assert_eq!(
            "1.2.3.4:http".parse::<ProxyEndpoint>(),
            Err(ProxyParseError::InvalidPort)
        );
        assert_eq!(
            "1.2.3.4:0".parse::<ProxyEndpoint>(),
            Err(ProxyParseError::InvalidPort)
        );
    }

    #[test]
    fn test_next_on_empty_pool() {
        let mut pool = ProxyPool::default();
        assert!(pool.next().is_none());
        assert!(pool.begin_cycle().is_none());
    }

    #[test]
    fn test_next_visits_every_endpoint_once_before_repeating() {
        let mut pool = pool_of(4);
        let visited: Vec<ProxyEndpoint> = (0..4).filter_map(|_| pool.next()).collect();
        assert_eq!(visited, pool.endpoints().to_vec());
        // Wraps to the beginning
        assert_eq!(pool.next(), Some(pool.endpoints()[0].clone()));
    }

    #[test]
    fn test_duplicates_are_removed() {
        let a = ProxyEndpoint::new("1.1.1.1", 80);
        let b = ProxyEndpoint::new("2.2.2.2", 80);
        let pool = ProxyPool::new(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(pool.endpoints(), &[a, b]);
    }

    #[test]
    fn test_cycle_exhausts_after_each_endpoint_once() {
        let mut pool = pool_of(3);
        let mut cycle = pool.begin_cycle().unwrap();
        let mut tried = vec![cycle.current().clone()];
        while let Some(next) = pool.advance(&mut cycle) {
            tried.push(next);
        }
        assert_eq!(tried, pool.endpoints().to_vec());
        assert_eq!(cycle.attempts(), 3);
    }

    #[test]
    fn test_single_endpoint_cycle_has_no_alternative() {
        let mut pool = pool_of(1);
        let mut cycle = pool.begin_cycle().unwrap();
        assert!(pool.advance(&mut cycle).is_none());
    }

    #[test]
    fn test_new_cycle_rearms_start_marker() {
        let mut pool = pool_of(3);
        let mut first = pool.begin_cycle().unwrap();
        pool.advance(&mut first);
        // The second cycle starts where rotation left off, with a fresh marker
        let second = pool.begin_cycle().unwrap();
        assert_eq!(second.start(), &pool.endpoints()[2]);
        assert_eq!(second.attempts(), 1);
    }

    #[test]
    fn test_mark_good_makes_endpoint_next_start() {
        let mut pool = pool_of(3);
        let good = pool.endpoints()[1].clone();
        pool.mark_good(&good);
        let cycle = pool.begin_cycle().unwrap();
        assert_eq!(cycle.start(), &good);
    }

    #[test]
    fn test_mark_bad_counts_failures() {
        let mut pool = pool_of(2);
        let bad = pool.endpoints()[0].clone();
        pool.mark_bad(&bad);
        pool.mark_bad(&bad);
        pool.mark_bad(&ProxyEndpoint::new("9.9.9.9", 1));
        let counts = pool.failure_counts();
        assert_eq!(counts[0], (bad, 2));
        assert_eq!(counts[1].1, 0);
    }

    #[test]
    fn test_retain_usable_drops_endpoints() {
        let mut pool = pool_of(4);
        pool.next();
        pool.retain_usable(|endpoint| endpoint.host != "10.0.0.2");
        assert_eq!(pool.len(), 3);
        assert!(pool.endpoints().iter().all(|e| e.host != "10.0.0.2"));
        // Rotation restarts from the first remaining endpoint
        assert_eq!(pool.next().unwrap().host, "10.0.0.1");
    }

    /// Endpoints `cycle` moves to until it is exhausted.
    fn advance_until_exhausted(shared: &SharedProxyPool, cycle: &mut ProxyCycle) -> Vec<ProxyEndpoint> {
        let mut moved_to = Vec::new();
        while let Some(next) = shared.advance(cycle) {
            moved_to.push(next);
        }
        moved_to
    }

    #[test]
    fn test_cycle_tries_every_endpoint_when_another_cycle_advances() {
        let shared = SharedProxyPool::new(pool_of(3));
        let mut mine = shared.begin_cycle().unwrap();
        let mut theirs = shared.begin_cycle().unwrap();
        shared.advance(&mut theirs);

        let endpoints = shared.snapshot().endpoints().to_vec();
        assert_eq!(mine.start(), &endpoints[0]);
        let moved_to = advance_until_exhausted(&shared, &mut mine);
        assert_eq!(moved_to, endpoints[1..].to_vec());
        assert_eq!(mine.attempts(), 3);
    }

    #[test]
    fn test_cycle_tries_every_endpoint_when_another_worker_marks_good() {
        let shared = SharedProxyPool::new(pool_of(3));
        let endpoints = shared.snapshot().endpoints().to_vec();
        let mut mine = shared.begin_cycle().unwrap();
        assert_eq!(shared.advance(&mut mine), Some(endpoints[1].clone()));
        // Another worker succeeds through .2 and pulls the cursor back to it
        shared.mark_good(&endpoints[1]);

        let moved_to = advance_until_exhausted(&shared, &mut mine);
        assert_eq!(moved_to, vec![endpoints[2].clone()]);
        assert!(endpoints.iter().all(|e| mine.has_tried(e)));
        assert_eq!(mine.attempts(), 3);
    }

    #[test]
    fn test_ipv6_endpoint_is_bracketed() {
        let endpoint = ProxyEndpoint::new("::1", 3128);
        assert_eq!(endpoint.to_string(), "[::1]:3128");
        assert_eq!(endpoint.proxy_url(), "http://[::1]:3128");
    }
}
