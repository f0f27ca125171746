//! Fetch module tests.

use std::sync::Arc;
use std::time::Duration;

use httptest::matchers::{contains, key, request};
use httptest::responders::{delay_and_then, status_code};
use httptest::{all_of, Expectation, Server, ServerBuilder};
use reqwest::StatusCode;
use url::Url;

use super::{FetchOutcome, Fetcher};
use crate::config::CrawlerConfig;
use crate::error_handling::{CrawlEvent, CrawlStats, FetchError};
use crate::proxy::{ProxyEndpoint, ProxyPool, SharedProxyPool};

fn content_page() -> String {
    format!("<html><body>{}</body></html>", "<div>oferta</div>".repeat(20))
}

fn blocked_page() -> String {
    "<html><body><p>Włącz obsługę JavaScript</p></body></html>".to_string()
}

fn fetcher() -> Fetcher {
    Fetcher::new(CrawlerConfig::default(), Arc::new(CrawlStats::new())).expect("fetcher")
}

/// Mock proxy on the IPv4 loopback, whatever `localhost` resolves to.
fn proxy_server() -> Server {
    ServerBuilder::new()
        .bind_addr(([127, 0, 0, 1], 0).into())
        .run()
        .expect("bind mock proxy")
}

fn endpoint_of(server: &Server) -> ProxyEndpoint {
    let addr = server.addr();
    ProxyEndpoint::new(addr.ip().to_string(), addr.port())
}

fn closed_port_endpoint() -> ProxyEndpoint {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    ProxyEndpoint::new("127.0.0.1", port)
}

/// Target served only through the mock proxies; it never resolves on its own.
fn proxied_target() -> Url {
    Url::parse("http://allegro.test/oferta/kabel-usb-123").expect("url")
}

#[tokio::test]
async fn test_direct_fetch_sends_browser_headers() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/oferta/kabel-1"),
            request::headers(contains(key("accept-language"))),
            request::headers(contains(key("sec-fetch-mode"))),
            request::headers(contains(key("referer"))),
        ])
        .respond_with(status_code(200).body(content_page())),
    );

    let url = Url::parse(&server.url_str("/oferta/kabel-1")).expect("url");
    let page = fetcher().fetch(&url, None, None).await.expect("page");
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.url, url);
    assert!(page.body.contains("oferta"));
}

#[tokio::test]
async fn test_direct_blocked_page_is_an_error() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/listing"))
            .respond_with(status_code(200).body(blocked_page())),
    );

    let fetcher = fetcher();
    let url = Url::parse(&server.url_str("/listing")).expect("url");
    let err = fetcher.fetch(&url, None, None).await.unwrap_err();
    assert!(matches!(err, FetchError::Blocked { .. }));
    assert_eq!(fetcher.stats().get(CrawlEvent::BlockedResponse), 1);
}

#[tokio::test]
async fn test_non_success_status_with_content_is_a_page() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/oferta/gone"))
            .respond_with(status_code(404).body(content_page())),
    );

    let url = Url::parse(&server.url_str("/oferta/gone")).expect("url");
    let page = fetcher().fetch(&url, None, None).await.expect("page");
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_direct_transport_error() {
    let endpoint = closed_port_endpoint();
    let url = Url::parse(&format!("http://{}/listing", endpoint)).expect("url");

    let fetcher = fetcher();
    let err = fetcher.fetch(&url, None, None).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert_eq!(fetcher.stats().get(CrawlEvent::TransportConnect), 1);
}

#[tokio::test]
async fn test_attempt_through_proxy() {
    let proxy = proxy_server();
    proxy.expect(
        Expectation::matching(request::method_path("GET", "/oferta/kabel-usb-123"))
            .respond_with(status_code(200).body(content_page())),
    );

    let outcome = fetcher()
        .attempt(&proxied_target(), Some(&endpoint_of(&proxy)), None)
        .await;
    assert!(matches!(outcome, FetchOutcome::Page(_)));
}

#[tokio::test]
async fn test_blocked_proxy_fails_over_to_next() {
    let blocked = proxy_server();
    blocked.expect(
        Expectation::matching(request::method_path("GET", "/oferta/kabel-usb-123"))
            .times(1)
            .respond_with(status_code(200).body(blocked_page())),
    );
    let working = proxy_server();
    working.expect(
        Expectation::matching(request::method_path("GET", "/oferta/kabel-usb-123"))
            .times(1)
            .respond_with(status_code(200).body(content_page())),
    );

    let pool = SharedProxyPool::new(ProxyPool::new(vec![
        endpoint_of(&blocked),
        endpoint_of(&working),
    ]));
    let fetcher = fetcher();
    let page = fetcher
        .fetch(&proxied_target(), Some(&pool), None)
        .await
        .expect("second proxy should succeed");
    assert!(page.body.contains("oferta"));
    assert_eq!(fetcher.stats().get(CrawlEvent::BlockedResponse), 1);
    assert_eq!(fetcher.stats().get(CrawlEvent::ProxyRotated), 1);

    // The working proxy starts the next cycle
    let snapshot = pool.snapshot();
    assert_eq!(snapshot.failure_counts()[0].1, 1);
    assert_eq!(
        pool.begin_cycle().expect("cycle").start(),
        &endpoint_of(&working)
    );
}

#[tokio::test]
async fn test_unreachable_proxy_fails_over_to_next() {
    let working = proxy_server();
    working.expect(
        Expectation::matching(request::method_path("GET", "/oferta/kabel-usb-123"))
            .respond_with(status_code(200).body(content_page())),
    );

    let pool = SharedProxyPool::new(ProxyPool::new(vec![
        closed_port_endpoint(),
        endpoint_of(&working),
    ]));
    let fetcher = fetcher();
    fetcher
        .fetch(&proxied_target(), Some(&pool), None)
        .await
        .expect("second proxy should succeed");
    assert_eq!(fetcher.stats().get(CrawlEvent::TransportConnect), 1);
}

#[tokio::test]
async fn test_every_proxy_blocked_exhausts_the_cycle() {
    let servers: Vec<Server> = (0..3).map(|_| proxy_server()).collect();
    for server in &servers {
        // Each proxy is tried exactly once for the request
        server.expect(
            Expectation::matching(request::method_path("GET", "/oferta/kabel-usb-123"))
                .times(1)
                .respond_with(status_code(200).body(blocked_page())),
        );
    }

    let pool = SharedProxyPool::new(ProxyPool::new(servers.iter().map(endpoint_of)));
    let fetcher = fetcher();
    let err = fetcher
        .fetch(&proxied_target(), Some(&pool), None)
        .await
        .unwrap_err();
    match err {
        FetchError::ExhaustedProxies { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected ExhaustedProxies, got {other:?}"),
    }
    assert_eq!(fetcher.stats().get(CrawlEvent::ProxyCycleExhausted), 1);
    assert_eq!(fetcher.stats().get(CrawlEvent::BlockedResponse), 3);
}

#[tokio::test]
async fn test_empty_pool_fetches_directly() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/listing"))
            .respond_with(status_code(200).body(content_page())),
    );

    let pool = SharedProxyPool::new(ProxyPool::default());
    let url = Url::parse(&server.url_str("/listing")).expect("url");
    assert!(fetcher().fetch(&url, Some(&pool), None).await.is_ok());
}

#[tokio::test]
async fn test_per_call_timeout_overrides_default() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/slow"))
            .times(..)
            .respond_with(delay_and_then(
                Duration::from_secs(2),
                status_code(200).body(content_page()),
            )),
    );

    let fetcher = fetcher();
    let url = Url::parse(&server.url_str("/slow")).expect("url");
    let err = fetcher
        .fetch(&url, None, Some(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert_eq!(fetcher.stats().get(CrawlEvent::TransportTimeout), 1);
}
