// Shared test helpers: a mock marketplace served by httptest.
//
// Listing and offer pages carry the same markers the extractors look for,
// padded above the bot-check threshold.

use httptest::{all_of, matchers::*, responders::*, Expectation, Server, ServerBuilder};
use url::Url;

use allegro_spider::{Crawler, CrawlerConfig, ProxyEndpoint};

fn filler() -> String {
    "<div class=\"layout\"></div>".repeat(12)
}

/// A near-empty page like the one served to blocked clients.
#[allow(dead_code)] // Used by other test files
pub fn blocked_page() -> String {
    "<html><body><p>Włącz obsługę JavaScript, aby kontynuować</p></body></html>".to_string()
}

/// Listing page with one entry per offer href and an optional `(current, max)` pager.
#[allow(dead_code)]
pub fn listing_page(offers: &[String], pagination: Option<(u32, u32)>) -> String {
    let articles: String = offers
        .iter()
        .enumerate()
        .map(|(index, href)| {
            format!(
                r#"<article data-role="offer" data-analytics-view-custom-index0="{index}" data-analytics-view-custom-deliverylabel="" data-analytics-view-custom-page="1" data-analytics-view-value="{index}"><a href="{href}" rel="nofollow" tabindex="-1"></a></article>"#
            )
        })
        .collect();
    let pager = pagination
        .map(|(current, max)| {
            format!(r#"<input data-role="page-number-input" data-page="{current}" data-maxpage="{max}">"#)
        })
        .unwrap_or_default();
    format!("<html><body>{}<section>{articles}</section>{pager}</body></html>", filler())
}

/// Buy-now offer page named `name`.
#[allow(dead_code)]
pub fn offer_page(name: &str) -> String {
    format!(
        r##"<html><head>
<meta property="og:title" content="{name}">
<meta itemprop="price" content="24.90">
<meta itemprop="ratingValue" content="4.7">
</head><body>{filler}
<div data-role="breadcrumb-item" itemscope itemprop="itemListElement" itemtype="http://schema.org/ListItem"><a href="/kategoria/kable-usb-147580">Kable USB</a></div>
<div role="button" tabindex="0"><img src="https://a.allegroimg.com/original/1.jpg"></div>
<a href="#aboutSeller" data-analytics-click-value="sellerLogin">kable-sklep - Poleca 99,1%</a>
<input type="number" name="quantity" max="8">
<button type="submit" id="buy-now-button" data-analytics-interaction-custom-flow-type="BuyNow">Kup teraz</button>
<div data-box-name="Parameters" data-prototype-id="allegro.showoffer.parameters" data-analytics-category="allegro.showoffer.parameters">
<ul data-reactroot=""><li><div><ul><li><div><div>Stan:</div><div>Nowy</div></div></li></ul></div></li></ul>
</div></body></html>"##,
        filler = filler()
    )
}

/// Auction page: everything but the buy-now button.
#[allow(dead_code)]
pub fn auction_page() -> String {
    offer_page("Licytacja").replace("buy-now-button", "bid-button")
}

/// `count` offer paths `/oferta/<prefix>-<i>`.
#[allow(dead_code)]
pub fn offer_paths(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("/oferta/{prefix}-{i}")).collect()
}

/// Expects `times` requests for listing page `page` of any term.
#[allow(dead_code)]
pub fn serve_listing(
    server: &Server,
    page: u32,
    offers: &[String],
    pagination: Option<(u32, u32)>,
    times: usize,
) {
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/listing"),
            request::query(url_decoded(contains(("p", page.to_string())))),
        ])
        .times(times)
        .respond_with(status_code(200).body(listing_page(offers, pagination))),
    );
}

/// Expects `times` requests for each offer path, answered with a buy-now page.
#[allow(dead_code)]
pub fn serve_offers(server: &Server, paths: &[String], times: usize) {
    for path in paths {
        server.expect(
            Expectation::matching(request::method_path("GET", path.clone()))
                .times(times)
                .respond_with(status_code(200).body(offer_page(path))),
        );
    }
}

/// Crawler whose marketplace is the mock server.
#[allow(dead_code)]
pub fn crawler_for(server: &Server) -> Crawler {
    let base = Url::parse(&server.url_str("/")).expect("Failed to parse mock base url");
    Crawler::new(CrawlerConfig::default().with_base_url(base)).expect("Failed to build crawler")
}

/// Crawler for a marketplace that is only reachable through proxies.
#[allow(dead_code)]
pub fn proxied_crawler() -> Crawler {
    let base = Url::parse("http://allegro.test/").expect("Failed to parse base url");
    Crawler::new(CrawlerConfig::default().with_base_url(base)).expect("Failed to build crawler")
}

/// Mock proxy bound to the IPv4 loopback.
#[allow(dead_code)]
pub fn proxy_server() -> Server {
    ServerBuilder::new()
        .bind_addr(([127, 0, 0, 1], 0).into())
        .run()
        .expect("Failed to bind mock proxy")
}

/// The mock server as a plain HTTP proxy endpoint.
#[allow(dead_code)]
pub fn endpoint_of(server: &Server) -> ProxyEndpoint {
    let addr = server.addr();
    ProxyEndpoint::new(addr.ip().to_string(), addr.port())
}

/// Paths of the product URLs, in result order.
#[allow(dead_code)]
pub fn product_paths(products: &[allegro_spider::ProductRecord]) -> Vec<String> {
    products
        .iter()
        .map(|p| Url::parse(&p.url).expect("Failed to parse product url").path().to_string())
        .collect()
}
