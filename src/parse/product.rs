//! Offer page extraction.
//!
//! Turns one fetched offer page into a [`ProductRecord`]. Only buy-now offers
//! are supported; auctions and advertisements are reported as
//! [`ExtractError::UnsupportedOfferKind`] before anything else is read.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::config::CATEGORY_PATH_PREFIX;
use crate::error_handling::ExtractError;
use crate::models::ProductRecord;
use crate::parse::parameters::extract_parameters;
use crate::utils::{attr_trimmed, element_text, parse_selector_unsafe};

static BUY_NOW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        r#"button#buy-now-button[type="submit"][data-analytics-interaction-custom-flow-type="BuyNow"]"#,
        "BUY_NOW_SELECTOR",
    )
});

static NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(r#"meta[property="og:title"]"#, "NAME_SELECTOR"));

static BREADCRUMB_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        r#"div[data-role="breadcrumb-item"][itemscope][itemprop="itemListElement"][itemtype="http://schema.org/ListItem"]"#,
        "BREADCRUMB_SELECTOR",
    )
});

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "LINK_SELECTOR"));

static PRICE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(r#"meta[itemprop="price"]"#, "PRICE_SELECTOR"));

static SELLER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        r##"a[href="#aboutSeller"][data-analytics-click-value="sellerLogin"]"##,
        "SELLER_SELECTOR",
    )
});

static QUANTITY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        r#"input[type="number"][name="quantity"]"#,
        "QUANTITY_SELECTOR",
    )
});

static RATING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(r#"meta[itemprop="ratingValue"]"#, "RATING_SELECTOR")
});

static IMAGE_HOLDER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(r#"div[role="button"][tabindex="0"]"#, "IMAGE_HOLDER_SELECTOR")
});

static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("img[src]", "IMAGE_SELECTOR"));

/// Seller login is followed by " - " and the recommendation rate.
const SELLER_SUFFIX_SEPARATOR: &str = " - ";

/// True when the page offers a buy-now purchase.
pub fn is_buy_now_offer(document: &Html) -> bool {
    document.select(&BUY_NOW_SELECTOR).next().is_some()
}

/// Extracts a [`ProductRecord`] from an offer page.
///
/// `url` is recorded as the product URL; relative links on the page are
/// resolved against `page_url`.
///
/// # Errors
///
/// - `ExtractError::UnsupportedOfferKind` for auctions and advertisements
/// - `ExtractError::MissingElement` / `InvalidValue` for absent or unparsable fields
/// - `ExtractError::ParameterShape` when the parameters box has an unexpected layout
pub fn extract_product(
    document: &Html,
    url: &str,
    page_url: &Url,
) -> Result<ProductRecord, ExtractError> {
    if !is_buy_now_offer(document) {
        return Err(ExtractError::UnsupportedOfferKind);
    }

    Ok(ProductRecord {
        url: url.to_string(),
        name: find_name(document)?,
        category: find_category(document, page_url)?,
        price: find_price(document)?,
        seller: find_seller(document)?,
        quantity: find_quantity(document)?,
        rating: find_rating(document)?,
        images: find_images(document),
        parameters: extract_parameters(document)?,
    })
}

fn first<'a>(
    document: &'a Html,
    selector: &Selector,
    element: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    document
        .select(selector)
        .next()
        .ok_or(ExtractError::MissingElement { element })
}

fn required_attr<'a>(
    node: ElementRef<'a>,
    attr: &str,
    element: &'static str,
) -> Result<&'a str, ExtractError> {
    attr_trimmed(node, attr).ok_or(ExtractError::MissingElement { element })
}

fn find_name(document: &Html) -> Result<String, ExtractError> {
    let meta = first(document, &NAME_SELECTOR, "product name")?;
    Ok(required_attr(meta, "content", "product name")?.to_string())
}

/// The deepest breadcrumb pointing into the category tree.
fn find_category(document: &Html, page_url: &Url) -> Result<String, ExtractError> {
    document
        .select(&BREADCRUMB_SELECTOR)
        .filter_map(|crumb| crumb.select(&LINK_SELECTOR).next())
        .filter_map(|link| attr_trimmed(link, "href"))
        .filter_map(|href| page_url.join(href).ok())
        .filter(|target| target.path().starts_with(CATEGORY_PATH_PREFIX))
        .last()
        .map(String::from)
        .ok_or(ExtractError::MissingElement {
            element: "category breadcrumb",
        })
}

fn find_price(document: &Html) -> Result<f64, ExtractError> {
    let meta = first(document, &PRICE_SELECTOR, "price")?;
    let raw = required_attr(meta, "content", "price")?;
    parse_decimal(raw, "price")
}

fn find_seller(document: &Html) -> Result<String, ExtractError> {
    let link = first(document, &SELLER_SELECTOR, "seller")?;
    let text = element_text(link);
    let login = text
        .split(SELLER_SUFFIX_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();
    if login.is_empty() {
        return Err(ExtractError::MissingElement { element: "seller" });
    }
    Ok(login.to_string())
}

fn find_quantity(document: &Html) -> Result<u32, ExtractError> {
    let input = first(document, &QUANTITY_SELECTOR, "quantity")?;
    let raw = required_attr(input, "max", "quantity")?;
    raw.parse().map_err(|_| ExtractError::InvalidValue {
        field: "quantity",
        value: raw.to_string(),
    })
}

/// Offers without reviews carry no rating meta; that is `0.0`, not an error.
fn find_rating(document: &Html) -> Result<f64, ExtractError> {
    match document
        .select(&RATING_SELECTOR)
        .next()
        .and_then(|meta| attr_trimmed(meta, "content"))
    {
        Some(raw) => parse_decimal(raw, "rating"),
        None => Ok(0.0),
    }
}

fn find_images(document: &Html) -> Vec<String> {
    document
        .select(&IMAGE_HOLDER_SELECTOR)
        .filter_map(|holder| holder.select(&IMAGE_SELECTOR).next())
        .filter_map(|img| attr_trimmed(img, "src"))
        .map(str::to_string)
        .collect()
}

/// Parses a decimal that may use a comma separator (`"19,99"`).
fn parse_decimal(raw: &str, field: &'static str) -> Result<f64, ExtractError> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ExtractError::InvalidValue {
            field,
            value: raw.to_string(),
        })
}
