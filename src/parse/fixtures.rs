//! HTML builders for listing and offer pages.

/// Filler that keeps fixture pages above the bot-check `div` threshold.
pub(crate) fn filler_divs() -> String {
    "<div class=\"layout\"></div>".repeat(12)
}

pub(crate) struct OfferFixture {
    pub name: &'static str,
    pub price: &'static str,
    pub seller: &'static str,
    pub quantity: &'static str,
    pub rating: Option<&'static str>,
    pub buy_now: bool,
    pub breadcrumbs: Vec<&'static str>,
    pub images: Vec<&'static str>,
    /// Parameter groups, each a list of (label, value) rows
    pub parameters: Vec<Vec<(&'static str, &'static str)>>,
}

impl Default for OfferFixture {
    fn default() -> Self {
        Self {
            name: "Kabel USB typ C 1m",
            price: "19.99",
            seller: "kable-sklep",
            quantity: "42",
            rating: Some("4.85"),
            buy_now: true,
            breadcrumbs: vec![
                "https://allegro.pl/",
                "https://allegro.pl/kategoria/elektronika",
                "https://allegro.pl/kategoria/kable-usb-147580",
            ],
            images: vec![
                "https://a.allegroimg.com/original/kabel-1.jpg",
                "https://a.allegroimg.com/original/kabel-2.jpg",
            ],
            parameters: vec![
                vec![("Stan:", "Nowy"), ("Faktura:", "Wystawiam fakturę VAT")],
                vec![("Długość kabla:", "1 m")],
            ],
        }
    }
}

impl OfferFixture {
    pub(crate) fn html(&self) -> String {
        let buy_now = if self.buy_now {
            r#"<button type="submit" id="buy-now-button" data-analytics-interaction-custom-flow-type="BuyNow">Kup teraz</button>"#
        } else {
            r#"<button type="submit" id="bid-button">Licytuj</button>"#
        };
        let rating = self
            .rating
            .map(|r| format!(r#"<meta itemprop="ratingValue" content="{r}">"#))
            .unwrap_or_default();
        let breadcrumbs: String = self
            .breadcrumbs
            .iter()
            .map(|href| {
                format!(
                    r#"<div data-role="breadcrumb-item" itemscope itemprop="itemListElement" itemtype="http://schema.org/ListItem"><a href="{href}">crumb</a></div>"#
                )
            })
            .collect();
        let images: String = self
            .images
            .iter()
            .map(|src| format!(r#"<div role="button" tabindex="0"><img src="{src}"></div>"#))
            .chain(std::iter::once(
                r#"<div role="button" tabindex="0"><span>video</span></div>"#.to_string(),
            ))
            .collect();
        let groups: String = self
            .parameters
            .iter()
            .map(|rows| {
                let rows: String = rows
                    .iter()
                    .map(|(label, value)| {
                        format!("<li><div><div>{label}</div><div>{value}</div></div></li>")
                    })
                    .collect();
                format!("<li><div><h3>Parametry</h3><div><ul>{rows}</ul></div></div></li>")
            })
            .collect();

        format!(
            r##"<html><head>
<meta property="og:title" content="{name}">
<meta itemprop="price" content="{price}">
{rating}
</head><body>
{filler}
<nav>{breadcrumbs}</nav>
<section>{images}</section>
<a href="#aboutSeller" data-analytics-click-value="sellerLogin">{seller} - Poleca 99,5%</a>
<input type="number" name="quantity" min="1" max="{quantity}" value="1">
{buy_now}
<div data-box-name="Parameters" data-prototype-id="allegro.showoffer.parameters" data-analytics-category="allegro.showoffer.parameters">
<ul data-reactroot="">{groups}</ul>
</div>
</body></html>"##,
            name = self.name,
            price = self.price,
            filler = filler_divs(),
            seller = self.seller,
            quantity = self.quantity,
        )
    }
}

/// Listing page with one article per offer href and an optional
/// `(current, max)` pagination control.
pub(crate) fn listing_html(offers: &[&str], pagination: Option<(u32, u32)>) -> String {
    let articles: String = offers
        .iter()
        .enumerate()
        .map(|(index, href)| {
            format!(
                r#"<article data-role="offer" data-analytics-view-custom-index0="{index}" data-analytics-view-custom-deliverylabel="darmowa dostawa" data-analytics-view-custom-page="1" data-analytics-view-value="{index}">
<a href="{href}" rel="nofollow" tabindex="-1"><img src="x.jpg"></a>
<h2><a href="{href}">Offer {index}</a></h2>
</article>"#
            )
        })
        .collect();
    let pagination = pagination
        .map(|(current, max)| {
            format!(
                r#"<input type="text" data-role="page-number-input" data-page="{current}" data-maxpage="{max}" value="{current}">"#
            )
        })
        .unwrap_or_default();
    // A promoted slot without the analytics attributes is not an offer entry
    format!(
        r#"<html><body>{filler}<section>
<article data-role="offer"><a href="/oferta/sponsored-1" rel="nofollow" tabindex="-1"></a></article>
{articles}</section>{pagination}</body></html>"#,
        filler = filler_divs()
    )
}
