//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses one of the crate's fixed page selectors, named by `owner` in the panic message.
///
/// # Panics
///
/// Panics if `css` is not a valid selector.
pub fn parse_selector_unsafe(css: &str, owner: &str) -> Selector {
    Selector::parse(css)
        .unwrap_or_else(|e| panic!("invalid selector {css:?} for {owner}: {e} (programming error)"))
}
