//! HTML extraction for listing and offer pages.
//!
//! This module extracts:
//! - Offer URLs and pagination state from listing pages
//! - Product records from offer pages, parameters included
//!
//! All parsing is done using CSS selectors via the `scraper` crate.

#[cfg(test)]
pub(crate) mod fixtures;
mod listing;
pub mod parameters;
mod product;

// Re-export public API
pub use listing::extract_listing;
pub use parameters::{extract_parameters, ParameterTree, OFFER_PARAMETERS};
pub use product::{extract_product, is_buy_now_offer};
