//! Export of scraped products.
//!
//! Products are written as one pretty-printed JSON array per run.

mod json;

pub use json::{write_products, write_products_to};
