//! Utility functions for HTML extraction.
//!
//! This module provides:
//! - CSS selector parsing utilities
//! - Element text normalization

mod selector;
mod text;

pub use selector::parse_selector_unsafe;
pub use text::{attr_trimmed, element_text};
