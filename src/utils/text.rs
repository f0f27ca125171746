//! Element text normalization.

use scraper::ElementRef;

/// Concatenated text of `element` and its descendants with whitespace runs
/// collapsed to single spaces and the ends trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Value of attribute `name`, trimmed. `None` when absent.
pub fn attr_trimmed<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).map(str::trim)
}
