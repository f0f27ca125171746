//! Offer parameter extraction.
//!
//! The parameters box nests rows inside groups inside a list. Its expected
//! shape is declared once as a [`ParameterTree`] and walked level by level;
//! any level that cannot be found is a single [`ExtractError::ParameterShape`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error_handling::ExtractError;
use crate::utils::{element_text, parse_selector_unsafe};

/// How the nodes of one level are reached from each node of the level above.
#[derive(Debug)]
pub enum Step {
    /// First matching descendant; its absence is a shape error.
    First(Selector),
    /// Every matching descendant, possibly none.
    All(Selector),
    /// Every direct child element with this tag name.
    Children(&'static str),
}

/// One named level of the expected nesting.
#[derive(Debug)]
pub struct Level {
    pub name: &'static str,
    pub step: Step,
}

/// Expected nesting from the document root down to one row container, plus
/// the cells inside a row container (label first, value second).
#[derive(Debug)]
pub struct ParameterTree {
    pub levels: Vec<Level>,
    pub cells: Selector,
}

fn level(name: &'static str, step: Step) -> Level {
    Level { name, step }
}

fn first(selector: &str, context: &str) -> Step {
    Step::First(parse_selector_unsafe(selector, context))
}

/// Layout of the offer page's parameters box.
pub static OFFER_PARAMETERS: LazyLock<ParameterTree> = LazyLock::new(|| ParameterTree {
    levels: vec![
        level(
            "parameters section",
            first(
                r#"div[data-box-name="Parameters"][data-prototype-id="allegro.showoffer.parameters"][data-analytics-category="allegro.showoffer.parameters"]"#,
                "parameters section",
            ),
        ),
        level("parameter list", first("ul[data-reactroot]", "parameter list")),
        level("parameter group", Step::Children("li")),
        level("group body", first("div", "group body")),
        level(
            "parameter row",
            Step::All(parse_selector_unsafe("li", "parameter row")),
        ),
        level("row container", first("div", "row container")),
    ],
    cells: parse_selector_unsafe("div", "parameter cells"),
});

impl ParameterTree {
    /// Walks `document` along the declared levels and reads one key/value pair
    /// per row container.
    ///
    /// Keys are trimmed and lose a trailing `:`. A later row with the same key
    /// replaces an earlier one.
    ///
    /// # Errors
    ///
    /// `ExtractError::ParameterShape` when a `First` level is missing or a row
    /// container holds fewer than two cells.
    pub fn walk(&self, document: &Html) -> Result<BTreeMap<String, String>, ExtractError> {
        let mut nodes = vec![document.root_element()];
        for level in &self.levels {
            let mut next = Vec::new();
            for node in &nodes {
                match &level.step {
                    Step::First(selector) => {
                        let found = node.select(selector).next().ok_or_else(|| {
                            ExtractError::ParameterShape {
                                detail: format!("missing {}", level.name),
                            }
                        })?;
                        next.push(found);
                    }
                    Step::All(selector) => next.extend(node.select(selector)),
                    Step::Children(tag) => next.extend(
                        node.children()
                            .filter_map(ElementRef::wrap)
                            .filter(|child| child.value().name() == *tag),
                    ),
                }
            }
            nodes = next;
        }

        let mut parameters = BTreeMap::new();
        for container in nodes {
            let mut cells = container.select(&self.cells);
            let (Some(label), Some(value)) = (cells.next(), cells.next()) else {
                return Err(ExtractError::ParameterShape {
                    detail: format!(
                        "row \"{}\" has fewer than two cells",
                        element_text(container)
                    ),
                });
            };
            let key = element_text(label);
            let key = key.trim_end_matches(':').trim_end().to_string();
            parameters.insert(key, element_text(value));
        }
        Ok(parameters)
    }
}

/// Extracts the offer's parameters with [`OFFER_PARAMETERS`].
pub fn extract_parameters(document: &Html) -> Result<BTreeMap<String, String>, ExtractError> {
    OFFER_PARAMETERS.walk(document)
}
