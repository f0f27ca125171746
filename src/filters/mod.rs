//! Filter criteria and the filter-to-query compiler.
//!
//! Every [`FilterKey`] declares one [`FilterRule`]: a fixed flag fragment, a
//! lookup table for single or multiple choices, or a formatting rule for numeric
//! bounds and free text. [`compile`] matches each supplied [`FilterValue`]
//! against its key's declared shape and renders the listing query fragment.

mod tables;

use std::collections::BTreeMap;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error_handling::FilterError;

/// Filter keys understood by the listing page.
///
/// The declaration order is the order fragments appear in the compiled query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum FilterKey {
    Sorting,
    SmartFreeShipping,
    ProductCondition,
    OfferType,
    PriceMin,
    PriceMax,
    DeliveryTime,
    DeliveryMethods,
    DeliveryOptions,
    City,
    Voivodeship,
    ProductRating,
    VatInvoice,
    AllegroPrograms,
    Occasions,
}

/// Value shape a filter key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FilterShape {
    Flag,
    Choice,
    MultiChoice,
    Bound,
    Text,
}

/// How a key turns its value into query fragments.
#[derive(Debug, Clone, Copy)]
pub enum FilterRule {
    /// Fixed fragment emitted when the flag is set
    Flag(&'static str),
    /// One value looked up in the table
    Choice(&'static [(&'static str, &'static str)]),
    /// Every selected value looked up in the table, one fragment each
    MultiChoice(&'static [(&'static str, &'static str)]),
    /// Numeric bound rendered as `<param>=<value>`
    Bound(&'static str),
    /// Free text rendered as `<param>=<percent-encoded value>`
    Text(&'static str),
}

impl FilterRule {
    pub fn shape(&self) -> FilterShape {
        match self {
            FilterRule::Flag(_) => FilterShape::Flag,
            FilterRule::Choice(_) => FilterShape::Choice,
            FilterRule::MultiChoice(_) => FilterShape::MultiChoice,
            FilterRule::Bound(_) => FilterShape::Bound,
            FilterRule::Text(_) => FilterShape::Text,
        }
    }
}

impl FilterKey {
    /// The rule this key is compiled with.
    pub fn rule(&self) -> FilterRule {
        match self {
            FilterKey::Sorting => FilterRule::Choice(tables::SORTING),
            FilterKey::SmartFreeShipping => FilterRule::Flag(tables::SMART_FREE_SHIPPING),
            FilterKey::ProductCondition => FilterRule::MultiChoice(tables::PRODUCT_CONDITION),
            FilterKey::OfferType => FilterRule::MultiChoice(tables::OFFER_TYPE),
            FilterKey::PriceMin => FilterRule::Bound(tables::PRICE_MIN_PARAM),
            FilterKey::PriceMax => FilterRule::Bound(tables::PRICE_MAX_PARAM),
            FilterKey::DeliveryTime => FilterRule::Choice(tables::DELIVERY_TIME),
            FilterKey::DeliveryMethods => FilterRule::MultiChoice(tables::DELIVERY_METHODS),
            FilterKey::DeliveryOptions => FilterRule::MultiChoice(tables::DELIVERY_OPTIONS),
            FilterKey::City => FilterRule::Text(tables::CITY_PARAM),
            FilterKey::Voivodeship => FilterRule::MultiChoice(tables::VOIVODESHIP),
            FilterKey::ProductRating => FilterRule::Choice(tables::PRODUCT_RATING),
            FilterKey::VatInvoice => FilterRule::Flag(tables::VAT_INVOICE),
            FilterKey::AllegroPrograms => FilterRule::MultiChoice(tables::ALLEGRO_PROGRAMS),
            FilterKey::Occasions => FilterRule::MultiChoice(tables::OCCASIONS),
        }
    }

    pub fn shape(&self) -> FilterShape {
        self.rule().shape()
    }

    /// Choice names accepted by this key, in table order. Empty for non-choice keys.
    pub fn choice_names(&self) -> Vec<&'static str> {
        match self.rule() {
            FilterRule::Choice(table) | FilterRule::MultiChoice(table) => {
                table.iter().map(|(name, _)| *name).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A value supplied for one filter key.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Flag(bool),
    Choice(String),
    MultiChoice(Vec<String>),
    Bound(f64),
    Text(String),
}

impl FilterValue {
    pub fn shape(&self) -> FilterShape {
        match self {
            FilterValue::Flag(_) => FilterShape::Flag,
            FilterValue::Choice(_) => FilterShape::Choice,
            FilterValue::MultiChoice(_) => FilterShape::MultiChoice,
            FilterValue::Bound(_) => FilterShape::Bound,
            FilterValue::Text(_) => FilterShape::Text,
        }
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FilterValue::Choice(value.into())
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::MultiChoice(values.into_iter().map(Into::into).collect())
    }
}

/// Filter criteria for one crawl call.
///
/// Keys map to optional values; `None` and absent keys contribute nothing.
/// Iteration follows [`FilterKey`] order, so compiling is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    values: BTreeMap<FilterKey, Option<FilterValue>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or clears, with `None`) the value of `key`.
    pub fn set(&mut self, key: FilterKey, value: Option<FilterValue>) -> &mut Self {
        self.values.insert(key, value);
        self
    }

    /// Builder-style variant of [`FilterCriteria::set`].
    pub fn with(mut self, key: FilterKey, value: FilterValue) -> Self {
        self.values.insert(key, Some(value));
        self
    }

    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.values.get(&key).and_then(Option::as_ref)
    }

    /// Keys with a value, in compile order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &FilterValue)> {
        self.values
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (*key, v)))
    }

    /// True when no key carries a value.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Compiles filter criteria into a listing query fragment.
///
/// Fragments are joined with `&` and spaces are encoded as `%20`. The result
/// carries no leading separator; an empty string means "no filters".
///
/// # Errors
///
/// Returns a [`FilterError`] when a value does not match its key's declared
/// shape, names an unknown choice, or is an invalid numeric bound.
pub fn compile(criteria: &FilterCriteria) -> Result<String, FilterError> {
    let mut fragments = Vec::new();
    for (key, value) in criteria.iter() {
        compile_value(key, value, &mut fragments)?;
    }
    Ok(fragments.join("&").replace(' ', "%20"))
}

fn compile_value(
    key: FilterKey,
    value: &FilterValue,
    fragments: &mut Vec<String>,
) -> Result<(), FilterError> {
    match (key.rule(), value) {
        (FilterRule::Flag(fragment), FilterValue::Flag(enabled)) => {
            if *enabled {
                fragments.push(fragment.to_string());
            }
        }
        (FilterRule::Choice(table), FilterValue::Choice(choice)) => {
            fragments.push(lookup(key, table, choice)?.to_string());
        }
        (FilterRule::MultiChoice(table), FilterValue::MultiChoice(choices)) => {
            for choice in choices {
                fragments.push(lookup(key, table, choice)?.to_string());
            }
        }
        (FilterRule::Bound(param), FilterValue::Bound(bound)) => {
            if !bound.is_finite() || *bound < 0.0 {
                return Err(FilterError::InvalidBound { key, value: *bound });
            }
            fragments.push(format!("{param}={bound}"));
        }
        (FilterRule::Text(param), FilterValue::Text(text)) => {
            let text = text.trim();
            if !text.is_empty() {
                fragments.push(format!("{param}={}", urlencoding::encode(text)));
            }
        }
        (rule, value) => {
            return Err(FilterError::ShapeMismatch {
                key,
                expected: rule.shape(),
                found: value.shape(),
            });
        }
    }
    Ok(())
}

fn lookup(
    key: FilterKey,
    table: &'static [(&'static str, &'static str)],
    choice: &str,
) -> Result<&'static str, FilterError> {
    table
        .iter()
        .find(|(name, _)| *name == choice)
        .map(|(_, fragment)| *fragment)
        .ok_or_else(|| FilterError::UnknownChoice {
            key,
            value: choice.to_string(),
        })
}
