//! Model discovery: ranking, display, and filtering of backend model identifiers.

mod info;
mod rank;

pub use info::{ModelDescriptor, NAMESPACE_PREFIX, short_name};
pub use rank::rank;

use crate::core::util;

/// Filter ranked models by query (case-insensitive match on name or display text).
pub fn filter_models<'a>(models: &'a [ModelDescriptor], query: &str) -> Vec<&'a ModelDescriptor> {
    util::filter_by_query(models, query, |m| (m.name.as_str(), m.display_text.as_str()))
}

/// Pick the model to preselect: the saved one if it is still offered, else the top-ranked one.
pub fn default_selection<'a>(
    models: &'a [ModelDescriptor],
    saved: Option<&str>,
) -> Option<&'a ModelDescriptor> {
    saved
        .and_then(|s| models.iter().find(|m| m.name == s))
        .or_else(|| models.first())
}

#[cfg(test)]
mod tests;
