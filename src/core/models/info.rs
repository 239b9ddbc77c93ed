//! Display-ready model type (no dependencies on the backends).

use serde::Serialize;

/// Prefix the listing endpoint puts in front of model names.
pub const NAMESPACE_PREFIX: &str = "models/";

pub const FILLED_STAR: char = '★';
pub const OPEN_STAR: char = '☆';

/// A ranked model identifier, ready for a selection list. Recomputed on every fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Identifier exactly as the backend returned it (may carry `models/`).
    pub name: String,
    /// 1..=5
    pub rating: u8,
    pub display_text: String,
}

impl ModelDescriptor {
    pub fn new(name: String, rating: u8) -> Self {
        let display_text = format!("{} {}", stars(rating), short_name(&name));
        Self {
            name,
            rating,
            display_text,
        }
    }
}

/// Strip the namespace prefix.
pub fn short_name(name: &str) -> &str {
    name.strip_prefix(NAMESPACE_PREFIX).unwrap_or(name)
}

/// Five glyphs: `rating` filled, the rest open.
pub fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    std::iter::repeat_n(FILLED_STAR, filled)
        .chain(std::iter::repeat_n(OPEN_STAR, 5 - filled))
        .collect()
}
