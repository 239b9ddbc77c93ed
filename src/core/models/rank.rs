//! Heuristic ordering and star rating of model identifiers.
//!
//! The bands and the preview override are tuned by eye, not derived from any published
//! model ranking. Keep them as they are unless the selection list looks wrong.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use super::info::{ModelDescriptor, short_name};

/// Names of the primary model family start with this.
const PRIMARY_FAMILY_PREFIX: &str = "gemini";
/// Rank positions per star band.
const BAND_WIDTH: usize = 5;
const MAX_STARS: u8 = 5;
const MIN_STARS: u8 = 1;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("version regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Stability {
    Preview,
    Stable,
    Latest,
}

/// Fields pulled out of a model name for ordering. Missing segments fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ParsedName<'a> {
    pub(super) primary_family: bool,
    pub(super) version: f64,
    pub(super) kind: &'a str,
    pub(super) stability: Stability,
}

pub(super) fn parse(name: &str) -> ParsedName<'_> {
    let short = short_name(name);
    let mut segments = short.split('-');
    let _family = segments.next();
    let version = segments
        .next()
        .and_then(|seg| VERSION_RE.find(seg))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    let kind = segments.next().unwrap_or("");

    let stability = if short.contains("latest") {
        Stability::Latest
    } else if short.contains("preview") {
        Stability::Preview
    } else {
        Stability::Stable
    };

    ParsedName {
        primary_family: short.starts_with(PRIMARY_FAMILY_PREFIX),
        version,
        kind,
        stability,
    }
}

fn kind_precedence(kind: &str) -> u8 {
    match kind {
        "pro" => 2,
        "flash" => 1,
        _ => 0,
    }
}

/// Descending on family, version, kind, stability; ascending on the full name last.
fn compare(a: &str, b: &str) -> Ordering {
    let pa = parse(a);
    let pb = parse(b);
    pb.primary_family
        .cmp(&pa.primary_family)
        .then_with(|| pb.version.total_cmp(&pa.version))
        .then_with(|| kind_precedence(pb.kind).cmp(&kind_precedence(pa.kind)))
        .then_with(|| pb.stability.cmp(&pa.stability))
        .then_with(|| a.cmp(b))
}

/// Stars for a name at `position` (0-based) in the ranked list.
pub(super) fn rating_for(name: &str, position: usize) -> u8 {
    let band = (position / BAND_WIDTH).min(usize::from(MAX_STARS));
    let mut stars = i32::from(MAX_STARS) - band as i32;
    if name.contains("pro") {
        stars += 1;
    }
    if name.contains("preview") {
        stars = i32::from(MIN_STARS);
    }
    stars.clamp(i32::from(MIN_STARS), i32::from(MAX_STARS)) as u8
}

/// Order model names best-first and rate them. Empty input gives empty output.
pub fn rank<S: AsRef<str>>(names: &[S]) -> Vec<ModelDescriptor> {
    let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
        .into_iter()
        .enumerate()
        .map(|(position, name)| ModelDescriptor::new(name.to_string(), rating_for(name, position)))
        .collect()
}
