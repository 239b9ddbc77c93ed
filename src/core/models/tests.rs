//! Model ranking tests.

use crate::core::models::info::{short_name, stars};
use crate::core::models::rank::{Stability, parse, rating_for};
use crate::core::models::{default_selection, filter_models, rank};

fn names(ranked: &[crate::core::models::ModelDescriptor]) -> Vec<&str> {
    ranked.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn empty_input_gives_empty_output() {
    let ranked = rank::<&str>(&[]);
    assert!(ranked.is_empty());
}

#[test]
fn gemini_before_other_families_and_latest_before_plain() {
    let ranked = rank(&["gemini-1.5-pro-latest", "gemini-1.0-pro", "gemma-7b"]);
    assert_eq!(
        names(&ranked),
        vec!["gemini-1.5-pro-latest", "gemini-1.0-pro", "gemma-7b"]
    );
}

#[test]
fn latest_beats_stable_beats_preview_at_same_version_and_kind() {
    let ranked = rank(&[
        "models/gemini-1.5-pro-preview-0409",
        "models/gemini-1.5-pro-002",
        "models/gemini-1.5-pro-latest",
    ]);
    assert_eq!(
        names(&ranked),
        vec![
            "models/gemini-1.5-pro-latest",
            "models/gemini-1.5-pro-002",
            "models/gemini-1.5-pro-preview-0409",
        ]
    );
}

#[test]
fn pro_beats_flash_beats_unspecified() {
    let ranked = rank(&["gemini-1.5-8b", "gemini-1.5-flash", "gemini-1.5-pro"]);
    assert_eq!(
        names(&ranked),
        vec!["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.5-8b"]
    );
}

#[test]
fn higher_version_first() {
    let ranked = rank(&["gemini-1.0-pro", "gemini-2.0-flash", "gemini-1.5-pro"]);
    assert_eq!(
        names(&ranked),
        vec!["gemini-2.0-flash", "gemini-1.5-pro", "gemini-1.0-pro"]
    );
}

#[test]
fn ties_break_by_ascending_name() {
    let ranked = rank(&["gemini-1.5-flash-002", "gemini-1.5-flash-001"]);
    assert_eq!(
        names(&ranked),
        vec!["gemini-1.5-flash-001", "gemini-1.5-flash-002"]
    );
}

#[test]
fn malformed_names_get_defaults() {
    let parsed = parse("models/weird");
    assert_eq!(parsed.version, 0.0);
    assert_eq!(parsed.kind, "");
    assert_eq!(parsed.stability, Stability::Stable);
    assert!(!parsed.primary_family);

    let parsed = parse("models/gemini-pro-vision");
    assert!(parsed.primary_family);
    assert_eq!(parsed.version, 0.0);
    assert_eq!(parsed.kind, "vision");
}

#[test]
fn version_is_first_number_in_second_segment() {
    assert_eq!(parse("gemini-exp1206").version, 1206.0);
    assert_eq!(parse("gemini-2.5-flash").version, 2.5);
    assert_eq!(parse("gemma-3n-e4b-it").version, 3.0);
}

#[test]
fn rating_bands_by_position() {
    assert_eq!(rating_for("gemini-1.5-flash", 0), 5);
    assert_eq!(rating_for("gemini-1.5-flash", 4), 5);
    assert_eq!(rating_for("gemini-1.5-flash", 5), 4);
    assert_eq!(rating_for("gemini-1.5-flash", 10), 3);
    assert_eq!(rating_for("gemini-1.5-flash", 15), 2);
    assert_eq!(rating_for("gemini-1.5-flash", 20), 1);
    assert_eq!(rating_for("gemini-1.5-flash", 200), 1);
}

#[test]
fn pro_gets_a_bonus_star_clamped_to_five() {
    assert_eq!(rating_for("gemini-1.0-pro", 0), 5);
    assert_eq!(rating_for("gemini-1.0-pro", 7), 5);
    assert_eq!(rating_for("gemini-1.0-pro", 12), 4);
}

#[test]
fn preview_is_always_one_star() {
    assert_eq!(rating_for("gemini-2.5-pro-preview-05-06", 0), 1);
    let ranked = rank(&["gemini-2.5-pro-preview-05-06", "gemma-7b"]);
    let preview = ranked
        .iter()
        .find(|m| m.name.contains("preview"))
        .unwrap();
    assert_eq!(preview.rating, 1);
}

#[test]
fn every_rating_in_range_and_length_preserved() {
    let input: Vec<String> = (0..30)
        .map(|i| match i % 4 {
            0 => format!("models/gemini-1.{}-pro", i),
            1 => format!("models/gemini-2.{}-flash-preview", i),
            2 => format!("models/gemma-{}b", i),
            _ => format!("models/text-embedding-{}", i),
        })
        .collect();
    let ranked = rank(&input);
    assert_eq!(ranked.len(), input.len());
    assert!(ranked.iter().all(|m| (1..=5).contains(&m.rating)));
}

#[test]
fn ranking_is_deterministic() {
    let input = ["gemma-2b", "gemini-1.5-flash", "gemini-1.5-pro", "gemini-1.0-pro"];
    assert_eq!(rank(&input), rank(&input));
}

#[test]
fn primary_family_always_precedes_others() {
    let input = ["aqa", "gemma-9b", "gemini-0.1-nano", "imagen-3.0", "gemini-pro"];
    let ranked = rank(&input);
    let first_other = ranked
        .iter()
        .position(|m| !m.name.starts_with("gemini"))
        .unwrap();
    assert!(ranked[first_other..]
        .iter()
        .all(|m| !m.name.starts_with("gemini")));
}

#[test]
fn display_text_strips_prefix_and_shows_stars() {
    let ranked = rank(&["models/gemini-1.5-flash"]);
    assert_eq!(ranked[0].display_text, "★★★★★ gemini-1.5-flash");
    assert_eq!(stars(2), "★★☆☆☆");
    assert_eq!(short_name("gemini-pro"), "gemini-pro");
}

#[test]
fn default_selection_prefers_saved_model_when_offered() {
    let ranked = rank(&["models/gemini-1.5-pro", "models/gemini-1.5-flash"]);
    let picked = default_selection(&ranked, Some("models/gemini-1.5-flash")).unwrap();
    assert_eq!(picked.name, "models/gemini-1.5-flash");

    let picked = default_selection(&ranked, Some("models/gone")).unwrap();
    assert_eq!(picked.name, "models/gemini-1.5-pro");

    assert!(default_selection(&[], None).is_none());
}

#[test]
fn filter_matches_name_case_insensitively() {
    let ranked = rank(&["models/gemini-1.5-pro", "models/gemma-7b"]);
    let out = filter_models(&ranked, "GEMMA");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "models/gemma-7b");
}
