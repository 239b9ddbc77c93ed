//! Normalization of stored records written by older versions.
//!
//! Applied to every raw record on load, before typed decoding:
//! - settings without `mode` are reply settings;
//! - `showExtra` stored as "yes"/"no" becomes a boolean;
//! - slider levels stored as strings become integers, a numeric `charCount` a string;
//! - the old `relationshipRadio` element id becomes `relationshipChoice`;
//! - punctuation labels from the old form become `use` / `omit`.

use serde_json::{Map, Value};

use crate::core::settings::RelationshipChoice;

pub(super) fn normalize_record(record: &mut Value) {
    let Some(record) = record.as_object_mut() else {
        return;
    };
    if let Some(Value::Object(settings)) = record.get_mut("settings") {
        normalize_settings(settings);
    }
    // Missing replies were written as null by some versions.
    if record.get("aiReply").is_some_and(Value::is_null) {
        record.insert("aiReply".to_string(), Value::String(String::new()));
    }
    if record
        .get("additionalQuestions")
        .is_some_and(|v| v.as_str().is_some_and(|s| s.trim().is_empty()))
    {
        record.remove("additionalQuestions");
    }
}

fn normalize_settings(settings: &mut Map<String, Value>) {
    let mode = settings
        .entry("mode")
        .or_insert_with(|| Value::String("reply".to_string()));
    if mode.as_str() != Some("reply") {
        return;
    }

    if let Some(v) = settings.get_mut("showExtra") {
        *v = Value::Bool(truthy(v));
    }
    for key in ["sentiment", "politeness"] {
        if let Some(v) = settings.get_mut(key) {
            *v = level(v);
        }
    }
    match settings.get("charCount") {
        Some(Value::Number(n)) => {
            let s = n.to_string();
            settings.insert("charCount".to_string(), Value::String(s));
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            settings.remove("charCount");
        }
        _ => {}
    }

    if !settings.contains_key("relationshipChoice")
        && let Some(Value::String(radio)) = settings.remove("relationshipRadio")
    {
        let choice = choice_from_radio_id(&radio);
        settings.insert(
            "relationshipChoice".to_string(),
            Value::String(choice.as_str().to_string()),
        );
    }
    if let Some(Value::String(choice)) = settings.get("relationshipChoice")
        && !RelationshipChoice::ALL.iter().any(|c| c.as_str() == choice)
    {
        settings.insert(
            "relationshipChoice".to_string(),
            Value::String(RelationshipChoice::Other.as_str().to_string()),
        );
    }

    if let Some(Value::String(p)) = settings.get("punctuation") {
        let normalized = match p.as_str() {
            "omit" | "なし" | "no" | "none" => "omit",
            _ => "use",
        };
        settings.insert(
            "punctuation".to_string(),
            Value::String(normalized.to_string()),
        );
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "yes" | "true" | "on" | "1"
        ),
        Value::Number(n) => n.as_u64().is_some_and(|n| n != 0),
        _ => false,
    }
}

/// Sliders were stored as strings. Out-of-range or unreadable levels become the midpoint.
fn level(v: &Value) -> Value {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let level = parsed
        .filter(|n| (0.0..=100.0).contains(n))
        .map(|n| n.round() as u64)
        .unwrap_or(u64::from(crate::core::settings::DEFAULT_LEVEL));
    Value::from(level)
}

/// `rel_friend` → Friend; unknown ids → Other.
fn choice_from_radio_id(id: &str) -> RelationshipChoice {
    let name = id.strip_prefix("rel_").unwrap_or(id);
    RelationshipChoice::ALL
        .into_iter()
        .find(|c| c.as_str() == name)
        .unwrap_or(RelationshipChoice::Other)
}
