//! Generic utilities used across core modules.

use chrono::{DateTime, Local};

/// Filter items by case-insensitive query matching on two string fields.
/// Returns all items when query is empty.
pub fn filter_by_query<'a, T, F>(items: &'a [T], query: &str, get_fields: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> (&'a str, &'a str),
{
    if query.is_empty() {
        return items.iter().collect();
    }
    let q = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let (a, b) = get_fields(item);
            a.to_lowercase().contains(&q) || b.to_lowercase().contains(&q)
        })
        .collect()
}

/// One-line preview: newlines become spaces. Longer text keeps its first `max_len` chars
/// followed by an ellipsis.
pub fn preview(text: &str, max_len: usize) -> String {
    let s = text.trim().replace(['\r', '\n'], " ");
    if s.chars().count() <= max_len {
        return s;
    }
    let truncated: String = s.chars().take(max_len).collect();
    format!("{}…", truncated)
}

/// RFC 3339 timestamp as local `YYYY/MM/DD HH:MM`. Unparsable input is returned as-is.
pub fn format_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Local).format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_empty_query_returns_all() {
        let items = vec![("a", ""), ("b", ""), ("c", "")];
        let out = filter_by_query(&items, "", |t| (t.0, t.1));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn filter_match_second_field_case_insensitive() {
        let items = vec![("a", "Hello"), ("b", "World")];
        let out = filter_by_query(&items, "world", |t| (t.0, t.1));
        assert_eq!(out, vec![&("b", "World")]);
    }

    #[test]
    fn filter_no_match_returns_empty() {
        let items = vec![("hello", ""), ("world", "")];
        let out = filter_by_query(&items, "xyz", |t| (t.0, t.1));
        assert!(out.is_empty());
    }

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("  Hello\nworld  ", 50), "Hello world");
    }

    #[test]
    fn preview_truncates_by_chars() {
        let out = preview("あいうえおかきくけこ", 5);
        assert_eq!(out, "あいうえお…");
    }

    #[test]
    fn preview_keeps_exactly_max_len_chars_before_ellipsis() {
        let text = "x".repeat(150);
        let out = preview(&text, 100);
        assert_eq!(out, format!("{}…", "x".repeat(100)));
        assert_eq!(preview(&"y".repeat(100), 100), "y".repeat(100));
    }

    #[test]
    fn format_timestamp_falls_back_to_input() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        let formatted = format_timestamp("2026-10-18T09:15:02.123Z");
        assert_eq!(formatted.len(), "2026/10/18 09:15".len());
        assert!(formatted.starts_with("2026/10/1"));
    }
}
