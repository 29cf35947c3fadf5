//! Decoding of the client-held composer selection.
//!
//! The picker round-trips the selection as `selected_ids`. Depending on the
//! client it arrives as repeated fields (`selected_ids=3&selected_ids=7`), a
//! single JSON array (`["3","7"]` or `[3,7]`) or a bracketed list with optional
//! quotes (`[3, '7']`). Decoding never fails; anything unreadable is dropped.

use super::FormData;

pub const SELECTED_IDS: &str = "selected_ids";

fn clean(value: &str) -> Option<String> {
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn decode_one(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            return items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => clean(&s),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
        }
        let inner = trimmed.trim_start_matches('[').trim_end_matches(']');
        return inner.split(',').filter_map(clean).collect();
    }
    if trimmed.contains(',') {
        return trimmed.split(',').filter_map(clean).collect();
    }
    clean(trimmed).into_iter().collect()
}

/// Raw selection values under `key`, in order, without duplicates.
pub fn parse_selected(data: &FormData, key: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for value in data.get_all(key).into_iter().flat_map(decode_one) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// The selection as integer ids; non-integer entries are skipped.
pub fn parse_selected_ids(data: &FormData, key: &str) -> Vec<i32> {
    parse_selected(data, key)
        .iter()
        .filter_map(|v| v.parse().ok())
        .collect()
}
