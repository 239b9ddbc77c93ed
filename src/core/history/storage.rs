//! Encoding of the persisted history unit.
//!
//! Current layout: `{"version": 1, "records": [...]}`. A bare JSON array is the
//! unversioned layout written before the envelope existed.

use std::io;

use serde::Serialize;
use serde_json::Value;

use super::HistoryRecord;
use super::migrate;

pub(super) const SCHEMA_VERSION: u64 = 1;

#[derive(Serialize)]
struct HistoryFile<'a> {
    version: u64,
    records: &'a [HistoryRecord],
}

pub(super) fn encode(records: &[HistoryRecord]) -> io::Result<String> {
    let file = HistoryFile {
        version: SCHEMA_VERSION,
        records,
    };
    serde_json::to_string(&file).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Split the unit into its schema version and raw record values.
fn unwrap_unit(root: Value) -> Option<(u64, Vec<Value>)> {
    match root {
        Value::Array(records) => Some((0, records)),
        Value::Object(mut map) => {
            let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
            match map.remove("records") {
                Some(Value::Array(records)) => Some((version, records)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Decode a persisted unit. Anything unreadable yields an empty list; single records
/// that fail to decode after normalization are dropped.
pub(super) fn decode(data: &str) -> Vec<HistoryRecord> {
    if data.trim().is_empty() {
        return vec![];
    }
    let root: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("History is not valid JSON, treating as empty: {}", e);
            return vec![];
        }
    };
    let Some((version, raw_records)) = unwrap_unit(root) else {
        log::warn!("History has an unexpected shape, treating as empty");
        return vec![];
    };
    if version > SCHEMA_VERSION {
        log::warn!(
            "History schema version {} is newer than {}, reading what is understood",
            version,
            SCHEMA_VERSION
        );
    }

    raw_records
        .into_iter()
        .enumerate()
        .filter_map(|(i, mut raw)| {
            migrate::normalize_record(&mut raw);
            match serde_json::from_value::<HistoryRecord>(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping unreadable history record {}: {}", i, e);
                    None
                }
            }
        })
        .collect()
}
