//! Bounded, newest-first history of past generations.
//!
//! The whole list is one persisted unit under [`kv::HISTORY_KEY`]; every mutation
//! rewrites it. Reads never fail: a missing or corrupt unit is an empty history.

mod migrate;
mod storage;

use std::io;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::kv::{self, KeyValueStore};
use crate::core::settings::Settings;

/// One archived generation. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub settings: Settings,
    pub prompt: String,
    #[serde(default)]
    pub ai_reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_citations: Option<Vec<String>>,
    /// Newline-delimited follow-up questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_questions: Option<String>,
    /// RFC 3339 / ISO-8601, UTC.
    pub timestamp: String,
}

impl HistoryRecord {
    /// Build a record stamped with the current time.
    pub fn now(
        settings: Settings,
        prompt: String,
        ai_reply: String,
        ai_citations: Vec<String>,
        additional_questions: String,
    ) -> Self {
        Self {
            settings,
            prompt,
            ai_reply,
            ai_citations: (!ai_citations.is_empty()).then_some(ai_citations),
            additional_questions: (!additional_questions.trim().is_empty())
                .then_some(additional_questions),
            timestamp: current_timestamp(),
        }
    }
}

/// Current UTC time with millisecond precision, e.g. `2026-10-18T09:15:02.123Z`.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// History over a key-value store. Read-modify-write cycles hold `write_lock` and the
/// store's lock on [`kv::HISTORY_KEY`], so neither threads sharing this value nor other
/// processes on the same store lose updates.
pub struct HistoryStore<S> {
    kv: S,
    max_records: usize,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// `max_records` below 1 is treated as 1.
    pub fn new(kv: S, max_records: usize) -> Self {
        Self {
            kv,
            max_records: max_records.max(1),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<HistoryRecord> {
        let mut records = match self.kv.get(kv::HISTORY_KEY) {
            Ok(Some(data)) => storage::decode(&data),
            Ok(None) => vec![],
            Err(e) => {
                log::warn!("Failed to read history: {}", e);
                vec![]
            }
        };
        records.truncate(self.max_records);
        records
    }

    fn save(&self, records: &[HistoryRecord]) -> io::Result<()> {
        let data = storage::encode(records)?;
        self.kv.set(kv::HISTORY_KEY, &data)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // Guards (); a poisoned lock carries no state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert at the front, keep the newest `max_records`, persist.
    pub fn append(&self, record: HistoryRecord) -> io::Result<()> {
        let _guard = self.lock();
        let _store_lock = self.kv.lock(kv::HISTORY_KEY)?;
        let mut records = self.load();
        records.insert(0, record);
        records.truncate(self.max_records);
        self.save(&records)?;
        log::debug!("History now holds {} record(s)", records.len());
        Ok(())
    }

    /// All records, newest first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        let _guard = self.lock();
        self.load()
    }

    /// Remove the record at `index` (0 = newest). `Ok(false)` when out of range.
    pub fn delete_at(&self, index: usize) -> io::Result<bool> {
        let _guard = self.lock();
        let _store_lock = self.kv.lock(kv::HISTORY_KEY)?;
        let mut records = self.load();
        if index >= records.len() {
            return Ok(false);
        }
        records.remove(index);
        self.save(&records)?;
        Ok(true)
    }

    /// The record at `index`, without removing it.
    pub fn restore_at(&self, index: usize) -> Option<HistoryRecord> {
        let _guard = self.lock();
        self.load().into_iter().nth(index)
    }
}
