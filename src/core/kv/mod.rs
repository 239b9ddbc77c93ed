//! Key-value persistence port.
//!
//! Everything the tool remembers between runs (history, API key, selected model)
//! lives under a handful of string keys. The history store and preference helpers
//! only see this trait, so tests run against [`MemoryStore`].

mod file;
#[cfg(test)]
mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use std::fs::File;
use std::io;

/// Key holding the serialized history unit.
pub const HISTORY_KEY: &str = "promptHistory";
/// Key holding the last-used API key.
pub const API_KEY_KEY: &str = "geminiApiKey";
/// Key holding the last-selected model identifier.
pub const SELECTED_MODEL_KEY: &str = "selectedModel";

/// Minimal get/set storage. Values are whole strings; writes replace.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Exclusive lock for a read-modify-write cycle on `key`, held until the guard drops.
    /// Stores private to one process need none.
    fn lock(&self, _key: &str) -> io::Result<KeyLock> {
        Ok(KeyLock::none())
    }
}

/// Guard returned by [`KeyValueStore::lock`]. Dropping it releases the lock.
#[derive(Debug)]
pub struct KeyLock {
    _file: Option<File>,
}

impl KeyLock {
    pub fn none() -> Self {
        Self { _file: None }
    }

    /// Held as long as `file` stays open.
    pub fn file(file: File) -> Self {
        Self { _file: Some(file) }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }

    fn lock(&self, key: &str) -> io::Result<KeyLock> {
        (**self).lock(key)
    }
}
