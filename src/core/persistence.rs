//! Persistence of user preferences: the last-used API key and the last-selected model.
//!
//! Read failures are logged and treated as "nothing saved".

use std::io;

use crate::core::kv::{self, KeyValueStore};

fn load_trimmed(store: &impl KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) => {
            log::warn!("Failed to read {} from store: {}", key, e);
            None
        }
    }
}

/// Load the last used API key, if one was saved.
pub fn load_api_key(store: &impl KeyValueStore) -> Option<String> {
    load_trimmed(store, kv::API_KEY_KEY)
}

/// Save the API key (trimmed).
pub fn save_api_key(store: &impl KeyValueStore, key: &str) -> io::Result<()> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "API key cannot be empty",
        ));
    }
    store.set(kv::API_KEY_KEY, trimmed)
}

/// Load the last selected model ID.
pub fn load_selected_model(store: &impl KeyValueStore) -> Option<String> {
    load_trimmed(store, kv::SELECTED_MODEL_KEY)
}

/// Save the selected model ID.
pub fn save_selected_model(store: &impl KeyValueStore, model_id: &str) -> io::Result<()> {
    store.set(kv::SELECTED_MODEL_KEY, model_id.trim())
}
