//! Centralized path helpers for the data directory holding persisted state.

use std::env;
use std::path::PathBuf;

use crate::core::app;

/// Env var that points the key-value store somewhere other than the platform data dir.
pub const DATA_DIR_ENV: &str = "REPLY_FORGE_DATA_DIR";

/// Project directories from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Data directory for the key-value store (~/.local/share/reply-forge/store/).
/// `REPLY_FORGE_DATA_DIR` overrides it (used by integration tests and portable installs).
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    project_dirs().map(|d| d.data_dir().join("store"))
}
