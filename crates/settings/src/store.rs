//! Persisted settings store.

use crate::file::{load_config, save_font_size, Config};
use std::path::{Path, PathBuf};

/// Backing store for settings that must survive a restart.
///
/// Saving is best-effort: implementations swallow I/O failures, the in-memory value
/// stays authoritative for the running process.
pub trait SettingsStore {
    /// Font size read at startup (already validated).
    fn font_size(&self) -> i32;
    /// Record a new font size and persist it.
    fn save_font_size(&mut self, size: i32);
}

/// Settings store backed by the key file on disk.
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Read the settings file once. Missing or corrupt files yield defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = load_config(&path);
        tracing::debug!(
            "Loaded settings from {:?} (font size {})",
            path,
            config.font_size()
        );
        Self { path, config }
    }

    /// Read the settings file at its standard location.
    pub fn load_default() -> Self {
        Self::load(atermd_paths::config_file())
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl SettingsStore for ConfigStore {
    fn font_size(&self) -> i32 {
        self.config.font_size()
    }

    fn save_font_size(&mut self, size: i32) {
        self.config.settings.font_size = i64::from(size);
        if let Err(e) = save_font_size(&self.path, size) {
            tracing::warn!("Failed to save font size: {:#}", e);
        }
    }
}

/// In-memory store that records every save, for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct MemoryStore {
    font_size: i32,
    saves: std::sync::Arc<parking_lot::Mutex<Vec<i32>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStore {
    pub fn new(font_size: i32) -> Self {
        Self {
            font_size,
            saves: Default::default(),
        }
    }

    /// Every size passed to `save_font_size`, oldest first. Shared between clones.
    pub fn saves(&self) -> Vec<i32> {
        self.saves.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl SettingsStore for MemoryStore {
    fn font_size(&self) -> i32 {
        self.font_size
    }

    fn save_font_size(&mut self, size: i32) {
        self.font_size = size;
        self.saves.lock().push(size);
    }
}
