//! Configuration system for ATermD.
//!
//! Provides compile-time constants, key-file parsing and the persisted settings store.

pub mod constants;
pub mod file;
mod store;

pub use file::{load_config, parse_config, save_font_size, Config, SettingsSection};
pub use store::{ConfigStore, SettingsStore};

#[cfg(any(test, feature = "test-support"))]
pub use store::MemoryStore;
