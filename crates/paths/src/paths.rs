//! Centralized path management for ATermD.
//!
//! All application directories are lazily initialized and cached.

use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();
static APPLICATIONS_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGS_DIR: OnceLock<PathBuf> = OnceLock::new();

/// System directory scanned for `.desktop` application descriptors.
pub const SYSTEM_APPLICATIONS_DIR: &str = "/usr/share/applications";

/// ~/.config/alinuxd (always under the home directory, on every platform)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("alinuxd")
    })
}

/// /usr/share/applications
pub fn applications_dir() -> &'static PathBuf {
    APPLICATIONS_DIR.get_or_init(|| PathBuf::from(SYSTEM_APPLICATIONS_DIR))
}

/// ~/.local/share/atermd/logs (or platform equivalent)
pub fn logs_dir() -> &'static PathBuf {
    LOGS_DIR.get_or_init(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("atermd")
            .join("logs")
    })
}

/// Config file path: config_dir()/conf.ini
pub fn config_file() -> PathBuf {
    config_dir().join("conf.ini")
}

/// Log file path: logs_dir()/atermd.log
pub fn log_file() -> PathBuf {
    logs_dir().join("atermd.log")
}
