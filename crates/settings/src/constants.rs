//! Centralized configuration constants for ATermD.
//!
//! Organized by component, mirroring how the rest of the workspace consumes them.

/// Terminal tab bank.
pub mod tabs {
    /// Number of terminal sessions created at startup.
    pub const COUNT: usize = 10;
}

/// Terminal font.
pub mod font {
    /// Font size used when no valid size is persisted.
    pub const DEFAULT_SIZE: i32 = 16;
    /// Minimum allowed font size.
    pub const MIN_SIZE: i32 = 8;
    /// Maximum allowed font size.
    pub const MAX_SIZE: i32 = 32;
    /// Font size change per keypress.
    pub const STEP: i32 = 1;
    /// Font family applied to every session.
    pub const FAMILY: &str = "Courier New";
    /// Font style applied to every session.
    pub const STYLE: &str = "Bold";
}

/// Login shell resolution.
pub mod shell {
    /// Environment variable consulted first.
    pub const ENV_VAR: &str = "SHELL";
    /// Tried in order when `$SHELL` is unset or not executable.
    pub const PRIMARY_FALLBACK: &str = "/bin/bash";
    pub const SECONDARY_FALLBACK: &str = "/bin/sh";
}

/// Application launcher.
pub mod launcher {
    /// Maximum number of results shown for a query.
    pub const MAX_RESULTS: usize = 10;
    /// File suffix of application descriptors.
    pub const DESCRIPTOR_SUFFIX: &str = ".desktop";
    /// Section holding the `Name` and `Exec` keys.
    pub const DESCRIPTOR_SECTION: &str = "Desktop Entry";
    /// Window-manager configuration utility bound to the Super key.
    pub const CONFIG_TOOL: &str = "obconf";
}

/// Main window.
pub mod window {
    pub const TITLE: &str = "ATermD - Retro Terminal with Tabs";
    /// Short name used in the status bar.
    pub const SHORT_NAME: &str = "ATermD";
}

/// Status bar.
pub mod status_bar {
    use std::time::Duration;

    /// Clock format (strftime syntax).
    pub const CLOCK_FORMAT: &str = "%H:%M:%S | %a %d %b %Y";
    /// Clock refresh interval.
    pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
}

/// Per-session output history kept by the PTY backend.
pub mod scrollback {
    /// Bytes of output retained per session before the oldest are dropped.
    pub const MAX_BYTES: usize = 1024 * 1024;
}

/// Settings file layout and validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;
    /// Section holding all recognized keys.
    pub const SECTION: &str = "Settings";
    /// Key holding the persisted font size.
    pub const FONT_SIZE_KEY: &str = "font_size";
}
