//! Incremental application launcher.
//!
//! Scans `.desktop` descriptors and filters them against a live query on every
//! keystroke. There is no index cache: each query re-reads the directory, so a file
//! added or removed between keystrokes shows up on the very next one.

mod controller;
mod desktop_entry;

pub use controller::LauncherController;
pub use desktop_entry::{filter, parse_descriptor, scan, DesktopEntry};
