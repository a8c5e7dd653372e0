//! Platform integrations consumed by the session shell.
//!
//! Process spawning for the launcher and the configuration tool, and the one-time
//! window-manager hints handed to whichever host draws the main window.

mod spawn;
mod window;

pub use spawn::{NativeSpawner, ProcessSpawner};
pub use window::WindowHints;

#[cfg(any(test, feature = "test-support"))]
pub use spawn::MockProcessSpawner;
