//! Window-manager hints for the main window.

use std::fmt;

/// Hints applied once when the main window is created and never revisited.
///
/// The main window behaves like a desktop layer: it sits below other windows, stays on
/// every workspace and has no decorations or taskbar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHints {
    pub title: String,
    pub keep_below: bool,
    pub skip_taskbar: bool,
    pub skip_pager: bool,
    pub sticky: bool,
    pub decorated: bool,
}

impl WindowHints {
    /// Hints for the desktop-layer main window.
    pub fn desktop(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            keep_below: true,
            skip_taskbar: true,
            skip_pager: true,
            sticky: true,
            decorated: false,
        }
    }

    /// `_NET_WM_STATE` atoms a window manager should be asked to add.
    pub fn net_wm_states(&self) -> Vec<&'static str> {
        let mut states = Vec::new();
        if self.keep_below {
            states.push("_NET_WM_STATE_BELOW");
        }
        if self.skip_taskbar {
            states.push("_NET_WM_STATE_SKIP_TASKBAR");
        }
        if self.skip_pager {
            states.push("_NET_WM_STATE_SKIP_PAGER");
        }
        if self.sticky {
            states.push("_NET_WM_STATE_STICKY");
        }
        states
    }
}

impl fmt::Display for WindowHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} [{}]{}",
            self.title,
            self.net_wm_states().join(", "),
            if self.decorated { "" } else { " borderless" }
        )
    }
}
