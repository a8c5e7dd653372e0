//! Shared action and input definitions for ATermD.
//!
//! Everything the hotkey router can produce is a variant of [`Action`], defined here
//! so the router, the workspace and the host agree on one closed set.

mod keystroke;

pub use keystroke::{Key, Keystroke, Modifiers};

/// Everything a keystroke can be turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Session management
    /// Make the tab at this index active.
    SwitchTab(usize),
    /// Reset scrollback and screen of the active tab.
    ClearActive,
    /// Grow or shrink the shared font size.
    AdjustFontSize(i32),

    // Window and external tools
    /// Show or hide the main window.
    ToggleWindow,
    /// Start the window-manager configuration utility.
    LaunchConfigTool,
    /// Pop up the context menu.
    OpenContextMenu,

    // Launcher
    /// Open the launcher, or close it when already open.
    ToggleLauncher,
    /// Append a character to the launcher query.
    LauncherInput(char),
    /// Remove the last character of the launcher query.
    LauncherBackspace,
    LauncherSelectNext,
    LauncherSelectPrev,
    /// Start the highlighted launcher result.
    LauncherConfirm,
    /// Clear the query and hide the launcher.
    LauncherDismiss,
}

impl Action {
    /// Stable kebab-case name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SwitchTab(_) => "switch-tab",
            Action::ClearActive => "clear",
            Action::AdjustFontSize(delta) if *delta >= 0 => "increase-font-size",
            Action::AdjustFontSize(_) => "decrease-font-size",
            Action::ToggleWindow => "toggle-window",
            Action::LaunchConfigTool => "launch-config-tool",
            Action::OpenContextMenu => "open-context-menu",
            Action::ToggleLauncher => "toggle-launcher",
            Action::LauncherInput(_) => "launcher-input",
            Action::LauncherBackspace => "launcher-backspace",
            Action::LauncherSelectNext => "launcher-select-next",
            Action::LauncherSelectPrev => "launcher-select-prev",
            Action::LauncherConfirm => "launcher-confirm",
            Action::LauncherDismiss => "launcher-dismiss",
        }
    }

    /// Whether the action only makes sense while the launcher owns focus.
    pub fn is_launcher_local(&self) -> bool {
        matches!(
            self,
            Action::LauncherInput(_)
                | Action::LauncherBackspace
                | Action::LauncherSelectNext
                | Action::LauncherSelectPrev
                | Action::LauncherConfirm
                | Action::LauncherDismiss
        )
    }
}
