//! The window collaborator the workspace drives.

use crate::context_menu::{ContextMenu, MenuChoice};
use crate::status_bar::StatusLine;
use launcher::LauncherController;
use platform::WindowHints;

/// Whatever draws the main window: a GUI toolkit or the controlling terminal.
///
/// Every method is called on the event-loop thread. `show_context_menu` and
/// `show_message` may block until the user answers.
pub trait WindowHost {
    /// Called exactly once, before any other method.
    fn apply_hints(&mut self, hints: &WindowHints);
    fn toggle_visible(&mut self);
    fn set_status(&mut self, status: &StatusLine);
    /// Redraw the launcher overlay, or remove it when the launcher is hidden.
    fn render_launcher(&mut self, launcher: &LauncherController);
    /// Pop up `menu` and return the activated choice, if any.
    fn show_context_menu(&mut self, menu: &ContextMenu) -> Option<MenuChoice>;
    fn show_message(&mut self, title: &str, body: &str);
}
