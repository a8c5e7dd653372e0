//! The terminal collaborator interface.

use anyhow::Result;
use settings::constants::font;
use std::fmt;
use std::path::Path;

/// Opaque reference to one session inside a [`TerminalBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub usize);

/// Font applied to every session, e.g. `Courier New Bold 17`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub family: String,
    pub style: String,
    pub size: i32,
}

impl FontDescriptor {
    /// The terminal font at `size` points.
    pub fn terminal(size: i32) -> Self {
        Self {
            family: font::FAMILY.to_string(),
            style: font::STYLE.to_string(),
            size,
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.family, self.style, self.size)
    }
}

/// Creates and drives terminal sessions.
///
/// Session creation is split in two: `create` allocates an addressable placeholder and
/// `spawn_shell` starts a process in it. A failed spawn leaves an empty but valid session.
pub trait TerminalBackend {
    fn create(&mut self) -> Result<SessionHandle>;
    fn spawn_shell(&mut self, handle: SessionHandle, shell: &Path) -> Result<()>;
    fn set_font(&mut self, handle: SessionHandle, font: &FontDescriptor);
    fn reset(&mut self, handle: SessionHandle, clear_scrollback: bool, clear_screen: bool);
    fn copy_selection(&mut self, handle: SessionHandle);
    fn paste_clipboard(&mut self, handle: SessionHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_descriptor_display() {
        assert_eq!(FontDescriptor::terminal(17).to_string(), "Courier New Bold 17");
    }
}
