//! In-memory terminal backend for tests.

use crate::backend::{FontDescriptor, SessionHandle, TerminalBackend};
use anyhow::{bail, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A call made on a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Create(SessionHandle),
    SpawnShell(SessionHandle, PathBuf),
    SetFont(SessionHandle, FontDescriptor),
    Reset {
        handle: SessionHandle,
        clear_scrollback: bool,
        clear_screen: bool,
    },
    CopySelection(SessionHandle),
    PasteClipboard(SessionHandle),
}

#[derive(Default)]
struct State {
    calls: Vec<BackendCall>,
    created: usize,
    fail_create_after: Option<usize>,
    failing_spawns: Vec<SessionHandle>,
}

/// Records every call. Clones share the log, so keep one to inspect after boxing.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    state: Arc<Mutex<State>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `create` fails once `count` sessions exist.
    pub fn fail_create_after(self, count: usize) -> Self {
        self.state.lock().fail_create_after = Some(count);
        self
    }

    /// `spawn_shell` fails for `handle`.
    pub fn fail_spawn_for(self, handle: SessionHandle) -> Self {
        self.state.lock().failing_spawns.push(handle);
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Fonts most recently applied, one per session that received one.
    pub fn fonts(&self) -> Vec<(SessionHandle, FontDescriptor)> {
        let calls = self.calls();
        let mut latest: Vec<(SessionHandle, FontDescriptor)> = Vec::new();
        for call in calls {
            if let BackendCall::SetFont(handle, font) = call {
                match latest.iter_mut().find(|(h, _)| *h == handle) {
                    Some(entry) => entry.1 = font,
                    None => latest.push((handle, font)),
                }
            }
        }
        latest
    }
}

impl TerminalBackend for RecordingBackend {
    fn create(&mut self) -> Result<SessionHandle> {
        let mut state = self.state.lock();
        if state.fail_create_after.is_some_and(|limit| state.created >= limit) {
            bail!("terminal placeholder unavailable");
        }
        let handle = SessionHandle(state.created);
        state.created += 1;
        state.calls.push(BackendCall::Create(handle));
        Ok(handle)
    }

    fn spawn_shell(&mut self, handle: SessionHandle, shell: &Path) -> Result<()> {
        let mut state = self.state.lock();
        state
            .calls
            .push(BackendCall::SpawnShell(handle, shell.to_path_buf()));
        if state.failing_spawns.contains(&handle) {
            bail!("cannot exec {:?}", shell);
        }
        Ok(())
    }

    fn set_font(&mut self, handle: SessionHandle, font: &FontDescriptor) {
        self.state
            .lock()
            .calls
            .push(BackendCall::SetFont(handle, font.clone()));
    }

    fn reset(&mut self, handle: SessionHandle, clear_scrollback: bool, clear_screen: bool) {
        self.state.lock().calls.push(BackendCall::Reset {
            handle,
            clear_scrollback,
            clear_screen,
        });
    }

    fn copy_selection(&mut self, handle: SessionHandle) {
        self.state
            .lock()
            .calls
            .push(BackendCall::CopySelection(handle));
    }

    fn paste_clipboard(&mut self, handle: SessionHandle) {
        self.state
            .lock()
            .calls
            .push(BackendCall::PasteClipboard(handle));
    }
}
