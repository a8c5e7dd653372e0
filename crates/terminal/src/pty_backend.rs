//! Terminal backend running each session's shell behind a PTY.

use crate::backend::{FontDescriptor, SessionHandle, TerminalBackend};
use crate::pty_handler::PtyHandler;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use settings::constants::scrollback;
use std::path::Path;
use std::sync::Arc;

const CLEAR_SCREEN: &[u8] = b"\x1b[H\x1b[2J";
const CLEAR_SCROLLBACK: &[u8] = b"\x1b[3J";

#[derive(Default)]
struct PtySession {
    pty: Option<PtyHandler>,
    /// Raw output history, capped at `scrollback::MAX_BYTES`.
    history: Vec<u8>,
    /// Bytes produced locally (resets) that the host has not drained yet.
    pending: Vec<u8>,
    font: Option<FontDescriptor>,
}

impl PtySession {
    fn record(&mut self, bytes: &[u8]) {
        self.history.extend_from_slice(bytes);
        if self.history.len() > scrollback::MAX_BYTES {
            let excess = self.history.len() - scrollback::MAX_BYTES;
            self.history.drain(..excess);
        }
    }
}

struct Inner {
    sessions: Vec<PtySession>,
    clipboard: String,
    rows: u16,
    cols: u16,
}

impl Inner {
    fn session_mut(&mut self, handle: SessionHandle) -> Option<&mut PtySession> {
        let session = self.sessions.get_mut(handle.0);
        if session.is_none() {
            tracing::warn!("Unknown terminal session {:?}", handle);
        }
        session
    }
}

/// PTY-backed [`TerminalBackend`].
///
/// Clones share the same sessions: the registry drives it through the trait while the
/// host loop feeds input and drains output through the inherent methods.
#[derive(Clone)]
pub struct PtyBackend {
    inner: Arc<Mutex<Inner>>,
}

impl PtyBackend {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                sessions: Vec::new(),
                clipboard: String::new(),
                rows,
                cols,
            })),
        }
    }

    /// Forward keyboard input to a session's shell.
    pub fn write_input(&self, handle: SessionHandle, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        let pty = inner
            .session_mut(handle)
            .and_then(|session| session.pty.as_mut())
            .with_context(|| format!("Session {:?} has no running shell", handle))?;
        pty.write(bytes)
    }

    /// Output produced since the last drain, recorded into the session's history.
    pub fn drain_output(&self, handle: SessionHandle) -> Vec<u8> {
        let mut inner = self.inner.lock();
        let Some(session) = inner.session_mut(handle) else {
            return Vec::new();
        };
        let mut output = std::mem::take(&mut session.pending);
        if let Some(pty) = &session.pty {
            let fresh = pty.read_output();
            session.record(&fresh);
            output.extend_from_slice(&fresh);
        }
        output
    }

    /// Everything the session has printed that is still retained.
    pub fn scrollback(&self, handle: SessionHandle) -> Vec<u8> {
        let inner = self.inner.lock();
        inner
            .sessions
            .get(handle.0)
            .map(|session| session.history.clone())
            .unwrap_or_default()
    }

    pub fn has_exited(&self, handle: SessionHandle) -> bool {
        let inner = self.inner.lock();
        inner
            .sessions
            .get(handle.0)
            .and_then(|session| session.pty.as_ref())
            .map_or(true, PtyHandler::has_exited)
    }

    /// Resize every running PTY.
    pub fn resize(&self, rows: u16, cols: u16) {
        let mut inner = self.inner.lock();
        inner.rows = rows;
        inner.cols = cols;
        for pty in inner.sessions.iter().filter_map(|s| s.pty.as_ref()) {
            if let Err(e) = pty.resize(rows, cols) {
                tracing::debug!("{:#}", e);
            }
        }
    }

    pub fn font(&self, handle: SessionHandle) -> Option<FontDescriptor> {
        let inner = self.inner.lock();
        inner.sessions.get(handle.0).and_then(|s| s.font.clone())
    }

    pub fn clipboard(&self) -> String {
        self.inner.lock().clipboard.clone()
    }

    pub fn set_clipboard(&self, text: impl Into<String>) {
        self.inner.lock().clipboard = text.into();
    }

    #[cfg(test)]
    fn inject_output(&self, handle: SessionHandle, bytes: &[u8]) {
        if let Some(session) = self.inner.lock().session_mut(handle) {
            session.record(bytes);
        }
    }
}

impl TerminalBackend for PtyBackend {
    fn create(&mut self) -> Result<SessionHandle> {
        let mut inner = self.inner.lock();
        inner.sessions.push(PtySession::default());
        Ok(SessionHandle(inner.sessions.len() - 1))
    }

    fn spawn_shell(&mut self, handle: SessionHandle, shell: &Path) -> Result<()> {
        let mut inner = self.inner.lock();
        let (rows, cols) = (inner.rows, inner.cols);
        let session = inner
            .session_mut(handle)
            .with_context(|| format!("Unknown terminal session {:?}", handle))?;
        session.pty = Some(PtyHandler::spawn(shell, rows, cols)?);
        tracing::debug!("Spawned {:?} in session {:?}", shell, handle);
        Ok(())
    }

    fn set_font(&mut self, handle: SessionHandle, font: &FontDescriptor) {
        if let Some(session) = self.inner.lock().session_mut(handle) {
            session.font = Some(font.clone());
        }
    }

    fn reset(&mut self, handle: SessionHandle, clear_scrollback: bool, clear_screen: bool) {
        let mut inner = self.inner.lock();
        let Some(session) = inner.session_mut(handle) else {
            return;
        };
        if clear_scrollback {
            session.history.clear();
            session.pending.extend_from_slice(CLEAR_SCROLLBACK);
        }
        if clear_screen {
            session.pending.extend_from_slice(CLEAR_SCREEN);
        }
    }

    /// Without a pointer selection, the last non-blank line of output is what gets copied.
    fn copy_selection(&mut self, handle: SessionHandle) {
        let mut inner = self.inner.lock();
        let Some(line) = inner
            .sessions
            .get(handle.0)
            .and_then(|session| last_line(&session.history))
        else {
            tracing::debug!("Nothing to copy in session {:?}", handle);
            return;
        };
        inner.clipboard = line;
    }

    fn paste_clipboard(&mut self, handle: SessionHandle) {
        let clipboard = self.clipboard();
        if clipboard.is_empty() {
            return;
        }
        if let Err(e) = self.write_input(handle, clipboard.as_bytes()) {
            tracing::warn!("Paste failed: {:#}", e);
        }
    }
}

/// Last line of `history` with visible text, escape sequences and control bytes removed.
fn last_line(history: &[u8]) -> Option<String> {
    let text = strip_escapes(&String::from_utf8_lossy(history));
    text.lines()
        .map(str::trim_end)
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(str::to_string)
}

fn strip_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.next() {
                // CSI: parameters until a final byte in @..~
                Some('[') => {
                    for c in chars.by_ref() {
                        if ('@'..='~').contains(&c) {
                            break;
                        }
                    }
                }
                // OSC: until BEL or ST
                Some(']') => {
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\n' | '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn backend_with_sessions(count: usize) -> (PtyBackend, Vec<SessionHandle>) {
        let mut backend = PtyBackend::new(24, 80);
        let handles = (0..count).map(|_| backend.create().unwrap()).collect();
        (backend, handles)
    }

    #[test]
    fn create_hands_out_sequential_handles() {
        let (_, handles) = backend_with_sessions(3);
        assert_eq!(
            handles,
            vec![SessionHandle(0), SessionHandle(1), SessionHandle(2)]
        );
    }

    #[test]
    fn placeholder_session_rejects_input() {
        let (backend, handles) = backend_with_sessions(1);
        assert!(backend.write_input(handles[0], b"ls\n").is_err());
        assert!(backend.has_exited(handles[0]));
        assert!(backend.drain_output(handles[0]).is_empty());
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let (mut backend, _) = backend_with_sessions(1);
        backend.reset(SessionHandle(7), true, true);
        backend.set_font(SessionHandle(7), &FontDescriptor::terminal(12));
        assert!(backend.drain_output(SessionHandle(7)).is_empty());
        assert!(backend.font(SessionHandle(7)).is_none());
    }

    #[test]
    fn failed_spawn_leaves_session_addressable() {
        let (mut backend, handles) = backend_with_sessions(2);
        assert!(backend
            .spawn_shell(handles[1], Path::new("/nonexistent/shell"))
            .is_err());
        backend.set_font(handles[1], &FontDescriptor::terminal(20));
        assert_eq!(backend.font(handles[1]).unwrap().size, 20);
    }

    #[test]
    fn reset_clears_only_that_session() {
        let (mut backend, handles) = backend_with_sessions(2);
        backend.inject_output(handles[0], b"first");
        backend.inject_output(handles[1], b"second");

        backend.reset(handles[0], true, true);

        assert!(backend.scrollback(handles[0]).is_empty());
        assert_eq!(backend.scrollback(handles[1]), b"second");
        assert_eq!(
            backend.drain_output(handles[0]),
            [CLEAR_SCROLLBACK, CLEAR_SCREEN].concat()
        );
        assert!(backend.drain_output(handles[0]).is_empty());
    }

    #[test]
    fn history_is_capped() {
        let (backend, handles) = backend_with_sessions(1);
        backend.inject_output(handles[0], &vec![b'a'; scrollback::MAX_BYTES]);
        backend.inject_output(handles[0], b"tail");

        let history = backend.scrollback(handles[0]);
        assert_eq!(history.len(), scrollback::MAX_BYTES);
        assert!(history.ends_with(b"tail"));
    }

    #[test]
    fn copy_takes_last_visible_line() {
        let (mut backend, handles) = backend_with_sessions(1);
        backend.inject_output(handles[0], b"$ ls\r\n\x1b[01;34mdocs\x1b[0m  notes.txt\r\n\r\n");

        backend.copy_selection(handles[0]);

        assert_eq!(backend.clipboard(), "docs  notes.txt");
    }

    #[test]
    fn copy_with_empty_history_keeps_clipboard() {
        let (mut backend, handles) = backend_with_sessions(1);
        backend.set_clipboard("kept");
        backend.copy_selection(handles[0]);
        assert_eq!(backend.clipboard(), "kept");
    }

    #[test_case("plain", "plain" ; "no escapes")]
    #[test_case("\x1b[1;32mgreen\x1b[0m", "green" ; "sgr")]
    #[test_case("\x1b]0;title\x07prompt", "prompt" ; "osc with bel")]
    #[test_case("\x1b]2;t\x1b\\x", "x" ; "osc with st")]
    #[test_case("a\rb\x08c", "abc" ; "control bytes")]
    fn test_strip_escapes(input: &str, expected: &str) {
        assert_eq!(strip_escapes(input), expected);
    }

    #[cfg(unix)]
    #[test]
    fn paste_reaches_the_shell() {
        use std::time::{Duration, Instant};

        let (mut backend, handles) = backend_with_sessions(1);
        backend.spawn_shell(handles[0], Path::new("/bin/sh")).unwrap();
        backend.set_clipboard("echo pasted-$((1 + 1))\n");

        backend.paste_clipboard(handles[0]);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            seen.extend(backend.drain_output(handles[0]));
            if String::from_utf8_lossy(&seen).contains("pasted-2") {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(String::from_utf8_lossy(&seen).contains("pasted-2"));
        assert!(String::from_utf8_lossy(&backend.scrollback(handles[0])).contains("pasted-2"));
    }
}
