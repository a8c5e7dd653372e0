//! The event loop tying the terminal, the PTY sessions and the workspace together.

use crate::keys;
use crate::tty_host::TtyHost;
use anyhow::{Context, Result};
use atermd_workspace::Workspace;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use settings::constants::status_bar;
use std::time::{Duration, Instant};
use terminal::{PtyBackend, Session, SessionHandle};

/// How long to wait for input before checking sessions for output.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    workspace: Workspace,
    backend: PtyBackend,
    host: TtyHost,
    /// Session whose output is currently on screen.
    shown: Option<SessionHandle>,
    last_tick: Instant,
}

impl App {
    pub fn new(workspace: Workspace, backend: PtyBackend, host: TtyHost) -> Self {
        Self {
            workspace,
            backend,
            host,
            shown: None,
            last_tick: Instant::now(),
        }
    }

    /// Run until the quit chord is pressed or every started shell has exited.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if self.all_exited() {
                tracing::info!("All shells exited");
                return Ok(());
            }

            if event::poll(POLL_INTERVAL).context("Polling terminal input failed")? {
                let event = event::read().context("Reading terminal input failed")?;
                if !self.handle_event(event) {
                    tracing::info!("Quit requested");
                    return Ok(());
                }
            }

            if self.last_tick.elapsed() >= status_bar::TICK_INTERVAL {
                self.last_tick = Instant::now();
                self.workspace.tick();
            }

            self.pump_output();
        }
    }

    /// Returns false when the app should quit.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                if is_quit(&key) {
                    return false;
                }
                self.handle_key(&key);
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Right),
                ..
            }) => self.workspace.handle_secondary_click(),
            Event::Resize(cols, rows) => {
                self.host.resize(cols, rows);
                self.backend.resize(self.host.session_rows(), cols);
            }
            Event::Paste(text) => self.send_to_active(text.as_bytes()),
            _ => {}
        }
        true
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(stroke) = keys::to_keystroke(key) {
            if self.workspace.handle_key(&stroke) {
                return;
            }
        }
        let bytes = keys::encode(key);
        if !bytes.is_empty() {
            self.send_to_active(&bytes);
        }
    }

    fn send_to_active(&self, bytes: &[u8]) {
        let handle = self.workspace.registry().active_session().handle;
        if let Err(e) = self.backend.write_input(handle, bytes) {
            tracing::debug!("{:#}", e);
        }
    }

    /// Drain every session so histories stay current, and show the active one.
    fn pump_output(&mut self) {
        let registry = self.workspace.registry();
        let active = registry.active_session().handle;
        let mut active_output = Vec::new();
        for session in registry.sessions() {
            let output = self.backend.drain_output(session.handle);
            if session.handle == active {
                active_output = output;
            }
        }

        let redraw = self.host.take_redraw();
        if redraw || self.shown != Some(active) {
            self.host.show_session(&self.backend.scrollback(active));
            self.shown = Some(active);
        } else {
            self.host.passthrough(&active_output);
        }
    }

    fn all_exited(&self) -> bool {
        all_shells_exited(self.workspace.registry().sessions(), |handle| {
            self.backend.has_exited(handle)
        })
    }
}

/// True once every shell that started has exited. Tabs that never got a shell do not
/// count; with no shell started at all this is never true.
fn all_shells_exited(sessions: &[Session], exited: impl Fn(SessionHandle) -> bool) -> bool {
    let mut started = sessions.iter().filter(|session| session.shell_running).peekable();
    started.peek().is_some() && started.all(|session| exited(session.handle))
}

/// Ctrl+Alt+Q
fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT)
        && matches!(key.code, KeyCode::Char('q' | 'Q'))
}
