//! Window host that draws into the controlling terminal.
//!
//! Row 1 is the status bar; the rest is a scroll region the active session's output is
//! passed through to. Origin mode keeps the session's cursor addressing inside that
//! region. Menus and messages are modal: they read keys until answered.

use atermd_workspace::{ContextMenu, MenuChoice, MenuItem, StatusLine, WindowHost};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use launcher::LauncherController;
use parking_lot::Mutex;
use platform::WindowHints;
use std::io::{self, Write};
use std::sync::Arc;

/// Source of input events for modal prompts.
pub type EventSource = Box<dyn FnMut() -> io::Result<Event> + Send>;

/// Bytes of session history replayed when a session is brought to the screen.
const REPLAY_BYTES: usize = 16 * 1024;

const LAUNCHER_PLACEHOLDER: &str = "Type program name...";

struct Screen {
    out: Box<dyn Write + Send>,
    cols: u16,
    rows: u16,
    visible: bool,
    status: String,
    launcher_open: bool,
    needs_redraw: bool,
}

impl Screen {
    fn emit(&mut self, bytes: &[u8]) {
        let result = self.out.write_all(bytes).and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::debug!("Terminal write failed: {}", e);
        }
    }

    fn layout(&mut self) {
        let region = format!("\x1b[2;{}r\x1b[?6h\x1b[H\x1b[2J", self.rows.max(2));
        self.emit(region.as_bytes());
        self.draw_status();
    }

    fn draw_status(&mut self) {
        if !self.visible {
            return;
        }
        let text = fit(&self.status, self.cols as usize);
        let bar = format!("\x1b7\x1b[?6l\x1b[1;1H\x1b[7m{}\x1b[0m\x1b8", text);
        self.emit(bar.as_bytes());
    }

    /// Clear the session region and draw `lines` from its top. Nothing while hidden.
    fn draw_panel(&mut self, lines: &[String]) {
        if !self.visible {
            return;
        }
        let mut buf = String::from("\x1b[?25l\x1b[H\x1b[2J");
        for (row, line) in lines.iter().enumerate() {
            buf.push_str(&format!("\x1b[{};1H{}", row + 1, fit(line, self.cols as usize)));
        }
        self.emit(buf.as_bytes());
        self.draw_status();
    }

    fn panel_height(&self) -> usize {
        usize::from(self.rows.saturating_sub(1)).max(1)
    }
}

/// [`WindowHost`] on the controlling terminal. Clones share one screen.
#[derive(Clone)]
pub struct TtyHost {
    screen: Arc<Mutex<Screen>>,
    events: Arc<Mutex<EventSource>>,
}

impl TtyHost {
    pub fn new(out: Box<dyn Write + Send>, events: EventSource, cols: u16, rows: u16) -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen {
                out,
                cols,
                rows,
                visible: true,
                status: String::new(),
                launcher_open: false,
                needs_redraw: false,
            })),
            events: Arc::new(Mutex::new(events)),
        }
    }

    fn is_visible(&self) -> bool {
        self.screen.lock().visible
    }

    /// Rows available to a session.
    pub fn session_rows(&self) -> u16 {
        self.screen.lock().rows.saturating_sub(1).max(1)
    }

    /// Set up the status row and scroll region.
    pub fn init_layout(&self) {
        self.screen.lock().layout();
    }

    pub fn resize(&self, cols: u16, rows: u16) {
        let mut screen = self.screen.lock();
        screen.cols = cols;
        screen.rows = rows;
        screen.layout();
        screen.needs_redraw = true;
    }

    /// Whether the session area must be repainted from history. Clears the flag.
    pub fn take_redraw(&self) -> bool {
        std::mem::take(&mut self.screen.lock().needs_redraw)
    }

    /// Pass live session output through, unless hidden or covered by the launcher.
    pub fn passthrough(&self, bytes: &[u8]) {
        let mut screen = self.screen.lock();
        if screen.visible && !screen.launcher_open && !bytes.is_empty() {
            screen.emit(bytes);
        }
    }

    /// Repaint the session area from the tail of a session's history.
    pub fn show_session(&self, history: &[u8]) {
        let mut screen = self.screen.lock();
        if !screen.visible || screen.launcher_open {
            return;
        }
        let mut buf = b"\x1b[H\x1b[2J\x1b[?25h".to_vec();
        buf.extend_from_slice(replay_tail(history));
        screen.emit(&buf);
        screen.draw_status();
    }

    /// Let the user pick one of `labels`. Digits 1-9 pick directly.
    fn pick(&self, title: &str, labels: &[String]) -> Option<usize> {
        if labels.is_empty() {
            self.message_box(title, "(empty)");
            return None;
        }

        let mut selected = 0usize;
        loop {
            {
                let mut screen = self.screen.lock();
                let lines = menu_lines(title, labels, selected, screen.panel_height());
                screen.draw_panel(&lines);
            }

            let event = match self.next_event() {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Reading menu input failed: {}", e);
                    return None;
                }
            };
            let Event::Key(key) = event else { continue };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Esc => return None,
                KeyCode::Enter => return Some(selected),
                KeyCode::Up => selected = selected.checked_sub(1).unwrap_or(labels.len() - 1),
                KeyCode::Down => selected = (selected + 1) % labels.len(),
                KeyCode::Char(c) => {
                    if let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                        if index < labels.len() {
                            return Some(index);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn next_event(&self) -> io::Result<Event> {
        let mut events = self.events.lock();
        (*events)()
    }

    fn finish_modal(&self) {
        let mut screen = self.screen.lock();
        screen.needs_redraw = true;
        screen.emit(b"\x1b[H\x1b[2J\x1b[?25h");
        screen.draw_status();
    }
}

impl WindowHost for TtyHost {
    fn apply_hints(&mut self, hints: &WindowHints) {
        tracing::info!("Window hints (not applicable to a terminal host): {}", hints);
        let title = format!("\x1b]0;{}\x07", hints.title);
        self.screen.lock().emit(title.as_bytes());
    }

    fn toggle_visible(&mut self) {
        let mut screen = self.screen.lock();
        screen.visible = !screen.visible;
        tracing::debug!("Window visible: {}", screen.visible);
        if screen.visible {
            screen.needs_redraw = true;
            screen.emit(b"\x1b[?25h");
            screen.draw_status();
        } else {
            screen.emit(b"\x1b7\x1b[?6l\x1b[2J\x1b[?25l\x1b8");
        }
    }

    fn set_status(&mut self, status: &StatusLine) {
        let mut screen = self.screen.lock();
        screen.status = status.to_string();
        screen.draw_status();
    }

    fn render_launcher(&mut self, launcher: &LauncherController) {
        let mut screen = self.screen.lock();
        if !launcher.is_visible() {
            if screen.launcher_open {
                screen.launcher_open = false;
                screen.needs_redraw = true;
            }
            return;
        }

        screen.launcher_open = true;
        if !screen.visible {
            return;
        }
        let prompt = if launcher.query().is_empty() {
            format!("Run: \x1b[2m{}\x1b[0m", LAUNCHER_PLACEHOLDER)
        } else {
            format!("Run: {}", launcher.query())
        };
        let mut lines = vec![prompt, String::new()];
        for (i, entry) in launcher.results().iter().enumerate() {
            let marker = if i == launcher.selected_index() { "> " } else { "  " };
            lines.push(format!("{}{}", marker, entry.name));
        }
        screen.draw_panel(&lines);
    }

    fn show_context_menu(&mut self, menu: &ContextMenu) -> Option<MenuChoice> {
        if !self.is_visible() {
            tracing::debug!("Context menu suppressed while hidden");
            return None;
        }
        let labels: Vec<String> = menu.items.iter().map(item_label).collect();
        let picked = self.pick("Menu", &labels).and_then(|index| match &menu.items[index] {
            MenuItem::Entry { choice, .. } => Some(choice.clone()),
            MenuItem::Submenu { label, items } => {
                let labels: Vec<String> = items.iter().map(item_label).collect();
                self.pick(label, &labels).and_then(|index| match &items[index] {
                    MenuItem::Entry { choice, .. } => Some(choice.clone()),
                    MenuItem::Submenu { .. } => None,
                })
            }
        });
        self.finish_modal();
        picked
    }

    fn show_message(&mut self, title: &str, body: &str) {
        if !self.is_visible() {
            tracing::debug!("Message {:?} suppressed while hidden", title);
            return;
        }
        self.message_box(title, body);
    }
}

impl TtyHost {
    fn message_box(&self, title: &str, body: &str) {
        let mut lines = vec![format!("\x1b[1m{}\x1b[0m", title), String::new()];
        lines.extend(body.lines().map(str::to_string));
        lines.push(String::new());
        lines.push("Press any key".to_string());
        self.screen.lock().draw_panel(&lines);

        loop {
            match self.next_event() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("Reading input failed: {}", e);
                    break;
                }
            }
        }
        self.finish_modal();
    }
}

fn item_label(item: &MenuItem) -> String {
    match item {
        MenuItem::Entry { label, .. } => label.clone(),
        MenuItem::Submenu { label, .. } => format!("{} >", label),
    }
}

/// Title line plus a window of numbered labels that keeps `selected` in view.
fn menu_lines(title: &str, labels: &[String], selected: usize, height: usize) -> Vec<String> {
    let room = height.saturating_sub(2).max(1);
    let first = selected.saturating_sub(room - 1);
    let mut lines = vec![format!("\x1b[1m{}\x1b[0m", title), String::new()];
    for (i, label) in labels.iter().enumerate().skip(first).take(room) {
        let number = if i < 9 {
            format!("{}", i + 1)
        } else {
            " ".to_string()
        };
        let marker = if i == selected { ">" } else { " " };
        lines.push(format!("{}{} {}", marker, number, label));
    }
    lines
}

/// Truncate or pad to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// The last `REPLAY_BYTES` of history, starting on a line boundary.
fn replay_tail(history: &[u8]) -> &[u8] {
    if history.len() <= REPLAY_BYTES {
        return history;
    }
    let tail = &history[history.len() - REPLAY_BYTES..];
    match tail.iter().position(|&b| b == b'\n') {
        Some(newline) => &tail[newline + 1..],
        None => tail,
    }
}
