//! Controlling-terminal setup and guaranteed restoration.
//!
//! Every mode switched on is recorded in one process-wide mask, so the drop path and
//! the panic hook undo exactly what was entered, in reverse order.

use crossterm::{
    cursor::Show,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::{
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicU8, Ordering},
        OnceLock,
    },
};

/// Lone modifier presses (Super) plus the shifted character for Shift chords.
const KEY_FLAGS: KeyboardEnhancementFlags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
    .union(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES)
    .union(KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS);

/// Scroll region and origin mode set by the host.
const RESET_SCROLL_REGION: &[u8] = b"\x1b[r\x1b[?6l";

static ACTIVE: AtomicU8 = AtomicU8::new(0);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    RawMode,
    AltScreen,
    Mouse,
    KeyFlags,
}

impl Stage {
    /// Setup order.
    const ALL: [Stage; 4] = [
        Stage::RawMode,
        Stage::AltScreen,
        Stage::Mouse,
        Stage::KeyFlags,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    fn mark(self) {
        ACTIVE.fetch_or(self.bit(), Ordering::SeqCst);
    }

    fn undo(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Stage::RawMode => disable_raw_mode(),
            Stage::AltScreen => {
                out.write_all(RESET_SCROLL_REGION)?;
                queue!(out, LeaveAlternateScreen)
            }
            Stage::Mouse => queue!(out, DisableMouseCapture),
            Stage::KeyFlags => queue!(out, PopKeyboardEnhancementFlags),
        }
    }
}

/// Holds the terminal in the host's modes; restores it on drop and on panic.
pub struct TerminalGuard {
    key_reporting: bool,
}

impl TerminalGuard {
    /// Enter raw mode, the alternate screen and mouse capture, and enable extended key
    /// reporting where the terminal supports it.
    ///
    /// On error, whatever was already entered is restored before returning.
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        install_panic_hook();
        Self::enter_stages(out).map_err(|e| {
            restore_terminal();
            e
        })
    }

    fn enter_stages(out: &mut impl Write) -> io::Result<Self> {
        enable_raw_mode()?;
        Stage::RawMode.mark();
        execute!(out, EnterAlternateScreen)?;
        Stage::AltScreen.mark();
        execute!(out, EnableMouseCapture)?;
        Stage::Mouse.mark();

        let key_reporting = match supports_keyboard_enhancement() {
            Ok(true) => {
                execute!(out, PushKeyboardEnhancementFlags(KEY_FLAGS))?;
                Stage::KeyFlags.mark();
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::debug!("Keyboard enhancement query failed: {}", e);
                false
            }
        };
        Ok(Self { key_reporting })
    }

    /// Whether lone Super presses can be seen.
    pub fn key_reporting(&self) -> bool {
        self.key_reporting
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

pub fn restore_terminal() {
    let active = ACTIVE.swap(0, Ordering::SeqCst);
    let mut stdout = io::stdout();
    if let Err(e) = teardown(active, &mut stdout) {
        tracing::debug!("Terminal restore failed: {}", e);
    }
}

/// Undo the stages in `active`, newest first, then show the cursor.
fn teardown(active: u8, out: &mut impl Write) -> io::Result<()> {
    for stage in Stage::ALL.iter().rev() {
        if active & stage.bit() == 0 {
            continue;
        }
        if let Err(e) = stage.undo(out) {
            tracing::debug!("Undoing {:?} failed: {}", stage, e);
        }
    }
    queue!(out, Show)?;
    out.flush()
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            tracing::error!("panic at {}: {}", location, info);
            previous(info);
        }));
    });
}
