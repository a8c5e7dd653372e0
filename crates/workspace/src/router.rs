//! Keystroke classification.

use actions::{Action, Key, Keystroke};

/// Who owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterMode {
    /// Unbound keys go to the active terminal session.
    #[default]
    Normal,
    /// The launcher is open and swallows every key.
    LauncherFocused,
}

/// Maps keystrokes to actions according to the current mode.
#[derive(Debug, Default)]
pub struct HotkeyRouter {
    mode: RouterMode,
}

impl HotkeyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RouterMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RouterMode) {
        if self.mode != mode {
            tracing::debug!("Router mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Whether a keystroke with no action is still consumed.
    pub fn swallows_unbound(&self) -> bool {
        self.mode == RouterMode::LauncherFocused
    }

    /// The action bound to `stroke` in the current mode, first match wins.
    pub fn classify(&self, stroke: &Keystroke) -> Option<Action> {
        let action = global_action(stroke).or_else(|| match self.mode {
            RouterMode::Normal => normal_action(stroke),
            RouterMode::LauncherFocused => launcher_action(stroke),
        });
        tracing::trace!("{} in {:?} -> {:?}", stroke, self.mode, action);
        action
    }
}

/// Bindings that apply in every mode.
fn global_action(stroke: &Keystroke) -> Option<Action> {
    let mods = stroke.modifiers;

    if mods.alt {
        if let Key::Char(c) = stroke.key {
            match c {
                '1'..='9' => return Some(Action::SwitchTab(c as usize - '1' as usize)),
                '0' => return Some(Action::SwitchTab(9)),
                'd' | 'D' => return Some(Action::ToggleLauncher),
                'h' | 'H' => return Some(Action::ToggleWindow),
                'l' | 'L' => return Some(Action::ClearActive),
                _ => {}
            }
        }
    }

    if mods.control {
        match stroke.key {
            Key::Char('+') | Key::Char('=') | Key::KeypadAdd => {
                return Some(Action::AdjustFontSize(1))
            }
            Key::Char('-') | Key::KeypadSubtract => return Some(Action::AdjustFontSize(-1)),
            _ => {}
        }
    }

    if stroke.key == Key::Super {
        return Some(Action::LaunchConfigTool);
    }

    None
}

fn normal_action(stroke: &Keystroke) -> Option<Action> {
    match stroke.key {
        Key::Char('p') | Key::Char('P') if !stroke.modifiers.has_command_modifier() => {
            Some(Action::OpenContextMenu)
        }
        _ => None,
    }
}

fn launcher_action(stroke: &Keystroke) -> Option<Action> {
    match stroke.key {
        Key::Escape => Some(Action::LauncherDismiss),
        Key::Backspace => Some(Action::LauncherBackspace),
        Key::Enter => Some(Action::LauncherConfirm),
        Key::Up => Some(Action::LauncherSelectPrev),
        Key::Down => Some(Action::LauncherSelectNext),
        Key::Char(c) if !stroke.modifiers.has_command_modifier() && !c.is_control() => {
            Some(Action::LauncherInput(c))
        }
        _ => None,
    }
}
