//! Raw key events as delivered by the host event loop.

use std::fmt;

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// Super / Windows / Meta.
    pub platform: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }

    pub fn control() -> Self {
        Self {
            control: true,
            ..Self::default()
        }
    }

    pub fn platform() -> Self {
        Self {
            platform: true,
            ..Self::default()
        }
    }

    /// True when Alt, Control or Super is held. Shift alone does not count.
    pub fn has_command_modifier(&self) -> bool {
        self.control || self.alt || self.platform
    }
}

/// The key itself, independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, as produced by the keyboard layout (so `P` with shift).
    Char(char),
    KeypadAdd,
    KeypadSubtract,
    /// The Super key pressed on its own (left or right).
    Super,
    Backspace,
    Enter,
    Escape,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// Anything the router never looks at (function keys, media keys, ...).
    Other,
}

/// A key press together with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Unmodified printable character.
    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::none())
    }

    /// Parse a chord such as `alt-3`, `ctrl-+`, `ctrl--`, `super` or `escape`.
    ///
    /// Modifier prefixes are `ctrl-`, `alt-`, `shift-` and `super-`; whatever is left is
    /// the key. Returns `None` for an empty key name.
    pub fn parse(chord: &str) -> Option<Self> {
        let mut modifiers = Modifiers::none();
        let mut rest = chord;
        loop {
            if rest.len() <= 1 {
                break;
            }
            if let Some(r) = rest.strip_prefix("ctrl-") {
                modifiers.control = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt-") {
                modifiers.alt = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("shift-") {
                modifiers.shift = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("super-") {
                modifiers.platform = true;
                rest = r;
            } else {
                break;
            }
        }

        let key = match rest {
            "" => return None,
            "super" => Key::Super,
            "kp-add" => Key::KeypadAdd,
            "kp-subtract" => Key::KeypadSubtract,
            "backspace" => Key::Backspace,
            "enter" => Key::Enter,
            "escape" => Key::Escape,
            "tab" => Key::Tab,
            "space" => Key::Char(' '),
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        };
        Some(Self::new(key, modifiers))
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            f.write_str("ctrl-")?;
        }
        if self.modifiers.alt {
            f.write_str("alt-")?;
        }
        if self.modifiers.shift {
            f.write_str("shift-")?;
        }
        if self.modifiers.platform {
            f.write_str("super-")?;
        }
        match self.key {
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::KeypadAdd => f.write_str("kp-add"),
            Key::KeypadSubtract => f.write_str("kp-subtract"),
            Key::Super => f.write_str("super"),
            Key::Backspace => f.write_str("backspace"),
            Key::Enter => f.write_str("enter"),
            Key::Escape => f.write_str("escape"),
            Key::Tab => f.write_str("tab"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Other => f.write_str("other"),
        }
    }
}
