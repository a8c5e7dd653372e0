//! Translation between crossterm key events, router keystrokes and PTY input bytes.

use actions::{Key, Keystroke, Modifiers};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, ModifierKeyCode,
};

/// The router's view of a key event. Releases and lone modifiers other than Super
/// yield `None`.
pub fn to_keystroke(event: &KeyEvent) -> Option<Keystroke> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let keypad = event.state.contains(KeyEventState::KEYPAD);
    let key = match event.code {
        KeyCode::Char('+') if keypad => Key::KeypadAdd,
        KeyCode::Char('-') if keypad => Key::KeypadSubtract,
        KeyCode::Char(c) => Key::Char(shifted(c, event.modifiers)),
        KeyCode::Modifier(ModifierKeyCode::LeftSuper | ModifierKeyCode::RightSuper) => {
            Key::Super
        }
        KeyCode::Modifier(_) => return None,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => Key::Other,
    };

    Some(Keystroke::new(key, modifiers(event.modifiers)))
}

fn modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        control: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        platform: mods.contains(KeyModifiers::SUPER),
    }
}

/// Bytes a terminal would send for `event`. Empty for keys with no encoding.
pub fn encode(event: &KeyEvent) -> Vec<u8> {
    if event.kind == KeyEventKind::Release {
        return Vec::new();
    }

    let mods = event.modifiers;
    let mut bytes = match event.code {
        KeyCode::Char(c) if mods.contains(KeyModifiers::CONTROL) => match control_byte(c) {
            Some(b) => vec![b],
            None => char_bytes(c),
        },
        KeyCode::Char(c) => char_bytes(shifted(c, mods)),
        KeyCode::Enter => b"\r".to_vec(),
        KeyCode::Tab => b"\t".to_vec(),
        KeyCode::BackTab => b"\x1b[Z".to_vec(),
        KeyCode::Backspace => vec![0x7f],
        KeyCode::Esc => vec![0x1b],
        KeyCode::Up => b"\x1b[A".to_vec(),
        KeyCode::Down => b"\x1b[B".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        KeyCode::Insert => b"\x1b[2~".to_vec(),
        KeyCode::Delete => b"\x1b[3~".to_vec(),
        KeyCode::PageUp => b"\x1b[5~".to_vec(),
        KeyCode::PageDown => b"\x1b[6~".to_vec(),
        KeyCode::F(n) => function_key(n),
        _ => Vec::new(),
    };

    if mods.contains(KeyModifiers::ALT) && !bytes.is_empty() {
        bytes.insert(0, 0x1b);
    }
    bytes
}

/// Terminals that report every key as an escape code may send Shift+letter as the
/// unshifted letter with `SHIFT` set.
fn shifted(c: char, mods: KeyModifiers) -> char {
    if mods.contains(KeyModifiers::SHIFT) && c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

fn char_bytes(c: char) -> Vec<u8> {
    let mut buf = [0u8; 4];
    c.encode_utf8(&mut buf).as_bytes().to_vec()
}

fn control_byte(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        '@' | ' ' | '2' => Some(0),
        '[' | '3' => Some(0x1b),
        '\\' | '4' => Some(0x1c),
        ']' | '5' => Some(0x1d),
        '^' | '6' => Some(0x1e),
        '_' | '7' | '/' => Some(0x1f),
        '?' | '8' => Some(0x7f),
        _ => None,
    }
}

fn function_key(n: u8) -> Vec<u8> {
    let code: &[u8] = match n {
        1 => b"\x1bOP",
        2 => b"\x1bOQ",
        3 => b"\x1bOR",
        4 => b"\x1bOS",
        5 => b"\x1b[15~",
        6 => b"\x1b[17~",
        7 => b"\x1b[18~",
        8 => b"\x1b[19~",
        9 => b"\x1b[20~",
        10 => b"\x1b[21~",
        11 => b"\x1b[23~",
        12 => b"\x1b[24~",
        _ => b"",
    };
    code.to_vec()
}
