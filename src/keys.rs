//! Key chord parsing
//!
//! Editor hosts report key presses and users write bindings as strings such as
//! `Ctrl-Enter`, `Ctrl-[` or `Shift+F5`. Both end up as a [`KeyChord`].

use crate::error::{ConsoleError, ConsoleResult};
use std::fmt;
use std::str::FromStr;

/// A named or printable key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    Space,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// A printable character, stored lower-cased
    Char(char),
}

/// A key with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyChord {
    /// A bare key with no modifiers
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn parse(s: &str) -> ConsoleResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConsoleError::KeyChord("empty chord".to_string()));
        }

        let (mods, key_name) = split_chord(s);
        let key = parse_key(key_name)
            .ok_or_else(|| ConsoleError::KeyChord(format!("unknown key '{}' in '{}'", key_name, s)))?;

        let mut chord = Self::plain(key);
        for m in mods {
            match m.to_uppercase().as_str() {
                "CTRL" | "CONTROL" | "MOD" | "C" => chord.ctrl = true,
                "ALT" | "OPTION" | "A" => chord.alt = true,
                "SHIFT" | "S" => chord.shift = true,
                "META" | "CMD" | "SUPER" | "M" => chord.meta = true,
                other => {
                    return Err(ConsoleError::KeyChord(format!(
                        "unknown modifier '{}' in '{}'",
                        other, s
                    )))
                }
            }
        }
        Ok(chord)
    }
}

impl FromStr for KeyChord {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl-")?;
        }
        if self.alt {
            write!(f, "Alt-")?;
        }
        if self.shift {
            write!(f, "Shift-")?;
        }
        if self.meta {
            write!(f, "Meta-")?;
        }
        match self.key {
            Key::F(n) => write!(f, "F{}", n),
            Key::Char(c) => write!(f, "{}", c),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Split `Ctrl-Shift-x` into (["Ctrl", "Shift"], "x"). A trailing separator is
/// itself the key, so `Ctrl--` binds the minus key.
fn split_chord(s: &str) -> (Vec<&str>, &str) {
    let is_sep = |c: char| c == '-' || c == '+';

    let key_start = if s.ends_with(is_sep) {
        s.len() - 1
    } else {
        s.rfind(is_sep).map(|i| i + 1).unwrap_or(0)
    };

    let (head, key) = s.split_at(key_start);
    let mods = head.split(is_sep).filter(|m| !m.is_empty()).collect();
    (mods, key)
}

/// Parse a key name string to a [`Key`]
pub fn parse_key(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(match c {
            ' ' => Key::Space,
            c => Key::Char(c.to_ascii_lowercase()),
        });
    }

    match name.to_uppercase().as_str() {
        "ENTER" | "RETURN" => Some(Key::Enter),
        "TAB" => Some(Key::Tab),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "SPACE" => Some(Key::Space),
        "BACKSPACE" => Some(Key::Backspace),
        "DELETE" | "DEL" => Some(Key::Delete),
        "UP" | "ARROWUP" => Some(Key::Up),
        "DOWN" | "ARROWDOWN" => Some(Key::Down),
        "LEFT" | "ARROWLEFT" => Some(Key::Left),
        "RIGHT" | "ARROWRIGHT" => Some(Key::Right),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" | "PGUP" => Some(Key::PageUp),
        "PAGEDOWN" | "PGDN" => Some(Key::PageDown),
        other => other
            .strip_prefix('F')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=24).contains(n))
            .map(Key::F),
    }
}
