//! Key and button symbols with their on-disk string forms.
//!
//! Named keys serialize as `"Key.<name>"` and printable characters as a
//! single-quoted character (`"'a'"`), matching the log format both device
//! variants persist. Strings that decode to nothing we know stay wrapped in
//! [`KeySym::Other`] so a log recorded on another host still loads; unknown
//! symbols are skipped at synthesis time instead of failing the whole replay.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key identity as captured from the hook or read back from a log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeySym {
    Shift,
    ShiftR,
    CtrlL,
    CtrlR,
    Alt,
    AltR,
    AltGr,
    Cmd,
    CmdR,
    Space,
    Enter,
    Backspace,
    Esc,
    Tab,
    Delete,
    CapsLock,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key F1..=F12
    F(u8),
    /// A printable character key
    Char(char),
    /// A symbol we do not recognize, preserved verbatim for round-tripping
    Other(String),
}

impl KeySym {
    /// Decode the on-disk string form.
    pub fn decode(s: &str) -> KeySym {
        if let Some(name) = s.strip_prefix("Key.") {
            return match name {
                "shift" => KeySym::Shift,
                "shift_r" => KeySym::ShiftR,
                "ctrl_l" => KeySym::CtrlL,
                "ctrl_r" => KeySym::CtrlR,
                "alt" => KeySym::Alt,
                "alt_r" => KeySym::AltR,
                "alt_gr" => KeySym::AltGr,
                "cmd" => KeySym::Cmd,
                "cmd_r" => KeySym::CmdR,
                "space" => KeySym::Space,
                "enter" => KeySym::Enter,
                "backspace" => KeySym::Backspace,
                "esc" => KeySym::Esc,
                "tab" => KeySym::Tab,
                "delete" => KeySym::Delete,
                "caps_lock" => KeySym::CapsLock,
                "up" => KeySym::Up,
                "down" => KeySym::Down,
                "left" => KeySym::Left,
                "right" => KeySym::Right,
                "home" => KeySym::Home,
                "end" => KeySym::End,
                "page_up" => KeySym::PageUp,
                "page_down" => KeySym::PageDown,
                _ => match name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    Some(n) if (1..=12).contains(&n) => KeySym::F(n),
                    _ => KeySym::Other(s.to_string()),
                },
            };
        }

        // Printable characters are stored single-quoted, e.g. "'a'". Strip
        // exactly one quote from each end; the character itself may be a
        // quote ("'''").
        if let Some(inner) = s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
            let mut chars = inner.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return KeySym::Char(c);
            }
        }
        KeySym::Other(s.to_string())
    }
}

impl fmt::Display for KeySym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySym::Shift => write!(f, "Key.shift"),
            KeySym::ShiftR => write!(f, "Key.shift_r"),
            KeySym::CtrlL => write!(f, "Key.ctrl_l"),
            KeySym::CtrlR => write!(f, "Key.ctrl_r"),
            KeySym::Alt => write!(f, "Key.alt"),
            KeySym::AltR => write!(f, "Key.alt_r"),
            KeySym::AltGr => write!(f, "Key.alt_gr"),
            KeySym::Cmd => write!(f, "Key.cmd"),
            KeySym::CmdR => write!(f, "Key.cmd_r"),
            KeySym::Space => write!(f, "Key.space"),
            KeySym::Enter => write!(f, "Key.enter"),
            KeySym::Backspace => write!(f, "Key.backspace"),
            KeySym::Esc => write!(f, "Key.esc"),
            KeySym::Tab => write!(f, "Key.tab"),
            KeySym::Delete => write!(f, "Key.delete"),
            KeySym::CapsLock => write!(f, "Key.caps_lock"),
            KeySym::Up => write!(f, "Key.up"),
            KeySym::Down => write!(f, "Key.down"),
            KeySym::Left => write!(f, "Key.left"),
            KeySym::Right => write!(f, "Key.right"),
            KeySym::Home => write!(f, "Key.home"),
            KeySym::End => write!(f, "Key.end"),
            KeySym::PageUp => write!(f, "Key.page_up"),
            KeySym::PageDown => write!(f, "Key.page_down"),
            KeySym::F(n) => write!(f, "Key.f{n}"),
            KeySym::Char(c) => write!(f, "'{c}'"),
            KeySym::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for KeySym {
    fn from(s: String) -> Self {
        KeySym::decode(&s)
    }
}

impl From<KeySym> for String {
    fn from(k: KeySym) -> Self {
        k.to_string()
    }
}

/// A mouse button identity; serializes as `"Button.left"` etc.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ButtonSym {
    Left,
    Right,
    Middle,
    Other(String),
}

impl ButtonSym {
    pub fn decode(s: &str) -> ButtonSym {
        match s {
            "Button.left" => ButtonSym::Left,
            "Button.right" => ButtonSym::Right,
            "Button.middle" => ButtonSym::Middle,
            _ => ButtonSym::Other(s.to_string()),
        }
    }
}

impl fmt::Display for ButtonSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonSym::Left => write!(f, "Button.left"),
            ButtonSym::Right => write!(f, "Button.right"),
            ButtonSym::Middle => write!(f, "Button.middle"),
            ButtonSym::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for ButtonSym {
    fn from(s: String) -> Self {
        ButtonSym::decode(&s)
    }
}

impl From<ButtonSym> for String {
    fn from(b: ButtonSym) -> Self {
        b.to_string()
    }
}
