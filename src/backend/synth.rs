//! Input synthesis via enigo.

use crate::backend::{InputSynthesizer, SynthError};
use crate::error::{ReplayError, ReplayResult};
use crate::log::{ButtonSym, KeySym};
use enigo::{Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};

pub struct EnigoSynthesizer {
    enigo: Enigo,
}

impl EnigoSynthesizer {
    pub fn new() -> ReplayResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| ReplayError::Synthesis(e.to_string()))?;
        Ok(Self { enigo })
    }

    fn key(&mut self, key: &KeySym, direction: Direction) -> Result<(), SynthError> {
        let key = to_enigo_key(key).ok_or_else(|| SynthError::UnsupportedKey(key.to_string()))?;
        self.enigo
            .key(key, direction)
            .map_err(|e| SynthError::Backend(e.to_string()))
    }
}

impl InputSynthesizer for EnigoSynthesizer {
    fn key_press(&mut self, key: &KeySym) -> Result<(), SynthError> {
        self.key(key, Direction::Press)
    }

    fn key_release(&mut self, key: &KeySym) -> Result<(), SynthError> {
        self.key(key, Direction::Release)
    }

    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), SynthError> {
        self.enigo
            .move_mouse(dx, dy, Coordinate::Rel)
            .map_err(|e| SynthError::Backend(e.to_string()))
    }

    fn button(&mut self, button: &ButtonSym, pressed: bool) -> Result<(), SynthError> {
        let button = match button {
            ButtonSym::Left => enigo::Button::Left,
            ButtonSym::Right => enigo::Button::Right,
            ButtonSym::Middle => enigo::Button::Middle,
            ButtonSym::Other(name) => {
                return Err(SynthError::UnsupportedButton(name.clone()));
            }
        };
        let direction = if pressed {
            Direction::Press
        } else {
            Direction::Release
        };
        self.enigo
            .button(button, direction)
            .map_err(|e| SynthError::Backend(e.to_string()))
    }
}

/// Map a log symbol onto a key enigo can synthesize. `None` means the host
/// has no equivalent and the event gets skipped.
fn to_enigo_key(key: &KeySym) -> Option<enigo::Key> {
    use enigo::Key;
    Some(match key {
        KeySym::Shift | KeySym::ShiftR => Key::Shift,
        KeySym::CtrlL | KeySym::CtrlR => Key::Control,
        KeySym::Alt | KeySym::AltR | KeySym::AltGr => Key::Alt,
        KeySym::Cmd | KeySym::CmdR => Key::Meta,
        KeySym::Space => Key::Space,
        KeySym::Enter => Key::Return,
        KeySym::Backspace => Key::Backspace,
        KeySym::Esc => Key::Escape,
        KeySym::Tab => Key::Tab,
        KeySym::Delete => Key::Delete,
        KeySym::CapsLock => Key::CapsLock,
        KeySym::Up => Key::UpArrow,
        KeySym::Down => Key::DownArrow,
        KeySym::Left => Key::LeftArrow,
        KeySym::Right => Key::RightArrow,
        KeySym::Home => Key::Home,
        KeySym::End => Key::End,
        KeySym::PageUp => Key::PageUp,
        KeySym::PageDown => Key::PageDown,
        KeySym::F(n) => match n {
            1 => Key::F1,
            2 => Key::F2,
            3 => Key::F3,
            4 => Key::F4,
            5 => Key::F5,
            6 => Key::F6,
            7 => Key::F7,
            8 => Key::F8,
            9 => Key::F9,
            10 => Key::F10,
            11 => Key::F11,
            12 => Key::F12,
            _ => return None,
        },
        KeySym::Char(c) => Key::Unicode(*c),
        KeySym::Other(_) => return None,
    })
}
