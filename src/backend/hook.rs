//! Global input hook via rdev.
//!
//! `rdev::listen` blocks its thread for the life of the process, so the hook
//! gets a dedicated std thread and forwards translated events through the
//! provided callback. rdev's button events carry no coordinates; the hook
//! attaches the last observed pointer position to each click.

use crate::backend::RawInput;
use crate::log::{ButtonSym, KeySym};
use std::io;
use std::thread::JoinHandle;

/// Spawn the hook thread. `on_event` is invoked on that thread for every
/// translated notification and must not block.
pub fn spawn_input_hook<F>(mut on_event: F) -> io::Result<JoinHandle<()>>
where
    F: FnMut(RawInput) + Send + 'static,
{
    std::thread::Builder::new()
        .name("input-hook".to_string())
        .spawn(move || {
            let mut last_pos = (0i32, 0i32);
            let result = rdev::listen(move |event| {
                if let Some(raw) = translate(event.event_type, &mut last_pos) {
                    on_event(raw);
                }
            });
            if let Err(error) = result {
                tracing::error!(?error, "global input hook failed; hotkeys are dead");
            }
        })
}

fn translate(event: rdev::EventType, last_pos: &mut (i32, i32)) -> Option<RawInput> {
    match event {
        rdev::EventType::KeyPress(key) => Some(RawInput::KeyPress(keysym_from(key)?)),
        rdev::EventType::KeyRelease(key) => Some(RawInput::KeyRelease(keysym_from(key)?)),
        rdev::EventType::MouseMove { x, y } => {
            *last_pos = (x as i32, y as i32);
            Some(RawInput::MouseMove {
                x: last_pos.0,
                y: last_pos.1,
            })
        }
        rdev::EventType::ButtonPress(button) => Some(RawInput::Click {
            x: last_pos.0,
            y: last_pos.1,
            button: button_from(button),
            pressed: true,
        }),
        rdev::EventType::ButtonRelease(button) => Some(RawInput::Click {
            x: last_pos.0,
            y: last_pos.1,
            button: button_from(button),
            pressed: false,
        }),
        rdev::EventType::Wheel { .. } => None,
    }
}

fn button_from(button: rdev::Button) -> ButtonSym {
    match button {
        rdev::Button::Left => ButtonSym::Left,
        rdev::Button::Right => ButtonSym::Right,
        rdev::Button::Middle => ButtonSym::Middle,
        rdev::Button::Unknown(code) => ButtonSym::Other(format!("Button.unknown({code})")),
    }
}

/// Map an rdev key code to a log symbol. Keys without a mapping are dropped
/// before they reach the recorder.
fn keysym_from(key: rdev::Key) -> Option<KeySym> {
    use rdev::Key;
    Some(match key {
        Key::ShiftLeft => KeySym::Shift,
        Key::ShiftRight => KeySym::ShiftR,
        Key::ControlLeft => KeySym::CtrlL,
        Key::ControlRight => KeySym::CtrlR,
        Key::Alt => KeySym::Alt,
        Key::AltGr => KeySym::AltGr,
        Key::MetaLeft => KeySym::Cmd,
        Key::MetaRight => KeySym::CmdR,
        Key::Space => KeySym::Space,
        Key::Return => KeySym::Enter,
        Key::Backspace => KeySym::Backspace,
        Key::Escape => KeySym::Esc,
        Key::Tab => KeySym::Tab,
        Key::Delete => KeySym::Delete,
        Key::CapsLock => KeySym::CapsLock,
        Key::UpArrow => KeySym::Up,
        Key::DownArrow => KeySym::Down,
        Key::LeftArrow => KeySym::Left,
        Key::RightArrow => KeySym::Right,
        Key::Home => KeySym::Home,
        Key::End => KeySym::End,
        Key::PageUp => KeySym::PageUp,
        Key::PageDown => KeySym::PageDown,
        Key::F1 => KeySym::F(1),
        Key::F2 => KeySym::F(2),
        Key::F3 => KeySym::F(3),
        Key::F4 => KeySym::F(4),
        Key::F5 => KeySym::F(5),
        Key::F6 => KeySym::F(6),
        Key::F7 => KeySym::F(7),
        Key::F8 => KeySym::F(8),
        Key::F9 => KeySym::F(9),
        Key::F10 => KeySym::F(10),
        Key::F11 => KeySym::F(11),
        Key::F12 => KeySym::F(12),
        Key::KeyA => KeySym::Char('a'),
        Key::KeyB => KeySym::Char('b'),
        Key::KeyC => KeySym::Char('c'),
        Key::KeyD => KeySym::Char('d'),
        Key::KeyE => KeySym::Char('e'),
        Key::KeyF => KeySym::Char('f'),
        Key::KeyG => KeySym::Char('g'),
        Key::KeyH => KeySym::Char('h'),
        Key::KeyI => KeySym::Char('i'),
        Key::KeyJ => KeySym::Char('j'),
        Key::KeyK => KeySym::Char('k'),
        Key::KeyL => KeySym::Char('l'),
        Key::KeyM => KeySym::Char('m'),
        Key::KeyN => KeySym::Char('n'),
        Key::KeyO => KeySym::Char('o'),
        Key::KeyP => KeySym::Char('p'),
        Key::KeyQ => KeySym::Char('q'),
        Key::KeyR => KeySym::Char('r'),
        Key::KeyS => KeySym::Char('s'),
        Key::KeyT => KeySym::Char('t'),
        Key::KeyU => KeySym::Char('u'),
        Key::KeyV => KeySym::Char('v'),
        Key::KeyW => KeySym::Char('w'),
        Key::KeyX => KeySym::Char('x'),
        Key::KeyY => KeySym::Char('y'),
        Key::KeyZ => KeySym::Char('z'),
        Key::Num0 => KeySym::Char('0'),
        Key::Num1 => KeySym::Char('1'),
        Key::Num2 => KeySym::Char('2'),
        Key::Num3 => KeySym::Char('3'),
        Key::Num4 => KeySym::Char('4'),
        Key::Num5 => KeySym::Char('5'),
        Key::Num6 => KeySym::Char('6'),
        Key::Num7 => KeySym::Char('7'),
        Key::Num8 => KeySym::Char('8'),
        Key::Num9 => KeySym::Char('9'),
        Key::BackQuote => KeySym::Char('`'),
        Key::Minus => KeySym::Char('-'),
        Key::Equal => KeySym::Char('='),
        Key::LeftBracket => KeySym::Char('['),
        Key::RightBracket => KeySym::Char(']'),
        Key::BackSlash => KeySym::Char('\\'),
        Key::SemiColon => KeySym::Char(';'),
        Key::Quote => KeySym::Char('\''),
        Key::Comma => KeySym::Char(','),
        Key::Dot => KeySym::Char('.'),
        Key::Slash => KeySym::Char('/'),
        _ => return None,
    })
}
