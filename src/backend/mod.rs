//! Host integration: the global input hook and the input synthesizer.
//!
//! The core state machine only ever sees [`RawInput`] notifications coming in
//! and [`InputSynthesizer`] calls going out; everything OS-specific lives
//! behind these seams (rdev for hooking, enigo for synthesis).

pub mod hook;
pub mod synth;

use crate::log::{ButtonSym, KeySym};
use thiserror::Error;

pub use hook::spawn_input_hook;
pub use synth::EnigoSynthesizer;

/// A raw input notification from the OS hook, already translated to the
/// crate's own symbol types.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    KeyPress(KeySym),
    KeyRelease(KeySym),
    MouseMove { x: i32, y: i32 },
    Click { x: i32, y: i32, button: ButtonSym, pressed: bool },
}

/// Errors from the synthesis collaborator. These are always per-event:
/// playback logs them and moves on.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("unsupported key symbol {0}")]
    UnsupportedKey(String),

    #[error("unsupported button {0}")]
    UnsupportedButton(String),

    #[error("synthesis failed: {0}")]
    Backend(String),
}

/// Synthesizes input events on the host.
///
/// Mouse motion is relative only; the playback engine converts recorded
/// absolute positions into deltas before calling [`move_by`].
///
/// [`move_by`]: InputSynthesizer::move_by
pub trait InputSynthesizer: Send {
    fn key_press(&mut self, key: &KeySym) -> Result<(), SynthError>;

    fn key_release(&mut self, key: &KeySym) -> Result<(), SynthError>;

    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), SynthError>;

    fn button(&mut self, button: &ButtonSym, pressed: bool) -> Result<(), SynthError>;
}
