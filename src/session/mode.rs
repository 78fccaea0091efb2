//! Process-wide session mode.
//!
//! Exactly one of idle / recording / playing at a time. The cell is shared
//! between the controller, the recorder, and the playback worker, so all
//! transitions go through an atomic compare-and-swap.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionMode {
    Idle = 0,
    Recording = 1,
    Playing = 2,
}

impl SessionMode {
    fn from_u8(value: u8) -> SessionMode {
        match value {
            1 => SessionMode::Recording,
            2 => SessionMode::Playing,
            _ => SessionMode::Idle,
        }
    }
}

/// Shared holder for the current [`SessionMode`].
#[derive(Debug, Default)]
pub struct ModeCell(AtomicU8);

impl ModeCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(SessionMode::Idle as u8))
    }

    pub fn get(&self) -> SessionMode {
        SessionMode::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Atomically move from `from` to `to`; on failure returns the mode that
    /// was actually current.
    pub fn transition(&self, from: SessionMode, to: SessionMode) -> Result<(), SessionMode> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(SessionMode::from_u8)
    }
}
