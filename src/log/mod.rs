//! Event logs: the timestamped recordings that get persisted and replayed.
//!
//! A recording session produces an [`EventLog`], an append-only sequence of
//! [`InputEvent`]s whose offsets are measured from the recording start. Logs
//! are written to and loaded from a per-device log directory by [`LogStore`].

pub mod event;
pub mod keysym;
pub mod storage;

pub use event::{EventLog, InputEvent};
pub use keysym::{ButtonSym, KeySym};
pub use storage::{LogFileInfo, LogStore};

/// Which class of input a session records.
///
/// The two classes keep separate log directories and filename prefixes so a
/// keyboard log is never offered for mouse playback and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
}

impl DeviceClass {
    /// Filename prefix used for saved sessions and directory listing.
    pub fn log_prefix(self) -> &'static str {
        match self {
            DeviceClass::Keyboard => "keyboardlog",
            DeviceClass::Mouse => "mouselog",
        }
    }

    /// Default log directory for this device class.
    pub fn default_log_dir(self) -> &'static str {
        match self {
            DeviceClass::Keyboard => "Keyboard Logs",
            DeviceClass::Mouse => "Mouse Logs",
        }
    }

    pub fn records_keys(self) -> bool {
        matches!(self, DeviceClass::Keyboard)
    }

    pub fn records_pointer(self) -> bool {
        matches!(self, DeviceClass::Mouse)
    }
}
