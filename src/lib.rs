//! inputtape - record and replay keyboard/mouse input.
//!
//! Captures timestamped input events while a global hotkey toggles recording,
//! persists each session as a JSON log, and replays logs with adjustable
//! speed and repeat count by synthesizing equivalent events on the host.

pub mod backend;
pub mod cli;
pub mod error;
pub mod hotkey;
pub mod log;
pub mod playback;
pub mod recorder;
pub mod session;

pub use error::{ReplayError, ReplayResult};
pub use log::{DeviceClass, EventLog, InputEvent, LogStore};
pub use playback::{LoopCount, PlaybackEngine, PlaybackParams};
pub use recorder::Recorder;
pub use session::{Command, SessionController, SessionMode, Trigger};
