//! Session control: the single authority over process-wide mode.

pub mod controller;
pub mod mode;

pub use controller::{
    Command, Flow, PlaybackPrompter, PlaybackRequest, SessionController, Trigger,
};
pub use mode::{ModeCell, SessionMode};
