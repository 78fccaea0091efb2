//! Timestamped input events and the append-only log that holds them.

use crate::log::keysym::{ButtonSym, KeySym};
use serde::{Deserialize, Serialize};

/// One captured input event.
///
/// The serialized field layout is the log format on disk: key events carry a
/// `time` field in float seconds, pointer events a shorter `t`, both measured
/// from the start of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    Press { key: KeySym, time: f64 },
    Release { key: KeySym, time: f64 },
    Move { x: i32, y: i32, t: f64 },
    Click { x: i32, y: i32, b: ButtonSym, p: bool, t: f64 },
}

impl InputEvent {
    /// Seconds since recording start at which this event occurred.
    pub fn offset_secs(&self) -> f64 {
        match self {
            InputEvent::Press { time, .. } | InputEvent::Release { time, .. } => *time,
            InputEvent::Move { t, .. } | InputEvent::Click { t, .. } => *t,
        }
    }
}

/// An ordered recording of input events.
///
/// Offsets are non-decreasing in insertion order; the recorder appends events
/// as raw notifications arrive and never reorders them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<InputEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        debug_assert!(
            self.events
                .last()
                .map_or(true, |last| last.offset_secs() <= event.offset_secs()),
            "event offsets must be non-decreasing"
        );
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputEvent> {
        self.events.iter()
    }

    pub(crate) fn last(&self) -> Option<&InputEvent> {
        self.events.last()
    }

    // Used only by hotkey suppression to drop the trailing presses of a
    // combo that just completed; never exposed outside the crate.
    pub(crate) fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop()
    }
}

impl From<Vec<InputEvent>> for EventLog {
    fn from(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a InputEvent;
    type IntoIter = std::slice::Iter<'a, InputEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
