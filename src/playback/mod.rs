//! Replay side of the state machine.
//!
//! A playback job walks a loaded [`EventLog`](crate::log::EventLog) on one
//! background task, re-timing every event against a speed-scaled clock and
//! dispatching synthesis calls. Cancellation is cooperative: an atomic flag
//! plus an interruptible sleep, polled before every wait and every dispatch.

pub mod cancel;
pub mod engine;

pub use cancel::CancelSignal;
pub use engine::{PlaybackEngine, PlaybackParams};

use std::str::FromStr;
use std::time::Duration;

/// Delay before the first iteration, giving the user time to release the
/// triggering chord.
pub const PLAYBACK_WARMUP: Duration = Duration::from_secs(5);

/// How many times to replay a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCount {
    Times(u32),
    Infinite,
}

impl LoopCount {
    pub fn reached(self, completed: u64) -> bool {
        match self {
            LoopCount::Times(n) => completed >= u64::from(n),
            LoopCount::Infinite => false,
        }
    }

    /// `Times(0)` means "skip playback entirely".
    pub fn is_zero(self) -> bool {
        self == LoopCount::Times(0)
    }
}

impl FromStr for LoopCount {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "infinite" {
            return Ok(LoopCount::Infinite);
        }
        s.parse::<u32>().map(LoopCount::Times).map_err(|_| ())
    }
}
