//! Cooperative cancellation for playback jobs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Shared cancellation flag with an interruptible wait.
///
/// `raise` is idempotent. The notify side stores a permit, so a raise that
/// lands before the worker reaches its next sleep still wakes it immediately.
#[derive(Debug, Default)]
pub struct CancelSignal {
    raised: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless cancelled; returns whether the signal is
    /// raised once the wait ends.
    pub async fn interruptible_sleep(&self, duration: Duration) -> bool {
        if self.is_raised() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.notify.notified() => {}
        }
        self.is_raised()
    }
}
