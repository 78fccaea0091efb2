//! Playback engine: owns the playing state and the background replay worker.

use crate::backend::{InputSynthesizer, SynthError};
use crate::error::{ReplayError, ReplayResult};
use crate::log::{EventLog, InputEvent};
use crate::playback::cancel::CancelSignal;
use crate::playback::{LoopCount, PLAYBACK_WARMUP};
use crate::session::{ModeCell, SessionMode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
pub struct PlaybackParams {
    /// Positive speed multiplier; 2.0 replays twice as fast.
    pub speed: f64,
    pub loops: LoopCount,
}

/// One active replay job. Destroyed when the worker exits.
struct PlaybackJob {
    cancel: Arc<CancelSignal>,
    handle: JoinHandle<()>,
}

pub struct PlaybackEngine {
    mode: Arc<ModeCell>,
    warmup: Duration,
    job: Option<PlaybackJob>,
}

impl PlaybackEngine {
    pub fn new(mode: Arc<ModeCell>) -> Self {
        Self::with_warmup(mode, PLAYBACK_WARMUP)
    }

    /// Engine with a custom warm-up delay (the default gives the user five
    /// seconds to release the triggering chord).
    pub fn with_warmup(mode: Arc<ModeCell>, warmup: Duration) -> Self {
        Self {
            mode,
            warmup,
            job: None,
        }
    }

    /// Start replaying `log` on a background task and return immediately.
    ///
    /// A zero loop count skips playback without touching the session mode or
    /// spawning anything. At most one job runs at a time; a second `play` is
    /// rejected, never queued.
    pub fn play(
        &mut self,
        log: EventLog,
        params: PlaybackParams,
        synth: Box<dyn InputSynthesizer>,
    ) -> ReplayResult<()> {
        if !params.speed.is_finite() || params.speed <= 0.0 {
            return Err(ReplayError::InvalidSpeed(params.speed));
        }
        if params.loops.is_zero() {
            tracing::info!("loop count is zero, skipping playback");
            return Ok(());
        }

        self.mode
            .transition(SessionMode::Idle, SessionMode::Playing)
            .map_err(|current| match current {
                SessionMode::Playing => ReplayError::PlaybackRunning,
                _ => ReplayError::RecordingActive,
            })?;

        let cancel = Arc::new(CancelSignal::new());
        let worker = Worker {
            log,
            speed: params.speed,
            loops: params.loops,
            warmup: self.warmup,
            cancel: cancel.clone(),
            mode: self.mode.clone(),
        };
        let handle = tokio::spawn(worker.run(synth));

        self.job = Some(PlaybackJob { cancel, handle });
        Ok(())
    }

    /// Raise the cancellation flag for the current job, if any. Idempotent;
    /// harmless when nothing is playing.
    pub fn cancel(&self) {
        if let Some(job) = &self.job {
            job.cancel.raise();
        }
    }

    /// Wait for the current job's worker to exit. Used on shutdown and in
    /// tests; playback completion itself never needs to be awaited.
    pub async fn wait_until_idle(&mut self) {
        if let Some(job) = self.job.take() {
            let _ = job.handle.await;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.mode.get() == SessionMode::Playing
    }
}

struct Worker {
    log: EventLog,
    speed: f64,
    loops: LoopCount,
    warmup: Duration,
    cancel: Arc<CancelSignal>,
    mode: Arc<ModeCell>,
}

impl Worker {
    async fn run(self, mut synth: Box<dyn InputSynthesizer>) {
        tracing::info!(
            events = self.log.len(),
            speed = self.speed,
            loops = ?self.loops,
            "playback worker starting"
        );

        let cancelled = self.replay(synth.as_mut()).await;

        if self.mode.transition(SessionMode::Playing, SessionMode::Idle).is_err() {
            tracing::warn!("session mode changed underneath the playback worker");
        }
        tracing::info!(cancelled, "playback worker finished");
    }

    /// Returns true if the job was cancelled rather than running to
    /// completion.
    async fn replay(&self, synth: &mut dyn InputSynthesizer) -> bool {
        if self.cancel.interruptible_sleep(self.warmup).await {
            return true;
        }

        let mut completed: u64 = 0;
        while !self.loops.reached(completed) {
            let loop_start = Instant::now();
            // Reference point for relative motion, re-established every
            // iteration by the first move event.
            let mut anchor: Option<(i32, i32)> = None;

            for event in &self.log {
                // Offsets are relative to the current iteration start, so
                // timing drift never accumulates across loops.
                let target = scaled_offset(event.offset_secs(), self.speed);
                let elapsed = loop_start.elapsed();
                if target > elapsed {
                    if self.cancel.interruptible_sleep(target - elapsed).await {
                        return true;
                    }
                } else if self.cancel.is_raised() {
                    return true;
                }

                dispatch(synth, event, &mut anchor);
            }

            completed += 1;
            tracing::info!(loop_ = completed, "playback loop finished");
            if self.cancel.is_raised() {
                return true;
            }
        }
        false
    }
}

/// Event offset divided by the speed multiplier, clamped to zero for
/// anything a corrupt log might throw at us.
fn scaled_offset(offset_secs: f64, speed: f64) -> Duration {
    Duration::try_from_secs_f64(offset_secs / speed).unwrap_or(Duration::ZERO)
}

fn dispatch(
    synth: &mut dyn InputSynthesizer,
    event: &InputEvent,
    anchor: &mut Option<(i32, i32)>,
) {
    let result = match event {
        InputEvent::Press { key, .. } => synth.key_press(key),
        InputEvent::Release { key, .. } => synth.key_release(key),
        InputEvent::Move { x, y, .. } => match anchor.replace((*x, *y)) {
            // The first move only establishes the reference point
            None => return,
            Some((px, py)) => synth.move_by(x - px, y - py),
        },
        InputEvent::Click { b, p, .. } => synth.button(b, *p),
    };

    if let Err(error) = result {
        match error {
            SynthError::UnsupportedKey(_) | SynthError::UnsupportedButton(_) => {
                tracing::debug!(%error, "skipping event the host cannot synthesize")
            }
            SynthError::Backend(_) => tracing::warn!(%error, "synthesis call failed, continuing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{ButtonSym, KeySym};
    use parking_lot::Mutex;

    /// What a mock synthesizer saw, with when it saw it.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Press(KeySym),
        Release(KeySym),
        MoveBy(i32, i32),
        Button(ButtonSym, bool),
    }

    #[derive(Default)]
    struct MockSynth {
        calls: Arc<Mutex<Vec<(Instant, Call)>>>,
    }

    impl MockSynth {
        fn new() -> (Self, Arc<Mutex<Vec<(Instant, Call)>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn record(&self, call: Call) {
            self.calls.lock().push((Instant::now(), call));
        }
    }

    impl InputSynthesizer for MockSynth {
        fn key_press(&mut self, key: &KeySym) -> Result<(), SynthError> {
            if matches!(key, KeySym::Other(_)) {
                return Err(SynthError::UnsupportedKey(key.to_string()));
            }
            self.record(Call::Press(key.clone()));
            Ok(())
        }

        fn key_release(&mut self, key: &KeySym) -> Result<(), SynthError> {
            self.record(Call::Release(key.clone()));
            Ok(())
        }

        fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), SynthError> {
            self.record(Call::MoveBy(dx, dy));
            Ok(())
        }

        fn button(&mut self, button: &ButtonSym, pressed: bool) -> Result<(), SynthError> {
            self.record(Call::Button(button.clone(), pressed));
            Ok(())
        }
    }

    fn key_log(entries: &[(char, bool, f64)]) -> EventLog {
        let mut log = EventLog::new();
        for (c, down, t) in entries {
            let key = KeySym::Char(*c);
            log.push(if *down {
                InputEvent::Press { key, time: *t }
            } else {
                InputEvent::Release { key, time: *t }
            });
        }
        log
    }

    fn engine() -> PlaybackEngine {
        PlaybackEngine::with_warmup(Arc::new(ModeCell::new()), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_rejects_invalid_speed() {
        let mut engine = engine();
        let (synth, _) = MockSynth::new();
        let err = engine
            .play(
                EventLog::new(),
                PlaybackParams {
                    speed: 0.0,
                    loops: LoopCount::Times(1),
                },
                Box::new(synth),
            )
            .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidSpeed(_)));
    }

    #[tokio::test]
    async fn test_zero_loops_skips_without_spawning() {
        let mode = Arc::new(ModeCell::new());
        let mut engine = PlaybackEngine::with_warmup(mode.clone(), Duration::ZERO);
        let (synth, calls) = MockSynth::new();

        engine
            .play(
                key_log(&[('a', true, 0.0)]),
                PlaybackParams {
                    speed: 1.0,
                    loops: LoopCount::Times(0),
                },
                Box::new(synth),
            )
            .unwrap();

        assert_eq!(mode.get(), SessionMode::Idle);
        assert!(engine.job.is_none());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_second_play_rejected_while_running() {
        let mut engine = PlaybackEngine::with_warmup(
            Arc::new(ModeCell::new()),
            Duration::from_secs(60),
        );
        let (first, _) = MockSynth::new();
        let (second, _) = MockSynth::new();
        let params = PlaybackParams {
            speed: 1.0,
            loops: LoopCount::Times(1),
        };

        engine.play(EventLog::new(), params, Box::new(first)).unwrap();
        let err = engine
            .play(EventLog::new(), params, Box::new(second))
            .unwrap_err();
        assert!(matches!(err, ReplayError::PlaybackRunning));

        engine.cancel();
        engine.wait_until_idle().await;
    }

    #[tokio::test]
    async fn test_play_rejected_while_recording() {
        let mode = Arc::new(ModeCell::new());
        mode.transition(SessionMode::Idle, SessionMode::Recording).unwrap();
        let mut engine = PlaybackEngine::with_warmup(mode, Duration::ZERO);
        let (synth, _) = MockSynth::new();

        let err = engine
            .play(
                EventLog::new(),
                PlaybackParams {
                    speed: 1.0,
                    loops: LoopCount::Times(1),
                },
                Box::new(synth),
            )
            .unwrap_err();
        assert!(matches!(err, ReplayError::RecordingActive));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_replay_timing_at_double_speed() {
        let mode = Arc::new(ModeCell::new());
        let mut engine = PlaybackEngine::with_warmup(mode.clone(), Duration::ZERO);
        let (synth, calls) = MockSynth::new();

        // press 'a' @0.0, release 'a' @0.10, press 'b' @0.25
        let log = key_log(&[('a', true, 0.0), ('a', false, 0.10), ('b', true, 0.25)]);
        let start = Instant::now();
        engine
            .play(
                log,
                PlaybackParams {
                    speed: 2.0,
                    loops: LoopCount::Times(1),
                },
                Box::new(synth),
            )
            .unwrap();
        engine.wait_until_idle().await;

        assert_eq!(mode.get(), SessionMode::Idle);
        let calls = calls.lock();
        assert_eq!(calls.len(), 3);

        // Expected offsets at speed 2.0: 0.0, 0.05, 0.125
        let tolerance = Duration::from_millis(40);
        for ((at, _), expected_ms) in calls.iter().zip([0u64, 50, 125]) {
            let expected = Duration::from_millis(expected_ms);
            let actual = at.duration_since(start);
            let delta = if actual > expected {
                actual - expected
            } else {
                expected - actual
            };
            assert!(
                delta < tolerance,
                "dispatch at {actual:?}, expected {expected:?}"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_stops_infinite_playback() {
        let mode = Arc::new(ModeCell::new());
        let mut engine = PlaybackEngine::with_warmup(mode.clone(), Duration::ZERO);
        let (synth, calls) = MockSynth::new();

        let log = key_log(&[('a', true, 0.0), ('a', false, 0.05)]);
        engine
            .play(
                log,
                PlaybackParams {
                    speed: 1.0,
                    loops: LoopCount::Infinite,
                },
                Box::new(synth),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        engine.cancel();
        engine.cancel(); // idempotent
        engine.wait_until_idle().await;

        assert_eq!(mode.get(), SessionMode::Idle);
        let dispatched = calls.lock().len();
        assert!(dispatched >= 1, "playback never dispatched anything");

        // Nothing more may be dispatched once the worker has exited
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.lock().len(), dispatched);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_moves_become_relative_deltas() {
        let mut engine = engine();
        let (synth, calls) = MockSynth::new();

        let mut log = EventLog::new();
        log.push(InputEvent::Move { x: 100, y: 100, t: 0.0 });
        log.push(InputEvent::Move { x: 110, y: 120, t: 0.01 });
        log.push(InputEvent::Move { x: 105, y: 125, t: 0.02 });
        log.push(InputEvent::Click {
            x: 105,
            y: 125,
            b: ButtonSym::Left,
            p: true,
            t: 0.03,
        });

        engine
            .play(
                log,
                PlaybackParams {
                    speed: 1.0,
                    loops: LoopCount::Times(1),
                },
                Box::new(synth),
            )
            .unwrap();
        engine.wait_until_idle().await;

        let calls: Vec<Call> = calls.lock().iter().map(|(_, c)| c.clone()).collect();
        // First move establishes the anchor and emits nothing
        assert_eq!(
            calls,
            vec![
                Call::MoveBy(10, 20),
                Call::MoveBy(-5, 5),
                Call::Button(ButtonSym::Left, true),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_keys_skipped_not_fatal() {
        let mut engine = engine();
        let (synth, calls) = MockSynth::new();

        let mut log = EventLog::new();
        log.push(InputEvent::Press {
            key: KeySym::Other("Key.media_play".to_string()),
            time: 0.0,
        });
        log.push(InputEvent::Press {
            key: KeySym::Char('a'),
            time: 0.01,
        });

        engine
            .play(
                log,
                PlaybackParams {
                    speed: 1.0,
                    loops: LoopCount::Times(1),
                },
                Box::new(synth),
            )
            .unwrap();
        engine.wait_until_idle().await;

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, Call::Press(KeySym::Char('a')));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_multiple_loops_rerun_the_log() {
        let mut engine = engine();
        let (synth, calls) = MockSynth::new();

        let log = key_log(&[('a', true, 0.0), ('a', false, 0.01)]);
        engine
            .play(
                log,
                PlaybackParams {
                    speed: 1.0,
                    loops: LoopCount::Times(3),
                },
                Box::new(synth),
            )
            .unwrap();
        engine.wait_until_idle().await;

        assert_eq!(calls.lock().len(), 6);
    }
}
