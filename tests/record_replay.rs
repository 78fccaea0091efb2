//! End-to-end: capture a synthetic event stream, persist it, reload it, and
//! replay it against a mock synthesizer.

use inputtape::backend::{InputSynthesizer, RawInput, SynthError};
use inputtape::log::{ButtonSym, DeviceClass, EventLog, InputEvent, KeySym, LogStore};
use inputtape::playback::{LoopCount, PlaybackEngine, PlaybackParams};
use inputtape::recorder::Recorder;
use inputtape::session::{ModeCell, SessionMode};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Press(KeySym),
    Release(KeySym),
}

struct RecordingSynth {
    calls: Arc<Mutex<Vec<(Instant, Call)>>>,
}

impl InputSynthesizer for RecordingSynth {
    fn key_press(&mut self, key: &KeySym) -> Result<(), SynthError> {
        self.calls.lock().push((Instant::now(), Call::Press(key.clone())));
        Ok(())
    }

    fn key_release(&mut self, key: &KeySym) -> Result<(), SynthError> {
        self.calls
            .lock()
            .push((Instant::now(), Call::Release(key.clone())));
        Ok(())
    }

    fn move_by(&mut self, _dx: i32, _dy: i32) -> Result<(), SynthError> {
        Ok(())
    }

    fn button(&mut self, _button: &ButtonSym, _pressed: bool) -> Result<(), SynthError> {
        Ok(())
    }
}

fn stop_combo() -> Vec<HashSet<KeySym>> {
    vec![HashSet::from([KeySym::Shift, KeySym::Char('e')])]
}

#[tokio::test(flavor = "multi_thread")]
async fn record_persist_reload_replay() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path(), "keyboardlog");

    // Record a short typing burst with real inter-event gaps
    let mode = Arc::new(ModeCell::new());
    let mut recorder = Recorder::new(mode.clone(), DeviceClass::Keyboard, stop_combo());
    recorder.start().unwrap();

    recorder.handle_raw(&RawInput::KeyPress(KeySym::Char('a')));
    std::thread::sleep(Duration::from_millis(40));
    recorder.handle_raw(&RawInput::KeyRelease(KeySym::Char('a')));
    std::thread::sleep(Duration::from_millis(40));
    recorder.handle_raw(&RawInput::KeyPress(KeySym::Char('b')));

    let log = recorder.stop().unwrap();
    assert_eq!(mode.get(), SessionMode::Idle);
    assert_eq!(log.len(), 3);

    let path = store.save(&log).unwrap();
    let reloaded = store.load(&path).unwrap();
    assert_eq!(reloaded, log);
    let recorded_offsets: Vec<f64> = reloaded.iter().map(|e| e.offset_secs()).collect();

    // Replay at normal speed and compare inter-event delays
    let mut engine = PlaybackEngine::with_warmup(mode.clone(), Duration::ZERO);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let synth = RecordingSynth {
        calls: calls.clone(),
    };
    engine
        .play(
            reloaded,
            PlaybackParams {
                speed: 1.0,
                loops: LoopCount::Times(1),
            },
            Box::new(synth),
        )
        .unwrap();
    engine.wait_until_idle().await;
    assert_eq!(mode.get(), SessionMode::Idle);

    let calls = calls.lock();
    assert_eq!(
        calls.iter().map(|(_, c)| c.clone()).collect::<Vec<_>>(),
        vec![
            Call::Press(KeySym::Char('a')),
            Call::Release(KeySym::Char('a')),
            Call::Press(KeySym::Char('b')),
        ]
    );

    let tolerance = 0.05;
    for window in 0..calls.len() - 1 {
        let replayed_gap = calls[window + 1]
            .0
            .duration_since(calls[window].0)
            .as_secs_f64();
        let recorded_gap = recorded_offsets[window + 1] - recorded_offsets[window];
        assert!(
            (replayed_gap - recorded_gap).abs() < tolerance,
            "gap {window}: replayed {replayed_gap:.3}s vs recorded {recorded_gap:.3}s"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn replay_duration_scales_with_speed() {
    let mut log = EventLog::new();
    log.push(InputEvent::Press {
        key: KeySym::Char('x'),
        time: 0.0,
    });
    log.push(InputEvent::Release {
        key: KeySym::Char('x'),
        time: 0.4,
    });

    for (speed, expected_ms) in [(1.0, 400u64), (4.0, 100)] {
        let mode = Arc::new(ModeCell::new());
        let mut engine = PlaybackEngine::with_warmup(mode, Duration::ZERO);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let synth = RecordingSynth {
            calls: calls.clone(),
        };

        let start = Instant::now();
        engine
            .play(
                log.clone(),
                PlaybackParams {
                    speed,
                    loops: LoopCount::Times(1),
                },
                Box::new(synth),
            )
            .unwrap();
        engine.wait_until_idle().await;
        let elapsed = start.elapsed();

        let expected = Duration::from_millis(expected_ms);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(80),
            "speed {speed}: one loop took {elapsed:?}, expected about {expected:?}"
        );
        assert_eq!(calls.lock().len(), 2);
    }
}
