//! Capture side of the state machine.
//!
//! The recorder owns the growing [`EventLog`] while a session is live. Raw
//! notifications are translated and appended in arrival order; appending is
//! O(1) and never blocks. Key chords that are bound to hotkeys are kept out
//! of the log (see [`Recorder::handle_raw`]), otherwise every recording would
//! end with the stop chord baked into the replay stream.

use crate::backend::RawInput;
use crate::error::{ReplayError, ReplayResult};
use crate::log::{DeviceClass, EventLog, InputEvent, KeySym};
use crate::session::{ModeCell, SessionMode};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

pub struct Recorder {
    mode: Arc<ModeCell>,
    device: DeviceClass,
    suppressed_combos: Vec<HashSet<KeySym>>,
    events: EventLog,
    /// Keys physically held right now; tracked even while idle so a chord
    /// held across a start/stop boundary can still be suppressed.
    pressed: HashSet<KeySym>,
    /// Keys whose presses belong to a hotkey chord rather than the
    /// recording: combo keys already held when recording started, plus the
    /// keys of any chord that fired mid-session. Their releases are
    /// suppressed so the log never carries an orphan release.
    residue: HashSet<KeySym>,
    started_at: Option<Instant>,
}

impl Recorder {
    pub fn new(
        mode: Arc<ModeCell>,
        device: DeviceClass,
        suppressed_combos: Vec<HashSet<KeySym>>,
    ) -> Self {
        Self {
            mode,
            device,
            suppressed_combos,
            events: EventLog::new(),
            pressed: HashSet::new(),
            residue: HashSet::new(),
            started_at: None,
        }
    }

    /// Begin a new recording session.
    ///
    /// Clears any prior in-memory log and captures the start instant all
    /// event offsets are measured against.
    pub fn start(&mut self) -> ReplayResult<()> {
        self.mode
            .transition(SessionMode::Idle, SessionMode::Recording)
            .map_err(|current| match current {
                SessionMode::Recording => ReplayError::AlreadyRecording,
                _ => ReplayError::PlaybackRunning,
            })?;

        self.events = EventLog::new();
        self.residue = self
            .suppressed_combos
            .iter()
            .flatten()
            .filter(|key| self.pressed.contains(*key))
            .cloned()
            .collect();
        self.started_at = Some(Instant::now());

        tracing::info!(device = ?self.device, "recording started");
        Ok(())
    }

    /// Stop recording and seal the log.
    ///
    /// The caller hands the sealed log to persistence; the recorder keeps
    /// nothing of it.
    pub fn stop(&mut self) -> ReplayResult<EventLog> {
        self.mode
            .transition(SessionMode::Recording, SessionMode::Idle)
            .map_err(|_| ReplayError::NotRecording)?;

        self.started_at = None;
        self.residue.clear();
        let log = std::mem::take(&mut self.events);

        tracing::info!(events = log.len(), "recording stopped");
        Ok(log)
    }

    /// Translate and append one raw notification.
    ///
    /// While idle only the pressed set is maintained; nothing is logged.
    /// While recording, events matching the device class are appended unless
    /// chord suppression drops them.
    pub fn handle_raw(&mut self, raw: &RawInput) {
        let recording =
            self.started_at.is_some() && self.mode.get() == SessionMode::Recording;
        if !recording {
            // Keep the pressed set truthful anyway; suppression depends on
            // knowing what was held before recording started.
            match raw {
                RawInput::KeyPress(key) => {
                    self.pressed.insert(key.clone());
                }
                RawInput::KeyRelease(key) => {
                    self.pressed.remove(key);
                }
                _ => {}
            }
            return;
        }
        let offset = self
            .started_at
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or_default();

        match raw {
            RawInput::KeyPress(key) => self.on_key_press(key.clone(), offset),
            RawInput::KeyRelease(key) => self.on_key_release(key, offset),
            RawInput::MouseMove { x, y } => {
                if self.device.records_pointer() {
                    self.events.push(InputEvent::Move { x: *x, y: *y, t: offset });
                }
            }
            RawInput::Click { x, y, button, pressed } => {
                if self.device.records_pointer() {
                    self.events.push(InputEvent::Click {
                        x: *x,
                        y: *y,
                        b: button.clone(),
                        p: *pressed,
                        t: offset,
                    });
                }
            }
        }
    }

    fn on_key_press(&mut self, key: KeySym, offset: f64) {
        // A fresh press ends any residue hold of the same key
        self.residue.remove(&key);
        self.pressed.insert(key.clone());

        if let Some(combo_keys) = self.held_combo_keys() {
            // This press completed a hotkey chord. Drop it, and drop the
            // still-held presses of the same chord that were logged before
            // the chord was complete. The chord keys become residue so
            // their releases stay out of the log in whatever order the
            // chord is let go.
            self.purge_trailing_presses(&combo_keys);
            self.residue.extend(combo_keys);
            return;
        }

        if self.device.records_keys() {
            self.events.push(InputEvent::Press { key, time: offset });
        }
    }

    fn on_key_release(&mut self, key: &KeySym, offset: f64) {
        let suppressed = self.residue.remove(key)
            || self
                .held_combo_keys()
                .map_or(false, |combo_keys| combo_keys.contains(key));
        self.pressed.remove(key);

        if suppressed {
            return;
        }
        if self.device.records_keys() {
            self.events.push(InputEvent::Release {
                key: key.clone(),
                time: offset,
            });
        }
    }

    /// Union of the keys of every combo currently satisfied by the pressed
    /// set, or `None` when no combo is held.
    fn held_combo_keys(&self) -> Option<HashSet<KeySym>> {
        let mut keys: Option<HashSet<KeySym>> = None;
        for combo in &self.suppressed_combos {
            if combo.is_subset(&self.pressed) {
                keys.get_or_insert_with(HashSet::new).extend(combo.iter().cloned());
            }
        }
        keys
    }

    fn purge_trailing_presses(&mut self, combo_keys: &HashSet<KeySym>) {
        loop {
            let trailing_combo_press = match self.events.last() {
                Some(InputEvent::Press { key, .. }) => {
                    combo_keys.contains(key) && self.pressed.contains(key)
                }
                _ => false,
            };
            if !trailing_combo_press {
                break;
            }
            self.events.pop();
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
