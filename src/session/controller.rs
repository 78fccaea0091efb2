//! The session controller: consumes commands from a single queue and drives
//! the recorder and playback engine.
//!
//! Hotkey callbacks and the OS hook run on foreign threads, so nothing here
//! is ever called re-entrantly: the hook posts [`Command`]s into a channel
//! and the controller's own task consumes them one at a time.

use crate::backend::{EnigoSynthesizer, InputSynthesizer, RawInput};
use crate::error::{ReplayError, ReplayResult};
use crate::hotkey::{self, ChordTracker, HotkeyBinding};
use crate::log::{DeviceClass, LogFileInfo, LogStore};
use crate::playback::{LoopCount, PlaybackEngine, PlaybackParams};
use crate::recorder::Recorder;
use crate::session::mode::{ModeCell, SessionMode};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// A logical trigger delivered by the hotkey dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ToggleRecord,
    Play,
    ForceQuit,
}

/// One unit of work for the controller loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Raw(RawInput),
    Trigger(Trigger),
}

/// Whether the controller loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything needed to start one playback job.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub path: PathBuf,
    pub loops: LoopCount,
    pub speed: f64,
}

/// Collects playback parameters from the user when the play trigger fires.
///
/// `None` aborts the playback attempt (no files chosen, input stream closed).
/// Implementations re-prompt on invalid input, so whatever comes back is
/// already validated.
#[async_trait]
pub trait PlaybackPrompter: Send {
    async fn request(&mut self, files: &[LogFileInfo]) -> Option<PlaybackRequest>;
}

type SynthFactory = Box<dyn Fn() -> ReplayResult<Box<dyn InputSynthesizer>> + Send>;

pub struct SessionController {
    mode: Arc<ModeCell>,
    recorder: Recorder,
    engine: PlaybackEngine,
    store: LogStore,
    chords: ChordTracker,
    prompter: Box<dyn PlaybackPrompter>,
    synth_factory: SynthFactory,
}

impl SessionController {
    pub fn new(
        device: DeviceClass,
        store: LogStore,
        prompter: Box<dyn PlaybackPrompter>,
    ) -> Self {
        Self::with_synth_factory(
            device,
            store,
            prompter,
            Box::new(|| {
                Ok(Box::new(EnigoSynthesizer::new()?) as Box<dyn InputSynthesizer>)
            }),
        )
    }

    pub fn with_synth_factory(
        device: DeviceClass,
        store: LogStore,
        prompter: Box<dyn PlaybackPrompter>,
        synth_factory: SynthFactory,
    ) -> Self {
        let mode = Arc::new(ModeCell::new());
        let bindings = hotkey::default_bindings();
        Self::with_bindings(device, store, prompter, synth_factory, mode, bindings)
    }

    fn with_bindings(
        device: DeviceClass,
        store: LogStore,
        prompter: Box<dyn PlaybackPrompter>,
        synth_factory: SynthFactory,
        mode: Arc<ModeCell>,
        bindings: Vec<HotkeyBinding>,
    ) -> Self {
        let recorder = Recorder::new(
            mode.clone(),
            device,
            hotkey::suppression_sets(&bindings),
        );
        let engine = PlaybackEngine::new(mode.clone());
        Self {
            mode,
            recorder,
            engine,
            store,
            chords: ChordTracker::new(bindings),
            prompter,
            synth_factory,
        }
    }

    /// Consume commands until the channel closes or force-quit fires.
    pub async fn run(&mut self, rx: &mut UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            if self.handle(command).await == Flow::Quit {
                break;
            }
        }
    }

    /// Process one command.
    pub async fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Raw(raw) => {
                // The recorder sees the raw event first so chord suppression
                // is applied before the trigger tears the session down.
                self.recorder.handle_raw(&raw);
                match self.chords.update(&raw) {
                    Some(trigger) => self.trigger(trigger).await,
                    None => Flow::Continue,
                }
            }
            Command::Trigger(trigger) => self.trigger(trigger).await,
        }
    }

    async fn trigger(&mut self, trigger: Trigger) -> Flow {
        match trigger {
            Trigger::ToggleRecord => {
                self.toggle_record();
                Flow::Continue
            }
            Trigger::Play => {
                if let Err(error) = self.play().await {
                    tracing::warn!(%error, "playback not started");
                    println!("⚠️ Playback not started: {error}");
                }
                Flow::Continue
            }
            Trigger::ForceQuit => {
                self.force_quit();
                Flow::Quit
            }
        }
    }

    fn toggle_record(&mut self) {
        match self.mode.get() {
            SessionMode::Idle => match self.recorder.start() {
                Ok(()) => println!("🔴 Recording started."),
                Err(error) => println!("⚠️ {error}"),
            },
            SessionMode::Recording => match self.recorder.stop() {
                Ok(log) => match self.store.save(&log) {
                    Ok(path) => println!(
                        "⏹️ Recording stopped. Saved {} events to:\n  {}",
                        log.len(),
                        path.display()
                    ),
                    // The session is back to idle either way; this
                    // recording's data is lost.
                    Err(error) => {
                        tracing::error!(%error, "failed to persist recording");
                        println!("⚠️ Failed to save recording: {error}");
                    }
                },
                Err(error) => println!("⚠️ {error}"),
            },
            SessionMode::Playing => {
                println!("⚠️ Cannot record while playback is running.");
            }
        }
    }

    async fn play(&mut self) -> ReplayResult<()> {
        match self.mode.get() {
            SessionMode::Recording => return Err(ReplayError::RecordingActive),
            SessionMode::Playing => return Err(ReplayError::PlaybackRunning),
            SessionMode::Idle => {}
        }

        let files = self.store.list()?;
        if files.is_empty() {
            println!("⚠️ No log files found in {}.", self.store.dir().display());
            return Ok(());
        }

        let Some(request) = self.prompter.request(&files).await else {
            return Ok(());
        };
        if request.loops.is_zero() {
            println!("⏭️ Skipping playback.");
            return Ok(());
        }

        let log = self.store.load(&request.path)?;
        let synth = (self.synth_factory)()?;

        println!("▶️ Starting playback in 5 seconds... Get ready!");
        self.engine.play(
            log,
            PlaybackParams {
                speed: request.speed,
                loops: request.loops,
            },
            synth,
        )
    }

    fn force_quit(&mut self) {
        println!("🛑 Force quitting.");
        self.engine.cancel();

        // Best-effort: a live recording is still worth persisting
        if self.mode.get() == SessionMode::Recording {
            match self.recorder.stop() {
                Ok(log) => {
                    if let Err(error) = self.store.save(&log) {
                        tracing::error!(%error, "failed to persist recording during force-quit");
                    }
                }
                Err(error) => tracing::warn!(%error, "force-quit could not stop recording"),
            }
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode.get()
    }

    /// Wait for any in-flight playback worker to exit. Test and shutdown
    /// helper.
    pub async fn wait_for_playback(&mut self) {
        self.engine.wait_until_idle().await;
    }
}
