//! Error taxonomy for recording and playback operations.

use thiserror::Error;

/// Errors that can occur while recording or replaying input
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("already recording")]
    AlreadyRecording,

    #[error("not recording")]
    NotRecording,

    #[error("playback already running")]
    PlaybackRunning,

    #[error("recording in progress")]
    RecordingActive,

    #[error("invalid playback speed: {0}")]
    InvalidSpeed(f64),

    #[error("input hook error: {0}")]
    Hook(String),

    #[error("input synthesis unavailable: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log file corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type for recording and playback operations
pub type ReplayResult<T> = Result<T, ReplayError>;
