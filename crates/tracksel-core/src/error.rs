//! Error types for track selection

use crate::types::LaunchId;
use thiserror::Error;

/// Result type alias for track selection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Track selection error types
#[derive(Error, Debug)]
pub enum Error {
    // Resolution errors
    #[error("Unknown track code: {code}")]
    UnknownTrackCode { code: String },

    #[error("No audio tracks available")]
    EmptyTrackList,

    // Coordination errors
    #[error("Resume already performed or retracted for launch {launch}")]
    DoubleResumeAttempt { launch: LaunchId },

    #[error("Track index {index} out of range ({len} tracks)")]
    TrackIndexOutOfRange { index: usize, len: usize },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create an unknown-code error
    pub fn unknown_code(code: impl Into<String>) -> Self {
        Error::UnknownTrackCode { code: code.into() }
    }

    /// Returns true if this error stops a dialog launch before playback is touched
    pub fn aborts_launch(&self) -> bool {
        matches!(self, Error::UnknownTrackCode { .. } | Error::EmptyTrackList)
    }

    /// Returns the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnknownTrackCode { .. } => "UNKNOWN_TRACK_CODE",
            Error::EmptyTrackList => "EMPTY_TRACK_LIST",
            Error::DoubleResumeAttempt { .. } => "DOUBLE_RESUME",
            Error::TrackIndexOutOfRange { .. } => "TRACK_INDEX_RANGE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Serialization(_) => "SERIALIZATION",
        }
    }
}
