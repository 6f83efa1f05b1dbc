//! Scripted host sessions
//!
//! A script stands in for the video view host: it feeds player events to the
//! bus, presses the audio tracks button and picks items in the dialog.
//!
//! ```json
//! {
//!   "playing": true,
//!   "steps": [
//!     { "step": "emit", "event": { "event": "audio_tracks", "tracks": ["en", "ja"] } },
//!     { "step": "launch" },
//!     { "step": "choose", "index": 1 },
//!     { "step": "emit", "event": { "event": "dialog_confirmed" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracksel_core::Event;

/// A host session script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Whether playback is running when the session starts
    #[serde(default)]
    pub playing: bool,
    pub steps: Vec<Step>,
}

/// One host action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Publish an event on the bus
    Emit { event: Event },
    /// Press the audio tracks button
    Launch,
    /// Pick an item in the dialog
    Choose { index: usize },
    /// User presses play on the media controller
    Play,
    /// User presses pause on the media controller
    Pause,
}

impl Script {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Emit { event } => write!(f, "emit {}", event.kind()),
            Step::Launch => write!(f, "launch"),
            Step::Choose { index } => write!(f, "choose {}", index),
            Step::Play => write!(f, "play"),
            Step::Pause => write!(f, "pause"),
        }
    }
}
