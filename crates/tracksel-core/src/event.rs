//! Player event vocabulary
//!
//! Events published on the [`EventBus`](crate::bus::EventBus) by the player,
//! the dialog and the host lifecycle. Subscriptions are keyed by
//! [`EventKind`], the payload-free discriminant.

use serde::{Deserialize, Serialize};

/// Events delivered through the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Player reported its audio tracks
    AudioTracks {
        tracks: Vec<String>,
        #[serde(default)]
        selected: Option<String>,
    },

    /// A track was picked in the dialog
    AudioTrackSelected {
        index: usize,
        code: String,
    },

    /// Dialog OK button
    DialogConfirmed,

    /// Dialog host is leaving for the settings screen
    DialogSettings,

    /// Host activity resumed
    ActivityResumed,

    /// Host fragment resumed
    FragmentResumed,

    /// Device configuration changed (rotation)
    ConfigurationChanged,

    EnterFullScreen,

    ExitFullScreen,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::AudioTracks { .. } => EventKind::AudioTracks,
            Event::AudioTrackSelected { .. } => EventKind::AudioTrackSelected,
            Event::DialogConfirmed => EventKind::DialogConfirmed,
            Event::DialogSettings => EventKind::DialogSettings,
            Event::ActivityResumed => EventKind::ActivityResumed,
            Event::FragmentResumed => EventKind::FragmentResumed,
            Event::ConfigurationChanged => EventKind::ConfigurationChanged,
            Event::EnterFullScreen => EventKind::EnterFullScreen,
            Event::ExitFullScreen => EventKind::ExitFullScreen,
        }
    }
}

/// Subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AudioTracks,
    AudioTrackSelected,
    DialogConfirmed,
    DialogSettings,
    ActivityResumed,
    FragmentResumed,
    ConfigurationChanged,
    EnterFullScreen,
    ExitFullScreen,
}

impl EventKind {
    /// Every kind, in declaration order
    pub const ALL: [EventKind; 9] = [
        EventKind::AudioTracks,
        EventKind::AudioTrackSelected,
        EventKind::DialogConfirmed,
        EventKind::DialogSettings,
        EventKind::ActivityResumed,
        EventKind::FragmentResumed,
        EventKind::ConfigurationChanged,
        EventKind::EnterFullScreen,
        EventKind::ExitFullScreen,
    ];

    /// SDK-style constant name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AudioTracks => "AUDIO_TRACKS",
            EventKind::AudioTrackSelected => "SELECT_AUDIO_TRACK",
            EventKind::DialogConfirmed => "AUDIO_TRACKS_DIALOG_OK",
            EventKind::DialogSettings => "AUDIO_TRACKS_DIALOG_SETTINGS",
            EventKind::ActivityResumed => "ACTIVITY_RESUMED",
            EventKind::FragmentResumed => "FRAGMENT_RESUMED",
            EventKind::ConfigurationChanged => "CONFIGURATION_CHANGED",
            EventKind::EnterFullScreen => "ENTER_FULL_SCREEN",
            EventKind::ExitFullScreen => "EXIT_FULL_SCREEN",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
