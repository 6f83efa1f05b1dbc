//! Core types for audio track selection

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Tracks and Selection
// =============================================================================

/// A selectable audio/language option
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Machine code supplied by the catalog (e.g. `en-au`)
    pub id: String,
    /// Human-readable label, `None` while unresolved
    pub label: Option<String>,
}

impl Track {
    /// Create a track with a resolved label
    pub fn resolved(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }

    /// Create a track whose label is not known yet
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.label.is_some()
    }

    /// Label to show, falling back to the raw code
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Track list and current choice owned by the coordinator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Tracks in catalog order
    pub tracks: Vec<Track>,
    /// Index of the checked track
    pub current_index: usize,
    /// Track id the player reported as selected
    pub selected_id: Option<String>,
}

impl SelectionState {
    /// Replace the track list.
    ///
    /// `current_index` moves to the first track whose id equals `selected`;
    /// it is left untouched when `selected` is absent or matches nothing.
    pub fn apply_tracks(&mut self, tracks: Vec<Track>, selected: Option<String>) {
        self.tracks = tracks;
        self.selected_id = selected;

        if let Some(ref selected) = self.selected_id {
            if let Some(index) = self.tracks.iter().position(|t| &t.id == selected) {
                self.current_index = index;
            }
        }
    }

    /// Set the checked track directly
    pub fn select(&mut self, index: usize) -> Result<&Track> {
        let len = self.tracks.len();
        if index >= len {
            return Err(Error::TrackIndexOutOfRange { index, len });
        }
        self.current_index = index;
        Ok(&self.tracks[index])
    }

    /// Currently checked track, if the index points at one
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// Track codes in order
    pub fn codes(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

// =============================================================================
// Coordinator Types
// =============================================================================

/// Identifies one pause/dialog/resume sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaunchId(pub u64);

impl LaunchId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for LaunchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable coordinator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorPhase {
    /// No resume pending
    Idle,
    /// Playback paused, dialog visible
    AwaitingUserChoice,
    /// Dialog host torn down, waiting for it to come back
    AwaitingRecreationResume,
}

impl std::fmt::Display for CoordinatorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinatorPhase::Idle => write!(f, "idle"),
            CoordinatorPhase::AwaitingUserChoice => write!(f, "awaiting_user_choice"),
            CoordinatorPhase::AwaitingRecreationResume => write!(f, "awaiting_recreation_resume"),
        }
    }
}

/// Counters kept across the coordinator's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorStats {
    /// Dialogs shown
    pub launches: u64,
    /// Launches rejected before playback was touched
    pub aborted_launches: u64,
    /// Times playback was resumed
    pub resumes: u64,
    /// Terminal signals that arrived for a finished launch
    pub invariant_violations: u64,
}

// =============================================================================
// Configuration
// =============================================================================

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Dialog title
    pub dialog_title: String,
    /// Additional code -> label entries on top of the built-in table
    pub extra_labels: BTreeMap<String, String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            dialog_title: "Audio Tracks".to_string(),
            extra_labels: BTreeMap::new(),
        }
    }
}

impl CoordinatorConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dialog_title.trim().is_empty() {
            return Err(Error::InvalidConfig("dialog_title must not be empty".into()));
        }
        for (code, label) in &self.extra_labels {
            if code.trim().is_empty() {
                return Err(Error::InvalidConfig("extra_labels contains an empty code".into()));
            }
            if label.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("empty label for code '{}'", code)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(codes: &[&str]) -> Vec<Track> {
        codes.iter().map(|c| Track::unresolved(*c)).collect()
    }

    #[test]
    fn test_apply_tracks_moves_to_selected() {
        let mut state = SelectionState::default();
        state.apply_tracks(tracks(&["en", "ja", "en-au"]), Some("en-au".into()));
        assert_eq!(state.current_index, 2);
        assert_eq!(state.current().map(|t| t.id.as_str()), Some("en-au"));
    }

    #[test]
    fn test_apply_tracks_keeps_index_without_match() {
        let mut state = SelectionState::default();
        state.apply_tracks(tracks(&["en", "ja"]), Some("ja".into()));
        assert_eq!(state.current_index, 1);

        state.apply_tracks(tracks(&["en", "ja"]), Some("de".into()));
        assert_eq!(state.current_index, 1);

        state.apply_tracks(tracks(&["en", "ja"]), None);
        assert_eq!(state.current_index, 1);
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn test_apply_tracks_picks_first_duplicate() {
        let mut state = SelectionState::default();
        state.apply_tracks(tracks(&["en", "ja", "ja"]), Some("ja".into()));
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_select_bounds() {
        let mut state = SelectionState::default();
        state.apply_tracks(tracks(&["en", "ja"]), None);
        assert_eq!(state.select(1).unwrap().id, "ja");
        assert!(matches!(
            state.select(2),
            Err(Error::TrackIndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_track_display_label() {
        assert_eq!(Track::resolved("ja", "Japanese").display_label(), "Japanese");
        assert_eq!(Track::unresolved("xx").display_label(), "xx");
        assert_eq!(Track::resolved("ja", "Japanese").to_string(), "Japanese (ja)");
    }

    #[test]
    fn test_config_defaults_and_parse() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.dialog_title, "Audio Tracks");
        assert!(config.extra_labels.is_empty());

        let config = CoordinatorConfig::from_json(r#"{"extra_labels": {"fr": "French"}}"#).unwrap();
        assert_eq!(config.extra_labels.get("fr").map(String::as_str), Some("French"));
        assert_eq!(config.dialog_title, "Audio Tracks");
    }

    #[test]
    fn test_config_rejects_empty_label() {
        let err = CoordinatorConfig::from_json(r#"{"extra_labels": {"fr": " "}}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
