//! Track choice dialog seam
//!
//! The coordinator never draws anything. It hands a [`DialogRequest`] to a
//! [`DialogPresenter`] supplied by the host UI toolkit and keeps the returned
//! [`Dialog`] handle while the sequence is in flight. The host wires the
//! dialog's OK button to [`Event::DialogConfirmed`](crate::Event) and its
//! single-choice list to `AudioTrackCoordinator::on_choice`.

use crate::types::Track;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// What the dialog should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRequest {
    pub title: String,
    /// Resolved tracks, in catalog order
    pub tracks: Vec<Track>,
    /// Pre-checked item
    pub checked: Option<usize>,
}

impl DialogRequest {
    /// Labels for the single-choice list
    pub fn items(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.display_label().to_string()).collect()
    }
}

/// Handle for a dialog that was shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub id: Uuid,
    pub title: String,
    pub items: Vec<String>,
    pub checked: Option<usize>,
    pub shown_at: DateTime<Utc>,
}

impl Dialog {
    pub fn from_request(request: &DialogRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            items: request.items(),
            checked: request.checked,
            shown_at: Utc::now(),
        }
    }
}

/// Builds and shows the track choice dialog for one UI toolkit
pub trait DialogPresenter: Send + Sync {
    fn build_and_show(&self, request: &DialogRequest) -> Dialog;
}

/// Presenter that renders the dialog into the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPresenter;

impl DialogPresenter for LoggingPresenter {
    fn build_and_show(&self, request: &DialogRequest) -> Dialog {
        let dialog = Dialog::from_request(request);
        for (i, item) in dialog.items.iter().enumerate() {
            let marker = if Some(i) == dialog.checked { "(x)" } else { "( )" };
            info!(dialog = %dialog.id, "{} {}", marker, item);
        }
        info!(dialog = %dialog.id, title = %dialog.title, items = dialog.items.len(), "Dialog shown");
        dialog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_from_request() {
        let request = DialogRequest {
            title: "Audio Tracks".into(),
            tracks: vec![Track::resolved("en", "English"), Track::resolved("ja", "Japanese")],
            checked: Some(1),
        };
        let dialog = LoggingPresenter.build_and_show(&request);

        assert_eq!(dialog.items, vec!["English", "Japanese"]);
        assert_eq!(dialog.checked, Some(1));
        assert_eq!(dialog.title, "Audio Tracks");
        assert_ne!(dialog.id, Dialog::from_request(&request).id);
    }
}
