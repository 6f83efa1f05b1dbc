//! Track catalog adapter

/// Supplies the player's audio track codes
pub trait TrackSource {
    /// Available codes, in order
    fn tracks(&self) -> Vec<String>;

    /// Code of the track currently playing
    fn selected_id(&self) -> Option<String>;
}

/// Fixed track list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticTrackSource {
    pub tracks: Vec<String>,
    pub selected: Option<String>,
}

impl StaticTrackSource {
    pub fn new<I, S>(tracks: I, selected: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tracks: tracks.into_iter().map(Into::into).collect(),
            selected: selected.map(str::to_string),
        }
    }
}

impl TrackSource for StaticTrackSource {
    fn tracks(&self) -> Vec<String> {
        self.tracks.clone()
    }

    fn selected_id(&self) -> Option<String> {
        self.selected.clone()
    }
}
