//! Track code to display label mapping

use crate::{types::Track, Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Built-in code -> label table
pub const BUILTIN_LABELS: &[(&str, &str)] = &[
    ("en-au", "English (Australian)"),
    ("en", "English"),
    ("ja", "Japanese"),
];

/// Pure mapping from catalog track codes to labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLabelResolver {
    labels: BTreeMap<String, String>,
}

impl Default for TrackLabelResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TrackLabelResolver {
    /// Resolver knowing only the built-in codes
    pub fn builtin() -> Self {
        Self {
            labels: BUILTIN_LABELS
                .iter()
                .map(|(code, label)| (code.to_string(), label.to_string()))
                .collect(),
        }
    }

    /// Add or override one entry
    pub fn with_label(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(code.into(), label.into());
        self
    }

    /// Add or override several entries
    pub fn extend<I, C, L>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        self.labels.extend(entries.into_iter().map(|(c, l)| (c.into(), l.into())));
        self
    }

    /// Resolve one code
    pub fn resolve(&self, code: &str) -> Result<Track> {
        self.label_for(code)
            .map(|label| Track::resolved(code, label))
            .ok_or_else(|| Error::unknown_code(code))
    }

    /// Resolve a batch, stopping at the first unknown code
    pub fn resolve_all<S: AsRef<str>>(&self, codes: &[S]) -> Result<Vec<Track>> {
        let mut tracks = Vec::with_capacity(codes.len());
        for code in codes {
            match self.resolve(code.as_ref()) {
                Ok(track) => {
                    debug!(code = %track.id, label = track.display_label(), "Track resolved");
                    tracks.push(track);
                }
                Err(e) => {
                    error!(code = code.as_ref(), resolved = tracks.len(), "No matching track label");
                    return Err(e);
                }
            }
        }
        Ok(tracks)
    }

    /// Lenient lookup
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Track with its label if known, unresolved otherwise
    pub fn track_for(&self, code: &str) -> Track {
        match self.label_for(code) {
            Some(label) => Track::resolved(code, label),
            None => Track::unresolved(code),
        }
    }

    pub fn known_codes(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }
}
