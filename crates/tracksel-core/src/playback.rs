//! Playback capability

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// The part of the player the coordinator drives
pub trait Playback: Send + Sync {
    fn is_playing(&self) -> bool;

    fn pause(&self);

    fn start(&self);
}

/// In-memory player used by the CLI harness and tests
#[derive(Debug, Default)]
pub struct SimulatedPlayback {
    playing: AtomicBool,
    pauses: AtomicU64,
    starts: AtomicU64,
}

impl SimulatedPlayback {
    pub fn new(playing: bool) -> Self {
        Self {
            playing: AtomicBool::new(playing),
            ..Default::default()
        }
    }

    /// Number of `pause()` calls
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::SeqCst)
    }

    /// Number of `start()` calls
    pub fn starts(&self) -> u64 {
        self.starts.load(Ordering::SeqCst)
    }
}

impl Playback for SimulatedPlayback {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
        let pauses = self.pauses.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(pauses, "Playback paused");
    }

    fn start(&self) {
        self.playing.store(true, Ordering::SeqCst);
        let starts = self.starts.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(starts, "Playback started");
    }
}
