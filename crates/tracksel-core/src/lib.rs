//! Tracksel Core - Audio track selection for Kino
//!
//! This crate provides the audio track dialog flow of the player:
//! - Synchronous event bus with one-shot listeners and per-registration tokens
//! - Track code to label resolution
//! - Pause, show the track dialog, resume exactly once
//! - Recovery when the dialog host is recreated mid-dialog (rotation)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Tracksel Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Track     │  │   Dialog     │  │   Playback   │           │
//! │  │   Resolver   │  │  Presenter   │  │  Capability  │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │ Audio Track │                              │
//! │                    │ Coordinator │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐                              │
//! │  │ Track Source │  │    Event    │                              │
//! │  │   Adapter    │  │     Bus     │                              │
//! │  └──────────────┘  └─────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tracksel_core::{
//!     AudioTrackCoordinator, CoordinatorConfig, Event, EventBus, LoggingPresenter,
//!     Playback, SimulatedPlayback,
//! };
//!
//! let bus = EventBus::new();
//! let playback = Arc::new(SimulatedPlayback::new(true));
//! let coordinator = AudioTrackCoordinator::new(
//!     bus.clone(),
//!     playback.clone(),
//!     Arc::new(LoggingPresenter),
//!     CoordinatorConfig::default(),
//! );
//!
//! bus.emit(&Event::AudioTracks {
//!     tracks: vec!["en".into(), "ja".into()],
//!     selected: Some("ja".into()),
//! });
//! coordinator.launch().unwrap();
//! assert!(!playback.is_playing());
//!
//! bus.emit(&Event::DialogConfirmed);
//! assert!(playback.is_playing());
//! ```

pub mod error;
pub mod types;
pub mod event;
pub mod bus;
pub mod resolver;
pub mod playback;
pub mod dialog;
pub mod source;
pub mod coordinator;

pub use error::{Error, Result};
pub use types::*;
pub use event::{Event, EventKind};
pub use bus::{EventBus, ListenerToken};
pub use resolver::TrackLabelResolver;
pub use playback::{Playback, SimulatedPlayback};
pub use dialog::{Dialog, DialogPresenter, DialogRequest, LoggingPresenter};
pub use source::{StaticTrackSource, TrackSource};
pub use coordinator::AudioTrackCoordinator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "Tracksel Core initialized");
}
