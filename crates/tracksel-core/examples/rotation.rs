//! Rotation mid-dialog example
//!
//! Opens the audio track dialog while playing, rotates the device before the
//! user confirms, and shows that playback resumes exactly once.
//!
//! Run with: cargo run -p tracksel-core --example rotation

use std::sync::Arc;
use tracksel_core::{
    AudioTrackCoordinator, CoordinatorConfig, Event, EventBus, LoggingPresenter, Playback,
    SimulatedPlayback,
};

fn main() {
    println!("Tracksel Core - Rotation Example");
    println!("================================\n");

    let bus = EventBus::new();
    let playback = Arc::new(SimulatedPlayback::new(true));
    let coordinator = AudioTrackCoordinator::new(
        bus.clone(),
        playback.clone(),
        Arc::new(LoggingPresenter),
        CoordinatorConfig::default(),
    );

    bus.emit(&Event::AudioTracks {
        tracks: vec!["en-au".into(), "en".into(), "ja".into()],
        selected: Some("en".into()),
    });

    let dialog = match coordinator.launch() {
        Ok(dialog) => dialog,
        Err(e) => {
            eprintln!("Dialog not shown: {}", e);
            return;
        }
    };

    println!("{}:", dialog.title);
    for (i, item) in dialog.items.iter().enumerate() {
        let marker = if Some(i) == dialog.checked { "(x)" } else { "( )" };
        println!("  {} {}", marker, item);
    }
    println!();
    println!("  Phase:   {}", coordinator.phase());
    println!("  Playing: {}", playback.is_playing());
    println!("  Armed:   {} listener(s)", coordinator.pending_resume().len());
    println!();

    println!("Rotating device...");
    bus.emit(&Event::ConfigurationChanged);
    bus.emit(&Event::ActivityResumed);
    bus.emit(&Event::FragmentResumed);
    println!("  Phase:   {}", coordinator.phase());
    println!("  Playing: {}", playback.is_playing());
    println!();

    println!("Stale OK press from the old dialog...");
    let delivered = bus.emit(&Event::DialogConfirmed);
    println!("  Delivered to {} listener(s)", delivered);
    println!("  Resumes: {}", playback.starts());
}
