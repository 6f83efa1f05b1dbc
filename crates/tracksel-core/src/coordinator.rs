//! Audio Track Coordinator - pause, dialog, resume
//!
//! Coordinates:
//! - Track list updates from `AUDIO_TRACKS` events
//! - Pausing playback while the choice dialog is up
//! - Resuming exactly once, either on dialog confirmation or once the dialog
//!   host comes back after being torn down (rotation, settings screen)
//!
//! # State machine
//!
//! ```text
//!            launch() while playing
//!   Idle ─────────────────────────────► AwaitingUserChoice
//!    ▲                                    │            │
//!    │      DialogConfirmed               │            │ DialogSettings
//!    ├────────────────────────────────────┘            ▼
//!    │      Activity/FragmentResumed       AwaitingRecreationResume
//!    ├────────────────────────────────────────────────┘
//! ```
//!
//! Every launch that pauses playback arms four one-shot listeners tagged with
//! its [`LaunchId`]. Whichever terminal listener fires first retracts the
//! others before playback is started, so the armed set is always drained by
//! the time the coordinator is back in `Idle`.

use crate::{
    bus::{EventBus, ListenerToken},
    dialog::{Dialog, DialogPresenter, DialogRequest},
    event::{Event, EventKind},
    playback::Playback,
    resolver::TrackLabelResolver,
    source::TrackSource,
    types::*,
    Error, Result,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, instrument, warn};

/// Terminal or intermediate signal observed by an armed listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Confirmed,
    Settings,
    ActivityResumed,
    FragmentResumed,
}

impl Signal {
    fn kind(self) -> EventKind {
        match self {
            Signal::Confirmed => EventKind::DialogConfirmed,
            Signal::Settings => EventKind::DialogSettings,
            Signal::ActivityResumed => EventKind::ActivityResumed,
            Signal::FragmentResumed => EventKind::FragmentResumed,
        }
    }

    fn is_recreation(self) -> bool {
        matches!(self, Signal::ActivityResumed | Signal::FragmentResumed)
    }
}

#[derive(Debug, Clone, Copy)]
struct RecreationListeners {
    activity: ListenerToken,
    fragment: ListenerToken,
}

impl RecreationListeners {
    /// The listener that did not fire
    fn sibling_of(&self, signal: Signal) -> ListenerToken {
        match signal {
            Signal::ActivityResumed => self.fragment,
            _ => self.activity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ChoiceListeners {
    confirmed: ListenerToken,
    settings: ListenerToken,
    recreation: RecreationListeners,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    AwaitingUserChoice {
        launch: LaunchId,
        armed: ChoiceListeners,
    },
    AwaitingRecreationResume {
        launch: LaunchId,
        armed: RecreationListeners,
    },
}

impl Phase {
    fn public(&self) -> CoordinatorPhase {
        match self {
            Phase::Idle => CoordinatorPhase::Idle,
            Phase::AwaitingUserChoice { .. } => CoordinatorPhase::AwaitingUserChoice,
            Phase::AwaitingRecreationResume { .. } => CoordinatorPhase::AwaitingRecreationResume,
        }
    }

    fn launch(&self) -> Option<LaunchId> {
        match self {
            Phase::Idle => None,
            Phase::AwaitingUserChoice { launch, .. }
            | Phase::AwaitingRecreationResume { launch, .. } => Some(*launch),
        }
    }

    /// Pending-resume listeners
    fn armed(&self) -> Vec<ListenerToken> {
        match self {
            Phase::Idle => Vec::new(),
            Phase::AwaitingUserChoice { armed, .. } => vec![
                armed.confirmed,
                armed.settings,
                armed.recreation.activity,
                armed.recreation.fragment,
            ],
            Phase::AwaitingRecreationResume { armed, .. } => vec![armed.activity, armed.fragment],
        }
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    selection: SelectionState,
    phase: Phase,
    last_launch: LaunchId,
    last_dialog: Option<Dialog>,
    stats: CoordinatorStats,
}

struct Shared {
    bus: EventBus,
    playback: Arc<dyn Playback>,
    presenter: Arc<dyn DialogPresenter>,
    resolver: TrackLabelResolver,
    config: CoordinatorConfig,
    tracks_token: ListenerToken,
    state: Mutex<CoordinatorState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prepare_request(&self, selection: &SelectionState) -> Result<DialogRequest> {
        if selection.is_empty() {
            return Err(Error::EmptyTrackList);
        }
        let tracks = self.resolver.resolve_all(&selection.codes())?;
        let checked = (selection.current_index < tracks.len()).then_some(selection.current_index);

        Ok(DialogRequest {
            title: self.config.dialog_title.clone(),
            tracks,
            checked,
        })
    }

    fn arm(self: &Arc<Self>, launch: LaunchId) -> ChoiceListeners {
        let listen = |signal: Signal| {
            let weak = Arc::downgrade(self);
            self.bus.once(signal.kind(), move |_| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_signal(launch, signal);
                }
            })
        };

        ChoiceListeners {
            confirmed: listen(Signal::Confirmed),
            settings: listen(Signal::Settings),
            recreation: RecreationListeners {
                activity: listen(Signal::ActivityResumed),
                fragment: listen(Signal::FragmentResumed),
            },
        }
    }

    fn retract(&self, tokens: &[ListenerToken]) {
        for token in tokens {
            self.bus.off(*token);
        }
    }

    fn on_signal(&self, launch: LaunchId, signal: Signal) {
        let mut state = self.state();
        let phase = std::mem::take(&mut state.phase);

        let resume = match phase {
            Phase::AwaitingUserChoice { launch: current, armed } if current == launch => match signal {
                Signal::Confirmed => {
                    self.retract(&[
                        armed.settings,
                        armed.recreation.activity,
                        armed.recreation.fragment,
                    ]);
                    true
                }
                Signal::Settings => {
                    self.retract(&[armed.confirmed]);
                    state.phase = Phase::AwaitingRecreationResume {
                        launch,
                        armed: armed.recreation,
                    };
                    info!(launch = %launch, "Dialog host leaving, waiting for recreation");
                    false
                }
                Signal::ActivityResumed | Signal::FragmentResumed => {
                    self.retract(&[
                        armed.confirmed,
                        armed.settings,
                        armed.recreation.sibling_of(signal),
                    ]);
                    true
                }
            },
            Phase::AwaitingRecreationResume { launch: current, armed }
                if current == launch && signal.is_recreation() =>
            {
                self.retract(&[armed.sibling_of(signal)]);
                true
            }
            other => {
                state.phase = other;
                state.stats.invariant_violations += 1;
                let violation = Error::DoubleResumeAttempt { launch };
                error!(
                    code = violation.error_code(),
                    via = %signal.kind(),
                    error = %violation,
                    "Stale resume listener fired, ignoring"
                );
                false
            }
        };

        if resume {
            state.stats.resumes += 1;
            drop(state);
            self.playback.start();
            info!(launch = %launch, via = %signal.kind(), "Playback resumed");
        }
    }

    fn apply_tracks(&self, codes: &[String], selected: Option<String>) {
        let tracks = codes.iter().map(|code| self.resolver.track_for(code)).collect();
        let mut state = self.state();
        state.selection.apply_tracks(tracks, selected);
        debug!(
            tracks = ?codes,
            selected = ?state.selection.selected_id,
            current_index = state.selection.current_index,
            "Audio tracks updated"
        );
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.bus.off(self.tracks_token);
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for token in state.phase.armed() {
            self.bus.off(token);
        }
    }
}

/// Drives the audio track dialog for one video view
pub struct AudioTrackCoordinator {
    shared: Arc<Shared>,
}

impl AudioTrackCoordinator {
    /// Create a coordinator and subscribe it to `AUDIO_TRACKS` on `bus`
    pub fn new(
        bus: EventBus,
        playback: Arc<dyn Playback>,
        presenter: Arc<dyn DialogPresenter>,
        config: CoordinatorConfig,
    ) -> Self {
        let resolver = TrackLabelResolver::builtin().extend(config.extra_labels.clone());

        let shared = Arc::new_cyclic(|weak: &std::sync::Weak<Shared>| {
            let weak = weak.clone();
            let tracks_token = bus.on(EventKind::AudioTracks, move |event| {
                if let (Some(shared), Event::AudioTracks { tracks, selected }) = (weak.upgrade(), event) {
                    shared.apply_tracks(tracks, selected.clone());
                }
            });

            Shared {
                bus,
                playback,
                presenter,
                resolver,
                config,
                tracks_token,
                state: Mutex::new(CoordinatorState::default()),
            }
        });

        Self { shared }
    }

    /// Open the track dialog.
    ///
    /// Pauses playback and arms the resume listeners when playback is running.
    /// A sequence already in flight is kept while playback stays paused; if
    /// playback was restarted in the meantime its listeners are replaced by a
    /// fresh launch. Fails without touching playback when the track list is
    /// empty or a code has no label.
    #[instrument(skip(self))]
    pub fn launch(&self) -> Result<Dialog> {
        let shared = &self.shared;

        let (request, in_flight) = {
            let mut state = shared.state();
            match shared.prepare_request(&state.selection) {
                Ok(request) => (request, state.phase.launch()),
                Err(e) => {
                    state.stats.aborted_launches += 1;
                    match e {
                        Error::EmptyTrackList => debug!("No audio tracks, dialog not shown"),
                        _ => warn!(code = e.error_code(), error = %e, "Audio track dialog not shown"),
                    }
                    return Err(e);
                }
            }
        };

        match in_flight {
            Some(stale) if shared.playback.is_playing() => {
                shared.playback.pause();

                let mut state = shared.state();
                let stale_armed = std::mem::take(&mut state.phase).armed();
                shared.retract(&stale_armed);
                let launch = state.last_launch.next();
                state.last_launch = launch;
                let armed = shared.arm(launch);
                state.phase = Phase::AwaitingUserChoice { launch, armed };
                info!(launch = %launch, replaces = %stale, "Playback restarted mid-sequence, paused again");
            }
            Some(launch) => {
                debug!(launch = %launch, "Sequence already in flight, re-showing dialog");
            }
            None if shared.playback.is_playing() => {
                shared.playback.pause();

                let mut state = shared.state();
                let launch = state.last_launch.next();
                state.last_launch = launch;
                let armed = shared.arm(launch);
                state.phase = Phase::AwaitingUserChoice { launch, armed };
                info!(launch = %launch, "Playback paused for audio track selection");
            }
            None => {
                debug!("Playback not running, dialog shown without resume");
            }
        }

        let dialog = shared.presenter.build_and_show(&request);

        let mut state = shared.state();
        state.stats.launches += 1;
        state.last_dialog = Some(dialog.clone());

        Ok(dialog)
    }

    /// Record a choice made in the dialog.
    ///
    /// Emits `AudioTrackSelected`; never resumes playback.
    #[instrument(skip(self))]
    pub fn on_choice(&self, index: usize) -> Result<Track> {
        let track = {
            let mut state = self.shared.state();
            state.selection.select(index)?.clone()
        };

        debug!(index, code = %track.id, "Audio track chosen");
        self.shared.bus.emit(&Event::AudioTrackSelected {
            index,
            code: track.id.clone(),
        });

        Ok(track)
    }

    /// Pull the track list from a catalog adapter
    pub fn refresh_from(&self, source: &dyn TrackSource) {
        self.shared.apply_tracks(&source.tracks(), source.selected_id());
    }

    /// Currently checked track
    pub fn current_selection(&self) -> Option<Track> {
        self.shared.state().selection.current().cloned()
    }

    pub fn selection(&self) -> SelectionState {
        self.shared.state().selection.clone()
    }

    pub fn phase(&self) -> CoordinatorPhase {
        self.shared.state().phase.public()
    }

    /// Launch currently in flight
    pub fn current_launch(&self) -> Option<LaunchId> {
        self.shared.state().phase.launch()
    }

    /// Listeners still armed for the in-flight launch
    pub fn pending_resume(&self) -> Vec<ListenerToken> {
        self.shared.state().phase.armed()
    }

    pub fn last_dialog(&self) -> Option<Dialog> {
        self.shared.state().last_dialog.clone()
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.shared.state().stats.clone()
    }

    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    pub fn resolver(&self) -> &TrackLabelResolver {
        &self.shared.resolver
    }
}

impl std::fmt::Debug for AudioTrackCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state();
        f.debug_struct("AudioTrackCoordinator")
            .field("phase", &state.phase)
            .field("selection", &state.selection)
            .field("stats", &state.stats)
            .finish()
    }
}
