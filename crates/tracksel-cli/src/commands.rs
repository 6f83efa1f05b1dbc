//! CLI command implementations

use crate::output;
use crate::script::{Script, Step};
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracksel_core::{
    AudioTrackCoordinator, CoordinatorConfig, CoordinatorPhase, CoordinatorStats, EventBus,
    LoggingPresenter, Playback, SimulatedPlayback, Track, TrackLabelResolver,
};

/// Load the coordinator config, or defaults when no path is given
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<CoordinatorConfig> {
    let Some(path) = path else {
        return Ok(CoordinatorConfig::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = CoordinatorConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!(path = %path.display(), extra_labels = config.extra_labels.len(), "Config loaded");
    Ok(config)
}

fn resolver_for(config: &CoordinatorConfig) -> TrackLabelResolver {
    TrackLabelResolver::builtin().extend(config.extra_labels.clone())
}

#[derive(Serialize)]
struct LabelEntry<'a> {
    code: &'a str,
    label: &'a str,
}

/// List known track codes
pub fn labels(config: &CoordinatorConfig, format: &str) -> anyhow::Result<()> {
    let resolver = resolver_for(config);
    let entries: Vec<LabelEntry> = resolver
        .entries()
        .map(|(code, label)| LabelEntry { code, label })
        .collect();

    output::emit(&entries, format, |entries| {
        println!("Known audio track codes:");
        for entry in entries {
            println!("  {:<8} {}", entry.code, entry.label);
        }
    });
    Ok(())
}

/// Resolve a batch of codes the way the dialog does
pub fn resolve(codes: &[String], config: &CoordinatorConfig, format: &str) -> anyhow::Result<()> {
    let resolver = resolver_for(config);
    let tracks = resolver.resolve_all(codes)?;

    output::emit(&tracks, format, |tracks| {
        for (i, track) in tracks.iter().enumerate() {
            println!("  {}. {}", i + 1, track);
        }
    });
    Ok(())
}

/// Outcome of one script step
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: String,
    pub outcome: String,
    pub phase: CoordinatorPhase,
    pub playing: bool,
    pub pending_resume: usize,
}

/// Result of a scripted session
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub steps: Vec<StepRecord>,
    pub phase: CoordinatorPhase,
    pub playing: bool,
    pub selection: Option<Track>,
    pub stats: CoordinatorStats,
    pub pauses: u64,
    pub starts: u64,
}

impl SessionReport {
    /// Problems a clean session must not have
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.phase != CoordinatorPhase::Idle {
            problems.push(format!("session ended in phase {}", self.phase));
        }
        if self.stats.invariant_violations > 0 {
            problems.push(format!(
                "{} stale resume signal(s) observed",
                self.stats.invariant_violations
            ));
        }
        problems
    }
}

/// Play a script against a fresh coordinator
pub fn play_script(script: &Script, config: CoordinatorConfig) -> SessionReport {
    let bus = EventBus::new();
    let playback = Arc::new(SimulatedPlayback::new(script.playing));
    let coordinator = AudioTrackCoordinator::new(
        bus.clone(),
        playback.clone(),
        Arc::new(LoggingPresenter),
        config,
    );

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match step {
            Step::Emit { event } => {
                let delivered = bus.emit(event);
                format!("delivered to {} listener(s)", delivered)
            }
            Step::Launch => match coordinator.launch() {
                Ok(dialog) => format!("dialog shown with {} item(s)", dialog.items.len()),
                Err(e) => {
                    warn!(step = index, error = %e, "Launch failed");
                    format!("launch aborted: {}", e)
                }
            },
            Step::Choose { index: choice } => match coordinator.on_choice(*choice) {
                Ok(track) => format!("chose {}", track),
                Err(e) => format!("choice rejected: {}", e),
            },
            Step::Play => {
                playback.start();
                "playback started".to_string()
            }
            Step::Pause => {
                playback.pause();
                "playback paused".to_string()
            }
        };

        info!(step = index, action = %step, outcome = %outcome, phase = %coordinator.phase(), "Step");
        steps.push(StepRecord {
            index,
            step: step.to_string(),
            outcome,
            phase: coordinator.phase(),
            playing: playback.is_playing(),
            pending_resume: coordinator.pending_resume().len(),
        });
    }

    SessionReport {
        steps,
        phase: coordinator.phase(),
        playing: playback.is_playing(),
        selection: coordinator.current_selection(),
        stats: coordinator.stats(),
        pauses: playback.pauses(),
        starts: playback.starts(),
    }
}

/// Run a script file
pub async fn run(
    script_path: &Path,
    config: CoordinatorConfig,
    strict: bool,
    format: &str,
) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(script_path)
        .await
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let script = Script::from_json(&json)
        .with_context(|| format!("parsing script {}", script_path.display()))?;

    info!(path = %script_path.display(), steps = script.steps.len(), "Running script");
    let report = play_script(&script, config);

    output::emit(&report, format, |report| {
        println!("Session: {}", script_path.display());
        for record in &report.steps {
            println!(
                "  {:>2}. {:<28} {:<40} [{}{}]",
                record.index + 1,
                record.step,
                record.outcome,
                record.phase,
                if record.playing { ", playing" } else { "" }
            );
        }
        println!();
        println!("  Phase:       {}", report.phase);
        println!("  Playing:     {}", report.playing);
        match &report.selection {
            Some(track) => println!("  Selection:   {}", track),
            None => println!("  Selection:   -"),
        }
        println!("  Pauses:      {}", report.pauses);
        println!("  Starts:      {}", report.starts);
        println!("  Resumes:     {}", report.stats.resumes);
        println!("  Aborted:     {}", report.stats.aborted_launches);
    });

    let problems = report.problems();
    if strict && !problems.is_empty() {
        bail!("session check failed: {}", problems.join("; "));
    }
    for problem in problems {
        warn!("{}", problem);
    }

    Ok(())
}
