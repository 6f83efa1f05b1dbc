//! Tracksel CLI - Audio track selection harness
//!
//! Features:
//! - List the known audio track codes and labels
//! - Resolve a batch of codes the way the track dialog does
//! - Replay scripted host sessions (dialog, rotation, settings) against
//!   the coordinator and report pauses, resumes and leftover listeners

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;
mod script;

/// Tracksel CLI - Audio track selection toolkit
#[derive(Parser)]
#[command(name = "tracksel")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Audio track dialog coordination harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Coordinator config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known track codes
    Labels,

    /// Resolve track codes to labels
    Resolve {
        /// Track codes, in catalog order
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Replay a host session script
    Run {
        /// Path to the JSON script
        script: PathBuf,

        /// Fail if the session ends with a resume pending
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    tracksel_core::init();
    let config = commands::load_config(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Labels => {
            commands::labels(&config, &cli.format)?;
        }
        Commands::Resolve { codes } => {
            commands::resolve(&codes, &config, &cli.format)?;
        }
        Commands::Run { script, strict } => {
            commands::run(&script, config, strict, &cli.format).await?;
        }
    }

    Ok(())
}
