//! Cutline CLI: command-line front end for the timeline engine.
//!
//! Usage:
//!   cutline info                 Show the project, tracks, and clips
//!   cutline resolve --at <SECS>  Show the active clips at a time
//!   cutline resolve --px <X>     Press the pointer on the timeline grid
//!   cutline play [--from SECS]   Play the timeline in real time
//!   cutline replay <SCRIPT>      Apply a JSON command script
//!   cutline generate <PROMPT>    Add generated media clips
//!   cutline config               Show or write the configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cutline_common::config::EditorConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "cutline",
    about = "Timeline and playback engine for media composition",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from an empty project instead of the sample project
    #[arg(long, global = true)]
    empty: bool,

    /// Command script applied before the subcommand runs
    #[arg(long, global = true)]
    script: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show project information
    Info,

    /// Show which clips are active at a time or under a pointer press
    Resolve {
        /// Playhead position in seconds
        #[arg(long, conflicts_with = "px")]
        at: Option<f64>,

        /// Pointer x in screen pixels (track headers included)
        #[arg(long)]
        px: Option<f64>,

        /// Zero-based track row the pointer is on (ruler when absent)
        #[arg(long, requires = "px")]
        row: Option<usize>,
    },

    /// Play the timeline in real time until it stops
    Play {
        /// Start position in seconds
        #[arg(long, default_value = "0.0")]
        from: f64,

        /// Stop after this many wall-clock seconds
        #[arg(long)]
        limit: Option<f64>,

        /// Status line interval in milliseconds
        #[arg(long, default_value = "250")]
        report_ms: u64,
    },

    /// Apply a JSON command script and report each step
    Replay {
        /// Path to the script (a JSON array of commands)
        path: PathBuf,
    },

    /// Add generated image and caption clips for a prompt
    Generate {
        /// What to generate
        prompt: String,

        /// Skip the caption clip
        #[arg(long)]
        no_caption: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration back to disk
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EditorConfig::load(),
    };
    config.validate().context("Invalid configuration")?;

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    cutline_common::logging::init_logging(&logging).context("Failed to initialize logging")?;

    let base = commands::ProjectSource {
        empty: cli.empty,
        script: cli.script,
    };

    match cli.command {
        Commands::Info => commands::info::run(&config, &base),
        Commands::Resolve { at, px, row } => commands::resolve::run(&config, &base, at, px, row),
        Commands::Play {
            from,
            limit,
            report_ms,
        } => commands::play::run(&config, &base, from, limit, report_ms).await,
        Commands::Replay { path } => commands::replay::run(&config, &base, path),
        Commands::Generate { prompt, no_caption } => {
            commands::generate::run(&config, &base, prompt, !no_caption).await
        }
        Commands::Config { write } => commands::config::run(&config, cli.config, write),
    }
}
