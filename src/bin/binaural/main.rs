//! binaural - terminal binaural beat generator
//!
//! Run with: cargo run -- [--config session.toml] [--bpm 90] [--log-file binaural.log]
//! Offline:  cargo run -- --bounce out.wav --seconds 30

mod app;
mod bounce;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::Level;

use app::Binaural;
use binaural_dsp::EngineConfig;

#[derive(Debug, Parser)]
#[command(name = "binaural", version, about = "Phase-locked binaural beat generator")]
struct Args {
    /// TOML session file (channels, ratios, guard settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the starting tempo
    #[arg(long)]
    bpm: Option<f64>,

    /// Override the root frequency in Hz
    #[arg(long)]
    root: Option<f64>,

    /// Write the interactive session log here (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Render offline to a WAV file instead of opening the TUI
    #[arg(long, value_name = "WAV")]
    bounce: Option<PathBuf>,

    /// Length of the offline render
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Sample rate of the offline render
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(bpm) = args.bpm {
        config.bpm = bpm;
    }
    if let Some(root) = args.root {
        config.root_hz = root;
    }
    config.validate()?;

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    if let Some(path) = &args.bounce {
        // No terminal UI to corrupt, so log straight to stderr.
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
        return bounce::render(config, path, args.seconds, args.sample_rate);
    }

    if let Some(path) = &args.log_file {
        let log = File::create(path)
            .wrap_err_with(|| format!("failed to create {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(log))
            .init();
    }

    Binaural::new(config).run()
}
