#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Grid Defence headlessly.
//!
//! The grid is drawn to stdout as ASCII art while logs go to stderr.

mod settings;
mod text;

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use grid_defence_core::config::GameConfig;
use grid_defence_simulation::Simulation;
use grid_defence_world::query;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::text::TextBackend;

/// Command-line arguments accepted by the Grid Defence binary.
#[derive(Debug, Parser)]
#[command(name = "grid-defence")]
#[command(about = "Headless grid tower-defence simulation")]
#[command(version)]
struct Cli {
    /// TOML settings file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(short, long, default_value = "2000")]
    frames: u64,

    /// Ticks between automatic enemy spawns, overriding the settings file.
    #[arg(long)]
    spawn_interval: Option<u64>,

    /// Maximum number of automatic spawns, overriding the settings file.
    #[arg(long)]
    spawn_limit: Option<u32>,

    /// Draw the grid every N frames; 0 only prints the summary.
    #[arg(short, long, default_value = "0")]
    render_every: u64,

    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    /// Enable debug logging when RUST_LOG is not set.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => settings::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(interval) = self.spawn_interval {
            config.spawning.interval_ticks = interval;
        }
        if let Some(limit) = self.spawn_limit {
            config.spawning.limit = Some(limit);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = cli.game_config()?;
    if cli.dump_config {
        print!("{}", settings::render(&config)?);
        return Ok(());
    }

    let mut simulation = Simulation::new(&config)?;
    info!("{}", query::welcome_banner(simulation.world()));

    let mut backend = TextBackend::new(io::stdout().lock(), cli.render_every);
    let summary = simulation.run(cli.frames, &mut backend, |_| Vec::new())?;
    drop(backend);

    info!(
        frames = summary.frames,
        spawned = summary.spawned,
        died = summary.died,
        escaped = summary.escaped,
        life = summary.player_life,
        "simulation finished"
    );
    println!(
        "{} frames: {} spawned, {} died, {} escaped, life {}",
        summary.frames, summary.spawned, summary.died, summary.escaped, summary.player_life
    );
    Ok(())
}
