#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Sky Dash experience.

mod simulation;

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use sky_dash_core::LevelIndex;
use sky_dash_rendering::{Color, FrameSimulationBreakdown, Presentation, RenderingBackend};
use sky_dash_rendering_macroquad::MacroquadBackend;
use sky_dash_storage::{load_config, RecordStore};
use tracing_subscriber::EnvFilter;

use self::simulation::Simulation;

/// Command-line arguments accepted by the Sky Dash binary.
#[derive(Debug, Parser)]
#[command(name = "sky-dash", about = "Side-scrolling arcade flyer", version)]
struct CliArgs {
    /// Game configuration document.
    #[arg(long, value_name = "PATH", default_value = "config/game.toml")]
    config: PathBuf,
    /// Directory holding the high score and audio settings.
    #[arg(long, value_name = "DIR", default_value = ".")]
    data_dir: PathBuf,
    /// Zero-based level selected at startup.
    #[arg(long, value_name = "INDEX")]
    level: Option<u32>,
    /// Seed for obstacle, hazard and pickup generation; random when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Draw primitive shapes instead of loading sprites.
    #[arg(long)]
    no_sprites: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Sky Dash command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, data_dir = %args.data_dir.display(), "starting sky dash");

    let mut simulation = Simulation::new(config, seed, RecordStore::new(&args.data_dir));
    if let Some(level) = args.level {
        simulation.select_level(LevelIndex::new(level));
    }

    let scene = simulation
        .scene()
        .context("failed to describe the playfield")?;
    let title = scene.banner.clone();
    let presentation = Presentation::new(title, Color::from_rgb_u8(135, 206, 235), scene);
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync || !args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);

    backend.run(presentation, move |frame_time, input, scene| {
        let simulation_start = Instant::now();
        simulation.handle_input(&input);
        let _ = simulation.advance(frame_time);
        let simulation_time = simulation_start.elapsed();

        let population_start = Instant::now();
        simulation.populate_scene(scene);
        FrameSimulationBreakdown::new(simulation_time, population_start.elapsed())
    })
}
