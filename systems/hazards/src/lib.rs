#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting hazard spawn commands.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_dash_core::{Command, Event, LevelConfig};

/// Distance kept between a freshly spawned hazard and the top or bottom edge.
pub const SPAWN_EDGE_MARGIN: u32 = 50;

/// Configuration parameters required to construct the hazard spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    screen_height: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for a playfield of `screen_height` units.
    #[must_use]
    pub const fn new(screen_height: u32, rng_seed: u64) -> Self {
        Self {
            screen_height,
            rng_seed,
        }
    }
}

/// Pure system that emits a hazard every `hazard_spawn_interval` ticks.
#[derive(Debug)]
pub struct HazardSpawning {
    screen_height: u32,
    elapsed_ticks: u32,
    rng: ChaCha8Rng,
}

impl HazardSpawning {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            screen_height: config.screen_height,
            elapsed_ticks: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events to emit spawn commands for the active level.
    pub fn handle(&mut self, events: &[Event], level: &LevelConfig, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::SessionStarted { .. } => self.elapsed_ticks = 0,
                Event::TimeAdvanced { .. } => {
                    self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
                    if level.hazard_spawn_interval > 0
                        && self.elapsed_ticks >= level.hazard_spawn_interval
                    {
                        self.elapsed_ticks = 0;
                        let y = self.spawn_height();
                        out.push(Command::SpawnHazard { y });
                    }
                }
                _ => {}
            }
        }
    }

    fn spawn_height(&mut self) -> f32 {
        let upper = self.screen_height.saturating_sub(SPAWN_EDGE_MARGIN);
        if SPAWN_EDGE_MARGIN > upper {
            return (self.screen_height / 2) as f32;
        }
        self.rng.gen_range(SPAWN_EDGE_MARGIN..=upper) as f32
    }
}
