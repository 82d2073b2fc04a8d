#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pickup placement system.
//!
//! Three tick counters decide when a single coin, a coin cluster or a
//! power-up is due. Each due item is handed to the [`planner`], and a spawn
//! command is emitted only when the planner accepts a position.

pub mod planner;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_dash_core::{Command, Event, GameConfig, PickupKind, PlayfieldView};

use crate::planner::{PlacementContext, PlacementRequest};

/// Ticks between single-coin placement attempts.
pub const COIN_INTERVAL: u32 = 120;
/// Ticks between coin-cluster placement attempts.
pub const CLUSTER_INTERVAL: u32 = 300;
/// Ticks between power-up placement attempts.
pub const POWER_UP_INTERVAL: u32 = 400;

const SINGLE_ATTEMPTS: u32 = 40;
const SINGLE_EDGE_MARGIN: u32 = 150;
const CLUSTER_ATTEMPTS: u32 = 20;
const CLUSTER_EDGE_MARGIN: u32 = 200;
const CLUSTER_MIN_COINS: u32 = 3;
const CLUSTER_MAX_COINS: u32 = 5;
const CLUSTER_GAP: u32 = 15;

/// Configuration parameters required to construct the placement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeded with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Due {
    Coin,
    Cluster,
    PowerUp,
}

/// Pure system that emits pickup spawn commands on fixed tick cadences.
#[derive(Debug)]
pub struct PickupPlacement {
    coin_ticks: u32,
    cluster_ticks: u32,
    power_up_ticks: u32,
    consecutive_declines: u32,
    rng: ChaCha8Rng,
}

impl PickupPlacement {
    /// Creates a new placement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            coin_ticks: 0,
            cluster_ticks: 0,
            power_up_ticks: 0,
            consecutive_declines: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Number of due placements in a row that found no accepted position.
    #[must_use]
    pub fn consecutive_declines(&self) -> u32 {
        self.consecutive_declines
    }

    /// Consumes events and the current playfield to emit pickup spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        view: &PlayfieldView,
        config: &GameConfig,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::SessionStarted { .. } => self.reset(),
                Event::TimeAdvanced { .. } => {
                    for due in self.advance_timers() {
                        self.place(due, view, config, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn reset(&mut self) {
        self.coin_ticks = 0;
        self.cluster_ticks = 0;
        self.power_up_ticks = 0;
        self.consecutive_declines = 0;
    }

    fn advance_timers(&mut self) -> Vec<Due> {
        let mut due = Vec::new();
        for (ticks, interval, kind) in [
            (&mut self.coin_ticks, COIN_INTERVAL, Due::Coin),
            (&mut self.cluster_ticks, CLUSTER_INTERVAL, Due::Cluster),
            (&mut self.power_up_ticks, POWER_UP_INTERVAL, Due::PowerUp),
        ] {
            *ticks += 1;
            if *ticks >= interval {
                *ticks = 0;
                due.push(kind);
            }
        }
        due
    }

    fn place(&mut self, due: Due, view: &PlayfieldView, config: &GameConfig, out: &mut Vec<Command>) {
        let coin_size = config.coin_size as f32;
        let (kind, request) = match due {
            Due::Coin => (
                PickupKind::Coin,
                PlacementRequest::single(coin_size, SINGLE_ATTEMPTS, SINGLE_EDGE_MARGIN),
            ),
            Due::Cluster => {
                let count = self.rng.gen_range(CLUSTER_MIN_COINS..=CLUSTER_MAX_COINS);
                let spacing = (config.coin_size + CLUSTER_GAP) as f32;
                (
                    PickupKind::Coin,
                    PlacementRequest::cluster(
                        coin_size,
                        count,
                        spacing,
                        CLUSTER_ATTEMPTS,
                        CLUSTER_EDGE_MARGIN,
                    ),
                )
            }
            Due::PowerUp => (
                PickupKind::PowerUp,
                PlacementRequest::single(
                    config.power_up_size as f32,
                    SINGLE_ATTEMPTS,
                    SINGLE_EDGE_MARGIN,
                ),
            ),
        };

        let context = PlacementContext {
            screen_height: view.screen_height,
            spawn_x: view.screen_width,
            player_size: config.player_size as f32,
            obstacles: &view.obstacles,
            hazards: &view.hazards,
        };

        match planner::plan(&request, &context, &mut self.rng) {
            Some(placement) => {
                self.consecutive_declines = 0;
                tracing::trace!(
                    ?kind,
                    count = request.count(),
                    y = placement.centre.y(),
                    phase = ?placement.phase,
                    "pickup placed"
                );
                out.push(Command::SpawnPickups {
                    kind,
                    positions: placement.members,
                });
            }
            None => {
                self.consecutive_declines = self.consecutive_declines.saturating_add(1);
                tracing::debug!(
                    ?kind,
                    count = request.count(),
                    consecutive = self.consecutive_declines,
                    "no safe position found; skipping pickup spawn"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_on_their_own_cadence() {
        let mut placement = PickupPlacement::new(Config::new(0));
        let mut fired = Vec::new();
        for _ in 0..1200 {
            fired.extend(placement.advance_timers());
        }

        let count = |kind: Due| fired.iter().filter(|due| **due == kind).count();
        assert_eq!(count(Due::Coin), 10);
        assert_eq!(count(Due::Cluster), 4);
        assert_eq!(count(Due::PowerUp), 3);
    }
}
