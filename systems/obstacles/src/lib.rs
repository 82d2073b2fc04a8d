#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Obstacle generator that keeps the playfield supplied with obstacle pairs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_dash_core::{Command, Event, GameConfig, LevelConfig, ObstaclePair, ObstacleSnapshot};

/// Extra room added on top of the minimum gap before a gap request is honoured.
pub const GAP_MARGIN: u32 = 20;

/// Builds an obstacle pair at `x` with a randomly centred gap.
///
/// The effective gap is `max(gap_size, min_gap_size + GAP_MARGIN)`. Its centre
/// is drawn uniformly from `[gap, screen_height - gap]`, collapsing to the
/// middle of the screen when that range is empty.
pub fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    x: f32,
    width: f32,
    screen_height: u32,
    gap_size: u32,
    min_gap_size: u32,
) -> ObstaclePair {
    let gap = gap_size.max(min_gap_size.saturating_add(GAP_MARGIN));
    let upper = screen_height.saturating_sub(gap);
    let centre = if gap <= upper {
        rng.gen_range(gap..=upper)
    } else {
        screen_height / 2
    };

    let half = gap / 2;
    let top_height = centre.saturating_sub(half);
    let bottom_y = centre.saturating_add(half);
    ObstaclePair::new(
        x,
        width,
        top_height as f32,
        bottom_y as f32,
        screen_height as f32,
    )
}

/// Configuration parameters required to construct the obstacle generator.
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

/// Pure system that emits obstacle spawn commands as the course scrolls.
#[derive(Debug)]
pub struct ObstacleGenerator {
    rng: ChaCha8Rng,
}

impl ObstacleGenerator {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits at most one spawn command per batch of events containing a tick.
    ///
    /// A pair spawns at the right edge when none exist or when the rightmost
    /// pair has scrolled further than the level's spacing from that edge.
    pub fn handle(
        &mut self,
        events: &[Event],
        obstacles: &[ObstacleSnapshot],
        config: &GameConfig,
        level: &LevelConfig,
        out: &mut Vec<Command>,
    ) {
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !ticked {
            return;
        }

        let screen_width = config.screen_width as f32;
        let rightmost = obstacles
            .iter()
            .map(|snapshot| snapshot.pair.x())
            .fold(None, |best: Option<f32>, x| Some(best.map_or(x, |b| b.max(x))));
        let due = match rightmost {
            None => true,
            Some(x) => x < screen_width - level.obstacle_spacing as f32,
        };
        if !due {
            return;
        }

        let obstacle = spawn(
            &mut self.rng,
            screen_width,
            config.obstacle_width as f32,
            config.screen_height,
            level.gap_size,
            config.min_gap_size(),
        );
        tracing::trace!(
            gap_top = obstacle.gap().top(),
            gap_bottom = obstacle.gap().bottom(),
            "obstacle pair generated"
        );
        out.push(Command::SpawnObstacle { obstacle });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_gap_request_is_raised_to_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..64 {
            let pair = spawn(&mut rng, 800.0, 80.0, 600, 10, 60);
            assert!(pair.gap().height() >= 80.0);
            assert!(pair.top_height() >= 40.0);
        }
    }

    #[test]
    fn oversized_gap_collapses_to_screen_middle() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pair = spawn(&mut rng, 800.0, 80.0, 600, 400, 60);
        assert_eq!(pair.top_height(), 100.0);
        assert_eq!(pair.bottom_y(), 500.0);
        assert_eq!(pair.bottom_height(), 100.0);
    }
}
