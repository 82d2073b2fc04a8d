//! Game configuration document.
//!
//! The document is deserialized by the storage adapter; this module only
//! describes its shape and the defaults for optional fields.

use serde::{Deserialize, Serialize};

const DEFAULT_COIN_SIZE: u32 = 30;
const DEFAULT_POWER_UP_SIZE: u32 = 40;

/// Screen dimensions, entity sizes and the selectable difficulty levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playfield width in screen units.
    pub screen_width: u32,
    /// Playfield height in screen units.
    pub screen_height: u32,
    /// Edge length of the player's hitbox.
    pub player_size: u32,
    /// Horizontal extent of every obstacle pair.
    pub obstacle_width: u32,
    /// Edge length of a hazard's hitbox.
    pub hazard_size: u32,
    /// Edge length of a coin.
    #[serde(default = "default_coin_size")]
    pub coin_size: u32,
    /// Edge length of power-up pickups and fired projectiles.
    #[serde(default = "default_power_up_size")]
    pub power_up_size: u32,
    /// Difficulty levels, selected by index.
    pub levels: Vec<LevelConfig>,
}

impl GameConfig {
    /// Looks up the level at `index`.
    #[must_use]
    pub fn level(&self, index: LevelIndex) -> Option<&LevelConfig> {
        self.levels.get(index.get() as usize)
    }

    /// Number of configured levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Smallest gap an obstacle may be generated with before the generator's margin.
    #[must_use]
    pub fn min_gap_size(&self) -> u32 {
        self.player_size + 20
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            player_size: 40,
            obstacle_width: 80,
            hazard_size: 40,
            coin_size: DEFAULT_COIN_SIZE,
            power_up_size: DEFAULT_POWER_UP_SIZE,
            levels: vec![
                LevelConfig {
                    name: "Easy".to_string(),
                    gravity: 0.4,
                    boost_strength: -7.5,
                    obstacle_speed: 3.0,
                    gap_size: 260,
                    obstacle_spacing: 320,
                    hazard_spawn_interval: 240,
                    hazard_speed: 3.5,
                },
                LevelConfig {
                    name: "Medium".to_string(),
                    gravity: 0.5,
                    boost_strength: -8.0,
                    obstacle_speed: 4.0,
                    gap_size: 235,
                    obstacle_spacing: 300,
                    hazard_spawn_interval: 180,
                    hazard_speed: 4.5,
                },
                LevelConfig {
                    name: "Hard".to_string(),
                    gravity: 0.6,
                    boost_strength: -8.5,
                    obstacle_speed: 5.0,
                    gap_size: 210,
                    obstacle_spacing: 280,
                    hazard_spawn_interval: 120,
                    hazard_speed: 5.5,
                },
            ],
        }
    }
}

/// Physics and pacing parameters of a single difficulty level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display name.
    pub name: String,
    /// Downward acceleration per tick once motion is enabled.
    pub gravity: f32,
    /// Vertical velocity assigned by a boost; negative values move upward.
    pub boost_strength: f32,
    /// Leftward speed of obstacles and pickups, in units per tick.
    pub obstacle_speed: f32,
    /// Requested gap between an obstacle pair's segments.
    pub gap_size: u32,
    /// Minimum horizontal distance between consecutive obstacle pairs.
    pub obstacle_spacing: u32,
    /// Ticks between hazard spawns.
    pub hazard_spawn_interval: u32,
    /// Leftward speed of hazards, in units per tick.
    pub hazard_speed: f32,
}

/// Index of a configured difficulty level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelIndex(u32);

impl LevelIndex {
    /// Creates a level index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

fn default_coin_size() -> u32 {
    DEFAULT_COIN_SIZE
}

fn default_power_up_size() -> u32 {
    DEFAULT_POWER_UP_SIZE
}
