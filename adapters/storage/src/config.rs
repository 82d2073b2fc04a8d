use std::{
    fs,
    path::{Path, PathBuf},
};

use sky_dash_core::GameConfig;
use thiserror::Error;

/// Errors raised while loading the game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {}", path.display())]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML or does not match the expected shape.
    #[error("malformed configuration document")]
    Parse(#[from] toml::de::Error),
    /// The playfield has no area.
    #[error("screen dimensions must be positive, got {width}x{height}")]
    InvalidScreen {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// An entity size is zero.
    #[error("`{field}` must be positive")]
    InvalidSize {
        /// Name of the offending field.
        field: &'static str,
    },
    /// No difficulty level is configured.
    #[error("configuration must define at least one level")]
    NoLevels,
    /// A level carries parameters the simulation cannot run with.
    #[error("level `{name}`: {reason}")]
    InvalidLevel {
        /// Display name of the level.
        name: String,
        /// Description of the problem.
        reason: &'static str,
    },
}

/// Reads, parses and validates the configuration at `path`.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let document = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&document)
}

/// Parses and validates a configuration document.
pub fn parse_config(document: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = toml::from_str(document)?;
    validate(&config)?;
    Ok(config)
}

/// Checks that `config` describes a playable game.
pub fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    if config.screen_width == 0 || config.screen_height == 0 {
        return Err(ConfigError::InvalidScreen {
            width: config.screen_width,
            height: config.screen_height,
        });
    }

    for (field, value) in [
        ("player_size", config.player_size),
        ("obstacle_width", config.obstacle_width),
        ("hazard_size", config.hazard_size),
        ("coin_size", config.coin_size),
        ("power_up_size", config.power_up_size),
    ] {
        if value == 0 {
            return Err(ConfigError::InvalidSize { field });
        }
    }

    if config.levels.is_empty() {
        return Err(ConfigError::NoLevels);
    }

    for level in &config.levels {
        let reason = if level.obstacle_speed <= 0.0 {
            Some("obstacle_speed must be positive")
        } else if level.hazard_speed <= 0.0 {
            Some("hazard_speed must be positive")
        } else if level.gravity < 0.0 {
            Some("gravity must not be negative")
        } else if level.boost_strength >= 0.0 {
            Some("boost_strength must be negative (upward)")
        } else if level.gap_size >= config.screen_height {
            Some("gap_size must be smaller than screen_height")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ConfigError::InvalidLevel {
                name: level.name.clone(),
                reason,
            });
        }
    }

    Ok(())
}
