#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! File-backed configuration and persisted player records.
//!
//! Configuration is a TOML document that must be valid for the game to start.
//! Records (high score and audio settings) are small JSON files that fall back
//! to defaults when missing or unreadable.

mod config;
mod records;

pub use config::{load_config, parse_config, validate, ConfigError};
pub use records::{
    AudioSettings, RecordStore, StorageError, VolumeControl, DEFAULT_VOLUME, HIGH_SCORE_FILE,
    SETTINGS_FILE,
};
