use std::{fs, io, path::PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// File name of the persisted high score.
pub const HIGH_SCORE_FILE: &str = "high_score.json";

/// File name of the persisted audio settings.
pub const SETTINGS_FILE: &str = "settings.json";

/// Volume used when no settings have been saved.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Errors raised while writing persisted records.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The record could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// Location that was written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The record could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The record is not valid JSON of the expected shape.
    #[error("malformed record {}", path.display())]
    Malformed {
        /// Location that was read.
        path: PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(default)]
    high_score: u32,
}

/// Persisted master volume and mute state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default)]
    muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Master volume in `0.0..=1.0`.
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether output is muted.
    #[must_use]
    pub const fn muted(&self) -> bool {
        self.muted
    }

    /// Sets the volume, clamped to `0.0..=1.0`.
    ///
    /// A volume of zero mutes; raising the volume from zero unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let previous = self.volume;
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume == 0.0 {
            self.muted = true;
        } else if previous == 0.0 {
            self.muted = false;
        }
    }

    /// Flips the mute state.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    fn sanitized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        self
    }
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

/// Directory holding the persisted JSON records.
#[derive(Clone, Debug)]
pub struct RecordStore {
    directory: PathBuf,
}

impl RecordStore {
    /// Creates a store rooted at `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Loads the high score, falling back to zero when absent or unreadable.
    #[must_use]
    pub fn load_high_score(&self) -> u32 {
        self.load_or_default::<HighScoreRecord>(HIGH_SCORE_FILE)
            .high_score
    }

    /// Persists `score` as the high score.
    pub fn save_high_score(&self, score: u32) -> Result<(), StorageError> {
        self.write(HIGH_SCORE_FILE, &HighScoreRecord { high_score: score })
    }

    /// Loads audio settings, falling back to defaults when absent or unreadable.
    #[must_use]
    pub fn load_settings(&self) -> AudioSettings {
        self.load_or_default::<AudioSettings>(SETTINGS_FILE)
            .sanitized()
    }

    /// Persists `settings`.
    pub fn save_settings(&self, settings: &AudioSettings) -> Result<(), StorageError> {
        self.write(SETTINGS_FILE, settings)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.read(name) {
            Ok(Some(record)) => record,
            Ok(None) => T::default(),
            Err(error) => {
                tracing::warn!(%error, "falling back to default record");
                T::default()
            }
        }
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let path = self.directory.join(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StorageError::Malformed { path, source })
    }

    fn write<T: Serialize>(&self, name: &str, record: &T) -> Result<(), StorageError> {
        let path = self.directory.join(name);
        let write_error = |source| StorageError::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.directory).map_err(write_error)?;
        let encoded = serde_json::to_string(record)
            .map_err(|source| write_error(io::Error::new(io::ErrorKind::InvalidData, source)))?;
        fs::write(&path, encoded).map_err(write_error)
    }
}

/// Audio settings bound to the store they are saved to.
///
/// Every change is written immediately.
#[derive(Debug)]
pub struct VolumeControl {
    settings: AudioSettings,
    store: RecordStore,
}

impl VolumeControl {
    /// Loads the current settings from `store`.
    #[must_use]
    pub fn load(store: RecordStore) -> Self {
        Self {
            settings: store.load_settings(),
            store,
        }
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> AudioSettings {
        self.settings
    }

    /// Sets the volume and saves.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), StorageError> {
        self.settings.set_volume(volume);
        self.store.save_settings(&self.settings)
    }

    /// Changes the volume by `delta` and saves.
    pub fn adjust(&mut self, delta: f32) -> Result<(), StorageError> {
        self.set_volume(self.settings.volume() + delta)
    }

    /// Flips the mute state and saves.
    pub fn toggle_mute(&mut self) -> Result<(), StorageError> {
        self.settings.toggle_mute();
        self.store.save_settings(&self.settings)
    }
}
