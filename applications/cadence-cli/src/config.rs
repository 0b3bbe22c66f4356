/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::{ControllerConfig, EqSettings, RepeatPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub playback: ControllerConfig,

    #[serde(default)]
    pub equalizer: EqSettings,

    #[serde(default)]
    pub playlist: PlaylistSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlaylistSettings {
    #[serde(default)]
    pub repeat: RepeatPolicy,

    #[serde(default)]
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Length of every simulated track
    #[serde(default = "default_track_length_secs")]
    pub track_length_secs: u64,

    /// Identifiers that fail to open
    #[serde(default)]
    pub unreadable: Vec<String>,
}

impl SimulationSettings {
    pub fn track_length(&self) -> Duration {
        Duration::from_secs(self.track_length_secs)
    }
}

impl CadenceConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; without one, `cadence.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. CADENCE_PLAYBACK__INITIAL_VOLUME)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(CliError::Config(
                "playback.tick_interval_ms must be positive".to_string(),
            ));
        }

        if self.playback.initial_volume > 100 {
            return Err(CliError::Config(format!(
                "playback.initial_volume {} is above 100",
                self.playback.initial_volume
            )));
        }

        if self.simulation.track_length_secs == 0 {
            return Err(CliError::Config(
                "simulation.track_length_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_track_length_secs() -> u64 {
    30
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            track_length_secs: default_track_length_secs(),
            unreadable: Vec::new(),
        }
    }
}
