use cadence_common::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings consumed by the scheduler and the render pass.
///
/// Missing fields take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Upper bound on simulation ticks per second.
    pub max_simulation_framerate: f64,
    /// Multiplier applied to velocity integration.
    pub simulation_speed: f64,
    /// Multiplier for UI animation. Not applied to the simulation.
    pub ui_speed: f64,
    /// Follow host window resizes.
    pub automatically_adjust_screen_size: bool,
    pub screen_size: [f32; 2],
    pub background_color: Color,
    /// Let render alpha exceed 1 when a tick runs late.
    pub allow_extrapolation: bool,
    /// Skip creating the default "Main" scene.
    pub no_template: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_simulation_framerate: 60.0,
            simulation_speed: 1.0,
            ui_speed: 1.0,
            automatically_adjust_screen_size: true,
            screen_size: [800.0, 600.0],
            background_color: Color::BLACK,
            allow_extrapolation: false,
            no_template: false,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&data)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_simulation_framerate.is_finite() && self.max_simulation_framerate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_simulation_framerate must be positive, got {}",
                self.max_simulation_framerate
            )));
        }
        if Duration::try_from_secs_f64(1.0 / self.max_simulation_framerate).is_err() {
            return Err(ConfigError::Invalid(format!(
                "max_simulation_framerate {} gives a tick budget too long to represent",
                self.max_simulation_framerate
            )));
        }
        if !self.simulation_speed.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "simulation_speed must be finite, got {}",
                self.simulation_speed
            )));
        }
        if !self.ui_speed.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "ui_speed must be finite, got {}",
                self.ui_speed
            )));
        }
        if self.screen_size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "screen_size must be positive, got {:?}",
                self.screen_size
            )));
        }
        Ok(())
    }

    /// Minimum wall-clock time per simulation tick. Saturates at
    /// `Duration::MAX` for framerates [`GameConfig::validate`] rejects.
    pub fn tick_budget(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.max_simulation_framerate).unwrap_or(Duration::MAX)
    }

    /// Output size in pixels.
    pub fn screen_size(&self) -> Vec2 {
        Vec2::from(self.screen_size)
    }
}
