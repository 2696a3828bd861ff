//! Physics parameter presets.
//!
//! Loads the tunable simulation constants from YAML files, so a different
//! cloth or tick length can be tried without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! └── physics/
//!     ├── standard.yaml
//!     └── slick.yaml
//! ```
//!
//! Table geometry is not configurable; see [`crate::types::constants`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Error type for preset loading operations.
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    NotFound(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "YAML parse error: {}", e),
            ConfigError::NotFound(name) => write!(f, "Preset not found: {}", name),
            ConfigError::Invalid(reason) => write!(f, "Invalid physics config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

/// Named simulation constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-tick velocity decay factor
    pub friction_coefficient: f64,

    /// Once the fastest moving ball drops below this, every ball is stopped
    pub min_velocity: f64,

    /// Extra clearance left between a ball and a cushion after reflection
    pub position_buffer: f64,

    /// Logical integration step (one tick)
    pub time_step: f64,

    pub ball_radius: f64,

    /// Scale from pointer offset to cue launch velocity
    pub launch_multiplier: f64,
}

impl PhysicsConfig {
    /// Parse and validate a config from YAML text.
    ///
    /// Missing keys fall back to the standard values.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Without damping a launched table never drops below min_velocity.
        if !(self.friction_coefficient > 0.0 && self.friction_coefficient < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "friction_coefficient must be in (0, 1), got {}",
                self.friction_coefficient
            )));
        }
        if !(self.time_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if !(self.ball_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ball_radius must be positive, got {}",
                self.ball_radius
            )));
        }
        if !(self.min_velocity >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_velocity must not be negative, got {}",
                self.min_velocity
            )));
        }
        if !(self.position_buffer >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "position_buffer must not be negative, got {}",
                self.position_buffer
            )));
        }
        Ok(())
    }

    /// Ticks per simulated second.
    pub fn tick_rate(&self) -> f64 {
        1.0 / self.time_step
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction_coefficient: 0.99,
            min_velocity: 0.5,
            position_buffer: 0.01,
            time_step: 0.01,
            ball_radius: 0.1,
            launch_multiplier: 2.0,
        }
    }
}

/// Preset loader with configurable base directory.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a new loader with the given base path.
    ///
    /// The base path should contain a `physics/` subdirectory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a physics preset by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ConfigLoader::new("presets");
    /// let slick = loader.load_physics("slick")?;
    /// ```
    pub fn load_physics(&self, name: &str) -> Result<PhysicsConfig, ConfigError> {
        let path = self.base_path.join("physics").join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let config = PhysicsConfig::from_yaml_str(&contents)?;
        log::debug!("loaded physics preset '{}' from {}", name, path.display());
        Ok(config)
    }

    /// List all available physics presets.
    pub fn list_physics(&self) -> Result<Vec<String>, ConfigError> {
        let path = self.base_path.join("physics");
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
