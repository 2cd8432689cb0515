// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use formcheck::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Ask for steadier poses before a rep counts
//! config.stability_frames = 15;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::app::paths;
use crate::application::workout::TrackerSettings;
use crate::domain::newtypes::{ConfidenceThreshold, StabilityFrames};
use crate::error::Result;
use defaults::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_STABILITY_FRAMES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum detection confidence, clamped to 0.5..=0.9 when applied.
    pub confidence_threshold: f32,
    /// Frames a pose must hold, clamped to 1..=120 when applied.
    pub stability_frames: u32,
    /// Print a line for every counted rep during `workout`.
    pub announce_reps: bool,
    /// Model file to use instead of the one in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            stability_frames: DEFAULT_STABILITY_FRAMES,
            announce_reps: true,
            model_path: None,
        }
    }
}

impl Config {
    /// Tracker settings with out-of-range values clamped.
    #[must_use]
    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            confidence_threshold: ConfidenceThreshold::new(self.confidence_threshold),
            stability_frames: StabilityFrames::new(self.stability_frames),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the config directory, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the config directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a configuration file. Invalid TOML falls back to defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
        Config::default()
    }))
}

/// Writes a configuration file, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
