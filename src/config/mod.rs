// SPDX-License-Identifier: MPL-2.0
//! This module handles the engine's configuration, including loading and saving
//! tuning overrides to a `settings.toml` file and resolving them into the
//! [`Settings`] value every component reads.
//!
//! # Examples
//!
//! ```no_run
//! use lightbox::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.double_tap_scale = Some(2.5);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_file = PathBuf::from("./temp_config_dir/test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded.double_tap_scale, Some(2.5));
//! ```

mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// User-editable overrides. Every field is optional; missing or invalid
/// values fall back to the defaults in [`defaults`](self).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub double_tap_scale: Option<f32>,
    #[serde(default)]
    pub max_scale: Option<f32>,
    #[serde(default)]
    pub min_pinch_scale: Option<f32>,
    #[serde(default)]
    pub long_press_ms: Option<u64>,
    #[serde(default)]
    pub double_tap_window_ms: Option<u64>,
    #[serde(default)]
    pub touch_slop_px: Option<f32>,
    #[serde(default)]
    pub dismiss_velocity_threshold: Option<f32>,
    #[serde(default)]
    pub dismiss_distance_threshold: Option<f32>,
    #[serde(default)]
    pub spring_angular_frequency: Option<f32>,
    #[serde(default)]
    pub spring_damping_ratio: Option<f32>,
    #[serde(default)]
    pub overlay_transition_ms: Option<u64>,
    #[serde(default)]
    pub onboarding_delay_ms: Option<u64>,
    #[serde(default)]
    pub mounted_neighbors: Option<usize>,
}

impl Config {
    /// Resolves the overrides into concrete settings.
    ///
    /// Values that would break an invariant (non-positive thresholds, a max
    /// scale below the double-tap scale, ...) are ignored with a warning.
    #[must_use]
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(max) = positive(self.max_scale, "max_scale") {
            if max > MIN_SCALE {
                settings.max_scale = max;
            } else {
                tracing::warn!(max, "ignoring max_scale not above resting scale");
            }
        }
        if let Some(scale) = positive(self.double_tap_scale, "double_tap_scale") {
            if scale > MIN_SCALE && scale <= settings.max_scale {
                settings.double_tap_scale = scale;
            } else {
                tracing::warn!(scale, "ignoring double_tap_scale outside zoom range");
            }
        }
        settings.double_tap_scale = settings.double_tap_scale.min(settings.max_scale);
        if let Some(min) = positive(self.min_pinch_scale, "min_pinch_scale") {
            settings.min_pinch_scale = min.min(MIN_SCALE);
        }
        if let Some(ms) = self.long_press_ms.filter(|ms| *ms > TAP_MAX_DURATION_MS) {
            settings.long_press = Duration::from_millis(ms);
        }
        if let Some(ms) = self.double_tap_window_ms.filter(|ms| *ms > 0) {
            settings.double_tap_window = Duration::from_millis(ms);
        }
        if let Some(slop) = positive(self.touch_slop_px, "touch_slop_px") {
            settings.touch_slop = slop;
        }
        if let Some(v) = positive(self.dismiss_velocity_threshold, "dismiss_velocity_threshold") {
            settings.dismiss_velocity_threshold = v;
        }
        if let Some(d) = positive(self.dismiss_distance_threshold, "dismiss_distance_threshold") {
            settings.dismiss_distance_threshold = d;
        }
        if let Some(omega) = positive(self.spring_angular_frequency, "spring_angular_frequency")
        {
            settings.spring_angular_frequency = omega;
        }
        if let Some(zeta) = positive(self.spring_damping_ratio, "spring_damping_ratio") {
            settings.spring_damping_ratio = zeta;
        }
        if let Some(ms) = self.overlay_transition_ms {
            settings.overlay_transition = Duration::from_millis(ms);
        }
        if let Some(ms) = self.onboarding_delay_ms {
            settings.onboarding_delay = Duration::from_millis(ms);
        }
        if let Some(neighbors) = self.mounted_neighbors {
            settings.mounted_neighbors = neighbors;
        }

        settings
    }
}

fn positive(value: Option<f32>, name: &'static str) -> Option<f32> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Some(v),
        Some(v) => {
            tracing::warn!(setting = name, value = v, "ignoring non-positive setting");
            None
        }
        None => None,
    }
}

/// Resolved tuning values shared by every component of the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub max_scale: f32,
    pub min_pinch_scale: f32,
    pub double_tap_scale: f32,
    pub touch_slop: f32,
    pub tap_max_duration: Duration,
    pub double_tap_window: Duration,
    pub double_tap_distance: f32,
    pub long_press: Duration,
    pub velocity_window: Duration,
    pub dismiss_velocity_threshold: f32,
    pub dismiss_distance_threshold: f32,
    pub dismiss_exit: Duration,
    pub spring_angular_frequency: f32,
    pub spring_damping_ratio: f32,
    pub overlay_transition: Duration,
    pub overlay_faded_opacity: f32,
    pub overlay_collapsed_height: f32,
    pub overlay_expanded_height_ratio: f32,
    pub overlay_collapsed_caption_lines: usize,
    pub mounted_neighbors: usize,
    pub page_visibility_threshold: f32,
    pub onboarding_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_scale: MAX_SCALE,
            min_pinch_scale: MIN_PINCH_SCALE,
            double_tap_scale: DOUBLE_TAP_SCALE,
            touch_slop: TOUCH_SLOP_PX,
            tap_max_duration: Duration::from_millis(TAP_MAX_DURATION_MS),
            double_tap_window: Duration::from_millis(DOUBLE_TAP_WINDOW_MS),
            double_tap_distance: DOUBLE_TAP_DISTANCE_PX,
            long_press: Duration::from_millis(LONG_PRESS_MS),
            velocity_window: Duration::from_millis(VELOCITY_SAMPLE_WINDOW_MS),
            dismiss_velocity_threshold: DISMISS_VELOCITY_THRESHOLD,
            dismiss_distance_threshold: DISMISS_DISTANCE_THRESHOLD,
            dismiss_exit: Duration::from_millis(DISMISS_EXIT_MS),
            spring_angular_frequency: SPRING_ANGULAR_FREQUENCY,
            spring_damping_ratio: SPRING_DAMPING_RATIO,
            overlay_transition: Duration::from_millis(OVERLAY_TRANSITION_MS),
            overlay_faded_opacity: OVERLAY_FADED_OPACITY,
            overlay_collapsed_height: OVERLAY_COLLAPSED_HEIGHT,
            overlay_expanded_height_ratio: OVERLAY_EXPANDED_HEIGHT_RATIO,
            overlay_collapsed_caption_lines: OVERLAY_COLLAPSED_CAPTION_LINES,
            mounted_neighbors: MOUNTED_NEIGHBORS,
            page_visibility_threshold: PAGE_VISIBILITY_THRESHOLD,
            onboarding_delay: Duration::from_millis(ONBOARDING_DELAY_MS),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a config file. Unparsable content yields the default configuration.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "invalid settings file, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_overrides() {
        let config = Config {
            double_tap_scale: Some(2.5),
            long_press_ms: Some(650),
            ..Config::default()
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn default_config_resolves_to_default_settings() {
        assert_eq!(Config::default().settings(), Settings::default());
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let config = Config {
            double_tap_scale: Some(9.0),
            dismiss_velocity_threshold: Some(-1.0),
            long_press_ms: Some(10),
            ..Config::default()
        };
        let settings = config.settings();
        assert_eq!(settings.double_tap_scale, DOUBLE_TAP_SCALE);
        assert_eq!(settings.dismiss_velocity_threshold, DISMISS_VELOCITY_THRESHOLD);
        assert_eq!(settings.long_press, Duration::from_millis(LONG_PRESS_MS));
    }

    #[test]
    fn min_pinch_scale_never_exceeds_resting_scale() {
        let config = Config {
            min_pinch_scale: Some(1.7),
            ..Config::default()
        };
        assert_eq!(config.settings().min_pinch_scale, MIN_SCALE);
    }

    #[test]
    fn raising_max_scale_allows_larger_double_tap() {
        let config = Config {
            max_scale: Some(5.0),
            double_tap_scale: Some(4.0),
            ..Config::default()
        };
        let settings = config.settings();
        assert_eq!(settings.max_scale, 5.0);
        assert_eq!(settings.double_tap_scale, 4.0);
    }
}
