// SPDX-License-Identifier: MPL-2.0
//! Viewer state persistence using CBOR format.
//!
//! This module handles state that must survive across sessions but is not
//! user-configurable (unlike the tuning overrides in `settings.toml`). Today
//! that is a single flag: whether the first-use tip has been seen.
//!
//! # Path Resolution
//!
//! 1. Use `load_from()`/`save_to()` with explicit path override
//! 2. Set `LIGHTBOX_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::paths;
use crate::error::{Error, Result};
use crate::ui::viewer::subcomponents::onboarding::OnboardingStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

/// State that persists across viewer sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppState {
    /// Whether the user has dismissed the first-use gesture tip.
    #[serde(default)]
    pub onboarding_seen: bool,
}

impl AppState {
    /// Loads state from the default location.
    ///
    /// Returns a tuple of (state, optional_warning). If loading fails, returns
    /// default state with a notification key explaining what went wrong.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads state from a custom directory (`None` uses default resolution).
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(state) => (state, None),
                Err(_) => (
                    Self::default(),
                    Some("notification-state-parse-error".to_string()),
                ),
            },
            Err(_) => (
                Self::default(),
                Some("notification-state-read-error".to_string()),
            ),
        }
    }

    /// Saves state to the default location.
    ///
    /// Returns an optional warning key if the save failed.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves state to a custom directory (`None` uses default resolution).
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return Some("notification-state-path-error".to_string());
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                if ciborium::into_writer(self, BufWriter::new(file)).is_err() {
                    return Some("notification-state-write-error".to_string());
                }
                None
            }
            Err(_) => Some("notification-state-create-error".to_string()),
        }
    }

    fn state_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STATE_FILE);
            path
        })
    }
}

/// [`OnboardingStore`] backed by the CBOR state file.
#[derive(Debug, Clone, Default)]
pub struct FileOnboardingStore {
    base_dir: Option<PathBuf>,
}

impl FileOnboardingStore {
    /// Store using the default data directory resolution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store rooted at an explicit directory.
    #[must_use]
    pub fn in_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir: Some(base_dir),
        }
    }
}

impl OnboardingStore for FileOnboardingStore {
    fn read_seen(&mut self) -> Result<bool> {
        match AppState::load_from(self.base_dir.clone()) {
            (state, None) => Ok(state.onboarding_seen),
            (_, Some(key)) => Err(Error::State(key)),
        }
    }

    fn write_seen(&mut self) -> Result<()> {
        // Preserve whatever else the file holds; a corrupt file is replaced.
        let (mut state, _) = AppState::load_from(self.base_dir.clone());
        state.onboarding_seen = true;
        match state.save_to(self.base_dir.clone()) {
            None => Ok(()),
            Some(key) => Err(Error::State(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_state_has_not_seen_onboarding() {
        assert!(!AppState::default().onboarding_seen);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().expect("failed to create temp dir");
        let state = AppState {
            onboarding_seen: true,
        };

        assert!(state.save_to(Some(dir.path().to_path_buf())).is_none());
        let (loaded, warning) = AppState::load_from(Some(dir.path().to_path_buf()));

        assert!(warning.is_none());
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_file_loads_default_without_warning() {
        let dir = tempdir().expect("failed to create temp dir");
        let (loaded, warning) = AppState::load_from(Some(dir.path().join("absent")));
        assert!(warning.is_none());
        assert_eq!(loaded, AppState::default());
    }

    #[test]
    fn corrupt_file_reports_parse_warning() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join(STATE_FILE), b"\xff\xff not cbor").expect("write");

        let (loaded, warning) = AppState::load_from(Some(dir.path().to_path_buf()));
        assert_eq!(loaded, AppState::default());
        assert_eq!(warning.as_deref(), Some("notification-state-parse-error"));
    }

    #[test]
    fn file_store_persists_seen_flag() {
        let dir = tempdir().expect("failed to create temp dir");
        let mut store = FileOnboardingStore::in_dir(dir.path().to_path_buf());

        assert!(!store.read_seen().expect("read"));
        store.write_seen().expect("write");

        let mut reopened = FileOnboardingStore::in_dir(dir.path().to_path_buf());
        assert!(reopened.read_seen().expect("read"));
    }

    #[test]
    fn file_store_surfaces_corruption_as_error() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join(STATE_FILE), b"garbage").expect("write");

        let mut store = FileOnboardingStore::in_dir(dir.path().to_path_buf());
        assert!(matches!(store.read_seen(), Err(Error::State(_))));
    }
}
