//! User preference persistence for the LeadDash dashboard.
//!
//! Holds the dark-mode flag the header toggles. The flag is styling only;
//! nothing else reads it. The file lives next to the notification storage
//! (`~/.config/leaddash/preferences.json` on most platforms).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::app_file_path;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "LEADDASH_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PreferencesPayload {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Open the preferences at the default path.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::with_path(app_file_path(PREFERENCES_PATH_ENV, PREFERENCES_FILE_NAME))
    }

    /// Open the preferences stored at `path`.
    pub fn with_path(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dark_mode(&self) -> bool {
        self.payload.lock().expect("preferences lock poisoned").dark_mode
    }

    /// Persist a new dark-mode flag.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.dark_mode = enabled;
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}
