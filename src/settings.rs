//! Game settings and preferences
//!
//! Shell-side preferences only; simulation tuning is compiled in. Persisted
//! as JSON next to the executable, with defaults on any failure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    const STORAGE_FILE: &'static str = "tank-duel-settings.json";

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::STORAGE_FILE) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::STORAGE_FILE);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings file: {e}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to disk; failures are logged and swallowed
    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(Self::STORAGE_FILE, json) {
                    log::warn!("Failed to save settings: {e}");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
