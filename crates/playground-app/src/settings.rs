// Settings persistence: global shell configuration.
// Uses platform-native config dir: e.g. ~/Library/Application Support/playground/settings.json
// on macOS, ~/.config/playground/settings.json on Linux.

use std::path::{Path, PathBuf};
use std::time::Duration;

use playground_layout::ResizeSettings;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_IDENTITY_ENDPOINT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaygroundSettings {
    #[serde(default = "default_identity_endpoint")]
    pub identity_endpoint: String,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub resize: ResizeSettings,
}

fn default_identity_endpoint() -> String {
    DEFAULT_IDENTITY_ENDPOINT.to_string()
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            identity_endpoint: default_identity_endpoint(),
            probe: ProbeSettings::default(),
            resize: ResizeSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Request timeout for the identity probe. Unset means wait indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ProbeSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("playground"))
}

fn settings_path() -> Option<PathBuf> {
    Some(config_dir()?.join("settings.json"))
}

pub fn load_settings() -> PlaygroundSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => PlaygroundSettings::default(),
    }
}

pub fn load_settings_from(path: &Path) -> PlaygroundSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                PlaygroundSettings::default()
            }
        },
        Err(_) => PlaygroundSettings::default(),
    }
}
