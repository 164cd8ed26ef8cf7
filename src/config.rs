//! Application configuration persistence
//!
//! Stores user preferences in `~/.config/glyphgrid/config.yaml`

use serde::{Deserialize, Serialize};

use crate::sample::ClickMode;

fn default_font_size() -> f32 {
    30.0
}

fn default_window_width() -> u32 {
    700
}

fn default_window_height() -> u32 {
    500
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Last selected font family, if any
    #[serde(default)]
    pub font_family: Option<String>,

    /// Display size in pixels
    #[serde(default = "default_font_size")]
    pub font_size_px: f32,

    /// Whether a grid click replaces the sample text or inserts into it
    #[serde(default)]
    pub click_mode: ClickMode,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size_px: default_font_size(),
            click_mode: ClickMode::default(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
