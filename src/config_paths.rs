//! Centralized configuration paths for glyphgrid
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/glyphgrid/`
//! - Windows: `%APPDATA%\glyphgrid\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "glyphgrid";

/// Base config directory for glyphgrid
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/glyphgrid`
///   - Else: `~/.config/glyphgrid`
///
/// Windows:
///   - `%APPDATA%\glyphgrid`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/glyphgrid/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/glyphgrid/theme.yaml` — optional user color overrides
pub fn theme_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("theme.yaml"))
}

/// `~/.config/glyphgrid/captions.txt` — optional character caption data
pub fn captions_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("captions.txt"))
}

/// `~/.config/glyphgrid/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let logs = config.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
