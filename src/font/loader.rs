//! System font discovery and loading
//!
//! Resolves a family name to a font file by scanning the platform font
//! directories. An unresolvable family is never fatal: a guaranteed
//! fallback is substituted and the caller surfaces a notice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no usable fonts found on this system")]
    NoFontsFound,
}

/// A parsed font plus where it came from
pub struct LoadedFont {
    pub font: Arc<Font>,
    /// Family name derived from the file stem
    pub family: String,
    /// Set when the requested family was unavailable and a fallback won
    pub substituted_for: Option<String>,
}

/// Families tried, in order, when the requested one cannot be found
const FALLBACK_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
    "Cantarell",
    "Arial",
    "Helvetica",
];

/// Load `family` at `size_px`, substituting a fallback when the family is
/// unavailable. Only fails when not a single parseable font exists.
pub fn load_font(family: Option<&str>, size_px: f32) -> Result<LoadedFont, FontError> {
    if let Some(requested) = family {
        if let Some(loaded) = locate_family(requested).and_then(|p| load_path(&p, size_px)) {
            return Ok(loaded);
        }
        tracing::warn!("Font family {:?} not found, substituting a fallback", requested);
        let mut loaded = load_fallback(size_px)?;
        loaded.substituted_for = Some(requested.to_string());
        return Ok(loaded);
    }
    load_fallback(size_px)
}

fn load_fallback(size_px: f32) -> Result<LoadedFont, FontError> {
    for family in FALLBACK_FAMILIES {
        if let Some(loaded) = locate_family(family).and_then(|p| load_path(&p, size_px)) {
            return Ok(loaded);
        }
    }
    // Last resort: the first parseable font file anywhere on the system
    for dir in font_dirs() {
        for entry in WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if is_font_file(entry.path()) {
                if let Some(loaded) = load_path(entry.path(), size_px) {
                    return Ok(loaded);
                }
            }
        }
    }
    Err(FontError::NoFontsFound)
}

/// Platform font directories, most specific first
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            dirs.push(home.join("Library/Fonts"));
        }
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        if let Some(home) = dirs::home_dir() {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
        }
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        dirs.push(PathBuf::from("/usr/share/fonts"));
    }

    dirs.retain(|d| d.is_dir());
    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
        Some(ref ext) if ext == "ttf" || ext == "otf"
    )
}

/// Lowercased, alphanumeric-only form used for family comparison, so
/// "DejaVu Sans" matches "DejaVuSans.ttf".
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the best file for a family: exact normalized stem match wins,
/// otherwise the shortest stem that starts with the family (so "DejaVu
/// Sans" prefers DejaVuSans.ttf over DejaVuSans-BoldOblique.ttf).
fn locate_family(family: &str) -> Option<PathBuf> {
    let wanted = normalize(family);
    if wanted.is_empty() {
        return None;
    }

    let mut best: Option<(usize, PathBuf)> = None;
    for dir in font_dirs() {
        for entry in WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !is_font_file(path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let stem = normalize(stem);
            if stem == wanted {
                return Some(path.to_path_buf());
            }
            if stem.starts_with(&wanted)
                && best.as_ref().map_or(true, |(len, _)| stem.len() < *len)
            {
                best = Some((stem.len(), path.to_path_buf()));
            }
        }
    }
    best.map(|(_, path)| path)
}

fn load_path(path: &Path, size_px: f32) -> Option<LoadedFont> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Failed to read font {}: {}", path.display(), e);
            return None;
        }
    };
    let settings = FontSettings {
        scale: size_px.max(crate::model::grid::MIN_FONT_PX),
        ..FontSettings::default()
    };
    match Font::from_bytes(bytes, settings) {
        Ok(font) => {
            let family = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            tracing::info!("Loaded font {} from {}", family, path.display());
            Some(LoadedFont {
                font: Arc::new(font),
                family,
                substituted_for: None,
            })
        }
        Err(e) => {
            tracing::debug!("Failed to parse font {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("DejaVu Sans"), "dejavusans");
        assert_eq!(normalize("Liberation-Mono"), "liberationmono");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_is_font_file() {
        assert!(is_font_file(Path::new("/x/DejaVuSans.ttf")));
        assert!(is_font_file(Path::new("/x/Font.OTF")));
        assert!(!is_font_file(Path::new("/x/readme.txt")));
        assert!(!is_font_file(Path::new("/x/noext")));
    }

    #[test]
    fn test_locate_empty_family_is_none() {
        assert_eq!(locate_family("  "), None);
    }
}
