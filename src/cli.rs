//! Command-line argument parsing
//!
//! Supports:
//! - Selecting the display font family and pixel size
//! - Starting in raw glyph mode instead of character mode
//! - Choosing the click behavior for the sample line

use clap::Parser;

use crate::model::grid::GridMode;
use crate::sample::ClickMode;

/// A character map: browse every character or glyph a font can draw
#[derive(Parser, Debug)]
#[command(name = "glyphgrid", version, about = "A character map for font exploration")]
pub struct CliArgs {
    /// Font family to display (e.g. "DejaVu Sans"). Falls back to a
    /// discovered system font when the family cannot be resolved.
    #[arg(short = 'f', long, value_name = "FAMILY")]
    pub font: Option<String>,

    /// Display size in pixels
    #[arg(short = 's', long, value_name = "PX")]
    pub size: Option<f32>,

    /// Show raw glyph indices instead of Unicode characters
    #[arg(short = 'g', long)]
    pub glyphs: bool,

    /// Each click replaces the whole sample text instead of inserting
    #[arg(short = 'r', long)]
    pub replace: bool,
}

/// Settings derived from CLI arguments, layered over the saved config
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub family: Option<String>,
    pub size_px: f32,
    pub mode: GridMode,
    pub click_mode: ClickMode,
}

impl CliArgs {
    /// Merge parsed CLI args with the persisted configuration. CLI flags
    /// win over saved values; saved values win over built-in defaults.
    pub fn into_startup(self, config: &crate::config::AppConfig) -> StartupConfig {
        let family = self.font.or_else(|| config.font_family.clone());

        let size_px = self
            .size
            .unwrap_or(config.font_size_px)
            .clamp(crate::model::grid::MIN_FONT_PX, crate::model::grid::MAX_FONT_PX);

        let mode = if self.glyphs {
            GridMode::Glyphs
        } else {
            GridMode::Characters
        };

        let click_mode = if self.replace {
            ClickMode::Replace
        } else {
            config.click_mode
        };

        StartupConfig {
            family,
            size_px,
            mode,
            click_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn args(font: Option<&str>, size: Option<f32>, glyphs: bool, replace: bool) -> CliArgs {
        CliArgs {
            font: font.map(String::from),
            size,
            glyphs,
            replace,
        }
    }

    #[test]
    fn test_cli_font_wins_over_config() {
        let mut config = AppConfig::default();
        config.font_family = Some("Saved Family".into());

        let startup = args(Some("CLI Family"), None, false, false).into_startup(&config);
        assert_eq!(startup.family.as_deref(), Some("CLI Family"));
    }

    #[test]
    fn test_config_font_used_without_cli_flag() {
        let mut config = AppConfig::default();
        config.font_family = Some("Saved Family".into());

        let startup = args(None, None, false, false).into_startup(&config);
        assert_eq!(startup.family.as_deref(), Some("Saved Family"));
    }

    #[test]
    fn test_size_is_clamped() {
        let config = AppConfig::default();
        let startup = args(None, Some(5000.0), false, false).into_startup(&config);
        assert_eq!(startup.size_px, crate::model::grid::MAX_FONT_PX);

        let startup = args(None, Some(1.0), false, false).into_startup(&config);
        assert_eq!(startup.size_px, crate::model::grid::MIN_FONT_PX);
    }

    #[test]
    fn test_glyph_flag_selects_glyph_mode() {
        let config = AppConfig::default();
        let startup = args(None, None, true, false).into_startup(&config);
        assert_eq!(startup.mode, GridMode::Glyphs);
    }

    #[test]
    fn test_replace_flag_selects_replace_mode() {
        let config = AppConfig::default();
        let startup = args(None, None, false, true).into_startup(&config);
        assert_eq!(startup.click_mode, ClickMode::Replace);
    }
}
