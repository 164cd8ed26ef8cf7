//! Color theme for the grid and chrome
//!
//! The palette mirrors the classic character-map look: white cells, light
//! gray grid lines, black text. A user override can be dropped into
//! `~/.config/glyphgrid/theme.yaml`; missing keys fall back to the default.

use serde::Deserialize;

/// A color in `#RRGGBB` form, stored as packed ARGB for the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub fn argb(self) -> u32 {
        self.0
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Color(0xFF00_0000 | value))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color: {:?}", s)))
    }
}

/// Serde mirror of [`Theme`] where every field is optional, so a user file
/// may override any subset of colors.
#[derive(Debug, Default, Deserialize)]
struct ThemeOverlay {
    background: Option<Color>,
    grid_line: Option<Color>,
    text: Option<Color>,
    bar_background: Option<Color>,
    bar_text: Option<Color>,
    scrollbar_track: Option<Color>,
    scrollbar_thumb: Option<Color>,
    popup_background: Option<Color>,
    popup_border: Option<Color>,
    popup_disabled: Option<Color>,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Normal cell interior and panel background
    pub background: Color,
    /// Grid lines; doubles as the hover wash
    pub grid_line: Color,
    /// Glyph color; doubles as the pressed-cell fill
    pub text: Color,
    pub bar_background: Color,
    pub bar_text: Color,
    pub scrollbar_track: Color,
    pub scrollbar_thumb: Color,
    pub popup_background: Color,
    pub popup_border: Color,
    pub popup_disabled: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            grid_line: Color::rgb(0xC0, 0xC0, 0xC0),
            text: Color::rgb(0x00, 0x00, 0x00),
            bar_background: Color::rgb(0xEC, 0xEC, 0xEC),
            bar_text: Color::rgb(0x20, 0x20, 0x20),
            scrollbar_track: Color::rgb(0xE4, 0xE4, 0xE4),
            scrollbar_thumb: Color::rgb(0xA8, 0xA8, 0xA8),
            popup_background: Color::rgb(0xF8, 0xF8, 0xF8),
            popup_border: Color::rgb(0x80, 0x80, 0x80),
            popup_disabled: Color::rgb(0xA0, 0xA0, 0xA0),
        }
    }
}

impl Theme {
    /// Load the theme, applying `~/.config/glyphgrid/theme.yaml` overrides
    /// when the file exists and parses.
    pub fn load() -> Self {
        let mut theme = Self::default();
        let Some(path) = crate::config_paths::theme_file() else {
            return theme;
        };
        if !path.exists() {
            return theme;
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str::<ThemeOverlay>(&content) {
                Ok(overlay) => {
                    theme.apply(overlay);
                    tracing::info!("Loaded theme overrides from {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Failed to parse theme at {}: {}", path.display(), e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read theme at {}: {}", path.display(), e);
            }
        }
        theme
    }

    fn apply(&mut self, overlay: ThemeOverlay) {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(c) = overlay.$field { self.$field = c; })*
            };
        }
        merge!(
            background,
            grid_line,
            text,
            bar_background,
            bar_text,
            scrollbar_track,
            scrollbar_thumb,
            popup_background,
            popup_border,
            popup_disabled
        );
    }
}
