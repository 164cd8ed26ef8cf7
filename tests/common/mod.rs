//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use glyphgrid::config::AppConfig;
use glyphgrid::font::{CancelToken, FontInventory};
use glyphgrid::model::{AppModel, BuildState};
use glyphgrid::theme::Theme;
use glyphgrid::GlyphSource;

/// Deterministic glyph source with no real font behind it.
///
/// Code points `first_cp .. first_cp + chars` map to glyphs `1 ..= chars`;
/// glyph 0 is the missing-glyph sentinel. Every glyph advances `advance`
/// pixels.
pub struct FakeGlyphSource {
    pub first_cp: u32,
    pub chars: u32,
    pub glyph_count: u32,
    pub advance: f32,
}

impl FakeGlyphSource {
    pub fn with_chars(chars: u32) -> Self {
        Self {
            first_cp: 0x41,
            chars,
            glyph_count: chars + 1,
            advance: 20.0,
        }
    }
}

impl GlyphSource for FakeGlyphSource {
    fn glyph_count(&self) -> u32 {
        self.glyph_count
    }
    fn missing_glyph(&self) -> u32 {
        0
    }
    fn claims(&self, cp: u32) -> bool {
        (self.first_cp..self.first_cp + self.chars).contains(&cp)
    }
    fn glyphs_for(&self, cp: u32, out: &mut Vec<u32>) {
        out.clear();
        if self.claims(cp) {
            out.push(cp - self.first_cp + 1);
        }
    }
    fn advance_width(&self, _glyph: u32) -> f32 {
        self.advance
    }
    fn line_height(&self) -> f32 {
        30.0
    }
    fn ascent(&self) -> f32 {
        24.0
    }
}

pub fn inventory_with_chars(chars: u32) -> Arc<FontInventory> {
    Arc::new(
        FontInventory::build(&FakeGlyphSource::with_chars(chars), &CancelToken::never())
            .expect("fake inventory builds"),
    )
}

/// Model with an installed fake inventory and a 700x500 window
pub fn model_with_chars(chars: u32) -> AppModel {
    let mut model = AppModel::new(AppConfig::default(), Theme::default());
    model.grid.set_inventory(inventory_with_chars(chars));
    model.build = BuildState::Ready;
    resize(&mut model, 700, 500);
    model
}

pub fn resize(model: &mut AppModel, width: u32, height: u32) {
    use glyphgrid::messages::{AppMsg, Msg};
    glyphgrid::update::update(model, Msg::App(AppMsg::Resized { width, height }));
}
