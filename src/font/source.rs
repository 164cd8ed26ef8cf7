//! Renderer capability used by the inventory build
//!
//! The scan only needs a handful of questions answered about a font. They
//! are behind a trait so the inventory and grid logic can be tested with a
//! fake source instead of real font files.

use std::sync::Arc;

use fontdue::Font;

/// What the inventory build needs to know about a font.
///
/// The `claims` answer is informational: a source may claim code points it
/// cannot actually draw. `glyphs_for` is the authority and every claim is
/// re-verified against it.
pub trait GlyphSource {
    /// Number of glyphs in the font; glyph indices are `0..glyph_count`
    fn glyph_count(&self) -> u32;

    /// The "missing glyph" sentinel (.notdef); never a displayable cell
    fn missing_glyph(&self) -> u32;

    /// Whether the font claims to display this code point
    fn claims(&self, cp: u32) -> bool;

    /// The glyph sequence the font would draw for the single-character
    /// string containing `cp`. Clears and fills `out`; empty means the
    /// code point produces nothing (e.g. surrogate range).
    fn glyphs_for(&self, cp: u32, out: &mut Vec<u32>);

    /// Advance width of a glyph in pixels at the source's size
    fn advance_width(&self, glyph: u32) -> f32;

    /// Line height in pixels at the source's size
    fn line_height(&self) -> f32;

    /// Pixels above the baseline at the source's size
    fn ascent(&self) -> f32;
}

/// fontdue-backed glyph source at a fixed pixel size
pub struct FontdueSource {
    font: Arc<Font>,
    size_px: f32,
    ascent: f32,
    line_height: f32,
}

impl FontdueSource {
    pub fn new(font: Arc<Font>, size_px: f32) -> Self {
        // Fonts without horizontal line metrics are rare; approximate from
        // the pixel size so the grid still lays out.
        let (ascent, line_height) = match font.horizontal_line_metrics(size_px) {
            Some(m) => (m.ascent, m.new_line_size),
            None => (size_px * 0.8, size_px * 1.2),
        };
        Self {
            font,
            size_px,
            ascent,
            line_height,
        }
    }
}

impl GlyphSource for FontdueSource {
    fn glyph_count(&self) -> u32 {
        self.font.glyph_count() as u32
    }

    fn missing_glyph(&self) -> u32 {
        // TrueType/OpenType reserve glyph 0 for .notdef
        0
    }

    fn claims(&self, cp: u32) -> bool {
        char::from_u32(cp)
            .map(|ch| self.font.lookup_glyph_index(ch) != 0)
            .unwrap_or(false)
    }

    fn glyphs_for(&self, cp: u32, out: &mut Vec<u32>) {
        out.clear();
        // fontdue does not shape; a single character maps to at most one
        // glyph. Surrogate code points are not valid chars and yield none.
        if let Some(ch) = char::from_u32(cp) {
            out.push(self.font.lookup_glyph_index(ch) as u32);
        }
    }

    fn advance_width(&self, glyph: u32) -> f32 {
        self.font
            .metrics_indexed(glyph as u16, self.size_px)
            .advance_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }
}
