//! UI text rendering for the status bar, sample bar, and popup menu
//!
//! The chrome uses its own small font, separate from the grid font, so
//! captions stay readable while the user inspects a 200px display face.

use std::collections::HashMap;

use fontdue::{Font, Metrics};

use super::frame::Frame;

/// Rasterized glyphs keyed by character and size bits
pub type UiGlyphCache = HashMap<(char, u32), (Metrics, Vec<u8>)>;

pub struct TextPainter<'a> {
    font: &'a Font,
    cache: &'a mut UiGlyphCache,
    size_px: f32,
    ascent: f32,
}

impl<'a> TextPainter<'a> {
    pub fn new(font: &'a Font, cache: &'a mut UiGlyphCache, size_px: f32, ascent: f32) -> Self {
        Self {
            font,
            cache,
            size_px,
            ascent,
        }
    }

    /// Draw a line of text with its top-left at (x, y)
    pub fn draw(&mut self, frame: &mut Frame, x: usize, y: usize, text: &str, color: u32) {
        let mut pen_x = x as f32;
        let baseline = y as f32 + self.ascent;

        for ch in text.chars() {
            let key = (ch, self.size_px.to_bits());
            let (metrics, bitmap) = self
                .cache
                .entry(key)
                .or_insert_with(|| self.font.rasterize(ch, self.size_px));

            let glyph_x = pen_x as isize + metrics.xmin as isize;
            let glyph_y = (baseline - metrics.height as f32 - metrics.ymin as f32) as isize;
            frame.draw_alpha_bitmap(glyph_x, glyph_y, metrics, bitmap, color);

            pen_x += metrics.advance_width;
        }
    }

    /// Advance width of a line of text, in pixels
    pub fn measure(&mut self, text: &str) -> f32 {
        let mut width = 0.0;
        for ch in text.chars() {
            let key = (ch, self.size_px.to_bits());
            let (metrics, _) = self
                .cache
                .entry(key)
                .or_insert_with(|| self.font.rasterize(ch, self.size_px));
            width += metrics.advance_width;
        }
        width
    }

    /// Longest prefix of `text` that fits in `max_width` pixels, with a
    /// trailing ellipsis when truncated.
    pub fn fit(&mut self, text: &str, max_width: f32) -> String {
        if self.measure(text) <= max_width {
            return text.to_string();
        }
        let ellipsis_w = self.measure("\u{2026}");
        let mut out = String::new();
        let mut width = 0.0;
        for ch in text.chars() {
            let w = self.measure_char(ch);
            if width + w + ellipsis_w > max_width {
                break;
            }
            out.push(ch);
            width += w;
        }
        out.push('\u{2026}');
        out
    }

    fn measure_char(&mut self, ch: char) -> f32 {
        let key = (ch, self.size_px.to_bits());
        let (metrics, _) = self
            .cache
            .entry(key)
            .or_insert_with(|| self.font.rasterize(ch, self.size_px));
        metrics.advance_width
    }
}
