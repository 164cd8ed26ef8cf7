//! Grid cell painting
//!
//! Each visible cell is painted as a flood of grid-line color with the
//! interior knocked out, so neighboring cells share their border lines.
//! The interior fill encodes interaction state: hovered cells keep the
//! grid-line wash, pressed cells invert foreground and background.

use std::collections::HashMap;

use fontdue::Metrics;

use crate::model::grid::{GRID_LINE_WIDTH, TEXT_MARGIN};
use crate::model::AppModel;

use super::frame::Frame;
use super::layout::Rect;

/// Rasterized grid glyphs keyed by glyph index and size bits. Cleared when
/// the inventory generation changes so bitmaps never outlive their font.
pub type CellGlyphCache = HashMap<(u32, u32), (Metrics, Vec<u8>)>;

pub fn paint_cells(
    frame: &mut Frame,
    panel: Rect,
    model: &AppModel,
    cache: &mut CellGlyphCache,
) {
    let Some(inventory) = model.grid.inventory() else {
        return;
    };
    let Some(face) = inventory.face() else {
        return;
    };

    let metrics = *model.grid.metrics();
    let theme = &model.theme;
    let box_w = metrics.horiz_step + GRID_LINE_WIDTH;
    let box_h = metrics.verti_step + GRID_LINE_WIDTH;

    frame.set_clip(panel.x, panel.y, panel.w, panel.h);

    for index in model.grid.visible_range() {
        let Some(cell) = model.grid.cell_at(index) else {
            continue;
        };
        let (cx, cy) = model.grid.cell_origin(index);
        let x = panel.x + cx;
        let y = panel.y + cy;

        let pressed = model.interaction.pressed == Some(index);
        let hovered = model.interaction.hover == Some(index);

        frame.fill_rect(x, y, box_w, box_h, theme.grid_line.argb());
        let interior = if pressed {
            Some(theme.text.argb())
        } else if hovered {
            // Hover keeps the grid-line wash as the interior
            None
        } else {
            Some(theme.background.argb())
        };
        if let Some(color) = interior {
            frame.fill_rect(
                x + GRID_LINE_WIDTH,
                y + GRID_LINE_WIDTH,
                box_w - 2 * GRID_LINE_WIDTH,
                box_h - 2 * GRID_LINE_WIDTH,
                color,
            );
        }

        let Some(glyph) = cell.glyph else {
            continue;
        };
        let key = (glyph, face.size_px.to_bits());
        let (glyph_metrics, bitmap) = cache
            .entry(key)
            .or_insert_with(|| face.font.rasterize_indexed(glyph as u16, face.size_px));

        // Center on the advance width within the widest-glyph cell
        let advance = glyph_metrics.advance_width;
        let pen_x = (x + GRID_LINE_WIDTH + TEXT_MARGIN) as f32
            + (metrics.max_width as f32 - advance) / 2.0;
        let baseline = (y + GRID_LINE_WIDTH + TEXT_MARGIN + metrics.ascent) as f32;

        let glyph_x = pen_x as isize + glyph_metrics.xmin as isize;
        let glyph_y = (baseline - glyph_metrics.height as f32 - glyph_metrics.ymin as f32) as isize;

        let color = if pressed {
            theme.background.argb()
        } else {
            theme.text.argb()
        };
        frame.draw_alpha_bitmap(glyph_x, glyph_y, glyph_metrics, bitmap, color);
    }

    frame.clear_clip();
}
