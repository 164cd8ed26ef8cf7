//! Pointer position to grid cell / window region resolution

use crate::model::grid::{GridModel, GRID_LINE_WIDTH, PANEL_MARGIN, TEXT_MARGIN};
use crate::model::AppModel;

use super::layout::{self, Layout, Rect};

/// What part of the scrollbar a point landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollbarPart {
    Thumb,
    /// Track above the thumb (page up)
    Above,
    /// Track below the thumb (page down)
    Below,
}

/// What a pointer position resolves to, checked in z-order (popup first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    PopupItem(usize),
    /// Popup is open and the point is outside it
    PopupOutside,
    /// A live grid cell
    Cell(usize),
    /// Grid panel background: margins, grid lines, past-the-end area
    Grid,
    Scrollbar(ScrollbarPart),
    StatusBar,
    SampleBar,
    /// Degenerate window region not covered by any panel
    Outside,
}

/// Resolve a window-space pointer position against the full model
pub fn hit_test(model: &AppModel, x: f64, y: f64) -> HitTarget {
    let width = model.window_width as usize;
    let height = model.window_height as usize;

    if let Some(popup) = &model.popup {
        let rect = layout::popup_rect(popup, width, height);
        return match layout::popup_item_at(rect, x, y) {
            Some(i) => HitTarget::PopupItem(i),
            // The padding band inside the menu counts as outside too; a
            // press there dismisses rather than selecting
            None => HitTarget::PopupOutside,
        };
    }

    let layout = Layout::compute(width, height, model.ui_line_height);
    if layout.status.contains(x, y) {
        return HitTarget::StatusBar;
    }
    if layout.sample.contains(x, y) {
        return HitTarget::SampleBar;
    }
    if layout.scrollbar.contains(x, y) {
        let part = scrollbar_part(&model.grid, layout.scrollbar, y);
        return HitTarget::Scrollbar(part);
    }
    if layout.grid.contains(x, y) {
        let local_x = x - layout.grid.x as f64;
        let local_y = y - layout.grid.y as f64;
        return match cell_at_point(&model.grid, local_x, local_y) {
            Some(index) => HitTarget::Cell(index),
            None => HitTarget::Grid,
        };
    }
    HitTarget::Outside
}

fn scrollbar_part(grid: &GridModel, track: Rect, y: f64) -> ScrollbarPart {
    match layout::thumb_rect(track, grid.total_rows(), grid.rows(), grid.top_row()) {
        Some(thumb) if y < thumb.y as f64 => ScrollbarPart::Above,
        Some(thumb) if y >= (thumb.y + thumb.h) as f64 => ScrollbarPart::Below,
        Some(_) => ScrollbarPart::Thumb,
        // No thumb means nothing to scroll; treat the whole track as inert
        None => ScrollbarPart::Thumb,
    }
}

/// Resolve a grid-panel-local position to a cell index.
///
/// Only the interior of a cell counts: positions on a grid line or inside
/// the text margin bands resolve to None, so near-miss clicks do nothing
/// rather than acting on a neighbor. Total over all inputs.
pub fn cell_at_point(grid: &GridModel, x: f64, y: f64) -> Option<usize> {
    let metrics = grid.metrics();
    let h_step = metrics.horiz_step as f64;
    let v_step = metrics.verti_step as f64;
    let lead = (GRID_LINE_WIDTH + PANEL_MARGIN) as f64;

    let col_off = x - lead;
    let row_off = y - lead;
    if col_off < 0.0 || row_off < 0.0 {
        return None;
    }

    let col = (col_off / h_step) as usize;
    let col_rem = col_off % h_step;
    if col >= grid.columns()
        || col_rem < TEXT_MARGIN as f64
        || col_rem > h_step - (GRID_LINE_WIDTH + TEXT_MARGIN) as f64
    {
        return None;
    }

    let row = (row_off / v_step) as usize;
    let row_rem = row_off % v_step;
    if row_rem < TEXT_MARGIN as f64
        || row_rem > v_step - (GRID_LINE_WIDTH + TEXT_MARGIN) as f64
    {
        return None;
    }

    let index = grid.top_index() + row * grid.columns() + col;
    (index < grid.cell_count()).then_some(index)
}
