//! Window layout: status bar, grid panel, scrollbar, sample bar
//!
//! All functions here are pure and shared between painting and hit-testing.

use crate::model::PopupState;

/// Width of the vertical scrollbar at the right edge of the grid
pub const SCROLLBAR_WIDTH: usize = 14;
/// Vertical padding inside the status and sample bars
pub const BAR_PADDING: usize = 5;
/// Minimum scrollbar thumb height so it stays grabbable on huge fonts
pub const MIN_THUMB_HEIGHT: usize = 20;

pub const POPUP_WIDTH: usize = 190;
pub const POPUP_ITEM_HEIGHT: usize = 24;
pub const POPUP_PADDING: usize = 4;

/// Pixel rectangle (inclusive origin, exclusive extent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && x < (self.x + self.w) as f64
            && y >= self.y as f64
            && y < (self.y + self.h) as f64
    }
}

/// Height of the status and sample bars for a given UI line height
pub fn bar_height(ui_line_height: usize) -> usize {
    ui_line_height + 2 * BAR_PADDING
}

/// The four fixed regions of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub status: Rect,
    pub grid: Rect,
    pub scrollbar: Rect,
    pub sample: Rect,
}

impl Layout {
    pub fn compute(width: usize, height: usize, ui_line_height: usize) -> Self {
        let bar = bar_height(ui_line_height);
        let middle_h = height.saturating_sub(2 * bar);
        let grid_w = width.saturating_sub(SCROLLBAR_WIDTH);

        Layout {
            status: Rect {
                x: 0,
                y: 0,
                w: width,
                h: bar,
            },
            grid: Rect {
                x: 0,
                y: bar,
                w: grid_w,
                h: middle_h,
            },
            scrollbar: Rect {
                x: grid_w,
                y: bar,
                w: width - grid_w,
                h: middle_h,
            },
            sample: Rect {
                x: 0,
                y: bar + middle_h,
                w: width,
                h: height.saturating_sub(bar + middle_h),
            },
        }
    }
}

/// Scrollbar thumb rectangle, or None when all rows fit the viewport
pub fn thumb_rect(
    track: Rect,
    total_rows: usize,
    visible_rows: usize,
    top_row: usize,
) -> Option<Rect> {
    if total_rows <= visible_rows || track.h == 0 {
        return None;
    }
    let thumb_h = (track.h * visible_rows / total_rows)
        .max(MIN_THUMB_HEIGHT)
        .min(track.h);
    let scrollable = total_rows - visible_rows;
    let travel = track.h - thumb_h;
    let y_off = travel * top_row.min(scrollable) / scrollable;
    Some(Rect {
        x: track.x + 2,
        y: track.y + y_off,
        w: track.w.saturating_sub(4),
        h: thumb_h,
    })
}

/// Map a dragged thumb-top position back to a top row. The caller keeps
/// the grab offset so the thumb does not jump under the pointer.
pub fn row_for_thumb_top(
    track: Rect,
    total_rows: usize,
    visible_rows: usize,
    thumb_top: f64,
) -> usize {
    if total_rows <= visible_rows || track.h == 0 {
        return 0;
    }
    let thumb_h = (track.h * visible_rows / total_rows)
        .max(MIN_THUMB_HEIGHT)
        .min(track.h);
    let travel = (track.h - thumb_h) as f64;
    if travel <= 0.0 {
        return 0;
    }
    let offset = (thumb_top - track.y as f64).clamp(0.0, travel);
    let scrollable = (total_rows - visible_rows) as f64;
    (offset / travel * scrollable).round() as usize
}

/// Popup rectangle anchored at the release point, kept inside the window
pub fn popup_rect(popup: &PopupState, window_w: usize, window_h: usize) -> Rect {
    let item_count = crate::model::PopupItem::ALL.len();
    let w = POPUP_WIDTH;
    let h = item_count * POPUP_ITEM_HEIGHT + 2 * POPUP_PADDING;
    let x = (popup.x as usize).min(window_w.saturating_sub(w));
    let y = (popup.y as usize).min(window_h.saturating_sub(h));
    Rect { x, y, w, h }
}

/// Which popup entry a point lands on
pub fn popup_item_at(rect: Rect, x: f64, y: f64) -> Option<usize> {
    if !rect.contains(x, y) {
        return None;
    }
    let local_y = y as usize - rect.y;
    if local_y < POPUP_PADDING {
        return None;
    }
    let index = (local_y - POPUP_PADDING) / POPUP_ITEM_HEIGHT;
    (index < crate::model::PopupItem::ALL.len()).then_some(index)
}
