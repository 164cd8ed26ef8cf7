//! The virtual character/glyph grid
//!
//! A fixed-size viewport over an active sequence that may exceed a million
//! cells. Only geometry and the scroll position live here; cell contents
//! come from the shared [`FontInventory`]. All operations are total: every
//! mutation runs through one clamp path that keeps the top-left index on a
//! row boundary and inside the data.

use std::sync::Arc;

use crate::font::FontInventory;

/// Width of the grid lines between cells, in pixels
pub const GRID_LINE_WIDTH: usize = 2;
/// Outside margin of the grid panel, in pixels
pub const PANEL_MARGIN: usize = 5;
/// Margin inside each cell around the drawn character, in pixels
pub const TEXT_MARGIN: usize = 4;
/// Pixel movement allowed before a click becomes a drag
pub const MOUSE_DRIFT: f64 = 10.0;

pub const MIN_FONT_PX: f32 = 8.0;
pub const MAX_FONT_PX: f32 = 999.0;

/// Which sequence the grid displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridMode {
    /// Displayable Unicode code points, ascending
    #[default]
    Characters,
    /// Every raw glyph index of the font, `0..glyph_count`
    Glyphs,
}

impl GridMode {
    pub fn toggled(self) -> Self {
        match self {
            GridMode::Characters => GridMode::Glyphs,
            GridMode::Glyphs => GridMode::Characters,
        }
    }
}

/// One grid position resolved to its identities. In character mode both
/// fields are set; in glyph mode the code point may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub codepoint: Option<u32>,
    pub glyph: Option<u32>,
}

/// Per-cell pixel geometry derived from font metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    /// Widest advance among the font's displayable glyphs
    pub max_width: usize,
    pub line_height: usize,
    pub ascent: usize,
    /// Horizontal offset from one cell to the next
    pub horiz_step: usize,
    /// Vertical offset from one cell to the next
    pub verti_step: usize,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(100, 100, 80)
    }
}

impl CellMetrics {
    pub fn new(max_width: usize, line_height: usize, ascent: usize) -> Self {
        Self {
            max_width,
            line_height,
            ascent,
            horiz_step: max_width + 2 * TEXT_MARGIN + GRID_LINE_WIDTH,
            verti_step: line_height + 2 * TEXT_MARGIN + GRID_LINE_WIDTH,
        }
    }

    pub fn from_inventory(inventory: &FontInventory) -> Self {
        Self::new(
            inventory.max_advance().ceil() as usize,
            inventory.line_height().ceil() as usize,
            inventory.ascent().ceil() as usize,
        )
    }
}

/// Grid state: active sequence selection, viewport geometry, scroll position
#[derive(Debug, Clone, Default)]
pub struct GridModel {
    mode: GridMode,
    inventory: Option<Arc<FontInventory>>,
    metrics: CellMetrics,
    /// Complete columns that fit the viewport (never partial)
    columns: usize,
    /// Complete rows that fit the viewport; a partial trailing row is
    /// painted beyond these
    rows: usize,
    /// Index of the top-left visible cell; always a multiple of `columns`
    top_index: usize,
    viewport: (usize, usize),
    /// Bumped whenever the inventory is replaced; cached cell indices held
    /// elsewhere are invalid across a bump
    generation: u64,
}

impl GridModel {
    pub fn new() -> Self {
        Self {
            columns: 1,
            rows: 1,
            ..Self::default()
        }
    }

    // === Inventory lifecycle ===

    /// Install a freshly built inventory. Geometry is recomputed, the grid
    /// returns to the top, and the generation advances so stale indices
    /// can never be dereferenced against the new font.
    pub fn set_inventory(&mut self, inventory: Arc<FontInventory>) {
        self.metrics = CellMetrics::from_inventory(&inventory);
        self.inventory = Some(inventory);
        self.generation += 1;
        self.top_index = 0;
        self.recompute_viewport();
    }

    /// Drop the inventory (font change in flight or failed build); the
    /// grid enters the safe "nothing to show" state.
    pub fn clear_inventory(&mut self) {
        self.inventory = None;
        self.generation += 1;
        self.top_index = 0;
    }

    pub fn inventory(&self) -> Option<&Arc<FontInventory>> {
        self.inventory.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn metrics(&self) -> &CellMetrics {
        &self.metrics
    }

    // === Mode ===

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    /// Switch the active sequence. Scroll position and any selection
    /// indices are mode-scoped, so the grid returns to the top.
    pub fn set_mode(&mut self, mode: GridMode) {
        if self.mode != mode {
            self.mode = mode;
            self.top_index = 0;
            self.clamp_top();
        }
    }

    // === Geometry ===

    /// Length of the active sequence
    pub fn cell_count(&self) -> usize {
        match (&self.inventory, self.mode) {
            (Some(inv), GridMode::Characters) => inv.char_count(),
            (Some(inv), GridMode::Glyphs) => inv.glyph_count(),
            (None, _) => 0,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn top_index(&self) -> usize {
        self.top_index
    }

    /// Row index of the top-left visible cell
    pub fn top_row(&self) -> usize {
        self.top_index / self.columns.max(1)
    }

    /// Total data rows, counting the partial trailing row
    pub fn total_rows(&self) -> usize {
        self.cell_count().div_ceil(self.columns.max(1))
    }

    /// Set the grid panel size in pixels and refit columns/rows. A
    /// viewport smaller than one cell degenerates to a clipped 1x1 grid
    /// rather than failing.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.viewport = (width, height);
        self.recompute_viewport();
    }

    fn recompute_viewport(&mut self) {
        let (width, height) = self.viewport;
        let usable_w = width.saturating_sub(2 * PANEL_MARGIN + GRID_LINE_WIDTH);
        let usable_h = height.saturating_sub(2 * PANEL_MARGIN + GRID_LINE_WIDTH);
        self.columns = (usable_w / self.metrics.horiz_step).max(1);
        self.rows = (usable_h / self.metrics.verti_step).max(1);

        // Re-express the old position in the new column count, then clamp
        self.top_index = (self.top_index / self.columns) * self.columns;
        self.clamp_top();
    }

    // === Scrolling ===

    /// Greatest allowed top row: the last data row is never scrolled
    /// fully past the viewport.
    fn max_top_row(&self) -> usize {
        self.total_rows().saturating_sub(self.rows)
    }

    fn clamp_top(&mut self) {
        let columns = self.columns.max(1);
        let row = (self.top_index / columns).min(self.max_top_row());
        self.top_index = row * columns;
    }

    /// Absolute scrollbar positioning
    pub fn scroll_to_row(&mut self, row: usize) {
        self.top_index = row.min(self.max_top_row()) * self.columns.max(1);
    }

    /// Scroll by whole rows; positive is down
    pub fn scroll_by_rows(&mut self, delta: i32) {
        let row = self.top_row() as i64 + delta as i64;
        self.scroll_to_row(row.max(0) as usize);
    }

    /// Scroll by pages; one page is `rows - 1` so one row of context
    /// carries over
    pub fn scroll_by_page(&mut self, pages: i32) {
        let step = (self.rows.saturating_sub(1)).max(1) as i32;
        self.scroll_by_rows(pages.saturating_mul(step));
    }

    pub fn scroll_to_start(&mut self) {
        self.top_index = 0;
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to_row(self.max_top_row());
    }

    /// Cell indices the view should paint: the visible rows plus one
    /// partial trailing row, clipped to the data.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = self.top_index + self.columns * (self.rows + 1);
        self.top_index..end.min(self.cell_count())
    }

    // === Cell resolution ===

    /// Resolve an active-sequence index to its identities. Out-of-range
    /// indices (including anything stale from before a mode or font
    /// change) resolve to None, never to an error.
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        let inv = self.inventory.as_ref()?;
        match self.mode {
            GridMode::Characters => {
                let (cp, glyph) = inv.char_at(index)?;
                Some(Cell {
                    codepoint: Some(cp),
                    glyph: Some(glyph),
                })
            }
            GridMode::Glyphs => {
                let (glyph, cp) = inv.glyph_at(index)?;
                Some(Cell {
                    codepoint: cp,
                    glyph: Some(glyph),
                })
            }
        }
    }

    /// Top-left pixel of a visible cell's border box, relative to the grid
    /// panel origin
    pub fn cell_origin(&self, index: usize) -> (usize, usize) {
        let offset = index - self.top_index;
        let x = (offset % self.columns) * self.metrics.horiz_step + PANEL_MARGIN;
        let y = (offset / self.columns) * self.metrics.verti_step + PANEL_MARGIN;
        (x, y)
    }
}
