//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::sync::Arc;

use crate::font::{FontInventory, InventoryError};
use crate::model::grid::GridMode;
use crate::model::PopupItem;
use crate::sample::ClickMode;

/// Grid messages: scrolling, mode switching, and pointer gestures.
///
/// Pointer messages carry the hit-tested cell plus the raw pixel position;
/// the update layer owns the click-vs-drag discrimination so it stays
/// testable without a window.
#[derive(Debug, Clone)]
pub enum GridMsg {
    /// Pointer moved; `cell` is the hit-tested cell under it, if any
    Hover { cell: Option<usize> },
    /// Primary or secondary button pressed over the grid
    Press { cell: Option<usize>, x: f64, y: f64 },
    /// Button released; `menu` is true for a secondary/modified click
    Release {
        cell: Option<usize>,
        x: f64,
        y: f64,
        menu: bool,
    },
    /// Pointer left the grid area entirely
    Leave,

    // === Scrolling ===
    /// Scroll by whole rows (positive = down)
    ScrollRows(i32),
    /// Scroll by pages (positive = down); one page is rows-1
    ScrollPage(i32),
    /// Absolute scrollbar positioning
    ScrollToRow(usize),
    /// Home key
    ScrollToStart,
    /// End key
    ScrollToEnd,

    /// Switch between character and glyph view
    SetMode(GridMode),
    ToggleMode,
}

/// Font selection and inventory lifecycle messages
#[derive(Debug, Clone)]
pub enum FontMsg {
    /// Select a new font family and/or size; kicks off a background build
    Select { family: Option<String>, size_px: f32 },
    /// A background inventory build finished. Stale generations are
    /// discarded without touching the model.
    InventoryReady {
        generation: u64,
        result: Result<Arc<FontInventory>, InventoryError>,
    },
    /// The caption data file finished loading in the background
    CaptionsLoaded { entries: usize },
}

/// Sample-text bar messages
#[derive(Debug, Clone)]
pub enum SampleMsg {
    /// A grid cell was activated; insert or replace this text
    Activate(String),
    /// Erase the sample text
    Clear,
    /// Copy all sample text to the clipboard without changing it
    CopyAll,
    SetClickMode(ClickMode),
}

/// Application-level messages
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Window resized (inner size in pixels)
    Resized { width: u32, height: u32 },
    /// A popup menu entry was clicked
    PopupSelect(PopupItem),
    /// Dismiss the popup without selecting
    PopupDismiss,
    Quit,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Grid(GridMsg),
    Font(FontMsg),
    Sample(SampleMsg),
    App(AppMsg),
}
