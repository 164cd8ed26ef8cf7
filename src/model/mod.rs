//! Application state for the Elm-style architecture

pub mod grid;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::font::InventoryError;
use crate::sample::{ClickMode, SampleText};
use crate::theme::Theme;

pub use grid::{Cell, CellMetrics, GridMode, GridModel};

/// Pointer gesture state referencing active-sequence indices. Indices are
/// only valid for the current grid mode and inventory generation; both are
/// cleared whenever either changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionState {
    /// Cell under the pointer, if any
    pub hover: Option<usize>,
    /// Cell where the primary button went down
    pub pressed: Option<usize>,
    /// Pixel position of the press, for click-vs-drag discrimination
    pub press_pos: Option<(f64, f64)>,
}

impl InteractionState {
    pub fn clear(&mut self) {
        self.hover = None;
        self.pressed = None;
        self.press_pos = None;
    }
}

/// Entries of the secondary-click copy menu. Each is a formatter over the
/// resolved cell, not a separate behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupItem {
    CaptionText,
    CharacterNumber,
    CharacterText,
    GlyphNumber,
    UnicodeNotation,
}

impl PopupItem {
    pub const ALL: [PopupItem; 5] = [
        PopupItem::CaptionText,
        PopupItem::CharacterNumber,
        PopupItem::CharacterText,
        PopupItem::GlyphNumber,
        PopupItem::UnicodeNotation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PopupItem::CaptionText => "Caption Text",
            PopupItem::CharacterNumber => "Character Number",
            PopupItem::CharacterText => "Character Text",
            PopupItem::GlyphNumber => "Glyph Number",
            PopupItem::UnicodeNotation => "Unicode Notation",
        }
    }

    /// Whether the entry applies to this cell
    pub fn enabled(self, popup: &PopupState) -> bool {
        match self {
            PopupItem::CaptionText => !popup.caption.is_empty(),
            PopupItem::GlyphNumber => popup.cell.glyph.is_some(),
            PopupItem::CharacterNumber
            | PopupItem::CharacterText
            | PopupItem::UnicodeNotation => popup.cell.codepoint.is_some(),
        }
    }
}

/// The in-window copy menu opened by a secondary click on a cell
#[derive(Debug, Clone)]
pub struct PopupState {
    /// Anchor position in window pixels (the release point)
    pub x: f64,
    pub y: f64,
    /// Cell the menu acts on, resolved at open time
    pub cell: Cell,
    /// Caption text at open time, for "Caption Text"
    pub caption: String,
}

/// Inventory build lifecycle, driving what the view may paint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    /// Inventory installed and ready to paint
    Ready,
    /// A build is in flight; paint status text only
    Building,
    /// The last build failed; paint status text only
    Failed(InventoryError),
}

/// The current font selection
#[derive(Debug, Clone)]
pub struct FontRequest {
    pub family: Option<String>,
    pub size_px: f32,
}

/// Complete application state
pub struct AppModel {
    pub grid: GridModel,
    pub interaction: InteractionState,
    pub sample: SampleText,
    pub click_mode: ClickMode,
    pub popup: Option<PopupState>,
    /// Status/caption line at the top of the window
    pub status: String,
    pub font_request: FontRequest,
    pub build: BuildState,
    /// Latest build generation; shared with worker threads as the
    /// cancellation signal. Bumped by `next_generation`.
    pub latest_generation: Arc<AtomicU64>,
    pub window_width: u32,
    pub window_height: u32,
    /// UI text line height, supplied by the renderer once a font exists
    pub ui_line_height: usize,
    pub theme: Theme,
    pub config: AppConfig,
    pub quit_requested: bool,
}

impl AppModel {
    pub fn new(config: AppConfig, theme: Theme) -> Self {
        let mut grid = GridModel::new();
        grid.set_viewport(config.window_width as usize, config.window_height as usize);
        Self {
            grid,
            interaction: InteractionState::default(),
            sample: SampleText::default(),
            click_mode: config.click_mode,
            popup: None,
            status: String::new(),
            font_request: FontRequest {
                family: config.font_family.clone(),
                size_px: config.font_size_px,
            },
            build: BuildState::Building,
            latest_generation: Arc::new(AtomicU64::new(0)),
            window_width: config.window_width,
            window_height: config.window_height,
            ui_line_height: 18,
            theme,
            config,
            quit_requested: false,
        }
    }

    /// Bump and return the next build generation; any in-flight build
    /// observes the bump through the shared counter and aborts.
    pub fn next_generation(&mut self) -> u64 {
        use std::sync::atomic::Ordering;
        self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_generation(&self) -> u64 {
        use std::sync::atomic::Ordering;
        self.latest_generation.load(Ordering::SeqCst)
    }

    /// Sync persisted fields from live state before a save
    pub fn sync_config(&mut self) {
        self.config.font_family = self.font_request.family.clone();
        self.config.font_size_px = self.font_request.size_px;
        self.config.click_mode = self.click_mode;
        self.config.window_width = self.window_width;
        self.config.window_height = self.window_height;
    }
}
