//! Rendering: softbuffer surface, frame composition, and all painting
//!
//! The window is composed from a CPU pixel buffer each frame: grid cells,
//! the caption/status bar, the sample bar, the scrollbar, and the popup
//! menu when open. The chrome text uses a small fixed-size UI font loaded
//! once; the grid uses the inventory's own font at the selected size.

pub mod frame;
pub mod grid;
pub mod hit_test;
pub mod layout;
pub mod text;

use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use fontdue::Font;
use softbuffer::{Context, Surface};
use winit::window::Window;

use crate::model::grid::{GridMode, PANEL_MARGIN};
use crate::model::{AppModel, BuildState, PopupItem};

use frame::Frame;
use grid::CellGlyphCache;
use layout::{Layout, BAR_PADDING, POPUP_ITEM_HEIGHT, POPUP_PADDING};
use text::{TextPainter, UiGlyphCache};

/// Size of the chrome text, independent of the grid font size
const UI_FONT_PX: f32 = 14.0;

pub struct Renderer {
    surface: Surface<Rc<Window>, Rc<Window>>,
    back_buffer: Vec<u32>,
    width: u32,
    height: u32,

    ui_font: Arc<Font>,
    ui_ascent: f32,
    ui_line_height: usize,
    ui_cache: UiGlyphCache,

    cell_cache: CellGlyphCache,
    /// Inventory generation the cell cache was built against
    cell_generation: u64,
}

impl Renderer {
    pub fn new(window: Rc<Window>) -> anyhow::Result<Self> {
        let context = Context::new(window.clone())
            .map_err(|e| anyhow!("failed to create softbuffer context: {e}"))?;
        let surface = Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("failed to create softbuffer surface: {e}"))?;

        let loaded = crate::font::load_font(None, UI_FONT_PX)
            .context("loading the UI font")?;
        let (ui_ascent, ui_line_height) = match loaded.font.horizontal_line_metrics(UI_FONT_PX) {
            Some(m) => (m.ascent, m.new_line_size.ceil() as usize),
            None => (UI_FONT_PX * 0.8, (UI_FONT_PX * 1.2).ceil() as usize),
        };

        let size = window.inner_size();
        Ok(Self {
            surface,
            back_buffer: Vec::new(),
            width: size.width,
            height: size.height,
            ui_font: loaded.font,
            ui_ascent,
            ui_line_height,
            ui_cache: UiGlyphCache::new(),
            cell_cache: CellGlyphCache::new(),
            cell_generation: 0,
        })
    }

    /// Line height of the chrome font; the model needs it for layout
    pub fn ui_line_height(&self) -> usize {
        self.ui_line_height
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn paint(&mut self, model: &AppModel) -> anyhow::Result<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(self.width), NonZeroU32::new(self.height))
        else {
            return Ok(());
        };
        self.surface
            .resize(w, h)
            .map_err(|e| anyhow!("failed to resize surface: {e}"))?;

        let width = self.width as usize;
        let height = self.height as usize;
        self.back_buffer.resize(width * height, 0);

        if self.cell_generation != model.grid.generation() {
            self.cell_cache.clear();
            self.cell_generation = model.grid.generation();
        }

        let theme = &model.theme;
        let layout = Layout::compute(width, height, self.ui_line_height);
        {
            let mut frame = Frame::new(&mut self.back_buffer, width, height);
            frame.clear(theme.background.argb());

            let mut painter =
                TextPainter::new(&self.ui_font, &mut self.ui_cache, UI_FONT_PX, self.ui_ascent);

            match &model.build {
                BuildState::Ready => {
                    grid::paint_cells(&mut frame, layout.grid, model, &mut self.cell_cache);
                }
                BuildState::Building => {
                    painter.draw(
                        &mut frame,
                        layout.grid.x + PANEL_MARGIN,
                        layout.grid.y + PANEL_MARGIN,
                        "Scanning font, please wait...",
                        theme.popup_disabled.argb(),
                    );
                }
                BuildState::Failed(e) => {
                    painter.draw(
                        &mut frame,
                        layout.grid.x + PANEL_MARGIN,
                        layout.grid.y + PANEL_MARGIN,
                        &e.to_string(),
                        theme.popup_disabled.argb(),
                    );
                }
            }

            paint_status_bar(&mut frame, layout, model, &mut painter);
            paint_sample_bar(&mut frame, layout, model, &mut painter);
            paint_scrollbar(&mut frame, layout, model);
            paint_popup(&mut frame, model, &mut painter, width, height);
        }

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow!("failed to get surface buffer: {e}"))?;
        buffer.copy_from_slice(&self.back_buffer);
        buffer
            .present()
            .map_err(|e| anyhow!("failed to present frame: {e}"))?;
        Ok(())
    }
}

fn mode_label(mode: GridMode) -> &'static str {
    match mode {
        GridMode::Characters => "characters",
        GridMode::Glyphs => "glyphs",
    }
}

fn paint_status_bar(
    frame: &mut Frame,
    layout: Layout,
    model: &AppModel,
    painter: &mut TextPainter,
) {
    let bar = layout.status;
    frame.fill_rect(bar.x, bar.y, bar.w, bar.h, model.theme.bar_background.argb());

    let text_y = bar.y + BAR_PADDING;
    let text_color = model.theme.bar_text.argb();

    // Right side: current font and mode
    let font_label = match model.grid.inventory().and_then(|inv| inv.face()) {
        Some(face) => format!(
            "{} {:.0}px \u{00B7} {}",
            face.family,
            face.size_px,
            mode_label(model.grid.mode())
        ),
        None => format!(
            "{:.0}px \u{00B7} {}",
            model.font_request.size_px,
            mode_label(model.grid.mode())
        ),
    };
    let label_w = painter.measure(&font_label);
    let label_x = (bar.w as f32 - label_w - BAR_PADDING as f32).max(0.0) as usize;
    painter.draw(frame, label_x, text_y, &font_label, text_color);

    // Left side: the hover caption / status line, truncated before the label
    let avail = label_x.saturating_sub(2 * BAR_PADDING) as f32;
    let status = painter.fit(&model.status, avail);
    painter.draw(frame, bar.x + BAR_PADDING, text_y, &status, text_color);
}

fn paint_sample_bar(
    frame: &mut Frame,
    layout: Layout,
    model: &AppModel,
    painter: &mut TextPainter,
) {
    let bar = layout.sample;
    frame.fill_rect(bar.x, bar.y, bar.w, bar.h, model.theme.bar_background.argb());

    let text_y = bar.y + BAR_PADDING;
    let avail = bar.w.saturating_sub(2 * BAR_PADDING) as f32;
    if model.sample.is_empty() {
        painter.draw(
            frame,
            bar.x + BAR_PADDING,
            text_y,
            "Click a character to copy it here",
            model.theme.popup_disabled.argb(),
        );
    } else {
        let text = painter.fit(model.sample.text(), avail);
        painter.draw(
            frame,
            bar.x + BAR_PADDING,
            text_y,
            &text,
            model.theme.bar_text.argb(),
        );
    }
}

fn paint_scrollbar(frame: &mut Frame, layout: Layout, model: &AppModel) {
    let track = layout.scrollbar;
    frame.fill_rect(
        track.x,
        track.y,
        track.w,
        track.h,
        model.theme.scrollbar_track.argb(),
    );
    if let Some(thumb) = layout::thumb_rect(
        track,
        model.grid.total_rows(),
        model.grid.rows(),
        model.grid.top_row(),
    ) {
        frame.fill_rect(
            thumb.x,
            thumb.y,
            thumb.w,
            thumb.h,
            model.theme.scrollbar_thumb.argb(),
        );
    }
}

fn paint_popup(
    frame: &mut Frame,
    model: &AppModel,
    painter: &mut TextPainter,
    width: usize,
    height: usize,
) {
    let Some(popup) = &model.popup else {
        return;
    };
    let rect = layout::popup_rect(popup, width, height);
    frame.draw_bordered_rect(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        model.theme.popup_background.argb(),
        model.theme.popup_border.argb(),
    );

    for (i, item) in PopupItem::ALL.iter().enumerate() {
        let color = if item.enabled(popup) {
            model.theme.bar_text.argb()
        } else {
            model.theme.popup_disabled.argb()
        };
        let item_y = rect.y + POPUP_PADDING + i * POPUP_ITEM_HEIGHT;
        let text_y = item_y + POPUP_ITEM_HEIGHT.saturating_sub(16) / 2;
        painter.draw(frame, rect.x + 12, text_y, item.label(), color);
    }
}
