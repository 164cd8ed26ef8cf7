//! State transitions for the Elm-style architecture
//!
//! `update()` is the only place application state changes. It never touches
//! the window, threads, or the clipboard; side effects come back as [`Cmd`]
//! values for the runtime to execute. Everything here runs headless, which
//! is what makes the gesture and scroll logic testable.

use crate::caption::{self, describe, group_digits, unicode_notation, winalt_notation};
use crate::commands::Cmd;
use crate::messages::{AppMsg, FontMsg, GridMsg, Msg, SampleMsg};
use crate::model::grid::{GridMode, MOUSE_DRIFT};
use crate::model::{AppModel, BuildState, PopupItem, PopupState};
use crate::view::layout::Layout;

pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Grid(msg) => update_grid(model, msg),
        Msg::Font(msg) => update_font(model, msg),
        Msg::Sample(msg) => update_sample(model, msg),
        Msg::App(msg) => update_app(model, msg),
    }
}

// === Grid ===

fn update_grid(model: &mut AppModel, msg: GridMsg) -> Option<Cmd> {
    match msg {
        GridMsg::Hover { cell } => hover(model, cell),
        GridMsg::Leave => hover(model, None),

        GridMsg::Press { cell, x, y } => {
            if model.popup.is_some() {
                return None;
            }
            let changed = model.interaction.hover != cell || model.interaction.pressed != cell;
            match cell {
                Some(index) => {
                    model.interaction.pressed = Some(index);
                    model.interaction.hover = Some(index);
                    model.interaction.press_pos = Some((x, y));
                    refresh_status(model);
                }
                None => {
                    model.interaction.clear();
                    refresh_status(model);
                }
            }
            changed.then_some(Cmd::Redraw)
        }

        GridMsg::Release { cell, x, y, menu } => release(model, cell, x, y, menu),

        GridMsg::ScrollRows(delta) => scroll(model, |g| g.scroll_by_rows(delta)),
        GridMsg::ScrollPage(pages) => scroll(model, |g| g.scroll_by_page(pages)),
        GridMsg::ScrollToRow(row) => scroll(model, |g| g.scroll_to_row(row)),
        GridMsg::ScrollToStart => scroll(model, |g| g.scroll_to_start()),
        GridMsg::ScrollToEnd => scroll(model, |g| g.scroll_to_end()),

        GridMsg::SetMode(mode) => set_mode(model, mode),
        GridMsg::ToggleMode => set_mode(model, model.grid.mode().toggled()),
    }
}

fn hover(model: &mut AppModel, cell: Option<usize>) -> Option<Cmd> {
    if model.popup.is_some() {
        return None;
    }
    let mut changed = model.interaction.hover != cell;
    model.interaction.hover = cell;

    // Drifting onto a different cell cancels the pending click
    if model.interaction.pressed.is_some() && model.interaction.pressed != cell {
        model.interaction.pressed = None;
        model.interaction.press_pos = None;
        changed = true;
    }

    refresh_status(model);
    changed.then_some(Cmd::Redraw)
}

fn release(
    model: &mut AppModel,
    cell: Option<usize>,
    x: f64,
    y: f64,
    menu: bool,
) -> Option<Cmd> {
    let pressed = model.interaction.pressed.take();
    let press_pos = model.interaction.press_pos.take();
    model.interaction.hover = cell;

    let committed = match (pressed, cell, press_pos) {
        (Some(p), Some(c), Some((px, py))) if p == c => {
            (x - px).abs() <= MOUSE_DRIFT && (y - py).abs() <= MOUSE_DRIFT
        }
        _ => false,
    };
    if !committed {
        return Some(Cmd::Redraw);
    }
    let resolved = cell.and_then(|index| model.grid.cell_at(index));
    let Some(resolved) = resolved else {
        return Some(Cmd::Redraw);
    };

    if menu {
        model.popup = Some(PopupState {
            x,
            y,
            cell: resolved,
            caption: model.status.clone(),
        });
        return Some(Cmd::Redraw);
    }

    // A committed click on a glyph with no character still repaints the
    // released cell; there is just nothing to copy
    let Some(text) = resolved.codepoint.and_then(char::from_u32).map(String::from) else {
        return Some(Cmd::Redraw);
    };
    Some(activate(model, &text))
}

/// Put activated text into the sample bar and mirror the whole bar to the
/// clipboard.
fn activate(model: &mut AppModel, text: &str) -> Cmd {
    model.sample.apply(text, model.click_mode);
    Cmd::Batch(vec![
        Cmd::CopyToClipboard(model.sample.text().to_string()),
        Cmd::Redraw,
    ])
}

fn scroll(model: &mut AppModel, f: impl FnOnce(&mut crate::model::GridModel)) -> Option<Cmd> {
    let before = model.grid.top_index();
    f(&mut model.grid);
    if model.grid.top_index() == before {
        return None;
    }
    // Scrolling moves cells under a stationary pointer; stale indices
    // must not survive it
    model.interaction.clear();
    refresh_status(model);
    Some(Cmd::Redraw)
}

fn set_mode(model: &mut AppModel, mode: GridMode) -> Option<Cmd> {
    if model.grid.mode() == mode {
        return None;
    }
    model.grid.set_mode(mode);
    model.interaction.clear();
    model.popup = None;
    refresh_status(model);
    Some(Cmd::Redraw)
}

/// Recompute the status line from the hovered cell (empty when none)
fn refresh_status(model: &mut AppModel) {
    model.status = match model.interaction.hover {
        Some(index) => hover_caption(model, index),
        None => String::new(),
    };
}

/// Caption text for a hovered cell.
///
/// Glyph mode prefixes the glyph number and notes glyphs with no Unicode
/// mapping. Symbol fonts that project their glyphs into the U+F020..U+F0FF
/// private-use range (small fonts only) are annotated with the un-shifted
/// code point, since that is what the user's keyboard produces.
fn hover_caption(model: &AppModel, index: usize) -> String {
    let Some(cell) = model.grid.cell_at(index) else {
        return String::new();
    };
    let mut out = String::new();

    if model.grid.mode() == GridMode::Glyphs {
        if let Some(glyph) = cell.glyph {
            out.push_str(&format!("Glyph {} = ", group_digits(glyph as u64)));
        }
        if cell.codepoint.is_none() {
            out.push_str("no Unicode character mapping");
            return out;
        }
    }

    let Some(cp) = cell.codepoint else {
        return out;
    };

    let small_font = model
        .grid
        .inventory()
        .is_some_and(|inv| inv.char_count() <= 256);
    if small_font && (0xF020..=0xF0FF).contains(&cp) {
        let shifted = cp - 0xF000;
        out.push_str(&unicode_notation(cp));
        out.push_str(" =? ");
        if cfg!(windows) {
            out.push_str(&format!(
                "{} = {}",
                unicode_notation(shifted),
                winalt_notation(shifted)
            ));
        } else {
            out.push_str(&caption::describe(shifted));
        }
        return out;
    }

    out.push_str(&describe(cp));
    out
}

// === Font ===

fn update_font(model: &mut AppModel, msg: FontMsg) -> Option<Cmd> {
    match msg {
        FontMsg::Select { family, size_px } => {
            model.font_request.family = family.clone();
            model.font_request.size_px = size_px;
            model.build = BuildState::Building;
            model.grid.clear_inventory();
            model.interaction.clear();
            model.popup = None;
            model.status.clear();

            let generation = model.next_generation();
            tracing::info!(?family, size_px, generation, "Font selected");
            Some(Cmd::Batch(vec![
                Cmd::BuildInventory {
                    family,
                    size_px,
                    generation,
                },
                Cmd::Redraw,
            ]))
        }

        FontMsg::InventoryReady { generation, result } => {
            if generation != model.current_generation() {
                tracing::debug!(generation, "Discarding stale inventory");
                return None;
            }
            match result {
                Ok(inventory) => {
                    let mut status = format!(
                        "{} characters with {} glyphs",
                        group_digits(inventory.char_count() as u64),
                        group_digits(inventory.glyph_count() as u64)
                    );
                    if let Some(face) = inventory.face() {
                        if let Some(wanted) = &face.substituted_for {
                            status = format!(
                                "{:?} not found, using {} \u{2014} {}",
                                wanted, face.family, status
                            );
                        }
                    }
                    model.status = status;
                    model.grid.set_inventory(inventory);
                    model.interaction.clear();
                    model.popup = None;
                    model.build = BuildState::Ready;
                    apply_layout(model);
                    Some(Cmd::Redraw)
                }
                Err(crate::font::InventoryError::Superseded) => None,
                Err(e) => {
                    model.status = e.to_string();
                    model.build = BuildState::Failed(e);
                    Some(Cmd::Redraw)
                }
            }
        }

        FontMsg::CaptionsLoaded { entries } => {
            tracing::debug!(entries, "Captions loaded");
            // Refresh the status line if the pointer is already on a cell
            if model.interaction.hover.is_some() {
                refresh_status(model);
                return Some(Cmd::Redraw);
            }
            None
        }
    }
}

// === Sample bar ===

fn update_sample(model: &mut AppModel, msg: SampleMsg) -> Option<Cmd> {
    match msg {
        SampleMsg::Activate(text) => Some(activate(model, &text)),
        SampleMsg::Clear => {
            if model.sample.is_empty() {
                return None;
            }
            model.sample.clear();
            Some(Cmd::Redraw)
        }
        SampleMsg::CopyAll => {
            if model.sample.is_empty() {
                return None;
            }
            Some(Cmd::CopyToClipboard(model.sample.text().to_string()))
        }
        SampleMsg::SetClickMode(mode) => {
            if model.click_mode == mode {
                return None;
            }
            model.click_mode = mode;
            model.sync_config();
            Some(Cmd::SaveConfig)
        }
    }
}

// === Application ===

fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Resized { width, height } => {
            if width == 0 || height == 0 {
                return None;
            }
            model.window_width = width;
            model.window_height = height;
            apply_layout(model);
            Some(Cmd::Redraw)
        }

        AppMsg::PopupSelect(item) => {
            let popup = model.popup.take()?;
            if !item.enabled(&popup) {
                return Some(Cmd::Redraw);
            }
            match popup_text(item, &popup) {
                Some(text) => Some(activate(model, &text)),
                None => Some(Cmd::Redraw),
            }
        }

        AppMsg::PopupDismiss => {
            model.popup.take().map(|_| Cmd::Redraw)
        }

        AppMsg::Quit => {
            model.quit_requested = true;
            model.sync_config();
            Some(Cmd::Batch(vec![Cmd::SaveConfig, Cmd::Quit]))
        }
    }
}

/// Text a popup entry produces for its cell
fn popup_text(item: PopupItem, popup: &PopupState) -> Option<String> {
    match item {
        PopupItem::CaptionText => {
            (!popup.caption.is_empty()).then(|| popup.caption.clone())
        }
        PopupItem::CharacterNumber => {
            popup.cell.codepoint.map(|cp| group_digits(cp as u64))
        }
        PopupItem::CharacterText => popup
            .cell
            .codepoint
            .and_then(char::from_u32)
            .map(|c| c.to_string()),
        PopupItem::GlyphNumber => popup.cell.glyph.map(|g| group_digits(g as u64)),
        PopupItem::UnicodeNotation => popup.cell.codepoint.map(unicode_notation),
    }
}

/// Refit the grid to the panel rectangle of the current window size
fn apply_layout(model: &mut AppModel) {
    let layout = Layout::compute(
        model.window_width as usize,
        model.window_height as usize,
        model.ui_line_height,
    );
    model.grid.set_viewport(layout.grid.w, layout.grid.h);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::font::{CancelToken, FontInventory, GlyphSource};
    use crate::theme::Theme;
    use std::sync::Arc;

    /// Minimal source: code points 0x41..0x41+n map to glyphs 1..=n
    struct Fake {
        chars: u32,
        glyphs: u32,
    }

    impl GlyphSource for Fake {
        fn glyph_count(&self) -> u32 {
            self.glyphs
        }
        fn missing_glyph(&self) -> u32 {
            0
        }
        fn claims(&self, cp: u32) -> bool {
            (0x41..0x41 + self.chars).contains(&cp)
        }
        fn glyphs_for(&self, cp: u32, out: &mut Vec<u32>) {
            out.clear();
            if self.claims(cp) {
                out.push(cp - 0x40);
            }
        }
        fn advance_width(&self, _glyph: u32) -> f32 {
            20.0
        }
        fn line_height(&self) -> f32 {
            30.0
        }
        fn ascent(&self) -> f32 {
            24.0
        }
    }

    /// Source projecting its glyphs into the U+F020.. private-use range,
    /// the way legacy symbol fonts do
    struct SymbolFake {
        chars: u32,
    }

    impl GlyphSource for SymbolFake {
        fn glyph_count(&self) -> u32 {
            self.chars + 1
        }
        fn missing_glyph(&self) -> u32 {
            0
        }
        fn claims(&self, cp: u32) -> bool {
            (0xF020..0xF020 + self.chars).contains(&cp)
        }
        fn glyphs_for(&self, cp: u32, out: &mut Vec<u32>) {
            out.clear();
            if self.claims(cp) {
                out.push(cp - 0xF020 + 1);
            }
        }
        fn advance_width(&self, _glyph: u32) -> f32 {
            20.0
        }
        fn line_height(&self) -> f32 {
            30.0
        }
        fn ascent(&self) -> f32 {
            24.0
        }
    }

    fn model_with_symbol_chars(chars: u32) -> AppModel {
        let mut model = AppModel::new(AppConfig::default(), Theme::default());
        let inventory =
            FontInventory::build(&SymbolFake { chars }, &CancelToken::never()).unwrap();
        model.grid.set_inventory(Arc::new(inventory));
        model.build = BuildState::Ready;
        apply_layout(&mut model);
        model
    }

    fn model_with_chars(chars: u32) -> AppModel {
        let mut model = AppModel::new(AppConfig::default(), Theme::default());
        let inventory = FontInventory::build(
            &Fake {
                chars,
                glyphs: chars + 1,
            },
            &CancelToken::never(),
        )
        .unwrap();
        model.grid.set_inventory(Arc::new(inventory));
        model.build = BuildState::Ready;
        apply_layout(&mut model);
        model
    }

    #[test]
    fn test_click_within_drift_activates() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(3), x: 100.0, y: 100.0 }));
        let cmd = update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(3), x: 103.0, y: 98.0, menu: false }),
        );
        assert_eq!(model.sample.text(), "D");
        assert!(matches!(cmd, Some(Cmd::Batch(_))));
        assert!(model.interaction.pressed.is_none());
    }

    #[test]
    fn test_drag_past_drift_cancels() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(3), x: 100.0, y: 100.0 }));
        update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(3), x: 115.0, y: 100.0, menu: false }),
        );
        assert!(model.sample.is_empty());
    }

    #[test]
    fn test_release_on_other_cell_cancels() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(3), x: 100.0, y: 100.0 }));
        update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(4), x: 101.0, y: 100.0, menu: false }),
        );
        assert!(model.sample.is_empty());
    }

    #[test]
    fn test_click_on_unmapped_glyph_copies_nothing() {
        let mut model = model_with_chars(10);
        model.grid.set_mode(GridMode::Glyphs);
        // Glyph 0 has no character; the press state must still clear
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(0), x: 10.0, y: 10.0 }));
        let cmd = update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(0), x: 10.0, y: 10.0, menu: false }),
        );
        assert!(model.sample.is_empty());
        assert!(matches!(cmd, Some(Cmd::Redraw)));
        assert!(model.interaction.pressed.is_none());
    }

    #[test]
    fn test_hover_drift_cancels_pending_click() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(3), x: 100.0, y: 100.0 }));
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(4) }));
        assert!(model.interaction.pressed.is_none());
        update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(3), x: 100.0, y: 100.0, menu: false }),
        );
        assert!(model.sample.is_empty());
    }

    #[test]
    fn test_menu_release_opens_popup() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(2), x: 50.0, y: 60.0 }));
        update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(2), x: 50.0, y: 60.0, menu: true }),
        );
        let popup = model.popup.as_ref().unwrap();
        assert_eq!(popup.cell.codepoint, Some(0x43));
        assert!(model.sample.is_empty());
    }

    #[test]
    fn test_popup_select_unicode_notation() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Press { cell: Some(2), x: 50.0, y: 60.0 }));
        update(
            &mut model,
            Msg::Grid(GridMsg::Release { cell: Some(2), x: 50.0, y: 60.0, menu: true }),
        );
        update(&mut model, Msg::App(AppMsg::PopupSelect(PopupItem::UnicodeNotation)));
        assert_eq!(model.sample.text(), "U+0043");
        assert!(model.popup.is_none());
    }

    #[test]
    fn test_stale_inventory_discarded() {
        let mut model = model_with_chars(10);
        let old_generation = model.current_generation();
        model.next_generation();

        let stale = FontInventory::build(
            &Fake { chars: 3, glyphs: 4 },
            &CancelToken::never(),
        )
        .unwrap();
        let cmd = update(
            &mut model,
            Msg::Font(FontMsg::InventoryReady {
                generation: old_generation,
                result: Ok(Arc::new(stale)),
            }),
        );
        assert!(cmd.is_none());
        assert_eq!(model.grid.cell_count(), 10);
    }

    #[test]
    fn test_failed_build_reported() {
        let mut model = AppModel::new(AppConfig::default(), Theme::default());
        let generation = model.next_generation();
        update(
            &mut model,
            Msg::Font(FontMsg::InventoryReady {
                generation,
                result: Err(crate::font::InventoryError::EmptyFont),
            }),
        );
        assert!(matches!(model.build, BuildState::Failed(_)));
        assert!(!model.status.is_empty());
    }

    #[test]
    fn test_small_symbol_font_caption_remaps() {
        let mut model = model_with_symbol_chars(64);
        let index = model
            .grid
            .inventory()
            .unwrap()
            .char_index_of(0xF041)
            .unwrap();
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(index) }));
        // Small symbol fonts get the un-shifted code point alongside
        assert!(
            model.status.starts_with("U+F041 =? U+0041"),
            "{}",
            model.status
        );
    }

    #[test]
    fn test_large_font_private_use_caption_not_remapped() {
        let mut model = model_with_symbol_chars(300);
        let index = model
            .grid
            .inventory()
            .unwrap()
            .char_index_of(0xF041)
            .unwrap();
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(index) }));
        assert!(model.status.starts_with("U+F041 = "), "{}", model.status);
        assert!(!model.status.contains("=?"), "{}", model.status);
    }

    #[test]
    fn test_press_off_grid_clears_hover() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(3) }));
        assert!(model.interaction.hover.is_some());
        let cmd = update(
            &mut model,
            Msg::Grid(GridMsg::Press { cell: None, x: 2.0, y: 2.0 }),
        );
        assert!(model.interaction.hover.is_none());
        assert!(model.status.is_empty());
        assert!(matches!(cmd, Some(Cmd::Redraw)));
    }

    #[test]
    fn test_mode_toggle_clears_interaction() {
        let mut model = model_with_chars(10);
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(5) }));
        update(&mut model, Msg::Grid(GridMsg::ToggleMode));
        assert_eq!(model.grid.mode(), GridMode::Glyphs);
        assert!(model.interaction.hover.is_none());
        update(&mut model, Msg::Grid(GridMsg::ToggleMode));
        assert_eq!(model.grid.mode(), GridMode::Characters);
    }

    #[test]
    fn test_glyph_mode_caption_without_mapping() {
        let mut model = model_with_chars(5);
        model.grid.set_mode(GridMode::Glyphs);
        // Glyph 0 is the missing-glyph slot; no code point reaches it
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(0) }));
        assert!(model.status.contains("no Unicode character mapping"));
        // Glyph 1 maps back to U+0041
        update(&mut model, Msg::Grid(GridMsg::Hover { cell: Some(1) }));
        assert!(model.status.starts_with("Glyph 1 = "));
        assert!(model.status.contains("U+0041"));
    }

    #[test]
    fn test_activation_copies_whole_sample() {
        let mut model = model_with_chars(10);
        model.click_mode = crate::sample::ClickMode::Insert;
        update(&mut model, Msg::Sample(SampleMsg::Activate("A".into())));
        let cmd = update(&mut model, Msg::Sample(SampleMsg::Activate("B".into())));
        let Some(Cmd::Batch(cmds)) = cmd else {
            panic!("expected batch");
        };
        assert!(cmds
            .iter()
            .any(|c| matches!(c, Cmd::CopyToClipboard(text) if text == "AB")));
    }

    #[test]
    fn test_quit_saves_config() {
        let mut model = model_with_chars(10);
        model.window_width = 900;
        let cmd = update(&mut model, Msg::App(AppMsg::Quit)).unwrap();
        let Cmd::Batch(cmds) = cmd else {
            panic!("expected batch");
        };
        assert!(matches!(cmds[0], Cmd::SaveConfig));
        assert!(matches!(cmds[1], Cmd::Quit));
        assert_eq!(model.config.window_width, 900);
    }
}
