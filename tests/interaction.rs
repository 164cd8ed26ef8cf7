//! Scenario tests driving pointer and keyboard events through the
//! runtime mapping layer into `update()`

mod common;

use winit::dpi::PhysicalPosition;
use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, NamedKey};

use glyphgrid::commands::Cmd;
use glyphgrid::messages::{FontMsg, GridMsg, Msg};
use glyphgrid::model::AppModel;
use glyphgrid::runtime::input::handle_key;
use glyphgrid::runtime::mouse::{self, PressAction};
use glyphgrid::update::update;
use glyphgrid::view::layout::{self, bar_height, Layout};

use common::model_with_chars;

/// Feed a press/release pair at the given points, as the runtime would
fn click(model: &mut AppModel, down: (f64, f64), up: (f64, f64), menu: bool) -> Option<Cmd> {
    if let PressAction::Forward(msg) = mouse::on_press(model, down.0, down.1) {
        update(model, msg);
    }
    let msg = mouse::on_release(model, up.0, up.1, menu)?;
    update(model, msg)
}

/// Interior point of the first grid cell: lead edge 7 plus a few pixels,
/// below the status bar
fn cell0(model: &AppModel) -> (f64, f64) {
    let bar = bar_height(model.ui_line_height) as f64;
    (15.0, bar + 15.0)
}

#[test]
fn test_click_gesture_copies_character() {
    let mut model = model_with_chars(500);
    let (x, y) = cell0(&model);
    let cmd = click(&mut model, (x, y), (x + 3.0, y - 2.0), false);

    assert_eq!(model.sample.text(), "A");
    let Some(Cmd::Batch(cmds)) = cmd else {
        panic!("expected a batch, got {:?}", cmd);
    };
    assert!(cmds
        .iter()
        .any(|c| matches!(c, Cmd::CopyToClipboard(text) if text == "A")));
    assert!(model.interaction.pressed.is_none());
}

#[test]
fn test_release_off_grid_clears_press() {
    let mut model = model_with_chars(500);
    let (x, y) = cell0(&model);
    // Release lands on the status bar: no cell, no commit
    click(&mut model, (x, y), (x, 5.0), false);

    assert!(model.sample.is_empty());
    assert!(model.interaction.pressed.is_none());
}

#[test]
fn test_wheel_scrolls_and_clamps_to_one_page() {
    let mut model = model_with_chars(500);
    let page = (model.grid.rows() - 1) as i32;

    let msg = mouse::on_wheel(&model, MouseScrollDelta::LineDelta(0.0, -1.0));
    assert!(matches!(msg, Some(Msg::Grid(GridMsg::ScrollRows(1)))));

    let msg = mouse::on_wheel(&model, MouseScrollDelta::LineDelta(0.0, -50.0));
    let Some(Msg::Grid(GridMsg::ScrollRows(rows))) = msg else {
        panic!("expected scroll, got {:?}", msg);
    };
    assert_eq!(rows, page);

    // Sub-row pixel deltas are not a scroll
    let step = model.grid.metrics().verti_step as f64;
    let msg = mouse::on_wheel(
        &model,
        MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, step * 0.3)),
    );
    assert!(msg.is_none());

    if let Some(msg) = mouse::on_wheel(&model, MouseScrollDelta::LineDelta(0.0, -1.0)) {
        update(&mut model, msg);
    }
    assert_eq!(model.grid.top_row(), 1);
}

#[test]
fn test_scrollbar_track_click_pages_down() {
    let mut model = model_with_chars(500);
    let layout = Layout::compute(
        model.window_width as usize,
        model.window_height as usize,
        model.ui_line_height,
    );
    let track = layout.scrollbar;
    let thumb = layout::thumb_rect(
        track,
        model.grid.total_rows(),
        model.grid.rows(),
        model.grid.top_row(),
    )
    .unwrap();

    let x = (track.x + track.w / 2) as f64;
    let y = (thumb.y + thumb.h + 5) as f64;
    let action = mouse::on_press(&model, x, y);
    let PressAction::Forward(msg) = action else {
        panic!("expected a page scroll, got {:?}", action);
    };
    assert!(matches!(msg, Msg::Grid(GridMsg::ScrollPage(1))));

    update(&mut model, msg);
    assert_eq!(model.grid.top_row(), model.grid.rows() - 1);
}

#[test]
fn test_thumb_drag_follows_and_clamps() {
    let model = model_with_chars(500);
    let layout = Layout::compute(
        model.window_width as usize,
        model.window_height as usize,
        model.ui_line_height,
    );
    let track = layout.scrollbar;
    let thumb = layout::thumb_rect(
        track,
        model.grid.total_rows(),
        model.grid.rows(),
        model.grid.top_row(),
    )
    .unwrap();

    // Grab the thumb a few pixels below its top edge
    let x = (track.x + track.w / 2) as f64;
    let y = thumb.y as f64 + 3.0;
    let action = mouse::on_press(&model, x, y);
    let PressAction::BeginThumbDrag { grab_offset } = action else {
        panic!("expected a thumb drag, got {:?}", action);
    };
    assert_eq!(grab_offset, 3.0);

    // Not moving the pointer keeps the top row
    assert_eq!(mouse::drag_row(&model, grab_offset, y), 0);

    // Dragging past the track bottom clamps to the last page
    let max_top = model.grid.total_rows() - model.grid.rows();
    let bottom = (track.y + track.h) as f64 + 100.0;
    assert_eq!(mouse::drag_row(&model, grab_offset, bottom), max_top);
}

#[test]
fn test_popup_captures_the_pointer() {
    let mut model = model_with_chars(500);
    let (x, y) = cell0(&model);
    click(&mut model, (x, y), (x, y), true);
    assert!(model.popup.is_some());

    // Hover and release are swallowed while the menu is open
    assert!(mouse::on_move(&model, x, y).is_none());
    assert!(mouse::on_release(&model, x, y, false).is_none());

    // A press outside the menu dismisses it
    let action = mouse::on_press(&model, 650.0, 460.0);
    let PressAction::Forward(msg) = action else {
        panic!("expected dismiss, got {:?}", action);
    };
    update(&mut model, msg);
    assert!(model.popup.is_none());
    assert!(model.sample.is_empty());
}

#[test]
fn test_popup_item_press_copies_notation() {
    let mut model = model_with_chars(500);
    let (x, y) = cell0(&model);
    click(&mut model, (x, y), (x, y), true);

    let rect = layout::popup_rect(
        model.popup.as_ref().unwrap(),
        model.window_width as usize,
        model.window_height as usize,
    );
    // Fifth entry: Unicode Notation
    let item_x = (rect.x + 12) as f64;
    let item_y = (rect.y + layout::POPUP_PADDING + 4 * layout::POPUP_ITEM_HEIGHT + 12) as f64;
    let action = mouse::on_press(&model, item_x, item_y);
    let PressAction::Forward(msg) = action else {
        panic!("expected a menu selection, got {:?}", action);
    };
    update(&mut model, msg);

    assert_eq!(model.sample.text(), "U+0041");
    assert!(model.popup.is_none());
}

#[test]
fn test_keyboard_navigation_and_shortcuts() {
    let mut model = model_with_chars(500);

    let msg = handle_key(&model, &Key::Named(NamedKey::End), false).unwrap();
    update(&mut model, msg);
    assert!(model.grid.top_row() > 0);

    let msg = handle_key(&model, &Key::Named(NamedKey::Home), false).unwrap();
    update(&mut model, msg);
    assert_eq!(model.grid.top_row(), 0);

    let msg = handle_key(&model, &Key::Character("g".into()), true).unwrap();
    assert!(matches!(msg, Msg::Grid(GridMsg::ToggleMode)));
    // Without Ctrl it is plain typing
    assert!(handle_key(&model, &Key::Character("g".into()), false).is_none());

    let msg = handle_key(&model, &Key::Character("-".into()), true).unwrap();
    let Msg::Font(FontMsg::Select { size_px, .. }) = msg else {
        panic!("expected a font reselect, got {:?}", msg);
    };
    assert_eq!(size_px, model.font_request.size_px - 2.0);
}

#[test]
fn test_escape_only_dismisses_while_popup_open() {
    let mut model = model_with_chars(500);
    let (x, y) = cell0(&model);
    click(&mut model, (x, y), (x, y), true);

    assert!(handle_key(&model, &Key::Named(NamedKey::Home), false).is_none());
    let msg = handle_key(&model, &Key::Named(NamedKey::Escape), false).unwrap();
    update(&mut model, msg);
    assert!(model.popup.is_none());
}
