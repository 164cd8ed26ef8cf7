//! Mouse event to message mapping
//!
//! Pure functions over the model and pointer position; the [`App`](super::App)
//! owns the only piece of mouse state that survives between events (an
//! active scrollbar drag) and executes whatever these return.

use winit::event::MouseScrollDelta;

use crate::messages::{AppMsg, GridMsg, Msg};
use crate::model::{AppModel, PopupItem};
use crate::view::hit_test::{hit_test, HitTarget, ScrollbarPart};
use crate::view::layout::{self, Layout};

/// What a button press asks the runtime to do
#[derive(Debug)]
pub enum PressAction {
    Forward(Msg),
    /// Start dragging the scrollbar thumb; `grab_offset` is the distance
    /// from the thumb's top edge to the pointer
    BeginThumbDrag { grab_offset: f64 },
    Ignore,
}

pub fn on_press(model: &AppModel, x: f64, y: f64) -> PressAction {
    match hit_test(model, x, y) {
        // Menus commit on press
        HitTarget::PopupItem(i) => {
            PressAction::Forward(Msg::App(AppMsg::PopupSelect(PopupItem::ALL[i])))
        }
        HitTarget::PopupOutside => PressAction::Forward(Msg::App(AppMsg::PopupDismiss)),

        HitTarget::Cell(index) => PressAction::Forward(Msg::Grid(GridMsg::Press {
            cell: Some(index),
            x,
            y,
        })),
        HitTarget::Grid => PressAction::Forward(Msg::Grid(GridMsg::Press { cell: None, x, y })),

        HitTarget::Scrollbar(ScrollbarPart::Thumb) => {
            match current_thumb(model) {
                Some(thumb) => PressAction::BeginThumbDrag {
                    grab_offset: y - thumb.y as f64,
                },
                // No thumb means nothing to scroll
                None => PressAction::Ignore,
            }
        }
        HitTarget::Scrollbar(ScrollbarPart::Above) => {
            PressAction::Forward(Msg::Grid(GridMsg::ScrollPage(-1)))
        }
        HitTarget::Scrollbar(ScrollbarPart::Below) => {
            PressAction::Forward(Msg::Grid(GridMsg::ScrollPage(1)))
        }

        HitTarget::StatusBar | HitTarget::SampleBar | HitTarget::Outside => PressAction::Ignore,
    }
}

/// Button release. Always produces a `Release` so a press that wandered
/// off the grid still gets cleared; the popup consumed its press already.
pub fn on_release(model: &AppModel, x: f64, y: f64, menu: bool) -> Option<Msg> {
    if model.popup.is_some() {
        return None;
    }
    let cell = match hit_test(model, x, y) {
        HitTarget::Cell(index) => Some(index),
        _ => None,
    };
    Some(Msg::Grid(GridMsg::Release { cell, x, y, menu }))
}

pub fn on_move(model: &AppModel, x: f64, y: f64) -> Option<Msg> {
    if model.popup.is_some() {
        return None;
    }
    let cell = match hit_test(model, x, y) {
        HitTarget::Cell(index) => Some(index),
        _ => None,
    };
    Some(Msg::Grid(GridMsg::Hover { cell }))
}

/// Wheel scrolling, clamped to one page per event so an aggressive wheel
/// never skips content.
pub fn on_wheel(model: &AppModel, delta: MouseScrollDelta) -> Option<Msg> {
    let rows = match delta {
        MouseScrollDelta::LineDelta(_, y) => -y.round() as i32,
        MouseScrollDelta::PixelDelta(pos) => {
            let step = model.grid.metrics().verti_step.max(1) as f64;
            -(pos.y / step).round() as i32
        }
    };
    if rows == 0 {
        return None;
    }
    let page = (model.grid.rows().saturating_sub(1)).max(1) as i32;
    Some(Msg::Grid(GridMsg::ScrollRows(rows.clamp(-page, page))))
}

/// Top row for an in-progress thumb drag
pub fn drag_row(model: &AppModel, grab_offset: f64, y: f64) -> usize {
    let layout = Layout::compute(
        model.window_width as usize,
        model.window_height as usize,
        model.ui_line_height,
    );
    layout::row_for_thumb_top(
        layout.scrollbar,
        model.grid.total_rows(),
        model.grid.rows(),
        y - grab_offset,
    )
}

fn current_thumb(model: &AppModel) -> Option<layout::Rect> {
    let layout = Layout::compute(
        model.window_width as usize,
        model.window_height as usize,
        model.ui_line_height,
    );
    layout::thumb_rect(
        layout.scrollbar,
        model.grid.total_rows(),
        model.grid.rows(),
        model.grid.top_row(),
    )
}
