//! Keyboard event to message mapping

use winit::keyboard::{Key, NamedKey};

use crate::messages::{AppMsg, FontMsg, GridMsg, Msg, SampleMsg};
use crate::model::grid::{MAX_FONT_PX, MIN_FONT_PX};
use crate::model::AppModel;
use crate::sample::ClickMode;

/// Pixels added or removed per Ctrl+Plus / Ctrl+Minus
const SIZE_STEP: f32 = 2.0;

pub fn handle_key(model: &AppModel, key: &Key, ctrl: bool) -> Option<Msg> {
    // The popup swallows everything except dismissal
    if model.popup.is_some() {
        return match key {
            Key::Named(NamedKey::Escape) => Some(Msg::App(AppMsg::PopupDismiss)),
            _ => None,
        };
    }

    match key {
        Key::Named(NamedKey::Escape) => Some(Msg::Sample(SampleMsg::Clear)),
        Key::Named(NamedKey::Home) => Some(Msg::Grid(GridMsg::ScrollToStart)),
        Key::Named(NamedKey::End) => Some(Msg::Grid(GridMsg::ScrollToEnd)),
        Key::Named(NamedKey::ArrowUp) => Some(Msg::Grid(GridMsg::ScrollRows(-1))),
        Key::Named(NamedKey::ArrowDown) => Some(Msg::Grid(GridMsg::ScrollRows(1))),
        Key::Named(NamedKey::PageUp) => Some(Msg::Grid(GridMsg::ScrollPage(-1))),
        Key::Named(NamedKey::PageDown) => Some(Msg::Grid(GridMsg::ScrollPage(1))),

        Key::Character(s) if ctrl && s.eq_ignore_ascii_case("g") => {
            Some(Msg::Grid(GridMsg::ToggleMode))
        }
        Key::Character(s) if ctrl && s.eq_ignore_ascii_case("c") => {
            Some(Msg::Sample(SampleMsg::CopyAll))
        }
        Key::Character(s) if ctrl && s.eq_ignore_ascii_case("l") => {
            Some(Msg::Sample(SampleMsg::Clear))
        }
        Key::Character(s) if ctrl && s.eq_ignore_ascii_case("r") => {
            let mode = match model.click_mode {
                ClickMode::Insert => ClickMode::Replace,
                ClickMode::Replace => ClickMode::Insert,
            };
            Some(Msg::Sample(SampleMsg::SetClickMode(mode)))
        }
        Key::Character(s) if ctrl && (s == "+" || s == "=") => resize_font(model, SIZE_STEP),
        Key::Character(s) if ctrl && s == "-" => resize_font(model, -SIZE_STEP),

        _ => None,
    }
}

/// Bump the display size, triggering a fresh inventory build
fn resize_font(model: &AppModel, delta: f32) -> Option<Msg> {
    let size_px = (model.font_request.size_px + delta).clamp(MIN_FONT_PX, MAX_FONT_PX);
    if size_px == model.font_request.size_px {
        return None;
    }
    Some(Msg::Font(FontMsg::Select {
        family: model.font_request.family.clone(),
        size_px,
    }))
}
