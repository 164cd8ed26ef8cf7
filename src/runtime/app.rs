//! winit application handler and command execution

use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::Window;

use crate::cli::StartupConfig;
use crate::commands::Cmd;
use crate::config::AppConfig;
use crate::font::worker;
use crate::messages::{AppMsg, FontMsg, GridMsg, Msg};
use crate::model::grid::GridMode;
use crate::model::AppModel;
use crate::theme::Theme;
use crate::update::update;
use crate::view::Renderer;

use super::{input, mouse};

pub struct App {
    model: AppModel,
    startup: StartupConfig,
    renderer: Option<Renderer>,
    window: Option<Rc<Window>>,
    modifiers: ModifiersState,
    mouse_position: Option<(f64, f64)>,
    /// Grab offset of an active scrollbar thumb drag
    thumb_drag: Option<f64>,
    clipboard: Option<arboard::Clipboard>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
}

impl App {
    pub fn new(startup: StartupConfig, config: AppConfig, theme: Theme) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let mut model = AppModel::new(config, theme);
        model.click_mode = startup.click_mode;
        Self {
            model,
            startup,
            renderer: None,
            window: None,
            modifiers: ModifiersState::empty(),
            mouse_position: None,
            thumb_drag: None,
            clipboard: None,
            msg_tx,
            msg_rx,
        }
    }

    /// Run a message through the update loop and execute its effects
    fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            let needs_redraw = cmd.needs_redraw();
            self.process_cmd(cmd);
            if needs_redraw {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            // Handled by the dispatcher through needs_redraw
            Cmd::Redraw => {}

            Cmd::CopyToClipboard(text) => {
                if self.clipboard.is_none() {
                    match arboard::Clipboard::new() {
                        Ok(clipboard) => self.clipboard = Some(clipboard),
                        Err(e) => {
                            tracing::warn!("Clipboard unavailable: {}", e);
                            return;
                        }
                    }
                }
                if let Some(clipboard) = &mut self.clipboard {
                    if let Err(e) = clipboard.set_text(text) {
                        tracing::warn!("Failed to copy to clipboard: {}", e);
                    }
                }
            }

            Cmd::BuildInventory {
                family,
                size_px,
                generation,
            } => {
                worker::spawn_build(
                    family,
                    size_px,
                    generation,
                    self.model.latest_generation.clone(),
                    self.msg_tx.clone(),
                );
            }

            Cmd::SaveConfig => {
                if let Err(e) = self.model.config.save() {
                    tracing::warn!("Failed to save config: {}", e);
                }
            }

            // The exit happens at the event-loop level via quit_requested
            Cmd::Quit => {}

            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    /// Drain messages sent by worker threads
    fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            if let Some(cmd) = update(&mut self.model, msg) {
                if cmd.needs_redraw() {
                    needs_redraw = true;
                }
                self.process_cmd(cmd);
            }
        }
        needs_redraw
    }

    fn render(&mut self) {
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.paint(&self.model) {
                tracing::error!("Render failed: {}", e);
            }
        }
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.dispatch(Msg::App(AppMsg::Resized {
                    width: size.width,
                    height: size.height,
                }));
            }

            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    let ctrl = self.modifiers.control_key() || self.modifiers.super_key();
                    if let Some(msg) =
                        input::handle_key(&self.model, &event.logical_key, ctrl)
                    {
                        self.dispatch(msg);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Some((position.x, position.y));
                if let Some(grab_offset) = self.thumb_drag {
                    let row = mouse::drag_row(&self.model, grab_offset, position.y);
                    self.dispatch(Msg::Grid(GridMsg::ScrollToRow(row)));
                } else if let Some(msg) = mouse::on_move(&self.model, position.x, position.y) {
                    self.dispatch(msg);
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                self.dispatch(Msg::Grid(GridMsg::Leave));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(msg) = mouse::on_wheel(&self.model, delta) {
                    self.dispatch(msg);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let Some((x, y)) = self.mouse_position else {
                    return;
                };
                match state {
                    ElementState::Pressed => match mouse::on_press(&self.model, x, y) {
                        mouse::PressAction::Forward(msg) => self.dispatch(msg),
                        mouse::PressAction::BeginThumbDrag { grab_offset } => {
                            self.thumb_drag = Some(grab_offset);
                        }
                        mouse::PressAction::Ignore => {}
                    },
                    ElementState::Released => {
                        self.thumb_drag = None;
                        let menu = button == MouseButton::Right || self.modifiers.control_key();
                        if let Some(msg) = mouse::on_release(&self.model, x, y, menu) {
                            self.dispatch(msg);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => self.render(),

            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("GlyphGrid")
            .with_inner_size(LogicalSize::new(
                self.model.config.window_width,
                self.model.config.window_height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match Renderer::new(Rc::clone(&window)) {
            Ok(renderer) => {
                self.model.ui_line_height = renderer.ui_line_height();
                self.renderer = Some(renderer);
            }
            Err(e) => {
                tracing::error!("Failed to create renderer: {}", e);
                event_loop.exit();
                return;
            }
        }
        let size = window.inner_size();
        self.window = Some(window);

        crate::caption::load_in_background(
            crate::config_paths::captions_file(),
            self.msg_tx.clone(),
        );

        self.dispatch(Msg::App(AppMsg::Resized {
            width: size.width,
            height: size.height,
        }));
        if self.startup.mode == GridMode::Glyphs {
            self.dispatch(Msg::Grid(GridMsg::SetMode(GridMode::Glyphs)));
        }
        self.dispatch(Msg::Font(FontMsg::Select {
            family: self.startup.family.clone(),
            size_px: self.startup.size_px,
        }));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        if matches!(event, WindowEvent::CloseRequested) {
            self.dispatch(Msg::App(AppMsg::Quit));
        } else {
            self.handle_event(event);
        }

        if self.model.quit_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.process_async_messages() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        if self.model.quit_requested {
            event_loop.exit();
        }
    }
}
