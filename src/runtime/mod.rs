//! Runtime: winit/platform integration
//!
//! - `app` - ApplicationHandler, window management, command execution
//! - `input` - keyboard event to message mapping
//! - `mouse` - mouse event handling with hit-testing

pub mod app;
pub mod input;
pub mod mouse;

pub use app::App;
