//! GlyphGrid - a character map accessory
//!
//! Renders a scrollable grid of every character (or raw glyph) a font can
//! draw. Clicking a cell copies the character into a sample line that is
//! mirrored to the system clipboard. The crate follows the Elm Architecture:
//! all state lives in [`model::AppModel`], all changes flow through
//! [`update::update`], and the view paints from an immutable model snapshot.

pub mod caption;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod font;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod sample;
pub mod theme;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::AppConfig;
pub use font::{FontInventory, GlyphSource, InventoryError};
pub use messages::Msg;
pub use model::AppModel;
pub use theme::Theme;
