//! Font loading, glyph enumeration, and the character/glyph inventory

pub mod inventory;
pub mod loader;
pub mod source;
pub mod worker;

pub use inventory::{CancelToken, FontFace, FontInventory, InventoryError};
pub use loader::{load_font, FontError, LoadedFont};
pub use source::{FontdueSource, GlyphSource};
