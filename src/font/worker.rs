//! Background inventory builds
//!
//! The full-range scan is far too slow for the event loop. Each font
//! selection bumps a shared generation counter and spawns one build thread;
//! the thread polls the counter to abandon superseded work and tags its
//! result so the update layer can discard anything stale that still slips
//! through (checked-before-publish).

use std::sync::atomic::AtomicU64;
use std::sync::{mpsc::Sender, Arc};

use crate::messages::{FontMsg, Msg};

use super::inventory::{CancelToken, FontFace, FontInventory, InventoryError};
use super::loader::load_font;
use super::source::FontdueSource;

/// Spawn a build for `generation`. The result arrives on `tx` as
/// `FontMsg::InventoryReady`; a stale or cancelled build reports
/// `InventoryError::Superseded` and the update layer drops it.
pub fn spawn_build(
    family: Option<String>,
    size_px: f32,
    generation: u64,
    latest: Arc<AtomicU64>,
    tx: Sender<Msg>,
) {
    let fallback_tx = tx.clone();
    let spawned = std::thread::Builder::new()
        .name(format!("inventory-build-{}", generation))
        .spawn(move || {
            let cancel = CancelToken::new(generation, latest);
            let result = run_build(family.as_deref(), size_px, &cancel);
            // The receiver disappearing just means the app is shutting down
            let _ = tx.send(Msg::Font(FontMsg::InventoryReady { generation, result }));
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn inventory build thread: {}", e);
        // Surface as an unavailable font rather than hanging in "building"
        let _ = fallback_tx.send(Msg::Font(FontMsg::InventoryReady {
            generation,
            result: Err(InventoryError::FontUnavailable(e.to_string())),
        }));
    }
}

fn run_build(
    family: Option<&str>,
    size_px: f32,
    cancel: &CancelToken,
) -> Result<Arc<FontInventory>, InventoryError> {
    let loaded = load_font(family, size_px)
        .map_err(|e| InventoryError::FontUnavailable(e.to_string()))?;

    if cancel.is_stale() {
        return Err(InventoryError::Superseded);
    }

    let source = FontdueSource::new(Arc::clone(&loaded.font), size_px);
    let started = std::time::Instant::now();
    let inventory = FontInventory::build(&source, cancel)?;
    tracing::debug!(
        family = %loaded.family,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Inventory scan finished"
    );

    Ok(Arc::new(inventory.with_face(FontFace {
        font: loaded.font,
        family: loaded.family,
        substituted_for: loaded.substituted_for,
        size_px,
    })))
}
