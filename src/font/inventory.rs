//! The character/glyph inventory
//!
//! Built once per (family, size) selection by a full linear scan of the
//! Unicode range. The scan is the dominant cost of a font change (hundreds
//! of milliseconds for large fonts) and is deliberately preserved: there is
//! no faster honest answer to "which code points does this font draw with a
//! real glyph". It runs on a worker thread and polls a cancellation token
//! so a newer selection can abandon it early.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::source::GlyphSource;

/// Full Unicode range scanned by the build
pub const MIN_CODEPOINT: u32 = 0x0000;
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Lower bound on the widest-glyph measurement, so degenerate fonts still
/// produce usable cells
const MIN_MAX_ADVANCE: f32 = 10.0;

/// How often the scan polls for cancellation (in code points)
const CANCEL_POLL_MASK: u32 = 0x0FFF;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The font resolved but has no displayable characters or no glyphs
    #[error("font has no displayable characters")]
    EmptyFont,
    /// A newer font selection cancelled this build
    #[error("inventory build superseded by a newer selection")]
    Superseded,
    /// Neither the requested family nor any fallback could be loaded
    #[error("no usable font found: {0}")]
    FontUnavailable(String),
}

/// Shared cancellation token: the scan aborts once the latest generation
/// moves past the one this build was started for.
#[derive(Clone)]
pub struct CancelToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl CancelToken {
    pub fn new(generation: u64, latest: Arc<AtomicU64>) -> Self {
        Self { generation, latest }
    }

    /// A token that never cancels (for tests and synchronous builds)
    pub fn never() -> Self {
        Self {
            generation: 0,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_stale(&self) -> bool {
        self.latest.load(Ordering::Relaxed) != self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The loaded font resource behind an inventory, kept alongside it so glyph
/// indices never outlive the font they index into.
#[derive(Clone)]
pub struct FontFace {
    pub font: Arc<fontdue::Font>,
    /// Resolved family (file stem of the loaded font)
    pub family: String,
    /// The family the user asked for, when a fallback was substituted
    pub substituted_for: Option<String>,
    pub size_px: f32,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("substituted_for", &self.substituted_for)
            .field("size_px", &self.size_px)
            .finish()
    }
}

/// Bidirectional character/glyph mapping plus the metrics the grid derives
/// its cell size from. Immutable once built; share via `Arc`.
pub struct FontInventory {
    /// Displayable code points, ascending. Indexes the character view.
    char_codes: Vec<u32>,
    /// Glyph drawn for each entry of `char_codes` (parallel array)
    char_glyphs: Vec<u32>,
    /// First code point observed per glyph index, or None for unmapped
    glyph_codes: Vec<Option<u32>>,
    glyph_count: u32,
    /// Widest advance among accepted glyphs (>= MIN_MAX_ADVANCE)
    max_advance: f32,
    ascent: f32,
    line_height: f32,
    face: Option<FontFace>,
}

impl fmt::Debug for FontInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontInventory")
            .field("chars", &self.char_codes.len())
            .field("glyphs", &self.glyph_count)
            .field("face", &self.face)
            .finish()
    }
}

impl FontInventory {
    /// Enumerate every code point in `[MIN_CODEPOINT, MAX_CODEPOINT]` and
    /// record which ones the source draws with a real (non-missing) glyph.
    ///
    /// A code point is displayable when at least one glyph of its sequence
    /// is inside `[0, glyph_count)` and is not the missing-glyph sentinel;
    /// the first such glyph becomes its cell glyph. Each glyph remembers
    /// only the first (lowest) code point that reached it.
    pub fn build(
        source: &dyn GlyphSource,
        cancel: &CancelToken,
    ) -> Result<FontInventory, InventoryError> {
        let glyph_count = source.glyph_count();
        if glyph_count == 0 {
            return Err(InventoryError::EmptyFont);
        }
        let missing = source.missing_glyph();

        let mut char_codes = Vec::new();
        let mut char_glyphs = Vec::new();
        let mut glyph_codes: Vec<Option<u32>> = vec![None; glyph_count as usize];
        let mut max_advance = MIN_MAX_ADVANCE;
        let mut sequence = Vec::with_capacity(8);

        for cp in MIN_CODEPOINT..=MAX_CODEPOINT {
            if cp & CANCEL_POLL_MASK == 0 && cancel.is_stale() {
                tracing::debug!("Inventory build cancelled at U+{:04X}", cp);
                return Err(InventoryError::Superseded);
            }

            // The claim is an optimization only; glyphs_for re-verifies it.
            if !source.claims(cp) {
                continue;
            }
            source.glyphs_for(cp, &mut sequence);

            let mut first_glyph = None;
            for &glyph in &sequence {
                if glyph < glyph_count && glyph != missing {
                    if first_glyph.is_none() {
                        first_glyph = Some(glyph);
                    }
                    let slot = &mut glyph_codes[glyph as usize];
                    if slot.is_none() {
                        *slot = Some(cp);
                    }
                }
            }

            if let Some(glyph) = first_glyph {
                char_codes.push(cp);
                char_glyphs.push(glyph);
                max_advance = max_advance.max(source.advance_width(glyph));
            }
        }

        if char_codes.is_empty() {
            return Err(InventoryError::EmptyFont);
        }

        tracing::info!(
            chars = char_codes.len(),
            glyphs = glyph_count,
            "Inventory build complete"
        );

        Ok(FontInventory {
            char_codes,
            char_glyphs,
            glyph_codes,
            glyph_count,
            max_advance,
            ascent: source.ascent(),
            line_height: source.line_height(),
            face: None,
        })
    }

    /// Attach the loaded font resource (done by the worker; tests skip it)
    pub fn with_face(mut self, face: FontFace) -> Self {
        self.face = Some(face);
        self
    }

    pub fn face(&self) -> Option<&FontFace> {
        self.face.as_ref()
    }

    /// Number of displayable characters (length of the character view)
    pub fn char_count(&self) -> usize {
        self.char_codes.len()
    }

    /// Number of glyphs in the font (length of the glyph view)
    pub fn glyph_count(&self) -> usize {
        self.glyph_count as usize
    }

    /// Code point and glyph for index `i` of the character view
    pub fn char_at(&self, i: usize) -> Option<(u32, u32)> {
        Some((*self.char_codes.get(i)?, self.char_glyphs[i]))
    }

    /// Glyph index and first mapped code point for index `i` of the glyph
    /// view (the glyph view is simply `0..glyph_count`)
    pub fn glyph_at(&self, i: usize) -> Option<(u32, Option<u32>)> {
        if i < self.glyph_count as usize {
            Some((i as u32, self.glyph_codes[i]))
        } else {
            None
        }
    }

    /// Glyph drawn for a code point, if the font displays it
    pub fn glyph_for(&self, cp: u32) -> Option<u32> {
        let i = self.char_codes.binary_search(&cp).ok()?;
        Some(self.char_glyphs[i])
    }

    /// First code point mapped to a glyph, if any
    pub fn code_for(&self, glyph: u32) -> Option<u32> {
        *self.glyph_codes.get(glyph as usize)?
    }

    /// Position of a code point within the character view
    pub fn char_index_of(&self, cp: u32) -> Option<usize> {
        self.char_codes.binary_search(&cp).ok()
    }

    pub fn max_advance(&self) -> f32 {
        self.max_advance
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Fake source: a handful of code points map to glyphs, one glyph is
    /// shared, and one claim is a lie (maps to the missing glyph).
    struct FakeSource {
        glyph_count: u32,
        map: BTreeMap<u32, Vec<u32>>,
        claims_everything: bool,
    }

    impl GlyphSource for FakeSource {
        fn glyph_count(&self) -> u32 {
            self.glyph_count
        }
        fn missing_glyph(&self) -> u32 {
            0
        }
        fn claims(&self, cp: u32) -> bool {
            self.claims_everything || self.map.contains_key(&cp)
        }
        fn glyphs_for(&self, cp: u32, out: &mut Vec<u32>) {
            out.clear();
            if let Some(glyphs) = self.map.get(&cp) {
                out.extend_from_slice(glyphs);
            }
        }
        fn advance_width(&self, glyph: u32) -> f32 {
            8.0 + glyph as f32
        }
        fn line_height(&self) -> f32 {
            20.0
        }
        fn ascent(&self) -> f32 {
            16.0
        }
    }

    fn fake() -> FakeSource {
        let mut map = BTreeMap::new();
        map.insert(0x41, vec![5]); // A
        map.insert(0x42, vec![6]); // B
        map.insert(0x43, vec![5]); // C shares A's glyph
        map.insert(0x44, vec![0]); // claimed but missing-glyph only
        map.insert(0x45, vec![99]); // claimed but out of range
        FakeSource {
            glyph_count: 10,
            map,
            claims_everything: false,
        }
    }

    #[test]
    fn test_build_accepts_only_real_glyphs() {
        let inv = FontInventory::build(&fake(), &CancelToken::never()).unwrap();
        assert_eq!(inv.char_count(), 3);
        assert_eq!(inv.glyph_for(0x41), Some(5));
        assert_eq!(inv.glyph_for(0x42), Some(6));
        assert_eq!(inv.glyph_for(0x43), Some(5));
        assert_eq!(inv.glyph_for(0x44), None);
        assert_eq!(inv.glyph_for(0x45), None);
    }

    #[test]
    fn test_glyph_keeps_first_code_point() {
        let inv = FontInventory::build(&fake(), &CancelToken::never()).unwrap();
        // 0x41 enumerates before 0x43; the shared glyph remembers 0x41
        assert_eq!(inv.code_for(5), Some(0x41));
        assert_eq!(inv.code_for(6), Some(0x42));
        assert_eq!(inv.code_for(7), None);
    }

    #[test]
    fn test_char_codes_sorted_ascending() {
        let inv = FontInventory::build(&fake(), &CancelToken::never()).unwrap();
        let codes: Vec<u32> = (0..inv.char_count())
            .map(|i| inv.char_at(i).unwrap().0)
            .collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_no_accepted_glyph_is_missing_or_out_of_range() {
        let inv = FontInventory::build(&fake(), &CancelToken::never()).unwrap();
        for i in 0..inv.char_count() {
            let (_, glyph) = inv.char_at(i).unwrap();
            assert_ne!(glyph, 0);
            assert!((glyph as usize) < inv.glyph_count());
        }
    }

    #[test]
    fn test_empty_font_detected() {
        let source = FakeSource {
            glyph_count: 10,
            map: BTreeMap::new(),
            claims_everything: false,
        };
        let err = FontInventory::build(&source, &CancelToken::never()).unwrap_err();
        assert_eq!(err, InventoryError::EmptyFont);

        let source = FakeSource {
            glyph_count: 0,
            map: BTreeMap::new(),
            claims_everything: false,
        };
        let err = FontInventory::build(&source, &CancelToken::never()).unwrap_err();
        assert_eq!(err, InventoryError::EmptyFont);
    }

    #[test]
    fn test_false_claims_are_reverified() {
        // Claims everything, but still only the mapped code points land
        let mut source = fake();
        source.claims_everything = true;
        let inv = FontInventory::build(&source, &CancelToken::never()).unwrap();
        assert_eq!(inv.char_count(), 3);
    }

    #[test]
    fn test_cancelled_build_is_superseded() {
        let latest = Arc::new(AtomicU64::new(2));
        let cancel = CancelToken::new(1, latest);
        let err = FontInventory::build(&fake(), &cancel).unwrap_err();
        assert_eq!(err, InventoryError::Superseded);
    }

    #[test]
    fn test_max_advance_floor() {
        let inv = FontInventory::build(&fake(), &CancelToken::never()).unwrap();
        // advance = 8 + glyph, widest accepted glyph is 6 -> 14
        assert_eq!(inv.max_advance(), 14.0);
    }
}
