//! Sample-text collaborator
//!
//! Accumulates the characters the user picks from the grid. The whole text
//! is mirrored to the system clipboard after every activation, preserving
//! the caret/selection across the copy. Full text-editing semantics are out
//! of scope; the bar supports exactly what grid activation needs.

use serde::{Deserialize, Serialize};

/// What a grid click does to the sample text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickMode {
    /// Insert at the caret (replacing any selection)
    #[default]
    Insert,
    /// Replace the entire sample text
    Replace,
}

/// The sample text line with a caret/selection range.
///
/// `sel_start <= sel_end` are byte offsets on char boundaries; when equal
/// they are the caret position.
#[derive(Debug, Clone, Default)]
pub struct SampleText {
    text: String,
    sel_start: usize,
    sel_end: usize,
}

impl SampleText {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.sel_start, self.sel_end)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Apply an activation according to the click mode.
    pub fn apply(&mut self, s: &str, mode: ClickMode) {
        match mode {
            ClickMode::Replace => self.replace_all(s),
            ClickMode::Insert => self.replace_selection(s),
        }
    }

    /// Replace the whole text; caret moves to the end.
    pub fn replace_all(&mut self, s: &str) {
        self.text.clear();
        self.text.push_str(s);
        self.sel_start = self.text.len();
        self.sel_end = self.text.len();
    }

    /// Replace the current selection (or insert at the caret), leaving the
    /// caret after the inserted text.
    pub fn replace_selection(&mut self, s: &str) {
        let (start, end) = (self.sel_start.min(self.text.len()), self.sel_end.min(self.text.len()));
        self.text.replace_range(start..end, s);
        self.sel_start = start + s.len();
        self.sel_end = self.sel_start;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.sel_start = 0;
        self.sel_end = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_appends_at_caret() {
        let mut sample = SampleText::default();
        sample.apply("A", ClickMode::Insert);
        sample.apply("B", ClickMode::Insert);
        assert_eq!(sample.text(), "AB");
        assert_eq!(sample.selection(), (2, 2));
    }

    #[test]
    fn test_replace_discards_previous_text() {
        let mut sample = SampleText::default();
        sample.apply("hello", ClickMode::Insert);
        sample.apply("X", ClickMode::Replace);
        assert_eq!(sample.text(), "X");
        assert_eq!(sample.selection(), (1, 1));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut sample = SampleText::default();
        sample.apply("abcd", ClickMode::Insert);
        sample.sel_start = 1;
        sample.sel_end = 3;
        sample.apply("Z", ClickMode::Insert);
        assert_eq!(sample.text(), "aZd");
        assert_eq!(sample.selection(), (2, 2));
    }

    #[test]
    fn test_multibyte_insert() {
        let mut sample = SampleText::default();
        sample.apply("é", ClickMode::Insert);
        sample.apply("漢", ClickMode::Insert);
        assert_eq!(sample.text(), "é漢");
        let (s, e) = sample.selection();
        assert_eq!(s, e);
        assert_eq!(s, sample.text().len());
    }

    #[test]
    fn test_clear() {
        let mut sample = SampleText::default();
        sample.apply("abc", ClickMode::Insert);
        sample.clear();
        assert!(sample.is_empty());
        assert_eq!(sample.selection(), (0, 0));
    }
}
