//! In-memory [`TextConnection`] implementation.
//!
//! [`EditorBuffer`] models one multi-line text field: its text, a cursor and
//! an optional selection.  Positions are counted in `char`s, not bytes, so
//! non-Latin scripts (Devanagari, Thai, …) behave the same as ASCII.

use super::{KeyEvent, TextConnection};

/// A single editable text field held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    /// Selected char range `start..end`, never empty.
    selection: Option<(usize, usize)>,
    /// Raw key events received that the buffer did not turn into an edit.
    unhandled_keys: Vec<KeyEvent>,
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text` with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Key events that were dispatched but produced no edit.
    pub fn unhandled_keys(&self) -> &[KeyEvent] {
        &self.unhandled_keys
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Select the char range `start..end` (clamped; an empty range clears the
    /// selection).  The cursor moves to `end`.
    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        self.cursor = end;
        self.selection = (start < end).then_some((start, end));
    }

    pub fn select_all(&mut self) {
        self.select(0, self.len());
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Move the cursor (clamped) and drop any selection.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.len());
        self.selection = None;
    }

    /// Byte offset of char position `pos`.
    fn byte_at(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn replace_range(&mut self, start: usize, end: usize, with: &str) {
        let (b_start, b_end) = (self.byte_at(start), self.byte_at(end));
        self.text.replace_range(b_start..b_end, with);
    }
}

impl TextConnection for EditorBuffer {
    fn selected_text(&self) -> Option<String> {
        self.selection
            .map(|(start, end)| self.text.chars().skip(start).take(end - start).collect())
    }

    fn extracted_text(&self) -> Option<String> {
        Some(self.text.clone())
    }

    fn commit_text(&mut self, text: &str, new_cursor_position: i32) -> bool {
        let (start, end) = self.selection.take().unwrap_or((self.cursor, self.cursor));
        self.replace_range(start, end, text);

        let inserted_end = start + text.chars().count();
        let target = if new_cursor_position > 0 {
            inserted_end as i64 + new_cursor_position as i64 - 1
        } else {
            start as i64 + new_cursor_position as i64
        };
        self.cursor = target.clamp(0, self.len() as i64) as usize;
        true
    }

    fn delete_surrounding_text(&mut self, before: usize, after: usize) -> bool {
        let (sel_start, sel_end) = self.selection.unwrap_or((self.cursor, self.cursor));

        // After the selection first so `sel_start` stays valid.
        let after_end = (sel_end + after).min(self.len());
        self.replace_range(sel_end, after_end, "");

        let before_start = sel_start.saturating_sub(before);
        self.replace_range(before_start, sel_start, "");

        let removed = sel_start - before_start;
        self.cursor -= removed;
        if let Some((start, end)) = self.selection.as_mut() {
            *start -= removed;
            *end -= removed;
        }
        true
    }

    fn send_key_event(&mut self, event: KeyEvent) -> bool {
        if event.is_enter_down() {
            self.commit_text("\n", 1)
        } else {
            self.unhandled_keys.push(event);
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
