//! Text connection: the keyboard's only path into the focused text field.
//!
//! The host platform hands the service a [`TextConnection`] when an input
//! session starts and takes it back when the session finishes.  The keyboard
//! never touches a text field except through this trait.
//!
//! * [`TextConnection`] — read selection / visible text, commit text, delete
//!   around the cursor, dispatch raw key events.
//! * [`KeyEvent`] — the raw key events the keyboard can dispatch.
//! * [`EditorBuffer`] — in-memory single field used by the demo host and the
//!   tests.

pub mod buffer;

pub use buffer::EditorBuffer;

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// Whether a raw key event is a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventAction {
    Down,
    Up,
}

/// A raw key event dispatched to the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: KeyEventAction,
    pub key_code: i32,
}

impl KeyEvent {
    /// Platform key code for Enter / Return.
    pub const KEYCODE_ENTER: i32 = 66;

    /// A key-down event for `key_code`.
    pub fn down(key_code: i32) -> Self {
        Self {
            action: KeyEventAction::Down,
            key_code,
        }
    }

    /// A key-up event for `key_code`.
    pub fn up(key_code: i32) -> Self {
        Self {
            action: KeyEventAction::Up,
            key_code,
        }
    }

    /// `true` for an Enter key press.
    pub fn is_enter_down(&self) -> bool {
        self.action == KeyEventAction::Down && self.key_code == Self::KEYCODE_ENTER
    }
}

// ---------------------------------------------------------------------------
// TextConnection
// ---------------------------------------------------------------------------

/// Handle to the currently focused editable text region.
///
/// Every mutating call returns `false` when the underlying field is no longer
/// valid (e.g. focus moved between the call being issued and applied); the
/// keyboard treats that as a benign no-op.
///
/// All methods must be called on the UI thread, so implementors need not be
/// `Send`.
pub trait TextConnection {
    /// The currently selected text, or `None` when nothing is selected.
    fn selected_text(&self) -> Option<String>;

    /// The full visible text of the field, or `None` if it cannot be read.
    fn extracted_text(&self) -> Option<String>;

    /// Insert `text` at the cursor, replacing the selection if there is one.
    ///
    /// `new_cursor_position` follows the usual input-method convention: a
    /// value `> 0` is relative to the end of the inserted text (1 = directly
    /// after it), a value `<= 0` is relative to its start.
    fn commit_text(&mut self, text: &str, new_cursor_position: i32) -> bool;

    /// Delete `before` characters before the cursor and `after` characters
    /// after it.  With a selection, the ranges are measured from its edges
    /// and the selection itself is kept.
    fn delete_surrounding_text(&mut self, before: usize, after: usize) -> bool;

    /// Dispatch a raw key event to the field.
    fn send_key_event(&mut self, event: KeyEvent) -> bool;
}
