//! Input surface: layout, view and key-code routing.
//!
//! * [`Layout`] — immutable key map, built-in QWERTY or loaded from TOML.
//! * [`KeyboardView`] — shares the layout read-only and maps taps to keys.
//! * [`KeyCode`] / [`KeyAction`] — what a key press means for the field.
//! * [`KeyboardActionListener`] — callbacks the view fires; only `on_key`
//!   carries behaviour, the rest default to no-ops.

pub mod layout;
pub mod listener;
pub mod view;

use serde::{Deserialize, Serialize};

pub use layout::{Key, Layout, LayoutError, Row};
pub use listener::KeyboardActionListener;
pub use view::KeyboardView;

// ---------------------------------------------------------------------------
// KeyCode
// ---------------------------------------------------------------------------

/// Primary code of a key.
///
/// Non-negative codes are Unicode scalar values; negative codes are the
/// reserved control keys below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const SHIFT: KeyCode = KeyCode(-1);
    pub const MODE_CHANGE: KeyCode = KeyCode(-2);
    pub const CANCEL: KeyCode = KeyCode(-3);
    pub const DONE: KeyCode = KeyCode(-4);
    pub const DELETE: KeyCode = KeyCode(-5);
    pub const ALT: KeyCode = KeyCode(-6);

    /// Code for a printable character.
    pub fn from_char(c: char) -> Self {
        KeyCode(c as i32)
    }

    /// The character this code commits, if it has one.
    pub fn as_char(self) -> Option<char> {
        u32::try_from(self.0).ok().and_then(char::from_u32)
    }

    /// What pressing this key does to the focused field.
    ///
    /// ```
    /// use translator_keyboard::keyboard::{KeyAction, KeyCode};
    ///
    /// assert_eq!(KeyCode::DELETE.action(), KeyAction::Delete);
    /// assert_eq!(KeyCode::DONE.action(), KeyAction::Done);
    /// assert_eq!(KeyCode::from_char('q').action(), KeyAction::Commit('q'));
    /// assert_eq!(KeyCode::SHIFT.action(), KeyAction::Ignore);
    /// ```
    pub fn action(self) -> KeyAction {
        match self {
            KeyCode::DELETE => KeyAction::Delete,
            KeyCode::DONE => KeyAction::Done,
            other => other.as_char().map_or(KeyAction::Ignore, KeyAction::Commit),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyAction
// ---------------------------------------------------------------------------

/// Effect of a key press on the text connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Remove one character before the cursor.
    Delete,
    /// Dispatch an Enter key event.
    Done,
    /// Commit exactly this character.
    Commit(char),
    /// Control code with no text effect (shift, cancel, …).
    Ignore,
}
