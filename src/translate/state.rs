//! Translate state machine and the values handed between threads.
//!
//! [`TranslateState`] decides what the keyboard shows: the busy indicator is
//! visible and the trigger disabled exactly while a request is
//! [`Translating`](TranslateState::Translating).
//!
//! [`TranslationRequest`] is captured on the UI thread and moved into the
//! background task; [`TranslateOutcome`] travels back the other way.

use crate::llm::TranslateError;

// ---------------------------------------------------------------------------
// TranslateState
// ---------------------------------------------------------------------------

/// States of the translate action.
///
/// ```text
/// Idle ──trigger (text captured)──▶ Translating
/// Translating ──success / failure / cancel──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslateState {
    /// Ready; the trigger is enabled.
    #[default]
    Idle,
    /// One request is outstanding.
    Translating,
}

impl TranslateState {
    /// Returns `true` while a request is outstanding.
    ///
    /// ```
    /// use translator_keyboard::translate::TranslateState;
    ///
    /// assert!(!TranslateState::Idle.is_busy());
    /// assert!(TranslateState::Translating.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, TranslateState::Translating)
    }

    /// A short label for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            TranslateState::Idle => "Ready",
            TranslateState::Translating => "Translating…",
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationRequest / TranslateOutcome
// ---------------------------------------------------------------------------

/// One translate button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text captured from the field.
    pub source: String,
    /// Target language name put in the prompt.
    pub target_language: String,
    /// `true` when `source` was the selection (replace it), `false` when it
    /// was the whole field (append after it).
    pub from_selection: bool,
    /// Input session the text was captured in.
    pub session: u64,
}

/// Result of a request, delivered back to the UI thread.
#[derive(Debug)]
pub struct TranslateOutcome {
    pub request: TranslationRequest,
    pub result: Result<String, TranslateError>,
}

impl TranslateOutcome {
    /// The text to commit for a successful outcome.
    ///
    /// A selection is replaced by the translation; otherwise the translation
    /// goes on a new line after the existing text.
    pub fn commit_text(&self) -> Option<String> {
        let translated = self.result.as_ref().ok()?;
        Some(if self.request.from_selection {
            translated.clone()
        } else {
            format!("\n{translated}")
        })
    }
}
