//! Translate action: state, request/outcome values and the background runner.
//!
//! # Flow
//!
//! ```text
//! translate button (UI thread)
//!   ├─ no connection / blank text → notice, stay Idle
//!   └─ TranslationRequest → TranslateRunner::spawn          [Translating]
//!          └─ Translator::translate on the tokio runtime
//!                └─ TranslateOutcome → channel
//! poll() (UI thread)
//!   └─ commit into the field, or notice on error             [Idle]
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::TranslateRunner;
pub use state::{TranslateOutcome, TranslateState, TranslationRequest};
