//! Remote translation module.
//!
//! This module provides:
//! * [`Translator`] — async trait implemented by translation backends.
//! * [`GeminiTranslator`] — hosted text-generation backend.
//! * [`PromptBuilder`] — builds the single-turn translation prompt.
//! * [`TranslateError`] — error variants for the remote call.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use translator_keyboard::config::AppConfig;
//! use translator_keyboard::llm::{GeminiTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = GeminiTranslator::from_config(&config.translate);
//!
//!     let hindi = translator
//!         .translate("hello", &config.translate.target_language)
//!         .await
//!         .unwrap();
//!     println!("{hindi}");
//! }
//! ```

pub mod prompt;
pub mod translator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use prompt::PromptBuilder;
pub use translator::{
    GeminiTranslator, TranslateError, Translator, MISSING_KEY_PLACEHOLDER, NO_RESPONSE_PLACEHOLDER,
};
