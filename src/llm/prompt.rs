//! Prompt builder for the translation request.
//!
//! The hosted model gets a single natural-language instruction that names
//! the target language, asks for the translation only, and then carries the
//! source text on its own line.

/// Instruction appended after the target language.
const ONLY_TRANSLATION: &str = "Only return the translated sentence, no explanation.";

/// Builds single-turn translation prompts.
///
/// # Example
/// ```rust
/// use translator_keyboard::llm::PromptBuilder;
///
/// let prompt = PromptBuilder::new().build("hello", "Hindi");
/// assert!(prompt.starts_with("Translate this text to Hindi."));
/// assert!(prompt.ends_with("Text: hello"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the prompt for translating `text` into `target_language`.
    pub fn build(&self, text: &str, target_language: &str) -> String {
        format!("Translate this text to {target_language}. {ONLY_TRANSLATION}\nText: {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_language_and_text() {
        let prompt = PromptBuilder::new().build("good morning", "French");
        assert_eq!(
            prompt,
            "Translate this text to French. Only return the translated sentence, \
             no explanation.\nText: good morning"
        );
    }

    #[test]
    fn keeps_multiline_source_intact() {
        let prompt = PromptBuilder::new().build("line one\nline two", "Hindi");
        assert!(prompt.ends_with("Text: line one\nline two"));
    }
}
