//! Core `Translator` trait and `GeminiTranslator` implementation.
//!
//! `GeminiTranslator` calls the hosted `generateContent` endpoint with one
//! prompt and returns the generated text.  All connection details come from
//! [`TranslateConfig`].

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::TranslateConfig;
use crate::llm::prompt::PromptBuilder;

/// Returned instead of a translation when no credential is configured.
pub const MISSING_KEY_PLACEHOLDER: &str = "[Gemini API key missing]";

/// Returned when the model answers without any text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "[No response]";

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur during a remote translation call.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("translation service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The background task ended without producing a result (e.g. a panic).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for a remote translation backend.
///
/// Implementors must be `Send + Sync` so they can be shared with the
/// background task as `Arc<dyn Translator>`.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, or `None` when it
    /// carries no text part at all.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let mut texts = parts.iter().filter_map(|p| p.text.as_deref()).peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}

// ---------------------------------------------------------------------------
// GeminiTranslator
// ---------------------------------------------------------------------------

/// Calls the hosted `models/{model}:generateContent` endpoint.
pub struct GeminiTranslator {
    client: reqwest::Client,
    config: TranslateConfig,
    prompt_builder: PromptBuilder,
}

impl GeminiTranslator {
    /// Build a `GeminiTranslator` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &TranslateConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    /// Translate `text` into `target_language`.
    ///
    /// Without a credential no request is made and
    /// [`MISSING_KEY_PLACEHOLDER`] is returned.  A response with no text
    /// yields [`NO_RESPONSE_PLACEHOLDER`].
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        let Some(key) = self.config.credential() else {
            log::warn!("translate: no API key configured, returning placeholder");
            return Ok(MISSING_KEY_PLACEHOLDER.to_string());
        };

        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": self.prompt_builder.build(text, target_language) } ] }
            ]
        });

        log::debug!(
            "translate: {} chars → {target_language} via {}",
            text.chars().count(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(TranslateError::Api {
                status: status.as_u16(),
                body: raw.trim().to_string(),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&raw).map_err(|e| TranslateError::Parse(e.to_string()))?;

        // The reply is committed verbatim, surrounding whitespace included.
        Ok(parsed
            .text()
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn make_config(base_url: &str, api_key: Option<&str>) -> TranslateConfig {
        TranslateConfig {
            base_url: base_url.into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "gemini-1.5-flash".into(),
            target_language: "Hindi".into(),
            timeout_secs: 1,
        }
    }

    /// Accept one HTTP request, answer it with `status` / `body`, and hand
    /// back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            request
        });

        (base_url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn missing_key_returns_placeholder_without_network() {
        // Port 9 (discard) is never contacted; any request would error out.
        let translator = GeminiTranslator::from_config(&make_config("http://127.0.0.1:9", None));
        let result = translator.translate("hello", "Hindi").await.unwrap();
        assert_eq!(result, MISSING_KEY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn blank_key_counts_as_missing() {
        let translator =
            GeminiTranslator::from_config(&make_config("http://127.0.0.1:9", Some("  ")));
        let result = translator.translate("hello", "Hindi").await.unwrap();
        assert_eq!(result, MISSING_KEY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn successful_response_returns_joined_text() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"नमस्ते"},{"text":" दुनिया\n"}],"role":"model"}}]}"#,
        )
        .await;

        let translator = GeminiTranslator::from_config(&make_config(&base_url, Some("test-key")));
        let result = translator.translate("hello world", "Hindi").await.unwrap();
        assert_eq!(result, "नमस्ते दुनिया\n");

        let request = server.await.expect("server task");
        assert!(request.starts_with("POST /v1beta/models/gemini-1.5-flash:generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains("Translate this text to Hindi."));
        assert!(request.contains("Text: hello world"));
    }

    #[tokio::test]
    async fn empty_candidates_yield_no_response_placeholder() {
        let (base_url, server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;

        let translator = GeminiTranslator::from_config(&make_config(&base_url, Some("k")));
        let result = translator.translate("hello", "Hindi").await.unwrap();
        assert_eq!(result, NO_RESPONSE_PLACEHOLDER);
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn whitespace_reply_is_returned_unchanged() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}],"role":"model"}}]}"#,
        )
        .await;

        let translator = GeminiTranslator::from_config(&make_config(&base_url, Some("k")));
        let result = translator.translate("hello", "Hindi").await.unwrap();
        assert_eq!(result, "  ");
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn candidate_without_text_parts_yields_no_response_placeholder() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[],"role":"model"},"finishReason":"SAFETY"}]}"#,
        )
        .await;

        let translator = GeminiTranslator::from_config(&make_config(&base_url, Some("k")));
        let result = translator.translate("hello", "Hindi").await.unwrap();
        assert_eq!(result, NO_RESPONSE_PLACEHOLDER);
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn error_status_is_api_error() {
        let (base_url, server) =
            serve_once("403 Forbidden", r#"{"error":{"message":"API key not valid"}}"#).await;

        let translator = GeminiTranslator::from_config(&make_config(&base_url, Some("bad")));
        let err = translator.translate("hello", "Hindi").await.unwrap_err();
        match err {
            TranslateError::Api { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (base_url, server) = serve_once("200 OK", "not json").await;

        let translator = GeminiTranslator::from_config(&make_config(&base_url, Some("k")));
        let err = translator.translate("hello", "Hindi").await.unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let translator =
            GeminiTranslator::from_config(&make_config(&format!("http://{addr}"), Some("k")));
        let err = translator.translate("hello", "Hindi").await.unwrap_err();
        assert!(matches!(err, TranslateError::Request(_) | TranslateError::Timeout));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let translator =
            GeminiTranslator::from_config(&make_config("https://example.test/", Some("k")));
        assert_eq!(
            translator.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn translator_is_object_safe() {
        let translator: Box<dyn Translator> =
            Box::new(GeminiTranslator::from_config(&TranslateConfig::default()));
        drop(translator);
    }

    #[test]
    fn error_messages_carry_the_reason() {
        assert_eq!(TranslateError::Timeout.to_string(), "translation request timed out");
        assert_eq!(
            TranslateError::Request("connection refused".into()).to_string(),
            "HTTP request failed: connection refused"
        );
    }
}
