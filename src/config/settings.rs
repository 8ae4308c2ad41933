//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! translation task.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// API key baked in at build time (`GEMINI_API_KEY=... cargo build`).
///
/// Absent by default, in which case the translator runs in placeholder mode.
pub const BUILD_API_KEY: Option<&str> = option_env!("GEMINI_API_KEY");

// ---------------------------------------------------------------------------
// TranslateConfig
// ---------------------------------------------------------------------------

/// Settings for the remote translation call.
///
/// Fields missing from the file take their defaults, so a `[translate]`
/// section without `api_key` keeps the build-time key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Base URL of the generative-language endpoint.
    pub base_url: String,
    /// API credential. `None` (or blank) skips the network call entirely and
    /// yields a fixed placeholder translation.  The build-time key is never
    /// written back to disk.
    #[serde(skip_serializing_if = "is_build_api_key")]
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-1.5-flash"`).
    pub model: String,
    /// Target language name embedded in the prompt.
    pub target_language: String,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: BUILD_API_KEY.map(str::to_string),
            model: "gemini-1.5-flash".into(),
            target_language: "Hindi".into(),
            timeout_secs: 30,
        }
    }
}

impl TranslateConfig {
    /// The configured key, if it is present and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

fn is_build_api_key(key: &Option<String>) -> bool {
    key.as_deref() == BUILD_API_KEY
}

// ---------------------------------------------------------------------------
// KeyboardConfig
// ---------------------------------------------------------------------------

/// Keyboard layout selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Custom layout file. `None` uses the built-in QWERTY layout.  A
    /// relative path is looked up in the `layouts/` config directory.
    pub layout_file: Option<PathBuf>,
}

impl KeyboardConfig {
    /// Full path of the custom layout, with relative paths resolved
    /// against `layouts_dir`.
    pub fn resolve_layout(&self, layouts_dir: &Path) -> Option<PathBuf> {
        let file = self.layout_file.as_ref()?;
        if file.is_absolute() {
            Some(file.clone())
        } else {
            Some(layouts_dir.join(file))
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Notice timing and demo window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a short notice stays on screen, in milliseconds.
    pub short_notice_ms: u64,
    /// How long a long notice (errors) stays on screen, in milliseconds.
    pub long_notice_ms: u64,
    /// Inner size of the demo host window `(width, height)`.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            short_notice_ms: 2_000,
            long_notice_ms: 3_500,
            window_size: (640.0, 420.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use translator_keyboard::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote translation settings.
    pub translate: TranslateConfig,
    /// Keyboard layout settings.
    pub keyboard: KeyboardConfig,
    /// Notice / window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
