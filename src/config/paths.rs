//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings + custom layouts):
//!   Windows: %APPDATA%\translator-keyboard\
//!   macOS:   ~/Library/Application Support/translator-keyboard/
//!   Linux:   ~/.config/translator-keyboard/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and layout files.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory relative `layout_file` settings are resolved against.
    pub layouts_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "translator-keyboard";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let layouts_dir = config_dir.join("layouts");

        Self {
            config_dir,
            settings_file,
            layouts_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths.layouts_dir.ends_with("layouts"));
        assert!(paths.settings_file.starts_with(&paths.config_dir));
    }
}
