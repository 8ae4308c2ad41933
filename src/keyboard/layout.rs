//! Keyboard layout definition.
//!
//! A [`Layout`] is a list of rows, each a list of [`Key`]s with a primary
//! code, an optional label and a relative width.  It is built once (the
//! built-in QWERTY map or a TOML file) and then shared read-only.
//!
//! TOML format:
//!
//! ```toml
//! name = "numbers"
//!
//! [[rows]]
//! keys = [{ code = 49 }, { code = 50 }, { code = -5, label = "⌫", width = 1.5 }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::KeyCode;

/// Errors raised while loading a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("layout has no rows")]
    NoRows,

    #[error("row {0} has no keys")]
    EmptyRow(usize),

    #[error("key {key} in row {row} has non-positive width {width}")]
    BadWidth { row: usize, key: usize, width: f32 },
}

fn default_width() -> f32 {
    1.0
}

/// One key on the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub code: KeyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Width relative to a standard key.
    #[serde(default = "default_width")]
    pub width: f32,
}

impl Key {
    /// A standard-width key that commits `c`.
    pub fn char(c: char) -> Self {
        Self {
            code: KeyCode::from_char(c),
            label: None,
            width: 1.0,
        }
    }

    /// A control key with an explicit label.
    pub fn control(code: KeyCode, label: &str, width: f32) -> Self {
        Self {
            code,
            label: Some(label.to_string()),
            width,
        }
    }

    /// Text shown on the key cap.
    pub fn label(&self) -> String {
        match (&self.label, self.code.as_char()) {
            (Some(label), _) => label.clone(),
            (None, Some(' ')) => "space".to_string(),
            (None, Some(c)) => c.to_string(),
            (None, None) => format!("#{}", self.code.0),
        }
    }
}

/// One horizontal row of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub keys: Vec<Key>,
}

impl Row {
    /// Sum of key widths in the row.
    pub fn total_width(&self) -> f32 {
        self.keys.iter().map(|k| k.width).sum()
    }
}

/// An immutable keyboard layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Layout {
    /// The built-in QWERTY layout.
    pub fn qwerty() -> Self {
        let letters = |s: &str| s.chars().map(Key::char).collect::<Vec<_>>();

        let mut third = letters("zxcvbnm");
        third.push(Key::control(KeyCode::DELETE, "⌫", 1.5));

        let bottom = vec![
            Key::char(','),
            Key {
                width: 5.0,
                ..Key::char(' ')
            },
            Key::char('.'),
            Key::control(KeyCode::DONE, "⏎", 1.5),
        ];

        Self {
            name: "qwerty".into(),
            rows: vec![
                Row {
                    keys: letters("qwertyuiop"),
                },
                Row {
                    keys: letters("asdfghjkl"),
                },
                Row { keys: third },
                Row { keys: bottom },
            ],
        }
    }

    /// Parse and validate a TOML layout.
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutError> {
        let layout: Self = toml::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read, parse and validate a TOML layout file.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if self.rows.is_empty() {
            return Err(LayoutError::NoRows);
        }
        for (r, row) in self.rows.iter().enumerate() {
            if row.keys.is_empty() {
                return Err(LayoutError::EmptyRow(r));
            }
            for (k, key) in row.keys.iter().enumerate() {
                // Also rejects NaN.
                if !(key.width > 0.0) {
                    return Err(LayoutError::BadWidth {
                        row: r,
                        key: k,
                        width: key.width,
                    });
                }
            }
        }
        Ok(())
    }

    /// Iterate over every key in row order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flat_map(|r| r.keys.iter())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::qwerty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
