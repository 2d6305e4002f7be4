//! Annotation model for inline commentary.

use serde::{Deserialize, Serialize};

/// An annotation attached to a small graph or family.
///
/// The text is copied as-is wherever the note is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Display text, empty when none was given.
    text: String,
    /// Optional identifying name (e.g. "complements").
    name: Option<String>,
}

impl Note {
    /// Creates a note. Absent text is stored as an empty string.
    pub fn new(text: Option<&str>, name: Option<&str>) -> Self {
        Self {
            text: text.unwrap_or_default().to_string(),
            name: name.map(str::to_string),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
