// src/core/types.rs
use std::fmt;

/// A romanized pronunciation used as a dictionary key, e.g. `"hao"`.
/// Keys are case-sensitive and made of ASCII letters only.
pub type PhoneticKey = String;

/// One logographic unit read from the glyph field of a library record.
/// This is the "value" in the pinyin dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Glyph(String);

impl Glyph {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of converting a single record token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every run resolved; holds the concatenated glyphs. Never empty.
    Converted(String),
    /// The token has no alphabetic content. Nothing to write.
    NoOp,
    /// `run` is the first run with no dictionary entry.
    Unresolved { run: String },
}

impl Resolution {
    /// The composed text, if the token converted.
    pub fn converted(&self) -> Option<&str> {
        match self {
            Resolution::Converted(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Resolution::Unresolved { .. })
    }
}
