// File: src/core/dictionary.rs
use crate::config::GlyphFormat;
use crate::core::types::{Glyph, PhoneticKey};
use crate::error::ConvertError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Immutable pinyin -> glyph lookup table, built once from the library file.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<PhoneticKey, Glyph>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping unless `key` already maps to a non-empty glyph.
    /// Returns whether the glyph was stored.
    pub fn insert(&mut self, key: PhoneticKey, glyph: Glyph) -> bool {
        match self.entries.get_mut(&key) {
            Some(existing) if !existing.is_empty() => false,
            Some(existing) => {
                *existing = glyph;
                true
            }
            None => {
                self.entries.insert(key, glyph);
                true
            }
        }
    }

    /// Looks up a run. Empty glyphs count as missing.
    pub fn get(&self, key: &str) -> Option<&Glyph> {
        self.entries.get(key).filter(|glyph| !glyph.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PhoneticKey, Glyph)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (PhoneticKey, Glyph)>>(iter: I) -> Self {
        let mut dictionary = Dictionary::new();
        for (key, glyph) in iter {
            dictionary.insert(key, glyph);
        }
        dictionary
    }
}

/// Bookkeeping from a single library parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Complete records seen, including dropped ones.
    pub records: usize,
    /// Records whose key was already taken.
    pub duplicates: usize,
    /// Records with nothing after the glyph field.
    pub empty_keys: usize,
    /// Glyph fields that were not valid in the configured encoding.
    pub malformed_glyphs: usize,
    /// Bytes left over at the end, too few to form a glyph field.
    pub truncated_tail: usize,
}

/// Parses the flat library format: a fixed-width glyph field immediately
/// followed by the pinyin key, one record per line, no header.
///
/// ```text
/// 你ni\n好hao\n
/// ```
pub struct DictionaryLoader {
    format: GlyphFormat,
}

impl DictionaryLoader {
    pub fn new(format: GlyphFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> GlyphFormat {
        self.format
    }

    /// Reads and parses the library at `path`.
    pub fn load_file(&self, path: &Path) -> Result<Dictionary, ConvertError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConvertError::LibraryNotFound { path: path.to_path_buf() },
            _ => ConvertError::io(path, e),
        })?;

        let (dictionary, stats) = self.parse(&bytes);
        info!(
            path = %path.display(),
            entries = dictionary.len(),
            duplicates = stats.duplicates,
            "pinyin library loaded"
        );
        if stats.malformed_glyphs > 0 {
            warn!(
                count = stats.malformed_glyphs,
                encoding = self.format.encoding().name(),
                "library contains glyphs invalid in the configured encoding"
            );
        }
        if stats.truncated_tail > 0 {
            debug!(bytes = stats.truncated_tail, "dropped partial record at end of library");
        }
        Ok(dictionary)
    }

    /// Parses library bytes. A trailing fragment shorter than the glyph
    /// field ends the stream; it is never read past.
    pub fn parse(&self, bytes: &[u8]) -> (Dictionary, LoadStats) {
        let width = self.format.width();
        let mut dictionary = Dictionary::new();
        let mut stats = LoadStats::default();
        let mut rest = bytes;

        while !rest.is_empty() {
            if rest.len() < width {
                stats.truncated_tail = rest.len();
                break;
            }
            let (glyph_field, tail) = rest.split_at(width);
            let (key_field, next) = match tail.iter().position(|&b| b == b'\n') {
                Some(end) => (&tail[..end], &tail[end + 1..]),
                None => (tail, &[][..]),
            };
            rest = next;
            stats.records += 1;

            let key_field = key_field.strip_suffix(b"\r").unwrap_or(key_field);
            if key_field.is_empty() {
                stats.empty_keys += 1;
                continue;
            }

            let (glyph, had_errors) = self.format.decode(glyph_field);
            if had_errors {
                stats.malformed_glyphs += 1;
            }
            let key = String::from_utf8_lossy(key_field).into_owned();
            if !dictionary.insert(key, glyph) {
                stats.duplicates += 1;
            }
        }

        (dictionary, stats)
    }
}
