// src/config.rs
use crate::core::types::Glyph;
use crate::error::ConvertError;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use std::path::PathBuf;

/// Library file looked up in the working directory when none is given.
pub const DEFAULT_LIBRARY_PATH: &str = "pinyin_library.txt";
/// Directory receiving one `<token>.txt` per converted token.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Record list read in debug mode when no path is passed.
pub const DEBUG_RECORD_LIST: &str = "riskuCVVC_1016.txt";
/// Suffix appended to the token to name its artifact.
pub const ARTIFACT_EXTENSION: &str = "txt";

/// Bytes per glyph in a UTF-8 library: one BMP ideograph.
pub const UTF8_GLYPH_WIDTH: usize = 3;
/// Bytes per glyph in double-byte libraries (GBK, GB18030, Big5, Shift_JIS, ...).
pub const DBCS_GLYPH_WIDTH: usize = 2;

/// How the fixed-width glyph field of a library record is laid out.
///
/// The library format does not describe itself: the width and encoding are a
/// convention shared with whatever generated the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphFormat {
    encoding: &'static Encoding,
    width: usize,
}

impl GlyphFormat {
    pub fn new(encoding: &'static Encoding, width: usize) -> Result<Self, ConvertError> {
        if width == 0 {
            return Err(ConvertError::InvalidGlyphWidth(width));
        }
        // Keys are read as raw ASCII bytes after the glyph field.
        if encoding.output_encoding() != encoding {
            return Err(ConvertError::UnsupportedEncoding(encoding.name()));
        }
        Ok(Self { encoding, width })
    }

    /// Resolves a WHATWG label such as `"utf-8"` or `"gbk"`. Without an
    /// explicit width the conventional width for that encoding is used.
    pub fn from_label(label: &str, width: Option<usize>) -> Result<Self, ConvertError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ConvertError::UnknownEncoding(label.to_string()))?;
        Self::new(encoding, width.unwrap_or_else(|| Self::default_width(encoding)))
    }

    pub fn default_width(encoding: &'static Encoding) -> usize {
        if encoding == UTF_8 {
            UTF8_GLYPH_WIDTH
        } else if encoding.is_single_byte() {
            1
        } else {
            DBCS_GLYPH_WIDTH
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Decodes one glyph field. The flag is set when malformed bytes were
    /// replaced with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> (Glyph, bool) {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(bytes);
        (Glyph::new(text.into_owned()), had_errors)
    }

    /// Encodes converted text back into the library's encoding for output.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        let (bytes, _, _) = self.encoding.encode(text);
        bytes
    }
}

impl Default for GlyphFormat {
    fn default() -> Self {
        Self { encoding: UTF_8, width: UTF8_GLYPH_WIDTH }
    }
}

/// Everything a conversion run needs, decided once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub record_list: PathBuf,
    pub library: PathBuf,
    pub output_dir: PathBuf,
    pub glyph: GlyphFormat,
    pub report: Option<PathBuf>,
    /// Line-by-line rendering of the record list, unknown runs as `[run]`.
    pub preview: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(record_list: impl Into<PathBuf>) -> Self {
        Self {
            record_list: record_list.into(),
            library: PathBuf::from(DEFAULT_LIBRARY_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            glyph: GlyphFormat::default(),
            report: None,
            preview: None,
        }
    }
}
