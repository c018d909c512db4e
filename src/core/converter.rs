use crate::core::dictionary::Dictionary;
use crate::core::types::Resolution;

/// Splits a token into its maximal runs of ASCII letters.
/// Everything else (tone digits, underscores, ...) only separates runs.
pub fn pinyin_runs(token: &str) -> impl Iterator<Item = &str> {
    token
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
}

/// Splits a record list into tokens on ASCII whitespace, vertical tab
/// included.
pub fn record_tokens(records: &str) -> impl Iterator<Item = &str> {
    records
        .split(|c: char| c.is_ascii_whitespace() || c == '\x0B')
        .filter(|token| !token.is_empty())
}

/// A token's resolution together with its run tallies, from a single scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion<'t> {
    pub resolution: Resolution,
    /// Letter runs in the token.
    pub runs: usize,
    /// Runs with no dictionary entry, in order.
    pub unresolved: Vec<&'t str>,
}

/// Converts record tokens such as `ni3hao2` into hanzi.
pub struct PinyinConverter<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> PinyinConverter<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Converts a whole token. All runs must resolve or nothing does; the
    /// scan stops at the first run missing from the dictionary.
    pub fn try_convert(&self, token: &str) -> Resolution {
        let mut result = String::new();

        for run in pinyin_runs(token) {
            match self.dictionary.get(run) {
                Some(glyph) => result.push_str(glyph.as_str()),
                None => return Resolution::Unresolved { run: run.to_string() },
            }
        }

        if result.is_empty() {
            Resolution::NoOp
        } else {
            Resolution::Converted(result)
        }
    }

    /// Same outcome as [`Self::try_convert`], but keeps scanning after a
    /// failed run so every run is counted and every miss collected.
    pub fn convert_with_tally<'t>(&self, token: &'t str) -> Conversion<'t> {
        let mut result = String::new();
        let mut runs = 0;
        let mut unresolved = Vec::new();

        for run in pinyin_runs(token) {
            runs += 1;
            match self.dictionary.get(run) {
                Some(glyph) if unresolved.is_empty() => result.push_str(glyph.as_str()),
                Some(_) => {}
                None => unresolved.push(run),
            }
        }

        let resolution = match unresolved.first() {
            Some(run) => Resolution::Unresolved { run: run.to_string() },
            None if result.is_empty() => Resolution::NoOp,
            None => Resolution::Converted(result),
        };
        Conversion { resolution, runs, unresolved }
    }

    /// Renders a line for inspection: known runs become glyphs, unknown
    /// runs stay as `[run]`, separators are dropped.
    pub fn preview(&self, line: &str) -> String {
        let mut rendered = String::new();
        for run in pinyin_runs(line) {
            match self.dictionary.get(run) {
                Some(glyph) => rendered.push_str(glyph.as_str()),
                None => {
                    rendered.push('[');
                    rendered.push_str(run);
                    rendered.push(']');
                }
            }
        }
        rendered
    }
}
