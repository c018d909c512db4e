use crate::config::{GlyphFormat, RunConfig};
use crate::core::converter::{record_tokens, PinyinConverter};
use crate::core::dictionary::{Dictionary, DictionaryLoader};
use crate::core::types::Resolution;
use crate::error::ConvertError;
use crate::persistence::{artifact_path, save_preview, save_report, write_artifact};
use crate::summary::RunSummary;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// The batch driver: one immutable dictionary, many tokens, one artifact per
// converted token.
pub struct ConverterEngine {
    dictionary: Dictionary,
    glyph: GlyphFormat,
    output_dir: PathBuf,
}

impl ConverterEngine {
    pub fn new(dictionary: Dictionary, glyph: GlyphFormat, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            dictionary,
            glyph,
            output_dir: output_dir.into(),
        }
    }

    /// Loads the pinyin library named by `config`.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConvertError> {
        let dictionary = DictionaryLoader::new(config.glyph).load_file(&config.library)?;
        Ok(Self::new(dictionary, config.glyph, config.output_dir.clone()))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn convert_token(&self, token: &str) -> Resolution {
        PinyinConverter::new(&self.dictionary).try_convert(token)
    }

    /// Reads the record list at `path` and converts every token in it.
    pub fn run_file(&self, path: &Path) -> Result<RunSummary, ConvertError> {
        let bytes = fs::read(path).map_err(|e| ConvertError::io(path, e))?;
        let (records, _, had_errors) = self.glyph.encoding().decode(&bytes);
        if had_errors {
            warn!(
                path = %path.display(),
                encoding = self.glyph.encoding().name(),
                "record list contains invalid byte sequences"
            );
        }
        self.process_records(&records)
    }

    /// Renders the record list line by line, unknown runs kept as `[run]`.
    /// Blank lines stay blank.
    pub fn preview_records(&self, records: &str) -> String {
        let converter = PinyinConverter::new(&self.dictionary);
        let mut rendered = String::new();
        for line in records.lines() {
            rendered.push_str(&converter.preview(line));
            rendered.push('\n');
        }
        rendered
    }

    /// Converts whitespace-separated tokens, writing `<token>.txt` into the
    /// output directory for each one that converts to a non-empty string.
    pub fn process_records(&self, records: &str) -> Result<RunSummary, ConvertError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| ConvertError::io(&self.output_dir, e))?;

        let converter = PinyinConverter::new(&self.dictionary);
        let mut summary = RunSummary::new();

        for token in record_tokens(records) {
            let conversion = converter.convert_with_tally(token);
            summary.record(&conversion.resolution, conversion.runs, &conversion.unresolved);

            let text = match &conversion.resolution {
                Resolution::Converted(text) => text,
                Resolution::NoOp => {
                    debug!(token, "no pinyin in token");
                    continue;
                }
                Resolution::Unresolved { run } => {
                    debug!(token, run = run.as_str(), "token not converted");
                    continue;
                }
            };

            let Some(path) = artifact_path(&self.output_dir, token) else {
                warn!(token, "token is not a usable file name, skipping");
                summary.reject_last_conversion();
                continue;
            };
            if let Err(e) = write_artifact(&path, &self.glyph.encode(text)) {
                warn!(token, error = %e, "failed to write artifact, skipping");
                summary.fail_last_write();
                continue;
            }
            debug!(token, text = text.as_str(), path = %path.display(), "artifact written");
        }

        info!(
            tokens = summary.tokens,
            converted = summary.converted,
            failed = summary.failed,
            write_failed = summary.write_failed,
            "record list processed"
        );
        Ok(summary)
    }
}

/// Runs a whole conversion job: load the library, convert the record list,
/// and save the preview and JSON report if they were requested.
pub fn run(config: &RunConfig) -> Result<RunSummary, ConvertError> {
    let engine = ConverterEngine::from_config(config)?;
    let summary = engine.run_file(&config.record_list)?;
    if let Some(preview) = &config.preview {
        let bytes = fs::read(&config.record_list).map_err(|e| ConvertError::io(&config.record_list, e))?;
        let (records, _, _) = config.glyph.encoding().decode(&bytes);
        let rendered = engine.preview_records(&records);
        save_preview(preview, &config.glyph.encode(&rendered))?;
        info!(path = %preview.display(), "preview saved");
    }
    if let Some(report) = &config.report {
        save_report(&summary, report)?;
        info!(path = %report.display(), "report saved");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Glyph;
    use pretty_assertions::assert_eq;

    fn engine(output_dir: &Path) -> ConverterEngine {
        let dictionary = [("ni", "你"), ("hao", "好")]
            .into_iter()
            .map(|(key, glyph)| (key.to_string(), Glyph::new(glyph)))
            .collect();
        ConverterEngine::new(dictionary, GlyphFormat::default(), output_dir)
    }

    #[test]
    fn writes_only_converted_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let engine = engine(&output);

        let summary = engine
            .process_records("ni3hao2 zzz\n1016\tni_zzz  hao\n")
            .unwrap();

        assert_eq!(summary.tokens, 5);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.no_op, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.unresolved, vec!["zzz"]);

        let mut written: Vec<String> = fs::read_dir(&output)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        assert_eq!(written, vec!["hao.txt", "ni3hao2.txt"]);
        assert_eq!(fs::read_to_string(output.join("ni3hao2.txt")).unwrap(), "你好");
    }

    #[test]
    fn one_unwritable_artifact_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut dictionary = Dictionary::new();
        dictionary.insert("a".into(), Glyph::new("啊"));
        dictionary.insert("hao".into(), Glyph::new("好"));
        let engine = ConverterEngine::new(dictionary, GlyphFormat::default(), dir.path());

        // 400 bytes: longer than any file name the OS accepts.
        let long_token = "a_".repeat(200);
        let summary = engine
            .process_records(&format!("{long_token} hao"))
            .unwrap();

        assert_eq!(summary.tokens, 2);
        assert_eq!(summary.write_failed, 1);
        assert_eq!(summary.converted, 1);
        assert_eq!(fs::read_to_string(dir.path().join("hao.txt")).unwrap(), "好");
    }

    #[test]
    fn vertical_tab_separates_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let summary = engine.process_records("ni3\x0Bhao2").unwrap();
        assert_eq!(summary.converted, 2);
        assert!(dir.path().join("ni3.txt").exists());
        assert!(dir.path().join("hao2.txt").exists());
    }

    #[test]
    fn preview_keeps_line_structure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        assert_eq!(
            engine.preview_records("ni3hao2 zzz\n\nhao_1016\n"),
            "你好[zzz]\n\n好\n"
        );
    }

    #[test]
    fn unusable_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        let summary = engine.process_records("ni/hao").unwrap();
        assert_eq!(summary.converted, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn convert_token_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never-created");
        let engine = engine(&output);
        assert_eq!(engine.convert_token("hao3"), Resolution::Converted("好".into()));
        assert!(!output.exists());
    }

    #[test]
    fn missing_record_list_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());
        assert!(matches!(
            engine.run_file(&dir.path().join("absent.txt")),
            Err(ConvertError::Io { .. })
        ));
    }
}
