use pretty_assertions::assert_eq;
use recordlist_core::config::{GlyphFormat, RunConfig};
use recordlist_core::core::types::Resolution;
use recordlist_core::{run, ConvertError, ConverterEngine};
use std::fs;
use std::path::Path;

const UTF8_LIBRARY: &str = "你ni\n好hao\n泥ni\n啊a\n中zhong\n文wen";

fn write(path: &Path, bytes: &[u8]) {
    fs::write(path, bytes).expect("failed to write fixture");
}

fn artifacts(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("output directory exists")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn converts_a_record_list_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("pinyin_library.txt");
    let records = dir.path().join("records.txt");
    write(&library, UTF8_LIBRARY.as_bytes());
    write(&records, b"ni3hao2 zhong_wen 1016\n_a_ zzz nihao_xyz\n");

    let mut config = RunConfig::new(&records);
    config.library = library;
    config.output_dir = dir.path().join("output");
    config.report = Some(dir.path().join("report.json"));

    let summary = run(&config).unwrap();

    assert_eq!(summary.tokens, 6);
    assert_eq!(summary.converted, 3);
    assert_eq!(summary.no_op, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.unresolved, vec!["zzz", "nihao", "xyz"]);
    assert_eq!(
        artifacts(&config.output_dir),
        vec!["_a_.txt", "ni3hao2.txt", "zhong_wen.txt"]
    );
    assert_eq!(
        fs::read_to_string(config.output_dir.join("ni3hao2.txt")).unwrap(),
        "你好"
    );
    assert_eq!(
        fs::read_to_string(config.output_dir.join("zhong_wen.txt")).unwrap(),
        "中文"
    );

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["converted"], 3);
    assert_eq!(report["failed"], 2);
}

#[test]
fn preview_renders_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("pinyin_library.txt");
    let records = dir.path().join("records.txt");
    write(&library, UTF8_LIBRARY.as_bytes());
    write(&records, b"ni3hao2 zzz\n\nzhong_wen\n");

    let mut config = RunConfig::new(&records);
    config.library = library;
    config.output_dir = dir.path().join("output");
    config.preview = Some(dir.path().join("preview").join("records.txt"));

    let summary = run(&config).unwrap();

    assert_eq!(summary.converted, 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("preview").join("records.txt")).unwrap(),
        "你好[zzz]\n\n中文\n"
    );
}

#[test]
fn duplicate_library_keys_keep_the_first_glyph() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("pinyin_library.txt");
    write(&library, UTF8_LIBRARY.as_bytes());

    let mut config = RunConfig::new(dir.path().join("unused.txt"));
    config.library = library;
    let engine = ConverterEngine::from_config(&config).unwrap();

    assert_eq!(engine.dictionary().len(), 5);
    assert_eq!(engine.convert_token("ni"), Resolution::Converted("你".into()));
}

#[test]
fn gbk_library_produces_gbk_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("pinyin_library.txt");
    let records = dir.path().join("records.txt");
    let mut bytes = vec![0xC4, 0xE3];
    bytes.extend_from_slice(b"ni\n");
    bytes.extend_from_slice(&[0xBA, 0xC3]);
    bytes.extend_from_slice(b"hao\n");
    write(&library, &bytes);
    write(&records, b"ni3hao2\n");

    let mut config = RunConfig::new(&records);
    config.library = library;
    config.output_dir = dir.path().join("output");
    config.glyph = GlyphFormat::from_label("gbk", None).unwrap();

    let summary = run(&config).unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(
        fs::read(config.output_dir.join("ni3hao2.txt")).unwrap(),
        vec![0xC4, 0xE3, 0xBA, 0xC3]
    );
}

#[test]
fn missing_library_stops_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records.txt");
    write(&records, b"ni3hao2\n");

    let mut config = RunConfig::new(&records);
    config.library = dir.path().join("pinyin_library.txt");
    config.output_dir = dir.path().join("output");

    let err = run(&config).unwrap_err();
    assert!(matches!(err, ConvertError::LibraryNotFound { .. }));
    assert!(!config.output_dir.exists());
}
