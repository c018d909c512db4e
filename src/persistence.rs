// File: src/persistence.rs
use crate::config::ARTIFACT_EXTENSION;
use crate::error::ConvertError;
use crate::summary::RunSummary;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The artifact path for `token`, or `None` when the token cannot be used
/// as a plain file name inside `output_dir`.
pub fn artifact_path(output_dir: &Path, token: &str) -> Option<PathBuf> {
    let unusable = token.is_empty()
        || token == "."
        || token == ".."
        || token.contains(['/', '\\', '\0']);
    if unusable {
        return None;
    }
    Some(output_dir.join(format!("{}.{}", token, ARTIFACT_EXTENSION)))
}

/// Writes `contents` to `path` through a temp file in the same directory,
/// so the artifact is either absent or complete.
pub fn write_artifact(path: &Path, contents: &[u8]) -> Result<(), ConvertError> {
    let parent_dir = parent_or_current(path);
    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| ConvertError::io(parent_dir, e))?;
    temp_file
        .write_all(contents)
        .map_err(|e| ConvertError::io(temp_file.path(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

/// Saves the line-by-line preview, creating its directory if needed.
pub fn save_preview(path: &Path, contents: &[u8]) -> Result<(), ConvertError> {
    let parent_dir = parent_or_current(path);
    fs::create_dir_all(parent_dir).map_err(|e| ConvertError::io(parent_dir, e))?;
    write_artifact(path, contents)
}

/// Saves the run summary as pretty-printed JSON.
pub fn save_report(summary: &RunSummary, path: &Path) -> Result<(), ConvertError> {
    let parent_dir = parent_or_current(path);
    fs::create_dir_all(parent_dir).map_err(|e| ConvertError::io(parent_dir, e))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| ConvertError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, summary).map_err(|e| ConvertError::Report {
            path: path.to_path_buf(),
            source: e,
        })?;
        writer.flush().map_err(|e| ConvertError::io(path, e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

fn parent_or_current(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
