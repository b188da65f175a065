//! Reading the input corpus and writing output artifacts.

use crate::errors::{CurateError, CurateResult};
use crate::model::QaRecord;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

/// Loads the input corpus. Any failure here aborts the run before grading.
pub fn load_records(path: &Path) -> CurateResult<Vec<QaRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| CurateError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&text).map_err(|message| CurateError::InputCorrupt {
        path: path.to_path_buf(),
        message,
    })
}

pub fn parse_records(text: &str) -> Result<Vec<QaRecord>, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let items = value
        .as_array()
        .ok_or_else(|| "expected a JSON array of records".to_string())?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<QaRecord>(item.clone())
                .map_err(|e| format!("record {}: {}", i + 1, e))
        })
        .collect()
}

/// A record that loads but is unlikely to grade well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// 1-based position in the input.
    pub index: usize,
    pub message: String,
}

pub fn inspect_records(records: &[QaRecord]) -> Vec<RecordIssue> {
    let mut issues = Vec::new();
    for (i, r) in records.iter().enumerate() {
        if r.question.trim().is_empty() {
            issues.push(RecordIssue {
                index: i + 1,
                message: "question is blank".into(),
            });
        }
        if r.answer.trim().is_empty() {
            issues.push(RecordIssue {
                index: i + 1,
                message: "answer is blank".into(),
            });
        }
    }
    issues
}

/// Writes `value` as 4-space indented JSON with non-ASCII text kept as is.
///
/// The file is written next to its destination and renamed into place, so
/// a failed write never leaves a truncated artifact behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CurateResult<()> {
    let mut outputs = StagedOutputs::new();
    outputs.stage(path, value)?;
    outputs.commit()
}

/// A set of JSON artifacts that land together or not at all.
///
/// [`stage`](Self::stage) serializes into a temp file beside each
/// destination. Nothing is visible until [`commit`](Self::commit), which
/// renames every file into place. Dropping an uncommitted set deletes the
/// temp files.
#[derive(Debug, Default)]
pub struct StagedOutputs {
    staged: Vec<(PathBuf, NamedTempFile)>,
}

impl StagedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage<T: Serialize + ?Sized>(&mut self, path: &Path, value: &T) -> CurateResult<()> {
        let output_err = |message: String| output_error(path, message);

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| output_err(e.to_string()))?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut ser)
            .map_err(|e| output_err(e.to_string()))?;
        buf.push(b'\n');

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| output_err(e.to_string()))?;
        tmp.write_all(&buf)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| output_err(e.to_string()))?;
        self.staged.push((path.to_path_buf(), tmp));
        Ok(())
    }

    /// Renames every staged file into place. If one rename fails, the
    /// artifacts already renamed by this call are removed again.
    pub fn commit(self) -> CurateResult<()> {
        let mut landed: Vec<PathBuf> = Vec::with_capacity(self.staged.len());
        for (path, tmp) in self.staged {
            if let Err(e) = tmp.persist(&path) {
                for done in &landed {
                    if let Err(rm) = std::fs::remove_file(done) {
                        warn!(path = %done.display(), error = %rm, "could not roll back artifact");
                    }
                }
                return Err(output_error(&path, e.error.to_string()));
            }
            landed.push(path);
        }
        Ok(())
    }
}

fn output_error(path: &Path, message: String) -> CurateError {
    CurateError::Output {
        path: path.to_path_buf(),
        message,
    }
}
