//! Persisting composite commits, one JSON file per repository.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::error::DatasetError;
use crate::grouping::CompositeGroup;

/// Writes `<output_dir>/<repo>.json` files.
///
/// Results are written to a temporary file in the same directory and renamed
/// into place, so a result file is either complete or absent.
#[derive(Debug, Clone)]
pub struct ResultSink {
    output_dir: PathBuf,
}

impl ResultSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn result_path(&self, repo_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", repo_name))
    }

    /// True if a result for this repository was already persisted.
    pub fn exists(&self, repo_name: &str) -> bool {
        self.result_path(repo_name).exists()
    }

    /// Persist the groups and return the written path.
    pub fn write(&self, repo_name: &str, groups: &[CompositeGroup]) -> Result<PathBuf, DatasetError> {
        let path = self.result_path(repo_name);
        let dir = path.parent().unwrap_or(self.output_dir.as_path()).to_path_buf();

        std::fs::create_dir_all(&dir).map_err(|source| DatasetError::CreateOutputDir {
            path: dir.clone(),
            source,
        })?;

        let json = to_json(groups)?;

        let mut file = NamedTempFile::new_in(&dir).map_err(DatasetError::WriteFailed)?;
        file.write_all(&json).map_err(DatasetError::WriteFailed)?;
        file.flush().map_err(DatasetError::WriteFailed)?;
        file.persist(&path).map_err(|e| DatasetError::PersistFailed {
            path: path.clone(),
            source: e.error,
        })?;

        Ok(path)
    }
}

/// Pretty-print with four-space indentation.
fn to_json(groups: &[CompositeGroup]) -> Result<Vec<u8>, DatasetError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    groups
        .serialize(&mut ser)
        .map_err(DatasetError::SerializationFailed)?;
    Ok(buf)
}
