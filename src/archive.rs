//! Zip-archive input.

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, WorkflowalizerError};

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "knwf", "knar"];

/// An archive unpacked into a private temporary directory. The directory is
/// removed when this value is dropped.
#[derive(Debug)]
pub(crate) struct UnpackedArchive {
    _dir: TempDir,
    root: PathBuf,
}

impl UnpackedArchive {
    /// The single item directory inside the archive.
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

pub(crate) fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ARCHIVE_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
}

/// Unpacks `path` and locates the one top-level directory holding `descriptor`.
pub(crate) fn unpack(path: &Path, descriptor: &str) -> Result<UnpackedArchive> {
    tracing::debug!("Unpacking archive '{}'", path.display());
    let file = File::open(path).map_err(|e| WorkflowalizerError::io(path, e))?;
    let archive_error = |source| WorkflowalizerError::Archive {
        path: path.to_path_buf(),
        source,
    };
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;

    let dir = tempfile::Builder::new()
        .prefix("workflowalizer-")
        .tempdir()
        .map_err(|e| WorkflowalizerError::io(path, e))?;
    archive.extract(dir.path()).map_err(archive_error)?;

    let entries = std::fs::read_dir(dir.path()).map_err(|e| WorkflowalizerError::io(dir.path(), e))?;
    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WorkflowalizerError::io(dir.path(), e))?;
        let candidate = entry.path();
        if candidate.is_dir() && candidate.join(descriptor).is_file() {
            candidates.push(candidate);
        }
    }

    match candidates.len() {
        1 => Ok(UnpackedArchive {
            root: candidates.remove(0),
            _dir: dir,
        }),
        0 => Err(WorkflowalizerError::InvalidArchive {
            path: path.to_path_buf(),
            message: format!("no top-level directory contains '{descriptor}'"),
        }),
        n => Err(WorkflowalizerError::InvalidArchive {
            path: path.to_path_buf(),
            message: format!("{n} top-level directories contain '{descriptor}', expected one"),
        }),
    }
}
