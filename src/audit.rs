//! Unexpected-file audit for one workflow directory level.

use std::collections::HashSet;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, WorkflowalizerError};

/// Relative `/`-separated path of `entry` below `root`.
fn relative_path(root: &Path, entry: &DirEntry) -> String {
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lists every file below `root` that is not covered by `expected`.
///
/// An expected entry names a file or directory relative to `root`; expected
/// directories are pruned before descending, so nested workflow directories
/// are never walked here. Results are relative `/` paths in file-name order.
pub fn unexpected_files(root: &Path, expected: &HashSet<String>) -> Result<Vec<String>> {
    tracing::debug!(
        "Auditing '{}' against {} expected entries",
        root.display(),
        expected.len()
    );

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !expected.contains(&relative_path(root, e)));

    let mut unexpected = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            WorkflowalizerError::io(&path, e.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = relative_path(root, &entry);
        tracing::trace!("Unexpected file '{relative}'");
        unexpected.push(relative);
    }

    tracing::debug!("Found {} unexpected files", unexpected.len());
    Ok(unexpected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn expected(entries: &[&str]) -> HashSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reports_only_undeclared_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("workflow.knime"), "<config/>").unwrap();
        fs::create_dir_all(root.join("Reader (#1)/internal")).unwrap();
        fs::write(root.join("Reader (#1)/settings.xml"), "").unwrap();
        fs::write(root.join("Reader (#1)/internal/state.bin"), "").unwrap();
        fs::write(root.join("notes.txt"), "stray").unwrap();
        fs::create_dir_all(root.join("backup")).unwrap();
        fs::write(root.join("backup/old.knime"), "").unwrap();

        let found = unexpected_files(root, &expected(&["workflow.knime", "Reader (#1)"])).unwrap();
        assert_eq!(found, vec!["backup/old.knime", "notes.txt"]);
    }

    #[test]
    fn empty_directories_are_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/deeper")).unwrap();
        assert!(unexpected_files(dir.path(), &HashSet::new()).unwrap().is_empty());
    }
}
