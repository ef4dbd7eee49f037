//! Source file collection and loading.

use std::path::{Path, PathBuf};

use tracing::{trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::base::constants::{SKIPPED_DIRS, SOURCE_EXT, TEST_FILE_SUFFIX};
use crate::hir::{FileScan, ScanError, scan_file};
use crate::project::ScanConfig;

/// Collect declaration source files under `root`, sorted by path.
///
/// A non-recursive scan only looks at the root's direct children. Recursive
/// scans skip hidden directories and [`SKIPPED_DIRS`]. A root that is itself
/// a file is returned as-is when it has the source extension.
pub fn collect_file_paths(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if root.is_file() {
        return Ok(if is_source_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::Io {
                    path: root.to_path_buf(),
                    source: err.into(),
                });
            }
            Err(err) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    trace!("collected {} source files under {}", paths.len(), root.display());
    Ok(paths)
}

/// Read a source file.
pub fn load_file(path: &Path) -> Result<String, ScanError> {
    std::fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read, parse and scan a source file.
pub fn load_and_scan(path: &Path, config: &ScanConfig) -> Result<FileScan, ScanError> {
    let text = load_file(path)?;
    scan_file(path, &text, config)
}

pub fn is_source_file(path: &Path) -> bool {
    let has_ext = path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXT);
    let is_test = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEST_FILE_SUFFIX));
    has_ext && !is_test
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}
