use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::ScanConfig;
use super::file_loader;
use crate::hir::{Discovery, FileScan, ScanError};

/// One source tree to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

impl SourceRoot {
    pub fn new(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
        }
    }

    pub fn recursive(path: impl Into<PathBuf>) -> Self {
        Self::new(path, true)
    }
}

/// Result of scanning one root in isolation.
#[derive(Debug)]
pub struct RootScan {
    pub root: SourceRoot,
    pub result: Result<Vec<FileScan>, ScanError>,
}

/// Scans source roots into a [`Discovery`].
///
/// Roots are scanned in parallel, each into its own [`RootScan`]; the
/// results are merged sequentially in the order the roots were given, so
/// the outcome does not depend on scheduling.
pub struct WorkspaceLoader {
    config: ScanConfig,
}

impl WorkspaceLoader {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn scan(&self, roots: &[SourceRoot]) -> Discovery {
        let root_scans: Vec<RootScan> = roots
            .par_iter()
            .map(|root| RootScan {
                root: root.clone(),
                result: self.scan_root(root),
            })
            .collect();

        let mut scans = Vec::new();
        let mut errors = Vec::new();
        for root_scan in root_scans {
            match root_scan.result {
                Ok(files) => scans.extend(files),
                Err(err) => {
                    warn!("scan of {} aborted: {}", root_scan.root.path.display(), err);
                    errors.push(err);
                }
            }
        }

        Discovery::from_scans(scans, errors)
    }

    /// Scan every file of one root; the first failure aborts the root.
    pub fn scan_root(&self, root: &SourceRoot) -> Result<Vec<FileScan>, ScanError> {
        let paths = file_loader::collect_file_paths(&root.path, root.recursive)?;
        debug!("scanning {} files under {}", paths.len(), root.path.display());

        paths
            .iter()
            .map(|path| file_loader::load_and_scan(path, &self.config))
            .collect()
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new(ScanConfig::builtin())
    }
}
