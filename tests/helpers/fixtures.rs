//! On-disk source trees for scanning tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use stackform::hir::Discovery;
use stackform::project::{ScanConfig, SourceRoot, WorkspaceLoader};
use stackform::template::{BuildError, StaticEvaluator, Template, TemplateBuilder, build_template};
use tempfile::TempDir;

/// Standard package header importing the namespaces tests use.
pub const HEADER: &str = r#"package infra

import (
    "github.com/acme/resources/aws/iam"
    "github.com/acme/resources/aws/lambda"
    "github.com/acme/resources/aws/s3"
    "github.com/acme/resources/aws/serverless"
    . "github.com/acme/resources/intrinsics"
)
"#;

/// Number of lines in [`HEADER`]; declarations appended with
/// [`Workspace::write_decls`] start on the line after.
pub const HEADER_LINES: u32 = 9;

/// A temporary source tree.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file verbatim.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write `body` below [`HEADER`].
    pub fn write_decls(&self, relative: &str, body: &str) -> PathBuf {
        self.write(relative, &format!("{HEADER}{body}"))
    }

    pub fn scan(&self) -> Discovery {
        WorkspaceLoader::new(ScanConfig::builtin()).scan(&[SourceRoot::recursive(self.root())])
    }

    /// Scan, evaluate statically and build.
    pub fn build(&self) -> Result<Template, BuildError> {
        build_discovery(&self.scan())
    }
}

pub fn build_discovery(discovery: &Discovery) -> Result<Template, BuildError> {
    let config = ScanConfig::builtin();
    let evaluator = StaticEvaluator::new(discovery, &config.shapes, &config.reserved);
    build_template(discovery, &evaluator, &TemplateBuilder::new(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line_count() {
        assert_eq!(HEADER.lines().count() as u32, HEADER_LINES);
    }
}
