#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::Workspace;
use stackform::hir::ScanError;
use stackform::project::{ScanConfig, SourceRoot, WorkspaceLoader};

fn loader() -> WorkspaceLoader {
    WorkspaceLoader::new(ScanConfig::builtin())
}

fn names(discovery: &stackform::hir::Discovery) -> Vec<String> {
    let mut names: Vec<String> = discovery.declarations().map(|d| d.name.to_string()).collect();
    names.sort();
    names
}

#[test]
fn test_multiple_roots_merge() {
    let first = Workspace::new();
    first.write_decls("a.go", "var Data = s3.Bucket{}\n");
    let second = Workspace::new();
    second.write_decls("b.go", "var Fn = lambda.Function{Code: Data}\n");

    let discovery = loader().scan(&[
        SourceRoot::recursive(first.root()),
        SourceRoot::recursive(second.root()),
    ]);
    assert!(!discovery.has_errors(), "{:?}", discovery.diagnostics());
    assert_eq!(names(&discovery), vec!["Data", "Fn"]);
}

#[test]
fn test_non_recursive_root_ignores_subdirectories() {
    let ws = Workspace::new();
    ws.write_decls("top.go", "var Top = s3.Bucket{}\n");
    ws.write_decls("sub/deep.go", "var Deep = s3.Bucket{}\n");

    let shallow = loader().scan(&[SourceRoot::new(ws.root(), false)]);
    assert_eq!(names(&shallow), vec!["Top"]);

    let deep = loader().scan(&[SourceRoot::recursive(ws.root())]);
    assert_eq!(names(&deep), vec!["Deep", "Top"]);
}

#[test]
fn test_test_files_and_skipped_dirs_ignored() {
    let ws = Workspace::new();
    ws.write_decls("main.go", "var Data = s3.Bucket{}\n");
    ws.write_decls("main_test.go", "var Fake = s3.Bucket{}\n");
    ws.write_decls("vendor/lib/lib.go", "var Vendored = s3.Bucket{}\n");
    ws.write_decls(".hidden/x.go", "var Hidden = s3.Bucket{}\n");
    ws.write("notes.txt", "var NotGo = s3.Bucket{}\n");

    assert_eq!(names(&ws.scan()), vec!["Data"]);
}

#[test]
fn test_failed_root_does_not_affect_others() {
    let good = Workspace::new();
    good.write_decls("main.go", "var Data = s3.Bucket{}\n");
    let bad = Workspace::new();
    bad.write_decls("main.go", "var Data = s3.Bucket{\n");
    let missing = good.path("does-not-exist");

    let discovery = loader().scan(&[
        SourceRoot::recursive(bad.root()),
        SourceRoot::recursive(good.root()),
        SourceRoot::recursive(&missing),
    ]);
    assert_eq!(names(&discovery), vec!["Data"]);
    assert_eq!(discovery.scan_errors().len(), 2);
    assert!(discovery.scan_errors().iter().any(|e| matches!(e, ScanError::Syntax { .. })));
    assert!(
        discovery
            .scan_errors()
            .iter()
            .any(|e| matches!(e, ScanError::RootNotFound { path } if path == &missing))
    );
}

#[test]
fn test_single_file_root() {
    let ws = Workspace::new();
    let file = ws.write_decls("only.go", "var Only = s3.Bucket{}\n");
    ws.write_decls("other.go", "var Other = s3.Bucket{}\n");

    let discovery = loader().scan(&[SourceRoot::new(file, false)]);
    assert_eq!(names(&discovery), vec!["Only"]);
}
