#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::{HEADER_LINES, Workspace};
use stackform::hir::{ScanError, codes};
use stackform::template::BuildError;

#[test]
fn test_undefined_reference_reported_once() {
    let ws = Workspace::new();
    let path = ws.write_decls(
        "main.go",
        r#"
var Data = s3.Bucket{
    A: Foo,
    B: Foo.Arn,
}
"#,
    );

    let discovery = ws.scan();
    let diagnostics = discovery.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, codes::UNDEFINED_REFERENCE);
    assert_eq!(diagnostics[0].location.file.as_ref(), path.as_path());
    assert_eq!(diagnostics[0].location.line, HEADER_LINES + 2);
    assert!(diagnostics[0].message.contains("\"Foo\""));
}

#[test]
fn test_build_refused_while_diagnostics_exist() {
    let ws = Workspace::new();
    ws.write_decls("main.go", "var Data = s3.Bucket{Owner: Ghost.Arn}\n");

    let err = ws.build().unwrap_err();
    let BuildError::Validation { count, first } = err else {
        panic!("expected a validation refusal, got {err}");
    };
    assert_eq!(count, 1);
    assert!(first.ends_with("Data references undefined resource \"Ghost\""), "{first}");
}

#[test]
fn test_duplicate_across_files() {
    let ws = Workspace::new();
    ws.write_decls("a.go", "var Data = s3.Bucket{}\n");
    ws.write_decls("b.go", "\n\nvar Data = iam.Role{}\n");

    let discovery = ws.scan();
    assert_eq!(discovery.len(), 1);
    let diagnostics = discovery.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, codes::DUPLICATE_DEFINITION);
    assert_eq!(diagnostics[0].location.line, HEADER_LINES + 3);
    assert!(diagnostics[0].message.contains(&format!("a.go:{}", HEADER_LINES + 1)));
}

#[test]
fn test_syntax_error_blocks_build() {
    let ws = Workspace::new();
    ws.write_decls("good.go", "var Data = s3.Bucket{}\n");
    let bad = ws.write_decls("bad.go", "var Broken = s3.Bucket{\n");

    let discovery = ws.scan();
    assert_eq!(discovery.scan_errors().len(), 1);
    let ScanError::Syntax { path, .. } = &discovery.scan_errors()[0] else {
        panic!("expected a syntax error");
    };
    assert_eq!(path, &bad);
    assert!(matches!(ws.build(), Err(BuildError::Validation { .. })));
}

#[test]
fn test_helper_and_resource_sharing_a_name() {
    let ws = Workspace::new();
    let first = ws.write_decls("a.go", "var Data = map[string]string{\"k\": \"v\"}\n");
    let second = ws.write_decls("b.go", "var Data = s3.Bucket{BucketName: \"real\"}\n");

    let discovery = ws.scan();
    let diagnostics = discovery.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, codes::DUPLICATE_DEFINITION);
    assert_eq!(diagnostics[0].location.file.as_ref(), second.as_path());
    assert!(
        diagnostics[0]
            .message
            .contains(&format!("{}:{}", first.display(), HEADER_LINES + 1))
    );
    assert!(discovery.declaration("Data").is_none());
    assert!(matches!(ws.build(), Err(BuildError::Validation { count: 1, .. })));
}
