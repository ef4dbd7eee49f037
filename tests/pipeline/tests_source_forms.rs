#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::{HEADER, HEADER_LINES, Workspace};
use crate::helpers::template_assertions::resource_names;
use serde_json::json;

#[test]
fn test_block_comment_license_header() {
    let ws = Workspace::new();
    ws.write(
        "main.go",
        &format!(
            "/*\n * Copyright 2026 Example Corp.\n * SPDX-License-Identifier: MIT\n */\n\n{HEADER}\nvar Data = s3.Bucket{{}}\n"
        ),
    );
    let discovery = ws.scan();
    assert!(discovery.scan_errors().is_empty(), "{:?}", discovery.scan_errors());
    let data = discovery.declaration("Data").unwrap();
    // four comment lines and a blank line precede the header
    assert_eq!(data.location.line, 5 + HEADER_LINES + 2);
}

#[test]
fn test_comments_inside_declarations() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
// Role assumed by the handler.
var Role = iam.Role{ /* no properties */ }

var Fn = lambda.Function{
    Role: Role.Arn, // execution role
    /* Timeout: 30, */
    MemorySize: 256 /* MB */,
}
"#,
    );
    let template = ws.build().unwrap();
    assert_eq!(resource_names(&template), vec!["Role", "Fn"]);
    assert_eq!(
        template.resources["Fn"].properties.clone().unwrap(),
        json!({"Role": {"Fn::GetAtt": ["Role", "Arn"]}, "MemorySize": 256})
            .as_object()
            .unwrap()
            .clone()
    );
}

#[test]
fn test_block_comment_ends_a_line() {
    let ws = Workspace::new();
    ws.write_decls("main.go", "\nvar Data = s3.Bucket{} /* first\n */ var Logs = s3.Bucket{}\n");
    let discovery = ws.scan();
    assert!(discovery.scan_errors().is_empty(), "{:?}", discovery.scan_errors());
    assert_eq!(discovery.len(), 2);
}

#[test]
fn test_underscore_bindings() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
var Role = iam.Role{}

var _ = s3.Bucket{Owner: Missing}

var _shared = lambda.Function{Role: Role.Arn}

var Fn = lambda.Function{Config: _shared}
"#,
    );
    let discovery = ws.scan();
    assert!(!discovery.has_errors(), "{:?}", discovery.diagnostics());
    assert!(discovery.binding("_").is_none());
    assert!(discovery.binding("_shared").is_some());
    assert!(discovery.declaration("_shared").is_none());

    let template = crate::helpers::fixtures::build_discovery(&discovery).unwrap();
    assert_eq!(template.resources.len(), 2);
    assert_eq!(
        template.resources["Fn"].properties.as_ref().unwrap()["Config"],
        json!({"Role": {"Fn::GetAtt": ["Role", "Arn"]}})
    );
}
