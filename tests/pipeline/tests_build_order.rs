#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::Workspace;
use crate::helpers::template_assertions::{assert_topological, resource_names};
use rstest::rstest;

const STACK: &str = r#"
var Function = lambda.Function{
    Role:   Role.Arn,
    Bucket: Bucket,
}

var Role = iam.Role{
    Policy: Bucket.Arn,
}

var Bucket = s3.Bucket{
    BucketName: "artifacts",
}
"#;

#[test]
fn test_dependencies_come_first() {
    let ws = Workspace::new();
    ws.write_decls("main.go", STACK);
    let template = ws.build().unwrap();
    assert_eq!(resource_names(&template), vec!["Bucket", "Role", "Function"]);
    assert_eq!(template.resources["Function"].resource_type, "AWS::Lambda::Function");
}

#[test]
fn test_independent_resources_sorted_by_name() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
var Zeta = s3.Bucket{}

var Alpha = s3.Bucket{}

var Mid = iam.Role{Owner: Zeta.Arn}
"#,
    );
    let template = ws.build().unwrap();
    assert_eq!(resource_names(&template), vec!["Alpha", "Zeta", "Mid"]);
}

#[rstest]
#[case(&["a.go", "b.go", "c.go"])]
#[case(&["c.go", "b.go", "a.go"])]
#[case(&["nested/b.go", "a.go", "deep/er/c.go"])]
fn test_order_independent_of_file_layout(#[case] files: &[&str]) {
    let bodies = [
        "\nvar Function = lambda.Function{Role: Role.Arn, Code: Bucket}\n",
        "\nvar Role = iam.Role{Policy: Bucket.Arn}\n",
        "\nvar Bucket = s3.Bucket{}\n\nvar Logs = s3.Bucket{}\n",
    ];
    let ws = Workspace::new();
    for (file, body) in files.iter().zip(bodies) {
        ws.write_decls(file, body);
    }
    let template = ws.build().unwrap();
    assert_eq!(
        resource_names(&template),
        vec!["Bucket", "Logs", "Role", "Function"]
    );
}

#[test]
fn test_repeated_builds_are_identical() {
    let ws = Workspace::new();
    ws.write_decls("main.go", STACK);
    ws.write_decls(
        "more.go",
        "\nvar Queue = s3.Bucket{Peer: Role.Arn}\n\nvar Alarm = iam.Role{Target: Queue}\n",
    );
    let first = ws.build().unwrap().to_json().unwrap();
    for _ in 0..5 {
        assert_eq!(ws.build().unwrap().to_json().unwrap(), first);
    }
}

#[test]
fn test_order_respects_every_dependency() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
var E = s3.Bucket{Up: D.Arn, Side: B}

var D = s3.Bucket{Up: C}

var C = s3.Bucket{Up: A.Arn}

var B = s3.Bucket{Up: A}

var A = s3.Bucket{}

var F = s3.Bucket{}
"#,
    );
    let discovery = ws.scan();
    let template = crate::helpers::fixtures::build_discovery(&discovery).unwrap();
    assert_topological(&template, &discovery);
    assert_eq!(resource_names(&template), vec!["A", "B", "C", "D", "E", "F"]);
}
