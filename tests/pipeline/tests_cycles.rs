#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::{HEADER_LINES, Workspace};
use stackform::Location;
use stackform::template::{BuildError, CycleMember};

#[test]
fn test_two_resource_cycle_names_both_locations() {
    let ws = Workspace::new();
    let path = ws.write_decls(
        "main.go",
        r#"
var A = s3.Bucket{
    Peer: B.Arn,
}

var B = s3.Bucket{
    Peer: A.Arn,
}
"#,
    );

    let discovery = ws.scan();
    assert!(!discovery.has_errors(), "{:?}", discovery.diagnostics());

    let err = crate::helpers::fixtures::build_discovery(&discovery).unwrap_err();
    let BuildError::Cycle { cycle } = &err else {
        panic!("expected a cycle, got {err}");
    };
    let a = CycleMember {
        name: "A".into(),
        location: Location::new(path.clone(), HEADER_LINES + 2),
    };
    let b = CycleMember {
        name: "B".into(),
        location: Location::new(path.clone(), HEADER_LINES + 6),
    };
    assert_eq!(cycle, &vec![a.clone(), b.clone(), a.clone()]);
    assert_eq!(
        err.to_string(),
        format!("dependency cycle detected: {a} -> {b} -> {a}")
    );
}

#[test]
fn test_cycle_across_files() {
    let ws = Workspace::new();
    ws.write_decls("one.go", "var Fn = lambda.Function{Role: Role.Arn}\n");
    ws.write_decls("two.go", "var Role = iam.Role{Trust: Topic}\n");
    ws.write_decls("three.go", "var Topic = s3.Bucket{Target: Fn.Arn}\n");

    let err = ws.build().unwrap_err();
    assert_eq!(err.cycle_names(), vec!["Fn", "Role", "Topic"]);
    let BuildError::Cycle { cycle } = err else {
        panic!("expected a cycle");
    };
    for member in &cycle {
        assert_eq!(member.location.line, HEADER_LINES + 1);
    }
    assert_eq!(cycle.first(), cycle.last());
}

#[test]
fn test_cycle_alongside_acyclic_resources() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
var Base = s3.Bucket{}

var User = iam.Role{Needs: Base.Arn, Loop: Ping}

var Ping = s3.Bucket{Next: Pong}

var Pong = s3.Bucket{Next: Ping.Arn}
"#,
    );
    let err = ws.build().unwrap_err();
    assert_eq!(err.cycle_names(), vec!["Ping", "Pong"]);
}
