#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::Workspace;
use smol_str::SmolStr;
use stackform::hir::AttributeRef;

fn attr(resource: &str, attribute: &str, path: &str) -> AttributeRef {
    AttributeRef {
        resource: SmolStr::new(resource),
        attribute: SmolStr::new(attribute),
        field_path: path.to_string(),
    }
}

#[test]
fn test_nested_literal_path() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
var B = iam.Role{}

var A = lambda.Function{
    Environment: &lambda.Function_Environment{
        Variables: map[string]string{
            "ROLE": B.Arn,
        },
    },
}
"#,
    );
    let discovery = ws.scan();
    assert_eq!(
        discovery.resolve_attr_refs("A"),
        vec![attr("B", "Arn", "Environment.Variables.ROLE")]
    );
}

#[test]
fn test_path_composed_through_helper_in_another_file() {
    let ws = Workspace::new();
    ws.write_decls("resources.go", "\nvar B = iam.Role{}\n\nvar A = lambda.Function{Role: V}\n");
    ws.write_decls("helpers/config.go", "\nvar V = &lambda.Function_Config{Inner: B.Arn}\n");

    let discovery = ws.scan();
    assert!(!discovery.has_errors(), "{:?}", discovery.diagnostics());
    assert_eq!(discovery.resolve_attr_refs("A"), vec![attr("B", "Arn", "Role.Inner")]);
}

#[test]
fn test_declaration_carries_resolved_refs() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        r#"
var Bucket = s3.Bucket{}

var Shared = map[string]any{"Arn": Bucket.Arn, "Name": Bucket}

var Fn = lambda.Function{Environment: Shared, Direct: Bucket.DomainName}
"#,
    );
    let discovery = ws.scan();
    let mut refs = discovery.resolve_attr_refs("Fn");
    refs.sort();
    assert_eq!(
        refs,
        vec![
            attr("Bucket", "Arn", "Environment.Arn"),
            attr("Bucket", "DomainName", "Direct"),
        ]
    );
    assert!(discovery.resolve_attr_refs("Bucket").is_empty());
}
