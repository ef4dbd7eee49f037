#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::Workspace;
use crate::helpers::template_assertions::resource_names;
use serde_json::Value;
use stackform::template::Template;

const STACK: &str = r#"
var Env = Parameter{Default: "dev", NoEcho: false}

var Regions = Mapping{"us-east-1": {"Ami": "ami-1"}}

var IsProd = Equals{Env, "prod"}

var Role = iam.Role{RoleName: "runner"}

var Api = serverless.Function{
    Role:     Role.Arn,
    Timeout:  30,
    Ratio:    0.5,
    Enabled:  true,
    Layers:   []string{"a", "b"},
    Schedule: If{IsProd, "rate(1 minute)", AWS_NO_VALUE},
}

var ApiArn = Output{Value: Api.Arn, Export: map[string]any{"Name": "api-arn"}}
"#;

fn built() -> Template {
    let ws = Workspace::new();
    ws.write_decls("main.go", STACK);
    ws.build().unwrap()
}

#[test]
fn test_json_roundtrip_preserves_document() {
    let template = built();
    let json = template.to_json().unwrap();
    let decoded = Template::from_json(&json).unwrap();
    assert_eq!(decoded, template);
    assert_eq!(resource_names(&decoded), vec!["Role", "Api"]);
}

#[test]
fn test_yaml_roundtrip_preserves_document() {
    let template = built();
    let yaml = template.to_yaml().unwrap();
    let decoded = Template::from_yaml(&yaml).unwrap();
    assert_eq!(decoded, template);
}

#[test]
fn test_json_section_order() {
    let json = built().to_json().unwrap();
    let sections = [
        "\"AWSTemplateFormatVersion\"",
        "\"Transform\"",
        "\"Parameters\"",
        "\"Mappings\"",
        "\"Conditions\"",
        "\"Resources\"",
        "\"Outputs\"",
    ];
    let positions: Vec<usize> = sections.iter().map(|s| json.find(s).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    assert!(!json.contains("\"Description\""));
}

#[test]
fn test_empty_workspace_still_has_resources() {
    let ws = Workspace::new();
    let template = ws.build().unwrap();
    let value: Value = serde_json::from_str(&template.to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"AWSTemplateFormatVersion": "2010-09-09", "Resources": {}})
    );
}
