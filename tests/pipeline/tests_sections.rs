#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::fixtures::Workspace;
use serde_json::json;
use stackform::project::{ReservedNames, ScanConfig, ShapeRegistry};
use stackform::template::{
    BuildError, FixedValues, StaticEvaluator, TemplateBuilder, build_template,
};

const FULL_STACK: &str = r#"
var Env = Parameter{
    Type:          "String",
    Default:       "dev",
    AllowedValues: []string{"dev", "prod"},
}

var MemorySize = Parameter{Type: "Number", MinValue: 128, MaxValue: 1024}

var Regions = Mapping{
    "us-east-1": {"Ami": "ami-1"},
    "eu-west-1": {"Ami": "ami-2"},
}

var IsProd = Equals{Env, "prod"}

var IsBig = And{IsProd, Not{Equals{MemorySize, 128}}}

var Data = s3.Bucket{
    BucketName: Sub{"${AWS::StackName}-data"},
    Versioning: If{IsProd, "Enabled", "Suspended"},
    Region:     AWS_REGION,
}

var Handler = lambda.Function{
    MemorySize: MemorySize,
    Bucket:     Data,
    Target:     Data.Arn,
}

var DataArn = Output{
    Description: "bucket arn",
    Value:       Data.Arn,
    ExportName:  Sub{"${AWS::StackName}-data-arn"},
}
"#;

#[test]
fn test_every_section_populated() {
    let ws = Workspace::new();
    ws.write_decls("main.go", FULL_STACK);
    let template = ws.build().unwrap();

    assert_eq!(template.format_version, "2010-09-09");
    assert_eq!(template.transform, None);

    let params: Vec<_> = template.parameters.keys().collect();
    assert_eq!(params, vec!["Env", "MemorySize"]);
    assert_eq!(template.parameters["Env"].default, Some(json!("dev")));
    assert_eq!(
        template.parameters["Env"].allowed_values,
        Some(vec![json!("dev"), json!("prod")])
    );
    assert_eq!(template.parameters["MemorySize"].parameter_type, "Number");
    assert_eq!(template.parameters["MemorySize"].min_value, Some(json!(128)));

    assert_eq!(
        template.mappings["Regions"],
        json!({"us-east-1": {"Ami": "ami-1"}, "eu-west-1": {"Ami": "ami-2"}})
    );

    let conditions: Vec<_> = template.conditions.keys().collect();
    assert_eq!(conditions, vec!["IsBig", "IsProd"]);
    assert_eq!(
        template.conditions["IsBig"],
        json!({"Fn::And": [
            {"Condition": "IsProd"},
            {"Fn::Not": [{"Fn::Equals": [{"Ref": "MemorySize"}, 128]}]}
        ]})
    );

    let data = template.resources["Data"].properties.clone().unwrap();
    assert_eq!(data["BucketName"], json!({"Fn::Sub": "${AWS::StackName}-data"}));
    assert_eq!(data["Versioning"], json!({"Fn::If": ["IsProd", "Enabled", "Suspended"]}));
    assert_eq!(data["Region"], json!({"Ref": "AWS::Region"}));

    let handler = template.resources["Handler"].properties.clone().unwrap();
    assert_eq!(handler["MemorySize"], json!({"Ref": "MemorySize"}));
    assert_eq!(handler["Bucket"], json!({"Ref": "Data"}));
    assert_eq!(handler["Target"], json!({"Fn::GetAtt": ["Data", "Arn"]}));

    let output = &template.outputs["DataArn"];
    assert_eq!(output.value, json!({"Fn::GetAtt": ["Data", "Arn"]}));
    assert_eq!(output.description, Some(json!("bucket arn")));
    assert_eq!(
        output.export.as_ref().unwrap().name,
        json!({"Fn::Sub": "${AWS::StackName}-data-arn"})
    );
}

#[test]
fn test_serverless_resources_add_transform() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        "\nvar Api = serverless.Function{Runtime: \"go1.x\"}\n\nvar Data = s3.Bucket{}\n",
    );
    let template = ws.build().unwrap();
    assert_eq!(template.transform.as_deref(), Some("AWS::Serverless-2016-10-31"));
    assert_eq!(template.resources["Api"].resource_type, "AWS::Serverless::Function");
}

#[test]
fn test_uninitialized_parameter_is_absent() {
    let ws = Workspace::new();
    ws.write_decls(
        "main.go",
        "\nvar Stage = Parameter{Type: \"String\"}\n\nvar Data = s3.Bucket{}\n",
    );
    let discovery = ws.scan();
    let fixed = FixedValues::default().with_value("Data", json!({"BucketName": "fixed"}));
    let config = ScanConfig::builtin();
    let template = build_template(&discovery, &fixed, &TemplateBuilder::new(&config)).unwrap();

    assert!(template.parameters.is_empty());
    assert_eq!(
        template.resources["Data"].properties.as_ref().unwrap()["BucketName"],
        json!("fixed")
    );
}

#[test]
fn test_unregistered_namespace_is_unknown_type() {
    let ws = Workspace::new();
    let path = ws.write_decls("main.go", "var Role = iam.Role{}\n");
    let discovery = ws.scan();

    let builtin = ScanConfig::builtin();
    let evaluator = StaticEvaluator::new(&discovery, &builtin.shapes, &builtin.reserved);
    let narrow = ScanConfig::new(
        ShapeRegistry::default().with_namespace("s3", "AWS::S3"),
        ReservedNames::builtin(),
    );
    let err = build_template(&discovery, &evaluator, &TemplateBuilder::new(&narrow)).unwrap_err();
    assert!(matches!(err, BuildError::UnknownResourceType { .. }));
    assert_eq!(
        err.to_string(),
        format!("{}:10: Role: unknown resource type iam.Role", path.display())
    );
}

#[test]
fn test_extraction_failure_names_declaration() {
    let ws = Workspace::new();
    ws.write_decls("main.go", "var Data = s3.Bucket{Size: 1 + 2}\n");
    let err = ws.build().unwrap_err();
    assert!(matches!(err, BuildError::Extraction(_)));
    assert!(err.to_string().contains("cannot extract value of Data"), "{err}");
}
