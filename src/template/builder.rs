use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::document::{ExportEntry, OutputEntry, ParameterEntry, ResourceEntry, Template};
use super::error::BuildError;
use super::extract::ValueMap;
use super::order::resource_order;
use super::values::{transform_object, transform_value};
use crate::base::constants::DEFAULT_PARAMETER_TYPE;
use crate::hir::{Declaration, DeclarationKind};
use crate::project::{ReservedNames, ScanConfig, ShapeRegistry};

/// Assembles a [`Template`] from declarations and their value data.
///
/// A builder holds only immutable configuration; every [`build`] call
/// produces a fresh document.
///
/// [`build`]: TemplateBuilder::build
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    shapes: Arc<ShapeRegistry>,
    reserved: Arc<ReservedNames>,
    description: Option<String>,
}

impl TemplateBuilder {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            shapes: config.shapes.clone(),
            reserved: config.reserved.clone(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build<'d>(
        &self,
        declarations: impl IntoIterator<Item = &'d Declaration>,
        values: &ValueMap,
    ) -> Result<Template, BuildError> {
        let mut by_kind: FxHashMap<DeclarationKind, Vec<&Declaration>> = FxHashMap::default();
        for decl in declarations {
            by_kind.entry(decl.kind).or_default().push(decl);
        }
        for decls in by_kind.values_mut() {
            decls.sort_by(|a, b| a.name.cmp(&b.name));
        }
        let of_kind =
            |kind: DeclarationKind| by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default();

        let mut template = Template {
            description: self.description.clone(),
            ..Template::default()
        };

        for decl in of_kind(DeclarationKind::Parameter) {
            if let Some(value) = supplied(values, decl) {
                let entry = self.parameter_entry(decl, value)?;
                template.parameters.insert(decl.name.to_string(), entry);
            }
        }
        for decl in of_kind(DeclarationKind::Mapping) {
            if let Some(value) = supplied(values, decl) {
                let value = transform_value(value, &self.reserved);
                template.mappings.insert(decl.name.to_string(), value);
            }
        }
        for decl in of_kind(DeclarationKind::Condition) {
            if let Some(value) = supplied(values, decl) {
                let value = transform_value(value, &self.reserved);
                template.conditions.insert(decl.name.to_string(), value);
            }
        }

        let resources = of_kind(DeclarationKind::Resource);
        let order = resource_order(resources)?;
        let by_name: FxHashMap<&str, &Declaration> =
            resources.iter().map(|d| (d.name.as_str(), *d)).collect();

        for name in &order {
            let Some(decl) = by_name.get(name.as_str()) else {
                continue;
            };
            let entry = self.resource_entry(decl, supplied(values, decl))?;
            trace!("resource {} -> {}", decl.name, entry.resource_type);
            template.resources.insert(decl.name.to_string(), entry);

            if template.transform.is_none() {
                template.transform = decl
                    .shape
                    .namespace
                    .as_deref()
                    .and_then(|ns| self.shapes.transform_for(ns))
                    .map(str::to_string);
            }
        }

        for decl in of_kind(DeclarationKind::Output) {
            if let Some(value) = supplied(values, decl) {
                let entry = self.output_entry(decl, value)?;
                template.outputs.insert(decl.name.to_string(), entry);
            }
        }

        debug!(
            "built template: {} resources, {} parameters, {} mappings, {} conditions, {} outputs",
            template.resources.len(),
            template.parameters.len(),
            template.mappings.len(),
            template.conditions.len(),
            template.outputs.len()
        );
        Ok(template)
    }

    fn resource_entry(
        &self,
        decl: &Declaration,
        value: Option<&Value>,
    ) -> Result<ResourceEntry, BuildError> {
        let resource_type = decl
            .shape
            .namespace
            .as_deref()
            .and_then(|ns| self.shapes.resource_type(ns, &decl.shape.name))
            .ok_or_else(|| BuildError::UnknownResourceType {
                name: decl.name.clone(),
                shape: decl.shape.to_string(),
                location: decl.location.clone(),
            })?;

        let properties = match value {
            None => None,
            Some(Value::Object(map)) => {
                Some(transform_object(map, &self.reserved)).filter(|props| !props.is_empty())
            }
            Some(_) => return Err(invalid(decl, "Properties", "an object")),
        };

        Ok(ResourceEntry {
            resource_type,
            properties,
        })
    }

    fn parameter_entry(&self, decl: &Declaration, value: &Value) -> Result<ParameterEntry, BuildError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid(decl, "Parameter", "an object"))?;

        let parameter_type =
            string_field(decl, map, "Type")?.unwrap_or_else(|| DEFAULT_PARAMETER_TYPE.to_string());
        let mut entry = ParameterEntry::new(parameter_type);

        entry.description = string_field(decl, map, "Description")?;
        entry.default = field(map, "Default").map(|v| transform_value(v, &self.reserved));
        entry.allowed_values = match field(map, "AllowedValues") {
            None => None,
            Some(Value::Array(items)) => Some(items.clone()),
            Some(_) => return Err(invalid(decl, "AllowedValues", "a list")),
        };
        entry.allowed_pattern = string_field(decl, map, "AllowedPattern")?;
        entry.constraint_description = string_field(decl, map, "ConstraintDescription")?;
        entry.min_length = bound_field(decl, map, "MinLength")?;
        entry.max_length = bound_field(decl, map, "MaxLength")?;
        entry.min_value = bound_field(decl, map, "MinValue")?;
        entry.max_value = bound_field(decl, map, "MaxValue")?;
        entry.no_echo = match field(map, "NoEcho") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err(invalid(decl, "NoEcho", "a boolean")),
        };
        Ok(entry)
    }

    fn output_entry(&self, decl: &Declaration, value: &Value) -> Result<OutputEntry, BuildError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid(decl, "Output", "an object"))?;

        let output_value = field(map, "Value").ok_or_else(|| invalid(decl, "Value", "set"))?;

        let export_name = match (field(map, "ExportName"), field(map, "Export")) {
            (Some(name), _) => Some(name),
            (None, Some(Value::Object(export))) => field(export, "Name"),
            (None, Some(_)) => return Err(invalid(decl, "Export", "an object with Name")),
            (None, None) => None,
        };

        Ok(OutputEntry {
            description: field(map, "Description").map(|v| transform_value(v, &self.reserved)),
            value: transform_value(output_value, &self.reserved),
            export: export_name.map(|name| ExportEntry {
                name: transform_value(name, &self.reserved),
            }),
        })
    }
}

fn supplied<'v>(values: &'v ValueMap, decl: &Declaration) -> Option<&'v Value> {
    values.get(decl.name.as_str()).filter(|v| !v.is_null())
}

/// A member that is present and not `null`.
fn field<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn string_field(
    decl: &Declaration,
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, BuildError> {
    match field(map, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(decl, key, "a string")),
    }
}

/// Numeric bounds; numeric strings are accepted as written.
fn bound_field(
    decl: &Declaration,
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<Value>, BuildError> {
    match field(map, key) {
        None => Ok(None),
        Some(v @ Value::Number(_)) => Ok(Some(v.clone())),
        Some(Value::String(s)) if s.parse::<f64>().is_ok() => Ok(Some(Value::String(s.clone()))),
        Some(_) => Err(invalid(decl, key, "a number")),
    }
}

fn invalid(decl: &Declaration, field: &'static str, expected: &'static str) -> BuildError {
    BuildError::InvalidField {
        name: decl.name.clone(),
        field,
        expected,
        location: decl.location.clone(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::base::Location;
    use crate::hir::ShapeId;
    use serde_json::json;
    use smol_str::SmolStr;

    fn decl(name: &str, kind: DeclarationKind, shape: (Option<&str>, &str), deps: &[&str]) -> Declaration {
        Declaration {
            name: SmolStr::new(name),
            kind,
            shape: ShapeId::new(shape.0, shape.1),
            location: Location::new("main.go", 3),
            dependencies: deps.iter().map(|d| SmolStr::new(d)).collect(),
            attr_refs: Vec::new(),
        }
    }

    fn resource(name: &str, ns: &str, shape: &str, deps: &[&str]) -> Declaration {
        decl(name, DeclarationKind::Resource, (Some(ns), shape), deps)
    }

    fn builder() -> TemplateBuilder {
        TemplateBuilder::new(&ScanConfig::builtin())
    }

    fn values(pairs: Value) -> ValueMap {
        serde_json::from_value(pairs).unwrap()
    }

    #[test]
    fn test_resources_in_dependency_order() {
        let decls = vec![
            resource("Function", "lambda", "Function", &["Role", "Bucket"]),
            resource("Role", "iam", "Role", &["Bucket"]),
            resource("Bucket", "s3", "Bucket", &[]),
        ];
        let template = builder()
            .build(&decls, &values(json!({"Bucket": {"BucketName": "b"}})))
            .unwrap();
        let names: Vec<_> = template.resource_names().collect();
        assert_eq!(names, vec!["Bucket", "Role", "Function"]);
        assert_eq!(template.resources["Role"].resource_type, "AWS::IAM::Role");
        assert_eq!(template.resources["Role"].properties, None);
        assert_eq!(
            template.resources["Bucket"].properties,
            Some(json!({"BucketName": "b"}).as_object().unwrap().clone())
        );
    }

    #[test]
    fn test_unknown_resource_type() {
        let registry = ShapeRegistry::default().with_namespace("s3", "AWS::S3");
        let config = ScanConfig::new(registry, ReservedNames::builtin());
        let decls = vec![resource("Queue", "sqs", "Queue", &[])];
        let err = TemplateBuilder::new(&config)
            .build(&decls, &ValueMap::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownResourceType { .. }));
        assert_eq!(err.to_string(), "main.go:3: Queue: unknown resource type sqs.Queue");
    }

    #[test]
    fn test_cycle_fails_build() {
        let decls = vec![
            resource("A", "s3", "Bucket", &["B"]),
            resource("B", "s3", "Bucket", &["A"]),
        ];
        let err = builder().build(&decls, &ValueMap::new()).unwrap_err();
        assert_eq!(err.cycle_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_parameter_transcription() {
        let decls = vec![
            decl("Env", DeclarationKind::Parameter, (None, "Parameter"), &[]),
            decl("Size", DeclarationKind::Parameter, (None, "Parameter"), &[]),
            decl("Missing", DeclarationKind::Parameter, (None, "Parameter"), &[]),
        ];
        let template = builder()
            .build(
                &decls,
                &values(json!({
                    "Env": {"Default": "dev", "AllowedValues": ["dev", "prod"], "Description": null},
                    "Size": {"Type": "Number", "MinValue": 1, "MaxValue": "10", "NoEcho": false}
                })),
            )
            .unwrap();
        let names: Vec<_> = template.parameters.keys().collect();
        assert_eq!(names, vec!["Env", "Size"]);
        let env = &template.parameters["Env"];
        assert_eq!(env.parameter_type, "String");
        assert_eq!(env.default, Some(json!("dev")));
        assert_eq!(env.description, None);
        let size = &template.parameters["Size"];
        assert_eq!(size.min_value, Some(json!(1)));
        assert_eq!(size.max_value, Some(json!("10")));
        assert_eq!(size.no_echo, Some(false));
    }

    #[test]
    fn test_invalid_parameter_field() {
        let decls = vec![decl("Env", DeclarationKind::Parameter, (None, "Parameter"), &[])];
        let err = builder()
            .build(&decls, &values(json!({"Env": {"NoEcho": "yes"}})))
            .unwrap_err();
        assert_eq!(err.to_string(), "main.go:3: Env: field NoEcho must be a boolean");
    }

    #[test]
    fn test_output_export_shapes() {
        let decls = vec![
            decl("A", DeclarationKind::Output, (None, "Output"), &[]),
            decl("B", DeclarationKind::Output, (None, "Output"), &[]),
        ];
        let template = builder()
            .build(
                &decls,
                &values(json!({
                    "A": {"Value": {"Ref": "X"}, "ExportName": {"Fn::Sub": "${AWS::StackName}-a"}},
                    "B": {"Value": "v", "Description": "b", "Export": {"Name": "b-export"}}
                })),
            )
            .unwrap();
        assert_eq!(
            template.outputs["A"].export,
            Some(ExportEntry {
                name: json!({"Fn::Sub": "${AWS::StackName}-a"})
            })
        );
        assert_eq!(template.outputs["B"].export.as_ref().unwrap().name, json!("b-export"));
        assert_eq!(template.outputs["B"].description, Some(json!("b")));
    }

    #[test]
    fn test_output_requires_value() {
        let decls = vec![decl("A", DeclarationKind::Output, (None, "Output"), &[])];
        let err = builder()
            .build(&decls, &values(json!({"A": {"Description": "d"}})))
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidField { field: "Value", .. }));
    }

    #[test]
    fn test_serverless_transform_marker() {
        let decls = vec![
            resource("Bucket", "s3", "Bucket", &[]),
            resource("Api", "serverless", "Function", &[]),
        ];
        let template = builder().build(&decls, &ValueMap::new()).unwrap();
        assert_eq!(template.transform.as_deref(), Some("AWS::Serverless-2016-10-31"));
        assert_eq!(template.resources["Api"].resource_type, "AWS::Serverless::Function");

        let plain = vec![resource("Bucket", "s3", "Bucket", &[])];
        assert_eq!(builder().build(&plain, &ValueMap::new()).unwrap().transform, None);
    }

    #[test]
    fn test_mappings_and_conditions_sorted() {
        let decls = vec![
            decl("Zones", DeclarationKind::Mapping, (None, "Mapping"), &[]),
            decl("Amis", DeclarationKind::Mapping, (None, "Mapping"), &[]),
            decl("IsProd", DeclarationKind::Condition, (None, "Equals"), &[]),
        ];
        let template = builder()
            .with_description("demo stack")
            .build(
                &decls,
                &values(json!({
                    "Zones": {"us-east-1": {"Zone": "a"}},
                    "Amis": {"us-east-1": {"Ami": "ami-1", "Old": null}},
                    "IsProd": {"Fn::Equals": [{"Ref": "Env"}, "prod"]}
                })),
            )
            .unwrap();
        let names: Vec<_> = template.mappings.keys().collect();
        assert_eq!(names, vec!["Amis", "Zones"]);
        assert_eq!(template.mappings["Amis"], json!({"us-east-1": {"Ami": "ami-1"}}));
        assert_eq!(
            template.conditions["IsProd"],
            json!({"Fn::Equals": [{"Ref": "Env"}, "prod"]})
        );
        assert_eq!(template.description.as_deref(), Some("demo stack"));
    }

    #[test]
    fn test_empty_properties_omitted() {
        let decls = vec![resource("Bucket", "s3", "Bucket", &[])];
        let template = builder()
            .build(&decls, &values(json!({"Bucket": {"Unset": null}})))
            .unwrap();
        assert_eq!(template.resources["Bucket"].properties, None);
    }
}
