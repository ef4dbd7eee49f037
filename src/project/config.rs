//! Injected configuration tables.
//!
//! Discovery and building are driven by two externally maintained tables:
//!
//! - [`ShapeRegistry`] - which shape namespaces declare resources, and the
//!   target type prefix each maps to
//! - [`ReservedNames`] - identifiers that are never dependencies (literals,
//!   intrinsic-function shapes, pseudo-parameters)
//!
//! Both are plain immutable values shared through [`ScanConfig`]; nothing is
//! process-global, so parallel scans and tests can use different tables.
//! Tables load from JSON or YAML; `builtin()` provides AWS-flavoured defaults.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::base::constants::PROPERTY_TYPE_SEPARATOR;

/// Errors raised while loading configuration tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

// ============================================================================
// SHAPE REGISTRY
// ============================================================================

/// Maps a namespace prefix family to a document-level transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRule {
    pub namespace_prefix: String,
    pub transform: String,
}

/// Namespace → target type prefix table.
///
/// `s3.Bucket` resolves to `AWS::S3::Bucket` when `s3` maps to `AWS::S3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeRegistry {
    pub namespaces: IndexMap<String, String>,
    pub property_separator: char,
    pub transforms: Vec<TransformRule>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self {
            namespaces: IndexMap::new(),
            property_separator: PROPERTY_TYPE_SEPARATOR,
            transforms: Vec::new(),
        }
    }
}

const BUILTIN_NAMESPACES: &[(&str, &str)] = &[
    ("apigateway", "AWS::ApiGateway"),
    ("apigatewayv2", "AWS::ApiGatewayV2"),
    ("appsync", "AWS::AppSync"),
    ("autoscaling", "AWS::AutoScaling"),
    ("certificatemanager", "AWS::CertificateManager"),
    ("cloudformation", "AWS::CloudFormation"),
    ("cloudfront", "AWS::CloudFront"),
    ("cloudtrail", "AWS::CloudTrail"),
    ("cloudwatch", "AWS::CloudWatch"),
    ("codebuild", "AWS::CodeBuild"),
    ("codepipeline", "AWS::CodePipeline"),
    ("cognito", "AWS::Cognito"),
    ("dynamodb", "AWS::DynamoDB"),
    ("ec2", "AWS::EC2"),
    ("ecr", "AWS::ECR"),
    ("ecs", "AWS::ECS"),
    ("efs", "AWS::EFS"),
    ("eks", "AWS::EKS"),
    ("elasticache", "AWS::ElastiCache"),
    ("elasticloadbalancingv2", "AWS::ElasticLoadBalancingV2"),
    ("events", "AWS::Events"),
    ("iam", "AWS::IAM"),
    ("kinesis", "AWS::Kinesis"),
    ("kms", "AWS::KMS"),
    ("lambda", "AWS::Lambda"),
    ("logs", "AWS::Logs"),
    ("rds", "AWS::RDS"),
    ("route53", "AWS::Route53"),
    ("s3", "AWS::S3"),
    ("secretsmanager", "AWS::SecretsManager"),
    ("serverless", "AWS::Serverless"),
    ("sns", "AWS::SNS"),
    ("sqs", "AWS::SQS"),
    ("ssm", "AWS::SSM"),
    ("stepfunctions", "AWS::StepFunctions"),
    ("wafv2", "AWS::WAFv2"),
];

impl ShapeRegistry {
    /// Built-in AWS namespace table with the serverless transform rule.
    pub fn builtin() -> Self {
        Self {
            namespaces: BUILTIN_NAMESPACES
                .iter()
                .map(|(ns, prefix)| (ns.to_string(), prefix.to_string()))
                .collect(),
            property_separator: PROPERTY_TYPE_SEPARATOR,
            transforms: vec![TransformRule {
                namespace_prefix: "serverless".to_string(),
                transform: "AWS::Serverless-2016-10-31".to_string(),
            }],
        }
    }

    /// Register (or replace) a namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.namespaces.insert(namespace.into(), prefix.into());
        self
    }

    pub fn with_transform(
        mut self,
        namespace_prefix: impl Into<String>,
        transform: impl Into<String>,
    ) -> Self {
        self.transforms.push(TransformRule {
            namespace_prefix: namespace_prefix.into(),
            transform: transform.into(),
        });
        self
    }

    pub fn is_resource_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Nested property-type shapes carry the separator in their local name.
    pub fn is_property_type(&self, name: &str) -> bool {
        name.contains(self.property_separator)
    }

    /// A registered namespace and a non-property-type name.
    pub fn is_resource_shape(&self, namespace: Option<&str>, name: &str) -> bool {
        namespace.is_some_and(|ns| self.is_resource_namespace(ns)) && !self.is_property_type(name)
    }

    /// Target type string for a shape, e.g. `AWS::S3::Bucket`.
    pub fn resource_type(&self, namespace: &str, name: &str) -> Option<String> {
        self.namespaces
            .get(namespace)
            .map(|prefix| format!("{prefix}::{name}"))
    }

    /// Transform required by resources in `namespace`, if any.
    pub fn transform_for(&self, namespace: &str) -> Option<&str> {
        self.transforms
            .iter()
            .find(|rule| namespace.starts_with(&rule.namespace_prefix))
            .map(|rule| rule.transform.as_str())
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_table(path)
    }
}

// ============================================================================
// RESERVED NAMES
// ============================================================================

/// Identifiers excluded from dependency classification, plus the intrinsic
/// vocabulary used by value extraction and serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedNames {
    /// Literal, keyword and helper-type names
    pub identifiers: BTreeSet<String>,
    /// Pseudo-parameter constant → target pseudo-parameter
    pub pseudo_parameters: IndexMap<String, String>,
    /// Intrinsic-function shape → intrinsic key
    pub intrinsic_shapes: IndexMap<String, String>,
    /// Keys that mark an already-built intrinsic map
    pub intrinsic_keys: BTreeSet<String>,
    /// Prefix shared by intrinsic-function keys
    pub intrinsic_key_prefix: String,
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self {
            identifiers: BTreeSet::new(),
            pseudo_parameters: IndexMap::new(),
            intrinsic_shapes: IndexMap::new(),
            intrinsic_keys: BTreeSet::new(),
            intrinsic_key_prefix: "Fn::".to_string(),
        }
    }
}

const BUILTIN_IDENTIFIERS: &[&str] = &[
    "true",
    "false",
    "nil",
    "iota",
    "True",
    "False",
    "Nil",
    "Parameter",
    "Output",
    "Mapping",
    "Condition",
    "String",
    "Number",
    "List",
    "CommaDelimitedList",
];

const BUILTIN_PSEUDO_PARAMETERS: &[(&str, &str)] = &[
    ("AWS_ACCOUNT_ID", "AWS::AccountId"),
    ("AWS_NOTIFICATION_ARNS", "AWS::NotificationARNs"),
    ("AWS_NO_VALUE", "AWS::NoValue"),
    ("AWS_PARTITION", "AWS::Partition"),
    ("AWS_REGION", "AWS::Region"),
    ("AWS_STACK_ID", "AWS::StackId"),
    ("AWS_STACK_NAME", "AWS::StackName"),
    ("AWS_URL_SUFFIX", "AWS::URLSuffix"),
];

const BUILTIN_INTRINSIC_SHAPES: &[(&str, &str)] = &[
    ("And", "Fn::And"),
    ("Base64", "Fn::Base64"),
    ("Cidr", "Fn::Cidr"),
    ("Condition", "Condition"),
    ("Equals", "Fn::Equals"),
    ("FindInMap", "Fn::FindInMap"),
    ("GetAZs", "Fn::GetAZs"),
    ("If", "Fn::If"),
    ("ImportValue", "Fn::ImportValue"),
    ("Join", "Fn::Join"),
    ("Not", "Fn::Not"),
    ("Or", "Fn::Or"),
    ("Select", "Fn::Select"),
    ("Split", "Fn::Split"),
    ("Sub", "Fn::Sub"),
];

impl ReservedNames {
    pub fn builtin() -> Self {
        Self {
            identifiers: BUILTIN_IDENTIFIERS.iter().map(|s| s.to_string()).collect(),
            pseudo_parameters: pair_table(BUILTIN_PSEUDO_PARAMETERS),
            intrinsic_shapes: pair_table(BUILTIN_INTRINSIC_SHAPES),
            intrinsic_keys: ["Ref", "Condition"].iter().map(|s| s.to_string()).collect(),
            intrinsic_key_prefix: "Fn::".to_string(),
        }
    }

    /// Excluded from dependency classification.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.identifiers.contains(name)
            || self.pseudo_parameters.contains_key(name)
            || self.intrinsic_shapes.contains_key(name)
    }

    pub fn pseudo_parameter(&self, name: &str) -> Option<&str> {
        self.pseudo_parameters.get(name).map(String::as_str)
    }

    pub fn intrinsic_for_shape(&self, name: &str) -> Option<&str> {
        self.intrinsic_shapes.get(name).map(String::as_str)
    }

    /// A map key that marks an intrinsic-function representation.
    pub fn is_intrinsic_key(&self, key: &str) -> bool {
        self.intrinsic_keys.contains(key)
            || (!self.intrinsic_key_prefix.is_empty() && key.starts_with(&self.intrinsic_key_prefix))
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_table(path)
    }
}

fn pair_table(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn load_table<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

// ============================================================================
// SCAN CONFIG
// ============================================================================

/// Immutable configuration shared by every stage of one pipeline run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub shapes: Arc<ShapeRegistry>,
    pub reserved: Arc<ReservedNames>,
}

impl ScanConfig {
    pub fn new(shapes: ShapeRegistry, reserved: ReservedNames) -> Self {
        Self {
            shapes: Arc::new(shapes),
            reserved: Arc::new(reserved),
        }
    }

    pub fn builtin() -> Self {
        Self::new(ShapeRegistry::builtin(), ReservedNames::builtin())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
