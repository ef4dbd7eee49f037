//! The structured template document and its encodings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::base::constants::TEMPLATE_FORMAT_VERSION;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A provisioning template. Section order in the encodings follows field
/// order here; map entries keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Transform", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,

    #[serde(rename = "Parameters", default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterEntry>,

    #[serde(rename = "Mappings", default, skip_serializing_if = "IndexMap::is_empty")]
    pub mappings: IndexMap<String, Value>,

    #[serde(rename = "Conditions", default, skip_serializing_if = "IndexMap::is_empty")]
    pub conditions: IndexMap<String, Value>,

    #[serde(rename = "Resources", default)]
    pub resources: IndexMap<String, ResourceEntry>,

    #[serde(rename = "Outputs", default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, OutputEntry>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: None,
            transform: None,
            parameters: IndexMap::new(),
            mappings: IndexMap::new(),
            conditions: IndexMap::new(),
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }
}

impl Template {
    pub fn to_json(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, EncodeError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, EncodeError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml(input: &str) -> Result<Self, EncodeError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Resource names in document order.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterEntry {
    #[serde(rename = "Type")]
    pub parameter_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_echo: Option<bool>,
}

impl ParameterEntry {
    pub fn new(parameter_type: impl Into<String>) -> Self {
        Self {
            parameter_type: parameter_type.into(),
            description: None,
            default: None,
            allowed_values: None,
            allowed_pattern: None,
            constraint_description: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            no_echo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportEntry {
    pub name: Value,
}
