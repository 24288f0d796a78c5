//! Template sink
//!
//! The compiler writes rendered resources and outputs through [`TemplateSink`].
//! [`CloudFormationTemplate`] is the sink the binary uses: either a fresh
//! template or one loaded from disk that the compiled resources are merged into.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};
use std::path::Path;

/// Destination for compiled resources. Last write wins on a key collision.
pub trait TemplateSink {
    fn set_resource(&mut self, logical_id: &str, definition: Value);
    fn set_output(&mut self, output_id: &str, definition: Value);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudFormationTemplate {
    #[serde(rename = "Resources", default)]
    pub resources: JsonMap<String, Value>,
    #[serde(rename = "Outputs", default, skip_serializing_if = "JsonMap::is_empty")]
    pub outputs: JsonMap<String, Value>,
    /// Everything else in the template, passed through untouched
    #[serde(flatten)]
    pub other: JsonMap<String, Value>,
}

impl CloudFormationTemplate {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse template {}", path.display()))
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize template")
    }
}

impl TemplateSink for CloudFormationTemplate {
    fn set_resource(&mut self, logical_id: &str, definition: Value) {
        if self
            .resources
            .insert(logical_id.to_string(), definition)
            .is_some()
        {
            tracing::warn!("Replacing existing template resource {}", logical_id);
        }
    }

    fn set_output(&mut self, output_id: &str, definition: Value) {
        if self
            .outputs
            .insert(output_id.to_string(), definition)
            .is_some()
        {
            tracing::warn!("Replacing existing template output {}", output_id);
        }
    }
}
