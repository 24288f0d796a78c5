//! Configuration
//!
//! Service configuration as written by the user (serverless-style YAML).
//! Only the parts the compiler consumes are modelled; everything else in the
//! file is ignored.

use crate::error::CompileError;
use crate::naming::logical_id;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Stage used when neither the file nor the command line names one
pub const DEFAULT_STAGE: &str = "dev";

/// Key prefix for uploaded scripts when `s3Prefix` is not configured
pub const DEFAULT_SCRIPT_PREFIX: &str = "glueJobs/";

/// Root of the service configuration file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub custom: CustomConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomConfig {
    /// Owning account of the Glue data catalog
    #[serde(rename = "accountId", default, deserialize_with = "opt_scalar")]
    pub account_id: Option<String>,
    #[serde(rename = "Glue", default)]
    pub glue: Option<GlueConfig>,
}

/// The `custom.Glue` section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlueConfig {
    #[serde(default)]
    pub bucket_deploy: Option<String>,
    #[serde(default)]
    pub s3_prefix: Option<String>,
    #[serde(default)]
    pub temp_dir_bucket: Option<String>,
    #[serde(default)]
    pub temp_dir_s3_prefix: Option<String>,
    /// Maximum number of script uploads in flight (1 = sequential)
    #[serde(default)]
    pub publish_concurrency: Option<usize>,
    #[serde(default)]
    pub jobs: Vec<JobItem>,
    #[serde(default)]
    pub connections: Vec<ConnectionItem>,
    /// Kept untyped so a malformed section degrades instead of failing the load
    #[serde(default)]
    pub triggers: Option<Value>,
}

impl GlueConfig {
    /// Deploy bucket for job scripts; an empty value counts as unset
    pub fn deploy_bucket(&self) -> Option<&str> {
        self.bucket_deploy.as_deref().filter(|b| !b.is_empty())
    }

    /// Externally managed temp bucket; an empty value counts as unset
    pub fn external_temp_bucket(&self) -> Option<&str> {
        self.temp_dir_bucket.as_deref().filter(|b| !b.is_empty())
    }

    pub fn script_prefix(&self) -> &str {
        self.s3_prefix.as_deref().unwrap_or(DEFAULT_SCRIPT_PREFIX)
    }

    pub fn publish_concurrency(&self) -> usize {
        self.publish_concurrency.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct JobItem {
    #[serde(default)]
    pub job: Option<JobEntry>,
}

/// One `job:` entry
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JobEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(rename = "glueVersion", default, deserialize_with = "opt_scalar")]
    pub glue_version: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    #[serde(rename = "MaxConcurrentRuns", default)]
    pub max_concurrent_runs: Option<u32>,
    #[serde(rename = "WorkerType", default)]
    pub worker_type: Option<String>,
    #[serde(rename = "NumberOfWorkers", default)]
    pub number_of_workers: Option<u32>,
    /// Comma-joined connection names
    #[serde(rename = "Connections", default)]
    pub connections: Option<String>,
    #[serde(rename = "tempDir", default, deserialize_with = "flag")]
    pub temp_dir: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConnectionItem {
    #[serde(default)]
    pub connection: Option<ConnectionEntry>,
}

/// One `connection:` entry
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConnectionEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "connectionType", default)]
    pub connection_type: Option<String>,
    #[serde(rename = "dbUri", default)]
    pub db_uri: Option<String>,
    #[serde(rename = "dbUsername", default)]
    pub db_username: Option<String>,
    #[serde(rename = "dbPassword", default, deserialize_with = "opt_scalar")]
    pub db_password: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-joined
    #[serde(rename = "MatchCriteria", default)]
    pub match_criteria: Option<String>,
    /// Comma-joined
    #[serde(rename = "securityGroupIdList", default)]
    pub security_group_id_list: Option<String>,
    #[serde(rename = "subnetId", default)]
    pub subnet_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerItem {
    pub trigger: TriggerEntry,
}

/// One `trigger:` entry
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerEntry {
    pub name: String,
    #[serde(default)]
    pub schedule: Option<String>,
    pub jobs: Vec<TriggerJobItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerJobItem {
    pub job: TriggerJobEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerJobEntry {
    pub name: String,
    #[serde(default, deserialize_with = "opt_scalar_map")]
    pub args: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub timeout: Option<u32>,
}

/// Interpretation of the optional `triggers` section
#[derive(Debug, Clone)]
pub enum TriggerSection {
    Present(Vec<TriggerEntry>),
    Absent,
    Malformed(String),
}

impl TriggerSection {
    pub fn from_config(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => TriggerSection::Absent,
            Some(value) => match serde_yaml::from_value::<Vec<TriggerItem>>(value.clone()) {
                Ok(items) => {
                    let entries: Vec<TriggerEntry> =
                        items.into_iter().map(|i| i.trigger).collect();
                    match entries.iter().find(|t| logical_id(&t.name).is_err()) {
                        Some(bad) => TriggerSection::Malformed(format!(
                            "trigger name '{}' has no letters or digits",
                            bad.name
                        )),
                        None => TriggerSection::Present(entries),
                    }
                }
                Err(e) => TriggerSection::Malformed(e.to_string()),
            },
        }
    }
}

impl ServiceConfig {
    /// Load and parse a YAML service configuration
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// The `custom.Glue` section
    pub fn glue(&self) -> Result<&GlueConfig, CompileError> {
        self.custom
            .glue
            .as_ref()
            .ok_or_else(|| CompileError::ConfigurationMissing {
                section: "custom.Glue".to_string(),
            })
    }

    /// Get effective stage (CLI > config > default)
    pub fn effective_stage(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.provider.stage.clone())
            .unwrap_or_else(|| DEFAULT_STAGE.to_string())
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept strings, numbers and booleans (`glueVersion: 1.0`) as strings
fn opt_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => scalar_to_string(v)
            .map(Some)
            .ok_or_else(|| <D::Error as serde::de::Error>::custom("expected a scalar value")),
    }
}

/// Read a truthy flag: booleans, `"true"`/`"yes"`/`"1"` strings and numbers
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(Value::String(s)) => Ok(!matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "no" | "off" | "0"
        )),
        Some(_) => Err(<D::Error as serde::de::Error>::custom(
            "expected a boolean flag",
        )),
    }
}

fn opt_scalar_map<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    let Some(map) = value else {
        return Ok(None);
    };
    map.into_iter()
        .map(|(k, v)| {
            scalar_to_string(v)
                .map(|s| (k.clone(), s))
                .ok_or_else(|| {
                    <D::Error as serde::de::Error>::custom(format!("argument '{}' is not a scalar", k))
                })
        })
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()
        .map(Some)
}
