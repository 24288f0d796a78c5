//! Glue job record

use super::{insert_opt, resource_document, string_array, BucketRef};
use serde_json::{json, Map as JsonMap, Value};

/// Per-job temp path inside a (possibly shared) bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempLocation {
    pub bucket: BucketRef,
    /// Path below the bucket, always starting with `/`
    pub path: String,
}

impl TempLocation {
    /// `[/<prefix>]/<job name>` inside `bucket`
    pub fn for_job(bucket: BucketRef, prefix: Option<&str>, job_name: &str) -> Self {
        let mut path = String::new();
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            path.push('/');
            path.push_str(prefix);
        }
        path.push('/');
        path.push_str(job_name);
        Self { bucket, path }
    }

    pub fn render(&self) -> Value {
        json!({
            "Fn::Join": ["", ["s3://", self.bucket.render(), self.path]]
        })
    }
}

/// Mutable job record used while compiling
#[derive(Debug, Clone, PartialEq)]
pub struct JobBuilder {
    name: String,
    script_location: String,
    glue_version: Option<String>,
    role: Option<String>,
    command_name: Option<String>,
    max_concurrent_runs: Option<u32>,
    worker_type: Option<String>,
    number_of_workers: Option<u32>,
    connections: Option<Vec<String>>,
    temp_location: Option<TempLocation>,
}

impl JobBuilder {
    /// `script_location` is the already published durable URI
    pub fn new(name: impl Into<String>, script_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script_location: script_location.into(),
            glue_version: None,
            role: None,
            command_name: None,
            max_concurrent_runs: None,
            worker_type: None,
            number_of_workers: None,
            connections: None,
            temp_location: None,
        }
    }

    pub fn set_glue_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.glue_version = Some(version.into());
        self
    }

    pub fn set_role(&mut self, role: impl Into<String>) -> &mut Self {
        self.role = Some(role.into());
        self
    }

    pub fn set_command_name(&mut self, command: impl Into<String>) -> &mut Self {
        self.command_name = Some(command.into());
        self
    }

    pub fn set_max_concurrent_runs(&mut self, runs: u32) -> &mut Self {
        self.max_concurrent_runs = Some(runs);
        self
    }

    pub fn set_worker_type(&mut self, worker_type: impl Into<String>) -> &mut Self {
        self.worker_type = Some(worker_type.into());
        self
    }

    pub fn set_number_of_workers(&mut self, workers: u32) -> &mut Self {
        self.number_of_workers = Some(workers);
        self
    }

    pub fn set_connections(&mut self, connections: Vec<String>) -> &mut Self {
        self.connections = Some(connections);
        self
    }

    pub fn set_temp_location(&mut self, location: TempLocation) -> &mut Self {
        self.temp_location = Some(location);
        self
    }

    pub fn build(self) -> Job {
        Job { inner: self }
    }
}

/// Frozen job record
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    inner: JobBuilder,
}

impl Job {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn script_location(&self) -> &str {
        &self.inner.script_location
    }

    pub fn temp_location(&self) -> Option<&TempLocation> {
        self.inner.temp_location.as_ref()
    }

    pub fn render(&self) -> Value {
        let job = &self.inner;

        let mut command = JsonMap::new();
        insert_opt(&mut command, "Name", job.command_name.clone());
        command.insert(
            "ScriptLocation".to_string(),
            Value::String(job.script_location.clone()),
        );

        let mut props = JsonMap::new();
        props.insert("Name".to_string(), Value::String(job.name.clone()));
        props.insert("Command".to_string(), Value::Object(command));
        insert_opt(&mut props, "GlueVersion", job.glue_version.clone());
        insert_opt(&mut props, "Role", job.role.clone());
        insert_opt(
            &mut props,
            "ExecutionProperty",
            job.max_concurrent_runs
                .map(|runs| json!({ "MaxConcurrentRuns": runs })),
        );
        insert_opt(&mut props, "WorkerType", job.worker_type.clone());
        insert_opt(&mut props, "NumberOfWorkers", job.number_of_workers);
        insert_opt(
            &mut props,
            "Connections",
            job.connections
                .as_deref()
                .map(|c| json!({ "Connections": string_array(c) })),
        );
        insert_opt(
            &mut props,
            "DefaultArguments",
            job.temp_location
                .as_ref()
                .map(|t| json!({ "--TempDir": t.render() })),
        );

        resource_document("AWS::Glue::Job", props)
    }
}
