//! Configuration compiler
//!
//! Turns the `custom.Glue` section into frozen resource records:
//! - connections, built straight from configuration
//! - jobs, after their scripts are published to the deploy bucket
//! - triggers, from a best-effort optional section
//! - the shared temp bucket, synthesized once when any job needs it and no
//!   external bucket is configured
//!
//! Nothing is written to a sink until every record compiled and every
//! logical id is known to be unique, so a failed compile emits nothing.

use crate::config::{ConnectionEntry, GlueConfig, JobEntry, TriggerEntry, TriggerSection};
use crate::error::{CompileError, EntryKind, Result};
use crate::naming::{logical_id, split_list};
use crate::publish::ArtifactPublisher;
use crate::resource::{
    BucketRef, Connection, ConnectionBuilder, Job, JobBuilder, Resource, TempBucket,
    TempLocation, Trigger, TriggerAction, TriggerBuilder, TEMP_BUCKET_ID, TEMP_BUCKET_OUTPUT_ID,
};
use crate::template::TemplateSink;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Values the compiler needs from outside the `custom.Glue` section
#[derive(Debug, Clone)]
pub struct CompileContext {
    pub service: String,
    pub stage: String,
    pub account_id: Option<String>,
    /// Directory job script paths are relative to
    pub script_root: PathBuf,
}

/// Whether any compiled job asked for a temp working location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TempBucketNeed(bool);

impl TempBucketNeed {
    pub fn needed() -> Self {
        Self(true)
    }

    pub fn merge(self, other: Self) -> Self {
        Self(self.0 || other.0)
    }

    pub fn is_needed(self) -> bool {
        self.0
    }
}

/// Compiled resources in emission order, each with its logical id
#[derive(Debug, Clone, Default)]
pub struct CompiledTemplate {
    pub resources: Vec<(String, Resource)>,
    pub outputs: Vec<(String, Value)>,
}

impl CompiledTemplate {
    /// Logical ids in emission order
    pub fn logical_ids(&self) -> Vec<&str> {
        self.resources.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|(id, _)| id == logical_id)
            .map(|(_, r)| r)
    }

    /// Render every record into the sink
    pub fn write_to<S: TemplateSink>(&self, sink: &mut S) {
        for (id, resource) in &self.resources {
            sink.set_resource(id, resource.render());
        }
        for (id, output) in &self.outputs {
            sink.set_output(id, output.clone());
        }
    }
}

/// Compile the whole section. Script uploads are the only I/O.
pub async fn compile<P: ArtifactPublisher>(
    config: &GlueConfig,
    ctx: &CompileContext,
    publisher: &P,
) -> Result<CompiledTemplate> {
    let connections = compile_connections(config, ctx.account_id.as_deref())?;
    let (jobs, need) = compile_jobs(config, ctx, publisher).await?;
    let triggers = compile_triggers(TriggerSection::from_config(config.triggers.as_ref()));

    let temp_bucket = (need.is_needed() && config.external_temp_bucket().is_none())
        .then(|| TempBucket::new(&ctx.service, &ctx.stage));

    tracing::info!("Building GlueJobs CloudFormation");
    assemble(connections, jobs, triggers, temp_bucket)
}

/// Build connection records in declaration order
pub fn compile_connections(
    config: &GlueConfig,
    account_id: Option<&str>,
) -> Result<Vec<Connection>> {
    if config.connections.is_empty() {
        return Ok(Vec::new());
    }
    tracing::debug!("Get glue connections config: {} entries", config.connections.len());

    let account_id = account_id.ok_or_else(|| CompileError::ConfigurationMissing {
        section: "custom.accountId".to_string(),
    })?;

    config
        .connections
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let entry = item
                .connection
                .as_ref()
                .ok_or_else(|| invalid(EntryKind::Connection, index, "connection"))?;
            build_connection(index, entry, account_id)
        })
        .collect()
}

fn build_connection(index: usize, entry: &ConnectionEntry, account_id: &str) -> Result<Connection> {
    let required = |value: &Option<String>, field| {
        value
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid(EntryKind::Connection, index, field))
    };

    let name = required(&entry.name, "name")?;
    let mut builder = ConnectionBuilder::new(&name, account_id);
    builder
        .set_type(required(&entry.connection_type, "connectionType")?)
        .set_uri(required(&entry.db_uri, "dbUri")?)
        .set_username(required(&entry.db_username, "dbUsername")?)
        .set_password(required(&entry.db_password, "dbPassword")?);

    if let Some(description) = &entry.description {
        builder.set_description(description);
    }
    if let Some(criteria) = &entry.match_criteria {
        builder.set_match_criteria(split_list(criteria));
    }
    if let Some(groups) = &entry.security_group_id_list {
        builder.set_security_groups(split_list(groups));
    }
    if let Some(subnet) = &entry.subnet_id {
        builder.set_subnet(subnet);
    }

    tracing::debug!("Compiled connection {}", name);
    Ok(builder.build())
}

/// Publish every script, then build job records in declaration order.
///
/// All entries are validated, and their logical ids checked for clashes,
/// before the first upload. Uploads run up to `publishConcurrency` at a
/// time; the first failure aborts the compile.
pub async fn compile_jobs<P: ArtifactPublisher>(
    config: &GlueConfig,
    ctx: &CompileContext,
    publisher: &P,
) -> Result<(Vec<Job>, TempBucketNeed)> {
    let entries = config
        .jobs
        .iter()
        .enumerate()
        .map(|(index, item)| validate_job(index, item.job.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut sources = HashMap::new();
    for (name, _, _) in &entries {
        let id = logical_id(name)?;
        claim(&mut sources, &id, format!("{} '{}'", EntryKind::Job, name))?;
    }

    if entries.is_empty() {
        return Ok((Vec::new(), TempBucketNeed::default()));
    }

    let bucket = config
        .deploy_bucket()
        .ok_or_else(|| CompileError::ConfigurationMissing {
            section: "custom.Glue.bucketDeploy".to_string(),
        })?;
    let prefix = config.script_prefix();

    let locations: Vec<String> = stream::iter(entries.iter())
        .map(|(name, script, _)| async move {
            let path = ctx.script_root.join(script);
            publisher
                .publish(&path, bucket, prefix)
                .await
                .map_err(|source| CompileError::ArtifactUpload {
                    job: name.to_string(),
                    source,
                })
        })
        .buffered(config.publish_concurrency())
        .try_collect()
        .await?;

    let (jobs, need) = entries.into_iter().zip(locations).fold(
        (Vec::new(), TempBucketNeed::default()),
        |(mut jobs, need), ((name, _, entry), location)| {
            let (job, job_need) = build_job(name, entry, location, config);
            jobs.push(job);
            (jobs, need.merge(job_need))
        },
    );

    Ok((jobs, need))
}

fn validate_job(index: usize, entry: Option<&JobEntry>) -> Result<(&str, &str, &JobEntry)> {
    let entry = entry.ok_or_else(|| invalid(EntryKind::Job, index, "job"))?;
    let name = entry
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| invalid(EntryKind::Job, index, "name"))?;
    let script = entry
        .script
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(EntryKind::Job, index, "script"))?;
    Ok((name, script, entry))
}

/// Build one job from its published script location
pub fn build_job(
    name: &str,
    entry: &JobEntry,
    script_location: String,
    config: &GlueConfig,
) -> (Job, TempBucketNeed) {
    let mut builder = JobBuilder::new(name, script_location);
    let mut need = TempBucketNeed::default();

    if let Some(version) = &entry.glue_version {
        builder.set_glue_version(version);
    }
    if let Some(role) = &entry.role {
        builder.set_role(role);
    }
    if let Some(job_type) = &entry.job_type {
        builder.set_command_name(command_name(job_type));
    }
    if let Some(runs) = entry.max_concurrent_runs {
        builder.set_max_concurrent_runs(runs);
    }
    if let Some(worker_type) = &entry.worker_type {
        builder.set_worker_type(worker_type);
    }
    if let Some(workers) = entry.number_of_workers {
        builder.set_number_of_workers(workers);
    }
    if let Some(connections) = &entry.connections {
        builder.set_connections(split_list(connections));
    }
    if entry.temp_dir {
        need = TempBucketNeed::needed();
        let bucket = match config.external_temp_bucket() {
            Some(external) => BucketRef::Named(external.to_string()),
            None => BucketRef::Synthesized,
        };
        builder.set_temp_location(TempLocation::for_job(
            bucket,
            config.temp_dir_s3_prefix.as_deref(),
            name,
        ));
    }

    tracing::debug!("Compiled job {}", name);
    (builder.build(), need)
}

/// Glue command name for a configured job type
pub fn command_name(job_type: &str) -> &str {
    match job_type {
        "spark" => "glueetl",
        "pythonshell" => "pythonshell",
        "streaming" => "gluestreaming",
        other => other,
    }
}

/// Build trigger records. An absent or malformed section yields no triggers.
pub fn compile_triggers(section: TriggerSection) -> Vec<Trigger> {
    match section {
        TriggerSection::Present(entries) => entries.into_iter().map(build_trigger).collect(),
        TriggerSection::Absent => {
            tracing::warn!("No Trigger configuration, compiling without triggers");
            Vec::new()
        }
        TriggerSection::Malformed(reason) => {
            tracing::warn!(
                "Ignoring malformed Trigger configuration, compiling without triggers: {}",
                reason
            );
            Vec::new()
        }
    }
}

fn build_trigger(entry: TriggerEntry) -> Trigger {
    let actions = entry
        .jobs
        .into_iter()
        .map(|item| {
            let mut action = TriggerAction::new(item.job.name);
            if let Some(args) = item.job.args {
                action.set_arguments(args);
            }
            if let Some(timeout) = item.job.timeout {
                action.set_timeout(timeout);
            }
            action
        })
        .collect();

    let mut builder = TriggerBuilder::new(entry.name, entry.schedule);
    builder.set_actions(actions);
    builder.build()
}

/// Assign logical ids in emission order and reject collisions
fn assemble(
    connections: Vec<Connection>,
    jobs: Vec<Job>,
    triggers: Vec<Trigger>,
    temp_bucket: Option<TempBucket>,
) -> Result<CompiledTemplate> {
    let mut compiled = CompiledTemplate::default();
    let mut sources: HashMap<String, String> = HashMap::new();

    let records = connections
        .into_iter()
        .map(Resource::Connection)
        .chain(jobs.into_iter().map(Resource::Job))
        .chain(triggers.into_iter().map(Resource::Trigger));

    for resource in records {
        let id = logical_id(resource.name())?;
        claim(&mut sources, &id, describe(&resource))?;
        compiled.resources.push((id, resource));
    }

    if let Some(bucket) = temp_bucket {
        tracing::info!("Building S3 Temp Bucket CloudFormation");
        claim(&mut sources, TEMP_BUCKET_ID, "synthesized temp bucket".to_string())?;
        compiled
            .outputs
            .push((TEMP_BUCKET_OUTPUT_ID.to_string(), bucket.render_output()));
        compiled
            .resources
            .push((TEMP_BUCKET_ID.to_string(), Resource::TempBucket(bucket)));
    }

    Ok(compiled)
}

fn claim(sources: &mut HashMap<String, String>, id: &str, source: String) -> Result<()> {
    if let Some(first) = sources.get(id) {
        return Err(CompileError::IdentifierCollision {
            id: id.to_string(),
            first: first.clone(),
            second: source,
        });
    }
    sources.insert(id.to_string(), source);
    Ok(())
}

fn describe(resource: &Resource) -> String {
    format!("{} '{}'", resource.kind(), resource.name())
}

fn invalid(kind: EntryKind, index: usize, field: &'static str) -> CompileError {
    CompileError::ConfigurationInvalid { kind, index, field }
}
