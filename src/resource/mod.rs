//! Resource records
//!
//! Each provisionable unit is built in two phases: a mutable `*Builder`
//! accumulates attributes while the compiler walks the configuration, then
//! `build()` freezes it into a value that can only be rendered.
//!
//! # Module Structure
//!
//! - [`job`] - `AWS::Glue::Job`
//! - [`connection`] - `AWS::Glue::Connection`
//! - [`trigger`] - `AWS::Glue::Trigger` and its actions
//! - [`bucket`] - the shared temp bucket synthesized for job working data
//!
//! Rendering omits every optional attribute that was never set, so the
//! provisioning engine never receives empty fields.

pub mod bucket;
pub mod connection;
pub mod job;
pub mod trigger;

pub use bucket::{BucketRef, TempBucket, TEMP_BUCKET_ID, TEMP_BUCKET_OUTPUT_ID};
pub use connection::{Connection, ConnectionBuilder};
pub use job::{Job, JobBuilder, TempLocation};
pub use trigger::{Trigger, TriggerAction, TriggerBuilder};

use serde_json::{Map as JsonMap, Value};

/// A frozen record ready to be written into the template
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Connection(Connection),
    Job(Job),
    Trigger(Trigger),
    TempBucket(TempBucket),
}

impl Resource {
    /// Name the record was declared under
    pub fn name(&self) -> &str {
        match self {
            Resource::Connection(c) => c.name(),
            Resource::Job(j) => j.name(),
            Resource::Trigger(t) => t.name(),
            Resource::TempBucket(b) => b.bucket_name(),
        }
    }

    /// Short kind label used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Connection(_) => "connection",
            Resource::Job(_) => "job",
            Resource::Trigger(_) => "trigger",
            Resource::TempBucket(_) => "temp bucket",
        }
    }

    pub fn render(&self) -> Value {
        match self {
            Resource::Connection(c) => c.render(),
            Resource::Job(j) => j.render(),
            Resource::Trigger(t) => t.render(),
            Resource::TempBucket(b) => b.render(),
        }
    }
}

/// Insert `key` only when the value is present
pub(crate) fn insert_opt<V: Into<Value>>(map: &mut JsonMap<String, Value>, key: &str, value: Option<V>) {
    if let Some(v) = value {
        map.insert(key.to_string(), v.into());
    }
}

/// Wrap properties into a `{"Type": .., "Properties": ..}` document
pub(crate) fn resource_document(resource_type: &str, properties: JsonMap<String, Value>) -> Value {
    let mut doc = JsonMap::new();
    doc.insert("Type".to_string(), Value::String(resource_type.to_string()));
    doc.insert("Properties".to_string(), Value::Object(properties));
    Value::Object(doc)
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}
