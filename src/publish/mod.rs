//! Artifact publishing
//!
//! Job scripts live on the local filesystem and must be uploaded to object
//! storage before the job can reference them. The compiler only needs the
//! durable `s3://` location back.
//!
//! - [`http`] - uploads through an S3-compatible REST endpoint
//! - [`dry_run`] - computes the location without uploading

pub mod dry_run;
pub mod http;

pub use dry_run::DryRunPublisher;
pub use http::HttpArtifactPublisher;

use crate::error::PublishError;
use std::path::Path;

/// Uploads a local file and returns its durable location URI
#[allow(async_fn_in_trait)]
pub trait ArtifactPublisher {
    async fn publish(
        &self,
        local_path: &Path,
        bucket: &str,
        prefix: &str,
    ) -> Result<String, PublishError>;
}

/// Object key for a script: `<prefix>/<file name>`
pub fn object_key(prefix: &str, local_path: &Path) -> String {
    let file_name = local_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| local_path.to_string_lossy().into_owned());

    if prefix.is_empty() {
        return file_name;
    }
    if prefix.ends_with('/') {
        format!("{}{}", prefix, file_name)
    } else {
        format!("{}/{}", prefix, file_name)
    }
}

pub fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}
