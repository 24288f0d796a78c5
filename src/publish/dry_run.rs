//! Publisher that never uploads

use super::{object_key, s3_uri, ArtifactPublisher};
use crate::error::PublishError;
use std::path::Path;

/// Resolves script locations exactly like an upload would, but only checks
/// that the script exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPublisher;

impl ArtifactPublisher for DryRunPublisher {
    async fn publish(
        &self,
        local_path: &Path,
        bucket: &str,
        prefix: &str,
    ) -> Result<String, PublishError> {
        tokio::fs::metadata(local_path)
            .await
            .map_err(|source| PublishError::ReadScript {
                path: local_path.to_path_buf(),
                source,
            })?;

        let key = object_key(prefix, local_path);
        tracing::info!("Dry run: skipping upload of {}", local_path.display());
        Ok(s3_uri(bucket, &key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_missing_script() {
        let err = DryRunPublisher
            .publish(Path::new("does/not/exist.py"), "b", "glueJobs/")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::ReadScript { .. }));
    }

    #[tokio::test]
    async fn test_dry_run_returns_location() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("etl.py");
        std::fs::write(&script, "print('hi')").unwrap();

        let uri = DryRunPublisher
            .publish(&script, "my-bucket", "glueJobs/")
            .await
            .unwrap();
        assert_eq!(uri, "s3://my-bucket/glueJobs/etl.py");
    }
}
