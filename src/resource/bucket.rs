//! Shared temp bucket

use serde_json::{json, Value};

/// Logical id of the synthesized temp bucket
pub const TEMP_BUCKET_ID: &str = "GlueJobTempBucket";

/// Output exposing the provisioned temp bucket name
pub const TEMP_BUCKET_OUTPUT_ID: &str = "GlueJobTempBucketName";

/// Where a job keeps its working data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketRef {
    /// Externally managed bucket, referenced by its physical name
    Named(String),
    /// The bucket this compile synthesizes, referenced by logical id
    Synthesized,
}

impl BucketRef {
    pub fn render(&self) -> Value {
        match self {
            BucketRef::Named(name) => Value::String(name.clone()),
            BucketRef::Synthesized => json!({ "Ref": TEMP_BUCKET_ID }),
        }
    }
}

/// `AWS::S3::Bucket` named `<service>-<stage>-gluejobstemp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempBucket {
    bucket_name: String,
}

impl TempBucket {
    pub fn new(service: &str, stage: &str) -> Self {
        Self {
            bucket_name: format!("{}-{}-gluejobstemp", service, stage),
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn render(&self) -> Value {
        json!({
            "Type": "AWS::S3::Bucket",
            "Properties": {
                "BucketName": self.bucket_name,
            }
        })
    }

    /// Output definition resolving to the provisioned bucket name
    pub fn render_output(&self) -> Value {
        json!({ "Value": { "Ref": TEMP_BUCKET_ID } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_bucket_name() {
        let bucket = TempBucket::new("orders", "prod");
        assert_eq!(bucket.bucket_name(), "orders-prod-gluejobstemp");
        assert_eq!(
            bucket.render()["Properties"]["BucketName"],
            "orders-prod-gluejobstemp"
        );
        assert_eq!(bucket.render_output()["Value"]["Ref"], TEMP_BUCKET_ID);
    }

    #[test]
    fn test_bucket_ref_render() {
        assert_eq!(BucketRef::Named("ext".into()).render(), json!("ext"));
        assert_eq!(
            BucketRef::Synthesized.render(),
            json!({ "Ref": "GlueJobTempBucket" })
        );
    }
}
