//! HTTP upload to an S3-compatible endpoint
//!
//! Objects are written with a path-style `PUT <endpoint>/<bucket>/<key>`.
//! Request signing is left to the endpoint (a signing gateway or a local
//! emulator); an optional bearer token is forwarded as-is.

use super::{object_key, s3_uri, ArtifactPublisher};
use crate::error::PublishError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate and strip control characters before logging a response body
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

#[derive(Clone)]
pub struct HttpArtifactPublisher {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpArtifactPublisher {
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, PublishError> {
        let endpoint = Url::parse(endpoint)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| PublishError::InvalidEndpoint(endpoint.to_string()))?;

        let client = Client::builder()
            .user_agent(concat!("gluegen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Path-style object URL, each segment percent-encoded
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}/{}", base, urlencoding::encode(bucket), encoded_key)
    }
}

impl ArtifactPublisher for HttpArtifactPublisher {
    async fn publish(
        &self,
        local_path: &Path,
        bucket: &str,
        prefix: &str,
    ) -> Result<String, PublishError> {
        let body = tokio::fs::read(local_path)
            .await
            .map_err(|source| PublishError::ReadScript {
                path: local_path.to_path_buf(),
                source,
            })?;

        let key = object_key(prefix, local_path);
        let url = self.object_url(bucket, &key);

        tracing::info!("Upload GlueJob Script to Bucket...");
        tracing::debug!("PUT {} ({} bytes)", url, body.len());

        let mut request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("Upload rejected: {} - {}", status, sanitize_for_log(&text));
            return Err(PublishError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!("Upload GlueJob Script to Bucket Done...");
        Ok(s3_uri(bucket, &key))
    }
}
