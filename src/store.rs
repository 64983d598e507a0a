//! Artifact storage: durable writes of originals and previews.
//!
//! The object store is an external collaborator abstracted behind
//! [`ObjectStore`]. Artifact URLs are a pure function of store identity and
//! key, so a document's URLs can be reconstructed (and dedup checks served)
//! without any round trip to the store.
//!
//! The production implementation, [`HttpObjectStore`], speaks plain HTTP
//! `PUT` against an S3-style endpoint. Authentication (bucket policy, a
//! signing gateway, a sidecar proxy) lives outside the core; this client
//! only sets the key and the content type.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::mime::MimeType;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// An addressable blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Deterministic public URL for `key`, reproducible from store identity
    /// and key alone.
    fn url_for(&self, key: &str) -> String;

    /// Durably write `bytes` under exactly `key` with content type
    /// `"{mime};charset=utf-8"`, returning the public URL.
    ///
    /// Failures propagate as [`IngestError::StoreFailed`]; nothing here
    /// retries.
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        mime_type: MimeType,
    ) -> Result<String, IngestError>;
}

/// Object store backed by unsigned HTTP `PUT`s against an S3-style endpoint.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    /// Store for `bucket` in `region`, or for an explicit S3-compatible
    /// `endpoint` override (trailing slashes trimmed).
    pub fn new(bucket: &str, region: &str, endpoint: Option<&str>) -> Self {
        let base_url = match endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
        };
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(&config.bucket, &config.region, config.endpoint.as_deref())
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }

    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        mime_type: MimeType,
    ) -> Result<String, IngestError> {
        let url = self.url_for(key);
        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, format!("{mime_type};charset=utf-8"))
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| IngestError::StoreFailed {
                key: key.to_string(),
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(IngestError::StoreFailed {
                key: key.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        debug!(key, size = bytes.len(), %mime_type, "artifact stored");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_virtual_hosted_url_shape() {
        let store = HttpObjectStore::new("shelf", "eu-central-1", None);
        assert_eq!(
            store.url_for("dracula-abc.html"),
            "https://shelf.s3.eu-central-1.amazonaws.com/dracula-abc.html"
        );
    }

    #[test]
    fn endpoint_override_replaces_aws_shape() {
        let store = HttpObjectStore::new("shelf", "unused", Some("https://minio.local:9000/shelf/"));
        assert_eq!(
            store.url_for("dracula-abc.epub"),
            "https://minio.local:9000/shelf/dracula-abc.epub"
        );
    }
}
