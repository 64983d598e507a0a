//! Configuration for the ingestion pipeline.
//!
//! All knobs live in one [`IngestConfig`], built via its validating
//! [`IngestConfigBuilder`] or from `DOCSHELF_*` environment variables.
//! Keeping every setting in a single struct makes it trivial to share across
//! tasks and to serialise for logging.

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an ingestion pipeline instance.
///
/// # Example
/// ```
/// use docshelf::IngestConfig;
///
/// let config = IngestConfig::builder()
///     .bucket("shelf")
///     .region("eu-central-1")
///     .convert_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.bucket, "shelf");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Object-store bucket name; part of every derived artifact URL.
    pub bucket: String,

    /// Object-store region; part of every derived artifact URL.
    pub region: String,

    /// Endpoint override for S3-compatible stores. When set, artifact URLs
    /// are `{endpoint}/{key}` instead of the AWS virtual-hosted shape.
    pub endpoint: Option<String>,

    /// Path to the pandoc binary. Default: `pandoc`, resolved via `PATH`.
    pub pandoc_path: PathBuf,

    /// Pandoc HTML template applied to every conversion.
    ///
    /// The template controls which head meta descriptors the converted
    /// document carries; without one, pandoc's built-in template is used.
    pub pandoc_template: Option<PathBuf>,

    /// Upper bound on a single converter invocation, in seconds.
    /// Default: 120.
    ///
    /// Conversion is the slowest pipeline step by far — a large epub with
    /// embedded images can hold a worker for tens of seconds. The bound
    /// turns a wedged converter into a typed failure instead of a stuck
    /// upload; temp files are released either way.
    pub convert_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: String::new(),
            endpoint: None,
            pandoc_path: PathBuf::from("pandoc"),
            pandoc_template: None,
            convert_timeout_secs: 120,
        }
    }
}

impl IngestConfig {
    /// Create a new builder. `bucket` and `region` must be set before
    /// [`IngestConfigBuilder::build`] will succeed.
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a configuration from `DOCSHELF_*` environment variables.
    ///
    /// `DOCSHELF_BUCKET` and `DOCSHELF_REGION` are required. Optional:
    /// `DOCSHELF_ENDPOINT`, `DOCSHELF_PANDOC_PATH`, `DOCSHELF_PANDOC_TEMPLATE`,
    /// `DOCSHELF_CONVERT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, IngestError> {
        fn required(name: &str) -> Result<String, IngestError> {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| IngestError::InvalidConfig(format!("{name} is not set")))
        }
        fn optional(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }

        let mut builder = Self::builder()
            .bucket(required("DOCSHELF_BUCKET")?)
            .region(required("DOCSHELF_REGION")?);

        if let Some(endpoint) = optional("DOCSHELF_ENDPOINT") {
            builder = builder.endpoint(endpoint);
        }
        if let Some(path) = optional("DOCSHELF_PANDOC_PATH") {
            builder = builder.pandoc_path(path);
        }
        if let Some(template) = optional("DOCSHELF_PANDOC_TEMPLATE") {
            builder = builder.pandoc_template(template);
        }
        if let Some(secs) = optional("DOCSHELF_CONVERT_TIMEOUT_SECS") {
            let secs = secs.parse().map_err(|_| {
                IngestError::InvalidConfig(format!(
                    "DOCSHELF_CONVERT_TIMEOUT_SECS must be an integer, got '{secs}'"
                ))
            })?;
            builder = builder.convert_timeout_secs(secs);
        }

        builder.build()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    pub fn pandoc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pandoc_path = path.into();
        self
    }

    pub fn pandoc_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pandoc_template = Some(path.into());
        self
    }

    pub fn convert_timeout_secs(mut self, secs: u64) -> Self {
        self.config.convert_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IngestConfig, IngestError> {
        let c = &self.config;
        if c.bucket.is_empty() {
            return Err(IngestError::InvalidConfig("bucket must be set".into()));
        }
        if c.region.is_empty() {
            return Err(IngestError::InvalidConfig("region must be set".into()));
        }
        if c.convert_timeout_secs == 0 {
            return Err(IngestError::InvalidConfig(
                "convert timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = IngestConfig::builder()
            .bucket("shelf")
            .region("eu-central-1")
            .build()
            .unwrap();
        assert_eq!(config.pandoc_path, PathBuf::from("pandoc"));
        assert_eq!(config.convert_timeout_secs, 120);
        assert!(config.pandoc_template.is_none());
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn missing_bucket_is_rejected() {
        let err = IngestConfig::builder()
            .region("eu-central-1")
            .build()
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = IngestConfig::builder()
            .bucket("shelf")
            .region("eu-central-1")
            .convert_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, IngestError::InvalidConfig(_)));
    }
}
