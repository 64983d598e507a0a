//! Conversion: turn a book-format upload into a standalone HTML document.
//!
//! The external converter is abstracted behind [`Converter`] so the
//! orchestrator depends only on the trait; implementations may shell out,
//! link a library, or call a remote service. The production implementation,
//! [`PandocConverter`], shells out to pandoc.
//!
//! ## Temp-file discipline
//!
//! pandoc reads and writes file paths, not pipes, so each invocation uses
//! two scoped [`NamedTempFile`]s — input with the source extension, output
//! with `.html`. Both are removed when dropped, on success, failure, and
//! timeout alike.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::mime::BookFormat;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::{Builder as TempFileBuilder, NamedTempFile};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// External document converter producing standalone, resource-embedded HTML.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Convert `input` from `format` into a standalone HTML document with
    /// all resources embedded.
    async fn convert(&self, input: &[u8], format: BookFormat) -> Result<Vec<u8>, IngestError>;
}

/// [`Converter`] implementation shelling out to a pandoc binary.
pub struct PandocConverter {
    pandoc_path: PathBuf,
    template_path: Option<PathBuf>,
    timeout_secs: u64,
}

impl PandocConverter {
    pub fn new(
        pandoc_path: impl Into<PathBuf>,
        template_path: Option<PathBuf>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            pandoc_path: pandoc_path.into(),
            template_path,
            timeout_secs,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            config.pandoc_path.clone(),
            config.pandoc_template.clone(),
            config.convert_timeout_secs,
        )
    }
}

#[async_trait]
impl Converter for PandocConverter {
    async fn convert(&self, input: &[u8], format: BookFormat) -> Result<Vec<u8>, IngestError> {
        let input_file = scoped_file(format.extension())?;
        let output_file = scoped_file(".html")?;

        tokio::fs::write(input_file.path(), input)
            .await
            .map_err(|source| IngestError::ConverterIo { source })?;

        let mut command = Command::new(&self.pandoc_path);
        command
            .arg("--from")
            .arg(format.pandoc_from())
            .arg("--to")
            .arg("html")
            .arg(input_file.path())
            .arg("-o")
            .arg(output_file.path())
            .arg("--standalone")
            .arg("--embed-resources")
            .kill_on_drop(true);
        if let Some(template) = &self.template_path {
            command.arg("--template").arg(template);
        }

        debug!(%format, size = input.len(), "invoking pandoc");
        let output = timeout(Duration::from_secs(self.timeout_secs), command.output())
            .await
            .map_err(|_| IngestError::ConversionTimeout {
                secs: self.timeout_secs,
            })?
            .map_err(|source| IngestError::ConverterIo { source })?;

        // Diagnostics on stderr are not a failure by themselves.
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(%format, diagnostics = %stderr.trim(), "pandoc wrote to stderr");
        }

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() {
                format!("pandoc exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(IngestError::ConversionFailed { format, detail });
        }

        tokio::fs::read(output_file.path())
            .await
            .map_err(|source| IngestError::ConverterIo { source })
    }
}

fn scoped_file(suffix: &str) -> Result<NamedTempFile, IngestError> {
    TempFileBuilder::new()
        .prefix("docshelf-")
        .suffix(suffix)
        .tempfile()
        .map_err(|source| IngestError::ConverterIo { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_files_carry_format_suffixes() {
        let input = scoped_file(BookFormat::Epub.extension()).unwrap();
        let output = scoped_file(".html").unwrap();
        assert!(input.path().to_string_lossy().ends_with(".epub"));
        assert!(output.path().to_string_lossy().ends_with(".html"));
    }

    #[test]
    fn scoped_file_is_removed_on_drop() {
        let path = {
            let file = scoped_file(".md").unwrap();
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_binary_is_an_io_error() {
        let converter =
            PandocConverter::new("/definitely/not/a/real/pandoc", None, 5);
        let err = converter.convert(b"# hi", BookFormat::Markdown).await.unwrap_err();
        assert!(matches!(err, IngestError::ConverterIo { .. }), "got: {err}");
    }
}
