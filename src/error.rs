//! Error types for the docshelf library.
//!
//! A single enum covers the whole ingestion pipeline. The not-found class
//! ([`IngestError::DocumentNotFound`], [`IngestError::PreviewNotFound`]) is
//! kept distinct from the bad-input class ([`IngestError::MimeTypeNotSupported`])
//! and from infrastructure failures (converter, object store, repository) so
//! callers can map kinds to their own surface (HTTP status codes, CLI exit
//! codes) without matching on message strings.
//!
//! Nothing in this crate retries. Every failure is local to a single
//! `upload`/`find_by_id` call and is propagated as-is; no partial document is
//! ever persisted on the failure paths.

use crate::mime::{BookFormat, MimeType};
use thiserror::Error;

/// All errors returned by the docshelf library.
#[derive(Debug, Error)]
pub enum IngestError {
    // ── Lookup errors ─────────────────────────────────────────────────────
    /// No document with the given id has been ingested.
    #[error("document not found: '{document_id}'")]
    DocumentNotFound { document_id: String },

    /// The document record exists but its expected preview artifact is not
    /// recorded in its file list.
    ///
    /// An inconsistent state rather than a plain miss: the row was persisted
    /// without the artifact entry the read path requires. Surfaced, never
    /// repaired automatically.
    #[error("preview ({mime_type}) not found for document '{document_id}'")]
    PreviewNotFound {
        document_id: String,
        mime_type: MimeType,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Neither the declared content type nor the filename extension resolved
    /// to a supported source format.
    ///
    /// Carries the declared string verbatim (possibly empty when only an
    /// unrecognised extension was available).
    #[error("mime type not supported: '{mime_type}'")]
    MimeTypeNotSupported { mime_type: String },

    // ── Converter errors ──────────────────────────────────────────────────
    /// The external converter exited with a failure status.
    #[error("conversion from {format} failed: {detail}")]
    ConversionFailed { format: BookFormat, detail: String },

    /// The external converter did not finish within the configured bound.
    #[error("conversion timed out after {secs}s")]
    ConversionTimeout { secs: u64 },

    /// The converter binary could not be spawned, or reading/writing its
    /// scoped temp files failed.
    #[error("converter I/O error: {source}")]
    ConverterIo {
        #[source]
        source: std::io::Error,
    },

    // ── Storage errors ────────────────────────────────────────────────────
    /// The object store rejected or failed a write.
    #[error("object store write failed for key '{key}': {detail}")]
    StoreFailed { key: String, detail: String },

    /// The document repository failed a read or write.
    #[error("repository error: {detail}")]
    Repository { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    /// True for the not-found class of errors.
    ///
    /// [`IngestError::PreviewNotFound`] belongs here: the record is unusable
    /// for the caller even though a row exists.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            IngestError::DocumentNotFound { .. } | IngestError::PreviewNotFound { .. }
        )
    }
}
