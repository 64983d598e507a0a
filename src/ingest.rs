//! Ingestion entry points: `upload` and `find_by_id`.
//!
//! [`Ingestor`] composes identity derivation, mime resolution, conversion,
//! extraction, storage, and persistence into the end-to-end upload flow, and
//! serves the read path. It holds no mutable state of its own: concurrent
//! uploads share nothing but the collaborators behind the three trait seams,
//! and every step of one upload is strictly sequential because each depends
//! on the previous one's output.
//!
//! Persistence is last. The record references the artifact URLs, so `save`
//! runs only after every store write has succeeded; a failed upload never
//! leaves a partial document behind. At worst it leaves orphaned artifacts
//! under content-derived keys, which an identical retry overwrites
//! idempotently.

use crate::config::IngestConfig;
use crate::document::{Document, DocumentFile, DocumentMetadata, DocumentType};
use crate::error::IngestError;
use crate::identity;
use crate::mime::{self, MimeType, SourceFormat};
use crate::pipeline::convert::{Converter, PandocConverter};
use crate::pipeline::extract;
use crate::repository::{DocumentRepository, InMemoryRepository};
use crate::store::{HttpObjectStore, ObjectStore};
use std::sync::Arc;
use tracing::{debug, info};

/// The ingestion orchestrator.
pub struct Ingestor {
    converter: Arc<dyn Converter>,
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn DocumentRepository>,
}

impl Ingestor {
    pub fn new(
        converter: Arc<dyn Converter>,
        store: Arc<dyn ObjectStore>,
        repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            converter,
            store,
            repository,
        }
    }

    /// Wire the production collaborators from one config: pandoc converter,
    /// HTTP object store, in-memory repository.
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            Arc::new(PandocConverter::from_config(config)),
            Arc::new(HttpObjectStore::from_config(config)),
            Arc::new(InMemoryRepository::new()),
        )
    }

    /// Ingest an uploaded file.
    ///
    /// Re-uploading identical bytes under the same filename returns the
    /// already-persisted record without converting or storing anything
    /// again. A dedup hit whose record lacks its preview artifact is
    /// surfaced as [`IngestError::PreviewNotFound`] rather than repaired.
    ///
    /// # Errors
    /// [`IngestError::MimeTypeNotSupported`] for unresolvable formats;
    /// converter, store, and repository failures propagate unretried.
    pub async fn upload(
        &self,
        filename: &str,
        declared_mime_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<Document, IngestError> {
        // ── Step 1: Identify ─────────────────────────────────────────────
        let document_id = identity::derive_id(filename, bytes);
        info!(%document_id, filename, size = bytes.len(), "upload started");

        // ── Step 2: Dedup check ──────────────────────────────────────────
        if let Some(existing) = self.repository.find_by_id(&document_id).await? {
            require_preview(&existing)?;
            info!(%document_id, "content already ingested, returning existing record");
            return Ok(existing);
        }

        // ── Step 3: Resolve format ───────────────────────────────────────
        let format = mime::resolve(declared_mime_type, filename)?;
        debug!(%document_id, ?format, "format resolved");

        // ── Step 4: Dispatch ─────────────────────────────────────────────
        let document = match format {
            SourceFormat::Book(book) => {
                let standalone = self.converter.convert(bytes, book).await?;
                let converted = extract::split_standalone(&String::from_utf8_lossy(&standalone));
                let metadata = extract::extract_metadata(&converted.head);

                let original_key = format!("{document_id}{}", book.extension());
                let preview_key = format!("{document_id}.html");
                let original_url = self.store.put(&original_key, bytes, book.mime_type()).await?;
                let preview_url = self
                    .store
                    .put(&preview_key, converted.body.as_bytes(), MimeType::Html)
                    .await?;

                Document {
                    id: document_id,
                    doc_type: DocumentType::Ebook,
                    metadata,
                    files: vec![
                        DocumentFile {
                            mime_type: book.mime_type(),
                            url: original_url.clone(),
                        },
                        DocumentFile {
                            mime_type: MimeType::Html,
                            url: preview_url,
                        },
                    ],
                    original_file_url: original_url,
                }
            }
            SourceFormat::Pdf => {
                let key = format!("{document_id}.pdf");
                let url = self.store.put(&key, bytes, MimeType::Pdf).await?;

                Document {
                    id: document_id,
                    doc_type: DocumentType::Pdf,
                    metadata: DocumentMetadata::default(),
                    files: vec![DocumentFile {
                        mime_type: MimeType::Pdf,
                        url: url.clone(),
                    }],
                    original_file_url: url,
                }
            }
        };

        // ── Step 5: Persist ──────────────────────────────────────────────
        // `save` is insert-if-absent: a concurrent identical upload may have
        // won the race, in which case its record comes back and ours is
        // discarded (the artifact writes were byte-identical).
        let persisted = self.repository.save(document).await?;
        info!(
            document_id = %persisted.id,
            doc_type = ?persisted.doc_type,
            files = persisted.files.len(),
            "document ingested"
        );
        Ok(persisted)
    }

    /// Look up a previously ingested document.
    ///
    /// The read path enforces the same consistency contract as the dedup
    /// check: a known document must have its preview artifact recorded.
    pub async fn find_by_id(&self, document_id: &str) -> Result<Document, IngestError> {
        let document = self
            .repository
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| IngestError::DocumentNotFound {
                document_id: document_id.to_string(),
            })?;
        require_preview(&document)?;
        Ok(document)
    }
}

fn require_preview(document: &Document) -> Result<(), IngestError> {
    if document.preview_file().is_none() {
        return Err(IngestError::PreviewNotFound {
            document_id: document.id.clone(),
            mime_type: document.doc_type.preview_mime_type(),
        });
    }
    Ok(())
}
