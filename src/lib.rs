//! # docshelf
//!
//! Content-addressed document ingestion with HTML previews.
//!
//! ## Why this crate?
//!
//! User-uploaded ebooks and PDFs arrive repeatedly — the same file from
//! different users, the same bytes under retries. docshelf assigns every
//! upload a content-addressed identity, converts convertible formats into
//! one canonical HTML preview, extracts bibliographic metadata from the
//! conversion, and records the result durably, so re-uploads of identical
//! content are served from the existing record instead of being converted
//! and stored again.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload(filename, mime?, bytes)
//!  │
//!  ├─ 1. Identify  slug(stem) + sha256(bytes) → content-addressed id
//!  ├─ 2. Dedup     repository hit → return existing record (preview checked)
//!  ├─ 3. Resolve   declared mime type, else filename extension
//!  ├─ 4. Convert   epub / fb2 / markdown → standalone HTML via pandoc
//!  ├─ 5. Extract   body fragment + head meta (title, authors, date)
//!  ├─ 6. Store     original and preview under deterministic keys
//!  └─ 7. Persist   immutable document record
//! ```
//!
//! PDFs skip steps 4–5: the stored PDF is its own preview.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docshelf::{IngestConfig, Ingestor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = IngestConfig::builder()
//!         .bucket("shelf")
//!         .region("eu-central-1")
//!         .pandoc_template("templates/preview.html")
//!         .build()?;
//!     let ingestor = Ingestor::from_config(&config);
//!
//!     let bytes = std::fs::read("dracula.epub")?;
//!     let document = ingestor.upload("dracula.epub", None, &bytes).await?;
//!     println!("{} → {:?}", document.id, document.preview_file_url());
//!     Ok(())
//! }
//! ```
//!
//! ## Collaborator seams
//!
//! The external converter, the object store, and the document repository are
//! each behind a trait ([`Converter`], [`ObjectStore`],
//! [`DocumentRepository`]), so deployments can substitute a remote
//! conversion service, a different blob store, or a relational repository
//! without touching the pipeline, and tests run against in-process fakes.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod identity;
pub mod ingest;
pub mod mime;
pub mod pipeline;
pub mod repository;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{IngestConfig, IngestConfigBuilder};
pub use document::{Document, DocumentFile, DocumentMetadata, DocumentType};
pub use error::IngestError;
pub use ingest::Ingestor;
pub use mime::{BookFormat, MimeType, SourceFormat};
pub use pipeline::convert::{Converter, PandocConverter};
pub use pipeline::extract::{ConvertedPreview, RawHeadFields};
pub use repository::{DocumentRepository, InMemoryRepository};
pub use store::{HttpObjectStore, ObjectStore};
