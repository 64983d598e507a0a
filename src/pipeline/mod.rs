//! Pipeline stages for document ingestion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets an implementation be
//! swapped (e.g. a remote converter service instead of a local pandoc)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ convert ──▶ extract ──────────────▶ store
//!          (pandoc)    (body split + head meta)  (original + preview)
//! ```
//!
//! 1. [`convert`] — turn a book-format upload into standalone HTML behind
//!    the [`convert::Converter`] seam; the only stage that runs a subprocess
//! 2. [`extract`] — split the standalone document into the persisted body
//!    fragment and the head fields, then lift the head fields into
//!    structured metadata; pure, no I/O
//!
//! Identity derivation, mime resolution, and the storage/persistence seams
//! live beside the pipeline in [`crate::identity`], [`crate::mime`],
//! [`crate::store`], and [`crate::repository`]; [`crate::ingest`] composes
//! all of it.

pub mod convert;
pub mod extract;
