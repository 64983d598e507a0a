//! Document persistence gateway.
//!
//! The repository is the authority for "has this content already been
//! ingested." The dedup check and the final persist are separate calls with
//! no lock held between them, so two concurrent uploads of identical bytes
//! can both observe a miss and both reach `save` with the same id. The
//! contract below closes that race at the persistence seam: `save` is
//! insert-if-absent, and the loser of the race receives the winner's record
//! instead of an error.

use crate::document::Document;
use crate::error::IngestError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence gateway for ingested documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Look up a document by its content-addressed id. No side effects.
    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, IngestError>;

    /// Persist a new document.
    ///
    /// Must behave as atomic insert-if-absent: when a record with the same
    /// id was persisted concurrently, the existing record is returned
    /// unchanged. A relational implementation needs a unique constraint on
    /// `id` plus a conflict-returns-existing read to honour this.
    async fn save(&self, document: Document) -> Result<Document, IngestError>;
}

/// In-process repository holding documents in a shared map.
///
/// Serves tests and single-process deployments. Documents are immutable
/// after creation, so readers never observe a record changing.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, IngestError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn save(&self, document: Document) -> Result<Document, IngestError> {
        let mut documents = self.documents.write().await;
        let persisted = documents
            .entry(document.id.clone())
            .or_insert(document)
            .clone();
        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentMetadata, DocumentType};

    fn document(id: &str, url: &str) -> Document {
        Document {
            id: id.into(),
            doc_type: DocumentType::Pdf,
            metadata: DocumentMetadata::default(),
            files: vec![],
            original_file_url: url.into(),
        }
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemoryRepository::new();
        repo.save(document("paper-1", "https://store/paper-1.pdf"))
            .await
            .unwrap();
        let found = repo.find_by_id("paper-1").await.unwrap();
        assert_eq!(found.unwrap().id, "paper-1");
    }

    #[tokio::test]
    async fn find_miss_is_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn conflicting_save_returns_the_existing_record() {
        let repo = InMemoryRepository::new();
        let first = repo
            .save(document("paper-1", "https://store/first.pdf"))
            .await
            .unwrap();
        // Same id, different payload — the first write wins.
        let second = repo
            .save(document("paper-1", "https://store/second.pdf"))
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(second.original_file_url, "https://store/first.pdf");
    }
}
