//! The persisted document model.
//!
//! A [`Document`] is created exactly once, at the end of a successful
//! ingestion run, and is never updated or deleted by this crate.
//! Re-ingesting identical content is a read, not a mutation.

use crate::mime::MimeType;
use serde::{Deserialize, Serialize};

/// Document kind, deciding which stored file counts as the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// A converted book format; the preview is the stored HTML fragment.
    Ebook,
    /// A PDF, which serves as its own preview.
    Pdf,
}

impl DocumentType {
    /// Mime type of the artifact acting as this kind's preview.
    pub fn preview_mime_type(&self) -> MimeType {
        match self {
            DocumentType::Ebook => MimeType::Html,
            DocumentType::Pdf => MimeType::Pdf,
        }
    }
}

/// Bibliographic metadata extracted from a converted document's head.
///
/// Empty for formats that never pass through the converter. `authors` is
/// always present (defaulting to empty); the other fields are omitted
/// entirely when absent rather than set to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// All author entries in document order.
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One stored artifact of a document. Owned by its [`Document`]; no
/// independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub mime_type: MimeType,
    pub url: String,
}

/// The persisted record of an ingested work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Content-derived id; see [`crate::identity::derive_id`].
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub metadata: DocumentMetadata,
    /// Every artifact stored for this document, in storage order.
    pub files: Vec<DocumentFile>,
    /// URL of the unmodified uploaded bytes.
    pub original_file_url: String,
}

impl Document {
    /// The stored file acting as this document's preview, if recorded.
    ///
    /// Derived from `files` and `doc_type` rather than stored, so it can
    /// never drift from the file list. A persisted document for which this
    /// returns `None` is in an inconsistent state.
    pub fn preview_file(&self) -> Option<&DocumentFile> {
        let mime_type = self.doc_type.preview_mime_type();
        self.files.iter().find(|f| f.mime_type == mime_type)
    }

    /// URL of the preview artifact, if recorded.
    pub fn preview_file_url(&self) -> Option<&str> {
        self.preview_file().map(|f| f.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ebook(files: Vec<DocumentFile>) -> Document {
        Document {
            id: "test-0000".into(),
            doc_type: DocumentType::Ebook,
            metadata: DocumentMetadata::default(),
            files,
            original_file_url: "https://store/test-0000.epub".into(),
        }
    }

    #[test]
    fn ebook_preview_is_the_html_file() {
        let doc = ebook(vec![
            DocumentFile {
                mime_type: MimeType::Epub,
                url: "https://store/test-0000.epub".into(),
            },
            DocumentFile {
                mime_type: MimeType::Html,
                url: "https://store/test-0000.html".into(),
            },
        ]);
        assert_eq!(doc.preview_file_url(), Some("https://store/test-0000.html"));
    }

    #[test]
    fn pdf_is_its_own_preview() {
        let doc = Document {
            id: "paper-0000".into(),
            doc_type: DocumentType::Pdf,
            metadata: DocumentMetadata::default(),
            files: vec![DocumentFile {
                mime_type: MimeType::Pdf,
                url: "https://store/paper-0000.pdf".into(),
            }],
            original_file_url: "https://store/paper-0000.pdf".into(),
        };
        assert_eq!(doc.preview_file_url(), Some(doc.original_file_url.as_str()));
    }

    #[test]
    fn missing_preview_entry_resolves_to_none() {
        let doc = ebook(vec![DocumentFile {
            mime_type: MimeType::Epub,
            url: "https://store/test-0000.epub".into(),
        }]);
        assert_eq!(doc.preview_file(), None);
    }

    #[test]
    fn metadata_serialization_omits_absent_fields_but_keeps_authors() {
        let metadata = DocumentMetadata {
            title: Some("Dracula".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["title"], "Dracula");
        assert!(json.get("subtitle").is_none());
        assert!(json.get("date").is_none());
        assert_eq!(json["authors"], serde_json::json!([]));
    }

    #[test]
    fn document_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DocumentType::Ebook).unwrap(),
            "\"ebook\""
        );
    }
}
