//! Mime-type resolution and format dispatch.
//!
//! Uploads arrive with an optional declared content type and a filename. A
//! present, non-blank declaration is used verbatim and never validated
//! against the filename; a missing or blank one falls back to the filename
//! extension. The result is a [`SourceFormat`]: either a convertible book
//! format or a PDF, so every dispatch site is an exhaustive match and a new
//! convertible format is a compiler-enforced change.

use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Mime types the pipeline knows, as upload sources or stored artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "application/epub+zip")]
    Epub,
    #[serde(rename = "text/fb2+xml")]
    Fb2,
    #[serde(rename = "text/markdown")]
    Markdown,
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "text/html")]
    Html,
}

impl MimeType {
    /// The canonical mime string, as persisted and as sent to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Epub => "application/epub+zip",
            MimeType::Fb2 => "text/fb2+xml",
            MimeType::Markdown => "text/markdown",
            MimeType::Pdf => "application/pdf",
            MimeType::Html => "text/html",
        }
    }

    /// Canonical filename extension, leading dot included.
    pub fn extension(&self) -> &'static str {
        match self {
            MimeType::Epub => ".epub",
            MimeType::Fb2 => ".fb2",
            MimeType::Markdown => ".md",
            MimeType::Pdf => ".pdf",
            MimeType::Html => ".html",
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A convertible "book" source format.
///
/// These are the formats that must pass through the converter to obtain a
/// preview; PDFs never reach the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookFormat {
    Epub,
    Fb2,
    Markdown,
}

impl BookFormat {
    /// Source-format spelling passed to pandoc's `--from`, reader extensions
    /// included.
    pub fn pandoc_from(&self) -> &'static str {
        match self {
            BookFormat::Epub => "epub",
            BookFormat::Fb2 => "fb2",
            BookFormat::Markdown => "markdown+autolink_bare_uris+mark",
        }
    }

    /// The format's native mime type.
    pub fn mime_type(&self) -> MimeType {
        match self {
            BookFormat::Epub => MimeType::Epub,
            BookFormat::Fb2 => MimeType::Fb2,
            BookFormat::Markdown => MimeType::Markdown,
        }
    }

    /// Native filename extension, leading dot included.
    pub fn extension(&self) -> &'static str {
        self.mime_type().extension()
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookFormat::Epub => "epub",
            BookFormat::Fb2 => "fb2",
            BookFormat::Markdown => "markdown",
        })
    }
}

/// Resolved upload format: convertible, or a PDF stored as its own preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Book(BookFormat),
    Pdf,
}

impl SourceFormat {
    /// Native mime type of the uploaded bytes.
    pub fn mime_type(&self) -> MimeType {
        match self {
            SourceFormat::Book(book) => book.mime_type(),
            SourceFormat::Pdf => MimeType::Pdf,
        }
    }
}

/// Determine an upload's source format.
///
/// `declared` wins when present and non-blank (null, empty, and
/// whitespace-only all count as blank); otherwise the filename extension
/// decides. Anything unresolvable is [`IngestError::MimeTypeNotSupported`],
/// carrying the declared string verbatim.
pub fn resolve(declared: Option<&str>, filename: &str) -> Result<SourceFormat, IngestError> {
    if let Some(declared) = declared.filter(|s| !s.trim().is_empty()) {
        return from_declared(declared).ok_or_else(|| IngestError::MimeTypeNotSupported {
            mime_type: declared.to_string(),
        });
    }

    let extension = Path::new(filename).extension().and_then(|e| e.to_str());
    match extension {
        Some("md") | Some("markdown") => Ok(SourceFormat::Book(BookFormat::Markdown)),
        Some("epub") => Ok(SourceFormat::Book(BookFormat::Epub)),
        Some("fb2") => Ok(SourceFormat::Book(BookFormat::Fb2)),
        Some("pdf") => Ok(SourceFormat::Pdf),
        _ => Err(IngestError::MimeTypeNotSupported {
            mime_type: declared.unwrap_or_default().to_string(),
        }),
    }
}

fn from_declared(declared: &str) -> Option<SourceFormat> {
    if declared == MimeType::Epub.as_str() {
        Some(SourceFormat::Book(BookFormat::Epub))
    } else if declared == MimeType::Fb2.as_str() {
        Some(SourceFormat::Book(BookFormat::Fb2))
    } else if declared == MimeType::Markdown.as_str() {
        Some(SourceFormat::Book(BookFormat::Markdown))
    } else if declared == MimeType::Pdf.as_str() {
        Some(SourceFormat::Pdf)
    } else {
        None
    }
}
