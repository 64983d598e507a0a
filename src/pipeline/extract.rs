//! Preview split and metadata extraction from converted HTML.
//!
//! The converter produces a full standalone document. Only the body's inner
//! markup is persisted as the preview — the wrapper, head, and embedded
//! template scaffolding are dropped. The head's descriptive meta tags are
//! retained as [`RawHeadFields`] and lifted into [`DocumentMetadata`] by
//! [`extract_metadata`]. Parsing uses a real DOM (html5ever via scraper)
//! rather than string surgery, so attribute order, entity encoding, and
//! nesting never break the split.

use crate::document::DocumentMetadata;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static HEAD_META: Lazy<Selector> =
    Lazy::new(|| Selector::parse("head meta[name][content]").unwrap());

/// Head-level descriptive tags of a converted document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHeadFields {
    entries: Vec<(String, String)>,
}

impl RawHeadFields {
    /// Build from `(name, content)` pairs, preserving order. Useful for
    /// converter implementations that surface metadata without HTML.
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_str())
    }

    fn all(&self, name: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, content)| content.clone())
            .collect()
    }
}

/// A converted document split into its persisted and inspected halves.
#[derive(Debug, Clone)]
pub struct ConvertedPreview {
    /// Inner markup of the body: the bytes stored as the preview artifact.
    pub body: String,
    /// Head meta tags, kept for metadata extraction; never persisted.
    pub head: RawHeadFields,
}

/// Split a standalone HTML document into preview body and head fields.
pub fn split_standalone(html: &str) -> ConvertedPreview {
    let document = Html::parse_document(html);

    let body = document
        .select(&BODY)
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_default();

    let entries = document
        .select(&HEAD_META)
        .filter_map(|meta| {
            let element = meta.value();
            Some((element.attr("name")?.to_string(), element.attr("content")?.to_string()))
        })
        .collect();

    ConvertedPreview {
        body,
        head: RawHeadFields { entries },
    }
}

/// Lift head fields into structured metadata.
///
/// The first `title`, `subtitle`, and `date` win and are omitted entirely
/// when absent; every `author` is kept in document order, and `authors`
/// alone always exists, defaulting to empty.
pub fn extract_metadata(head: &RawHeadFields) -> DocumentMetadata {
    DocumentMetadata {
        title: head.first("title").map(str::to_string),
        subtitle: head.first("subtitle").map(str::to_string),
        authors: head.all("author"),
        date: head.first("date").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDALONE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="title" content="Dracula"/>
<meta name="author" content="Bram Stoker"/>
<meta name="author" content="An Annotator"/>
<title>Dracula</title>
<style>body { max-width: 36em; }</style>
</head>
<body>
<h1 id="chapter-1">Chapter 1</h1>
<p>Jonathan Harker&#8217;s Journal — <em>kept in shorthand</em>.</p>
</body>
</html>
"#;

    #[test]
    fn body_split_drops_wrapper_and_scaffolding() {
        let preview = split_standalone(STANDALONE);
        assert!(preview.body.contains(r#"<h1 id="chapter-1">Chapter 1</h1>"#));
        assert!(preview.body.contains("<em>kept in shorthand</em>"));
        assert!(!preview.body.contains("<body"));
        assert!(!preview.body.contains("<style"));
        assert!(!preview.body.contains("<meta"));
    }

    #[test]
    fn head_fields_keep_document_order() {
        let preview = split_standalone(STANDALONE);
        let metadata = extract_metadata(&preview.head);
        assert_eq!(metadata.authors, vec!["Bram Stoker", "An Annotator"]);
    }

    #[test]
    fn first_title_wins_and_absent_fields_stay_absent() {
        let head = RawHeadFields::from_entries(vec![
            ("title".into(), "First".into()),
            ("title".into(), "Second".into()),
            ("author".into(), "A".into()),
            ("author".into(), "B".into()),
        ]);
        let metadata = extract_metadata(&head);
        assert_eq!(metadata.title.as_deref(), Some("First"));
        assert_eq!(metadata.subtitle, None);
        assert_eq!(metadata.date, None);
        assert_eq!(metadata.authors, vec!["A", "B"]);
    }

    #[test]
    fn no_authors_means_empty_sequence_not_absent() {
        let metadata = extract_metadata(&RawHeadFields::default());
        assert!(metadata.authors.is_empty());
    }

    #[test]
    fn meta_tags_without_name_or_content_are_ignored() {
        let preview = split_standalone(
            r#"<html><head><meta charset="utf-8"><meta name="date"></head><body>x</body></html>"#,
        );
        let metadata = extract_metadata(&preview.head);
        assert_eq!(metadata.date, None);
    }

    #[test]
    fn document_without_body_content_yields_empty_preview() {
        let preview = split_standalone("<html><head></head><body></body></html>");
        assert!(preview.body.is_empty());
    }
}
