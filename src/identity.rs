//! Content-addressed document identity.
//!
//! An id is `"{slug}-{digest}"`: a slug of the original filename's stem
//! followed by a SHA-256 digest of the raw bytes. Identical bytes uploaded
//! under the same filename always produce the same id across runs and
//! processes; this is the dedup key for the whole pipeline. The slug is
//! cosmetic; it keeps ids and object-store keys greppable.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Derive the content-addressed id for an upload.
///
/// # Example
/// ```
/// let id = docshelf::identity::derive_id("My Book! (v2).epub", b"content");
/// assert!(id.starts_with("my-book-v2-"));
/// ```
pub fn derive_id(filename: &str, bytes: &[u8]) -> String {
    format!("{}-{}", sanitize_stem(filename), content_digest(bytes))
}

/// Slug of the filename with its final extension stripped: lowercase,
/// transliterated to ASCII, non-alphanumeric runs collapsed to `-`, no
/// leading or trailing separators.
fn sanitize_stem(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    slug::slugify(stem)
}

/// Lowercase hex SHA-256 of the raw bytes.
fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_id_is_deterministic() {
        let a = derive_id("dracula.epub", b"same bytes");
        let b = derive_id("dracula.epub", b"same bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn different_bytes_yield_different_ids() {
        let a = derive_id("dracula.epub", b"first edition");
        let b = derive_id("dracula.epub", b"second edition");
        assert_ne!(a, b);
    }

    #[test]
    fn sanitizes_punctuation_and_case() {
        let id = derive_id("My Book! (v2).epub", b"x");
        assert!(id.starts_with("my-book-v2-"), "got: {id}");
        let slug_part = id.rsplit_once('-').map(|(head, _)| head).unwrap();
        assert!(slug_part
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn transliterates_non_ascii_stems() {
        let id = derive_id("Crime and Pünishment.fb2", b"x");
        assert!(id.starts_with("crime-and-punishment-"), "got: {id}");
    }

    #[test]
    fn digest_is_fixed_length_lowercase_hex() {
        let id = derive_id("a.md", b"anything");
        let digest = id.rsplit('-').next().unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn filename_without_extension_still_derives() {
        let id = derive_id("README", b"x");
        assert!(id.starts_with("readme-"), "got: {id}");
    }
}
