//! Test file metadata
//!
//! The selection core never parses test files itself. It asks a
//! [`MetadataExtractor`] for a key/value structure and reads the tag list out
//! of it with [`tag_list`].

pub mod docblock;

pub use docblock::DocblockExtractor;

use serde_json::Value;

/// Key/value metadata extracted from a test file
pub type Metadata = serde_json::Map<String, Value>;

/// Extracts metadata from the raw contents of a test file
///
/// Implemented for closures so hosts can plug in their own parser:
///
/// ```
/// use group_runner::metadata::{Metadata, MetadataExtractor};
///
/// let extractor = |_: &str| Metadata::new();
/// assert!(extractor.extract("test('x', () => {})").is_empty());
/// ```
pub trait MetadataExtractor {
    /// Return the metadata found in `contents`
    ///
    /// Extraction never fails; unrecognised input yields empty metadata.
    fn extract(&self, contents: &str) -> Metadata;
}

impl<F> MetadataExtractor for F
where
    F: Fn(&str) -> Metadata,
{
    fn extract(&self, contents: &str) -> Metadata {
        self(contents)
    }
}

/// Read the tag list stored under `key`
///
/// A non-empty string is a single tag. An array contributes its string
/// entries in declaration order; other entries are skipped. A missing key, an
/// empty string or any other value shape means no tags.
pub fn tag_list(metadata: &Metadata, key: &str) -> Vec<String> {
    match metadata.get(key) {
        Some(Value::String(tag)) if tag.is_empty() => Vec::new(),
        Some(Value::String(tag)) => vec![tag.clone()],
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_single_string_is_one_tag() {
        let meta = metadata(json!({ "group": "unit" }));
        assert_eq!(tag_list(&meta, "group"), vec!["unit"]);
    }

    #[test]
    fn test_empty_string_is_no_tags() {
        let meta = metadata(json!({ "group": "" }));
        assert!(tag_list(&meta, "group").is_empty());
    }

    #[test]
    fn test_array_preserves_order_and_duplicates() {
        let meta = metadata(json!({ "group": ["b", "a", "b"] }));
        assert_eq!(tag_list(&meta, "group"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_non_string_entries_are_skipped() {
        let meta = metadata(json!({ "group": ["a", 1, null, { "x": 1 }, ["b"], "c"] }));
        assert_eq!(tag_list(&meta, "group"), vec!["a", "c"]);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let meta = metadata(json!({ "flow": "" }));
        assert!(tag_list(&meta, "group").is_empty());
    }

    #[test]
    fn test_unexpected_shapes_are_empty() {
        for value in [json!(7), json!(true), json!(null), json!({ "a": "b" })] {
            let meta = metadata(json!({ "group": value }));
            assert!(tag_list(&meta, "group").is_empty());
        }
    }

    #[test]
    fn test_custom_key() {
        let meta = metadata(json!({ "group": "a", "tag": ["b"] }));
        assert_eq!(tag_list(&meta, "tag"), vec!["b"]);
    }

    #[test]
    fn test_closure_extractor() {
        let extractor = |contents: &str| {
            let mut meta = Metadata::new();
            meta.insert("group".to_string(), Value::String(contents.trim().to_string()));
            meta
        };
        let meta = extractor.extract("  smoke ");
        assert_eq!(tag_list(&meta, "group"), vec!["smoke"]);
    }
}
