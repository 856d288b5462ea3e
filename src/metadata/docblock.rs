//! Docblock pragma extraction
//!
//! Default [`MetadataExtractor`]: reads `@key value` pragmas from the block
//! comment that opens a test file.
//!
//! ```text
//! /**
//!  * @group unit/parser
//!  * @group smoke
//!  */
//! ```
//!
//! A key seen once maps to a string; a repeated key maps to an array of its
//! values in declaration order.

use super::{Metadata, MetadataExtractor};
use serde_json::Value;

/// Extracts pragmas from a file's leading docblock
#[derive(Debug, Clone, Copy, Default)]
pub struct DocblockExtractor;

impl DocblockExtractor {
    /// Create a new docblock extractor
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for DocblockExtractor {
    fn extract(&self, contents: &str) -> Metadata {
        let mut metadata = Metadata::new();

        let Some(body) = leading_block(contents) else {
            return metadata;
        };

        for line in body.lines() {
            if let Some((key, value)) = pragma(line) {
                insert_pragma(&mut metadata, key, value);
            }
        }

        metadata
    }
}

/// Body of the block comment opening `contents`, without its delimiters
fn leading_block(contents: &str) -> Option<&str> {
    let rest = contents
        .trim_start_matches('\u{feff}')
        .trim_start()
        .strip_prefix("/*")?;
    let end = rest.find("*/")?;
    let body = &rest[..end];
    Some(body.strip_prefix('*').unwrap_or(body))
}

/// Parse `@key value` from one comment line
fn pragma(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line).trim_start();
    let pragma = line.strip_prefix('@')?;

    let (key, value) = match pragma.find(char::is_whitespace) {
        Some(split) => (&pragma[..split], pragma[split..].trim()),
        None => (pragma, ""),
    };

    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

fn insert_pragma(metadata: &mut Metadata, key: &str, value: &str) {
    let value = Value::String(value.to_string());
    match metadata.get_mut(key) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            metadata.insert(key.to_string(), value);
        }
    }
}
