//! Schema extraction: one parsed document in, raw field records out
//!
//! The extractor applies a [`FieldMapping`] to a single parsed JSON document
//! and produces one [`RawFieldRecord`] per usable field entry, together with
//! the shape problems it ran into. It is deliberately infallible: a document
//! of the wrong shape degrades to an empty record set plus a diagnostic, and
//! a single malformed entry is skipped without aborting the rest of the file.
//! Anything subtler than a missing container or label (wrong-typed doc
//! values, non-string details) silently degrades to an absent facet.

use serde_json::Value;
use thiserror::Error;

use crate::json_path;
use crate::mapping::FieldMapping;
use crate::models::RawFieldRecord;

/// A recoverable shape problem found while extracting one document.
///
/// Issues are returned as values so the caller decides how to surface them;
/// the store forwards them to the diagnostics sink with the file path
/// prepended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeIssue {
    /// The `fields_container` path did not resolve to an array.
    #[error("no fields container found at `{path}`")]
    MissingFieldsContainer { path: String },
    /// A field entry had no string value at the `label_field` path.
    #[error("invalid field entry {index}: missing label")]
    InvalidEntry { index: usize },
}

/// Extract raw field records from one parsed schema document.
///
/// The fields container and the detail value are resolved against the whole
/// document; label, type, and documentation are resolved against each entry.
/// The detail value is document-level provenance (e.g. a table name), so the
/// same value is stamped on every record from this document.
pub fn extract(document: &Value, mapping: &FieldMapping) -> (Vec<RawFieldRecord>, Vec<ShapeIssue>) {
    let mut issues = Vec::new();

    let entries = match json_path::resolve(document, &mapping.fields_container) {
        Some(Value::Array(entries)) => entries,
        _ => {
            issues.push(ShapeIssue::MissingFieldsContainer {
                path: mapping.fields_container.clone(),
            });
            return (Vec::new(), issues);
        }
    };

    let detail = json_path::resolve_str(document, &mapping.detail_field).map(str::to_string);

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(label) = json_path::resolve_str(entry, &mapping.label_field) else {
            issues.push(ShapeIssue::InvalidEntry { index });
            continue;
        };

        records.push(RawFieldRecord {
            label: label.to_string(),
            type_name: json_path::resolve_str(entry, &mapping.type_field)
                .unwrap_or_default()
                .to_string(),
            doc: doc_value(entry, &mapping.doc_field),
            fallback_doc: fallback_value(entry, mapping),
            detail: detail.clone(),
        });
    }

    (records, issues)
}

/// Documentation may be a plain string or an array of strings joined with
/// `", "`; any other shape, including an array with a non-string element, is
/// treated as absent.
fn doc_value(entry: &Value, path: &str) -> Option<String> {
    match json_path::resolve(entry, path)? {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let mut texts = Vec::with_capacity(parts.len());
            for part in parts {
                texts.push(part.as_str()?);
            }
            Some(texts.join(", "))
        }
        _ => None,
    }
}

/// Capture the fallback documentation for one entry.
///
/// The fallback path is looked up inside the object at the parent path of
/// `doc_field` (for `doc_field = "fieldType.options"` that is the entry's
/// `fieldType` object); when `doc_field` has no parent segment the fallback
/// resolves against the entry itself.
fn fallback_value(entry: &Value, mapping: &FieldMapping) -> Option<String> {
    let scope = match json_path::parent(&mapping.doc_field) {
        Some(parent) => json_path::resolve(entry, parent)?,
        None => entry,
    };
    json_path::resolve_str(scope, &mapping.fallback_doc_field).map(str::to_string)
}
