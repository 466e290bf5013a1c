//! Field mapping and display format configuration
//!
//! A [`FieldMapping`] tells the extractor where to find each facet of a
//! completion candidate inside an arbitrarily-shaped schema document, as
//! dot-paths (see [`crate::json_path`]). A [`FormatSpec`] controls how the
//! type and documentation text are rendered before being joined into the
//! final documentation string.
//!
//! Both types are supplied once when a [`SourceStore`](crate::store::SourceStore)
//! is constructed and are immutable afterwards; a host that wants a different
//! mapping constructs a new store. Both deserialize with per-field defaulting
//! so hosts can expose them as partial tables in their own configuration
//! files.

use serde::{Deserialize, Serialize};

/// Dot-paths locating each candidate facet inside a schema document.
///
/// `fields_container` and `detail_field` are resolved against the whole
/// document; the remaining paths are resolved against each entry of the
/// fields array. `label_field` and `fields_container` must be non-empty for
/// extraction to produce any records; any other path may be left empty to
/// omit that facet.
///
/// The defaults match the common table-schema layout:
///
/// ```json
/// {"type": "Users", "fields": [{"column": "id", "fieldType": {"type": "integer"}}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Path to the array of field entries, resolved against the document.
    pub fields_container: String,
    /// Path to the completion label, resolved against each entry. Entries
    /// where this is absent or not a string are skipped with a diagnostic.
    pub label_field: String,
    /// Path to the field's type text, resolved against each entry.
    pub type_field: String,
    /// Path to the documentation text, resolved against each entry. The value
    /// may be a string or an array of strings (joined with `", "`).
    pub doc_field: String,
    /// Path tried when no record supplied documentation, resolved inside the
    /// object at the parent path of `doc_field` (the entry itself when
    /// `doc_field` has no parent segment).
    pub fallback_doc_field: String,
    /// Path to the document-level provenance tag (e.g. a table name),
    /// resolved against the document. Absent values surface as the
    /// `"UnknownType"` placeholder in descriptor sources.
    pub detail_field: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            fields_container: "fields".to_string(),
            label_field: "column".to_string(),
            type_field: "fieldType.type".to_string(),
            doc_field: "fieldType.options".to_string(),
            fallback_doc_field: String::new(),
            detail_field: "type".to_string(),
        }
    }
}

/// Display templates for the two documentation segments.
///
/// Each template carries exactly one `%s` slot which is replaced with the
/// resolved text. The default type format wraps the type in a Markdown code
/// span, so the canonical descriptor documentation reads `` `integer` ``.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSpec {
    /// Template for the type segment of the documentation.
    pub type_format: String,
    /// Template for the doc segment of the documentation.
    pub doc_format: String,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            type_format: "`%s`".to_string(),
            doc_format: "%s".to_string(),
        }
    }
}

impl FormatSpec {
    /// Render the type segment.
    pub fn format_type(&self, value: &str) -> String {
        fill_slot(&self.type_format, value)
    }

    /// Render the doc segment.
    pub fn format_doc(&self, value: &str) -> String {
        fill_slot(&self.doc_format, value)
    }
}

fn fill_slot(template: &str, value: &str) -> String {
    template.replacen("%s", value, 1)
}
