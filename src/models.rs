//! Shared data types for the extraction and merge pipeline

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Placeholder recorded in descriptor sources when a contributing document
/// carries no usable detail value.
pub const UNKNOWN_TYPE: &str = "UnknownType";

/// One field entry as extracted from a single schema document.
///
/// Records are ephemeral: produced by the extractor, folded by the merge
/// engine, and cached per file only so that skipping an unchanged file keeps
/// its contribution in the next merge. They are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldRecord {
    /// The completion label. Always present; entries without a usable label
    /// are skipped during extraction.
    pub label: String,
    /// The field's type text, empty when the mapping did not resolve one.
    pub type_name: String,
    /// Documentation text: a string used verbatim, or an array of strings
    /// joined with `", "` at extraction time.
    pub doc: Option<String>,
    /// Fallback documentation captured at extraction time, used only when no
    /// contributing record supplied `doc`.
    pub fallback_doc: Option<String>,
    /// Document-level provenance tag (e.g. the table name) stamped on every
    /// record from the same document.
    pub detail: Option<String>,
}

/// A finalized, display-ready completion candidate.
///
/// The descriptor collection is rebuilt from scratch on every (re)load;
/// callers must not assume identity stability across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique key of the collection.
    pub label: String,
    /// The field's type text, empty when none of the contributing records
    /// carried one.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Formatted documentation: the type segment and the doc segment, each
    /// omitted when empty, joined with a newline.
    pub documentation: String,
    /// One entry per contributing record, in file-processing order.
    /// Duplicates are meaningful: they show how many schema files define this
    /// label.
    pub sources: Vec<String>,
}

impl FieldDescriptor {
    /// The display detail line: all sources joined with `", "`.
    pub fn detail(&self) -> String {
        self.sources.join(", ")
    }
}

/// Result of the host-facing pull query.
///
/// `is_complete` is always `true`: this crate never returns partial or
/// streamed candidate sets. The field exists so hosts that speak an
/// LSP-shaped completion contract can forward the flag without special
/// casing.
#[derive(Debug, Clone)]
pub struct CompletionBatch {
    /// Shared snapshot of the current descriptor list, sorted by label.
    pub items: Arc<Vec<FieldDescriptor>>,
    /// Always `true`.
    pub is_complete: bool,
}
