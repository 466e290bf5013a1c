//! Label-keyed merge of raw field records into final descriptors
//!
//! One full rebuild folds every staged `(path, record)` pair (all files in
//! file-list order, entries in document order) into a single descriptor per
//! distinct label. The merge cares only about labels; the path travels along
//! for trace logging, while display provenance comes from each record's
//! `detail` value.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::mapping::FormatSpec;
use crate::models::{FieldDescriptor, RawFieldRecord, UNKNOWN_TYPE};

/// Per-label accumulator while the fold is in flight.
#[derive(Debug)]
struct PendingDescriptor {
    /// Type text from the first contributing record.
    type_name: String,
    /// First non-empty `doc` value seen across contributing records.
    doc: Option<String>,
    /// Fallback captured from the first contributing record only.
    fallback_doc: Option<String>,
    sources: Vec<String>,
}

/// Fold records into one descriptor per label, sorted by label.
///
/// The first record seen for a label fixes its type and its documentation
/// fallback; every contributing record (the first included) appends one entry
/// to `sources`: its `detail` value, or the `"UnknownType"` placeholder when
/// the originating document carried none. Documentation is the first
/// non-empty `doc` across contributors, else the captured fallback, else
/// empty.
pub fn merge<'a, I>(records: I, format: &FormatSpec) -> Vec<FieldDescriptor>
where
    I: IntoIterator<Item = (&'a Path, &'a RawFieldRecord)>,
{
    let mut pending: FxHashMap<String, PendingDescriptor> = FxHashMap::default();

    for (path, record) in records {
        trace!("merging `{}` from {:?}", record.label, path);
        let entry = pending
            .entry(record.label.clone())
            .or_insert_with(|| PendingDescriptor {
                type_name: record.type_name.clone(),
                doc: None,
                fallback_doc: record.fallback_doc.clone(),
                sources: Vec::new(),
            });

        entry.sources.push(
            record
                .detail
                .clone()
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        );

        if entry.doc.is_none() {
            if let Some(doc) = record.doc.as_deref() {
                if !doc.is_empty() {
                    entry.doc = Some(doc.to_string());
                }
            }
        }
    }

    let mut descriptors: Vec<FieldDescriptor> = pending
        .into_iter()
        .map(|(label, entry)| finalize(label, entry, format))
        .collect();
    descriptors.sort_unstable_by(|a, b| a.label.cmp(&b.label));
    descriptors
}

/// Render the accumulated state into the display form: type segment then doc
/// segment, each omitted when empty, joined with a newline.
fn finalize(label: String, entry: PendingDescriptor, format: &FormatSpec) -> FieldDescriptor {
    let doc = entry
        .doc
        .or_else(|| entry.fallback_doc.filter(|text| !text.is_empty()));

    let mut segments = Vec::with_capacity(2);
    if !entry.type_name.is_empty() {
        segments.push(format.format_type(&entry.type_name));
    }
    if let Some(doc) = doc.as_deref() {
        segments.push(format.format_doc(doc));
    }

    FieldDescriptor {
        label,
        type_name: entry.type_name,
        documentation: segments.join("\n"),
        sources: entry.sources,
    }
}
