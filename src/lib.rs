//! Schema-driven completion candidates for editor hosts
//!
//! This crate turns a configured set of loosely-structured JSON schema files
//! into a deduplicated, display-ready list of field descriptors. It is the
//! extraction-and-merge core of a completion source: the embedding host owns
//! the UI, the triggering, and the file watching, and talks to this crate
//! through exactly two operations: pull the current candidate set
//! ([`SourceStore::completions`]) and rebuild it because something on disk
//! changed ([`SourceStore::reload`]).
//!
//! Where each piece of a candidate lives inside the schema documents is
//! configured with dot-paths in a [`FieldMapping`]; duplicate labels across
//! files merge into one descriptor that accumulates display provenance.
//! Broken files never fail the pipeline; they are reported through a
//! budget-limited [`diagnostics`] sink and contribute nothing.
//!
//! ```
//! use schema_completion_source::{FieldMapping, FormatSpec, SourceStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let schema = dir.path().join("users.json");
//! std::fs::write(
//!     &schema,
//!     r#"{"type": "Users", "fields": [{"column": "id", "fieldType": {"type": "integer"}}]}"#,
//! )
//! .unwrap();
//!
//! let store = SourceStore::new(vec![schema], FieldMapping::default(), FormatSpec::default());
//! let batch = store.completions();
//! assert!(batch.is_complete);
//! assert_eq!(batch.items[0].label, "id");
//! assert_eq!(batch.items[0].documentation, "`integer`");
//! assert_eq!(batch.items[0].detail(), "Users");
//! ```

pub mod diagnostics;
pub mod extractor;
pub mod json_path;
pub mod logging;
pub mod mapping;
pub mod merge;
pub mod models;
pub mod store;

pub use diagnostics::{
    DIAGNOSTIC_BUDGET, DiagnosticsSink, MemoryNotifier, Notifier, Severity, TracingNotifier,
};
pub use mapping::{FieldMapping, FormatSpec};
pub use models::{CompletionBatch, FieldDescriptor, RawFieldRecord};
pub use store::{ReloadStats, SourceStore};
