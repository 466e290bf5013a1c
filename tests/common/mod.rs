//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use schema_completion_source::{FieldMapping, FormatSpec, MemoryNotifier, SourceStore};
use tempfile::TempDir;

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_schema(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A store over `paths` with the default mapping and a capturing notifier.
pub fn store_with_notifier(paths: Vec<PathBuf>) -> (SourceStore, Arc<MemoryNotifier>) {
    store_with_mapping(paths, FieldMapping::default())
}

/// Like [`store_with_notifier`] with a custom mapping.
pub fn store_with_mapping(
    paths: Vec<PathBuf>,
    mapping: FieldMapping,
) -> (SourceStore, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let store = SourceStore::with_notifier(
        paths,
        mapping,
        FormatSpec::default(),
        notifier.clone(),
    );
    (store, notifier)
}

/// Sleep past coarse filesystem mtime granularity (some filesystems round to
/// whole seconds) so a following write is seen as strictly newer.
pub fn wait_for_mtime_tick() {
    thread::sleep(Duration::from_millis(1100));
}
