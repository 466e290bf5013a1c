//! Source store: staleness-tracked ownership of the configured schema files
//!
//! The store owns the file list, the per-file modification timestamps, and
//! the cache of each file's last successful extraction. [`SourceStore::reload`]
//! walks every configured path, re-reads only the files whose on-disk
//! modification time moved past the last recorded load, folds all cached
//! record sets through the merge engine, and atomically publishes the new
//! descriptor list. Readers always observe a fully-merged snapshot; a reload
//! in flight never shows through [`SourceStore::descriptors`].
//!
//! Nothing here returns errors to the caller: every per-file failure turns
//! into a notification through the diagnostics sink and the file simply
//! contributes nothing (or its stale records, for stat failures) this pass.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::diagnostics::{DiagnosticsSink, Notifier, Severity, TracingNotifier};
use crate::extractor;
use crate::mapping::{FieldMapping, FormatSpec};
use crate::merge;
use crate::models::{CompletionBatch, FieldDescriptor, RawFieldRecord};

/// Counters for the most recent reload pass.
///
/// Reset at the start of every pass; exposed for host status lines and for
/// tests that probe staleness behavior without touching the filesystem twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadStats {
    /// Configured paths examined this pass.
    pub files_checked: usize,
    /// Files re-read and re-extracted because their modification time moved.
    pub files_reloaded: usize,
    /// Files skipped with an unchanged modification time.
    pub files_skipped: usize,
    /// Files that failed to stat, read, or parse.
    pub files_failed: usize,
    /// Raw records staged into the merge, cached and fresh alike.
    pub records_staged: usize,
    /// Descriptors in the published list after the merge.
    pub descriptors: usize,
}

/// One configured schema file and the last time it was successfully parsed.
#[derive(Debug)]
struct SourceFile {
    path: PathBuf,
    last_loaded: Option<SystemTime>,
}

/// Why a file contributed nothing fresh this pass.
///
/// Never escapes the store: each variant is rendered into one notification.
/// Stat failures keep the file's cached records (stale-but-present beats
/// dropping); read and parse failures drop them, because the cache would
/// otherwise describe content known to be superseded.
#[derive(Debug, Error)]
enum SourceError {
    #[error("cannot stat `{}`: {}", .path.display(), .source)]
    Stat { path: PathBuf, source: io::Error },
    #[error("cannot read `{}`: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse `{}`: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl SourceError {
    fn severity(&self) -> Severity {
        match self {
            SourceError::Stat { .. } => Severity::Warning,
            SourceError::Read { .. } | SourceError::Parse { .. } => Severity::Error,
        }
    }

    fn retains_cache(&self) -> bool {
        matches!(self, SourceError::Stat { .. })
    }
}

/// Outcome of examining one configured file during a reload pass.
enum Refresh {
    /// File was re-read; the records replace its cached set.
    Loaded(Vec<RawFieldRecord>),
    /// Modification time unchanged; the cached set stays as it is.
    Unchanged,
    /// Stat, read, or parse failed; `retain` keeps the cached set.
    Failed { retain: bool },
}

/// State mutated only under the reload lock.
#[derive(Debug)]
struct Inner {
    files: Vec<SourceFile>,
    /// Last successful record set per path. Merged on every pass, so a file
    /// skipped as unchanged keeps contributing.
    cache: FxHashMap<PathBuf, Vec<RawFieldRecord>>,
    sink: DiagnosticsSink,
    stats: ReloadStats,
}

/// Owner of the extraction pipeline and the published descriptor list.
///
/// Construction performs the initial full load synchronously and never fails;
/// all per-file problems degrade to notifications. The store is `Send + Sync`
/// so a host can share it across threads behind an `Arc`: reloads serialize
/// on an internal mutex, reads take a snapshot.
#[derive(Debug)]
pub struct SourceStore {
    mapping: FieldMapping,
    format: FormatSpec,
    /// Serializes concurrent reload calls.
    inner: Mutex<Inner>,
    /// Published snapshot, swapped only after a merge completes.
    current: RwLock<Arc<Vec<FieldDescriptor>>>,
}

impl SourceStore {
    /// Build a store over `paths` and perform the initial full load,
    /// reporting through the default [`TracingNotifier`].
    pub fn new(paths: Vec<PathBuf>, mapping: FieldMapping, format: FormatSpec) -> Self {
        Self::with_notifier(paths, mapping, format, Arc::new(TracingNotifier))
    }

    /// Like [`SourceStore::new`] with a custom notification channel.
    ///
    /// The notifier runs during reload passes while the store's internal
    /// state is locked; it must not call back into this store (see
    /// [`Notifier`]).
    pub fn with_notifier(
        paths: Vec<PathBuf>,
        mapping: FieldMapping,
        format: FormatSpec,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let files = paths
            .into_iter()
            .map(|path| SourceFile {
                path,
                last_loaded: None,
            })
            .collect();
        let store = Self {
            mapping,
            format,
            inner: Mutex::new(Inner {
                files,
                cache: FxHashMap::default(),
                sink: DiagnosticsSink::new(notifier),
                stats: ReloadStats::default(),
            }),
            current: RwLock::new(Arc::new(Vec::new())),
        };
        store.reload();
        let stats = store.stats();
        info!(
            "Schema completion store ready: {} files, {} descriptors",
            stats.files_checked, stats.descriptors
        );
        store
    }

    /// Re-run the extraction pipeline over every configured file.
    ///
    /// Files whose modification time has not moved past the last recorded
    /// load are skipped without re-reading; their cached records still
    /// participate in the merge. Files that fail to stat keep their cached
    /// records; files that fail to read or parse lose them until they parse
    /// successfully again (`last_loaded` is only advanced on success, so a
    /// broken file is retried on every pass).
    pub fn reload(&self) {
        let mut guard = self.inner.lock();
        let Inner {
            files,
            cache,
            sink,
            stats,
        } = &mut *guard;

        sink.reset();
        *stats = ReloadStats {
            files_checked: files.len(),
            ..Default::default()
        };

        for file in files.iter_mut() {
            match self.refresh(file, sink) {
                Refresh::Loaded(records) => {
                    stats.files_reloaded += 1;
                    cache.insert(file.path.clone(), records);
                }
                Refresh::Unchanged => stats.files_skipped += 1,
                Refresh::Failed { retain } => {
                    stats.files_failed += 1;
                    if !retain {
                        cache.remove(&file.path);
                    }
                }
            }
        }

        // Stage every cached record set in file-list order, then entry order.
        let staged: Vec<(&Path, &RawFieldRecord)> = files
            .iter()
            .filter_map(|file| cache.get(&file.path).map(|records| (&file.path, records)))
            .flat_map(|(path, records)| records.iter().map(move |record| (path.as_path(), record)))
            .collect();
        stats.records_staged = staged.len();

        let descriptors = merge::merge(staged, &self.format);
        stats.descriptors = descriptors.len();
        debug!(
            "reload complete: {} checked, {} reloaded, {} skipped, {} failed, {} descriptors",
            stats.files_checked,
            stats.files_reloaded,
            stats.files_skipped,
            stats.files_failed,
            stats.descriptors
        );

        *self.current.write() = Arc::new(descriptors);
    }

    /// The current descriptor list as a cheap shared snapshot. Pure read; the
    /// list only changes when a reload completes.
    pub fn descriptors(&self) -> Arc<Vec<FieldDescriptor>> {
        self.current.read().clone()
    }

    /// The host-facing pull query.
    pub fn completions(&self) -> CompletionBatch {
        CompletionBatch {
            items: self.descriptors(),
            is_complete: true,
        }
    }

    /// Counters from the most recent reload pass.
    pub fn stats(&self) -> ReloadStats {
        self.inner.lock().stats
    }

    /// Examine one file: decide staleness, then read, parse, and extract.
    fn refresh(&self, file: &mut SourceFile, sink: &DiagnosticsSink) -> Refresh {
        let mtime = match Self::modification_time(&file.path) {
            Ok(mtime) => mtime,
            Err(err) => return Self::fail(sink, err),
        };
        if let Some(last) = file.last_loaded {
            if mtime <= last {
                return Refresh::Unchanged;
            }
        }
        match self.load(&file.path, sink) {
            Ok(records) => {
                file.last_loaded = Some(mtime);
                Refresh::Loaded(records)
            }
            Err(err) => Self::fail(sink, err),
        }
    }

    /// Read, parse, and extract one file, reporting shape issues as warnings.
    fn load(&self, path: &Path, sink: &DiagnosticsSink) -> Result<Vec<RawFieldRecord>, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_str(&text).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let (records, issues) = extractor::extract(&document, &self.mapping);
        for issue in &issues {
            sink.report(Severity::Warning, &format!("{}: {}", path.display(), issue));
        }
        debug!(
            "extracted {} records from {:?} ({} shape issues)",
            records.len(),
            path,
            issues.len()
        );
        Ok(records)
    }

    fn modification_time(path: &Path) -> Result<SystemTime, SourceError> {
        let stat = |source| SourceError::Stat {
            path: path.to_path_buf(),
            source,
        };
        fs::metadata(path).map_err(stat)?.modified().map_err(stat)
    }

    fn fail(sink: &DiagnosticsSink, err: SourceError) -> Refresh {
        sink.report(err.severity(), &err.to_string());
        Refresh::Failed {
            retain: err.retains_cache(),
        }
    }
}
