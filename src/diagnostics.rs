//! Budget-limited diagnostic reporting
//!
//! Every recoverable failure in the reload pipeline (unreadable files,
//! malformed JSON, schema shape problems) surfaces as a human-readable
//! notification instead of a structured error value. The [`DiagnosticsSink`]
//! caps how many notifications one reload pass may deliver, so a directory
//! full of broken schema files produces a handful of messages and a single
//! "suppressed" notice rather than flooding the host.
//!
//! Hosts plug in their own delivery channel through the [`Notifier`] trait;
//! the default [`TracingNotifier`] routes to `tracing`, and [`MemoryNotifier`]
//! buffers messages for hosts (and tests) that want to inspect them.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, warn};

/// Maximum diagnostics delivered per reload pass, not counting the one
/// "suppressed" notice.
pub const DIAGNOSTIC_BUDGET: u32 = 10;

/// How urgent a notification is. Maps onto the host's own message levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable oddity; the file or entry was skipped but prior data may
    /// still be served.
    Warning,
    /// A file contributed nothing this pass (unreadable or unparseable).
    Error,
}

/// Delivery channel for diagnostics.
///
/// Implementations must be cheap and non-blocking; the sink calls them from
/// inside the reload pass, while the owning store's internal state is locked.
/// A notifier must not call back into the
/// [`SourceStore`](crate::store::SourceStore) it reports for (`reload`,
/// `stats`); that re-entry deadlocks on the reload guard. Buffer and hand
/// off instead, as [`MemoryNotifier`] does.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Default notifier: Warning goes to `warn!`, Error to `error!`.
#[derive(Debug)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}

/// Capturing notifier backed by an in-memory buffer.
///
/// Useful for hosts that batch notifications into their own UI and for tests
/// asserting on what was reported.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured messages, oldest first.
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().clone()
    }

    /// Remove and return all captured messages.
    pub fn drain(&self) -> Vec<(Severity, String)> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages.lock().push((severity, message.to_string()));
    }
}

/// Counting gate in front of a [`Notifier`].
///
/// Delivers at most [`DIAGNOSTIC_BUDGET`] messages between resets. The moment
/// the budget is reached, one extra "further diagnostics suppressed" notice is
/// delivered; everything after that is dropped silently until [`reset`] is
/// called at the start of the next reload pass.
///
/// [`reset`]: DiagnosticsSink::reset
pub struct DiagnosticsSink {
    notifier: Arc<dyn Notifier>,
    count: AtomicU32,
    limit: u32,
}

impl DiagnosticsSink {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            count: AtomicU32::new(0),
            limit: DIAGNOSTIC_BUDGET,
        }
    }

    /// Report one diagnostic, subject to the budget.
    pub fn report(&self, severity: Severity, message: &str) {
        let seen = self.count.fetch_add(1, Ordering::Relaxed);
        if seen >= self.limit {
            return;
        }
        self.notifier.notify(severity, message);
        if seen + 1 == self.limit {
            self.notifier
                .notify(Severity::Warning, "further diagnostics suppressed");
        }
    }

    /// Restore the full budget. Called once per reload pass.
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

impl fmt::Debug for DiagnosticsSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsSink")
            .field("count", &self.count.load(Ordering::Relaxed))
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
