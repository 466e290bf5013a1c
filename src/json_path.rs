//! Dot-path resolution into JSON values
//!
//! The whole mapping surface of this crate is built on one operation: walk a
//! `serde_json::Value` along a dot-separated path of object keys. Absence is a
//! normal, expected outcome (schema files vary wildly in shape and the
//! extractor probes them speculatively), so resolution returns `Option` and
//! never reports an error.
//!
//! # Limitations
//!
//! Segments are literal object keys. There is no wildcard, array-index, or
//! escape syntax, which means a field name containing a literal `.` cannot be
//! addressed. This is a documented restriction of the mapping language, not a
//! bug.

use serde_json::Value;

/// Resolve `path` against `value`, walking one object key per dot-separated
/// segment.
///
/// Returns `None` as soon as any step lands on a non-object or a missing key.
/// The empty path resolves to nothing (not to `value` itself): an empty path
/// string in a [`FieldMapping`](crate::mapping::FieldMapping) means "this
/// facet is not configured".
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Resolve `path` and require a string at the end.
///
/// Non-string terminal values are treated as absent; the extractor uses this
/// for every facet that must be display text (labels, types, details).
pub fn resolve_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    resolve(value, path).and_then(Value::as_str)
}

/// The parent of a dot path: `"a.b.c"` → `Some("a.b")`, `"a"` → `None`.
///
/// Used to scope fallback-documentation lookups inside the object that holds
/// the primary documentation field.
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(head, _)| head)
}
