//! Deduplicated warnings.
//!
//! Markup recovery tends to repeat the same anomaly many times in one
//! document (a stray `</td>` per row, say). Each distinct message is emitted
//! once through `tracing::warn!` until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a tolerated anomaly (emits once per unique message).
///
/// Returns `true` when the message was emitted, `false` when it was a repeat.
///
/// # Example
/// ```
/// use weave_common::warning::warn_once;
///
/// assert!(warn_once("doc-example", "unmatched close tag </td>"));
/// assert!(!warn_once("doc-example", "unmatched close tag </td>"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call before processing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_suppressed_until_cleared() {
        assert!(warn_once("warning-test", "first"));
        assert!(!warn_once("warning-test", "first"));
        assert!(warn_once("warning-test", "second"));
        clear_warnings();
        assert!(warn_once("warning-test", "first"));
    }
}
