//! Layout warnings with colored terminal output.
//!
//! The line breaker never fails a layout outright. When it has to settle for
//! a degraded result (a line that overflows because no break opportunity
//! fits, a float whose size cannot be computed yet) the caller reports it
//! here. Each distinct message is printed once until [`clear_warnings`] runs.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// A poisoned set only means another thread panicked mid-insert; the set is
/// still usable for deduplication.
fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Warn about degraded layout (prints once per unique message).
///
/// Returns `true` if this call printed the message.
///
/// # Example
/// ```
/// use koala_common::warning::{clear_warnings, warn_once};
///
/// clear_warnings();
/// assert!(warn_once("Inline", "line 3 overflows by 12.0"));
/// assert!(!warn_once("Inline", "line 3 overflows by 12.0"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = warned().get_or_insert_with(HashSet::new).insert(key);

    if should_print {
        eprintln!("{YELLOW}[Koala {component}] ⚠ {message}{RESET}");
    }
    should_print
}

/// Returns `true` if `message` has been reported for `component` since the
/// last [`clear_warnings`].
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    warned().as_ref().is_some_and(|set| set.contains(&key))
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    warned().as_ref().map_or(0, HashSet::len)
}

/// Clear all recorded warnings (call when laying out a new document).
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}
