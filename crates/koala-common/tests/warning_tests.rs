//! Integration tests for the deduplicating warning system.

use std::sync::{Mutex, PoisonError};

use koala_common::warning::{clear_warnings, has_warned, warn_once, warning_count};

/// The warning set is process-global; tests touching it run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn test_warn_once_prints_first_occurrence_only() {
    let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    assert!(warn_once("Inline", "dedup check: overflow by 4.0"));
    assert!(!warn_once("Inline", "dedup check: overflow by 4.0"));
    assert!(has_warned("Inline", "dedup check: overflow by 4.0"));
}

#[test]
fn test_components_are_distinct_keys() {
    let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    clear_warnings();
    assert!(warn_once("Inline", "component check"));
    assert!(warn_once("Float", "component check"));
    assert!(!has_warned("Text", "component check"));
    assert_eq!(warning_count(), 2);
}

#[test]
fn test_clear_forgets_messages() {
    let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    let _ = warn_once("Inline", "clear check");
    assert!(warning_count() >= 1);
    clear_warnings();
    assert!(!has_warned("Inline", "clear check"));
    assert!(warn_once("Inline", "clear check"));
}
