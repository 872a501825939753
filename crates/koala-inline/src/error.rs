//! Recoverable errors.
//!
//! Malformed item streams and unsizable floats are reported as values.
//! Contract violations by the caller (a break token that does not point into
//! the node, an out-of-range item index) are programmer errors and panic.

use thiserror::Error;

/// Errors produced while building an inline node or sizing its floats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InlineError {
    /// A close tag was appended with no open tag to match it.
    #[error("close tag at offset {offset} has no matching open tag")]
    UnbalancedCloseTag {
        /// Text offset of the close tag.
        offset: usize,
    },
    /// The content ended while inline boxes were still open.
    #[error("{count} inline box(es) left open at the end of the content")]
    UnclosedTags {
        /// Number of open tags without a close tag.
        count: usize,
    },
    /// A float's inline size depends on layout that has not run yet.
    #[error("float item {item_index} has an auto inline size")]
    IndefiniteFloatSize {
        /// Index of the float item.
        item_index: usize,
    },
}
