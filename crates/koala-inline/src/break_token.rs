//! Resumption cursor between lines.

use std::fmt;

use serde::Serialize;

/// Where the next line starts: an item and a text offset inside it.
///
/// A token carries everything needed to produce the following line, so a
/// [`LineBreaker`](crate::LineBreaker) built from it gives the same lines as
/// one that walked every earlier line. The line breaker returns `None`
/// instead of a token once the content is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BreakToken {
    item_index: usize,
    text_offset: usize,
}

impl BreakToken {
    /// A token resuming at `text_offset` inside item `item_index`.
    #[must_use]
    pub const fn new(item_index: usize, text_offset: usize) -> Self {
        Self {
            item_index,
            text_offset,
        }
    }

    /// The item the next line starts in.
    #[must_use]
    pub const fn item_index(&self) -> usize {
        self.item_index
    }

    /// The text offset the next line starts at.
    #[must_use]
    pub const fn text_offset(&self) -> usize {
        self.text_offset
    }
}

impl fmt::Display for BreakToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} @ {}", self.item_index, self.text_offset)
    }
}
