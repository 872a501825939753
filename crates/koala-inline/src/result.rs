//! Per-item results and line info.

use std::ops::{Index, IndexMut};

use koala_text::ShapeResult;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::box_model::EdgeSizes;
use crate::container::BoxFragment;
use crate::item::InlineNode;
use crate::style::StyleId;

/// What the line breaker decided for one item, or for the part of a text
/// item that landed on the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResult {
    /// Index of the item in the node.
    pub item_index: usize,
    /// Start of the consumed range.
    pub start_offset: usize,
    /// End of the consumed range (exclusive).
    pub end_offset: usize,
    /// Inline size this result adds to the line, margins included.
    pub inline_size: f32,
    /// Margins of atomic inlines and of tag edges.
    pub margins: EdgeSizes,
    /// Block-start border and padding of an inline box, recorded on its open
    /// tag.
    pub borders_paddings_block_start: f32,
    /// Block-end border and padding of an inline box, recorded on its open
    /// tag.
    pub borders_paddings_block_end: f32,
    /// A line may not end right after this result.
    pub prohibit_break_after: bool,
    /// The text was measured but not even its first break opportunity fit.
    pub no_break_opportunities_inside: bool,
    /// The measured prefix of a text item.
    pub shape_result: Option<ShapeResult>,
    /// The laid-out box of an atomic inline.
    pub layout_result: Option<BoxFragment>,
}

impl ItemResult {
    /// An empty result covering `[start_offset, end_offset)` of an item.
    #[must_use]
    pub const fn new(item_index: usize, start_offset: usize, end_offset: usize) -> Self {
        Self {
            item_index,
            start_offset,
            end_offset,
            inline_size: 0.0,
            margins: EdgeSizes::ZERO,
            borders_paddings_block_start: 0.0,
            borders_paddings_block_end: 0.0,
            prohibit_break_after: false,
            no_break_opportunities_inside: false,
            shape_result: None,
            layout_result: None,
        }
    }
}

/// The results of a line, stored in an arena with a logical length.
///
/// Truncating only moves the length marker: the results cut off by a rewind
/// stay in the buffer, readable through [`ItemResults::discarded`], until
/// the next push overwrites them.
#[derive(Debug, Clone, Default)]
pub struct ItemResults {
    buffer: Vec<ItemResult>,
    len: usize,
}

impl ItemResults {
    /// An empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            len: 0,
        }
    }

    /// Append a result after the logical end, dropping anything discarded.
    pub fn push(&mut self, result: ItemResult) {
        self.buffer.truncate(self.len);
        self.buffer.push(result);
        self.len += 1;
    }

    /// Shrink the logical length to `len`, keeping the tail as discarded.
    ///
    /// # Panics
    ///
    /// Panics if `len` is greater than the current length.
    pub fn truncate(&mut self, len: usize) {
        assert!(
            len <= self.len,
            "cannot truncate {} results to {len}",
            self.len
        );
        self.len = len;
    }

    /// Forget every result, discarded ones included.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.len = 0;
    }

    /// Number of results on the line.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the line has no results.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The results on the line.
    #[must_use]
    pub fn as_slice(&self) -> &[ItemResult] {
        &self.buffer[..self.len]
    }

    /// Results cut off by the last truncation.
    #[must_use]
    pub fn discarded(&self) -> &[ItemResult] {
        &self.buffer[self.len..]
    }

    /// The last result on the line.
    #[must_use]
    pub fn last(&self) -> Option<&ItemResult> {
        self.as_slice().last()
    }

    /// Iterate over the results on the line.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemResult> {
        self.as_slice().iter()
    }
}

impl Index<usize> for ItemResults {
    type Output = ItemResult;

    fn index(&self, index: usize) -> &ItemResult {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for ItemResults {
    fn index_mut(&mut self, index: usize) -> &mut ItemResult {
        &mut self.buffer[..self.len][index]
    }
}

impl<'a> IntoIterator for &'a ItemResults {
    type Item = &'a ItemResult;
    type IntoIter = std::slice::Iter<'a, ItemResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for ItemResults {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Serialize for ItemResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for result in self {
            seq.serialize_element(result)?;
        }
        seq.end()
    }
}

/// One line produced by the line breaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineInfo {
    /// Results in item order.
    pub results: ItemResults,
    /// The innermost inline box open when the line started.
    pub line_style: StyleId,
    /// Breaking stopped because the content ran out, a forced break fired,
    /// or an overflow had nowhere to rewind to.
    pub is_last_line: bool,
    /// The available width the line was broken against, if it was resolved.
    pub available_width: Option<f32>,
    /// The line is wider than its resolved available width and no break
    /// point could bring it back.
    pub has_overflow: bool,
}

impl LineInfo {
    /// An empty line starting in `line_style`.
    #[must_use]
    pub const fn new(line_style: StyleId) -> Self {
        Self {
            results: ItemResults::new(),
            line_style,
            is_last_line: false,
            available_width: None,
            has_overflow: false,
        }
    }

    /// Sum of the inline sizes of the results.
    #[must_use]
    pub fn inline_size(&self) -> f32 {
        self.results.iter().map(|r| r.inline_size).sum()
    }

    /// The pieces of text items on the line.
    #[must_use]
    pub fn text<'n>(&self, node: &'n InlineNode) -> Vec<&'n str> {
        self.results
            .iter()
            .filter(|r| node.item(r.item_index).is_text())
            .map(|r| &node.text()[r.start_offset..r.end_offset])
            .collect()
    }

    /// Record the width the line was broken against and whether it overflows.
    pub(crate) fn finish(&mut self, available_width: Option<f32>) {
        self.available_width = available_width;
        self.has_overflow = available_width.is_some_and(|width| self.inline_size() > width);
    }
}
