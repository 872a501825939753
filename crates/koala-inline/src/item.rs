//! Inline items and the inline node.
//!
//! [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
//!
//! "Inline-level elements are those elements of the source document that do
//! not form new blocks of content; the content is distributed in lines."
//!
//! An inline formatting context is flattened into one text buffer and a list
//! of items that tile it. Nested inline boxes become zero-length open/close
//! tag markers; atomic inlines and floats each occupy one U+FFFC OBJECT
//! REPLACEMENT CHARACTER so every item has a distinct text position.

use koala_text::TextRun;
use serde::Serialize;

use crate::box_model::LogicalSize;
use crate::float::FloatSide;
use crate::style::{InlineStyle, StyleId};
use crate::values::AutoOr;

/// The character standing in for atomic inlines and floats in the text.
pub const OBJECT_REPLACEMENT_CHARACTER: char = '\u{FFFC}';

/// An atomic inline-level box (`inline-block`, a replaced element).
///
/// [§ 9.2.2](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
///
/// "An inline-level box that is not an inline box (such as replaced
/// inline-level elements, inline-block elements, and inline-table elements)
/// is called an atomic inline-level box because it participates in its
/// inline formatting context as a single opaque box."
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtomicBox {
    /// Content box size; padding, border and margin come from the item style.
    pub size: LogicalSize,
}

/// A floated box met inside inline content.
///
/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatBox {
    /// Which side the float goes to.
    pub side: FloatSide,
    /// Border-box inline size, `auto` if it needs content layout.
    pub inline_size: AutoOr,
    /// Border-box block size.
    pub block_size: f32,
}

/// What an item represents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum InlineItemType {
    /// A run of text sharing one style.
    Text,
    /// An unsplittable box laid out on its own.
    AtomicInline(AtomicBox),
    /// The start of an inline box.
    OpenTag,
    /// The end of an inline box.
    CloseTag,
    /// A preserved `\n` or `\t`.
    Control,
    /// An out-of-flow float.
    Float(FloatBox),
}

/// One unit of the flattened inline content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineItem {
    /// What the item is.
    pub item_type: InlineItemType,
    /// Start of the item in the node's text.
    pub start_offset: usize,
    /// End of the item in the node's text (exclusive).
    pub end_offset: usize,
    /// The item's own style. For text and control items this is the
    /// enclosing inline box; for tags, atomic inlines and floats it is the
    /// style of the box itself.
    pub style: StyleId,
    /// The innermost inline box open when the line breaker reaches this
    /// item. Equal to the parent for an open tag and to the closing box for a
    /// close tag.
    pub scope: StyleId,
    /// For open tags, whether this fragment of the box has its inline-start
    /// edge (false when the box continues from a previous fragment).
    pub has_start_edge: bool,
    /// For close tags, whether this fragment of the box has its inline-end
    /// edge.
    pub has_end_edge: bool,
}

impl InlineItem {
    /// Length of the item in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Returns `true` for zero-length items (tags).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Returns `true` for text items.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.item_type, InlineItemType::Text)
    }

    /// Panics unless `offset` lies inside the item.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not in `[start_offset, end_offset)`, or not
    /// equal to `start_offset` for a zero-length item.
    pub fn assert_offset(&self, offset: usize) {
        assert!(
            (self.start_offset <= offset && offset < self.end_offset)
                || (offset == self.start_offset && self.is_empty()),
            "offset {offset} is outside item {}..{}",
            self.start_offset,
            self.end_offset
        );
    }
}

/// The flattened content of an inline formatting context.
///
/// Built with [`InlineNodeBuilder`](crate::InlineNodeBuilder). Items tile
/// the text: each item starts where the previous one ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineNode {
    pub(crate) text: String,
    pub(crate) items: Vec<InlineItem>,
    pub(crate) styles: Vec<InlineStyle>,
    pub(crate) parents: Vec<Option<StyleId>>,
}

impl InlineNode {
    /// The whole text buffer.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All items in order.
    #[must_use]
    pub fn items(&self) -> &[InlineItem] {
        &self.items
    }

    /// The item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn item(&self, index: usize) -> &InlineItem {
        &self.items[index]
    }

    /// Returns `true` if the node has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The computed style for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued for this node.
    #[must_use]
    pub fn style(&self, id: StyleId) -> &InlineStyle {
        &self.styles[id.0]
    }

    /// The style of the block container.
    #[must_use]
    pub fn root_style(&self) -> &InlineStyle {
        self.style(StyleId::ROOT)
    }

    /// The inline box enclosing `id`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: StyleId) -> Option<StyleId> {
        self.parents[id.0]
    }

    /// The chain of inline boxes from the root down to `scope`.
    #[must_use]
    pub fn scope_chain(&self, scope: StyleId) -> Vec<StyleId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Panics unless `offset` lies inside item `item_index`.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of range or the offset is outside the
    /// item.
    pub fn assert_offset(&self, item_index: usize, offset: usize) {
        assert!(
            item_index < self.items.len(),
            "item index {item_index} is out of range for {} items",
            self.items.len()
        );
        self.items[item_index].assert_offset(offset);
    }

    /// The text an item covers.
    #[must_use]
    pub fn item_text(&self, item: &InlineItem) -> &str {
        &self.text[item.start_offset..item.end_offset]
    }

    /// A text item as a run for the shaper.
    #[must_use]
    pub fn text_run(&self, item: &InlineItem) -> TextRun<'_> {
        TextRun::new(
            &self.text,
            item.start_offset,
            item.end_offset,
            self.style(item.style).font_size,
        )
    }
}
