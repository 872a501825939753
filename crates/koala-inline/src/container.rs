//! The collaborators the line breaker delegates to.
//!
//! The line breaker measures and decides; it never computes float geometry,
//! block positions or the layout of atomic boxes. Those come from the block
//! container the inline content sits in, through the traits here.
//! [`BlockContainer`](crate::BlockContainer) and [`IntrinsicAtomicLayout`]
//! are reference implementations.

use koala_text::{BreakOpportunityOracle, Shaper};
use serde::Serialize;

use crate::box_model::{EdgeSizes, LogicalOffset};
use crate::error::InlineError;
use crate::float::{FloatSide, PlacedFloat};
use crate::item::AtomicBox;
use crate::style::InlineStyle;
use crate::values::AutoOr;

/// The width a line is broken against.
///
/// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The width of a line box is determined by a containing block and the
/// presence of floats."
///
/// Until the container knows its block position, floats beside the line are
/// unknown and so is the width. Once resolved it stays resolved for the rest
/// of the line, though placing a float may narrow it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum AvailableWidth {
    /// The container's block position is not known yet.
    #[default]
    Unresolved,
    /// The width of the line.
    Resolved(f32),
}

impl AvailableWidth {
    /// The width, if resolved.
    #[must_use]
    pub const fn value(self) -> Option<f32> {
        match self {
            Self::Unresolved => None,
            Self::Resolved(width) => Some(width),
        }
    }

    /// Returns `true` once the width is known.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<Option<f32>> for AvailableWidth {
    fn from(width: Option<f32>) -> Self {
        width.map_or(Self::Unresolved, Self::Resolved)
    }
}

/// Resolves the block position of the container and the line width.
///
/// `content_offset` is the line's offset inside the container's content box.
pub trait AvailableWidthResolver {
    /// The line width if the container's block position is already known.
    fn try_resolve(&self, content_offset: LogicalOffset) -> Option<f32>;

    /// Fix the container's block position, positioning any floats waiting
    /// for it, and return the line width.
    fn resolve(&mut self, content_offset: LogicalOffset) -> f32;

    /// Where the line starts along the inline axis, after left floats.
    fn line_left(&self, _content_offset: LogicalOffset) -> f32 {
        0.0
    }
}

/// A float the line breaker met and handed to the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatRequest {
    /// Index of the float item.
    pub item_index: usize,
    /// Which side the float goes to.
    pub side: FloatSide,
    /// Border-box inline size.
    pub inline_size: AutoOr,
    /// Border-box block size.
    pub block_size: f32,
    /// The float's margins.
    pub margins: EdgeSizes,
}

/// Places floats met while breaking lines.
///
/// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// "The outer top of a floating box may not be higher than the outer top of
/// any block or floated box generated by an element earlier in the source
/// document."
///
/// That rule is why a float is deferred whenever an earlier one is still
/// waiting for a position.
pub trait FloatPositioner {
    /// The border-box inline size of a float.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::IndefiniteFloatSize`] if the size depends on
    /// layout that has not happened.
    fn float_inline_size(&self, request: &FloatRequest) -> Result<f32, InlineError>;

    /// Returns `true` if the float item was already deferred or placed.
    fn is_known(&self, item_index: usize) -> bool;

    /// Returns `true` while a deferred float waits for a position.
    fn has_unpositioned_floats(&self) -> bool;

    /// Keep a float for placement after the current line.
    fn defer(&mut self, request: FloatRequest);

    /// Place a float beside the current line. `None` if it cannot be placed
    /// now.
    fn try_place(
        &mut self,
        request: &FloatRequest,
        content_offset: LogicalOffset,
    ) -> Option<PlacedFloat>;

    /// The line width after a placement narrowed it.
    fn recompute_available_width(&self, content_offset: LogicalOffset) -> f32;

    /// Place every deferred float, in document order, at or below
    /// `content_offset`.
    fn position_pending_floats(&mut self, content_offset: LogicalOffset);
}

/// Everything the line breaker needs from its block container.
pub trait LineContainer: AvailableWidthResolver + FloatPositioner {}

impl<T: AvailableWidthResolver + FloatPositioner> LineContainer for T {}

/// The border box produced by laying out an atomic inline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoxFragment {
    /// Border-box inline size.
    pub inline_size: f32,
    /// Border-box block size.
    pub block_size: f32,
}

/// Lays out atomic inlines in their own formatting context.
pub trait AtomicLayout {
    /// Lay out `atomic` with its own `style`, shrink-to-fit.
    fn layout(&mut self, atomic: AtomicBox, style: &InlineStyle) -> BoxFragment;
}

/// Sizes atomic inlines from their content size, padding and border.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicAtomicLayout;

impl AtomicLayout for IntrinsicAtomicLayout {
    fn layout(&mut self, atomic: AtomicBox, style: &InlineStyle) -> BoxFragment {
        // [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
        //
        // "If 'height' and 'width' both have computed values of 'auto' and
        // the element also has an intrinsic width, then that intrinsic width
        // is the used value of 'width'."
        BoxFragment {
            inline_size: atomic.size.inline_size
                + style.padding.inline_sum()
                + style.border.inline_sum(),
            block_size: atomic.size.block_size
                + style.padding.block_sum()
                + style.border.block_sum(),
        }
    }
}

/// The collaborators borrowed for one call to
/// [`LineBreaker::next_line`](crate::LineBreaker::next_line).
pub struct LineBreakContext<'a> {
    /// Measures text.
    pub shaper: &'a dyn Shaper,
    /// Reports break opportunities; reconfigured on every scope change.
    pub oracle: &'a mut dyn BreakOpportunityOracle,
    /// The block container: width resolution and floats.
    pub container: &'a mut dyn LineContainer,
    /// Lays out atomic inlines.
    pub atomic_layout: &'a mut dyn AtomicLayout,
}
