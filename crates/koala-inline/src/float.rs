//! Float placement and a reference block container.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! "A floated box is shifted to the left or right until its outer edge touches
//! the containing block edge or the outer edge of another float."

use std::collections::HashSet;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::box_model::{LogicalOffset, Rect};
use crate::container::{AvailableWidthResolver, FloatPositioner, FloatRequest};
use crate::error::InlineError;

/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Values have the following meanings:
///
/// left
///   The element generates a block box that is floated to the left.
///
/// right
///   The element generates a block box that is floated to the right."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FloatSide {
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// A float that has been placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedFloat {
    /// Index of the float item.
    pub item_index: usize,
    /// Which side this float is on.
    pub side: FloatSide,
    /// The margin box of the float, in container coordinates.
    pub margin_box: Rect,
}

/// Tracks placed floats within a block formatting context.
///
/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Since a float is not in the flow, non-positioned block boxes created
/// before and after the float box flow vertically as if the float did not
/// exist. However, the current and subsequent line boxes created next to
/// the float are shortened as necessary to make room for the margin box
/// of the float."
#[derive(Debug, Clone)]
pub struct FloatContext {
    floats: Vec<PlacedFloat>,
    containing_width: f32,
}

impl FloatContext {
    /// Create a new float context for a containing block.
    #[must_use]
    pub const fn new(containing_width: f32) -> Self {
        Self {
            floats: Vec::new(),
            containing_width,
        }
    }

    /// Placed floats in placement order.
    #[must_use]
    pub fn floats(&self) -> &[PlacedFloat] {
        &self.floats
    }

    /// Return the maximum bottom edge of all placed floats.
    ///
    /// [§ 10.6.7](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "If the element has any floating descendants whose bottom margin edge
    /// is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn max_float_bottom(&self) -> f32 {
        self.floats
            .iter()
            .map(|f| f.margin_box.bottom())
            .fold(0.0_f32, f32::max)
    }

    /// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Place a float with a margin box of `width` x `height` at or below
    /// `current_y`.
    ///
    /// - Rule 1: Float cannot extend past containing block edges.
    /// - Rules 4, 5, 8: Float is placed as high as possible (at or below `current_y`).
    /// - Rule 9: Left floats go as far left as possible; right floats as far right.
    /// - Rules 2, 3, 7: Floats do not overlap each other.
    pub fn place_float(
        &mut self,
        item_index: usize,
        side: FloatSide,
        width: f32,
        height: f32,
        current_y: f32,
    ) -> PlacedFloat {
        // STEP 1: Start at the highest allowed position.
        // [§ 9.5.1 Rule 8](https://www.w3.org/TR/CSS2/visuren.html#float-position)
        //
        // "A floating box must be placed as high as possible."
        let mut y = current_y.max(0.0);

        // STEP 2: Scan downward, one float bottom at a time, until the band
        // is wide enough. A float wider than the containing block is placed
        // where no other float is beside it, or at the lowest band.
        let (left_offset, avail_width) = loop {
            let (left_offset, avail_width) = self.available_width_at(y, height);
            if avail_width >= width || avail_width >= self.containing_width {
                break (left_offset, avail_width);
            }
            let next_y = self.next_float_bottom_after(y);
            if next_y <= y {
                break (left_offset, avail_width);
            }
            y = next_y;
        };

        // STEP 3: Place the float.
        // [§ 9.5.1 Rule 9](https://www.w3.org/TR/CSS2/visuren.html#float-position)
        //
        // "A left-floating box must be put as far to the left as possible,
        // a right-floating box as far to the right as possible."
        let x = match side {
            FloatSide::Left => left_offset,
            FloatSide::Right => (left_offset + avail_width - width).max(0.0),
        };
        let placed = PlacedFloat {
            item_index,
            side,
            margin_box: Rect {
                x,
                y,
                width,
                height,
            },
        };
        self.floats.push(placed);
        placed
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float are
    /// shortened as necessary to make room for the margin box of the float."
    ///
    /// Returns `(left_offset, available_width)` for the band
    /// `[y, y + height)`. A float is active in the band if its margin box
    /// vertically overlaps it.
    #[must_use]
    pub fn available_width_at(&self, y: f32, height: f32) -> (f32, f32) {
        let band_bottom = y + height;
        let active = self
            .floats
            .iter()
            .filter(|f| f.margin_box.y < band_bottom && f.margin_box.bottom() > y);

        let mut left_edge: f32 = 0.0;
        let mut right_edge: f32 = self.containing_width;
        for f in active {
            match f.side {
                FloatSide::Left => left_edge = left_edge.max(f.margin_box.right()),
                FloatSide::Right => right_edge = right_edge.min(f.margin_box.x),
            }
        }
        (left_edge, (right_edge - left_edge).max(0.0))
    }

    /// The smallest float bottom edge strictly below `y`, or `y` itself if
    /// there is none.
    fn next_float_bottom_after(&self, y: f32) -> f32 {
        self.floats
            .iter()
            .map(|f| f.margin_box.bottom())
            .filter(|&bottom| bottom > y)
            .reduce(f32::min)
            .unwrap_or(y)
    }
}

/// A block container holding one inline formatting context.
///
/// Resolves its block position the first time a line needs a width, sizes
/// and places floats, and keeps floats that could not be placed beside the
/// line that met them until the driver asks for them to be positioned.
#[derive(Debug, Clone)]
pub struct BlockContainer {
    floats: FloatContext,
    constraint_block_offset: f32,
    block_offset: Option<f32>,
    line_height_hint: f32,
    unpositioned: Vec<FloatRequest>,
    known: HashSet<usize>,
}

impl BlockContainer {
    /// A container `width` wide whose block position is not known yet. It
    /// resolves to block offset 0.
    #[must_use]
    pub fn new(width: f32) -> Self {
        Self {
            floats: FloatContext::new(width),
            constraint_block_offset: 0.0,
            block_offset: None,
            line_height_hint: 1.0,
            unpositioned: Vec::new(),
            known: HashSet::new(),
        }
    }

    /// A container whose block position is already `block_offset`.
    #[must_use]
    pub fn with_resolved_offset(width: f32, block_offset: f32) -> Self {
        let mut container = Self::new(width);
        container.constraint_block_offset = block_offset;
        container.block_offset = Some(block_offset);
        container
    }

    /// Set the height of the band used to find floats beside a line.
    #[must_use]
    pub const fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height_hint = line_height;
        self
    }

    /// The resolved block position, if any.
    #[must_use]
    pub const fn block_offset(&self) -> Option<f32> {
        self.block_offset
    }

    /// The placed floats, in placement order.
    #[must_use]
    pub fn positioned_floats(&self) -> &[PlacedFloat] {
        self.floats.floats()
    }

    /// Floats waiting for a position.
    #[must_use]
    pub fn unpositioned_floats(&self) -> &[FloatRequest] {
        &self.unpositioned
    }

    fn band_top(&self, content_offset: LogicalOffset) -> f32 {
        self.block_offset.unwrap_or(self.constraint_block_offset) + content_offset.block_offset
    }

    fn opportunity(&self, content_offset: LogicalOffset) -> (f32, f32) {
        self.floats
            .available_width_at(self.band_top(content_offset), self.line_height_hint)
    }

    fn place(&mut self, request: &FloatRequest, y: f32) -> PlacedFloat {
        // A float whose size could not be computed takes no room.
        let inline_size = request.inline_size.length().unwrap_or(0.0);
        let placed = self.floats.place_float(
            request.item_index,
            request.side,
            inline_size + request.margins.inline_sum(),
            request.block_size + request.margins.block_sum(),
            y,
        );
        let _ = self.known.insert(request.item_index);
        placed
    }
}

impl AvailableWidthResolver for BlockContainer {
    fn try_resolve(&self, content_offset: LogicalOffset) -> Option<f32> {
        self.block_offset
            .map(|_| self.opportunity(content_offset).1)
    }

    fn resolve(&mut self, content_offset: LogicalOffset) -> f32 {
        if self.block_offset.is_none() {
            self.block_offset = Some(self.constraint_block_offset);
            self.position_pending_floats(content_offset);
        }
        self.opportunity(content_offset).1
    }

    fn line_left(&self, content_offset: LogicalOffset) -> f32 {
        self.opportunity(content_offset).0
    }
}

impl FloatPositioner for BlockContainer {
    fn float_inline_size(&self, request: &FloatRequest) -> Result<f32, InlineError> {
        request
            .inline_size
            .length()
            .ok_or(InlineError::IndefiniteFloatSize {
                item_index: request.item_index,
            })
    }

    fn is_known(&self, item_index: usize) -> bool {
        self.known.contains(&item_index)
    }

    fn has_unpositioned_floats(&self) -> bool {
        !self.unpositioned.is_empty()
    }

    fn defer(&mut self, request: FloatRequest) {
        let _ = self.known.insert(request.item_index);
        self.unpositioned.push(request);
    }

    fn try_place(
        &mut self,
        request: &FloatRequest,
        content_offset: LogicalOffset,
    ) -> Option<PlacedFloat> {
        if self.block_offset.is_none() {
            return None;
        }
        let y = self.band_top(content_offset);
        Some(self.place(request, y))
    }

    fn recompute_available_width(&self, content_offset: LogicalOffset) -> f32 {
        self.opportunity(content_offset).1
    }

    fn position_pending_floats(&mut self, content_offset: LogicalOffset) {
        if self.block_offset.is_none() {
            return;
        }
        let y = self.band_top(content_offset);
        for request in std::mem::take(&mut self.unpositioned) {
            let _ = self.place(&request, y);
        }
    }
}
