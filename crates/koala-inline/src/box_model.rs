//! Box model types used while breaking lines.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! Line breaking works in logical coordinates: the *inline* axis runs along
//! the line, the *block* axis from one line to the next. Only horizontal,
//! left-to-right writing is supported, so `inline-start` is the left edge and
//! `block-start` the top edge.

use std::ops::Add;

use serde::Serialize;

/// A rectangle positioned in 2D space.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// The bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Edge sizes for padding, border, or margin.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// All four edges zero.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// The same size on all four edges.
    #[must_use]
    pub const fn uniform(size: f32) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    /// Only the left and right edges.
    #[must_use]
    pub const fn horizontal(left: f32, right: f32) -> Self {
        Self {
            top: 0.0,
            right,
            bottom: 0.0,
            left,
        }
    }

    /// The edge at the start of the line.
    #[must_use]
    pub const fn inline_start(&self) -> f32 {
        self.left
    }

    /// The edge at the end of the line.
    #[must_use]
    pub const fn inline_end(&self) -> f32 {
        self.right
    }

    /// The edge facing the previous line.
    #[must_use]
    pub const fn block_start(&self) -> f32 {
        self.top
    }

    /// The edge facing the next line.
    #[must_use]
    pub const fn block_end(&self) -> f32 {
        self.bottom
    }

    /// `inline-start + inline-end`.
    #[must_use]
    pub fn inline_sum(&self) -> f32 {
        self.left + self.right
    }

    /// `block-start + block-end`.
    #[must_use]
    pub fn block_sum(&self) -> f32 {
        self.top + self.bottom
    }

    /// Returns `true` if every edge is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// A position relative to a container, in logical coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LogicalOffset {
    /// Offset along the line.
    pub inline_offset: f32,
    /// Offset across lines.
    pub block_offset: f32,
}

impl LogicalOffset {
    /// Create an offset.
    #[must_use]
    pub const fn new(inline_offset: f32, block_offset: f32) -> Self {
        Self {
            inline_offset,
            block_offset,
        }
    }
}

impl Add for LogicalOffset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            inline_offset: self.inline_offset + rhs.inline_offset,
            block_offset: self.block_offset + rhs.block_offset,
        }
    }
}

/// A size in logical coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LogicalSize {
    /// Size along the line.
    pub inline_size: f32,
    /// Size across lines.
    pub block_size: f32,
}

impl LogicalSize {
    /// Create a size.
    #[must_use]
    pub const fn new(inline_size: f32, block_size: f32) -> Self {
        Self {
            inline_size,
            block_size,
        }
    }
}
