//! Inline line breaking for the Koala renderer.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! The content of an inline formatting context is flattened into an
//! [`InlineNode`]: one text buffer plus a list of [`InlineItem`]s (text runs,
//! atomic inlines, open/close tags, control characters, floats). A
//! [`LineBreaker`] walks those items and produces one [`LineInfo`] per call,
//! stopping where the line must end. The [`BreakToken`] it leaves behind is
//! all that is needed to produce the next line, so every line can be
//! recomputed independently.
//!
//! # Relevant Specifications
//!
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - edge sizes, rectangles and logical offsets
//! - [`values`] - auto-or-length values
//! - [`style`] - the inline style properties line breaking depends on
//! - [`item`] - inline items and the inline node
//! - [`builder`] - building an inline node from styled content
//! - [`result`] - per-item results and line info
//! - [`break_token`] - resumption cursor between lines
//! - [`container`] - the collaborators the line breaker delegates to
//! - [`float`] - float placement and a reference block container
//! - [`line_breaker`] - the line breaking state machine
//! - [`layout`] - a driver that turns lines into positioned line boxes
//! - [`error`] - recoverable errors

pub mod box_model;
pub mod break_token;
pub mod builder;
pub mod container;
pub mod error;
pub mod float;
pub mod item;
pub mod layout;
pub mod line_breaker;
mod overflow;
pub mod result;
mod scope;
pub mod style;
pub mod values;

// Re-exports for convenience
pub use box_model::{EdgeSizes, LogicalOffset, LogicalSize, Rect};
pub use break_token::BreakToken;
pub use builder::InlineNodeBuilder;
pub use container::{
    AtomicLayout, AvailableWidth, AvailableWidthResolver, BoxFragment, FloatPositioner,
    FloatRequest, IntrinsicAtomicLayout, LineBreakContext, LineContainer,
};
pub use error::InlineError;
pub use float::{BlockContainer, FloatContext, FloatSide, PlacedFloat};
pub use item::{AtomicBox, FloatBox, InlineItem, InlineItemType, InlineNode};
pub use layout::{FragmentContent, InlineLayout, LineBox, LineFragment};
pub use line_breaker::LineBreaker;
pub use result::{ItemResult, ItemResults, LineInfo};
pub use style::{InlineStyle, StyleId, WhiteSpace, WordBreak};
pub use values::AutoOr;
