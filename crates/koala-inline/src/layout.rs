//! CSS Inline Layout and Line Box Model.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. Horizontal
//! margins, borders, and padding are respected between these boxes."
//!
//! [§ 10.8 Line height calculations: the 'line-height' and 'vertical-align' properties](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of the line box is determined by the rules given in the
//! section on line height calculations."
//!
//! [`InlineLayout`] drives a [`LineBreaker`] once per line and turns each
//! [`LineInfo`] into a positioned [`LineBox`].

use koala_common::warning::warn_once;
use serde::Serialize;

use crate::box_model::{LogicalOffset, Rect};
use crate::break_token::BreakToken;
use crate::container::LineBreakContext;
use crate::item::{InlineItemType, InlineNode};
use crate::line_breaker::LineBreaker;
use crate::result::{ItemResult, LineInfo};

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is called
/// a line box."
///
/// "The width of a line box is determined by a containing block and the
/// presence of floats."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBox {
    /// The bounding rectangle of this line box.
    pub bounds: Rect,

    /// Fragments laid out on this line.
    pub fragments: Vec<LineFragment>,

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// "The height of the line box is the distance between the uppermost
    /// box top and the lowermost box bottom."
    pub line_height: f32,

    /// The baseline position relative to the line box top.
    pub baseline: f32,

    /// The line ended with the content, at a forced break, or with an
    /// overflow that had nowhere to break.
    pub is_last_line: bool,

    /// The content is wider than the line box.
    pub has_overflow: bool,

    /// Where the following line starts, `None` after the last line.
    pub break_token: Option<BreakToken>,
}

/// A fragment of content placed on a line.
///
/// One inline box may produce several fragments if it wraps across lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFragment {
    /// The position and size of this fragment on the line.
    pub bounds: Rect,

    /// The content of this fragment.
    pub content: FragmentContent,
}

/// The content of a line fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FragmentContent {
    /// A run of text.
    Text {
        /// Index of the text item.
        item_index: usize,
        /// Start of the run in the node's text.
        start_offset: usize,
        /// End of the run in the node's text (exclusive).
        end_offset: usize,
        /// The characters of the run.
        text: String,
    },
    /// The start or end edge of an inline box (margin, border, padding).
    InlineBox {
        /// Index of the open or close tag.
        item_index: usize,
    },
    /// An atomic inline, margin box.
    AtomicInline {
        /// Index of the atomic inline item.
        item_index: usize,
    },
    /// The advance of a preserved tab.
    Tab {
        /// Index of the control item.
        item_index: usize,
    },
}

/// Inline formatting context that manages line box construction.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "In an inline formatting context, boxes are laid out horizontally, one
/// after the other, beginning at the top of a containing block."
#[derive(Debug, Clone, Default)]
pub struct InlineLayout {
    /// Completed line boxes.
    pub line_boxes: Vec<LineBox>,
    /// The top of the next line box, relative to the container's content box.
    pub current_y: f32,
}

impl InlineLayout {
    /// Create a new inline layout context.
    #[must_use]
    pub const fn new(start_y: f32) -> Self {
        Self {
            line_boxes: Vec::new(),
            current_y: start_y,
        }
    }

    /// Break all of `node` into line boxes.
    pub fn layout(&mut self, node: &InlineNode, ctx: &mut LineBreakContext<'_>) {
        let mut breaker = LineBreaker::new(node, None);
        loop {
            let content_offset = LogicalOffset::new(0.0, self.current_y);
            let Some(line) = breaker.next_line(ctx, content_offset) else {
                break;
            };

            // STEP 1: Position the line's fragments.
            let line_left = ctx.container.line_left(content_offset);
            let line_box = self.build_line_box(node, ctx, &line, line_left, breaker.break_token());

            if line_box.has_overflow {
                let _ = warn_once(
                    "Inline",
                    &format!(
                        "line {} overflows its {:.2}px width by {:.2}px",
                        self.line_boxes.len() + 1,
                        line.available_width.unwrap_or_default(),
                        line.inline_size() - line.available_width.unwrap_or_default()
                    ),
                );
            }

            // STEP 2: Advance to the next line. Floats that did not fit
            // beside this line go below it.
            self.current_y += line_box.line_height;
            self.line_boxes.push(line_box);
            ctx.container
                .position_pending_floats(LogicalOffset::new(0.0, self.current_y));
        }

        // Content made of floats alone never resolved the container.
        if ctx.container.has_unpositioned_floats() {
            let content_offset = LogicalOffset::new(0.0, self.current_y);
            let _ = ctx.container.resolve(content_offset);
            ctx.container.position_pending_floats(content_offset);
        }
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// "The height of the line box is the distance between the uppermost box
    /// top and the lowermost box bottom."
    fn build_line_box(
        &self,
        node: &InlineNode,
        ctx: &LineBreakContext<'_>,
        line: &LineInfo,
        line_left: f32,
        break_token: Option<BreakToken>,
    ) -> LineBox {
        let strut = ctx.shaper.line_height(node.style(line.line_style).font_size);
        let mut line_height = strut;
        let mut x = line_left;
        let mut fragments = Vec::new();

        for result in &line.results {
            let item = node.item(result.item_index);
            let content = match &item.item_type {
                InlineItemType::Text => {
                    line_height =
                        line_height.max(ctx.shaper.line_height(node.style(item.style).font_size));
                    Some(FragmentContent::Text {
                        item_index: result.item_index,
                        start_offset: result.start_offset,
                        end_offset: result.end_offset,
                        text: node.text()[result.start_offset..result.end_offset].to_string(),
                    })
                }
                InlineItemType::AtomicInline(_) => {
                    line_height = line_height.max(atomic_block_size(result));
                    Some(FragmentContent::AtomicInline {
                        item_index: result.item_index,
                    })
                }
                InlineItemType::OpenTag | InlineItemType::CloseTag if result.inline_size > 0.0 => {
                    Some(FragmentContent::InlineBox {
                        item_index: result.item_index,
                    })
                }
                InlineItemType::Control if result.inline_size > 0.0 => {
                    Some(FragmentContent::Tab {
                        item_index: result.item_index,
                    })
                }
                _ => None,
            };
            if let Some(content) = content {
                let height = if matches!(content, FragmentContent::AtomicInline { .. }) {
                    atomic_block_size(result)
                } else {
                    strut
                };
                fragments.push(LineFragment {
                    bounds: Rect {
                        x,
                        y: self.current_y,
                        width: result.inline_size,
                        height,
                    },
                    content,
                });
            }
            x += result.inline_size;
        }

        // Simplified: place baseline at 80% of line height (approximates
        // typical font metrics where ascender ≈ 80% of em square).
        let baseline = line_height * 0.8;

        LineBox {
            bounds: Rect {
                x: line_left,
                y: self.current_y,
                width: x - line_left,
                height: line_height,
            },
            fragments,
            line_height,
            baseline,
            is_last_line: line.is_last_line,
            has_overflow: line.has_overflow,
            break_token,
        }
    }

    /// Return the total height consumed by all completed line boxes.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.line_boxes.iter().map(|lb| lb.line_height).sum()
    }
}

/// Margin-box block size of an atomic inline result.
fn atomic_block_size(result: &ItemResult) -> f32 {
    result
        .layout_result
        .map_or(0.0, |fragment| fragment.block_size)
        + result.margins.block_sum()
}
