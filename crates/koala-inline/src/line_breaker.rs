//! The line breaking state machine.
//!
//! [§ 5.5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "When an inline box exceeds the width of a line box, it is split into
//! several boxes and these boxes are distributed across several line boxes."
//!
//! [`LineBreaker::next_line`] walks items from its cursor, adding each to the
//! line until one cannot fit or a forced break fires. The per-item decisions
//! drive a small state machine (`LineBreakState`); when a line ends up too
//! wide with no break after its last item, the overflow recovery in
//! `overflow.rs` scans the line backwards for a better place to cut.

use koala_common::warning::warn_once;
use koala_text::{BreakOpportunityOracle, ShapeResult, Shaper};

use crate::box_model::LogicalOffset;
use crate::break_token::BreakToken;
use crate::container::{AvailableWidth, FloatRequest, LineBreakContext};
use crate::item::{AtomicBox, FloatBox, InlineItem, InlineItemType, InlineNode};
use crate::result::{ItemResult, LineInfo};
use crate::scope::ScopeStack;
use crate::style::{InlineStyle, StyleId};

/// Whether the line may end after the items added so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineBreakState {
    /// The line may not end here.
    NotBreakable,
    /// The line may end here; if it is already too wide, recover.
    IsBreakable,
    /// A break inside a text item fits; end the line before the next item.
    BreakAfterTrailings,
    /// A preserved newline ends the line.
    ForcedBreak,
}

/// Produces lines one at a time from an [`InlineNode`].
///
/// ```
/// use koala_inline::{
///     BlockContainer, InlineNodeBuilder, InlineStyle, IntrinsicAtomicLayout,
///     LineBreakContext, LineBreaker, LogicalOffset,
/// };
/// use koala_text::{MetricsShaper, MonospaceMetrics, UnicodeBreakOracle};
///
/// let mut builder = InlineNodeBuilder::new(InlineStyle::default());
/// builder.append_text("Hello wide world");
/// let node = builder.finish().unwrap();
///
/// let shaper = MetricsShaper::new(MonospaceMetrics::new(1.0));
/// let mut oracle = UnicodeBreakOracle::new(node.text());
/// let mut container = BlockContainer::new(8.0);
/// let mut atomic_layout = IntrinsicAtomicLayout;
/// let mut ctx = LineBreakContext {
///     shaper: &shaper,
///     oracle: &mut oracle,
///     container: &mut container,
///     atomic_layout: &mut atomic_layout,
/// };
///
/// let mut breaker = LineBreaker::new(&node, None);
/// let mut lines = Vec::new();
/// while let Some(line) = breaker.next_line(&mut ctx, LogicalOffset::default()) {
///     lines.push(line.text(&node).concat());
/// }
/// assert_eq!(lines, ["Hello", "wide", "world"]);
/// ```
#[derive(Debug, Clone)]
pub struct LineBreaker<'a> {
    pub(crate) node: &'a InlineNode,
    pub(crate) item_index: usize,
    pub(crate) offset: usize,
    pub(crate) position: f32,
    pub(crate) auto_wrap: bool,
    scopes: ScopeStack,
}

impl<'a> LineBreaker<'a> {
    /// A line breaker starting at `break_token`, or at the start of the
    /// content if there is none.
    ///
    /// # Panics
    ///
    /// Panics if the token does not point inside an item of `node`.
    #[must_use]
    pub fn new(node: &'a InlineNode, break_token: Option<&BreakToken>) -> Self {
        let (item_index, offset) = break_token.map_or((0, 0), |token| {
            node.assert_offset(token.item_index(), token.text_offset());
            (token.item_index(), token.text_offset())
        });
        let mut breaker = Self {
            node,
            item_index,
            offset,
            position: 0.0,
            auto_wrap: node.root_style().auto_wrap(),
            scopes: ScopeStack::seeded(node, StyleId::ROOT),
        };
        breaker.reseed_scopes();
        breaker
    }

    /// The index of the item the next line starts in.
    #[must_use]
    pub const fn item_index(&self) -> usize {
        self.item_index
    }

    /// The text offset the next line starts at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Break the next line. `content_offset` is where the line sits in the
    /// container's content box; the container uses it to find floats beside
    /// the line.
    ///
    /// Returns `None` once the content is exhausted.
    pub fn next_line(
        &mut self,
        ctx: &mut LineBreakContext<'_>,
        content_offset: LogicalOffset,
    ) -> Option<LineInfo> {
        let mut line_info = LineInfo::new(StyleId::ROOT);
        let available_width = self.break_line(ctx, content_offset, &mut line_info);
        if !line_info.is_last_line && !line_info.results.is_empty() {
            self.hang_preserved_spaces(&mut line_info);
        }
        line_info.finish(available_width.value());

        // Trailing spaces hang past the end of the line; the next line starts
        // after them.
        let _ = self.skip_collapsible_whitespace();

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LINE] {} results, inline_size={:.2}, width={:?}, last={}, overflow={}, next={:?}",
            line_info.results.len(),
            line_info.inline_size(),
            line_info.available_width,
            line_info.is_last_line,
            line_info.has_overflow,
            self.break_token(),
        );

        if line_info.results.is_empty() {
            None
        } else {
            Some(line_info)
        }
    }

    /// Seed the scope stack from the item at the cursor.
    fn reseed_scopes(&mut self) {
        let scope = self
            .node
            .items()
            .get(self.item_index)
            .map_or(StyleId::ROOT, |item| item.scope);
        self.scopes = ScopeStack::seeded(self.node, scope);
    }

    fn break_line(
        &mut self,
        ctx: &mut LineBreakContext<'_>,
        content_offset: LogicalOffset,
        line_info: &mut LineInfo,
    ) -> AvailableWidth {
        let node = self.node;
        let items = node.items();
        line_info.results.clear();
        self.reseed_scopes();
        line_info.line_style = self.scopes.current();
        self.set_current_style(&mut *ctx.oracle, line_info.line_style);
        self.position = 0.0;
        let mut state = LineBreakState::NotBreakable;

        // The width is only known once the container has a block position.
        let mut available_width = AvailableWidth::from(ctx.container.try_resolve(content_offset));

        while self.item_index < items.len() {
            let item = &items[self.item_index];

            // A close tag never allows a break before it.
            if item.item_type == InlineItemType::CloseTag {
                let mut result = ItemResult::new(self.item_index, self.offset, item.end_offset);
                self.handle_close_tag(&mut *ctx.oracle, item, &mut result);
                line_info.results.push(result);
                continue;
            }

            if state == LineBreakState::BreakAfterTrailings {
                line_info.is_last_line = false;
                return available_width;
            }
            if state == LineBreakState::IsBreakable
                && let AvailableWidth::Resolved(width) = available_width
                && self.position > width
            {
                self.handle_overflow(ctx, width, line_info);
                return available_width;
            }

            // Items with inline size resolve the container's block position.
            // Tags and floats do not; a float met first is deferred.
            let has_inline_size = matches!(
                item.item_type,
                InlineItemType::Text | InlineItemType::AtomicInline(_) | InlineItemType::Control
            );
            if has_inline_size && !available_width.is_resolved() {
                available_width = AvailableWidth::Resolved(ctx.container.resolve(content_offset));
            }

            let mut result = ItemResult::new(self.item_index, self.offset, item.end_offset);
            match &item.item_type {
                InlineItemType::Text => {
                    // Resolved above.
                    let width = available_width.value().unwrap_or(f32::INFINITY);
                    state = self.handle_text(ctx, item, width, &mut result);
                }
                InlineItemType::AtomicInline(atomic) => {
                    state = self.handle_atomic_inline(ctx, item, *atomic, &mut result);
                }
                InlineItemType::Control => {
                    state = self.handle_control(ctx.shaper, item, &mut result);
                    if state == LineBreakState::ForcedBreak {
                        line_info.results.push(result);
                        line_info.is_last_line = true;
                        return available_width;
                    }
                }
                InlineItemType::OpenTag => {
                    self.handle_open_tag(&mut *ctx.oracle, item, &mut result);
                    state = LineBreakState::NotBreakable;
                }
                InlineItemType::Float(float_box) => {
                    // Floats are recorded by the container, not on the line.
                    self.handle_float(ctx, item, float_box, content_offset, &mut available_width);
                    continue;
                }
                InlineItemType::CloseTag => unreachable!("close tags are handled before dispatch"),
            }
            line_info.results.push(result);
        }

        if state == LineBreakState::IsBreakable
            && let AvailableWidth::Resolved(width) = available_width
            && self.position > width
        {
            self.handle_overflow(ctx, width, line_info);
            return available_width;
        }
        line_info.is_last_line = true;
        available_width
    }

    fn handle_text(
        &mut self,
        ctx: &mut LineBreakContext<'_>,
        item: &InlineItem,
        available_width: f32,
        result: &mut ItemResult,
    ) -> LineBreakState {
        debug_assert!(item.is_text());

        // At the start of the item, try to add all of it.
        if self.offset == item.start_offset {
            let run = self.node.text_run(item);
            result.inline_size = ctx.shaper.measure(run.as_str(), run.font_size);
            let next_position = self.position + result.inline_size;
            if !self.auto_wrap || next_position <= available_width {
                result.shape_result = Some(ShapeResult {
                    start_offset: item.start_offset,
                    end_offset: item.end_offset,
                    inline_size: result.inline_size,
                });
                self.position = next_position;
                self.move_to_next_of(item);
                if self.auto_wrap && ctx.oracle.is_breakable(item.end_offset) {
                    return LineBreakState::IsBreakable;
                }
                result.prohibit_break_after = true;
                return LineBreakState::NotBreakable;
            }
        }

        if self.auto_wrap {
            // Try to break inside the item.
            Self::break_text(ctx, self.node, result, item, available_width - self.position);
            self.position += result.inline_size;

            let is_overflow = self.position > available_width;
            result.no_break_opportunities_inside = is_overflow;
            if result.end_offset < item.end_offset {
                self.offset = result.end_offset;
                return if is_overflow {
                    LineBreakState::IsBreakable
                } else {
                    LineBreakState::BreakAfterTrailings
                };
            }
            self.move_to_next_of(item);
            return if result.prohibit_break_after {
                LineBreakState::NotBreakable
            } else {
                LineBreakState::IsBreakable
            };
        }

        // Without wrapping the rest of the item goes on the line. It starts
        // mid-run, so measure it again with no width limit.
        debug_assert_ne!(self.offset, item.start_offset);
        Self::break_text(ctx, self.node, result, item, f32::INFINITY);
        debug_assert_eq!(result.end_offset, item.end_offset);
        result.no_break_opportunities_inside = true;
        result.prohibit_break_after = true;
        self.position += result.inline_size;
        self.move_to_next_of(item);
        LineBreakState::NotBreakable
    }

    /// Measure `item` from `result.start_offset` up to the last break
    /// opportunity that fits `available_width`.
    ///
    /// * If the width fits and `end_offset` is inside the item, a break
    ///   opportunity that fits was found.
    /// * If the width fits and `end_offset` is the item end, the whole rest
    ///   fits, or the first opportunity is at or beyond the end.
    /// * If the width does not fit, `end_offset` is the first opportunity.
    pub(crate) fn break_text(
        ctx: &LineBreakContext<'_>,
        node: &InlineNode,
        result: &mut ItemResult,
        item: &InlineItem,
        available_width: f32,
    ) {
        debug_assert!(item.is_text());
        item.assert_offset(result.start_offset);

        let shape = ctx.shaper.shape_line(
            node.text_run(item),
            result.start_offset,
            available_width.max(0.0),
            &*ctx.oracle,
        );
        result.end_offset = shape.end_offset;
        result.inline_size = shape.inline_size;
        result.shape_result = Some(shape);
        debug_assert!(result.end_offset > result.start_offset);

        result.prohibit_break_after = if result.end_offset < item.end_offset {
            false
        } else {
            debug_assert_eq!(result.end_offset, item.end_offset);
            !ctx.oracle.is_breakable(result.end_offset)
        };
    }

    /// Newlines and tabs affect layout like text but need no shaping.
    fn handle_control(
        &mut self,
        shaper: &dyn Shaper,
        item: &InlineItem,
        result: &mut ItemResult,
    ) -> LineBreakState {
        debug_assert_eq!(item.len(), 1);
        if self.node.item_text(item) == "\n" {
            self.move_to_next_of(item);
            return LineBreakState::ForcedBreak;
        }

        debug_assert_eq!(self.node.item_text(item), "\t");
        result.inline_size = tab_width(shaper, self.node.style(item.style), self.position);
        self.position += result.inline_size;
        self.move_to_next_of(item);
        LineBreakState::IsBreakable
    }

    fn handle_atomic_inline(
        &mut self,
        ctx: &mut LineBreakContext<'_>,
        item: &InlineItem,
        atomic: AtomicBox,
        result: &mut ItemResult,
    ) -> LineBreakState {
        // [§ 10.3.9 'Inline-block', non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
        //
        // "If 'width' is 'auto', the used value is the shrink-to-fit width
        // as for floating elements."
        let style = self.node.style(item.style);
        let fragment = ctx.atomic_layout.layout(atomic, style);
        result.layout_result = Some(fragment);
        result.margins = style.margin;
        result.inline_size = fragment.inline_size + style.margin.inline_sum();

        self.position += result.inline_size;
        self.move_to_next_of(item);
        if self.auto_wrap {
            return LineBreakState::IsBreakable;
        }
        result.prohibit_break_after = true;
        LineBreakState::NotBreakable
    }

    /// Size a float and place it beside the line if it fits.
    ///
    /// A float is deferred if the line width is not known yet, if it does
    /// not fit the rest of the line, or if an earlier float is still waiting:
    /// a float may not be placed higher than one before it.
    fn handle_float(
        &mut self,
        ctx: &mut LineBreakContext<'_>,
        item: &InlineItem,
        float_box: &FloatBox,
        content_offset: LogicalOffset,
        available_width: &mut AvailableWidth,
    ) {
        // A float met by a line that was later rewound is already placed or
        // waiting.
        if ctx.container.is_known(self.item_index) {
            self.move_to_next_of(item);
            return;
        }

        let request = FloatRequest {
            item_index: self.item_index,
            side: float_box.side,
            inline_size: float_box.inline_size,
            block_size: float_box.block_size,
            margins: self.node.style(item.style).margin,
        };
        let inline_size = match ctx.container.float_inline_size(&request) {
            Ok(inline_size) => Some(inline_size),
            Err(err) => {
                let _ = warn_once("Float", &err.to_string());
                None
            }
        };

        let fits = match (inline_size, available_width.value()) {
            (Some(inline_size), Some(width)) => {
                self.position + inline_size + request.margins.inline_sum() <= width
            }
            _ => false,
        };
        let placed = if fits && !ctx.container.has_unpositioned_floats() {
            ctx.container.try_place(&request, content_offset)
        } else {
            None
        };

        match placed {
            Some(_placed) => {
                #[cfg(feature = "layout-trace")]
                eprintln!(
                    "[FLOAT] item {} placed at {:?}",
                    _placed.item_index, _placed.margin_box
                );
                // The float took room beside the line.
                *available_width =
                    AvailableWidth::Resolved(ctx.container.recompute_available_width(content_offset));
            }
            None => {
                #[cfg(feature = "layout-trace")]
                eprintln!("[FLOAT] item {} deferred", request.item_index);
                ctx.container.defer(request);
            }
        }
        self.move_to_next_of(item);
    }

    fn handle_open_tag(
        &mut self,
        oracle: &mut dyn BreakOpportunityOracle,
        item: &InlineItem,
        result: &mut ItemResult,
    ) {
        // [§ 8.6 The box model for inline elements in bidirectional context](https://www.w3.org/TR/CSS2/box.html#bidi-box-model)
        //
        // "For each line box, UAs must take the inline boxes generated for
        // each element and render the margins, borders and padding in visual
        // order (not logical order)."
        let style = self.node.style(item.style);
        if style.has_border() || style.has_padding() || (style.has_margin() && item.has_start_edge) {
            result.borders_paddings_block_start =
                style.border.block_start() + style.padding.block_start();
            result.borders_paddings_block_end = style.border.block_end() + style.padding.block_end();
            if item.has_start_edge {
                result.margins = style.margin;
                result.inline_size = style.margin.inline_start()
                    + style.border.inline_start()
                    + style.padding.inline_start();
                self.position += result.inline_size;
            }
        }
        self.scopes.push(item.style);
        self.set_current_style(oracle, item.style);
        self.move_to_next_of(item);
    }

    fn handle_close_tag(
        &mut self,
        oracle: &mut dyn BreakOpportunityOracle,
        item: &InlineItem,
        result: &mut ItemResult,
    ) {
        if item.has_end_edge {
            let style = self.node.style(item.style);
            result.margins = style.margin;
            result.inline_size =
                style.margin.inline_end() + style.border.inline_end() + style.padding.inline_end();
            self.position += result.inline_size;
        }
        let parent = self.scopes.pop(item.style);
        self.set_current_style(oracle, parent);
        self.move_to_next_of(item);
    }

    /// Make `scope` the active style: wrapping, and the oracle's rules.
    pub(crate) fn set_current_style(&mut self, oracle: &mut dyn BreakOpportunityOracle, scope: StyleId) {
        let style = self.node.style(scope);
        self.auto_wrap = style.auto_wrap();
        if self.auto_wrap {
            configure_oracle(oracle, style);
        }
    }

    pub(crate) fn move_to_next_of(&mut self, item: &InlineItem) {
        debug_assert!(std::ptr::eq(item, &self.node.items()[self.item_index]));
        self.offset = item.end_offset;
        self.item_index += 1;
    }

    /// Move the cursor to the end of `result`.
    pub(crate) fn move_to_next_of_result(&mut self, result: &ItemResult) {
        self.offset = result.end_offset;
        self.item_index = result.item_index;
        if self.offset == self.node.item(result.item_index).end_offset {
            self.item_index += 1;
        }
    }

    /// Skip a collapsible space at the cursor. Returns `true` if one was
    /// skipped.
    ///
    /// [§ 4.1.3 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "A sequence of collapsible spaces at the beginning of a line is
    /// removed."
    ///
    /// The builder collapses every run to a single space, so one skip
    /// removes them all and a second skip is a no-op.
    pub fn skip_collapsible_whitespace(&mut self) -> bool {
        let Some(item) = self.node.items().get(self.item_index) else {
            return false;
        };
        if !item.is_text() || !self.node.style(item.style).white_space.collapse_white_space() {
            return false;
        }

        debug_assert!(self.offset < item.end_offset);
        if self.node.text().as_bytes().get(self.offset) != Some(&b' ') {
            return false;
        }
        self.offset += 1;
        if self.offset == item.end_offset {
            self.item_index += 1;
        }
        true
    }

    /// Put the preserved spaces at the cursor on the line that just ended.
    ///
    /// [§ 4.1.3 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "If white-space is set to pre-wrap, the UA must (unconditionally)
    /// hang this sequence, unless the sequence is followed by a forced line
    /// break."
    ///
    /// Break opportunities sit before space runs; the spaces after the break
    /// go on the ending line and add no inline size.
    fn hang_preserved_spaces(&mut self, line_info: &mut LineInfo) {
        let node = self.node;
        let text = node.text().as_bytes();
        while let Some(item) = node.items().get(self.item_index) {
            let white_space = node.style(item.style).white_space;
            if !item.is_text() || !white_space.auto_wrap() || white_space.collapse_white_space() {
                break;
            }
            let spaces = text[self.offset..item.end_offset]
                .iter()
                .take_while(|&&byte| byte == b' ')
                .count();
            if spaces == 0 {
                break;
            }
            let end_offset = self.offset + spaces;
            line_info
                .results
                .push(ItemResult::new(self.item_index, self.offset, end_offset));
            if end_offset < item.end_offset {
                self.offset = end_offset;
                break;
            }
            self.move_to_next_of(item);
        }
        if self.item_index >= node.items().len() {
            line_info.is_last_line = true;
        }
    }

    /// Where the next line starts, or `None` if the content is exhausted.
    #[must_use]
    pub fn break_token(&self) -> Option<BreakToken> {
        (self.item_index < self.node.items().len())
            .then_some(BreakToken::new(self.item_index, self.offset))
    }
}

/// Apply the break rules of `style` to the oracle.
pub(crate) fn configure_oracle(oracle: &mut dyn BreakOpportunityOracle, style: &InlineStyle) {
    oracle.set_mode(style.word_break.line_break_mode(), style.locale.as_deref());
}

/// [§ 4.2 Tab Character Size: the tab-size property](https://www.w3.org/TR/css-text-3/#tab-size-property)
///
/// "Tab characters are rendered as a horizontal shift that lines up the
/// start edge of the next glyph with the next tab stop. If this distance is
/// less than 0.5ch, then the subsequent tab stop is used instead."
///
/// Tab stops are `tab-size` space advances apart, measured from the start
/// of the line.
fn tab_width(shaper: &dyn Shaper, style: &InlineStyle, position: f32) -> f32 {
    let space_width = shaper.space_width(style.font_size);
    let tab_stop = space_width * style.tab_size as f32;
    if tab_stop <= 0.0 {
        return 0.0;
    }
    let mut distance = tab_stop - position.rem_euclid(tab_stop);
    if distance < space_width / 2.0 {
        distance += tab_stop;
    }
    distance
}
