//! Recovering from a line that does not fit.
//!
//! [§ 5.5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
//!
//! "If the content cannot be broken at any allowed break point, it
//! overflows the line box."
//!
//! Overflow recovery runs when the line is wider than its available width
//! and the last item offered no usable break. It walks the line's results
//! backwards, giving back each result's width, and cuts at the first place
//! that both allows a break and fits.

use crate::container::LineBreakContext;
use crate::item::InlineItemType;
use crate::line_breaker::{LineBreaker, configure_oracle};
use crate::result::{ItemResult, LineInfo};

/// Slack when re-measuring a text item whose end margin did not fit, so the
/// re-measured break lands strictly before the item end.
pub(crate) const LAYOUT_EPSILON: f32 = 1.0 / 64.0;

impl LineBreaker<'_> {
    /// Cut the line at the best break before the overflow, or accept it.
    ///
    /// On entry the results do not fit `available_width` and the last one
    /// has no break opportunity inside it.
    pub(crate) fn handle_overflow(
        &mut self,
        ctx: &mut LineBreakContext<'_>,
        available_width: f32,
        line_info: &mut LineInfo,
    ) {
        let node = self.node;
        let items = node.items();
        let mut rewind_width = available_width - self.position;
        debug_assert!(rewind_width < 0.0);

        // The earliest break found that does not fit, used if nothing fits.
        let mut break_before = 0;
        let mut break_before_trial: Option<ItemResult> = None;
        // A break before the item after the current one, allowed if the
        // current one allows a break after it.
        let mut break_before_if_before_allow = 0;
        let mut rewind_width_if_before_allow = 0.0;
        let mut last_item_prohibits_break_before = true;

        for i in (0..line_info.results.len()).rev() {
            let result = &line_info.results[i];
            let item = &items[result.item_index];
            rewind_width += result.inline_size;

            match item.item_type {
                InlineItemType::Text | InlineItemType::AtomicInline(_) => {
                    // STEP 1: Try to break inside this item. Measure a copy
                    // so a failed attempt leaves the result on the line
                    // intact.
                    let style = node.style(item.style);
                    if item.is_text()
                        && style.auto_wrap()
                        && rewind_width >= 0.0
                        && !result.no_break_opportunities_inside
                    {
                        // When the text fits but its end margin does not,
                        // the break must land before the item end.
                        let item_available_width =
                            rewind_width.min(result.inline_size - LAYOUT_EPSILON);
                        let mut trial = result.clone();
                        configure_oracle(&mut *ctx.oracle, style);
                        Self::break_text(ctx, node, &mut trial, item, item_available_width);
                        if trial.inline_size <= item_available_width {
                            debug_assert!(trial.end_offset < item.end_offset);
                            debug_assert!(!trial.prohibit_break_after);
                            line_info.results[i] = trial;
                            self.rewind(line_info, i + 1);
                            return;
                        }
                        if !trial.prohibit_break_after && !last_item_prohibits_break_before {
                            break_before = i + 1;
                            break_before_trial = Some(trial);
                        }
                    }

                    // STEP 2: Try to break after this item.
                    let result = &line_info.results[i];
                    if break_before_if_before_allow != 0 && !result.prohibit_break_after {
                        if rewind_width_if_before_allow >= 0.0 {
                            self.rewind(line_info, break_before_if_before_allow);
                            return;
                        }
                        break_before = break_before_if_before_allow;
                        break_before_trial = None;
                    }

                    // Otherwise the break before this item is a candidate.
                    break_before_if_before_allow = i;
                    rewind_width_if_before_allow = rewind_width;
                    last_item_prohibits_break_before = false;
                }
                InlineItemType::CloseTag => last_item_prohibits_break_before = true,
                _ => {
                    // Tags and controls move the candidate break before them.
                    if i + 1 == break_before_if_before_allow {
                        break_before_if_before_allow = i;
                        rewind_width_if_before_allow = rewind_width;
                    }
                    last_item_prohibits_break_before = false;
                }
            }
        }

        // STEP 3: Nothing fits. Let the line overflow, but stop at the first
        // break opportunity if there is one.
        if break_before != 0 {
            if let Some(trial) = break_before_trial {
                line_info.results[break_before - 1] = trial;
            }
            self.rewind(line_info, break_before);
            return;
        }
        line_info.is_last_line = self.item_index >= items.len();
    }

    /// Truncate the line to its first `new_end` results and move the cursor
    /// to the end of the last one kept.
    pub(crate) fn rewind(&mut self, line_info: &mut LineInfo, new_end: usize) {
        debug_assert!(new_end > 0);
        line_info.results.truncate(new_end);

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[REWIND] kept {new_end} results, discarded {}",
            line_info.results.discarded().len()
        );

        if let Some(last) = line_info.results.last() {
            self.move_to_next_of_result(last);
        }
        debug_assert!(self.item_index < self.node.items().len());
        line_info.is_last_line = false;
    }
}
