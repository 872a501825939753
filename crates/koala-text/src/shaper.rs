//! Fitting text runs into an available width.
//!
//! [§ 5.5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
//!
//! The shaper answers one question for the line breaker: starting at an
//! offset inside a text run, what is the longest prefix ending at a break
//! opportunity that fits the given width, and how wide is it?

use serde::Serialize;

use crate::break_oracle::BreakOpportunityOracle;
use crate::metrics::FontMetrics;

/// The measured prefix of a text run.
///
/// * If `inline_size <= available_width`:
///   * `end_offset < run end`: the last break opportunity that fits.
///   * `end_offset == run end`: the whole remainder fits, or the first
///     opportunity lies at or beyond the end of the run.
/// * If `inline_size > available_width`: not even the first opportunity
///   fits; `end_offset` is that first opportunity (clamped to the run end).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeResult {
    /// Where the measured prefix starts.
    pub start_offset: usize,
    /// Where the measured prefix ends (exclusive).
    pub end_offset: usize,
    /// Advance width of `[start_offset, end_offset)`.
    pub inline_size: f32,
}

/// A text item's slice of the shared text buffer, with the font size it is
/// set in.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    /// The whole text buffer of the inline formatting context.
    pub text: &'a str,
    /// Start of the run in `text`.
    pub start: usize,
    /// End of the run in `text` (exclusive).
    pub end: usize,
    /// Font size used for measurement.
    pub font_size: f32,
}

impl<'a> TextRun<'a> {
    /// Create a run covering `text[start..end]`.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed or out of bounds.
    #[must_use]
    pub fn new(text: &'a str, start: usize, end: usize, font_size: f32) -> Self {
        assert!(
            start <= end && end <= text.len(),
            "text run {start}..{end} is outside a {}-byte buffer",
            text.len()
        );
        Self {
            text,
            start,
            end,
            font_size,
        }
    }

    /// The run's characters.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        &self.text[self.start..self.end]
    }
}

/// Measures text and finds the longest fitting prefix of a run.
///
/// Implementations must be monotonic: increasing `available_width` never
/// decreases the returned `end_offset`.
pub trait Shaper {
    /// Advance width of `text` at `font_size`.
    fn measure(&self, text: &str, font_size: f32) -> f32;

    /// Height of a line of text at `font_size`.
    fn line_height(&self, font_size: f32) -> f32;

    /// Advance width of a single space at `font_size`.
    fn space_width(&self, font_size: f32) -> f32 {
        self.measure(" ", font_size)
    }

    /// Measure `run` from `start` up to the last break opportunity that fits
    /// `available_width`. See [`ShapeResult`] for the meaning of the result.
    fn shape_line(
        &self,
        run: TextRun<'_>,
        start: usize,
        available_width: f32,
        oracle: &dyn BreakOpportunityOracle,
    ) -> ShapeResult;
}

/// A [`Shaper`] that sums advance widths from [`FontMetrics`] between break
/// opportunities. It does no glyph substitution, so a prefix is exactly as
/// wide as its characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsShaper<M> {
    metrics: M,
}

impl<M: FontMetrics> MetricsShaper<M> {
    /// Wrap font metrics.
    #[must_use]
    pub const fn new(metrics: M) -> Self {
        Self { metrics }
    }
}

impl<M: FontMetrics> Shaper for MetricsShaper<M> {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        self.metrics.text_width(text, font_size)
    }

    fn line_height(&self, font_size: f32) -> f32 {
        self.metrics.line_height(font_size)
    }

    fn space_width(&self, font_size: f32) -> f32 {
        self.metrics.space_width(font_size)
    }

    fn shape_line(
        &self,
        run: TextRun<'_>,
        start: usize,
        available_width: f32,
        oracle: &dyn BreakOpportunityOracle,
    ) -> ShapeResult {
        assert!(
            run.start <= start && start < run.end,
            "shape offset {start} is outside run {}..{}",
            run.start,
            run.end
        );

        // Walk opportunity to opportunity, accumulating width, until the
        // next segment no longer fits.
        let mut offset = start;
        let mut inline_size = 0.0;
        let mut has_break_opportunities = false;
        loop {
            let next_break = oracle
                .next_break_opportunity(offset + 1)
                .min(run.end)
                .max(offset + 1);
            let next_break = ceil_char_boundary(run.text, next_break, run.end);
            let next_inline_size =
                inline_size + self.measure(&run.text[offset..next_break], run.font_size);

            if next_inline_size > available_width {
                if !has_break_opportunities {
                    return ShapeResult {
                        start_offset: start,
                        end_offset: next_break,
                        inline_size: next_inline_size,
                    };
                }
                return ShapeResult {
                    start_offset: start,
                    end_offset: offset,
                    inline_size,
                };
            }
            if next_break >= run.end {
                return ShapeResult {
                    start_offset: start,
                    end_offset: next_break,
                    inline_size: next_inline_size,
                };
            }
            offset = next_break;
            inline_size = next_inline_size;
            has_break_opportunities = true;
        }
    }
}

/// Round `offset` up to the next character boundary, never past `limit`.
fn ceil_char_boundary(text: &str, mut offset: usize, limit: usize) -> usize {
    while offset < limit && !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}
