//! Font metrics for text measurement during line breaking.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use fontdue::Font;

/// Font metrics interface for text measurement during layout.
///
/// Implementors provide the per-glyph advance widths and line height values
/// needed for inline layout. [`crate::MetricsShaper`] calls these methods to
/// measure candidate line prefixes.
pub trait FontMetrics {
    /// Measure the total advance width of a text string at the given font size.
    ///
    /// This should sum the advance width of each glyph in the string,
    /// matching the cursor advancement used during text rendering.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Calculate the line height for a given font size.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font_size: f32) -> f32;

    /// Advance width of a single space, the unit tab stops are measured in.
    fn space_width(&self, font_size: f32) -> f32 {
        self.text_width(" ", font_size)
    }
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        (**self).text_width(text, font_size)
    }

    fn line_height(&self, font_size: f32) -> f32 {
        (**self).line_height(font_size)
    }

    fn space_width(&self, font_size: f32) -> f32 {
        (**self).space_width(font_size)
    }
}

/// Control characters never produce glyphs; they are measured by the line
/// breaker itself (tabs) or end the line (newlines).
fn measurable(ch: char) -> bool {
    !ch.is_control()
}

/// Fixed-advance metrics: every character is `advance` units wide regardless
/// of font size.
///
/// With an advance of `1.0` widths are terminal columns, which is what the
/// `koala-wrap` tool uses when no font file is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Width of every character.
    pub advance: f32,
    /// Height of every line.
    pub line_height: f32,
}

impl MonospaceMetrics {
    /// Metrics with the given per-character advance and one-unit lines.
    #[must_use]
    pub const fn new(advance: f32) -> Self {
        Self {
            advance,
            line_height: 1.0,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().filter(|&ch| measurable(ch)).count() as f32 * self.advance
    }

    fn line_height(&self, _font_size: f32) -> f32 {
        self.line_height
    }
}

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Queries fontdue for exact per-character advance widths. It uses
/// `Font::metrics()` (not `Font::rasterize()`) to avoid the cost of bitmap
/// generation when only measurements are needed.
pub struct FontdueFontMetrics<'a> {
    font: &'a Font,
}

impl<'a> FontdueFontMetrics<'a> {
    /// Create a new font metrics provider from a fontdue Font.
    #[must_use]
    pub const fn new(font: &'a Font) -> Self {
        Self { font }
    }
}

impl FontMetrics for FontdueFontMetrics<'_> {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .filter(|&ch| measurable(ch))
            .map(|ch| self.font.metrics(ch, font_size).advance_width)
            .sum()
    }

    fn line_height(&self, font_size: f32) -> f32 {
        // Prefer the font's own ascent/descent/gap; fall back to the 1.2×
        // `normal` ratio for fonts without horizontal line metrics.
        self.font
            .horizontal_line_metrics(font_size)
            .map_or(font_size * 1.2, |m| m.new_line_size)
    }
}
