//! The inline style properties line breaking depends on.
//!
//! Cascade and computed-value resolution happen elsewhere; an inline node
//! stores already-computed [`InlineStyle`]s and items refer to them by
//! [`StyleId`].

use koala_text::LineBreakMode;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::box_model::EdgeSizes;

/// Index of a style in an [`InlineNode`](crate::InlineNode)'s style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StyleId(pub usize);

impl StyleId {
    /// The style of the block container itself.
    pub const ROOT: Self = Self(0);
}

/// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
///
/// "This property specifies two things: whether and how white space inside
/// the element is collapsed, and whether lines may wrap at unforced soft
/// wrap opportunities."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    /// "This value directs user agents to collapse sequences of white space
    /// into a single character. Lines may wrap at allowed soft wrap
    /// opportunities."
    #[default]
    Normal,
    /// "This value prevents user agents from collapsing sequences of white
    /// space. Lines are only broken at preserved newline characters."
    Pre,
    /// "Like normal, this value collapses white space; but like pre, it does
    /// not allow wrapping."
    Nowrap,
    /// "Like pre, this value preserves white space; but like normal, it
    /// allows wrapping."
    PreWrap,
    /// "Like normal, this value collapses consecutive spaces and allows
    /// wrapping, but preserves segment breaks in the source as forced line
    /// breaks."
    PreLine,
}

impl WhiteSpace {
    /// Whether lines may wrap at soft wrap opportunities.
    #[must_use]
    pub const fn auto_wrap(self) -> bool {
        !matches!(self, Self::Pre | Self::Nowrap)
    }

    /// Whether runs of spaces and tabs collapse to a single space.
    #[must_use]
    pub const fn collapse_white_space(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Whether a newline forces a line break.
    #[must_use]
    pub const fn preserve_newline(self) -> bool {
        !matches!(self, Self::Normal | Self::Nowrap)
    }

    /// Whether a tab advances to the next tab stop.
    #[must_use]
    pub const fn preserve_tab(self) -> bool {
        matches!(self, Self::Pre | Self::PreWrap)
    }
}

/// [§ 5.2 Breaking Rules for Letters: the word-break property](https://www.w3.org/TR/css-text-3/#word-break-property)
///
/// "This property specifies soft wrap opportunities between letters."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WordBreak {
    /// "Words break according to their customary rules."
    #[default]
    Normal,
    /// "Breaking is allowed within 'words'."
    BreakAll,
    /// "Breaking is forbidden within 'words'."
    KeepAll,
    /// "For compatibility with legacy content, the word-break property also
    /// supports a deprecated break-word keyword."
    BreakWord,
}

impl WordBreak {
    /// The break oracle mode for this keyword. `break-word` breaks like
    /// `break-all` since overflow-wrap is not supported.
    #[must_use]
    pub const fn line_break_mode(self) -> LineBreakMode {
        match self {
            Self::Normal => LineBreakMode::Normal,
            Self::BreakAll | Self::BreakWord => LineBreakMode::BreakAll,
            Self::KeepAll => LineBreakMode::KeepAll,
        }
    }
}

/// Computed values of an inline box or of the block container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// The `white-space` property.
    pub white_space: WhiteSpace,
    /// The `word-break` property.
    pub word_break: WordBreak,
    /// Content language (BCP 47), used to pick locale-specific break rules.
    pub locale: Option<String>,
    /// [§ 4.2 Tab Character Size: the tab-size property](https://www.w3.org/TR/css-text-3/#tab-size-property)
    ///
    /// Tab stop spacing, in multiples of the space advance.
    pub tab_size: u32,
    /// Margin edges.
    pub margin: EdgeSizes,
    /// Border widths.
    pub border: EdgeSizes,
    /// Padding edges.
    pub padding: EdgeSizes,
}

impl Default for InlineStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            white_space: WhiteSpace::Normal,
            word_break: WordBreak::Normal,
            locale: None,
            tab_size: 8,
            margin: EdgeSizes::ZERO,
            border: EdgeSizes::ZERO,
            padding: EdgeSizes::ZERO,
        }
    }
}

impl InlineStyle {
    /// Whether lines may wrap inside content with this style.
    #[must_use]
    pub const fn auto_wrap(&self) -> bool {
        self.white_space.auto_wrap()
    }

    /// Returns `true` if any border width is non-zero.
    #[must_use]
    pub fn has_border(&self) -> bool {
        !self.border.is_zero()
    }

    /// Returns `true` if any padding edge is non-zero.
    #[must_use]
    pub fn has_padding(&self) -> bool {
        !self.padding.is_zero()
    }

    /// Returns `true` if any margin edge is non-zero.
    #[must_use]
    pub fn has_margin(&self) -> bool {
        !self.margin.is_zero()
    }
}
