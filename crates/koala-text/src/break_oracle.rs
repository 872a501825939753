//! Line break opportunities.
//!
//! [§ 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
//!
//! "A soft wrap opportunity is a position in the text where the UA may
//! choose to break."
//!
//! Offsets are UTF-8 byte offsets into the whole text buffer of an inline
//! formatting context. An offset is *breakable* when a line may end there,
//! so the text before it stays on the current line.

use std::collections::HashMap;

use icu_segmenter::{LineBreakOptions, LineBreakWordOption, LineSegmenter};
use strum_macros::{Display, EnumString};

/// [§ 5.2 Breaking Rules for Letters: the word-break property](https://www.w3.org/TR/css-text-3/#word-break-property)
///
/// The break behavior the oracle applies between letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum LineBreakMode {
    /// "Words break according to their customary rules."
    #[default]
    Normal,
    /// "Breaking is allowed within 'words'."
    BreakAll,
    /// "Breaking is forbidden within 'words'."
    KeepAll,
}

/// Reports where lines may end.
///
/// The line breaker reconfigures the oracle whenever the active inline style
/// scope changes, then queries it while measuring text.
pub trait BreakOpportunityOracle {
    /// Switch the break rules used by subsequent queries.
    ///
    /// `locale` is a BCP 47 language tag such as `"ja"` or `"en-US"`.
    fn set_mode(&mut self, mode: LineBreakMode, locale: Option<&str>);

    /// Returns `true` if a line may end at `offset`.
    fn is_breakable(&self, offset: usize) -> bool;

    /// Returns the first breakable offset at or after `offset`.
    ///
    /// The end of the text is always breakable, so the result never exceeds
    /// the text length.
    fn next_break_opportunity(&self, offset: usize) -> usize;
}

/// Shared lookup over a sorted list of breakable offsets.
fn lookup_breakable(breaks: &[usize], offset: usize) -> bool {
    breaks.binary_search(&offset).is_ok()
}

fn lookup_next(breaks: &[usize], offset: usize, text_len: usize) -> usize {
    let index = breaks.partition_point(|&b| b < offset);
    breaks.get(index).copied().unwrap_or(text_len)
}

/// UAX #14 break opportunities computed by ICU4X's line segmenter.
///
/// [Unicode Standard Annex #14](https://www.unicode.org/reports/tr14/)
///
/// UAX #14 places the opportunity *after* a run of spaces. Koala lines end
/// *before* the spaces instead so trailing spaces hang past the line end and
/// the next line starts at the collapsible space, which the line breaker
/// skips. An opportunity that follows spaces is therefore moved back to the
/// start of the space run.
///
/// Opportunities are computed once per (mode, CJ-locale) pair and cached.
pub struct UnicodeBreakOracle<'a> {
    text: &'a str,
    key: (LineBreakMode, bool),
    cache: HashMap<(LineBreakMode, bool), Vec<usize>>,
}

impl<'a> UnicodeBreakOracle<'a> {
    /// Create an oracle over `text` using [`LineBreakMode::Normal`].
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut oracle = Self {
            text,
            key: (LineBreakMode::Normal, false),
            cache: HashMap::new(),
        };
        oracle.ensure_computed();
        oracle
    }

    /// The breakable offsets under the current mode, in increasing order.
    #[must_use]
    pub fn break_offsets(&self) -> &[usize] {
        self.cache.get(&self.key).map_or(&[], Vec::as_slice)
    }

    fn ensure_computed(&mut self) {
        let text = self.text;
        let (mode, ja_zh) = self.key;
        let _ = self
            .cache
            .entry(self.key)
            .or_insert_with(|| compute_breaks(text, mode, ja_zh));
    }
}

/// Chinese and Japanese text uses the stricter CJ line break rules.
fn is_cj_locale(locale: Option<&str>) -> bool {
    locale.is_some_and(|tag| {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        language.eq_ignore_ascii_case("ja") || language.eq_ignore_ascii_case("zh")
    })
}

fn compute_breaks(text: &str, mode: LineBreakMode, ja_zh: bool) -> Vec<usize> {
    let mut options = LineBreakOptions::default();
    options.word_option = match mode {
        LineBreakMode::Normal => LineBreakWordOption::Normal,
        LineBreakMode::BreakAll => LineBreakWordOption::BreakAll,
        LineBreakMode::KeepAll => LineBreakWordOption::KeepAll,
    };
    options.ja_zh = ja_zh;
    let segmenter = LineSegmenter::new_auto_with_options(options);

    let mut breaks: Vec<usize> = segmenter
        .segment_str(text)
        .map(|point| hang_spaces(text, point))
        .filter(|&point| point > 0)
        .collect();
    breaks.dedup();

    // The end of the text is always an opportunity, even when it follows
    // spaces that were hung.
    if breaks.last() != Some(&text.len()) {
        breaks.push(text.len());
    }
    breaks
}

/// Move an opportunity that follows a run of spaces to the start of the run.
fn hang_spaces(text: &str, point: usize) -> usize {
    let head = &text[..point];
    head.trim_end_matches(' ').len()
}

impl BreakOpportunityOracle for UnicodeBreakOracle<'_> {
    fn set_mode(&mut self, mode: LineBreakMode, locale: Option<&str>) {
        self.key = (mode, is_cj_locale(locale));
        self.ensure_computed();
    }

    fn is_breakable(&self, offset: usize) -> bool {
        lookup_breakable(self.break_offsets(), offset)
    }

    fn next_break_opportunity(&self, offset: usize) -> usize {
        lookup_next(self.break_offsets(), offset, self.text.len())
    }
}

/// An oracle over an explicit list of opportunities.
///
/// Useful when opportunities come from somewhere other than UAX #14 (a
/// hyphenator, a test). The mode is recorded but does not change the
/// opportunities, except that [`LineBreakMode::BreakAll`] additionally
/// allows a break at every character boundary.
#[derive(Debug, Clone)]
pub struct ExplicitBreakOracle {
    breaks: Vec<usize>,
    char_boundaries: Vec<usize>,
    text_len: usize,
    mode: LineBreakMode,
    locale: Option<String>,
}

impl ExplicitBreakOracle {
    /// Create an oracle for `text` that may break only at `breaks` and at the
    /// end of the text.
    ///
    /// # Panics
    ///
    /// Panics if an offset is past the end of `text` or not on a character
    /// boundary.
    #[must_use]
    pub fn new(text: &str, breaks: impl IntoIterator<Item = usize>) -> Self {
        let mut breaks: Vec<usize> = breaks.into_iter().filter(|&b| b > 0).collect();
        for &offset in &breaks {
            assert!(
                text.is_char_boundary(offset),
                "break offset {offset} is not a character boundary of a {}-byte text",
                text.len()
            );
        }
        breaks.push(text.len());
        breaks.sort_unstable();
        breaks.dedup();

        let char_boundaries = text
            .char_indices()
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .chain(std::iter::once(text.len()))
            .collect();

        Self {
            breaks,
            char_boundaries,
            text_len: text.len(),
            mode: LineBreakMode::Normal,
            locale: None,
        }
    }

    /// The mode most recently set by the line breaker.
    #[must_use]
    pub const fn mode(&self) -> LineBreakMode {
        self.mode
    }

    /// The locale most recently set by the line breaker.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn active(&self) -> &[usize] {
        if self.mode == LineBreakMode::BreakAll {
            &self.char_boundaries
        } else {
            &self.breaks
        }
    }
}

impl BreakOpportunityOracle for ExplicitBreakOracle {
    fn set_mode(&mut self, mode: LineBreakMode, locale: Option<&str>) {
        self.mode = mode;
        self.locale = locale.map(str::to_owned);
    }

    fn is_breakable(&self, offset: usize) -> bool {
        lookup_breakable(self.active(), offset)
    }

    fn next_break_opportunity(&self, offset: usize) -> usize {
        lookup_next(self.active(), offset, self.text_len)
    }
}
