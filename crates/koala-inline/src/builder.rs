//! Building an [`InlineNode`] from styled content.
//!
//! [§ 4.1 The White Space Processing Rules](https://www.w3.org/TR/css-text-3/#white-space-rules)
//!
//! "White space processing in CSS affects only the document white space
//! characters: spaces (U+0020), tabs (U+0009), and segment breaks."
//!
//! The builder applies phase I of white space processing while appending
//! text: collapsible runs become a single space, preserved newlines and tabs
//! become control items. After collapsing, every collapsible space is
//! preceded by a non-space, which is what lets the line breaker skip a
//! single space at the start of a line.

use crate::box_model::LogicalSize;
use crate::error::InlineError;
use crate::item::{
    AtomicBox, FloatBox, InlineItem, InlineItemType, InlineNode, OBJECT_REPLACEMENT_CHARACTER,
};
use crate::style::{InlineStyle, StyleId, WhiteSpace};

/// Appends content in document order and produces an [`InlineNode`].
///
/// ```
/// use koala_inline::{InlineNodeBuilder, InlineStyle};
///
/// let mut builder = InlineNodeBuilder::new(InlineStyle::default());
/// builder.append_text("  Hello,   ");
/// let _ = builder.open_tag(InlineStyle::default());
/// builder.append_text(" world ");
/// builder.close_tag().unwrap();
/// let node = builder.finish().unwrap();
/// assert_eq!(node.text(), "Hello, world");
/// ```
#[derive(Debug)]
pub struct InlineNodeBuilder {
    text: String,
    items: Vec<InlineItem>,
    styles: Vec<InlineStyle>,
    parents: Vec<Option<StyleId>>,
    open: Vec<StyleId>,
    /// Whether the last character appended was a collapsible space, or the
    /// position is the start of a line, so a following collapsible space is
    /// removed.
    trailing_collapsible: bool,
}

impl InlineNodeBuilder {
    /// Start a node for a block container with `root_style`.
    #[must_use]
    pub fn new(root_style: InlineStyle) -> Self {
        Self {
            text: String::new(),
            items: Vec::new(),
            styles: vec![root_style],
            parents: vec![None],
            open: vec![StyleId::ROOT],
            trailing_collapsible: true,
        }
    }

    fn current(&self) -> StyleId {
        self.open.last().copied().unwrap_or(StyleId::ROOT)
    }

    fn add_style(&mut self, style: InlineStyle) -> StyleId {
        let id = StyleId(self.styles.len());
        self.styles.push(style);
        self.parents.push(Some(self.current()));
        id
    }

    fn push_item(&mut self, item_type: InlineItemType, start: usize, style: StyleId, scope: StyleId) {
        self.items.push(InlineItem {
            item_type,
            start_offset: start,
            end_offset: self.text.len(),
            style,
            scope,
            has_start_edge: true,
            has_end_edge: true,
        });
    }

    /// Open an inline box. Returns the id of its style.
    pub fn open_tag(&mut self, style: InlineStyle) -> StyleId {
        self.open_tag_with_edge(style, true)
    }

    /// Open an inline box whose inline-start edge belongs to an earlier
    /// fragment.
    pub fn open_tag_continued(&mut self, style: InlineStyle) -> StyleId {
        self.open_tag_with_edge(style, false)
    }

    fn open_tag_with_edge(&mut self, style: InlineStyle, has_start_edge: bool) -> StyleId {
        let parent = self.current();
        let id = self.add_style(style);
        let start = self.text.len();
        self.push_item(InlineItemType::OpenTag, start, id, parent);
        if let Some(item) = self.items.last_mut() {
            item.has_start_edge = has_start_edge;
        }
        self.open.push(id);
        id
    }

    /// Close the innermost open inline box.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::UnbalancedCloseTag`] if no box is open.
    pub fn close_tag(&mut self) -> Result<(), InlineError> {
        self.close_tag_with_edge(true)
    }

    /// Close the innermost open inline box, whose inline-end edge belongs to
    /// a later fragment.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::UnbalancedCloseTag`] if no box is open.
    pub fn close_tag_continued(&mut self) -> Result<(), InlineError> {
        self.close_tag_with_edge(false)
    }

    fn close_tag_with_edge(&mut self, has_end_edge: bool) -> Result<(), InlineError> {
        if self.open.len() <= 1 {
            return Err(InlineError::UnbalancedCloseTag {
                offset: self.text.len(),
            });
        }
        let closing = self.current();
        let _ = self.open.pop();
        let start = self.text.len();
        self.push_item(InlineItemType::CloseTag, start, closing, closing);
        if let Some(item) = self.items.last_mut() {
            item.has_end_edge = has_end_edge;
        }
        Ok(())
    }

    /// Append text in the innermost open box, processing white space
    /// according to its `white-space` value.
    pub fn append_text(&mut self, text: &str) {
        let scope = self.current();
        let white_space = self.styles[scope.0].white_space;
        let mut run_start = self.text.len();

        for c in text.chars() {
            match c {
                // [§ 4.1.2](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
                //
                // "If white-space is set to pre, pre-wrap, break-spaces, or
                // pre-line, segment breaks are not collapsible and are
                // instead transformed into a preserved line feed."
                '\n' if white_space.preserve_newline() => {
                    self.flush_text(run_start, scope);
                    if white_space == WhiteSpace::PreLine {
                        // "Any collapsible space immediately preceding or
                        // following a segment break is removed."
                        self.remove_trailing_collapsible_space();
                    }
                    self.push_control('\n', scope);
                    self.trailing_collapsible = true;
                    run_start = self.text.len();
                }
                '\t' if white_space.preserve_tab() => {
                    self.flush_text(run_start, scope);
                    self.push_control('\t', scope);
                    self.trailing_collapsible = false;
                    run_start = self.text.len();
                }
                // "Any sequence of collapsible spaces and tabs immediately
                // preceding or following a segment break is removed."
                // "Every collapsible tab is converted to a collapsible space."
                // "Any collapsible space immediately following another
                // collapsible space is collapsed to have zero advance width."
                ' ' | '\t' | '\n' | '\r' if white_space.collapse_white_space() => {
                    if !self.trailing_collapsible {
                        self.text.push(' ');
                        self.trailing_collapsible = true;
                    }
                }
                _ => {
                    self.text.push(c);
                    self.trailing_collapsible = false;
                }
            }
        }
        self.flush_text(run_start, scope);
    }

    fn flush_text(&mut self, run_start: usize, scope: StyleId) {
        if self.text.len() > run_start {
            self.push_item(InlineItemType::Text, run_start, scope, scope);
        }
    }

    fn push_control(&mut self, c: char, scope: StyleId) {
        let start = self.text.len();
        self.text.push(c);
        self.push_item(InlineItemType::Control, start, scope, scope);
    }

    /// Append an atomic inline with content size `size` and its own `style`
    /// (margins, borders and padding). Returns the id of its style.
    pub fn append_atomic_inline(&mut self, style: InlineStyle, size: LogicalSize) -> StyleId {
        let scope = self.current();
        let id = self.add_style(style);
        let start = self.text.len();
        self.text.push(OBJECT_REPLACEMENT_CHARACTER);
        self.push_item(
            InlineItemType::AtomicInline(AtomicBox { size }),
            start,
            id,
            scope,
        );
        self.trailing_collapsible = false;
        id
    }

    /// Append a float. White space collapses across it.
    pub fn append_float(&mut self, style: InlineStyle, float_box: FloatBox) -> StyleId {
        let scope = self.current();
        let id = self.add_style(style);
        let start = self.text.len();
        self.text.push(OBJECT_REPLACEMENT_CHARACTER);
        self.push_item(InlineItemType::Float(float_box), start, id, scope);
        id
    }

    /// Append a forced line break (`<br>`), whatever the `white-space`.
    pub fn append_break(&mut self) {
        let scope = self.current();
        self.remove_trailing_collapsible_space();
        self.push_control('\n', scope);
        self.trailing_collapsible = true;
    }

    /// Remove a collapsible space at the very end of the text, which would
    /// otherwise hang at the end of the last line or before a forced break.
    fn remove_trailing_collapsible_space(&mut self) {
        if !self.text.ends_with(' ') {
            return;
        }
        let end = self.text.len();
        let Some(index) = self
            .items
            .iter()
            .rposition(|item| item.is_text() && item.end_offset == end)
        else {
            return;
        };
        if !self.styles[self.items[index].style.0]
            .white_space
            .collapse_white_space()
        {
            return;
        }

        let _ = self.text.pop();
        // Only zero-length tags can follow the text item here.
        for item in &mut self.items[index..] {
            item.end_offset -= 1;
            if item.start_offset == end {
                item.start_offset -= 1;
            }
        }
        if self.items[index].is_empty() {
            let _ = self.items.remove(index);
        }
    }

    /// Validate and return the node.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::UnclosedTags`] if inline boxes are still open.
    pub fn finish(mut self) -> Result<InlineNode, InlineError> {
        if self.open.len() > 1 {
            return Err(InlineError::UnclosedTags {
                count: self.open.len() - 1,
            });
        }
        self.remove_trailing_collapsible_space();
        Ok(InlineNode {
            text: self.text,
            items: self.items,
            styles: self.styles,
            parents: self.parents,
        })
    }
}
