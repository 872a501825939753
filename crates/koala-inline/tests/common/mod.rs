//! Shared fixtures for koala-inline integration tests.

#![allow(dead_code)]

use koala_inline::{
    BlockContainer, BreakToken, InlineNode, InlineNodeBuilder, InlineStyle, IntrinsicAtomicLayout,
    LineBreakContext, LineBreaker, LineInfo, LogicalOffset,
};
use koala_text::{ExplicitBreakOracle, MetricsShaper, MonospaceMetrics};

/// Five units per character, ten-unit lines.
pub fn shaper() -> MetricsShaper<MonospaceMetrics> {
    MetricsShaper::new(MonospaceMetrics {
        advance: 5.0,
        line_height: 10.0,
    })
}

/// Everything a line breaker borrows, owned in one place.
pub struct Harness {
    pub shaper: MetricsShaper<MonospaceMetrics>,
    pub oracle: ExplicitBreakOracle,
    pub container: BlockContainer,
    pub atomic_layout: IntrinsicAtomicLayout,
}

impl Harness {
    /// Break `node` at `breaks` (and the end of the text) into `width`.
    pub fn new(node: &InlineNode, breaks: &[usize], width: f32) -> Self {
        Self::with_container(node, breaks, BlockContainer::new(width).with_line_height(10.0))
    }

    pub fn with_container(node: &InlineNode, breaks: &[usize], container: BlockContainer) -> Self {
        Self {
            shaper: shaper(),
            oracle: ExplicitBreakOracle::new(node.text(), breaks.iter().copied()),
            container,
            atomic_layout: IntrinsicAtomicLayout,
        }
    }

    pub fn ctx(&mut self) -> LineBreakContext<'_> {
        LineBreakContext {
            shaper: &self.shaper,
            oracle: &mut self.oracle,
            container: &mut self.container,
            atomic_layout: &mut self.atomic_layout,
        }
    }
}

/// A line and the token the breaker reported after it.
#[derive(Debug)]
pub struct Line {
    pub info: LineInfo,
    pub token: Option<BreakToken>,
}

/// Break every line of `node`, all at content offset zero.
pub fn break_lines(node: &InlineNode, harness: &mut Harness) -> Vec<Line> {
    let mut breaker = LineBreaker::new(node, None);
    let mut ctx = harness.ctx();
    let mut lines = Vec::new();
    while let Some(info) = breaker.next_line(&mut ctx, LogicalOffset::default()) {
        lines.push(Line {
            info,
            token: breaker.break_token(),
        });
        assert!(lines.len() < 1000, "line breaker did not terminate");
    }
    lines
}

/// Returns `true` if every line after the first comes out the same when a
/// fresh breaker, oracle and container resume from the previous line's
/// token. The containers start resolved so both sides see the width at once.
pub fn resumed_lines_match(node: &InlineNode, breaks: &[usize], width: f32) -> bool {
    let resolved = || BlockContainer::with_resolved_offset(width, 0.0).with_line_height(10.0);
    let mut harness = Harness::with_container(node, breaks, resolved());
    let lines = break_lines(node, &mut harness);

    lines.windows(2).all(|pair| {
        let Some(token) = pair[0].token else {
            return false;
        };
        let mut fresh = Harness::with_container(node, breaks, resolved());
        let mut breaker = LineBreaker::new(node, Some(&token));
        let resumed = breaker.next_line(&mut fresh.ctx(), LogicalOffset::default());
        resumed.as_ref() == Some(&pair[1].info) && breaker.break_token() == pair[1].token
    })
}

/// The text of each line, pieces joined.
pub fn line_texts(node: &InlineNode, lines: &[Line]) -> Vec<String> {
    lines.iter().map(|line| line.info.text(node).concat()).collect()
}

/// A node holding `text` in the root style.
pub fn text_node(text: &str) -> InlineNode {
    styled_text_node(InlineStyle::default(), text)
}

pub fn styled_text_node(style: InlineStyle, text: &str) -> InlineNode {
    let mut builder = InlineNodeBuilder::new(style);
    builder.append_text(text);
    builder.finish().unwrap()
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
