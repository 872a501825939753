//! The stack of open inline boxes while breaking a line.

use crate::item::InlineNode;
use crate::style::StyleId;

/// Inline boxes open at the line breaker's cursor, the root at the bottom.
///
/// Open tags push, close tags pop. A line breaker resumed from a break
/// token seeds the stack from the scope recorded on the item it resumes at,
/// so it never walks earlier items.
#[derive(Debug, Clone)]
pub(crate) struct ScopeStack {
    stack: Vec<StyleId>,
}

impl ScopeStack {
    /// The chain of boxes enclosing `scope`, root first.
    pub(crate) fn seeded(node: &InlineNode, scope: StyleId) -> Self {
        Self {
            stack: node.scope_chain(scope),
        }
    }

    /// The innermost open box.
    pub(crate) fn current(&self) -> StyleId {
        self.stack.last().copied().unwrap_or(StyleId::ROOT)
    }

    pub(crate) fn push(&mut self, scope: StyleId) {
        self.stack.push(scope);
    }

    /// Close `closing` and return the box that encloses it. The root is
    /// never popped.
    pub(crate) fn pop(&mut self, closing: StyleId) -> StyleId {
        debug_assert_eq!(
            self.current(),
            closing,
            "close tag does not match the innermost open box"
        );
        if self.stack.len() > 1 {
            let _ = self.stack.pop();
        }
        self.current()
    }
}
