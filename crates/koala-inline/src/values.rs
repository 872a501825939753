//! Auto-or-length values.
//!
//! [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)

use serde::Serialize;

/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// A float's width is `auto` until its content has been laid out; the line
/// breaker cannot size such a float and defers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    Auto,
    /// The value is a specific length in pixels.
    Length(f32),
}

impl AutoOr {
    /// The length, if the value is not `auto`.
    #[must_use]
    pub const fn length(self) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(len) => Some(len),
        }
    }
}

impl Default for AutoOr {
    fn default() -> Self {
        Self::Length(0.0)
    }
}
