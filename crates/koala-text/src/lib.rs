//! Text collaborators for the Koala line breaker.
//!
//! The line breaker in `koala-inline` never looks at glyphs or Unicode
//! properties itself. It asks three questions, each answered by a trait in
//! this crate:
//!
//! - [`FontMetrics`] - how wide is this string, how tall is a line?
//! - [`BreakOpportunityOracle`] - where may a line end?
//! - [`Shaper`] - what is the longest prefix of a run that fits a width?
//!
//! # Module Structure
//!
//! - [`metrics`] - font metrics (monospace, fontdue-backed)
//! - [`break_oracle`] - line break opportunities (UAX #14 via ICU4X, explicit)
//! - [`shaper`] - fitting text runs into an available width

pub mod break_oracle;
pub mod metrics;
pub mod shaper;

pub use break_oracle::{
    BreakOpportunityOracle, ExplicitBreakOracle, LineBreakMode, UnicodeBreakOracle,
};
pub use metrics::{FontMetrics, FontdueFontMetrics, MonospaceMetrics};
pub use shaper::{MetricsShaper, ShapeResult, Shaper, TextRun};
