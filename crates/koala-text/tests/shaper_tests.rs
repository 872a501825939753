//! Integration tests for fitting text runs into an available width.

use koala_text::{
    BreakOpportunityOracle, ExplicitBreakOracle, LineBreakMode, MetricsShaper, MonospaceMetrics,
    Shaper, TextRun,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Five units per character.
fn shaper() -> MetricsShaper<MonospaceMetrics> {
    MetricsShaper::new(MonospaceMetrics::new(5.0))
}

#[test]
fn test_whole_run_fits() {
    let text = "AA BB";
    let oracle = ExplicitBreakOracle::new(text, [2]);
    let result = shaper().shape_line(TextRun::new(text, 0, 5, 16.0), 0, 100.0, &oracle);
    assert_eq!(result.end_offset, 5);
    assert!((result.inline_size - 25.0).abs() < f32::EPSILON);
}

#[test]
fn test_last_fitting_opportunity_wins() {
    let text = "AA BB";
    let oracle = ExplicitBreakOracle::new(text, [2]);
    let result = shaper().shape_line(TextRun::new(text, 0, 5, 16.0), 0, 12.0, &oracle);
    assert_eq!(result.end_offset, 2);
    assert!((result.inline_size - 10.0).abs() < f32::EPSILON);
}

#[test]
fn test_first_opportunity_returned_when_nothing_fits() {
    let text = "ABCDE";
    let oracle = ExplicitBreakOracle::new(text, []);
    let result = shaper().shape_line(TextRun::new(text, 0, 5, 16.0), 0, 12.0, &oracle);
    assert_eq!(result.end_offset, 5);
    assert!(result.inline_size > 12.0);
}

#[test]
fn test_break_all_splits_between_letters() {
    let text = "ABCDE";
    let mut oracle = ExplicitBreakOracle::new(text, []);
    oracle.set_mode(LineBreakMode::BreakAll, None);
    let result = shaper().shape_line(TextRun::new(text, 0, 5, 16.0), 0, 12.0, &oracle);
    assert_eq!(result.end_offset, 2);
    assert!((result.inline_size - 10.0).abs() < f32::EPSILON);
}

#[test]
fn test_shaping_from_mid_run() {
    let text = "AA BB CC";
    let oracle = ExplicitBreakOracle::new(text, [2, 5]);
    let result = shaper().shape_line(TextRun::new(text, 0, 8, 16.0), 3, 12.0, &oracle);
    assert_eq!(result.start_offset, 3);
    assert_eq!(result.end_offset, 5);
}

#[test]
fn test_opportunity_past_run_is_clamped() {
    // The run is the first word only; the next opportunity is in a later run.
    let text = "ABCDEF GH";
    let oracle = ExplicitBreakOracle::new(text, [6]);
    let result = shaper().shape_line(TextRun::new(text, 0, 3, 16.0), 0, 100.0, &oracle);
    assert_eq!(result.end_offset, 3);
}

#[quickcheck]
fn prop_wider_never_shortens(words: Vec<u8>, narrow: u8, extra: u8) -> TestResult {
    if words.is_empty() {
        return TestResult::discard();
    }
    // Build "AAA BB C ..." from the word lengths.
    let mut text = String::new();
    let mut breaks = Vec::new();
    for (i, len) in words.iter().take(12).enumerate() {
        if i > 0 {
            breaks.push(text.len());
            text.push(' ');
        }
        for _ in 0..=(len % 6) {
            text.push('A');
        }
    }
    let oracle = ExplicitBreakOracle::new(&text, breaks);
    let run = TextRun::new(&text, 0, text.len(), 16.0);
    let narrow = f32::from(narrow);
    let wide = narrow + f32::from(extra);
    let a = shaper().shape_line(run, 0, narrow, &oracle);
    let b = shaper().shape_line(run, 0, wide, &oracle);
    TestResult::from_bool(a.end_offset <= b.end_offset)
}
