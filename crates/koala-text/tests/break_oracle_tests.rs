//! Integration tests for line break opportunities.

use koala_text::{BreakOpportunityOracle, ExplicitBreakOracle, LineBreakMode, UnicodeBreakOracle};

#[test]
fn test_mode_keywords_round_trip() {
    assert_eq!("break-all".parse::<LineBreakMode>().ok(), Some(LineBreakMode::BreakAll));
    assert_eq!("keep-all".parse::<LineBreakMode>().ok(), Some(LineBreakMode::KeepAll));
    assert_eq!(LineBreakMode::Normal.to_string(), "normal");
    assert!("anywhere".parse::<LineBreakMode>().is_err());
}

#[test]
fn test_unicode_breaks_before_spaces() {
    let oracle = UnicodeBreakOracle::new("AA BB");
    assert!(oracle.is_breakable(2));
    assert!(!oracle.is_breakable(3));
    assert!(oracle.is_breakable(5));
    assert_eq!(oracle.next_break_opportunity(1), 2);
    assert_eq!(oracle.next_break_opportunity(3), 5);
}

#[test]
fn test_unicode_single_word_breaks_only_at_end() {
    let oracle = UnicodeBreakOracle::new("ABCDE");
    assert_eq!(oracle.break_offsets(), &[5]);
    assert_eq!(oracle.next_break_opportunity(1), 5);
}

#[test]
fn test_unicode_break_all_allows_every_letter() {
    let mut oracle = UnicodeBreakOracle::new("ABCDE");
    oracle.set_mode(LineBreakMode::BreakAll, None);
    assert_eq!(oracle.break_offsets(), &[1, 2, 3, 4, 5]);

    // Switching back restores the cached normal opportunities.
    oracle.set_mode(LineBreakMode::Normal, Some("en-US"));
    assert_eq!(oracle.break_offsets(), &[5]);
}

#[test]
fn test_unicode_trailing_spaces_hang() {
    let oracle = UnicodeBreakOracle::new("AA  ");
    assert!(oracle.is_breakable(2));
    assert!(oracle.is_breakable(4));
    assert_eq!(oracle.next_break_opportunity(3), 4);
}

#[test]
fn test_explicit_oracle_always_breaks_at_end() {
    let oracle = ExplicitBreakOracle::new("ABC DEF", [3]);
    assert!(oracle.is_breakable(3));
    assert!(oracle.is_breakable(7));
    assert!(!oracle.is_breakable(5));
    assert_eq!(oracle.next_break_opportunity(4), 7);
    assert_eq!(oracle.next_break_opportunity(8), 7);
}

#[test]
fn test_explicit_oracle_records_mode_and_locale() {
    let mut oracle = ExplicitBreakOracle::new("日本語", []);
    oracle.set_mode(LineBreakMode::BreakAll, Some("ja"));
    assert_eq!(oracle.mode(), LineBreakMode::BreakAll);
    assert_eq!(oracle.locale(), Some("ja"));
    // Character boundaries of three 3-byte characters.
    assert!(oracle.is_breakable(3));
    assert!(!oracle.is_breakable(4));
    assert_eq!(oracle.next_break_opportunity(4), 6);
}

#[test]
#[should_panic(expected = "not a character boundary")]
fn test_explicit_oracle_rejects_mid_character_offsets() {
    let _ = ExplicitBreakOracle::new("日本", [1]);
}
