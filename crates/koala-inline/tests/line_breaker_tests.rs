//! Integration tests for the line breaking state machine and overflow
//! recovery.

mod common;

use common::{
    Harness, approx_eq, break_lines, line_texts, resumed_lines_match, styled_text_node, text_node,
};
use koala_inline::{
    BreakToken, EdgeSizes, InlineItemType, InlineNodeBuilder, InlineStyle, LineBreaker,
    LogicalOffset, LogicalSize, StyleId, WhiteSpace, WordBreak,
};

/// Offsets of the spaces in `text`: lines end before them.
fn space_breaks(text: &str) -> Vec<usize> {
    text.match_indices(' ').map(|(i, _)| i).collect()
}

#[test]
fn test_single_line_when_everything_fits() {
    let node = text_node("AA BB");
    let mut harness = Harness::new(&node, &[2], 100.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA BB"]);
    assert!(lines[0].info.is_last_line);
    assert!(!lines[0].info.has_overflow);
    assert_eq!(lines[0].token, None);
    assert!(approx_eq(lines[0].info.inline_size(), 25.0));
}

#[test]
fn test_break_before_space() {
    let node = text_node("AA BB");
    let mut harness = Harness::new(&node, &[2], 12.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA", "BB"]);
    // The space hangs at the end of the first line; the next line starts
    // after it.
    assert_eq!(lines[0].token, Some(BreakToken::new(0, 3)));
    assert!(!lines[0].info.is_last_line);
    assert!(lines[1].info.is_last_line);
    assert_eq!(lines[1].token, None);
}

#[test]
fn test_unbreakable_word_overflows() {
    let node = text_node("ABCDE");
    let mut harness = Harness::new(&node, &[], 12.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["ABCDE"]);
    let line = &lines[0].info;
    assert!(line.has_overflow);
    assert!(line.is_last_line);
    assert_eq!(line.available_width, Some(12.0));
    assert_eq!(line.results[0].end_offset, 5);
    assert!(line.results[0].no_break_opportunities_inside);
}

#[test]
fn test_long_word_overflows_then_wrapping_resumes() {
    let text = "AAAAAAAAAA BB";
    let node = text_node(text);
    let mut harness = Harness::new(&node, &space_breaks(text), 20.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AAAAAAAAAA", "BB"]);
    assert!(lines[0].info.has_overflow);
    assert!(!lines[0].info.is_last_line);
    assert!(!lines[1].info.has_overflow);
}

#[test]
fn test_break_all_splits_words() {
    let style = InlineStyle {
        word_break: WordBreak::BreakAll,
        ..InlineStyle::default()
    };
    let node = styled_text_node(style, "ABCDE");
    let mut harness = Harness::new(&node, &[], 12.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AB", "CD", "E"]);
    assert_eq!(lines[0].token, Some(BreakToken::new(0, 2)));
    assert_eq!(lines[1].token, Some(BreakToken::new(0, 4)));
    assert!(lines.iter().all(|line| !line.info.has_overflow));
}

#[test]
fn test_forced_break_ends_line() {
    let style = InlineStyle {
        white_space: WhiteSpace::PreLine,
        ..InlineStyle::default()
    };
    let node = styled_text_node(style, "AA\nBB");
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA", "BB"]);
    // The newline is on the first line and marks it last.
    assert_eq!(lines[0].info.results.len(), 2);
    assert_eq!(
        node.item(lines[0].info.results[1].item_index).item_type,
        InlineItemType::Control
    );
    assert!(lines[0].info.is_last_line);
    assert_eq!(lines[0].token, Some(BreakToken::new(2, 3)));
    assert!(lines[1].info.is_last_line);
}

#[test]
fn test_br_forces_break_in_normal_white_space() {
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    builder.append_text("AA ");
    builder.append_break();
    builder.append_text("BB");
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA", "BB"]);
}

#[test]
fn test_tab_advances_to_next_stop() {
    let style = InlineStyle {
        white_space: WhiteSpace::Pre,
        ..InlineStyle::default()
    };
    let node = styled_text_node(style, "A\tB");
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(lines.len(), 1);
    let results = &lines[0].info.results;
    assert_eq!(results.len(), 3);
    // Stops are 8 spaces (40 units) apart; "A" already took 5.
    assert!(approx_eq(results[1].inline_size, 35.0));
    assert!(approx_eq(lines[0].info.inline_size(), 45.0));
}

#[test]
fn test_tab_close_to_stop_skips_to_following_stop() {
    let style = InlineStyle {
        white_space: WhiteSpace::Pre,
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(style);
    let _ = builder.append_atomic_inline(InlineStyle::default(), LogicalSize::new(38.0, 10.0));
    builder.append_text("\t");
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    // 2 units to the stop at 40 is less than half a space.
    assert!(approx_eq(lines[0].info.results[1].inline_size, 42.0));
}

#[test]
fn test_nowrap_keeps_line_whole() {
    let style = InlineStyle {
        white_space: WhiteSpace::Nowrap,
        ..InlineStyle::default()
    };
    let text = "AA BB CC";
    let node = styled_text_node(style, text);
    let mut harness = Harness::new(&node, &space_breaks(text), 12.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA BB CC"]);
    assert!(lines[0].info.has_overflow);
    assert!(lines[0].info.is_last_line);
    assert!(lines[0].info.results[0].prohibit_break_after);
}

#[test]
fn test_nowrap_resumed_mid_item_takes_the_rest() {
    let style = InlineStyle {
        white_space: WhiteSpace::Nowrap,
        ..InlineStyle::default()
    };
    let text = "AA BB CC";
    let node = styled_text_node(style, text);
    let mut harness = Harness::new(&node, &space_breaks(text), 12.0);
    let mut breaker = LineBreaker::new(&node, Some(&BreakToken::new(0, 3)));
    let line = breaker
        .next_line(&mut harness.ctx(), LogicalOffset::default())
        .unwrap();

    assert_eq!(line.text(&node), ["BB CC"]);
    assert!(approx_eq(line.inline_size(), 25.0));
    assert_eq!(breaker.break_token(), None);
}

#[test]
fn test_atomic_inline_wider_than_line_sits_alone() {
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    builder.append_text("AA");
    let _ = builder.append_atomic_inline(InlineStyle::default(), LogicalSize::new(30.0, 10.0));
    builder.append_text("BB");
    let node = builder.finish().unwrap();
    // "AA" 0..2, the atomic inline 2..5, "BB" 5..7.
    let mut harness = Harness::new(&node, &[2, 5], 20.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(lines.len(), 3);
    assert_eq!(line_texts(&node, &lines), ["AA", "", "BB"]);

    let atomic_line = &lines[1].info;
    assert_eq!(atomic_line.results.len(), 1);
    assert_eq!(atomic_line.results[0].item_index, 1);
    assert!(atomic_line.has_overflow);
    assert!(approx_eq(atomic_line.inline_size(), 30.0));
    assert_eq!(lines[1].token, Some(BreakToken::new(2, 5)));
}

#[test]
fn test_rewound_results_stay_readable() {
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    builder.append_text("AA");
    let _ = builder.append_atomic_inline(InlineStyle::default(), LogicalSize::new(30.0, 10.0));
    builder.append_text("BB");
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[2, 5], 20.0);
    let lines = break_lines(&node, &mut harness);

    // The first line tried the atomic inline, then rewound before it.
    let discarded = lines[0].info.results.discarded();
    assert_eq!(discarded.len(), 1);
    assert_eq!(discarded[0].item_index, 1);
}

#[test]
fn test_margins_on_first_and_last_fragment_only() {
    let span = InlineStyle {
        margin: EdgeSizes::horizontal(5.0, 5.0),
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    let span_id = builder.open_tag(span);
    builder.append_text("AA BB DD");
    builder.close_tag().unwrap();
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[2, 5], 20.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA", "BB", "DD"]);
    let sizes: Vec<f32> = lines.iter().map(|line| line.info.inline_size()).collect();
    assert!(approx_eq(sizes[0], 15.0));
    assert!(approx_eq(sizes[1], 10.0));
    assert!(approx_eq(sizes[2], 15.0));

    // Lines after the first start inside the span.
    assert_eq!(lines[0].info.line_style, StyleId::ROOT);
    assert_eq!(lines[1].info.line_style, span_id);
    assert_eq!(lines[2].info.line_style, span_id);
}

#[test]
fn test_close_tag_margin_stays_with_last_word() {
    let span = InlineStyle {
        margin: EdgeSizes::horizontal(5.0, 5.0),
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    let _ = builder.open_tag(span);
    builder.append_text("AA BB");
    builder.close_tag().unwrap();
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[2], 12.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA", "BB"]);
    // "BB" fits, its end margin does not, and nothing may break before the
    // close tag: the line overflows instead of splitting the word off.
    let last = &lines[1].info;
    assert_eq!(last.results.len(), 2);
    assert_eq!(
        node.item(last.results[1].item_index).item_type,
        InlineItemType::CloseTag
    );
    assert!(last.has_overflow);
    assert!(last.is_last_line);
}

#[test]
fn test_end_margin_after_trailing_space_starts_next_line() {
    let span = InlineStyle {
        margin: EdgeSizes::horizontal(0.0, 10.0),
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    let _ = builder.open_tag(span);
    builder.append_text("AAA ");
    builder.close_tag().unwrap();
    builder.append_text("BBBB");
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &space_breaks(node.text()), 25.0);
    let lines = break_lines(&node, &mut harness);

    // The only opportunity is before the space, so the close tag and its
    // end margin move to the next line with "BBBB" and overflow there.
    assert_eq!(line_texts(&node, &lines), ["AAA", "BBBB"]);
    assert!(approx_eq(lines[0].info.inline_size(), 15.0));
    assert!(!lines[0].info.has_overflow);

    let last = &lines[1].info;
    assert_eq!(last.results.len(), 2);
    assert_eq!(
        node.item(last.results[0].item_index).item_type,
        InlineItemType::CloseTag
    );
    assert!(approx_eq(last.results[0].inline_size, 10.0));
    assert!(approx_eq(last.inline_size(), 30.0));
    assert!(last.has_overflow);
}

#[test]
fn test_oversized_item_breaks_before_its_inline_box() {
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    builder.append_text("AA");
    let _ = builder.open_tag(InlineStyle::default());
    builder.append_text("CCCCCC");
    builder.close_tag().unwrap();
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[2], 20.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA", "CCCCCC"]);
    // The break lands before the open tag, not between it and its text.
    assert_eq!(lines[0].token, Some(BreakToken::new(1, 2)));
    assert!(!lines[0].info.has_overflow);
    assert!(lines[1].info.has_overflow);
    assert!(lines[1].info.is_last_line);
}

#[test]
fn test_continued_open_tag_has_no_start_edge() {
    let span = InlineStyle {
        margin: EdgeSizes::horizontal(5.0, 5.0),
        padding: EdgeSizes {
            top: 2.0,
            bottom: 3.0,
            ..EdgeSizes::ZERO
        },
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    let _ = builder.open_tag_continued(span);
    builder.append_text("AA");
    builder.close_tag_continued().unwrap();
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    let results = &lines[0].info.results;
    assert_eq!(results.len(), 3);
    assert!(approx_eq(results[0].inline_size, 0.0));
    assert!(approx_eq(results[0].borders_paddings_block_start, 2.0));
    assert!(approx_eq(results[0].borders_paddings_block_end, 3.0));
    assert!(approx_eq(results[2].inline_size, 0.0));
    assert!(approx_eq(lines[0].info.inline_size(), 10.0));
}

#[test]
fn test_borders_and_padding_on_inline_box_edges() {
    let span = InlineStyle {
        border: EdgeSizes::uniform(1.0),
        padding: EdgeSizes::uniform(2.0),
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    let _ = builder.open_tag(span);
    builder.append_text("AA");
    builder.close_tag().unwrap();
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    let results = &lines[0].info.results;
    assert!(approx_eq(results[0].inline_size, 3.0));
    assert!(approx_eq(results[0].borders_paddings_block_start, 3.0));
    assert!(approx_eq(results[0].borders_paddings_block_end, 3.0));
    assert!(approx_eq(results[2].inline_size, 3.0));
    assert!(approx_eq(lines[0].info.inline_size(), 16.0));
}

#[test]
fn test_tags_alone_leave_width_unresolved() {
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    let _ = builder.open_tag(InlineStyle::default());
    builder.close_tag().unwrap();
    let node = builder.finish().unwrap();
    let mut harness = Harness::new(&node, &[], 100.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].info.available_width.is_none());
    assert!(!lines[0].info.has_overflow);
    assert!(lines[0].info.is_last_line);
    assert_eq!(harness.container.block_offset(), None);
}

#[test]
fn test_empty_node_has_no_lines() {
    let node = text_node("   ");
    assert!(node.is_empty());
    let mut harness = Harness::new(&node, &[], 100.0);
    let mut breaker = LineBreaker::new(&node, None);

    assert!(
        breaker
            .next_line(&mut harness.ctx(), LogicalOffset::default())
            .is_none()
    );
    assert_eq!(breaker.break_token(), None);
}

#[test]
fn test_resume_from_token_matches_continuous_breaking() {
    let text = "The quick brown fox jumps over the lazy dog";
    let node = text_node(text);
    let breaks = space_breaks(text);
    let mut harness = Harness::new(&node, &breaks, 40.0);
    let lines = break_lines(&node, &mut harness);
    assert!(lines.len() > 3);

    for pair in lines.windows(2) {
        let token = pair[0].token.unwrap();
        let mut fresh = Harness::new(&node, &breaks, 40.0);
        let mut breaker = LineBreaker::new(&node, Some(&token));
        let line = breaker
            .next_line(&mut fresh.ctx(), LogicalOffset::default())
            .unwrap();
        assert_eq!(line, pair[1].info);
        assert_eq!(breaker.break_token(), pair[1].token);
    }
}

#[test]
fn test_resume_inside_nested_break_all_span() {
    let span = InlineStyle {
        word_break: WordBreak::BreakAll,
        margin: EdgeSizes::horizontal(2.0, 3.0),
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    builder.append_text("one two ");
    let _ = builder.open_tag(span);
    builder.append_text("abcdefghijkl mn ");
    builder.close_tag().unwrap();
    builder.append_text(" three four");
    let node = builder.finish().unwrap();
    let breaks = space_breaks(node.text());

    let mut harness = Harness::new(&node, &breaks, 35.0);
    let lines = break_lines(&node, &mut harness);
    // The span's letters split across several lines.
    assert!(lines.len() > 4);
    assert!(resumed_lines_match(&node, &breaks, 35.0));
}

#[test]
fn test_resume_across_nowrap_tabs_and_breaks() {
    let pre_wrap = InlineStyle {
        white_space: WhiteSpace::PreWrap,
        ..InlineStyle::default()
    };
    let nowrap = InlineStyle {
        white_space: WhiteSpace::Nowrap,
        ..InlineStyle::default()
    };
    let mut builder = InlineNodeBuilder::new(InlineStyle::default());
    builder.append_text("AA ");
    let _ = builder.open_tag(pre_wrap);
    builder.append_text("B\tCC  DD\nE");
    let _ = builder.open_tag(nowrap);
    builder.append_text("FF GG HH");
    builder.close_tag().unwrap();
    builder.close_tag().unwrap();
    builder.append_break();
    builder.append_text("II JJ");
    let node = builder.finish().unwrap();
    let breaks = space_breaks(node.text());

    assert!(resumed_lines_match(&node, &breaks, 30.0));
}

#[test]
fn test_skip_collapsible_whitespace_is_idempotent() {
    let text = "AA BB CC";
    let node = text_node(text);
    let mut harness = Harness::new(&node, &space_breaks(text), 12.0);
    let mut breaker = LineBreaker::new(&node, None);
    let mut ctx = harness.ctx();

    while breaker
        .next_line(&mut ctx, LogicalOffset::default())
        .is_some()
    {
        assert!(!breaker.skip_collapsible_whitespace());
    }
}

#[test]
fn test_skip_collapsible_whitespace_moves_past_one_space() {
    let node = text_node("AA BB");
    let mut breaker = LineBreaker::new(&node, Some(&BreakToken::new(0, 2)));

    assert!(breaker.skip_collapsible_whitespace());
    assert_eq!(breaker.offset(), 3);
    assert!(!breaker.skip_collapsible_whitespace());
}

#[test]
fn test_preserved_space_is_not_skipped() {
    let style = InlineStyle {
        white_space: WhiteSpace::PreWrap,
        ..InlineStyle::default()
    };
    let node = styled_text_node(style, "AA BB");
    let mut breaker = LineBreaker::new(&node, Some(&BreakToken::new(0, 2)));

    assert!(!breaker.skip_collapsible_whitespace());
    assert_eq!(breaker.offset(), 2);
}

#[test]
fn test_preserved_spaces_hang_at_line_end() {
    let style = InlineStyle {
        white_space: WhiteSpace::PreWrap,
        ..InlineStyle::default()
    };
    let node = styled_text_node(style, "AA   BB");
    let mut harness = Harness::new(&node, &[2], 20.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA   ", "BB"]);
    assert!(approx_eq(lines[0].info.inline_size(), 10.0));
    assert!(!lines[0].info.has_overflow);
    assert_eq!(lines[0].token, Some(BreakToken::new(0, 5)));
    assert!(!lines[1].info.has_overflow);
    assert!(lines[1].info.is_last_line);
}

#[test]
fn test_hanging_spaces_at_end_finish_the_content() {
    let style = InlineStyle {
        white_space: WhiteSpace::PreWrap,
        ..InlineStyle::default()
    };
    let node = styled_text_node(style, "AA   ");
    let mut harness = Harness::new(&node, &[2], 12.0);
    let lines = break_lines(&node, &mut harness);

    assert_eq!(line_texts(&node, &lines), ["AA   "]);
    assert!(lines[0].info.is_last_line);
    assert!(!lines[0].info.has_overflow);
    assert_eq!(lines[0].token, None);
}

#[test]
#[should_panic(expected = "outside item")]
fn test_token_outside_item_panics() {
    let node = text_node("ABCDE");
    let _ = LineBreaker::new(&node, Some(&BreakToken::new(0, 9)));
}

#[test]
#[should_panic(expected = "out of range")]
fn test_token_past_last_item_panics() {
    let node = text_node("ABCDE");
    let _ = LineBreaker::new(&node, Some(&BreakToken::new(3, 0)));
}
