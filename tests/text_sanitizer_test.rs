use cardsmith::infrastructure::text_processing::{
    sanitize_source_text, truncate_at_sentence_boundary,
};

#[test]
fn given_ragged_whitespace_when_sanitizing_then_collapsed_to_single_spaces() {
    let raw = "First   line\n\n\tsecond\tline  \n third";

    let cleaned = sanitize_source_text(raw);

    assert_eq!(cleaned, "First line second line third");
}

#[test]
fn given_exotic_characters_when_sanitizing_then_stripped() {
    let raw = "Energy @ flows ∮ through § the cell";

    let cleaned = sanitize_source_text(raw);

    assert_eq!(cleaned, "Energy flows through the cell");
}

#[test]
fn given_plain_punctuation_when_sanitizing_then_preserved() {
    let raw = "Is this kept? Yes: commas, periods. (And parentheses!)";

    let cleaned = sanitize_source_text(raw);

    assert_eq!(cleaned, raw);
}

#[test]
fn given_text_under_cap_when_truncating_then_unchanged() {
    let text = "Short text with a period. And a tail";

    assert_eq!(truncate_at_sentence_boundary(text, 100), text);
}

#[test]
fn given_period_in_final_fifth_when_truncating_then_cut_at_sentence_boundary() {
    let text = format!("{}. {}", "a".repeat(88), "b".repeat(40));

    let truncated = truncate_at_sentence_boundary(&text, 100);

    assert!(truncated.ends_with('.'));
    assert_eq!(truncated.chars().count(), 89);
}

#[test]
fn given_no_late_period_when_truncating_then_hard_cut_at_cap() {
    let text = "x".repeat(150);

    let truncated = truncate_at_sentence_boundary(&text, 100);

    assert_eq!(truncated.chars().count(), 100);
}
