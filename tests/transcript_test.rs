use cardsmith::domain::{TranscriptSegment, TranscriptionResult, WordTimestamp};

fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
    TranscriptSegment {
        start,
        end,
        text: text.to_string(),
        words: vec![WordTimestamp {
            word: text.split(' ').next().unwrap_or_default().to_string(),
            start,
            end: start + 0.4,
        }],
    }
}

#[test]
fn given_segments_when_building_result_then_text_is_space_joined_and_duration_is_last_end() {
    let result = TranscriptionResult::from_segments(
        Some("en".to_string()),
        vec![segment(0.0, 2.0, "hello there"), segment(2.0, 4.5, "general")],
    );

    assert_eq!(result.text, "hello there general");
    assert_eq!(result.duration, 4.5);
    assert_eq!(result.language.as_deref(), Some("en"));
}

#[test]
fn given_no_segments_when_building_result_then_empty_text_and_zero_duration() {
    let result = TranscriptionResult::from_segments(None, vec![]);

    assert_eq!(result.text, "");
    assert_eq!(result.duration, 0.0);
    assert!(result.is_empty());
}

#[test]
fn given_offset_when_appending_then_segment_and_word_times_shift_together() {
    let mut merged = TranscriptionResult::from_segments(
        Some("en".to_string()),
        vec![segment(0.0, 3.0, "part one")],
    );

    let second = TranscriptionResult::from_segments(None, vec![segment(0.5, 2.0, "part two")]);
    merged.append_rebased(second, 100.0);

    assert_eq!(merged.text, "part one part two");
    assert_eq!(merged.segments[1].start, 100.5);
    assert_eq!(merged.segments[1].end, 102.0);
    assert_eq!(merged.segments[1].words[0].start, 100.5);
    assert!((merged.segments[1].words[0].end - 100.9).abs() < 1e-9);
}

#[test]
fn given_empty_other_when_appending_then_text_gains_no_trailing_space() {
    let mut merged = TranscriptionResult::from_segments(None, vec![segment(0.0, 1.0, "alone")]);

    merged.append_rebased(TranscriptionResult::default(), 10.0);

    assert_eq!(merged.text, "alone");
}

#[test]
fn given_empty_self_when_appending_then_text_gains_no_leading_space() {
    let mut merged = TranscriptionResult::default();

    let other = TranscriptionResult::from_segments(None, vec![segment(0.0, 1.0, "incoming")]);
    merged.append_rebased(other, 0.0);

    assert_eq!(merged.text, "incoming");
}
