use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Upper bound on source text handed to the card generator.
pub const MAX_SOURCE_CHARS: usize = 100_000;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.,?!:;()'"-]"#).unwrap());

/// Normalizes source text before card generation: NFKC normalization,
/// punctuation allow-list, whitespace collapse, and a length cap cut at a
/// sentence boundary when one falls in the final fifth.
pub fn sanitize_source_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let stripped = DISALLOWED.replace_all(&normalized, " ");
    let collapsed = collapse_whitespace(&stripped);
    truncate_at_sentence_boundary(&collapsed, MAX_SOURCE_CHARS)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_at_sentence_boundary(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.trim().to_string();
    }

    let cut = &chars[..max_chars];
    let last_period = cut.iter().rposition(|&c| c == '.');

    let keep = match last_period {
        // Only cut at the period when it lands in the final fifth;
        // otherwise too much content would be lost.
        Some(pos) if pos + 1 > max_chars * 4 / 5 => pos + 1,
        _ => max_chars,
    };

    cut[..keep].iter().collect::<String>().trim().to_string()
}
