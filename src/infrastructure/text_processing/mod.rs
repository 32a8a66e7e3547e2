mod text_sanitizer;

pub use text_sanitizer::{MAX_SOURCE_CHARS, sanitize_source_text, truncate_at_sentence_boundary};
