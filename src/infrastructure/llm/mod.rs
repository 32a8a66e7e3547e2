mod gemini_card_generator;
mod sentence_split_generator;

pub use gemini_card_generator::GeminiCardGenerator;
pub use sentence_split_generator::SentenceSplitGenerator;
