pub mod keywords;

pub use keywords::{match_phrases, match_tokens, resume_to_text, KeywordMatch};
