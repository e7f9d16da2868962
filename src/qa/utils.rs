use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("PUNCTUATION regex is valid"));

/// 计算问题的 SHA256 哈希值
pub fn get_question_hash(question: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(question.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Trims and lower-cases a user question. Every later stage works on this form.
pub fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase()
}

/// True when the normalized question, with punctuation removed, is one of the greetings.
pub fn is_greeting(normalized_question: &str, greetings: &[String]) -> bool {
    let cleaned = PUNCTUATION.replace_all(normalized_question, "");
    greetings
        .iter()
        .any(|greeting| greeting.to_lowercase() == cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AskConfig;

    #[test]
    fn greetings_ignore_case_and_punctuation() {
        let greetings = AskConfig::default().greetings;
        for input in ["Hi!", "HELLO", "  hey.  ", "Good morning!!", "greetings,"] {
            assert!(
                is_greeting(&normalize_question(input), &greetings),
                "{input} should be a greeting"
            );
        }
    }

    #[test]
    fn non_greetings_are_not_matched() {
        let greetings = AskConfig::default().greetings;
        for input in ["hi there", "hello?? what is azure", "morning", ""] {
            assert!(!is_greeting(&normalize_question(input), &greetings));
        }
    }

    #[test]
    fn question_hash_is_stable_hex() {
        let hash = get_question_hash("what is x?");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, get_question_hash("what is x?"));
        assert_ne!(hash, get_question_hash("what is y?"));
    }
}
