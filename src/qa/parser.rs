//! src/qa/parser.rs
//!
//! Pulls "Q: ... / A: ..." pairs out of extracted document text.

use super::types::QaStore;
use regex::Regex;
use std::sync::LazyLock;

/// A question marker at the start of a line ends the previous answer.
static NEXT_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\nQ:").expect("NEXT_QUESTION regex is valid"));

/// Question text up to the first line starting with `A:`, then the answer.
static QA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)\r?\nA:(.*)$").expect("QA_BLOCK regex is valid"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("LINE_BREAK regex is valid"));

/// Extracts every well-formed pair in document order. Fragments without an
/// `A:` line are skipped.
pub fn extract_qa_pairs(text: &str) -> Vec<(String, String)> {
    let Some(start) = text.find("Q:") else {
        return Vec::new();
    };

    NEXT_QUESTION
        .split(&text[start + "Q:".len()..])
        .filter_map(parse_block)
        .collect()
}

/// Extracts pairs and folds them into a store; a repeated question keeps the last answer.
pub fn extract_qa(text: &str) -> QaStore {
    let pairs = extract_qa_pairs(text);
    let total = pairs.len();
    let store: QaStore = pairs.into_iter().collect();
    if store.len() < total {
        log::debug!(
            "{} duplicate question(s) overwritten while parsing",
            total - store.len()
        );
    }
    store
}

fn parse_block(block: &str) -> Option<(String, String)> {
    let captures = QA_BLOCK.captures(block)?;
    let question = captures.get(1)?.as_str().trim();
    if question.is_empty() {
        return None;
    }
    let answer = captures.get(2)?.as_str().trim();
    let answer = LINE_BREAK.replace_all(answer, " ");
    Some((question.to_string(), answer.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pair_round_trip() {
        let store = extract_qa("Q: What is X?\nA: X is Y.\n");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("What is X?"), Some("X is Y."));
    }

    #[test]
    fn multi_line_answers_are_joined_with_spaces() {
        let text = "Q: What is Microsoft AI?\nA: A set of services\nfor building\nintelligent apps.\nQ: What is Azure AI?\nA:   Cloud AI.  ";
        let pairs = extract_qa_pairs(text);

        assert_eq!(
            pairs,
            vec![
                (
                    "What is Microsoft AI?".to_string(),
                    "A set of services for building intelligent apps.".to_string()
                ),
                ("What is Azure AI?".to_string(), "Cloud AI.".to_string()),
            ]
        );
        assert!(pairs.iter().all(|(_, a)| !a.contains('\n')));
    }

    #[test]
    fn extracts_exactly_n_pairs() {
        let text: String = (0..25)
            .map(|i| format!("Q:  Question number {i} \nA: Answer\nnumber {i}\n"))
            .collect();
        let store = extract_qa(text.trim());

        assert_eq!(store.len(), 25);
        for (i, item) in store.items().iter().enumerate() {
            assert_eq!(item.question, format!("Question number {i}"));
            assert_eq!(item.answer, format!("Answer number {i}"));
        }
    }

    #[test]
    fn no_markers_yields_empty_store() {
        assert!(extract_qa("Just a regular document.\nNothing to see.").is_empty());
        assert!(extract_qa("").is_empty());
    }

    #[test]
    fn trailing_question_without_answer_is_dropped() {
        let store = extract_qa("Q: One?\nA: Yes.\nQ: Dangling question?");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("One?"), Some("Yes."));
    }

    #[test]
    fn question_without_answer_before_next_question_is_dropped() {
        assert_eq!(
            extract_qa_pairs("Q: a\nQ: b\nA: c"),
            vec![("b".to_string(), "c".to_string())]
        );
    }

    #[test]
    fn preamble_is_ignored_and_crlf_is_handled() {
        let text = "Company FAQ\r\nRevised 2024\r\nQ: Who?\r\nA: Us.\r\nStill us.\r\nQ: When?\r\nA: Now.";
        let pairs = extract_qa_pairs(text);
        assert_eq!(
            pairs,
            vec![
                ("Who?".to_string(), "Us. Still us.".to_string()),
                ("When?".to_string(), "Now.".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_question_keeps_last_answer() {
        let store = extract_qa("Q: Same?\nA: first\nQ: Other?\nA: other\nQ: Same?\nA: second");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Same?"), Some("second"));
        assert_eq!(store.items()[0].question, "Same?");
    }

    #[test]
    fn empty_question_is_dropped() {
        let store = extract_qa("Q:\nA: orphan answer\nQ: Real?\nA: Real.");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Real?"), Some("Real."));
    }
}
