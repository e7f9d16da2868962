use super::types::QaStore;
use std::collections::{BTreeSet, HashSet};

/// All distinct whitespace-delimited tokens across the lower-cased stored questions.
pub fn topic_vocabulary(store: &QaStore) -> HashSet<String> {
    store
        .questions()
        .flat_map(|q| {
            q.to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Token overlap between a question and the topic vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceReport {
    pub relevant: BTreeSet<String>,
    pub irrelevant: BTreeSet<String>,
}

impl RelevanceReport {
    /// A question is on-topic only when known tokens outnumber unknown ones.
    pub fn is_relevant(&self) -> bool {
        self.irrelevant.len() < self.relevant.len()
    }
}

/// Splits the tokens of an already normalized question into known and unknown.
pub fn assess(normalized_question: &str, vocabulary: &HashSet<String>) -> RelevanceReport {
    let mut report = RelevanceReport::default();
    for token in normalized_question.split_whitespace() {
        if vocabulary.contains(token) {
            report.relevant.insert(token.to_string());
        } else {
            report.irrelevant.insert(token.to_string());
        }
    }
    report
}
