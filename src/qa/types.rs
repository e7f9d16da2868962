use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QAItem {
    pub question: String,
    pub answer: String,
}

/// Ordered question -> answer mapping extracted from one document.
///
/// Questions are unique. Inserting a question that is already present replaces
/// its answer and keeps the original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QaStore {
    items: Vec<QAItem>,
    positions: HashMap<String, usize>,
}

impl QaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, returning the previous answer if the question was already stored.
    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<String>) -> Option<String> {
        let question = question.into();
        let answer = answer.into();
        match self.positions.get(&question) {
            Some(&index) => Some(std::mem::replace(&mut self.items[index].answer, answer)),
            None => {
                self.positions.insert(question.clone(), self.items.len());
                self.items.push(QAItem { question, answer });
                None
            }
        }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.positions
            .get(question)
            .map(|&index| self.items[index].answer.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[QAItem] {
        &self.items
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.question.as_str())
    }
}

impl FromIterator<(String, String)> for QaStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut store = QaStore::new();
        for (question, answer) in iter {
            store.insert(question, answer);
        }
        store
    }
}

/// One generation of the question-answering data: the store produced by a
/// single upload, its topic vocabulary, and the question embeddings computed
/// for it so far. A new upload produces a new `QASystem`; nothing is carried over.
#[derive(Debug, Default)]
pub struct QASystem {
    pub store: QaStore,
    pub vocabulary: HashSet<String>,
    /// Keyed by the hash of the lower-cased question.
    pub question_embeddings: Mutex<HashMap<String, Vec<f64>>>,
}

impl QASystem {
    pub fn new(store: QaStore) -> Self {
        let vocabulary = super::relevance::topic_vocabulary(&store);
        Self {
            store,
            vocabulary,
            question_embeddings: Mutex::new(HashMap::new()),
        }
    }
}
