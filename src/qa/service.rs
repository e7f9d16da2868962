//! src/qa/service.rs
//!
//! QAService is the facade over the question-answering system. It owns the
//! current store generation, the embedder and the suggestion RNG, and runs
//! the ask pipeline: empty store, greeting, relevance gate, similarity match.

use super::{
    relevance, search,
    types::{QASystem, QaStore},
    utils,
};
use crate::{
    config::{Config, FallbackMode},
    embedding::Embedder,
};
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// What `ask` decided. Handlers turn this into response text.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// No document has been uploaded yet.
    NoData,
    Greeting,
    /// Rejected by the keyword-overlap gate before any embedding work.
    Irrelevant,
    Matched {
        question: String,
        answer: String,
        score: f64,
    },
    /// Best score did not clear the threshold. `suggestions` is set only in
    /// suggest mode.
    NoMatch { suggestions: Option<Vec<String>> },
}

pub struct QAService {
    system: RwLock<Arc<QASystem>>,
    pub config: Arc<Config>,
    embedder: Arc<dyn Embedder>,
    rng: Mutex<StdRng>,
}

impl QAService {
    /// Creates an empty service whose suggestions are randomly seeded.
    pub fn new(config: Arc<Config>, embedder: Arc<dyn Embedder>) -> Self {
        Self::with_rng(config, embedder, StdRng::from_os_rng())
    }

    /// Creates an empty service with a caller-supplied RNG, for reproducible suggestions.
    pub fn with_rng(config: Arc<Config>, embedder: Arc<dyn Embedder>, rng: StdRng) -> Self {
        Self {
            system: RwLock::new(Arc::new(QASystem::default())),
            config,
            embedder,
            rng: Mutex::new(rng),
        }
    }

    /// Swaps in a new store. The previous store and its cached embeddings are dropped.
    pub async fn replace_store(&self, store: QaStore) -> usize {
        let next = Arc::new(QASystem::new(store));
        let count = next.store.len();
        *self.system.write().await = next;
        log::info!("QA store replaced; {} pair(s) loaded", count);
        count
    }

    pub async fn snapshot(&self) -> Arc<QASystem> {
        self.system.read().await.clone()
    }

    pub async fn qa_count(&self) -> usize {
        self.system.read().await.store.len()
    }

    pub async fn questions(&self) -> Vec<String> {
        self.snapshot()
            .await
            .store
            .questions()
            .map(str::to_string)
            .collect()
    }

    pub async fn ask(&self, question: &str) -> Result<AskOutcome> {
        let system = self.snapshot().await;
        let normalized = utils::normalize_question(question);

        if system.store.is_empty() {
            return Ok(AskOutcome::NoData);
        }

        if utils::is_greeting(&normalized, &self.config.ask.greetings) {
            return Ok(AskOutcome::Greeting);
        }

        if self.config.ask.relevance_filter {
            let report = relevance::assess(&normalized, &system.vocabulary);
            log::debug!(
                "Question: '{}', relevant words: {:?}, irrelevant words: {:?}",
                normalized,
                report.relevant,
                report.irrelevant
            );
            if !report.is_relevant() {
                return Ok(AskOutcome::Irrelevant);
            }
        }

        if normalized.is_empty() {
            return Ok(self.fallback(&system).await);
        }

        self.find_matching_qa(&system, &normalized).await
    }

    async fn find_matching_qa(&self, system: &QASystem, normalized: &str) -> Result<AskOutcome> {
        let question_embeddings = self.question_embeddings(system).await?;
        let query_embedding = self
            .embedder
            .embed(&[normalized.to_string()])
            .await?
            .into_iter()
            .next()
            .context("Embedder returned no vector for the query")?;

        let Some((index, similarity)) = search::find_best_match(&query_embedding, &question_embeddings)
        else {
            log::info!("No match found for: '{}'", normalized);
            return Ok(self.fallback(system).await);
        };

        // Questions differing only in case share one embedding; the last stored one answers.
        let items = system.store.items();
        let lowered = items[index].question.to_lowercase();
        let (index, item) = items
            .iter()
            .enumerate()
            .rev()
            .find(|(_, candidate)| candidate.question.to_lowercase() == lowered)
            .unwrap_or((index, &items[index]));

        let threshold = self.config.similarity.threshold;
        if similarity > threshold {
            log::info!(
                "Match found for query '{}': Q#{} ('{}') with similarity {:.4}",
                normalized,
                index,
                item.question,
                similarity
            );
            Ok(AskOutcome::Matched {
                question: item.question.clone(),
                answer: item.answer.clone(),
                score: similarity,
            })
        } else {
            log::info!(
                "No match above threshold {:.2} for query: '{}'. Best match was Q#{} ('{}') with similarity {:.4}",
                threshold,
                normalized,
                index,
                item.question,
                similarity
            );
            Ok(self.fallback(system).await)
        }
    }

    /// Embeddings for every stored question, in store order. Questions are
    /// embedded lower-cased and only once per store generation.
    async fn question_embeddings(&self, system: &QASystem) -> Result<Vec<Vec<f64>>> {
        let keyed: Vec<(String, String)> = system
            .store
            .questions()
            .map(|q| {
                let lowered = q.to_lowercase();
                (utils::get_question_hash(&lowered), lowered)
            })
            .collect();

        let mut cache = system.question_embeddings.lock().await;

        let mut missing: Vec<(String, String)> = Vec::new();
        for (hash, text) in &keyed {
            if !cache.contains_key(hash) && !missing.iter().any(|(h, _)| h == hash) {
                missing.push((hash.clone(), text.clone()));
            }
        }

        if !missing.is_empty() {
            log::info!(
                "Cache miss for {} question(s). Generating embeddings with {}...",
                missing.len(),
                self.embedder.name()
            );
            let texts: Vec<String> = missing.iter().map(|(_, text)| text.clone()).collect();
            let vectors = self
                .embedder
                .embed(&texts)
                .await
                .context("Failed to embed stored questions")?;
            anyhow::ensure!(
                vectors.len() == missing.len(),
                "Embedder returned {} vectors for {} questions",
                vectors.len(),
                missing.len()
            );
            for ((hash, _), vector) in missing.into_iter().zip(vectors) {
                cache.insert(hash, vector);
            }
        }

        keyed
            .iter()
            .map(|(hash, _)| {
                cache
                    .get(hash)
                    .cloned()
                    .context("Question embedding missing from cache")
            })
            .collect()
    }

    async fn fallback(&self, system: &QASystem) -> AskOutcome {
        match self.config.ask.fallback {
            FallbackMode::Reject => AskOutcome::NoMatch { suggestions: None },
            FallbackMode::Suggest => {
                let questions: Vec<String> =
                    system.store.questions().map(str::to_string).collect();
                let mut rng = self.rng.lock().await;
                let suggestions =
                    search::sample_questions(&questions, self.config.ask.suggestion_count, &mut *rng);
                AskOutcome::NoMatch {
                    suggestions: Some(suggestions),
                }
            }
        }
    }

    /// Number of stored-question embeddings cached for the current generation.
    pub async fn cached_embeddings_len(&self) -> usize {
        self.snapshot().await.question_embeddings.lock().await.len()
    }
}
