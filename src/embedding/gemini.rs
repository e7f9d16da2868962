use super::{Embedder, KeyPool, key_manager::key_suffix};
use crate::config::EmbeddingConfig;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rig::{
    client::EmbeddingsClient, embeddings::builder::EmbeddingsBuilder,
    providers::gemini::Client as GeminiClient,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;

pub struct GeminiEmbedder {
    model: String,
    ndims: usize,
    max_attempts: u32,
    retry_delay: Duration,
    keys: KeyPool,
}

impl GeminiEmbedder {
    pub fn new(config: &EmbeddingConfig, keys: KeyPool) -> Self {
        Self {
            model: config.model.clone(),
            ndims: config.ndims,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            keys,
        }
    }

    /// 使用 rig 和 Gemini API 批量生成词向量
    async fn generate_embeddings(&self, api_key: &str, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let gemini_client = GeminiClient::new(api_key);
        let model = gemini_client.embedding_model_with_ndims(&self.model, self.ndims);

        let builder = EmbeddingsBuilder::new(model).documents(texts.iter().cloned())?;
        let embeddings: HashMap<String, Vec<f64>> = builder
            .build()
            .await?
            .into_iter()
            .map(|(document, embedding)| (document, embedding.first().vec))
            .collect();

        texts
            .iter()
            .map(|text| {
                embeddings
                    .get(text)
                    .cloned()
                    .ok_or_else(|| anyhow!("No embedding generated for '{}'", preview(text)))
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn name(&self) -> &str {
        "gemini"
    }

    /// Retries with key rotation: a rate-limited key is disabled and the next
    /// one is tried at once; any other failure waits `retry_delay` first.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempts = 0;
        loop {
            if attempts >= self.max_attempts {
                return Err(anyhow!(
                    "Failed to generate embeddings after {} attempts.",
                    self.max_attempts
                ));
            }
            attempts += 1;

            let api_key = match self.keys.get_key() {
                Ok(key) => key,
                Err(e) => {
                    log::error!("Could not get API key: {}. Retrying in {:?}.", e, self.retry_delay);
                    sleep(self.retry_delay).await;
                    continue;
                }
            };

            match self.generate_embeddings(&api_key, texts).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) if is_rate_limited(&e) => {
                    log::warn!(
                        "API key ending in ...{} is rate-limited. Disabling it. Error: {}",
                        key_suffix(&api_key),
                        e
                    );
                    self.keys.disable_key(&api_key);
                }
                Err(e) => {
                    log::error!(
                        "Failed to generate {} embedding(s) with key ending in ...{}: {}. Retrying in {:?}...",
                        texts.len(),
                        key_suffix(&api_key),
                        e,
                        self.retry_delay
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }
    }
}

fn is_rate_limited(error: &anyhow::Error) -> bool {
    let error_string = error.to_string().to_lowercase();
    error_string.contains("429") || error_string.contains("resource has been exhausted")
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
