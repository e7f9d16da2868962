//! src/embedding/mod.rs
//!
//! Sentence embedding providers. The rest of the crate only sees the
//! [`Embedder`] trait, so the remote Gemini model and the offline hashed
//! model are interchangeable.

use crate::config::{Config, EmbeddingProvider};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

pub mod gemini;
pub mod hashed;
pub mod key_manager;

pub use gemini::GeminiEmbedder;
pub use hashed::HashedEmbedder;
pub use key_manager::KeyPool;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Embeds every text, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;
}

/// Builds the embedder selected in the config.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match config.embedding.provider {
        EmbeddingProvider::Gemini => {
            let keys = KeyPool::new(config.embedding.api_keys.clone());
            if keys.is_empty() {
                bail!("No API keys configured for the gemini embedding provider.");
            }
            log::info!(
                "Using Gemini embeddings (model {}, {} dims, {} key(s))",
                config.embedding.model,
                config.embedding.ndims,
                keys.len()
            );
            Ok(Arc::new(GeminiEmbedder::new(&config.embedding, keys)))
        }
        EmbeddingProvider::Hashed => {
            log::info!(
                "Using offline hashed embeddings ({} dims)",
                config.embedding.ndims
            );
            Ok(Arc::new(HashedEmbedder::new(config.embedding.ndims)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_without_keys_is_rejected() {
        let mut config = Config::default();
        config.embedding.api_keys.clear();
        assert!(build_embedder(&config).is_err());
    }

    #[tokio::test]
    async fn hashed_provider_is_selectable() {
        let mut config = Config::default();
        config.embedding.provider = EmbeddingProvider::Hashed;
        config.embedding.ndims = 32;

        let embedder = build_embedder(&config).unwrap();
        assert_eq!(embedder.name(), "hashed");
        let vectors = embedder.embed(&["hello world".to_string()]).await.unwrap();
        assert_eq!(vectors[0].len(), 32);
    }
}
