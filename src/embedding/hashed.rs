use super::Embedder;
use anyhow::Result;
use async_trait::async_trait;

/// Feature-hashed bag-of-words embedding. Deterministic and offline; texts
/// sharing the same words (ignoring case and edge punctuation) get the same vector.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    ndims: usize,
}

impl HashedEmbedder {
    pub fn new(ndims: usize) -> Self {
        Self {
            ndims: ndims.max(1),
        }
    }

    pub fn embed_one(&self, text: &str) -> Vec<f64> {
        let mut embedding = vec![0.0; self.ndims];

        for token in text
            .to_lowercase()
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
        {
            embedding[token_hash(token) % self.ndims] += 1.0;
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    fn name(&self) -> &str {
        "hashed"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

/// FNV-1a, stable across runs and platforms.
fn token_hash(token: &str) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash as usize
}
