//! Deterministic feature-hashing embedder.
//!
//! Each lowercased word is hashed into one of `dimensions` buckets with a
//! sign taken from the same digest, then the vector is L2-normalized. Texts
//! sharing vocabulary land close together, which is all the history index
//! needs when no embedding service is configured.

use async_trait::async_trait;
use contextor_core::error::ProviderError;
use contextor_core::provider::Embedder;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| !w.is_empty())
        {
            let digest = Sha256::digest(word.as_bytes());
            let bucket = u64::from_le_bytes([
                digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6],
                digest[7],
            ]) as usize
                % self.dimensions;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self.vectorize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn output_is_normalized_and_sized() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed("tokio runtime worker threads").await.unwrap();
        assert_eq!(v.len(), 64);
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn identical_text_is_identical_vector() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("Rust borrow checker").await.unwrap();
        let b = embedder.embed("rust BORROW checker").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn shared_vocabulary_scores_higher() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed("postgres index tuning").await.unwrap();
        let related = embedder.embed("tuning a postgres index").await.unwrap();
        let unrelated = embedder.embed("banana bread recipe").await.unwrap();
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[tokio::test]
    async fn empty_text_is_zero_vector() {
        let v = HashEmbedder::new(8).embed("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
