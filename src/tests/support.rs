//! Deterministic encoders for tests that must not download a model.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::semantic::{Embedding, EmbeddingError, TextEncoder};

/// Hashed bag-of-words encoder.
///
/// Each lowercase alphanumeric token increments one bucket chosen by its
/// SHA256. Texts sharing words get positive cosine similarity; texts sharing
/// none score (almost always) 0. Empty text encodes to the zero vector.
pub struct BagOfWordsEncoder {
    dimensions: usize,
}

impl BagOfWordsEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn bucket(&self, token: &str) -> usize {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(token.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(bytes) % self.dimensions as u64) as usize
    }

    fn encode(&self, text: &str) -> Embedding {
        let mut v = vec![0.0; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            v[self.bucket(&token.to_lowercase())] += 1.0;
        }
        v
    }
}

impl Default for BagOfWordsEncoder {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl TextEncoder for BagOfWordsEncoder {
    fn name(&self) -> &str {
        "bag-of-words"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode_many(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }
}

/// Wraps an encoder and counts `encode_many` invocations.
pub struct CountingEncoder<E> {
    inner: E,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl<E: TextEncoder> CountingEncoder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl<E: TextEncoder> TextEncoder for CountingEncoder<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn encode_many(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.encode_many(texts)
    }
}

/// Encoder whose model never loads.
pub struct FailingEncoder;

impl TextEncoder for FailingEncoder {
    fn name(&self) -> &str {
        "failing"
    }

    fn dimensions(&self) -> usize {
        4
    }

    fn encode_many(&self, _texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Err(EmbeddingError::EmbeddingFailed("model unavailable".to_string()))
    }
}
