//! In-memory complaint index with exact cosine similarity ranking.
//!
//! Each entry binds a record to the embedding of its narrative, so ranking
//! never depends on two parallel arrays staying aligned.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::complaints::{MetadataField, Record};
use crate::semantic::embeddings::{model_id_hash, Embedding, TextEncoder};
use crate::semantic::error::SemanticSearchError;

/// An entry in the index.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub record: Record,
    pub embedding: Embedding,
    /// L2 norm of `embedding`, computed once at prepare time
    norm: f32,
}

/// Immutable snapshot of a prepared corpus.
#[derive(Debug)]
pub struct ComplaintIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
    model_name: String,
    model_id: [u8; 32],
}

/// A ranked search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Cosine similarity in [-1.0, 1.0]
    pub score: f32,
    pub record: Record,
}

/// Flat view of a hit for output. Missing metadata renders as "".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow<'a> {
    pub score: f32,
    pub position: usize,
    pub company: &'a str,
    pub product: &'a str,
    pub issue: &'a str,
    pub narrative: &'a str,
}

impl SearchResult {
    pub fn row(&self) -> ResultRow<'_> {
        let metadata = &self.record.metadata;
        ResultRow {
            score: self.score,
            position: self.record.position,
            company: metadata.display(MetadataField::Company),
            product: metadata.display(MetadataField::Product),
            issue: metadata.display(MetadataField::Issue),
            narrative: &self.record.narrative,
        }
    }
}

impl ComplaintIndex {
    /// Build an index from `records`, in order.
    ///
    /// All narratives go through a single `encode_many` call.
    pub fn prepare(
        encoder: &dyn TextEncoder,
        records: Vec<Record>,
    ) -> Result<Self, SemanticSearchError> {
        if records.is_empty() {
            return Err(SemanticSearchError::EmptyCorpus);
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.position) {
                return Err(SemanticSearchError::DuplicatePosition(record.position));
            }
        }

        let texts: Vec<String> = records.iter().map(|r| r.narrative.clone()).collect();
        let embeddings = encoder.encode_many(&texts)?;

        if embeddings.len() != records.len() {
            return Err(SemanticSearchError::EmbeddingCountMismatch {
                expected: records.len(),
                got: embeddings.len(),
            });
        }

        let dimensions = encoder.dimensions();
        let entries = records
            .into_iter()
            .zip(embeddings)
            .map(|(record, embedding)| {
                if embedding.len() != dimensions {
                    return Err(SemanticSearchError::DimensionMismatch {
                        expected: dimensions,
                        got: embedding.len(),
                    });
                }
                let norm = l2_norm(&embedding);
                Ok(IndexEntry {
                    record,
                    embedding,
                    norm,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            entries,
            dimensions,
            model_name: encoder.name().to_string(),
            model_id: model_id_hash(encoder.name()),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a prepared index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Entries in preparation order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Encode `query` with `encoder` and rank the corpus against it.
    ///
    /// `encoder` must be the same model the index was prepared with.
    pub fn search(
        &self,
        encoder: &dyn TextEncoder,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, SemanticSearchError> {
        if top_k == 0 {
            return Err(SemanticSearchError::InvalidArgument(
                "top_k must be greater than 0".to_string(),
            ));
        }
        if model_id_hash(encoder.name()) != self.model_id {
            return Err(SemanticSearchError::EncoderMismatch {
                index: self.model_name.clone(),
                encoder: encoder.name().to_string(),
            });
        }

        let query_embedding = encoder.encode_one(query)?;
        self.rank(&query_embedding, top_k)
    }

    /// Rank every entry against `query` and return the best `top_k`.
    ///
    /// Results are ordered by descending score; equal scores are ordered by
    /// ascending record position.
    pub fn rank(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, SemanticSearchError> {
        if top_k == 0 {
            return Err(SemanticSearchError::InvalidArgument(
                "top_k must be greater than 0".to_string(),
            ));
        }
        if query.len() != self.dimensions {
            return Err(SemanticSearchError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(query, query_norm, &entry.embedding, entry.norm);
                (score, entry)
            })
            .collect();

        let k = top_k.min(scored.len());
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_rank);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| SearchResult {
                score,
                record: entry.record.clone(),
            })
            .collect())
    }
}

/// Descending score, then ascending record position.
fn by_rank(a: &(f32, &IndexEntry), b: &(f32, &IndexEntry)) -> Ordering {
    b.0.total_cmp(&a.0)
        .then_with(|| a.1.record.position.cmp(&b.1.record.position))
}

/// Compute L2 norm of a vector.
fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity with precomputed norms.
///
/// A zero (or non-finite) norm on either side scores 0.0. The result is
/// clamped to [-1, 1] to absorb rounding. Never returns -0.0, which
/// `total_cmp` would rank below 0.0.
fn cosine_similarity(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if !a_norm.is_normal() || !b_norm.is_normal() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let score = dot_product / (a_norm * b_norm);
    if score.is_nan() {
        return 0.0;
    }
    // + 0.0 folds -0.0 into 0.0
    score.clamp(-1.0, 1.0) + 0.0
}
