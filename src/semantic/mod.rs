//! Semantic search over complaint narratives.
//!
//! This module provides local semantic search using fastembed-rs for
//! generating embeddings and exact in-memory cosine similarity ranking.
//!
//! # Architecture
//!
//! - `embeddings`: The `TextEncoder` seam and the fastembed-backed model
//! - `index`: Immutable record/embedding index with top-K ranking
//! - `service`: Searcher owning the encoder and the prepared index
//! - `error`: Error taxonomy shared by the above

pub mod embeddings;
mod error;
mod index;
mod service;

pub use embeddings::{model_id_hash, Embedding, EmbeddingError, EmbeddingModel, TextEncoder};
pub use error::SemanticSearchError;
pub use index::{ComplaintIndex, IndexEntry, ResultRow, SearchResult};
pub use service::{ComplaintSearcher, SearchRequest};
