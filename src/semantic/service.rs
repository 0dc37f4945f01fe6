//! Semantic search service for complaint narratives.
//!
//! Owns the encoder, loaded once, and the most recently prepared index:
//! - `prepare` embeds a corpus in one batch and swaps in the new index
//! - `search` encodes the query and ranks the prepared corpus
//! - prepared indices are shared as immutable `Arc` snapshots

use std::sync::Arc;

use serde::Deserialize;

use crate::complaints::Record;
use crate::config::SemanticSearchConfig;
use crate::semantic::embeddings::{EmbeddingModel, TextEncoder};
use crate::semantic::error::SemanticSearchError;
use crate::semantic::index::{ComplaintIndex, SearchResult};

/// Untyped search request, e.g. decoded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    #[serde(default)]
    pub top_k: Option<i64>,
}

/// Service for semantic search over complaint narratives.
pub struct ComplaintSearcher {
    encoder: Arc<dyn TextEncoder>,
    index: Option<Arc<ComplaintIndex>>,
    default_top_k: usize,
}

impl ComplaintSearcher {
    /// Create a searcher around an already-initialized encoder.
    pub fn new(encoder: Arc<dyn TextEncoder>) -> Self {
        Self {
            encoder,
            index: None,
            default_top_k: SemanticSearchConfig::default().default_top_k,
        }
    }

    /// Load the configured embedding model and wrap it in a searcher.
    ///
    /// A model that cannot be loaded is fatal: nothing can be searched
    /// without it.
    pub fn from_config(config: &SemanticSearchConfig) -> Result<Self, SemanticSearchError> {
        log::info!("Initializing semantic search with model '{}'", config.model);

        let model = EmbeddingModel::new(&config.model, config.cache_dir.clone(), config.batch_size)
            .map_err(SemanticSearchError::EncoderInitialization)?;

        Ok(Self::new(Arc::new(model)).with_default_top_k(config.default_top_k))
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    pub fn encoder(&self) -> &Arc<dyn TextEncoder> {
        &self.encoder
    }

    /// The prepared index, if any.
    pub fn index(&self) -> Option<Arc<ComplaintIndex>> {
        self.index.clone()
    }

    pub fn is_prepared(&self) -> bool {
        self.index.is_some()
    }

    /// Number of indexed records. Returns 0 if not yet prepared.
    pub fn indexed_count(&self) -> usize {
        self.index.as_ref().map(|index| index.len()).unwrap_or(0)
    }

    /// Embed `records` and make them the searchable corpus.
    ///
    /// The previous index stays in place if preparation fails.
    pub fn prepare(&mut self, records: Vec<Record>) -> Result<(), SemanticSearchError> {
        log::info!("Preparing semantic search embeddings...");

        let index = ComplaintIndex::prepare(self.encoder.as_ref(), records)?;
        log::info!(
            "Generated embeddings for {} complaints with {}",
            index.len(),
            index.model_name()
        );

        self.index = Some(Arc::new(index));
        Ok(())
    }

    /// Search the prepared corpus.
    ///
    /// Returns at most `top_k` results, best first. Equal scores are ordered
    /// by ascending record position.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>, SemanticSearchError> {
        let index = self.index.as_ref().ok_or(SemanticSearchError::NotPrepared)?;

        index.search(self.encoder.as_ref(), query, top_k)
    }

    /// Validate an untyped request and run it.
    pub fn search_request(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResult>, SemanticSearchError> {
        let query = request.query.as_deref().ok_or_else(|| {
            SemanticSearchError::InvalidArgument("query is required".to_string())
        })?;

        let top_k = match request.top_k {
            None => self.default_top_k,
            Some(k) if k > 0 => usize::try_from(k).map_err(|_| {
                SemanticSearchError::InvalidArgument(format!("top_k {} is too large", k))
            })?,
            Some(k) => {
                return Err(SemanticSearchError::InvalidArgument(format!(
                    "top_k must be greater than 0, got {}",
                    k
                )))
            }
        };

        self.search(query, top_k)
    }
}
