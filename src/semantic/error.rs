use crate::semantic::embeddings::EmbeddingError;

/// Errors that can occur during semantic search operations.
#[derive(Debug, thiserror::Error)]
pub enum SemanticSearchError {
    #[error("Encoder initialization failed: {0}")]
    EncoderInitialization(#[source] EmbeddingError),

    #[error("Cannot prepare an index from an empty corpus")]
    EmptyCorpus,

    #[error("Search called before prepare")]
    NotPrepared,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Encoder returned {got} embeddings for {expected} texts")]
    EmbeddingCountMismatch { expected: usize, got: usize },

    #[error("Duplicate record position {0}")]
    DuplicatePosition(usize),

    #[error("Index was built with model '{index}', query encoder is '{encoder}'")]
    EncoderMismatch { index: String, encoder: String },

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}
