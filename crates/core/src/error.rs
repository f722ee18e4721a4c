use thiserror::Error;

/// Failure produced by an [`crate::Embedder`] implementation. The bundled
/// trigram embedder never fails, but model-backed embedders can.
#[derive(Debug, Error)]
#[error("embedding error: {0}")]
pub struct EmbedError(pub String);

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error(transparent)]
    Embedding(#[from] EmbedError),

    #[error("index error: {0}")]
    Index(#[from] SearchError),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Embedding(#[from] EmbedError),

    #[error("vector dimension {got} does not match collection size {expected}")]
    DimensionMismatch { got: usize, expected: usize },

    #[error("hit payload missing field `{0}`")]
    MalformedPayload(&'static str),

    #[error("search request failed: {0}")]
    Request(String),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
