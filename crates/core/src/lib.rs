pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod models;
pub mod search;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use embeddings::{Embedder, TrigramEmbedder, EMBEDDING_DIMENSIONS};
pub use error::{EmbedError, IngestError, SearchError};
pub use extractor::{LopdfExtractor, PageText, PdfExtractor};
pub use index::{MemoryIndex, VectorIndex, COLLECTION_NAME};
pub use ingest::{ingest_files, MIN_PAGE_CHARS, STORED_TEXT_LIMIT};
pub use models::{ChunkPayload, ChunkPoint, IngestSummary, ScoredPoint, SearchResult, UploadedFile};
pub use search::{search_chunks, SEARCH_LIMIT};
