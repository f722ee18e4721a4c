use crate::embeddings::Embedder;
use crate::error::IngestError;
use crate::extractor::PdfExtractor;
use crate::index::VectorIndex;
use crate::models::{ChunkPayload, ChunkPoint, IngestSummary, UploadedFile};
use tracing::{debug, info};
use uuid::Uuid;

/// Pages whose trimmed text is shorter than this never become chunks.
pub const MIN_PAGE_CHARS: usize = 15;

/// Stored payload text is capped at this many characters. The cap bounds
/// payload size only; the vector is always computed from the full page text.
pub const STORED_TEXT_LIMIT: usize = 2000;

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Ingest a batch of uploaded files: extract per-page text from each PDF,
/// embed every retained page, and write one batch of points per file.
///
/// Files are processed in the order received, pages in document order.
/// Non-PDF files (by extension) are skipped without error but still count
/// toward `files` in the summary. The batch is not transactional: the first
/// error aborts the request and upserts already committed for earlier files
/// remain in the index.
pub async fn ingest_files<X, E, I>(
    files: &[UploadedFile],
    extractor: &X,
    embedder: &E,
    index: &I,
) -> Result<IngestSummary, IngestError>
where
    X: PdfExtractor + Send + Sync,
    E: Embedder + Send + Sync,
    I: VectorIndex + Send + Sync,
{
    let mut total_chunks = 0usize;

    for file in files {
        if !file.is_pdf() {
            debug!(file = %file.name, "skipping non-pdf upload");
            continue;
        }

        let pages = extractor.extract_pages(&file.bytes)?;
        let mut points = Vec::new();

        for page in &pages {
            let text = page.text.trim();
            if text.chars().count() < MIN_PAGE_CHARS {
                continue;
            }

            let vector = embedder.embed(text)?;
            let payload = ChunkPayload {
                text: truncate_chars(text, STORED_TEXT_LIMIT),
                pdf_name: file.name.clone(),
                page: page.number,
            };

            points.push(ChunkPoint {
                id: Uuid::new_v4(),
                vector,
                payload: payload.into_value(),
            });
        }

        let written = points.len();
        if !points.is_empty() {
            index.upsert(points).await?;
            total_chunks += written;
        }

        info!(
            file = %file.name,
            pages = pages.len(),
            chunks = written,
            "ingested file"
        );
    }

    Ok(IngestSummary {
        files: files.len(),
        pages: total_chunks,
    })
}
