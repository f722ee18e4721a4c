use crate::embeddings::Embedder;
use crate::error::SearchError;
use crate::index::VectorIndex;
use crate::models::{ScoredPoint, SearchResult};
use serde_json::Value;
use tracing::debug;

/// Search returns at most this many hits.
pub const SEARCH_LIMIT: usize = 5;

/// Embed a free-text query and return the best-matching chunks, highest
/// score first. An empty query short-circuits to an empty result without
/// touching the embedder or the index. Any error aborts the whole request;
/// there are no partial results.
pub async fn search_chunks<E, I>(
    query: &str,
    embedder: &E,
    index: &I,
) -> Result<Vec<SearchResult>, SearchError>
where
    E: Embedder + Send + Sync,
    I: VectorIndex + Send + Sync,
{
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let query_vector = embedder.embed(query)?;
    let hits = index.query(&query_vector, SEARCH_LIMIT).await?;
    debug!(query, hits = hits.len(), "vector query complete");

    hits.into_iter().map(project_hit).collect()
}

/// A stored payload missing any expected field fails the whole query;
/// malformed hits are never silently skipped.
fn project_hit(hit: ScoredPoint) -> Result<SearchResult, SearchError> {
    let text = payload_str(&hit.payload, "text")?;
    let pdf_name = payload_str(&hit.payload, "pdf_name")?;
    let page = hit
        .payload
        .get("page")
        .and_then(Value::as_u64)
        .ok_or(SearchError::MalformedPayload("page"))?;

    Ok(SearchResult {
        text,
        pdf_name,
        page: page as u32,
        score: hit.score,
    })
}

fn payload_str(payload: &Value, field: &'static str) -> Result<String, SearchError> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(SearchError::MalformedPayload(field))
}
