use crate::error::SearchError;
use crate::models::{ChunkPoint, ScoredPoint};
use async_trait::async_trait;
use std::sync::RwLock;
use tracing::info;

pub const COLLECTION_NAME: &str = "pdf_documents";

#[async_trait]
pub trait VectorIndex {
    async fn upsert(&self, points: Vec<ChunkPoint>) -> Result<(), SearchError>;

    /// Nearest neighbors by cosine similarity, best first, at most `limit`.
    async fn query(&self, vector: &[f32], limit: usize)
        -> Result<Vec<ScoredPoint>, SearchError>;
}

/// Process-memory vector collection with cosine similarity. Created once at
/// startup, discarded with the process; there is no persistence and no
/// teardown. A single query method is fixed here at construction time, so no
/// per-request fallback between query strategies exists.
pub struct MemoryIndex {
    collection: String,
    vector_size: usize,
    points: RwLock<Vec<ChunkPoint>>,
}

impl MemoryIndex {
    pub fn new(collection: impl Into<String>, vector_size: usize) -> Self {
        let collection = collection.into();
        info!(collection = %collection, vector_size, "created vector collection");
        Self {
            collection,
            vector_size,
            points: RwLock::new(Vec::new()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn len(&self) -> usize {
        self.points.read().map(|points| points.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_dimensions(&self, got: usize) -> Result<(), SearchError> {
        if got != self.vector_size {
            return Err(SearchError::DimensionMismatch {
                got,
                expected: self.vector_size,
            });
        }
        Ok(())
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    let dot: f32 = left.iter().zip(right).map(|(a, b)| a * b).sum();
    let left_mag: f32 = left.iter().map(|v| v * v).sum::<f32>().sqrt();
    let right_mag: f32 = right.iter().map(|v| v * v).sum::<f32>().sqrt();

    if left_mag == 0.0 || right_mag == 0.0 {
        return 0.0;
    }
    dot / (left_mag * right_mag)
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, points: Vec<ChunkPoint>) -> Result<(), SearchError> {
        for point in &points {
            self.check_dimensions(point.vector.len())?;
        }

        let mut stored = self
            .points
            .write()
            .map_err(|_| SearchError::Request("index lock poisoned".to_string()))?;

        for point in points {
            match stored.iter_mut().find(|existing| existing.id == point.id) {
                Some(existing) => *existing = point,
                None => stored.push(point),
            }
        }

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, SearchError> {
        self.check_dimensions(vector.len())?;

        let stored = self
            .points
            .read()
            .map_err(|_| SearchError::Request("index lock poisoned".to_string()))?;

        let mut hits: Vec<ScoredPoint> = stored
            .iter()
            .map(|point| ScoredPoint {
                id: point.id,
                score: cosine_similarity(vector, &point.vector),
                payload: point.payload.clone(),
            })
            .collect();

        hits.sort_by(|left, right| right.score.total_cmp(&left.score));
        hits.truncate(limit);
        Ok(hits)
    }
}
