use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// One file as received from the caller, before any format checks.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Files are recognized as PDFs purely by extension, case-insensitive.
    pub fn is_pdf(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Provenance payload stored next to each vector. Kept as loose JSON at the
/// index seam so the index stays a plain (id, vector, payload) store, the way
/// a vector database sees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkPayload {
    pub text: String,
    pub pdf_name: String,
    pub page: u32,
}

impl ChunkPayload {
    pub fn into_value(self) -> Value {
        json!({
            "text": self.text,
            "pdf_name": self.pdf_name,
            "page": self.page,
        })
    }
}

/// Unit of upsert: a fresh id, the embedding of the full page text, and the
/// provenance payload. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct ChunkPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: Value,
}

/// One nearest-neighbor hit as the index returns it, highest score first.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub id: Uuid,
    pub score: f32,
    pub payload: Value,
}

/// One search hit as surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub text: String,
    pub pdf_name: String,
    pub page: u32,
    pub score: f32,
}

/// Outcome of a fully successful ingestion batch. `files` counts every
/// uploaded file, skipped non-PDFs included; `pages` counts chunks written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub pages: usize,
}

impl IngestSummary {
    pub fn message(&self) -> String {
        format!(
            "Successfully ingested {} files ({} pages).",
            self.files, self.pages
        )
    }
}
