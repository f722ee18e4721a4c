use crate::error::IngestError;
use lopdf::Document;

/// One page of extracted text. `number` is the 1-based position of the page
/// within its source document.
#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait PdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, IngestError>;
}

/// Extractor backed by `lopdf`, operating on uploaded bytes. Pages come back
/// in document order; pages without any text yield an empty string rather
/// than an error, so callers decide what to keep.
#[derive(Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, IngestError> {
        let document =
            Document::load_mem(bytes).map_err(|error| IngestError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .unwrap_or_default();

            pages.push(PageText {
                number: page_no,
                text,
            });
        }

        Ok(pages)
    }
}
