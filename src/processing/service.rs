//! Splitting service coordinating text extraction and chunking.

use async_trait::async_trait;

use super::{
    chunking::{character_budget, split_python_code, split_text},
    extract::{extract_pdf_text, extract_pptx_text},
    types::{DocumentKind, ExtractionError, ProcessingError, SplitRequest},
};

/// Abstraction over the splitting pipeline used by the HTTP surface.
#[async_trait]
pub trait DocumentSplitter: Send + Sync {
    /// Extract text from the request's document and cut it into chunks.
    async fn split(&self, request: SplitRequest) -> Result<Vec<String>, ProcessingError>;
}

/// Default pipeline: format-specific extraction followed by character-budget chunking.
///
/// Stateless; construct once and share it through an `Arc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChunkingService;

impl ChunkingService {
    /// Create the service.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentSplitter for ChunkingService {
    async fn split(&self, request: SplitRequest) -> Result<Vec<String>, ProcessingError> {
        let SplitRequest {
            kind,
            content,
            chunk_size,
            chunk_overlap,
        } = request;
        let chunk_size = character_budget(chunk_size);
        let overlap = character_budget(chunk_overlap);
        tracing::debug!(
            kind = kind.label(),
            bytes = content.len(),
            chunk_size,
            overlap,
            "Splitting document"
        );

        let job = move || -> Result<Vec<String>, ProcessingError> {
            match kind {
                DocumentKind::PowerPoint => {
                    let text = extract_pptx_text(&content).map_err(ProcessingError::PowerPoint)?;
                    ensure_text(kind, &text)?;
                    Ok(split_text(&text, chunk_size, overlap)?)
                }
                DocumentKind::Pdf => {
                    let text = extract_pdf_text(&content).map_err(ProcessingError::Pdf)?;
                    ensure_text(kind, &text)?;
                    Ok(split_text(&text, chunk_size, overlap)?)
                }
                DocumentKind::PythonCode => {
                    let source = String::from_utf8(content)?;
                    Ok(split_python_code(&source, chunk_size, overlap)?)
                }
            }
        };

        tokio::task::spawn_blocking(job)
            .await
            .map_err(|err| task_failure(kind, err.to_string()))?
    }
}

fn ensure_text(kind: DocumentKind, text: &str) -> Result<(), ProcessingError> {
    if text.trim().is_empty() {
        return Err(ProcessingError::NoText(kind.label()));
    }
    Ok(())
}

/// Parsers can panic on malformed input; report that as a processing error for the document kind.
fn task_failure(kind: DocumentKind, message: String) -> ProcessingError {
    match kind {
        DocumentKind::PowerPoint => ProcessingError::PowerPoint(ExtractionError::Task(message)),
        DocumentKind::Pdf => ProcessingError::Pdf(ExtractionError::Task(message)),
        DocumentKind::PythonCode => ProcessingError::Task(message),
    }
}
