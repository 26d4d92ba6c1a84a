//! Core data types and error definitions for the splitting pipeline.

use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors raised while pulling plain text out of a document container.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PPTX zip container could not be opened or read.
    #[error("{0}")]
    Archive(#[from] zip::result::ZipError),
    /// A part inside the container could not be read.
    #[error("failed to read {part}: {source}")]
    Part {
        /// Archive path of the part.
        part: String,
        /// Underlying read failure.
        #[source]
        source: std::io::Error,
    },
    /// A slide part contained malformed XML.
    #[error("malformed XML in {part}: {source}")]
    Xml {
        /// Archive path of the part.
        part: String,
        /// Underlying parser failure.
        #[source]
        source: quick_xml::Error,
    },
    /// The PDF parser rejected the document.
    #[error("{0}")]
    Pdf(String),
    /// The parser task panicked or was cancelled.
    #[error("parser task failed: {0}")]
    Task(String),
}

/// Errors produced while turning text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Callers requested an impossible character budget.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the document splitting pipeline.
///
/// Display strings are the exact `detail` messages returned to HTTP callers.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The PowerPoint container could not be parsed.
    #[error("Error processing PowerPoint file: {0}")]
    PowerPoint(#[source] ExtractionError),
    /// The PDF could not be parsed.
    #[error("Error processing PDF file: {0}")]
    Pdf(#[source] ExtractionError),
    /// Source code was not valid UTF-8.
    #[error("Error decoding Python code")]
    Decoding(#[from] FromUtf8Error),
    /// Extraction succeeded but produced no text.
    #[error("No text found in {0} document")]
    NoText(&'static str),
    /// Chunking step failed to segment the text.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// The blocking split task panicked or was cancelled.
    #[error("Failed to split document: {0}")]
    Task(String),
}

/// Kinds of document the splitter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PPTX presentation.
    PowerPoint,
    /// PDF document.
    Pdf,
    /// Python source code.
    PythonCode,
}

impl DocumentKind {
    /// Label used in log lines and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::PowerPoint => "PowerPoint",
            Self::Pdf => "PDF",
            Self::PythonCode => "Python",
        }
    }
}

/// Decoded split request handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    /// Document format.
    pub kind: DocumentKind,
    /// Raw document bytes.
    pub content: Vec<u8>,
    /// Chunk budget in tokens.
    pub chunk_size: usize,
    /// Overlap budget in tokens.
    pub chunk_overlap: usize,
}
