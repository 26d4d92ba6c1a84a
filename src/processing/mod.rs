//! Document splitting pipeline: text extraction and chunking.

pub mod chunking;
pub mod extract;
mod service;
pub mod types;

pub use service::{ChunkingService, DocumentSplitter};
pub use types::{ChunkingError, DocumentKind, ExtractionError, ProcessingError, SplitRequest};
