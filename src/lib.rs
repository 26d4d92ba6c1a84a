#![deny(missing_docs)]

//! Core library for the Flowkit document-chunking service.

/// HTTP routing, authentication, and the splitter handlers.
pub mod api;
/// YAML and environment-driven configuration.
pub mod config;
/// Route recording and the self-describing function listing.
pub mod introspection;
/// Structured logging and tracing setup.
pub mod logging;
/// Text extraction and chunking pipeline.
pub mod processing;
