//! HTTP surface for Flowkit.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /splitter/ppt` – Extract text from a base64 PPTX and return chunks.
//! - `POST /splitter/py` – Split base64 Python source at definition boundaries.
//! - `POST /splitter/pdf` – Extract text from a base64 PDF and return chunks.
//! - `GET /` – Machine-readable listing of the documented functions above, built from the live
//!   route table on every request.
//!
//! Every endpoint requires the configured secret in the `api-key` header. Errors are returned as
//! `{"detail": "..."}` bodies.

pub mod splitter;

use crate::config::Config;
use crate::introspection::{
    DocumentedRouter, EndpointInfo, FunctionRegistry, HandlerDescriptor, RouteTable, TypeShape,
    extract_endpoint_info,
};
use crate::processing::{DocumentSplitter, ProcessingError};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    routes: Arc<RouteTable>,
    registry: Arc<FunctionRegistry>,
    splitter: Arc<dyn DocumentSplitter>,
}

/// Build the HTTP router and freeze its route table.
pub fn create_router(config: Config, splitter: Arc<dyn DocumentSplitter>) -> Router {
    let (router, routes) = DocumentedRouter::new()
        .nest("/splitter", splitter::router())
        .get("/", list_functions, Some(list_functions_descriptor()))
        .into_parts();
    tracing::debug!(routes = routes.len(), "Route table frozen");

    router.with_state(AppState {
        config: Arc::new(config),
        routes: Arc::new(routes),
        registry: Arc::new(function_registry()),
        splitter,
    })
}

/// Handlers that appear in the function listing.
pub fn function_registry() -> FunctionRegistry {
    splitter::descriptors().into_iter().collect()
}

fn list_functions_descriptor() -> HandlerDescriptor {
    HandlerDescriptor::builder("list_functions")
        .description("List all available functions and their endpoints.")
        .header("api_key")
        .returns_shape(TypeShape::primitive::<Vec<EndpointInfo>>())
        .build()
}

/// List all documented functions and their endpoints.
///
/// The listing is rebuilt from the route table on each call, so two requests against the same
/// process return identical bodies.
async fn list_functions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<EndpointInfo>>, ApiError> {
    authorize(&headers, &state.config)?;
    let endpoints = extract_endpoint_info(&state.registry, &state.routes);
    tracing::info!(endpoints = endpoints.len(), "Listed functions");
    Ok(Json(endpoints))
}

/// Check the `api-key` header against the configured secret.
pub(crate) fn authorize(headers: &HeaderMap, config: &Config) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    check_api_key(provided, config)
}

pub(crate) fn check_api_key(provided: Option<&str>, config: &Config) -> Result<(), ApiError> {
    if provided == Some(config.api_key.as_str()) {
        return Ok(());
    }
    tracing::warn!(present = provided.is_some(), "Rejected request with invalid API key");
    Err(ApiError::unauthorized())
}

/// Error returned to HTTP callers as `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Build an error with an explicit status.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// 400 with the given detail.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// 401 for a missing or wrong API key.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid API key")
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message returned in the `detail` field.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(inner: ProcessingError) -> Self {
        let status = match &inner {
            ProcessingError::Chunking(_) | ProcessingError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProcessingError::PowerPoint(_)
            | ProcessingError::Pdf(_)
            | ProcessingError::Decoding(_)
            | ProcessingError::NoText(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, inner.to_string())
    }
}
