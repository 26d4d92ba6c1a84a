//! Document splitting endpoints mounted under `/splitter`.

use super::{ApiError, AppState, authorize};
use crate::introspection::{DocumentedRouter, HandlerDescriptor};
use crate::processing::{DocumentKind, SplitRequest};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const CATEGORY: &str = "data_extraction";

const SPLIT_PPT_DESCRIPTION: &str = "Endpoint for splitting text in a PowerPoint document into chunks.

Parameters
----------
request : SplitterRequest
    An object containing 'document_content' in Base64,
    'chunk_size', and 'chunk_overlap'
api_key : str
    The API key for authentication.";

const SPLIT_PY_DESCRIPTION: &str = "Endpoint for splitting Python code into chunks.

Parameters
----------
request : SplitterRequest
    An object containing 'document_content' in Base64,
    'chunk_size', and 'chunk_overlap'
api_key : str
    The API key for authentication.

Returns
-------
SplitterResponse
    An object containing a list of text chunks.";

const SPLIT_PDF_DESCRIPTION: &str = "Endpoint for splitting text in a PDF document into chunks.

Parameters
----------
request : SplitterRequest
    An object containing 'document_content' in Base64,
    'chunk_size', and 'chunk_overlap'.
api_key : str
    The API key for authentication.

Returns
-------
SplitterResponse
    An object containing a list of text chunks.";

/// Request body shared by the splitter endpoints.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SplitterRequest {
    /// Base64-encoded document bytes.
    #[schemars(schema_with = "crate::introspection::binary_string_schema")]
    pub document_content: String,
    /// Maximum chunk size in tokens.
    pub chunk_size: i64,
    /// Overlap between consecutive chunks in tokens.
    pub chunk_overlap: i64,
}

/// Response body shared by the splitter endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SplitterResponse {
    /// Text chunks in document order.
    pub chunks: Vec<String>,
}

pub(super) fn router() -> DocumentedRouter<AppState> {
    let [ppt, py, pdf] = descriptors();
    DocumentedRouter::new()
        .post("/ppt", split_ppt, Some(ppt))
        .post("/py", split_py, Some(py))
        .post("/pdf", split_pdf, Some(pdf))
}

/// Descriptors for the splitter handlers, in mounting order.
pub fn descriptors() -> [HandlerDescriptor; 3] {
    [
        descriptor("split_ppt", "Split PPT", SPLIT_PPT_DESCRIPTION),
        descriptor("split_py", "Split Python Code", SPLIT_PY_DESCRIPTION),
        descriptor("split_pdf", "Split PDF", SPLIT_PDF_DESCRIPTION),
    ]
}

fn descriptor(name: &str, display_name: &str, description: &str) -> HandlerDescriptor {
    HandlerDescriptor::builder(name)
        .category(CATEGORY)
        .display_name(display_name)
        .description(description)
        .body::<SplitterRequest>("request")
        .header("api_key")
        .returns::<SplitterResponse>()
        .build()
}

/// Split the text of a PowerPoint document into chunks.
async fn split_ppt(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SplitterRequest>, JsonRejection>,
) -> Result<Json<SplitterResponse>, ApiError> {
    split_document(&state, &headers, payload, DocumentKind::PowerPoint).await
}

/// Split Python source code into chunks.
async fn split_py(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SplitterRequest>, JsonRejection>,
) -> Result<Json<SplitterResponse>, ApiError> {
    split_document(&state, &headers, payload, DocumentKind::PythonCode).await
}

/// Split the text of a PDF document into chunks.
async fn split_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SplitterRequest>, JsonRejection>,
) -> Result<Json<SplitterResponse>, ApiError> {
    split_document(&state, &headers, payload, DocumentKind::Pdf).await
}

async fn split_document(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<SplitterRequest>, JsonRejection>,
    kind: DocumentKind,
) -> Result<Json<SplitterResponse>, ApiError> {
    authorize(headers, &state.config)?;
    let Json(request) = payload
        .map_err(|rejection| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()))?;
    let request = decode_request(&request, kind)?;
    let chunk_size = request.chunk_size;

    let chunks = state.splitter.split(request).await?;
    tracing::info!(
        kind = kind.label(),
        chunks = chunks.len(),
        chunk_size,
        "Split request completed"
    );
    Ok(Json(SplitterResponse { chunks }))
}

fn validate_fields(request: &SplitterRequest) -> Result<(), ApiError> {
    if request.document_content.is_empty() {
        return Err(ApiError::bad_request("No document content provided"));
    }
    if request.chunk_size == 0 {
        return Err(ApiError::bad_request("No chunk size provided"));
    }
    if request.chunk_size < 0 {
        return Err(ApiError::bad_request("Chunk size must be greater than 0"));
    }
    if request.chunk_overlap < 0 {
        return Err(ApiError::bad_request(
            "Chunk overlap must be greater than or equal to 0",
        ));
    }
    Ok(())
}

fn decode_request(request: &SplitterRequest, kind: DocumentKind) -> Result<SplitRequest, ApiError> {
    validate_fields(request)?;
    let content = decode_base64(&request.document_content)?;
    let chunk_size = usize::try_from(request.chunk_size)
        .map_err(|_| ApiError::bad_request("Chunk size must be greater than 0"))?;
    let chunk_overlap = usize::try_from(request.chunk_overlap)
        .map_err(|_| ApiError::bad_request("Chunk overlap must be greater than or equal to 0"))?;
    Ok(SplitRequest {
        kind,
        content,
        chunk_size,
        chunk_overlap,
    })
}

/// Decode standard base64, ignoring line breaks and other ASCII whitespace.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let compact: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|_| ApiError::bad_request("Invalid Base64 encoding"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{API_KEY_HEADER, create_router};
    use crate::config::Config;
    use crate::processing::extract::fixtures;
    use crate::processing::{ChunkingService, DocumentSplitter, ProcessingError};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request},
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const API_KEY: &str = "test_api_key";

    fn request(document_content: &str, chunk_size: i64, chunk_overlap: i64) -> SplitterRequest {
        SplitterRequest {
            document_content: document_content.to_string(),
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn field_validation_reports_first_failure() {
        let cases = [
            (request("dGVzdA==", 100, 10), None),
            (request("", 100, 10), Some("No document content provided")),
            (request("dGVzdA==", 0, 10), Some("No chunk size provided")),
            (request("dGVzdA==", -5, 10), Some("Chunk size must be greater than 0")),
            (
                request("dGVzdA==", 100, -1),
                Some("Chunk overlap must be greater than or equal to 0"),
            ),
            (request("", 0, -1), Some("No document content provided")),
            (request("dGVzdA==", -1, -1), Some("Chunk size must be greater than 0")),
        ];

        for (body, expected) in cases {
            let outcome = validate_fields(&body);
            match expected {
                None => assert!(outcome.is_ok(), "unexpected error: {outcome:?}"),
                Some(detail) => {
                    let error = outcome.expect_err("validation should fail");
                    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
                    assert_eq!(error.detail(), detail);
                }
            }
        }
    }

    #[test]
    fn line_wrapped_base64_is_accepted() {
        let decoded = decode_request(
            &request("dGVzdCBkb2N1\nbWVudA==", 10, 0),
            DocumentKind::PythonCode,
        )
        .expect("wrapped base64 decodes");
        assert_eq!(decoded.content, b"test document");

        let padded = decode_request(
            &request("  dGVz\r\n dCBk b2N1bWVudA==\n", 10, 0),
            DocumentKind::PythonCode,
        )
        .expect("whitespace is ignored");
        assert_eq!(padded.content, b"test document");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let error = decode_request(&request("***", 10, 0), DocumentKind::PythonCode).unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.detail(), "Invalid Base64 encoding");
    }

    #[test]
    fn splitter_schema_flattens_to_expected_fields() {
        let [ppt, ..] = descriptors();
        let inputs = crate::introspection::signature::get_parameters_info(&ppt.parameters);
        let types: Vec<_> = inputs
            .iter()
            .map(|field| (field.name.as_str(), field.type_name.as_str()))
            .collect();
        assert_eq!(
            types,
            vec![
                ("document_content", "string(binary)"),
                ("chunk_size", "integer"),
                ("chunk_overlap", "integer"),
            ]
        );
    }

    #[derive(Default)]
    struct RecordingSplitter {
        calls: Mutex<Vec<SplitRequest>>,
    }

    #[async_trait]
    impl DocumentSplitter for RecordingSplitter {
        async fn split(&self, request: SplitRequest) -> Result<Vec<String>, ProcessingError> {
            self.calls.lock().expect("lock").push(request);
            Ok(vec!["chunk".to_string()])
        }
    }

    async fn post_json(app: Router, path: &str, key: &str, payload: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(path)
                    .header("content-type", "application/json")
                    .header(API_KEY_HEADER, key)
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn routes_dispatch_decoded_requests() {
        let splitter = Arc::new(RecordingSplitter::default());
        let app = create_router(Config::new(API_KEY), splitter.clone());
        let payload = json!({"document_content": "dGVzdA==", "chunk_size": 50, "chunk_overlap": 5});

        for path in ["/splitter/ppt", "/splitter/py", "/splitter/pdf"] {
            let (status, body) = post_json(app.clone(), path, API_KEY, payload.clone()).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, json!({"chunks": ["chunk"]}));
        }

        let calls = splitter.calls.lock().expect("lock");
        let kinds: Vec<_> = calls.iter().map(|call| call.kind).collect();
        assert_eq!(
            kinds,
            vec![DocumentKind::PowerPoint, DocumentKind::PythonCode, DocumentKind::Pdf]
        );
        assert_eq!(calls[0].content, b"test");
        assert_eq!(calls[0].chunk_size, 50);
        assert_eq!(calls[0].chunk_overlap, 5);
    }

    #[tokio::test]
    async fn wrong_key_is_rejected_before_processing() {
        let splitter = Arc::new(RecordingSplitter::default());
        let app = create_router(Config::new(API_KEY), splitter.clone());
        let payload = json!({"document_content": "dGVzdA==", "chunk_size": 50, "chunk_overlap": 5});

        let (status, body) = post_json(app, "/splitter/py", "nope", payload).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"detail": "Invalid API key"}));
        assert!(splitter.calls.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_unprocessable() {
        let app = create_router(Config::new(API_KEY), Arc::new(RecordingSplitter::default()));
        let (status, body) =
            post_json(app, "/splitter/pdf", API_KEY, json!({"chunk_size": 10})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn python_source_round_trips_through_service() {
        let app = create_router(Config::new(API_KEY), Arc::new(ChunkingService::new()));
        let source = "def hello_world():\n    print(\"Hello, world!\")\n";
        let payload = json!({
            "document_content": STANDARD.encode(source),
            "chunk_size": 50,
            "chunk_overlap": 5
        });

        let (status, body) = post_json(app, "/splitter/py", API_KEY, payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"chunks": ["def hello_world():\n    print(\"Hello, world!\")"]})
        );
    }

    #[tokio::test]
    async fn pdf_text_layer_is_chunked() {
        let app = create_router(Config::new(API_KEY), Arc::new(ChunkingService::new()));
        let payload = json!({
            "document_content": STANDARD.encode(fixtures::pdf(Some("Hello PDF world"))),
            "chunk_size": 100,
            "chunk_overlap": 0
        });

        let (status, body) = post_json(app, "/splitter/pdf", API_KEY, payload).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let chunks = body["chunks"].as_array().expect("chunks array");
        assert_eq!(chunks.len(), 1);
        let text = chunks[0].as_str().expect("chunk text");
        assert!(text.contains("Hello"), "{text:?}");
        assert!(text.contains("world"), "{text:?}");
    }

    #[tokio::test]
    async fn pdf_without_text_layer_is_rejected() {
        let app = create_router(Config::new(API_KEY), Arc::new(ChunkingService::new()));
        let payload = json!({
            "document_content": STANDARD.encode(fixtures::pdf(None)),
            "chunk_size": 100,
            "chunk_overlap": 0
        });

        let (status, body) = post_json(app, "/splitter/pdf", API_KEY, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "No text found in PDF document"}));
    }
}
