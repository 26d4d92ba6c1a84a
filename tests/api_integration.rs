use std::io::{Cursor, Write};
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use flowkit::{
    api::{API_KEY_HEADER, create_router},
    config::Config,
    processing::ChunkingService,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use zip::{ZipWriter, write::SimpleFileOptions};

const API_KEY: &str = "integration_key";

fn app() -> Router {
    create_router(Config::new(API_KEY), Arc::new(ChunkingService::new()))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("router response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json body"))
}

async fn list_functions(key: &str) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method(Method::GET)
            .uri("/")
            .header(API_KEY_HEADER, key)
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

async fn split(path: &str, document: &[u8], chunk_size: i64, chunk_overlap: i64) -> (StatusCode, Value) {
    let payload = json!({
        "document_content": STANDARD.encode(document),
        "chunk_size": chunk_size,
        "chunk_overlap": chunk_overlap,
    });
    send(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, API_KEY)
            .body(Body::from(payload.to_string()))
            .expect("request"),
    )
    .await
}

fn pptx(slides: &[&str]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (index, text) in slides.iter().enumerate() {
        writer
            .start_file(format!("ppt/slides/slide{}.xml", index + 1), options)
            .expect("start slide");
        let xml = format!(
            "<?xml version=\"1.0\"?><p:sld><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"
        );
        writer.write_all(xml.as_bytes()).expect("write slide");
    }
    writer.finish().expect("finish archive").into_inner()
}

#[tokio::test]
async fn listing_describes_splitter_endpoints() {
    let (status, body) = list_functions(API_KEY).await;
    assert_eq!(status, StatusCode::OK);

    let endpoints = body.as_array().expect("array body");
    assert_eq!(endpoints.len(), 3);

    let expected = [
        ("split_ppt", "/splitter/ppt", "Split PPT"),
        ("split_py", "/splitter/py", "Split Python Code"),
        ("split_pdf", "/splitter/pdf", "Split PDF"),
    ];
    for (endpoint, (name, path, display_name)) in endpoints.iter().zip(expected) {
        assert_eq!(endpoint["name"], name);
        assert_eq!(endpoint["path"], path);
        assert_eq!(endpoint["category"], "data_extraction");
        assert_eq!(endpoint["display_name"], display_name);
        assert!(
            endpoint["description"]
                .as_str()
                .expect("description")
                .starts_with("Endpoint for splitting")
        );
        assert_eq!(
            endpoint["inputs"],
            json!([
                {"name": "document_content", "type": "string(binary)"},
                {"name": "chunk_size", "type": "integer"},
                {"name": "chunk_overlap", "type": "integer"},
            ])
        );
        assert_eq!(
            endpoint["outputs"],
            json!([{"name": "chunks", "type": "array<string>"}])
        );
        assert_eq!(endpoint["definitions"], json!({}));
    }
}

#[tokio::test]
async fn listing_is_stable_across_requests() {
    let (_, first) = list_functions(API_KEY).await;
    let (_, second) = list_functions(API_KEY).await;
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn listing_rejects_wrong_key() {
    let (status, body) = list_functions("not-the-key").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"detail": "Invalid API key"}));
}

#[tokio::test]
async fn powerpoint_text_is_chunked() {
    let document = pptx(&["Quarterly results", "Revenue grew"]);
    let (status, body) = split("/splitter/ppt", &document, 100, 0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"chunks": ["Quarterly results Revenue grew"]}));
}

#[tokio::test]
async fn powerpoint_without_text_is_rejected() {
    let document = pptx(&[" "]);
    let (status, body) = split("/splitter/ppt", &document, 100, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "No text found in PowerPoint document"}));
}

#[tokio::test]
async fn corrupt_powerpoint_reports_processing_error() {
    let (status, body) = split("/splitter/ppt", b"not a presentation", 100, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["detail"]
            .as_str()
            .expect("detail")
            .starts_with("Error processing PowerPoint file: ")
    );
}

#[tokio::test]
async fn python_code_is_chunked_at_definitions() {
    let source = "def first():\n    return 1\n\n\ndef second():\n    return 2\n";
    let (status, body) = split("/splitter/py", source.as_bytes(), 8, 0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"chunks": ["def first():\n    return 1", "def second():\n    return 2"]})
    );
}

#[tokio::test]
async fn non_utf8_python_is_rejected() {
    let (status, body) = split("/splitter/py", &[0xff, 0xfe, 0xfd], 10, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "Error decoding Python code"}));
}

#[tokio::test]
async fn invalid_chunk_size_is_rejected() {
    let (status, body) = split("/splitter/pdf", b"%PDF-1.4", 0, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "No chunk size provided"}));
}
