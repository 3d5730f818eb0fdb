// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapter tests against wiremock.

use std::time::Duration;

use dreamshot_config::model::{ApiConfig, AppConfig, ProxyConfig, WatcherConfig};
use dreamshot_core::{
    DocumentStore, DreamshotError, GenerationApi, ImageFile, JobId, JobStatus, SampleSource,
    StartGenerationRequest, ToolRef, UserId,
};
use dreamshot_remote::generation::START_FAILED_MESSAGE;
use dreamshot_remote::{HttpGenerationApi, PollingDocumentStore, ProxySampleSource};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(images: usize) -> StartGenerationRequest {
    StartGenerationRequest {
        tool: ToolRef {
            category: "effects".into(),
            slug: "ghibli".into(),
        },
        user_id: UserId("uid-1".into()),
        images: (0..images)
            .map(|i| ImageFile::new(format!("img{i}.png"), "image/png", b"PNGDATA".to_vec()))
            .collect(),
    }
}

fn api_config(server: &MockServer, api_key: Option<&str>) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        api_key: api_key.map(String::from),
        timeout_secs: 5,
        ..Default::default()
    }
}

// --- start generation ---

#[tokio::test]
async fn start_generation_posts_multipart_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(header("authorization", "Bearer secret"))
        .and(body_string_contains("name=\"slug\""))
        .and(body_string_contains("ghibli"))
        .and(body_string_contains("name=\"userId\""))
        .and(body_string_contains("name=\"image\"; filename=\"img0.png\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"jobId": "abc123", "status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpGenerationApi::new(&api_config(&server, Some("secret"))).unwrap();
    let response = api.start_generation(request(1)).await.unwrap();
    assert_eq!(response.job_id, JobId("abc123".into()));
    assert_eq!(response.status, "pending");
}

#[tokio::test]
async fn dual_request_numbers_image_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("name=\"image1\""))
        .and(body_string_contains("name=\"image2\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"jobId": "dual-1", "status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpGenerationApi::new(&api_config(&server, None)).unwrap();
    let response = api.start_generation(request(2)).await.unwrap();
    assert_eq!(response.job_id, JobId("dual-1".into()));
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({"error": "Not enough credits"})))
        .mount(&server)
        .await;

    let api = HttpGenerationApi::new(&api_config(&server, None)).unwrap();
    let err = api.start_generation(request(1)).await.unwrap_err();
    assert!(matches!(err, DreamshotError::Transport { .. }));
    assert_eq!(err.user_message(), "Not enough credits");
}

#[tokio::test]
async fn opaque_server_error_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpGenerationApi::new(&api_config(&server, None)).unwrap();
    let err = api.start_generation(request(1)).await.unwrap_err();
    assert_eq!(err.user_message(), START_FAILED_MESSAGE);
}

#[tokio::test]
async fn malformed_success_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let api = HttpGenerationApi::new(&api_config(&server, None)).unwrap();
    assert!(api.start_generation(request(1)).await.is_err());
}

#[tokio::test]
async fn image_count_is_checked_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = HttpGenerationApi::new(&api_config(&server, None)).unwrap();
    assert!(matches!(
        api.start_generation(request(0)).await,
        Err(DreamshotError::Validation(_))
    ));
    assert!(matches!(
        api.start_generation(request(3)).await,
        Err(DreamshotError::Validation(_))
    ));
}

// --- polling document store ---

const DOC_PATH: &str = "users/uid-1/generations/abc123";

fn store(server: &MockServer) -> PollingDocumentStore {
    PollingDocumentStore::new(
        &WatcherConfig {
            store_base_url: format!("{}/store", server.uri()),
            poll_interval_ms: 10,
            ..Default::default()
        },
        &ApiConfig {
            timeout_secs: 5,
            ..Default::default()
        },
    )
    .unwrap()
}

async fn next(sub: &mut dreamshot_core::DocumentSubscription) -> dreamshot_core::DocumentUpdate {
    tokio::time::timeout(Duration::from_secs(5), sub.next())
        .await
        .expect("timed out waiting for document")
        .expect("subscription closed")
}

#[tokio::test]
async fn polling_emits_only_changed_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/store/{DOC_PATH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/store/{DOC_PATH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "result": [{"type": "image", "image": "https://cdn.example.com/out.png"}]
        })))
        .mount(&server)
        .await;

    let mut sub = store(&server).subscribe(DOC_PATH).unwrap();
    let first = next(&mut sub).await.unwrap();
    assert_eq!(first.job_status(), Some(JobStatus::Pending));
    let second = next(&mut sub).await.unwrap();
    assert_eq!(second.job_status(), Some(JobStatus::Completed));
    assert_eq!(second.non_empty_result().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_document_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let mut sub = store(&server).subscribe(DOC_PATH).unwrap();
    let doc = next(&mut sub).await.unwrap();
    assert_eq!(doc.job_status(), Some(JobStatus::Pending));
}

#[tokio::test]
async fn errors_are_reported_once_and_polling_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let mut sub = store(&server).subscribe(DOC_PATH).unwrap();
    assert!(next(&mut sub).await.is_err());
    let doc = next(&mut sub).await.expect("recovered after errors");
    assert_eq!(doc.job_status(), Some(JobStatus::Pending));
}

#[tokio::test]
async fn dropping_subscription_stops_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let mut sub = store(&server).subscribe(DOC_PATH).unwrap();
    next(&mut sub).await.unwrap();
    drop(sub);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let before = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = server.received_requests().await.unwrap().len();
    assert_eq!(before, after, "polling continued after unsubscribe");
}

// --- sample images ---

fn sample_source(server: &MockServer) -> ProxySampleSource {
    ProxySampleSource::new(
        &AppConfig {
            origin: server.uri(),
            ..Default::default()
        },
        &ProxyConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn same_origin_sample_is_fetched_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/samples/a.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"PNGDATA".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = sample_source(&server).fetch("/samples/a.png").await.unwrap();
    assert_eq!(file.name, "a.png");
    assert_eq!(file.mime_type, "image/png");
    assert_eq!(file.bytes, b"PNGDATA");
}

#[tokio::test]
async fn external_sample_goes_through_proxy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/proxy-image"))
        .and(query_param("url", "https://cdn.example.com/x.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"JPEGDATA".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = sample_source(&server)
        .fetch("https://cdn.example.com/x.jpg")
        .await
        .unwrap();
    assert_eq!(file.name, "x.jpg");
    assert_eq!(file.mime_type, "image/jpeg");
}

#[tokio::test]
async fn proxy_rejection_message_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/proxy-image"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error": "Host not allowed: evil.example.com"})),
        )
        .mount(&server)
        .await;

    let err = sample_source(&server)
        .fetch("https://evil.example.com/x.png")
        .await
        .unwrap_err();
    assert!(err.user_message().contains("Host not allowed"));
}

#[tokio::test]
async fn missing_content_type_falls_back_to_extension() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/samples/b.webp"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .mount(&server)
        .await;

    let file = sample_source(&server).fetch("/samples/b.webp").await.unwrap();
    assert_eq!(file.mime_type, "image/webp");
}
