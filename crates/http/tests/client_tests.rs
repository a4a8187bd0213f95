//! Integration tests for the garage HTTP client

use garage_http::client::{DEFAULT_TIMEOUT, VERIFICATION_TOKEN_HEADER};
use garage_http::{ClientError, GarageClient, RequestSpec};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn builder_trims_trailing_slash() {
    let client = GarageClient::new("http://localhost:5000/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000");
}

#[tokio::test]
async fn builder_requires_base_url() {
    let result = GarageClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn default_timeout_is_thirty_seconds() {
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
}

#[tokio::test]
async fn verification_token_is_attached_when_present() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Customer/Create"))
        .and(header(VERIFICATION_TOKEN_HEADER, "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::builder()
        .base_url(mock_server.uri())
        .verification_token("tok-123")
        .build()
        .unwrap();

    let request = client.post_form("/Customer/Create", &[("name", "Anh")]);
    let envelope = client.execute_envelope(request).await.unwrap();
    assert!(envelope.success);
}

#[tokio::test]
async fn verification_token_header_is_omitted_when_absent() {
    init_tracing();
    let mock_server = MockServer::start().await;

    // Reject any request that carries the header.
    Mock::given(method("GET"))
        .and(path("/Vehicle/List"))
        .and(header_exists(VERIFICATION_TOKEN_HEADER))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Vehicle/List"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let request = client.request(Method::GET, "/Vehicle/List");
    let envelope = client.execute_envelope(request).await.unwrap();
    assert!(envelope.success);
}

#[tokio::test]
async fn put_sends_json_body() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/Vehicle/5"))
        .and(header("content-type", "application/json"))
        .and(body_string_contains("\"plateNumber\":\"51A-123\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let request = client.put_json("/Vehicle/5", &json!({"plateNumber": "51A-123"}));
    assert!(client.execute_envelope(request).await.is_ok());
}

#[tokio::test]
async fn failure_keeps_status_and_envelope() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Service/List"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"success": false, "message": "bad filter"})),
        )
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let request = client.request(Method::GET, "/Service/List");
    let error = client.execute_envelope(request).await.unwrap_err();

    assert_eq!(error.status(), Some(400));
    assert_eq!(
        error.envelope().and_then(|e| e.message.as_deref()),
        Some("bad filter")
    );
    assert!(!error.is_auth_expired());
}

#[tokio::test]
async fn unauthorized_with_empty_body_is_auth_expired() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Payment/List"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let request = client.request(Method::GET, "/Payment/List");
    let error = client.execute_envelope(request).await.unwrap_err();

    assert!(error.is_auth_expired());
}

#[tokio::test]
async fn request_spec_builds_query_and_headers() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Customer/Search"))
        .and(query_param("name", "Minh"))
        .and(header("x-request-source", "grid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let spec = RequestSpec::get(
        "/Customer/Search",
        vec![("name".to_string(), "Minh".to_string())],
    )
    .header("x-request-source", "grid");

    let envelope = client.execute_envelope(spec.build(&client)).await.unwrap();
    assert!(envelope.success);
}

#[tokio::test]
async fn per_call_timeout_aborts_slow_responses() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Report/Slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let spec = RequestSpec::get("/Report/Slow", Vec::new()).timeout(Duration::from_millis(100));
    let error = client.execute_envelope(spec.build(&client)).await.unwrap_err();

    match error {
        ClientError::Request(inner) => assert!(inner.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_streams_multipart_and_reports_full_progress() {
    use garage_http::client::upload::UploadPart;
    use std::sync::{Arc, Mutex};

    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Document/Upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let parts = vec![UploadPart::file(
        "file",
        "invoice.pdf",
        "application/pdf",
        vec![7u8; 150_000],
    )];
    let request = client
        .upload(
            "/Document/Upload",
            parts,
            Some(Arc::new(move |fraction| sink.lock().unwrap().push(fraction))),
        )
        .unwrap();

    let envelope = client.execute_envelope(request).await.unwrap();
    assert!(envelope.success);

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert_eq!(*seen.last().unwrap(), 1.0);
}

#[tokio::test]
async fn upload_with_no_computable_length_never_reports_progress() {
    use garage_http::client::upload::UploadPart;
    use std::sync::{Arc, Mutex};

    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Document/Upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    // Empty parts: the total length is zero, so the callback must stay
    // silent even though one was supplied.
    let parts = vec![UploadPart::new("note", Vec::<u8>::new())];
    let request = client
        .upload(
            "/Document/Upload",
            parts,
            Some(Arc::new(move |fraction| sink.lock().unwrap().push(fraction))),
        )
        .unwrap();

    let envelope = client.execute_envelope(request).await.unwrap();
    assert!(envelope.success);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_without_progress_callback_sends_plain_parts() {
    use garage_http::client::upload::UploadPart;

    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Document/Upload"))
        .and(body_string_contains("warranty.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let client = GarageClient::new(mock_server.uri()).unwrap();
    let parts = vec![UploadPart::file(
        "file",
        "warranty.pdf",
        "application/pdf",
        vec![7u8; 4_096],
    )];
    let request = client.upload("/Document/Upload", parts, None).unwrap();

    let envelope = client.execute_envelope(request).await.unwrap();
    assert!(envelope.success);
}
