//! Contract tests for OllamaClient against a mock `/api/generate`.

use std::time::Duration;

use pandora_textgen::{GenerateRequest, OllamaClient, TextGenConfig, TextGenError, TextGenerator};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> OllamaClient {
    let config = TextGenConfig::local_mock(&mock_server.uri()).unwrap();
    OllamaClient::new(&config).unwrap()
}

#[tokio::test]
async fn generate_posts_model_and_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(serde_json::json!({
            "model": "llama3.2",
            "prompt": "Write about budgets",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama3.2",
            "response": "  Budgets are plans.\n",
            "done": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let text = client
        .generate(&GenerateRequest::new("llama3.2", "Write about budgets"))
        .await
        .unwrap();
    assert_eq!(text, "Budgets are plans.");
}

#[tokio::test]
async fn base_url_path_is_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/proxy/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TextGenConfig::local_mock(&format!("{}/proxy", mock_server.uri())).unwrap();
    let client = OllamaClient::new(&config).unwrap();
    assert!(client.endpoint_url().as_str().ends_with("/proxy/api/generate"));
    assert_eq!(
        client.generate(&GenerateRequest::new("m", "p")).await.unwrap(),
        "ok"
    );
}

#[tokio::test]
async fn generate_surfaces_non_2xx() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .generate(&GenerateRequest::new("missing", "p"))
        .await
        .unwrap_err();
    match err {
        TextGenError::ApiError { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "model not found");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_response_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "   \n"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .generate(&GenerateRequest::new("llama3.2", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, TextGenError::Empty { model } if model == "llama3.2"));
}

#[tokio::test]
async fn malformed_body_is_a_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .generate(&GenerateRequest::new("m", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, TextGenError::Deserialization { .. }));
}

#[tokio::test]
async fn slow_service_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = TextGenConfig::local_mock(&mock_server.uri()).unwrap();
    config.timeout_secs = 1;
    let client = OllamaClient::new(&config).unwrap();
    let err = client
        .generate(&GenerateRequest::new("m", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, TextGenError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    let config = TextGenConfig::local_mock("http://127.0.0.1:9").unwrap();
    let client = OllamaClient::new(&config).unwrap();
    let err = client
        .generate(&GenerateRequest::new("m", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, TextGenError::Http { .. }), "got {err:?}");
}
