use super::*;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

#[test]
fn test_default_endpoint() {
    let client = OllamaClient::new("qwen:1.5-0.5b-chat-q4_0");
    assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    assert_eq!(client.model(), "qwen:1.5-0.5b-chat-q4_0");
    assert_eq!(client.id(), "ollama");
}

#[tokio::test]
async fn test_generate_success() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "model": "test-model",
        "response": "Here is the answer.",
        "done": true
    });
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/generate"))
        .and(matchers::body_partial_json(serde_json::json!({
            "model": "test-model",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        OllamaClient::with_endpoint("test-model", format!("{}/api/generate", server.uri()));
    let reply = client.generate("hello").await.unwrap();
    assert_eq!(reply, "Here is the answer.");
}

#[tokio::test]
async fn test_generate_api_error() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_endpoint("m", format!("{}/api/generate", server.uri()));
    let err = client.generate("hello").await.unwrap_err();
    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("model not loaded"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_missing_response_field() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"done": true})))
        .mount(&server)
        .await;

    let client = OllamaClient::with_endpoint("m", format!("{}/api/generate", server.uri()));
    let err = client.generate("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn test_generate_network_error() {
    // Nothing listens on this port.
    let client = OllamaClient::with_endpoint("m", "http://127.0.0.1:1/api/generate");
    let err = client.generate("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::Network(_)));
}
