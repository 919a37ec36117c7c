#![cfg(feature = "openrouter")]

//! OpenRouter adapter HTTP contract: attribution headers, local search,
//! pseudo-versions, prediction shaping.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use yogi::YogiError;
use yogi::prelude::*;

fn provider(server: &MockServer) -> OpenRouterProvider {
    let config = OpenRouterConfig::new("test-key")
        .with_base_url(server.uri())
        .with_referer("https://example.com")
        .with_title("Example App");
    OpenRouterProvider::new(config, reqwest::Client::new())
}

fn catalog() -> serde_json::Value {
    json!({
        "data": [
            {
                "id": "anthropic/claude-3-opus",
                "name": "Claude 3 Opus",
                "description": "Strong reasoning model",
                "created": 1709596800,
                "context_length": 200000,
                "pricing": { "prompt": "0.000015" }
            },
            {
                "id": "meta-llama/llama-3-8b-instruct",
                "name": "Llama 3 8B Instruct",
                "description": "Fast open model",
                "created": 1713398400,
                "context_length": 8192
            }
        ]
    })
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("http-referer", "https://example.com"))
        .and(header("x-title", "Example App"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn listing_converts_and_sends_attribution_headers() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let models = provider(&server).get_models(None).await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].provider, "openrouter");
    assert_eq!(models[0].metadata["context_length"], 200000);
}

#[tokio::test]
async fn search_is_a_local_substring_match() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let provider = provider(&server);

    let models = provider.get_models(Some("LLAMA")).await.unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, "meta-llama/llama-3-8b-instruct");

    let models = provider.get_models(Some("reasoning")).await.unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, "anthropic/claude-3-opus");

    // no match is an empty list, never an error
    let models = provider.get_models(Some("no such model")).await.unwrap();
    assert!(models.is_empty());
}

#[tokio::test]
async fn get_model_selects_from_the_catalog() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let provider = provider(&server);

    let model = provider.get_model("anthropic/claude-3-opus").await.unwrap();
    assert_eq!(model.name.as_deref(), Some("Claude 3 Opus"));

    let err = provider.get_model("missing/model").await.unwrap_err();
    assert!(matches!(err, YogiError::NotFound(_)));
}

#[tokio::test]
async fn versions_synthesize_exactly_one_pseudo_version() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let versions = provider(&server)
        .get_model_versions("anthropic/claude-3-opus")
        .await
        .unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].id, "latest");
    assert!(versions[0].created_at.starts_with("2024-03-05T"));
}

#[tokio::test]
async fn chat_inputs_go_to_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(|req: &Request| {
            let Ok(body) = serde_json::from_slice::<serde_json::Value>(&req.body) else {
                return false;
            };
            body["model"] == "anthropic/claude-3-opus" && body["messages"].is_array()
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "hi" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .run_prediction(
            "anthropic/claude-3-opus",
            "latest",
            json!({ "messages": [{ "role": "user", "content": "hello" }] }),
        )
        .await
        .unwrap();
    assert_eq!(result["choices"][0]["message"]["content"], "hi");
}

#[tokio::test]
async fn prompt_inputs_go_to_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "text": "upon a time" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .run_prediction("meta-llama/llama-3-8b-instruct", "latest", json!({ "prompt": "Once" }))
        .await
        .unwrap();
    assert_eq!(result["choices"][0]["text"], "upon a time");
}

#[tokio::test]
async fn unusable_inputs_fail_without_a_network_call() {
    let server = MockServer::start().await;
    let provider = provider(&server);

    let err = provider
        .run_prediction("anthropic/claude-3-opus", "latest", json!({ "foo": 1 }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("messages"));

    assert!(server.received_requests().await.unwrap().is_empty());
}
