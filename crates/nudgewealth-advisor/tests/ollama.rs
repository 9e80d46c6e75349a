//! Ollama provider against a mocked local server

use std::sync::Arc;
use std::time::Duration;

use nudgewealth_advisor::{
    Advisor, AdvisorError, CompletionRequest, LlmAdvisor, LlmError, LlmProvider, LlmRouter,
    NudgeRequest, OllamaConfig, OllamaProvider,
};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OllamaProvider {
    OllamaProvider::new(OllamaConfig {
        base_url: server.uri(),
        model: "llama-test".to_string(),
        timeout: Duration::from_secs(5),
    })
}

fn nudge_request() -> NudgeRequest {
    NudgeRequest {
        transaction_amount: dec!(200),
        transaction_category: "Shopping".to_string(),
        current_spending: dec!(1500),
        spending_limit: dec!(2000),
        recent_transactions: vec![],
        user_financial_goals: vec!["Emergency Fund".to_string()],
        investment_opportunities: vec![],
    }
}

#[tokio::test]
async fn test_generate_reply_is_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama-test",
            "prompt": "How am I doing?",
            "stream": false,
            "format": "json"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama-test",
            "response": "  {\"ok\": true}\n",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = provider_for(&server)
        .complete(CompletionRequest::new("You are a coach.", "How am I doing?").with_json_mode())
        .await
        .unwrap();

    assert_eq!(reply.content, r#"{"ok": true}"#);
    assert_eq!(reply.model.as_deref(), Some("llama-test"));
}

#[tokio::test]
async fn test_spending_nudge_through_ollama() {
    let server = MockServer::start().await;
    let nudge = json!({
        "nudgeMessage": "You're at 85% of your Shopping budget.",
        "suggestedAction": "Move ₹200 to your Emergency Fund",
        "isOverLimit": false
    });
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": nudge.to_string() })),
        )
        .mount(&server)
        .await;

    let advisor = LlmAdvisor::new(LlmRouter::new(Arc::new(provider_for(&server))));
    let nudge = advisor.spending_nudge(&nudge_request()).await.unwrap();

    assert!(nudge.nudge_message.contains("85%"));
    assert!(!nudge.is_over_limit);
}

#[tokio::test]
async fn test_non_success_status_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .complete(CompletionRequest::new("sys", "prompt"))
        .await;
    match result {
        Err(LlmError::RequestFailed { message }) => {
            assert!(message.contains("404"));
            assert!(message.contains("model not found"));
        }
        other => panic!("expected request failure, got {other:?}"),
    }

    let advisor = LlmAdvisor::new(LlmRouter::new(Arc::new(provider_for(&server))));
    let result = advisor.spending_nudge(&nudge_request()).await;
    assert!(matches!(result, Err(AdvisorError::Llm(_))));
}

#[tokio::test]
async fn test_unexpected_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .complete(CompletionRequest::new("sys", "prompt"))
        .await;
    assert!(matches!(result, Err(LlmError::InvalidResponse { .. })));
}
