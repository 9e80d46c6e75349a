//! Anthropic provider against a mocked messages endpoint

use std::sync::Arc;
use std::time::Duration;

use nudgewealth_advisor::{
    Advisor, AdvisorError, AnthropicConfig, AnthropicProvider, CompletionRequest, LlmAdvisor,
    LlmError, LlmProvider, LlmRouter, NudgeRequest,
};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> AnthropicProvider {
    AnthropicProvider::new(AnthropicConfig {
        api_key: "sk-test".to_string(),
        model: "claude-test".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
}

fn message_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-test",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    }))
}

fn nudge_request() -> NudgeRequest {
    NudgeRequest {
        transaction_amount: dec!(900),
        transaction_category: "Food Delivery".to_string(),
        current_spending: dec!(1400),
        spending_limit: dec!(1500),
        recent_transactions: vec![],
        user_financial_goals: vec![],
        investment_opportunities: vec![],
    }
}

#[tokio::test]
async fn test_messages_request_carries_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-test",
            "max_tokens": 256,
            "messages": [{ "role": "user", "content": "Summarise my week" }]
        })))
        .respond_with(message_reply("You stayed under budget."))
        .expect(1)
        .mount(&server)
        .await;

    let reply = provider_for(&server)
        .complete(CompletionRequest::new("You are a coach.", "Summarise my week").with_max_tokens(256))
        .await
        .unwrap();

    assert_eq!(reply.content, "You stayed under budget.");
    assert_eq!(reply.model.as_deref(), Some("claude-test"));
}

#[tokio::test]
async fn test_spending_nudge_through_anthropic() {
    let server = MockServer::start().await;
    let nudge = json!({
        "nudgeMessage": "This would take Food Delivery past your ₹1500 limit.",
        "suggestedAction": "Cook tonight and invest the ₹800 difference",
        "isOverLimit": true
    });
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(message_reply(&nudge.to_string()))
        .mount(&server)
        .await;

    let advisor = LlmAdvisor::new(LlmRouter::new(Arc::new(provider_for(&server))));
    let nudge = advisor.spending_nudge(&nudge_request()).await.unwrap();

    assert!(nudge.is_over_limit);
    assert!(nudge.nudge_message.contains("₹1500"));
}

#[tokio::test]
async fn test_rejected_key_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        })))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .complete(CompletionRequest::new("sys", "prompt"))
        .await;
    match result {
        Err(LlmError::RequestFailed { message }) => assert!(message.contains("401")),
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
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "not a list" })))
        .mount(&server)
        .await;

    let result = provider_for(&server)
        .complete(CompletionRequest::new("sys", "prompt"))
        .await;
    assert!(matches!(result, Err(LlmError::InvalidResponse { .. })));
}
