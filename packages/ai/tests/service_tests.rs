// ABOUTME: Integration tests for the smart chat HTTP client
// ABOUTME: Uses a mock server to check request shape, success parsing and error mapping

use leadflow_ai::{SmartChat, SmartChatError, SmartChatRequest, SmartChatService, UserAction};
use leadflow_config::Config;
use leadflow_core::{AnswerMap, Button, ChatMessage, Intent, Question};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        api_url: server.uri(),
        ..Config::default()
    }
}

fn button_request() -> SmartChatRequest {
    let question = Question::choice(
        "propertyType",
        "What type of home?",
        "propertyType",
        vec![Button::new("pt-condo", "Condo", "condo")],
    );
    let transcript = vec![ChatMessage::assistant("What type of home?", None)];

    SmartChatRequest::new(
        &UserAction::Button(Button::new("pt-condo", "Condo", "condo")),
        "real-estate-timeline",
        Intent::Buy,
        &question,
        &AnswerMap::new(),
        &transcript,
        5,
    )
}

#[tokio::test]
async fn test_classify_parses_successful_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/smart"))
        .and(body_partial_json(json!({
            "buttonValue": "condo",
            "selectedOffer": "real-estate-timeline",
            "currentIntent": "buy",
            "currentQuestionId": "propertyType"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Condos are a great entry point. What's your budget?",
            "extracted": { "mappingKey": "propertyType", "value": "condo" },
            "nextQuestion": { "id": "budget" },
            "progress": 50
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = SmartChatService::new(&config_for(&server)).unwrap();
    let response = service.classify(&button_request()).await.unwrap();

    assert!(response.reply.starts_with("Condos"));
    assert_eq!(response.extracted.unwrap().mapping_key, "propertyType");
    assert_eq!(response.progress, Some(50.0));
}

#[tokio::test]
async fn test_classify_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/smart"))
        .and(header("authorization", "Bearer agent-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_token: Some("agent-token".to_string()),
        ..config_for(&server)
    };
    let service = SmartChatService::new(&config).unwrap();

    assert!(service.classify(&button_request()).await.is_ok());
}

#[tokio::test]
async fn test_classify_maps_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/smart"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let service = SmartChatService::new(&config_for(&server)).unwrap();
    let err = service.classify(&button_request()).await.unwrap_err();

    match err {
        SmartChatError::ApiError { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_classify_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/smart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "no reply" })))
        .mount(&server)
        .await;

    let service = SmartChatService::new(&config_for(&server)).unwrap();
    let err = service.classify(&button_request()).await.unwrap_err();

    assert!(matches!(err, SmartChatError::ParseError(_)));
}
