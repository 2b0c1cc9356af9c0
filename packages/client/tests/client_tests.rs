// ABOUTME: Integration tests for the persistence REST client
// ABOUTME: Mock server checks for conversation, knowledge, phase and question endpoints

use leadflow_client::{ApiClient, ClientError, ConversationUpdate, CreateConversationInput};
use leadflow_config::Config;
use leadflow_core::{
    AnswerMap, ChatMessage, ConversationStatus, CreateCategoryInput, CustomPhaseConfig, Intent,
    Question,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&Config {
        api_url: server.uri(),
        ..Config::default()
    })
    .unwrap()
}

fn create_input() -> CreateConversationInput {
    let mut user_input = AnswerMap::new();
    user_input.insert("intent".to_string(), "buy".to_string());

    CreateConversationInput {
        selected_offer: "real-estate-timeline".to_string(),
        current_intent: Intent::Buy,
        messages: vec![ChatMessage::user("I'm buying")],
        user_input,
        status: ConversationStatus::Active,
        progress: 0,
        current_question_id: Some("propertyType".to_string()),
    }
}

#[tokio::test]
async fn test_create_conversation_returns_server_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/conversations"))
        .and(body_partial_json(json!({
            "selectedOffer": "real-estate-timeline",
            "currentIntent": "buy",
            "userInput": { "intent": "buy" },
            "status": "active"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "success": true, "_id": "conv-42" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let id = client.create_conversation(&create_input()).await.unwrap();

    assert_eq!(id, "conv-42");
}

#[tokio::test]
async fn test_create_conversation_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/conversations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "agent not found" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.create_conversation(&create_input()).await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected(ref msg) if msg == "agent not found"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_update_conversation_patches_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/conversations/conv-42"))
        .and(body_partial_json(json!({
            "progress": 50,
            "currentQuestionId": "budget",
            "status": "active"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let update = ConversationUpdate {
        messages: vec![ChatMessage::user("Condo")],
        user_input: AnswerMap::new(),
        answers: Vec::new(),
        status: ConversationStatus::Active,
        progress: 50,
        current_question_id: Some("budget".to_string()),
    };

    client.update_conversation("conv-42", &update).await.unwrap();
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let update = ConversationUpdate {
        messages: Vec::new(),
        user_input: AnswerMap::new(),
        answers: Vec::new(),
        status: ConversationStatus::Completed,
        progress: 100,
        current_question_id: None,
    };

    let err = client.update_conversation("conv-1", &update).await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_knowledge_brain_and_category_creation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge-brain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": [{ "id": "buyer-stories", "label": "Buyer stories", "count": 1 }],
            "customCategories": [{ "id": "c1", "label": "Relocation", "parentId": null }],
            "entries": [{
                "id": "k1",
                "title": "Relocating from Denver",
                "category": "c1",
                "text": "Remote closing worked well",
                "kind": "story"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/knowledge-categories"))
        .and(body_partial_json(json!({ "label": "Military moves", "parentId": "c1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "category": { "id": "c2", "label": "Military moves", "parentId": "c1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let brain = client.knowledge_brain().await.unwrap();
    assert_eq!(brain.entries.len(), 1);
    assert_eq!(brain.custom_categories[0].label, "Relocation");

    let created = client
        .create_category(&CreateCategoryInput {
            label: "Military moves".to_string(),
            parent_id: Some("c1".to_string()),
            ..CreateCategoryInput::default()
        })
        .await
        .unwrap();
    assert_eq!(created.parent_id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn test_delete_knowledge_passes_id_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/agent-knowledge"))
        .and(query_param("id", "k9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).await.delete_knowledge("k9").await.unwrap();
}

#[tokio::test]
async fn test_custom_phases_round_trip_by_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-phases"))
        .and(query_param("flow", "sell"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "phases": [{
                "id": "listing-prep",
                "name": "Listing prep",
                "timeline": "Weeks 1-2",
                "description": "Get the home ready",
                "order": 0,
                "actionableSteps": [
                    { "id": "s1", "title": "Declutter", "priority": "high", "order": 0 }
                ]
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/custom-phases"))
        .and(query_param("flow", "sell"))
        .and(body_partial_json(json!({ "flow": "sell" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let phases: Vec<CustomPhaseConfig> = client.custom_phases(Intent::Sell).await.unwrap();
    assert_eq!(phases[0].actionable_steps[0].title, "Declutter");

    client.save_custom_phases(Intent::Sell, &phases).await.unwrap();
}

#[tokio::test]
async fn test_custom_questions_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-questions"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.custom_questions(Intent::Buy).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_custom_questions_default_to_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-questions"))
        .and(query_param("flow", "buy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questions": [
                { "id": "beds", "text": "How many bedrooms?", "mappingKey": "bedrooms", "order": 1 }
            ]
        })))
        .mount(&server)
        .await;

    let questions: Vec<Question> = client_for(&server)
        .await
        .custom_questions(Intent::Buy)
        .await
        .unwrap();
    assert!(questions[0].required);
    assert_eq!(questions[0].mapping_key.as_deref(), Some("bedrooms"));
}
