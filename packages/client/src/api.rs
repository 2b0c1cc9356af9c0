//! API request and response models for the Leadflow backend

use leadflow_core::{
    AnswerMap, AnswerRecord, ChatMessage, ConversationStatus, CustomCategory, CustomPhaseConfig,
    Intent, KnowledgeEntry, Question,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/conversations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationInput {
    pub selected_offer: String,
    pub current_intent: Intent,
    pub messages: Vec<ChatMessage>,
    pub user_input: AnswerMap,
    pub status: ConversationStatus,
    pub progress: u8,
    pub current_question_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationResponse {
    pub success: bool,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `PATCH /api/conversations/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationUpdate {
    /// Messages added since the last acknowledged sync
    pub messages: Vec<ChatMessage>,
    pub user_input: AnswerMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<AnswerRecord>,
    pub status: ConversationStatus,
    pub progress: u8,
    pub current_question_id: Option<String>,
}

/// Response of `GET /api/knowledge-brain`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBrain {
    #[serde(default)]
    pub categories: Vec<CategorySummary>,
    #[serde(default)]
    pub custom_categories: Vec<CustomCategory>,
    #[serde(default)]
    pub entries: Vec<KnowledgeEntry>,
}

/// Server-side category count, used only for display before aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCategoryResponse {
    pub success: bool,
    pub category: Option<CustomCategory>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateKnowledgeResponse {
    pub success: bool,
    pub entry: Option<KnowledgeEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhasesResponse {
    #[serde(default)]
    pub phases: Vec<CustomPhaseConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SavePhasesRequest<'a> {
    pub flow: Intent,
    pub phases: &'a [CustomPhaseConfig],
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveQuestionsRequest<'a> {
    pub flow: Intent,
    pub questions: &'a [Question],
}
