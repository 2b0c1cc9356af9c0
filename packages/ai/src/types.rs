// ABOUTME: Wire types for the answer classification and extraction endpoint
// ABOUTME: Request context sent with every answer and the structured reply that comes back

use leadflow_core::{AnswerMap, Button, ChatMessage, Intent, MessageRole, Question};
use serde::{Deserialize, Deserializer, Serialize};

/// A transcript line as sent in the context window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ChatMessage> for ContextMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
    pub selected_offer: String,
    pub current_intent: Intent,
    pub current_question_id: String,
    pub user_input: AnswerMap,
    pub messages: Vec<ContextMessage>,
    pub question_config: Question,
}

/// What the user did to produce the answer being classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Button(Button),
    FreeText(String),
}

impl SmartChatRequest {
    /// Assemble a request, keeping only the trailing `window` transcript messages
    pub fn new(
        action: &UserAction,
        selected_offer: &str,
        current_intent: Intent,
        question: &Question,
        user_input: &AnswerMap,
        transcript: &[ChatMessage],
        window: usize,
    ) -> Self {
        let start = transcript.len().saturating_sub(window);
        let messages = transcript[start..].iter().map(ContextMessage::from).collect();

        let (button_id, button_value, button_label, free_text) = match action {
            UserAction::Button(button) => (
                Some(button.id.clone()),
                Some(button.value.clone()),
                Some(button.label.clone()),
                None,
            ),
            UserAction::FreeText(text) => (None, None, None, Some(text.clone())),
        };

        Self {
            button_id,
            button_value,
            button_label,
            free_text,
            selected_offer: selected_offer.to_string(),
            current_intent,
            current_question_id: question.id.clone(),
            user_input: user_input.clone(),
            messages,
            question_config: question.clone(),
        }
    }
}

/// An answer the backend pulled out of the user's input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extracted {
    pub mapping_key: String,
    #[serde(deserialize_with = "string_or_scalar")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionHint {
    pub id: String,
    #[serde(default)]
    pub buttons: Option<Vec<Button>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartChatResponse {
    pub reply: String,
    #[serde(default)]
    pub extracted: Option<Extracted>,
    #[serde(default)]
    pub next_question: Option<NextQuestionHint>,
    /// The input was a clarifying question rather than an answer
    #[serde(default)]
    pub is_free_text_response: bool,
    #[serde(default)]
    pub progress: Option<f64>,
}

/// Accept `"400"`, `400` or `true` for extracted values
fn string_or_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar extracted value, got {}",
            other
        ))),
    }
}
