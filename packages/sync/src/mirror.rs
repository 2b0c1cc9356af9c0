// ABOUTME: Conversation mirror contract and snapshot types
// ABOUTME: Local session state stays authoritative; the mirror only copies it to the server

use async_trait::async_trait;
use leadflow_client::{ApiClient, ClientResult, ConversationUpdate, CreateConversationInput};
use leadflow_core::{AnswerMap, AnswerRecord, ChatMessage, ConversationStatus, Intent};

/// Everything the server needs to mirror a session at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub selected_offer: String,
    pub current_intent: Intent,
    /// Full transcript; the worker sends only the unacknowledged tail
    pub messages: Vec<ChatMessage>,
    pub user_input: AnswerMap,
    pub answer: Option<AnswerRecord>,
    pub status: ConversationStatus,
    pub progress: u8,
    pub current_question_id: Option<String>,
}

impl SessionSnapshot {
    pub(crate) fn to_create_input(&self) -> CreateConversationInput {
        CreateConversationInput {
            selected_offer: self.selected_offer.clone(),
            current_intent: self.current_intent,
            messages: self.messages.clone(),
            user_input: self.user_input.clone(),
            status: self.status,
            progress: self.progress,
            current_question_id: self.current_question_id.clone(),
        }
    }

    pub(crate) fn to_update(
        &self,
        acked_messages: usize,
        answers: Vec<AnswerRecord>,
    ) -> ConversationUpdate {
        let start = acked_messages.min(self.messages.len());
        ConversationUpdate {
            messages: self.messages[start..].to_vec(),
            user_input: self.user_input.clone(),
            answers,
            status: self.status,
            progress: self.progress,
            current_question_id: self.current_question_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOp {
    /// Start a server conversation for a freshly selected offer + intent
    Create(SessionSnapshot),
    /// Mirror the latest state of the current conversation
    Update(SessionSnapshot),
    /// Forget the current conversation after a local reset
    Reset,
}

/// Receives session snapshots without ever blocking a transition
pub trait ConversationMirror: Send + Sync {
    fn push(&self, op: SyncOp);

    /// Server id of the current conversation once creation succeeded
    fn conversation_id(&self) -> Option<String>;
}

/// Mirror that drops everything, for offline sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMirror;

impl ConversationMirror for NoopMirror {
    fn push(&self, _op: SyncOp) {}

    fn conversation_id(&self) -> Option<String> {
        None
    }
}

/// Server side of the mirror
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create(&self, input: &CreateConversationInput) -> ClientResult<String>;
    async fn update(&self, id: &str, update: &ConversationUpdate) -> ClientResult<()>;
}

#[async_trait]
impl ConversationStore for ApiClient {
    async fn create(&self, input: &CreateConversationInput) -> ClientResult<String> {
        self.create_conversation(input).await
    }

    async fn update(&self, id: &str, update: &ConversationUpdate) -> ClientResult<()> {
        self.update_conversation(id, update).await
    }
}
